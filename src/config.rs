//! Runtime settings, read from environment variables with defaults.
//!
//! | Variable         | Default                  |
//! |------------------|--------------------------|
//! | `HOST`           | `0.0.0.0`                |
//! | `PORT`           | `8080`                   |
//! | `DATA_FILE`      | `./data/pool_data.json`  |
//! | `SESSION_KEY`    | random per process       |
//! | `SECURE_COOKIES` | `false`                  |

use std::path::PathBuf;

/// Session signing keys shorter than this are ignored.
pub const MIN_SESSION_KEY_LEN: usize = 64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_file: PathBuf,
    /// Secret for signing session cookies. `None` means generate one at startup,
    /// which logs everyone out on restart.
    pub session_key: Option<String>,
    /// Only send the session cookie over HTTPS.
    pub secure_cookies: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_file() -> PathBuf {
    PathBuf::from("./data/pool_data.json")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_file: default_data_file(),
            session_key: None,
            secure_cookies: false,
        }
    }
}

impl Config {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; unset or unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(default_host);
        let port = lookup("PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or_else(default_port);
        let data_file = lookup("DATA_FILE")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_file);
        let session_key = lookup("SESSION_KEY").filter(|k| {
            let long_enough = k.len() >= MIN_SESSION_KEY_LEN;
            if !long_enough {
                log::warn!(
                    "SESSION_KEY ignored: must be at least {} bytes",
                    MIN_SESSION_KEY_LEN
                );
            }
            long_enough
        });
        let secure_cookies = lookup("SECURE_COOKIES")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Self {
            host,
            port,
            data_file,
            session_key,
            secure_cookies,
        }
    }
}

use anyhow::{ensure, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub request_timeout: Duration,
    pub session_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            base_url: env::var("HIKE_BASE_URL")
                .or_else(|_| env::var("NEXT_PUBLIC_BASE_URL"))
                .context("HIKE_BASE_URL must be set")?,
            request_timeout: match env::var("HIKE_REQUEST_TIMEOUT_SECS") {
                Ok(raw) => parse_request_timeout(&raw)?,
                Err(_) => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            },
            session_path: match env::var("HIKE_SESSION_PATH") {
                Ok(path) => PathBuf::from(path),
                Err(_) => default_session_path()?,
            },
        })
    }
}

fn parse_request_timeout(raw: &str) -> Result<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .context("HIKE_REQUEST_TIMEOUT_SECS must be a valid number")?;
    ensure!(secs > 0, "HIKE_REQUEST_TIMEOUT_SECS must be greater than zero");
    Ok(Duration::from_secs(secs))
}

fn default_session_path() -> Result<PathBuf> {
    let home = env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .context("HIKE_SESSION_PATH not set and no home directory found")?;
    Ok(PathBuf::from(home).join(".hike").join("session.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_timeout_is_parsed_in_seconds() {
        assert_eq!(parse_request_timeout("45").unwrap(), Duration::from_secs(45));
    }

    #[test]
    fn zero_request_timeout_is_rejected() {
        let err = parse_request_timeout("0").unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn non_numeric_request_timeout_is_rejected() {
        assert!(parse_request_timeout("soon").is_err());
    }
}

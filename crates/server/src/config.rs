use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{bail, Context};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

/// Longest accepted token lifetime: one year.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 365 * 24 * 60;

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Process configuration, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    /// `IT_LISTEN_ADDR`, else `0.0.0.0:$PORT`, else `0.0.0.0:3000`
    pub listen_addr: SocketAddr,
    /// `IT_DATA_PATH`: encrypted records file; in-memory store when unset
    pub data_path: Option<PathBuf>,
    /// `IT_DATA_PASSWORD`: password of the records file
    pub data_password: Option<String>,
    /// `IT_USERNAME`
    pub username: String,
    /// `IT_PASSWORD_HASH`: Argon2 PHC string; login is refused when unset
    pub password_hash: Option<String>,
    /// `IT_SECRET_KEY` (base64): token signing key; random per process when unset
    pub secret_key: Option<Vec<u8>>,
    /// `IT_TOKEN_TTL_MINUTES`
    pub token_ttl_minutes: i64,
    /// `IT_LOG_FORMAT`: `text` or `json`
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            data_path: None,
            data_password: None,
            username: "admin".to_string(),
            password_hash: None,
            secret_key: None,
            token_ttl_minutes: 720,
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    /// Load `.env` (if present) and read every `IT_*` variable.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let listen_addr = match (lookup("IT_LISTEN_ADDR"), lookup("PORT")) {
            (Some(addr), _) => addr
                .parse::<SocketAddr>()
                .with_context(|| format!("IT_LISTEN_ADDR is not a socket address: {addr}"))?,
            (None, Some(port)) => {
                let port: u16 = port
                    .parse()
                    .with_context(|| format!("PORT is not a port number: {port}"))?;
                SocketAddr::from(([0, 0, 0, 0], port))
            }
            (None, None) => defaults.listen_addr,
        };

        let data_path = lookup("IT_DATA_PATH").map(PathBuf::from);
        let data_password = lookup("IT_DATA_PASSWORD");
        if data_path.is_some() && data_password.is_none() {
            bail!("IT_DATA_PASSWORD is required when IT_DATA_PATH is set");
        }

        let secret_key = lookup("IT_SECRET_KEY")
            .map(|encoded| BASE64.decode(encoded.trim()))
            .transpose()
            .context("IT_SECRET_KEY is not valid base64")?;
        if secret_key.as_ref().is_some_and(|k| k.len() < 32) {
            bail!("IT_SECRET_KEY must decode to at least 32 bytes");
        }

        let token_ttl_minutes = match lookup("IT_TOKEN_TTL_MINUTES") {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|m| (1..=MAX_TOKEN_TTL_MINUTES).contains(m))
                .with_context(|| {
                    format!(
                        "IT_TOKEN_TTL_MINUTES must be between 1 and {MAX_TOKEN_TTL_MINUTES}: {raw}"
                    )
                })?,
            None => defaults.token_ttl_minutes,
        };

        let log_format = match lookup("IT_LOG_FORMAT") {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            listen_addr,
            data_path,
            data_password,
            username: lookup("IT_USERNAME").unwrap_or(defaults.username),
            password_hash: lookup("IT_PASSWORD_HASH"),
            secret_key,
            token_ttl_minutes,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.listen_addr.port(), 3000);
        assert_eq!(config.username, "admin");
        assert!(config.data_path.is_none());
        assert!(config.password_hash.is_none());
        assert_eq!(config.token_ttl_minutes, 720);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn port_fallback() {
        let config = config_from(&[("PORT", "8080")]).unwrap();
        assert_eq!(config.listen_addr.port(), 8080);
    }

    #[test]
    fn listen_addr_wins_over_port() {
        let config = config_from(&[("IT_LISTEN_ADDR", "127.0.0.1:9000"), ("PORT", "8080")]).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:9000".parse().unwrap());
    }

    #[test]
    fn data_path_needs_password() {
        assert!(config_from(&[("IT_DATA_PATH", "/tmp/r.invr")]).is_err());
        let config = config_from(&[
            ("IT_DATA_PATH", "/tmp/r.invr"),
            ("IT_DATA_PASSWORD", "pw"),
        ])
        .unwrap();
        assert_eq!(config.data_path, Some(PathBuf::from("/tmp/r.invr")));
    }

    #[test]
    fn secret_key_must_be_long_base64() {
        assert!(config_from(&[("IT_SECRET_KEY", "!!!")]).is_err());
        assert!(config_from(&[("IT_SECRET_KEY", BASE64.encode([1u8; 8]).as_str())]).is_err());
        let config = config_from(&[("IT_SECRET_KEY", BASE64.encode([1u8; 32]).as_str())]).unwrap();
        assert_eq!(config.secret_key, Some(vec![1u8; 32]));
    }

    #[test]
    fn token_ttl_must_be_positive() {
        assert!(config_from(&[("IT_TOKEN_TTL_MINUTES", "0")]).is_err());
        assert!(config_from(&[("IT_TOKEN_TTL_MINUTES", "soon")]).is_err());
        assert_eq!(
            config_from(&[("IT_TOKEN_TTL_MINUTES", "15")]).unwrap().token_ttl_minutes,
            15
        );
    }

    #[test]
    fn token_ttl_is_capped_at_one_year() {
        let max = MAX_TOKEN_TTL_MINUTES.to_string();
        assert_eq!(
            config_from(&[("IT_TOKEN_TTL_MINUTES", max.as_str())])
                .unwrap()
                .token_ttl_minutes,
            MAX_TOKEN_TTL_MINUTES
        );
        let over = (MAX_TOKEN_TTL_MINUTES + 1).to_string();
        assert!(config_from(&[("IT_TOKEN_TTL_MINUTES", over.as_str())]).is_err());
        assert!(config_from(&[("IT_TOKEN_TTL_MINUTES", "999999999999999")]).is_err());
    }

    #[test]
    fn json_log_format() {
        let config = config_from(&[("IT_LOG_FORMAT", "JSON")]).unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
    }
}

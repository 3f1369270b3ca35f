//! Service configuration.

use std::fmt;
use std::path::Path;

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Deserialize;

use crate::token::DEFAULT_TOKEN_TTL_HOURS;

/// Service configuration loaded from environment variables.
#[derive(Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// PostgreSQL connection URL. When unset the service keeps its data in memory.
    pub database_url: Option<String>,

    /// Maximum pooled database connections (default: 10).
    pub database_max_connections: u32,

    /// HMAC secret used to sign tokens.
    pub jwt_secret: String,

    /// Token lifetime in hours (default: 72).
    pub token_ttl_hours: i64,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

/// JWT secrets file structure.
#[derive(Debug, Deserialize)]
struct JwtSecrets {
    secret: String,
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.is_empty()),
            database_max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            jwt_secret: load_jwt_secret(),
            token_ttl_hours: std::env::var("TOKEN_TTL_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|hours| *hours > 0)
                .unwrap_or(DEFAULT_TOKEN_TTL_HOURS),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024), // 1MB
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }
}

/// Load the token signing secret from file or environment.
///
/// Falls back to a random per-process secret, so tokens do not survive a restart.
fn load_jwt_secret() -> String {
    let secret_paths = [
        ".secrets/jwt.json",
        "merch-shop/.secrets/jwt.json",
        "../.secrets/jwt.json",
    ];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<JwtSecrets>(path) {
            tracing::info!(path = %path, "Loaded JWT secret from file");
            return secrets.secret;
        }
    }

    if let Some(secret) = std::env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()) {
        tracing::debug!("JWT secrets file not found, using environment variable");
        return secret;
    }

    tracing::warn!("No JWT secret configured - generated an ephemeral one, tokens will not survive a restart");
    generate_secret()
}

/// Random alphanumeric secret.
fn generate_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(
    path: impl AsRef<Path>,
) -> Result<T, std::io::Error> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            database_url: None,
            database_max_connections: 10,
            jwt_secret: generate_secret(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        }
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("listen_addr", &self.listen_addr)
            .field("database_configured", &self.database_url.is_some())
            .field("database_max_connections", &self.database_max_connections)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("cors_origins", &self.cors_origins)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn secrets_file_is_parsed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"secret": "from-file"}}"#).unwrap();

        let secrets: JwtSecrets = load_secrets_file(file.path()).unwrap();
        assert_eq!(secrets.secret, "from-file");
    }

    #[test]
    fn missing_secrets_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_secrets_file::<JwtSecrets>(dir.path().join("jwt.json")).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn malformed_secrets_file_is_invalid_data() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = load_secrets_file::<JwtSecrets>(file.path()).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn generated_secrets_differ() {
        let a = generate_secret();
        assert_eq!(a.len(), 64);
        assert_ne!(a, generate_secret());
    }

    #[test]
    fn debug_output_redacts_secret() {
        let config = ServiceConfig {
            jwt_secret: "super-secret".into(),
            ..ServiceConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}

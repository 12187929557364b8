/// Runtime configuration, read once at startup
///
/// All settings come from the environment (a `.env` file is honored in
/// development):
///
/// - `DATABASE_URL` (required)
/// - `JWT_SECRET` (required, 32+ characters)
/// - `API_HOST` / `API_PORT` (default `0.0.0.0:8080`)
/// - `DATABASE_MAX_CONNECTIONS` (default 10)
use std::env;
use std::str::FromStr;

use anyhow::Context;

/// Everything the server needs to run
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

/// Listen address for the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Connection pool settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Token signing key
///
/// Intentionally carries no serde derives so the secret cannot end up in
/// a serialized config dump.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
}

/// Reads a required environment variable
fn required(name: &str) -> anyhow::Result<String> {
    env::var(name).with_context(|| format!("{name} environment variable is required"))
}

/// Reads an optional environment variable, parsing it or falling back
fn parsed<T: FromStr>(name: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{name} has an invalid value")),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Loads the configuration from the environment
    ///
    /// Fails fast on a missing `DATABASE_URL`, a missing or short
    /// `JWT_SECRET`, or an unparseable numeric setting.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = required("JWT_SECRET")?;
        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        Ok(Self {
            server: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parsed("API_PORT", 8080)?,
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: parsed("DATABASE_MAX_CONNECTIONS", 10)?,
            },
            jwt: JwtConfig { secret: jwt_secret },
        })
    }

    /// `host:port` string for the TCP listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address_joins_host_and_port() {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 9100,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/test".to_string(),
                max_connections: 10,
            },
            jwt: JwtConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            },
        };

        assert_eq!(config.bind_address(), "127.0.0.1:9100");
    }

    #[test]
    fn test_parsed_falls_back_when_unset() {
        let port: u16 = parsed("TEAMHUB_TEST_UNSET_PORT", 8080).unwrap();
        assert_eq!(port, 8080);
    }
}

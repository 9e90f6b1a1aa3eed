//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_ACCESS_TOKEN_MINUTES, DEFAULT_APP_URL, DEFAULT_DATABASE_URL,
    DEFAULT_REFRESH_TOKEN_DAYS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_SMTP_FROM,
    DEFAULT_SMTP_PORT, MIN_JWT_SECRET_LENGTH,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_access_secret: String,
    jwt_refresh_secret: String,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
    pub server_host: String,
    pub server_port: u16,
    /// Public URL used when building verification and reset links
    pub app_url: String,
    pub smtp: SmtpConfig,
}

/// SMTP settings. When `host` is unset, emails are logged instead of sent.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: u16,
    pub user: Option<String>,
    pub pass: Option<String>,
    pub from: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_access_secret", &"[REDACTED]")
            .field("jwt_refresh_secret", &"[REDACTED]")
            .field("access_token_minutes", &self.access_token_minutes)
            .field("refresh_token_days", &self.refresh_token_days)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("app_url", &self.app_url)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if either JWT secret is not set or is too short (security
    /// requirement). In debug builds, insecure defaults are used instead.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_access_secret = load_secret("JWT_ACCESS_SECRET");
        let jwt_refresh_secret = load_secret("JWT_REFRESH_SECRET");

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            jwt_access_secret,
            jwt_refresh_secret,
            access_token_minutes: env::var("ACCESS_TOKEN_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_ACCESS_TOKEN_MINUTES),
            refresh_token_days: env::var("REFRESH_TOKEN_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_REFRESH_TOKEN_DAYS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            app_url: env::var("APP_URL").unwrap_or_else(|_| DEFAULT_APP_URL.to_string()),
            smtp: SmtpConfig::from_env(),
        }
    }

    /// Get access token secret bytes for signing/verification.
    pub fn access_secret_bytes(&self) -> &[u8] {
        self.jwt_access_secret.as_bytes()
    }

    /// Get refresh token secret bytes for signing/verification.
    pub fn refresh_secret_bytes(&self) -> &[u8] {
        self.jwt_refresh_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

impl SmtpConfig {
    fn from_env() -> Self {
        Self {
            host: env::var("SMTP_HOST").ok(),
            port: env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            user: env::var("SMTP_USER").ok(),
            pass: env::var("SMTP_PASS").ok(),
            from: env::var("SMTP_FROM").unwrap_or_else(|_| DEFAULT_SMTP_FROM.to_string()),
        }
    }

    /// SMTP is considered configured once a host is provided.
    pub fn is_configured(&self) -> bool {
        self.host.is_some()
    }
}

/// Load a JWT secret, falling back to an insecure default in debug builds.
fn load_secret(var: &str) -> String {
    let secret = env::var(var).unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            tracing::warn!("{} not set, using insecure default for development", var);
            format!("dev-{}-minimum-32-characters!!!!!!", var.to_lowercase())
        } else {
            panic!("{} environment variable must be set in production", var);
        }
    });

    if secret.len() < MIN_JWT_SECRET_LENGTH {
        panic!("{} must be at least {} characters long", var, MIN_JWT_SECRET_LENGTH);
    }

    secret
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config {
            database_url: "postgres://secret".to_string(),
            jwt_access_secret: "super-secret-access-key-32-chars!".to_string(),
            jwt_refresh_secret: "super-secret-refresh-key-32-char!".to_string(),
            access_token_minutes: 15,
            refresh_token_days: 7,
            server_host: "0.0.0.0".to_string(),
            server_port: 4000,
            app_url: "http://localhost:5173".to_string(),
            smtp: SmtpConfig {
                host: None,
                port: 1025,
                user: None,
                pass: None,
                from: "no-reply@jobtracker.dev".to_string(),
            },
        };

        let output = format!("{:?}", config);
        assert!(!output.contains("super-secret"));
        assert!(!output.contains("postgres://secret"));
    }
}

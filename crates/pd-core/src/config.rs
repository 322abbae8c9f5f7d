//! Configuration types and loading

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Authentication and session configuration
    pub auth: AuthConfig,

    /// Instance-specific settings
    pub instance: InstanceConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_seconds: u64,
    /// Public origin used when building magic-link callback URLs
    pub site_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Session cookie name
    pub cookie_name: String,
    /// Session lifetime in seconds
    pub session_lifetime_seconds: i64,
    /// Send the session cookie with the Secure attribute
    pub secure_cookies: bool,
    /// How long an emailed sign-in code stays redeemable, in seconds
    pub magic_link_lifetime_seconds: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InstanceConfig {
    /// Application title
    pub app_title: String,
    /// Time zone label shown next to dates
    pub timezone: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                request_timeout_seconds: 30,
                site_url: "http://localhost:8080".to_string(),
            },
            auth: AuthConfig {
                cookie_name: "_dashboard_session".to_string(),
                session_lifetime_seconds: 60 * 60 * 24 * 7,
                secure_cookies: true,
                magic_link_lifetime_seconds: 15 * 60,
            },
            instance: InstanceConfig {
                app_title: "Project Dashboard".to_string(),
                timezone: "UTC".to_string(),
            },
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // Server
        if let Some(host) = lookup("HOST") {
            config.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            config.server.port = parse_value("PORT", &port)?;
        }
        if let Some(url) = lookup("SITE_URL") {
            config.server.site_url = url.trim_end_matches('/').to_string();
        }

        // Auth
        if let Some(name) = lookup("SESSION_COOKIE_NAME") {
            config.auth.cookie_name = name;
        }
        if let Some(lifetime) = lookup("SESSION_LIFETIME_SECONDS") {
            config.auth.session_lifetime_seconds =
                parse_value("SESSION_LIFETIME_SECONDS", &lifetime)?;
        }
        if let Some(secure) = lookup("SESSION_COOKIE_SECURE") {
            config.auth.secure_cookies = parse_bool(&secure);
        }
        if let Some(lifetime) = lookup("MAGIC_LINK_LIFETIME_SECONDS") {
            config.auth.magic_link_lifetime_seconds =
                parse_value("MAGIC_LINK_LIFETIME_SECONDS", &lifetime)?;
        }

        // Instance
        if let Some(title) = lookup("APP_TITLE") {
            config.instance.app_title = title;
        }
        if let Some(tz) = lookup("TZ") {
            config.instance.timezone = tz;
        }

        Ok(config)
    }

    /// Get the server address
    pub fn server_addr(&self) -> std::net::SocketAddr {
        use std::net::SocketAddr;
        let ip: std::net::IpAddr = self.server.host.parse().unwrap_or([0, 0, 0, 0].into());
        SocketAddr::new(ip, self.server.port)
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}

fn parse_bool(raw: &str) -> bool {
    matches!(raw.trim(), "true" | "1" | "yes")
}

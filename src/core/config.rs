//! Configuration management for roombook
//!
//! Supports environment variables, config files, and runtime overrides.
//!
//! Config file location: ~/.config/roombook/config.toml

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::core::error::{Result, RoombookError};

/// Main configuration for roombook
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Booking portal configuration
    pub portal: PortalConfig,
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Chat passthrough configuration
    #[serde(default)]
    pub openai: OpenAiConfig,
}

/// Booking portal configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
    /// Login page URL
    pub login_url: String,
    /// Room booking page URL
    pub booking_url: String,
    /// Whether to run the browser without a visible UI (default: true)
    pub headless: bool,
    /// Portal account username (required before any booking attempt)
    pub username: Option<String>,
    /// Portal account password (required before any booking attempt)
    pub password: Option<String>,
    /// Room code to match against dropdown options, e.g. "2-L"
    pub room_code: String,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Port to bind (default: 5000)
    pub port: u16,
    /// Accepted API keys for bearer auth
    pub api_keys: Vec<String>,
    /// HS256 secret for JWT bearer tokens
    pub jwt_secret: Option<String>,
    /// Attach underlying error detail to failure responses
    pub debug_errors: bool,
    /// Comma-separated allowed CORS origins, or "*"
    pub allowed_origins: String,
}

/// Chat passthrough configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    /// API key; when absent /chat falls back to an echo response
    pub api_key: Option<String>,
    /// Model name (default: gpt-4o-mini)
    pub model: String,
    /// API base URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Portal credentials, present only once validated
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            portal: PortalConfig::default(),
            server: ServerConfig::default(),
            openai: OpenAiConfig::default(),
        }
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            login_url: env::var("ROOMBOOK_LOGIN_URL")
                .unwrap_or_else(|_| "https://members.industriousoffice.com".to_string()),
            booking_url: env::var("ROOMBOOK_BOOKING_URL").unwrap_or_else(|_| {
                "https://portal.industriousoffice.com/home/calendar/roombooking".to_string()
            }),
            headless: env::var("ROOMBOOK_HEADLESS")
                .map(|v| v != "0" && v != "false")
                .unwrap_or(true),
            username: env::var("ROOMBOOK_PORTAL_USERNAME").ok(),
            password: env::var("ROOMBOOK_PORTAL_PASSWORD").ok(),
            room_code: env::var("ROOMBOOK_ROOM_CODE").unwrap_or_else(|_| "2-L".to_string()),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            api_keys: env::var("ROOMBOOK_API_KEYS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|k| !k.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            jwt_secret: env::var("ROOMBOOK_JWT_SECRET").ok(),
            debug_errors: env::var("ROOMBOOK_DEBUG_ERRORS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            allowed_origins: env::var("ROOMBOOK_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: env::var("OPENAI_API_KEY").ok(),
            model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            timeout_secs: 60,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("roombook")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load() -> Self {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        // Try to load from config file
        if let Ok(config) = Self::load_from_file() {
            return config;
        }

        // Fall back to defaults (which respect env vars)
        Self::default()
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(RoombookError::config("Config file not found"));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| RoombookError::config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| RoombookError::config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Address for the HTTP listener
    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.server.port)
    }
}

impl ServerConfig {
    /// Whether bearer auth is turned off entirely.
    ///
    /// With no API keys and no JWT secret every caller is accepted as
    /// anonymous; `serve` warns loudly when this is the case.
    pub fn auth_disabled(&self) -> bool {
        self.api_keys.iter().all(|k| k.trim().is_empty())
            && self
                .jwt_secret
                .as_deref()
                .map_or(true, |s| s.trim().is_empty())
    }
}

impl PortalConfig {
    /// Resolve the portal credentials, failing fast when either is missing.
    ///
    /// Checked before any browser is launched.
    pub fn credentials(&self) -> Result<Credentials> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Ok(Credentials {
                    username: username.clone(),
                    password: password.clone(),
                })
            }
            _ => Err(RoombookError::config(
                "Portal credentials not configured",
            )),
        }
    }
}

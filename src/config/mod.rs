//! Configuration module for the HouseHunt backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::errors::AppError;

/// Settings for the third-party media host.
#[derive(Debug, Clone)]
pub struct MediaHostConfig {
    /// Upload API root, e.g. `https://api.cloudinary.com/v1_1`
    pub api_base: String,
    /// Account (cloud) name on the media host
    pub cloud_name: String,
    /// Unsigned upload preset
    pub upload_preset: String,
    /// Folder uploads are placed in
    pub folder: String,
    /// Trusted backend endpoint that performs privileged deletions
    pub delete_url: Option<String>,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for the admin API (required in production)
    pub api_psk: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Public origin used when building share links
    pub public_base_url: String,
    /// Contact line shown on public shortlist pages
    pub agent_contact: Option<String>,
    pub media: MediaHostConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_psk = env::var("HOUSEHUNT_API_PSK").ok();

        let db_path = env::var("HOUSEHUNT_DB_PATH")
            .unwrap_or_else(|_| "./data/househunt.sqlite".to_string())
            .into();

        let raw_addr =
            env::var("HOUSEHUNT_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let bind_addr = raw_addr.parse().map_err(|_| {
            AppError::Internal(format!("Invalid HOUSEHUNT_BIND_ADDR format: {}", raw_addr))
        })?;

        let log_level = env::var("HOUSEHUNT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let public_base_url = env::var("HOUSEHUNT_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .trim_end_matches('/')
            .to_string();

        let agent_contact = env::var("HOUSEHUNT_AGENT_CONTACT").ok();

        let media = MediaHostConfig {
            api_base: env::var("HOUSEHUNT_MEDIA_API_BASE")
                .unwrap_or_else(|_| "https://api.cloudinary.com/v1_1".to_string()),
            cloud_name: env::var("HOUSEHUNT_MEDIA_CLOUD_NAME")
                .unwrap_or_else(|_| "househunt".to_string()),
            upload_preset: env::var("HOUSEHUNT_MEDIA_UPLOAD_PRESET")
                .unwrap_or_else(|_| "househunt_unsigned".to_string()),
            folder: env::var("HOUSEHUNT_MEDIA_FOLDER")
                .unwrap_or_else(|_| "properties".to_string()),
            delete_url: env::var("HOUSEHUNT_MEDIA_DELETE_URL").ok(),
        };

        Ok(Self {
            api_psk,
            db_path,
            bind_addr,
            log_level,
            public_base_url,
            agent_contact,
            media,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        for key in [
            "HOUSEHUNT_API_PSK",
            "HOUSEHUNT_DB_PATH",
            "HOUSEHUNT_BIND_ADDR",
            "HOUSEHUNT_LOG_LEVEL",
            "HOUSEHUNT_PUBLIC_BASE_URL",
            "HOUSEHUNT_AGENT_CONTACT",
            "HOUSEHUNT_MEDIA_API_BASE",
            "HOUSEHUNT_MEDIA_CLOUD_NAME",
            "HOUSEHUNT_MEDIA_UPLOAD_PRESET",
            "HOUSEHUNT_MEDIA_FOLDER",
            "HOUSEHUNT_MEDIA_DELETE_URL",
        ] {
            env::remove_var(key);
        }

        let config = Config::from_env().unwrap();

        assert!(config.api_psk.is_none());
        assert_eq!(config.db_path, PathBuf::from("./data/househunt.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.public_base_url, "http://localhost:5173");
        assert_eq!(config.media.upload_preset, "househunt_unsigned");
        assert_eq!(config.media.folder, "properties");
        assert!(config.media.delete_url.is_none());
    }
}

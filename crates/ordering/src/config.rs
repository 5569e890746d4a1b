//! Ordering engine configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PEPPER_API_BASE_URL` - Base URL of the menu backend (e.g.
//!   `https://api.peppermenu.es/api/`)
//!
//! ## Optional
//! - `PEPPER_MESSAGING_HOST` - Messaging deep-link host (default: `wa.me`)
//! - `PEPPER_WHATSAPP_PHONE` - Fallback recipient when company settings
//!   carry none
//! - `PEPPER_CART_PATH` - Path of the persisted cart file (default:
//!   `cart.json`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::cart::{CartStore, FileStorage};
use crate::dispatch::{LinkOpener, NotificationDispatcher, DEFAULT_MESSAGING_HOST};
use crate::gateway::{AuthTokenProvider, OrderGateway};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Ordering engine configuration.
#[derive(Debug, Clone)]
pub struct OrderingConfig {
    /// Base URL of the menu backend API.
    pub api_base_url: Url,
    /// Host used for messaging deep links.
    pub messaging_host: String,
    /// Fallback messaging recipient when company settings carry none.
    pub whatsapp_phone: Option<String>,
    /// Where the persisted cart snapshot lives.
    pub cart_path: PathBuf,
}

impl OrderingConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_required_env("PEPPER_API_BASE_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("PEPPER_API_BASE_URL".to_string(), e.to_string())
            })?;
        let messaging_host = get_env_or_default("PEPPER_MESSAGING_HOST", DEFAULT_MESSAGING_HOST);
        let whatsapp_phone = get_optional_env("PEPPER_WHATSAPP_PHONE");
        let cart_path = PathBuf::from(get_env_or_default("PEPPER_CART_PATH", "cart.json"));

        Ok(Self {
            api_base_url,
            messaging_host,
            whatsapp_phone,
            cart_path,
        })
    }

    /// Open the durable cart store at the configured path.
    #[must_use]
    pub fn cart_store(&self) -> CartStore<FileStorage> {
        CartStore::open(FileStorage::new(&self.cart_path))
    }

    /// Build an order gateway against the configured backend.
    #[must_use]
    pub fn gateway<A: AuthTokenProvider>(&self, auth: A) -> OrderGateway<A> {
        OrderGateway::new(self.api_base_url.clone(), auth)
    }

    /// Build a notification dispatcher for the configured messaging host.
    pub fn dispatcher<O: LinkOpener>(&self, opener: O) -> NotificationDispatcher<O> {
        NotificationDispatcher::with_host(opener, self.messaging_host.clone())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> OrderingConfig {
        OrderingConfig {
            api_base_url: "http://localhost:8000/api/".parse().unwrap(),
            messaging_host: DEFAULT_MESSAGING_HOST.to_string(),
            whatsapp_phone: Some("+34623736566".to_string()),
            cart_path: std::env::temp_dir().join("pepper-menu-test-config/cart.json"),
        }
    }

    #[test]
    fn test_cart_store_opens_empty_without_file() {
        let _ = std::fs::remove_file(&config().cart_path);
        let cart = config().cart_store();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_dispatcher_uses_configured_host() {
        struct NullOpener;
        impl LinkOpener for NullOpener {
            fn open(&self, _url: &str) -> Result<(), crate::dispatch::OpenError> {
                Ok(())
            }
        }

        let mut cfg = config();
        cfg.messaging_host = "api.whatsapp.com".to_string();
        let dispatcher = cfg.dispatcher(NullOpener);
        let url = dispatcher.order_link("hola", "34623736566");
        assert!(url.starts_with("https://api.whatsapp.com/"));
    }

    #[test]
    fn test_missing_base_url_is_reported() {
        // the variable is never set in the test environment
        unsafe { std::env::remove_var("PEPPER_API_BASE_URL") };
        let result = OrderingConfig::from_env();
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
    }
}

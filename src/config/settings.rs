//! Application settings loaded from `config.toml`.
//!
//! Every field has a default, so a file containing only the sections an operator cares
//! about is valid. Secrets such as the email API key are read from the environment
//! instead (see [`crate::core::contact::ResendMailer::from_env`]).

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_VAR: &str = "DSX_CONFIG";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Contact-form email settings
    #[serde(default)]
    pub contact: ContactConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `"127.0.0.1:3000"`
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

/// Addresses used when forwarding a contact-form submission
#[derive(Debug, Clone, Deserialize)]
pub struct ContactConfig {
    /// Inboxes that receive new leads
    #[serde(default = "default_recipients")]
    pub recipients: Vec<String>,
    /// `From` header of the lead notification
    #[serde(default = "default_lead_sender")]
    pub lead_sender: String,
    /// `From` header of the confirmation sent back to the visitor
    #[serde(default = "default_confirmation_sender")]
    pub confirmation_sender: String,
    /// Phone number quoted in the confirmation email
    #[serde(default = "default_phone")]
    pub phone: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            recipients: default_recipients(),
            lead_sender: default_lead_sender(),
            confirmation_sender: default_confirmation_sender(),
            phone: default_phone(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_recipients() -> Vec<String> {
    vec!["contacto@dsx.example".to_string()]
}

fn default_lead_sender() -> String {
    "DSX Contact Form <onboarding@resend.dev>".to_string()
}

fn default_confirmation_sender() -> String {
    "DSX Team <onboarding@resend.dev>".to_string()
}

fn default_phone() -> String {
    "+1 (849) 397-0258".to_string()
}

/// Loads the application configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Loads the configuration from `$DSX_CONFIG`, or `./config.toml` when unset.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "config.toml".to_string());
    load_config(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [server]
            bind_address = "0.0.0.0:8080"

            [contact]
            recipients = ["ventas@empresa.com", "ceo@empresa.com"]
            lead_sender = "Leads <leads@empresa.com>"
            confirmation_sender = "Equipo <hola@empresa.com>"
            phone = "+1 (809) 555-0100"
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.contact.recipients.len(), 2);
        assert_eq!(config.contact.lead_sender, "Leads <leads@empresa.com>");
        assert_eq!(config.contact.phone, "+1 (809) 555-0100");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml_str = r#"
            [server]
            bind_address = "127.0.0.1:9000"
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:9000");
        assert_eq!(config.contact.confirmation_sender, "DSX Team <onboarding@resend.dev>");
        assert_eq!(config.contact.recipients, vec!["contacto@dsx.example".to_string()]);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = load_config("definitely/not/here.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertdeckConfig {
    pub version: String,
    pub server: ServerConfig,
    pub settings: Settings,
}

/// Where the certificate-management backend lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Ask before running every action against live targets.
    pub confirm_execute: bool,
    /// Ask before deleting an action.
    pub confirm_delete: bool,
    pub theme: String,
}

impl Default for CertdeckConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            server: ServerConfig::default(),
            settings: Settings::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            api_key: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            confirm_execute: true,
            confirm_delete: true,
            theme: "default".to_string(),
        }
    }
}

impl CertdeckConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

use serde::Deserialize;

use crumbs_core::config::{Config, split_csv};

/// Crumbs API configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct CrumbsConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server. Env var: `CRUMBS_PORT`.
    #[serde(default = "default_port")]
    pub crumbs_port: u16,
    /// Prefix of issued API keys (`{prefix}_...`).
    #[serde(default = "default_api_key_prefix")]
    pub api_key_prefix: String,
    /// Comma-separated CORS origins.
    #[serde(default = "default_frontend_url")]
    pub allowed_origins: String,
    /// Place lookup is disabled (503) when unset.
    pub google_places_api_key: Option<String>,
    #[serde(default = "default_google_places_base_url")]
    pub google_places_base_url: String,
    /// Reset emails are logged and skipped when unset.
    pub resend_api_key: Option<String>,
    #[serde(default = "default_resend_base_url")]
    pub resend_base_url: String,
    #[serde(default = "default_email_from")]
    pub email_from: String,
    /// Base of the reset link sent by email.
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
}

fn default_port() -> u16 {
    3000
}

fn default_api_key_prefix() -> String {
    "crumbs".to_owned()
}

fn default_frontend_url() -> String {
    "http://localhost:5173".to_owned()
}

fn default_google_places_base_url() -> String {
    "https://maps.googleapis.com/maps/api/place".to_owned()
}

fn default_resend_base_url() -> String {
    "https://api.resend.com".to_owned()
}

fn default_email_from() -> String {
    "Crumbs <noreply@crumbs.local>".to_owned()
}

impl Config for CrumbsConfig {}

impl CrumbsConfig {
    pub fn allowed_origins(&self) -> Vec<String> {
        split_csv(&self.allowed_origins)
    }
}

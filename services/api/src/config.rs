use serde::Deserialize;

use wordwell_core::config::Config;

fn default_api_port() -> u16 {
    3100
}

/// Api service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing JWT access tokens.
    pub jwt_secret: String,
    /// SMTP relay host for verification mail.
    pub smtp_host: String,
    /// SMTP username.
    pub smtp_user: String,
    /// SMTP password.
    pub smtp_pass: String,
    /// From address on outgoing mail (e.g. "Wordwell <no-reply@wordwell.app>").
    pub mail_from: String,
    /// TCP port to listen on (default 3100). Env var: `API_PORT`.
    #[serde(default = "default_api_port")]
    pub api_port: u16,
}

impl Config for ApiConfig {}

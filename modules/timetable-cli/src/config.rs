use std::env;

use anyhow::{Context, Result};
use tracing::info;

const DEFAULT_CLIENT_NAME: &str = "timetable-cli";

/// Connection settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host of the WebUntis instance, e.g. `mese.webuntis.com`
    pub server: String,
    pub school: String,
    pub user: String,
    pub password: String,
    /// Client name reported on `authenticate`
    pub client_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: required_env("UNTIS_SERVER")?,
            school: required_env("UNTIS_SCHOOL")?,
            user: required_env("UNTIS_USER")?,
            password: required_env("UNTIS_PASSWORD")?,
            client_name: env::var("UNTIS_CLIENT")
                .unwrap_or_else(|_| DEFAULT_CLIENT_NAME.to_string()),
        })
    }

    /// Log the configuration without the password.
    pub fn log_redacted(&self) {
        info!(
            server = self.server.as_str(),
            school = self.school.as_str(),
            user = self.user.as_str(),
            password = "********",
            client = self.client_name.as_str(),
            "Loaded config"
        );
    }
}

fn required_env(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} environment variable is required"))
}

use std::env;
use std::path::PathBuf;

use anyhow::Result;

use crate::api::client::DEFAULT_API_URL;

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
pub struct Config {
    /// Backend API base URL (defaults to http://localhost:8000).
    pub api_url: String,
    /// Local state directory — holds the disclaimer acceptance flag.
    pub state_dir: PathBuf,
    /// Admin password for the admin subcommands. Optional; when unset the
    /// admin commands prompt for it interactively.
    pub admin_password: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a sensible default except the admin password,
    /// which stays optional until an admin command needs it.
    pub fn load() -> Result<Self> {
        let state_dir = env::var("PHISHSCOPE_STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_state_dir());

        Ok(Self {
            api_url: env::var("PHISHSCOPE_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            state_dir,
            admin_password: env::var("PHISHSCOPE_ADMIN_PASSWORD").ok(),
        })
    }
}

/// Platform-appropriate state directory, e.g. ~/.local/share/phishscope.
fn default_state_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("phishscope"))
        .unwrap_or_else(|| PathBuf::from(".phishscope"))
}

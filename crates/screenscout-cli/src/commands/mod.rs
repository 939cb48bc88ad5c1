pub mod account;
pub mod browse;
pub mod clear;
pub mod config;
pub mod prompts;
pub mod watched;

use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use media_scout_config::{Config, CredentialStore, PathManager};
use media_scout_sources::{AppwriteClient, TmdbClient};
use std::time::Duration;

/// Loaded configuration plus credentials, and constructors for the remote
/// clients the commands share.
pub struct Services {
    pub config: Config,
    pub credentials: CredentialStore,
}

impl Services {
    pub fn load() -> Result<Self> {
        let path_manager = PathManager::default();
        let config_file = path_manager.config_file();
        if !config_file.exists() {
            return Err(eyre!(
                "No configuration found at {}. Run 'screenscout config' first.",
                config_file.display()
            ));
        }
        let config = Config::load_from_file(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        config.validate().map_err(|e| eyre!("Invalid configuration: {}", e))?;

        let mut credentials = CredentialStore::new(path_manager.credentials_file());
        credentials
            .load()
            .map_err(|e| eyre!("Failed to load credentials: {}", e))?;

        Ok(Self { config, credentials })
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.discovery.request_timeout_secs)
    }

    /// Metadata API client; requires the API token to be configured
    pub fn metadata(&self) -> Result<TmdbClient> {
        let token = self
            .credentials
            .get_tmdb_api_token()
            .ok_or_else(|| eyre!("TMDB API token not set. Run 'screenscout config tmdb' first."))?;
        Ok(TmdbClient::new(&self.config.tmdb, token.clone(), self.timeout()))
    }

    /// Document store client; requires the store section and API key
    pub fn store(&self) -> Result<AppwriteClient> {
        if !self.config.is_appwrite_configured() {
            return Err(eyre!(
                "Document store not configured. Run 'screenscout config appwrite' first."
            ));
        }
        let api_key = self.credentials.get_appwrite_api_key().ok_or_else(|| {
            eyre!("Appwrite API key not set. Run 'screenscout config appwrite' first.")
        })?;
        Ok(AppwriteClient::new(
            &self.config.appwrite,
            api_key.clone(),
            self.config.discovery.watched_page_limit,
            self.timeout(),
        ))
    }

    /// Resolved identity, if signed in
    pub fn user_id(&self) -> Option<String> {
        self.credentials.get_user_id().cloned()
    }
}

/// Spinner shown while a network fetch is pending. Human mode only; JSON and
/// quiet modes stay clean.
pub fn fetch_spinner(output: &Output, msg: &str) -> Option<ProgressBar> {
    if !output.is_human() || output.is_quiet() {
        return None;
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.blue} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(msg.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Some(spinner)
}

pub fn finish_spinner(spinner: Option<ProgressBar>) {
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
}

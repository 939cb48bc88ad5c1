use super::{fetch_spinner, finish_spinner, Services};
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use media_scout_config::{CredentialStore, PathManager};
use media_scout_core::WatchedManager;
use serde_json::json;
use std::sync::Arc;

fn open_credentials() -> Result<CredentialStore> {
    let path_manager = PathManager::default();
    let mut credentials = CredentialStore::new(path_manager.credentials_file());
    credentials
        .load()
        .map_err(|e| eyre!("Failed to load credentials: {}", e))?;
    Ok(credentials)
}

pub async fn run_login(user_id: &str, output: &Output) -> Result<()> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(eyre!("User id cannot be empty"));
    }

    let mut credentials = open_credentials()?;
    credentials.set_user_id(user_id.to_string());
    credentials
        .save()
        .map_err(|e| eyre!("Failed to save credentials: {}", e))?;

    output.json(&json!({"type": "login", "user_id": user_id}));
    output.success(format!("Signed in as {}.", user_id));

    // Best effort: when the store is reachable, mention how much is on the list
    if let Ok(services) = Services::load() {
        if let Ok(store) = services.store() {
            let spinner = fetch_spinner(output, "Checking your watched list...");
            let manager = WatchedManager::new(Arc::new(store));
            manager.set_user(Some(user_id)).await;
            finish_spinner(spinner);
            output.info(format!(
                "{} watched title(s) on record.",
                manager.watched_count()
            ));
        }
    }
    Ok(())
}

pub fn run_logout(output: &Output) -> Result<()> {
    let mut credentials = open_credentials()?;
    let had_user = credentials.get_user_id().cloned();
    credentials.clear_user_id();
    credentials
        .save()
        .map_err(|e| eyre!("Failed to save credentials: {}", e))?;

    output.json(&json!({"type": "logout", "user_id": had_user}));
    match had_user {
        Some(user_id) => output.success(format!("Signed out {}.", user_id)),
        None => output.info("Already signed out."),
    }
    Ok(())
}

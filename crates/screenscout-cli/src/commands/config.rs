use super::prompts;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use media_scout_config::{Config, CredentialStore, PathManager};
use media_scout_sources::{MetadataProvider, TmdbClient};
use media_scout_models::MediaType;
use serde_json::json;
use std::time::Duration;

fn mask(value: &str) -> String {
    match value.get(..4) {
        Some(prefix) if value.len() > 4 => format!("{}****", prefix),
        _ => "****".to_string(),
    }
}

fn load_or_template(path_manager: &PathManager) -> Config {
    let config_file = path_manager.config_file();
    if config_file.exists() {
        Config::load_from_file(&config_file).unwrap_or_else(|_| Config::template())
    } else {
        Config::template()
    }
}

fn load_credentials(path_manager: &PathManager) -> Result<CredentialStore> {
    let mut credentials = CredentialStore::new(path_manager.credentials_file());
    credentials
        .load()
        .map_err(|e| eyre!("Failed to load credentials: {}", e))?;
    Ok(credentials)
}

pub fn run_show(full: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();
    if !config_file.exists() {
        output.info("No configuration found. Run 'screenscout config' to create one.");
        return Ok(());
    }

    let config = Config::load_from_file(&config_file)
        .map_err(|e| eyre!("Failed to load config: {}", e))?;
    let credentials = load_credentials(&path_manager)?;

    let reveal = |value: Option<&String>| match value {
        Some(v) if full => v.clone(),
        Some(v) => mask(v),
        None => "(not set)".to_string(),
    };

    output.json(&json!({
        "type": "config",
        "config_file": config_file.display().to_string(),
        "tmdb": {
            "base_url": config.tmdb.base_url,
            "language": config.tmdb.language,
            "token_set": credentials.get_tmdb_api_token().is_some(),
        },
        "appwrite": {
            "enabled": config.appwrite.enabled,
            "endpoint": config.appwrite.endpoint,
            "project_id": config.appwrite.project_id,
            "database_id": config.appwrite.database_id,
            "watched_collection_id": config.appwrite.watched_collection_id,
            "metrics_collection_id": config.appwrite.metrics_collection_id,
            "api_key_set": credentials.get_appwrite_api_key().is_some(),
        },
        "user_id": credentials.get_user_id(),
    }));

    if !output.is_human() {
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec![
        Cell::new("Setting").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Value").add_attribute(comfy_table::Attribute::Bold),
    ]);
    table.add_row(vec![Cell::new("Config file"), Cell::new(config_file.display())]);
    table.add_row(vec![Cell::new("TMDB base URL"), Cell::new(&config.tmdb.base_url)]);
    table.add_row(vec![Cell::new("TMDB language"), Cell::new(&config.tmdb.language)]);
    table.add_row(vec![
        Cell::new("TMDB API token"),
        Cell::new(reveal(credentials.get_tmdb_api_token())),
    ]);
    table.add_row(vec![
        Cell::new("Appwrite endpoint"),
        Cell::new(&config.appwrite.endpoint),
    ]);
    table.add_row(vec![
        Cell::new("Appwrite project"),
        Cell::new(&config.appwrite.project_id),
    ]);
    table.add_row(vec![
        Cell::new("Appwrite database"),
        Cell::new(&config.appwrite.database_id),
    ]);
    table.add_row(vec![
        Cell::new("Watched collection"),
        Cell::new(&config.appwrite.watched_collection_id),
    ]);
    table.add_row(vec![
        Cell::new("Metrics collection"),
        Cell::new(&config.appwrite.metrics_collection_id),
    ]);
    table.add_row(vec![
        Cell::new("Appwrite API key"),
        Cell::new(reveal(credentials.get_appwrite_api_key())),
    ]);
    table.add_row(vec![
        Cell::new("Signed-in user"),
        Cell::new(
            credentials
                .get_user_id()
                .cloned()
                .unwrap_or_else(|| "(signed out)".to_string()),
        ),
    ]);
    output.println(table.to_string());
    Ok(())
}

pub async fn run_tmdb(token: Option<String>, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config = load_or_template(&path_manager);
    let mut credentials = load_credentials(&path_manager)?;

    let token = match token {
        Some(token) => token,
        None => prompts::prompt_password("TMDB API read access token")?,
    };
    let token = token.trim().to_string();
    if token.is_empty() {
        return Err(eyre!("Token cannot be empty"));
    }

    output.info("Verifying token...");
    let spinner = super::fetch_spinner(output, "Contacting TMDB...");
    let client = TmdbClient::new(&config.tmdb, token.clone(), Duration::from_secs(10));
    let verified = client.default_listing(MediaType::Movie).await;
    super::finish_spinner(spinner);

    match verified {
        Ok(_) => output.success("Token verified."),
        Err(e) => {
            output.warn(format!("Token verification failed: {}", e));
            if !prompts::prompt_yes_no("Save it anyway?", Some(false))? {
                return Err(eyre!("Token verification failed"));
            }
        }
    }

    credentials.set_tmdb_api_token(token);
    credentials
        .save()
        .map_err(|e| eyre!("Failed to save credentials: {}", e))?;
    config
        .save_to_file(&path_manager.config_file())
        .map_err(|e| eyre!("Failed to save config: {}", e))?;

    output.success("TMDB configuration saved.");
    Ok(())
}

pub fn run_appwrite(output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let mut config = load_or_template(&path_manager);
    let mut credentials = load_credentials(&path_manager)?;

    output.println("Document store setup. Values come from your Appwrite project.");

    let endpoint = prompts::prompt_string("Endpoint", Some(&config.appwrite.endpoint))?;
    let project_id = prompts::prompt_string("Project id", existing(&config.appwrite.project_id))?;
    let database_id = prompts::prompt_string("Database id", existing(&config.appwrite.database_id))?;
    let watched_collection_id = prompts::prompt_string(
        "Watched collection id",
        existing(&config.appwrite.watched_collection_id),
    )?;
    let metrics_collection_id = prompts::prompt_string(
        "Search metrics collection id",
        existing(&config.appwrite.metrics_collection_id),
    )?;
    let api_key = prompts::prompt_password("API key (leave empty to keep current)")?;

    config.appwrite.enabled = true;
    config.appwrite.endpoint = endpoint.trim().to_string();
    config.appwrite.project_id = project_id.trim().to_string();
    config.appwrite.database_id = database_id.trim().to_string();
    config.appwrite.watched_collection_id = watched_collection_id.trim().to_string();
    config.appwrite.metrics_collection_id = metrics_collection_id.trim().to_string();

    if !api_key.trim().is_empty() {
        credentials.set_appwrite_api_key(api_key.trim().to_string());
    } else if credentials.get_appwrite_api_key().is_none() {
        output.warn("No API key stored; watched-list commands will not work until one is set.");
    }

    config
        .validate()
        .map_err(|e| eyre!("Configuration incomplete: {}", e))?;
    config
        .save_to_file(&path_manager.config_file())
        .map_err(|e| eyre!("Failed to save config: {}", e))?;
    credentials
        .save()
        .map_err(|e| eyre!("Failed to save credentials: {}", e))?;

    output.success("Document store configuration saved.");
    Ok(())
}

pub async fn run_interactive(output: &Output) -> Result<()> {
    output.println("Screenscout setup");
    output.println("");

    run_tmdb(None, output).await?;

    output.println("");
    if prompts::prompt_yes_no(
        "Configure the document store for watched lists and suggestions?",
        Some(true),
    )? {
        run_appwrite(output)?;
    }

    output.println("");
    output.success("Setup complete. Sign in with 'screenscout login <user-id>' to track watched titles.");
    Ok(())
}

/// Use the stored value as prompt default unless it is still a placeholder
fn existing(value: &str) -> Option<&str> {
    if value.is_empty() || value.starts_with("YOUR_") {
        None
    } else {
        Some(value)
    }
}

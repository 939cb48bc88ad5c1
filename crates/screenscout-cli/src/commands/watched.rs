use super::{fetch_spinner, finish_spinner, Services};
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use media_scout_core::{DiscoverOrchestrator, ToggleOutcome, WatchedManager};
use media_scout_models::MediaType;
use serde_json::json;
use std::sync::Arc;

/// Build the manager for the signed-in user and load their set
async fn signed_in_manager(services: &Services) -> Result<(Arc<WatchedManager>, String)> {
    let user_id = services
        .user_id()
        .ok_or_else(|| eyre!("Not signed in. Run 'screenscout login <user-id>' first."))?;
    let store = Arc::new(services.store()?);
    let manager = Arc::new(WatchedManager::new(store));
    manager.set_user(Some(&user_id)).await;
    Ok((manager, user_id))
}

pub async fn run_list(details: bool, output: &Output) -> Result<()> {
    let services = Services::load()?;
    let spinner = fetch_spinner(output, "Loading watched list...");
    let (manager, user_id) = match signed_in_manager(&services).await {
        Ok(loaded) => loaded,
        Err(e) => {
            finish_spinner(spinner);
            return Err(e);
        }
    };
    finish_spinner(spinner);

    let keys = manager.watched_keys();
    if keys.is_empty() {
        output.info(format!("No watched titles for {}.", user_id));
        output.json(&json!({"type": "watched", "user_id": user_id, "items": []}));
        return Ok(());
    }

    if details {
        let orchestrator = DiscoverOrchestrator::new(Arc::new(services.metadata()?));
        let spinner = fetch_spinner(output, "Fetching title details...");
        let hydrated = orchestrator.hydrate_watched(&keys).await;
        finish_spinner(spinner);

        output.json(&json!({
            "type": "watched",
            "user_id": user_id,
            "items": serde_json::to_value(&hydrated).unwrap_or_default(),
        }));
        if output.is_human() {
            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            table.set_header(vec![
                Cell::new("Id"),
                Cell::new("Title"),
                Cell::new("Type"),
                Cell::new("Year"),
            ]);
            for item in &hydrated {
                table.add_row(vec![
                    Cell::new(item.id),
                    Cell::new(&item.title),
                    Cell::new(item.media_type),
                    Cell::new(item.year().unwrap_or("N/A")),
                ]);
            }
            output.println(table.to_string());
        }
        return Ok(());
    }

    output.json(&json!({
        "type": "watched",
        "user_id": user_id,
        "items": serde_json::to_value(&keys).unwrap_or_default(),
    }));
    if output.is_human() {
        let mut table = Table::new();
        table.load_preset(comfy_table::presets::UTF8_FULL);
        table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
        table.set_header(vec![Cell::new("Type"), Cell::new("Id")]);
        for key in &keys {
            table.add_row(vec![Cell::new(key.media_type), Cell::new(key.media_id)]);
        }
        output.println(table.to_string());
    }
    Ok(())
}

pub async fn run_toggle(media_type: MediaType, id: u64, output: &Output) -> Result<()> {
    tracing::debug!("Toggle command started for {} {}", media_type, id);

    let services = Services::load()?;
    let spinner = fetch_spinner(output, "Updating watched list...");
    let result = signed_in_manager(&services).await;
    let (manager, _user_id) = match result {
        Ok(loaded) => loaded,
        Err(e) => {
            finish_spinner(spinner);
            return Err(e);
        }
    };
    let outcome = manager.toggle_watched(media_type, id).await;
    finish_spinner(spinner);

    output.json(&json!({
        "type": "toggle",
        "media_type": media_type,
        "media_id": id,
        "outcome": format!("{:?}", outcome),
        "watched": manager.is_watched(media_type, id),
    }));

    match outcome {
        ToggleOutcome::Added => output.success(format!("Marked {} {} as watched.", media_type, id)),
        ToggleOutcome::Removed => {
            output.success(format!("Removed {} {} from your watched list.", media_type, id))
        }
        ToggleOutcome::Reverted => {
            output.warn("The remote store rejected the update; your list is unchanged.")
        }
        ToggleOutcome::Pending => output.warn("Another update for this title is still pending."),
        ToggleOutcome::SignedOut => {
            return Err(eyre!("Not signed in. Run 'screenscout login <user-id>' first."))
        }
    }
    Ok(())
}

pub async fn run_count(output: &Output) -> Result<()> {
    let services = Services::load()?;
    let spinner = fetch_spinner(output, "Loading watched list...");
    let result = signed_in_manager(&services).await;
    finish_spinner(spinner);
    let (manager, user_id) = result?;

    let count = manager.watched_count();
    output.json(&json!({"type": "watched_count", "user_id": user_id, "count": count}));
    output.info(format!("{} watched title(s) for {}.", count, user_id));
    Ok(())
}

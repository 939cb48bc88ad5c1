use super::{fetch_spinner, finish_spinner, Services};
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use media_scout_core::{
    filter_by_media_type, suggested_titles, DiscoverOrchestrator, MediaFilter, WatchedManager,
};
use media_scout_models::{MediaDetails, MediaItem, MediaType};
use serde_json::json;
use std::sync::Arc;

pub async fn run_search(
    query: &str,
    filter: MediaFilter,
    limit: usize,
    output: &Output,
) -> Result<()> {
    tracing::debug!("Search command started");

    let services = Services::load()?;
    let (orchestrator, manager) = build_orchestrator(&services).await?;
    let user_id = services.user_id();

    let spinner = fetch_spinner(output, "Searching movies and series...");
    let results = orchestrator.browse(Some(query), user_id.as_deref()).await;
    finish_spinner(spinner);

    let results = results.map_err(|e| eyre!("Search failed: {}", e))?;
    render_media_list(results, filter, limit, manager.as_deref(), output);
    Ok(())
}

pub async fn run_discover(
    filter: MediaFilter,
    watched_only: bool,
    limit: usize,
    output: &Output,
) -> Result<()> {
    let services = Services::load()?;
    let (orchestrator, manager) = build_orchestrator(&services).await?;

    if watched_only {
        let Some(manager) = manager else {
            return Err(eyre!(
                "The watched-only view requires sign-in and a configured document store."
            ));
        };
        let keys = manager.watched_keys();
        if keys.is_empty() {
            output.info("Your watched list is empty.");
            output.json(&json!({"type": "watched_media", "items": []}));
            return Ok(());
        }

        let spinner = fetch_spinner(output, "Loading your watched titles...");
        let mut details = orchestrator.hydrate_watched(&keys).await;
        finish_spinner(spinner);

        details.retain(|d| filter.matches(d.media_type));
        details.truncate(limit);
        render_details_table(&details, output);
        return Ok(());
    }

    let spinner = fetch_spinner(output, "Fetching top movies and series...");
    let results = orchestrator.browse(None, None).await;
    finish_spinner(spinner);

    let results = results.map_err(|e| eyre!("Fetch failed: {}", e))?;
    render_media_list(results, filter, limit, manager.as_deref(), output);
    Ok(())
}

pub async fn run_show(media_type: MediaType, id: u64, output: &Output) -> Result<()> {
    let services = Services::load()?;
    let (orchestrator, manager) = build_orchestrator(&services).await?;

    let spinner = fetch_spinner(output, "Fetching details...");
    let details = orchestrator.details(media_type, id).await;
    finish_spinner(spinner);

    let details = details.map_err(|e| eyre!("{}", e))?;
    let watched = manager
        .as_deref()
        .map(|m| m.is_watched(media_type, id));
    render_details(&details, watched, output);
    Ok(())
}

pub async fn run_trending(output: &Output) -> Result<()> {
    let services = Services::load()?;
    let store = services.store()?;
    let user_id = services.user_id();

    let spinner = fetch_spinner(output, "Fetching suggestions...");
    let suggestions = suggested_titles(
        &store,
        user_id.as_deref(),
        services.config.discovery.trending_limit,
    )
    .await;
    finish_spinner(spinner);

    if suggestions.is_empty() {
        output.info("No suggestions yet. Search for something first.");
        output.json(&json!({"type": "trending", "items": []}));
        return Ok(());
    }

    output.json(&json!({
        "type": "trending",
        "items": serde_json::to_value(&suggestions).unwrap_or_default(),
    }));

    if output.is_human() {
        let mut table = Table::new();
        table.load_preset(comfy_table::presets::UTF8_FULL);
        table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
        table.set_header(vec![
            Cell::new("#"),
            Cell::new("Search term"),
            Cell::new("Count"),
            Cell::new("Top title id"),
        ]);
        for (index, metric) in suggestions.iter().enumerate() {
            table.add_row(vec![
                Cell::new(index + 1),
                Cell::new(&metric.search_term),
                Cell::new(metric.count),
                Cell::new(metric.movie_id),
            ]);
        }
        output.println(table.to_string());
    }
    Ok(())
}

/// Orchestrator plus, when signed in against a configured store, a loaded
/// watched manager for marking rows
async fn build_orchestrator(
    services: &Services,
) -> Result<(DiscoverOrchestrator, Option<Arc<WatchedManager>>)> {
    let metadata = Arc::new(services.metadata()?);
    let mut orchestrator = DiscoverOrchestrator::new(metadata);

    let mut manager = None;
    if let Some(user_id) = services.user_id() {
        if let Ok(store) = services.store() {
            let store = Arc::new(store);
            orchestrator = orchestrator.with_metrics(store.clone());
            let loaded = Arc::new(WatchedManager::new(store));
            loaded.set_user(Some(&user_id)).await;
            manager = Some(loaded);
        }
    }
    Ok((orchestrator, manager))
}

fn render_media_list(
    results: Vec<MediaItem>,
    filter: MediaFilter,
    limit: usize,
    manager: Option<&WatchedManager>,
    output: &Output,
) {
    let mut results = filter_by_media_type(results, filter);
    results.truncate(limit);

    if results.is_empty() {
        output.warn("No movies or series found.");
        output.json(&json!({"type": "media", "items": []}));
        return;
    }

    output.json(&json!({
        "type": "media",
        "items": serde_json::to_value(&results).unwrap_or_default(),
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
            Cell::new("Lang"),
            Cell::new("Rating"),
            Cell::new("Watched"),
        ]);
        for item in &results {
            let watched = manager
                .map(|m| m.is_watched(item.media_type, item.id))
                .unwrap_or(false);
            table.add_row(vec![
                Cell::new(item.id),
                Cell::new(&item.title),
                Cell::new(item.media_type),
                Cell::new(item.year().unwrap_or("N/A")),
                Cell::new(&item.original_language),
                Cell::new(format_rating(item.vote_average)),
                Cell::new(if watched { "✓" } else { "" }),
            ]);
        }
        output.println(table.to_string());
    }
}

fn render_details_table(details: &[MediaDetails], output: &Output) {
    output.json(&json!({
        "type": "watched_media",
        "items": serde_json::to_value(details).unwrap_or_default(),
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
            Cell::new("Rating"),
        ]);
        for item in details {
            table.add_row(vec![
                Cell::new(item.id),
                Cell::new(&item.title),
                Cell::new(item.media_type),
                Cell::new(item.year().unwrap_or("N/A")),
                Cell::new(format_rating(item.vote_average)),
            ]);
        }
        output.println(table.to_string());
    }
}

fn render_details(details: &MediaDetails, watched: Option<bool>, output: &Output) {
    output.json(&json!({
        "type": "details",
        "watched": watched,
        "item": serde_json::to_value(details).unwrap_or_default(),
    }));

    if !output.is_human() {
        return;
    }

    output.println(format!(
        "{} ({}) [{}]",
        details.title,
        details.year().unwrap_or("N/A"),
        details.media_type
    ));
    output.println(format!("Rating: {}", format_rating(details.vote_average)));
    if !details.genres.is_empty() {
        let genres: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
        output.println(format!("Genres: {}", genres.join(", ")));
    }
    if let Some(runtime) = details.runtime {
        output.println(format!("Runtime: {} min", runtime));
    }
    if let Some(seasons) = details.number_of_seasons {
        let episodes = details
            .number_of_episodes
            .map(|n| format!(", {} episodes", n))
            .unwrap_or_default();
        output.println(format!("Seasons: {}{}", seasons, episodes));
    }
    if let Some(budget) = details.budget {
        output.println(format!("Budget: ${}", budget));
    }
    if let Some(revenue) = details.revenue {
        output.println(format!("Revenue: ${}", revenue));
    }
    if !details.overview.is_empty() {
        output.println("");
        output.println(&details.overview);
    }
    if let Some(watched) = watched {
        output.println("");
        output.println(if watched {
            "On your watched list."
        } else {
            "Not on your watched list."
        });
    }
}

fn format_rating(vote_average: f64) -> String {
    if vote_average > 0.0 {
        format!("{:.1}", vote_average)
    } else {
        "N/A".to_string()
    }
}

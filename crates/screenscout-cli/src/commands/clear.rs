use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use media_scout_config::PathManager;
use std::path::Path;

fn remove_if_exists(path: &Path, label: &str, output: &Output) -> Result<()> {
    if path.exists() {
        std::fs::remove_file(path)
            .map_err(|e| eyre!("Failed to remove {}: {}", path.display(), e))?;
        output.success(format!("Removed {} ({}).", label, path.display()));
    } else {
        output.info(format!("No {} to remove.", label));
    }
    Ok(())
}

pub fn run_clear(all: bool, config: bool, credentials: bool, output: &Output) -> Result<()> {
    if !all && !config && !credentials {
        return Err(eyre!(
            "Nothing selected. Use --config, --credentials, or --all."
        ));
    }

    let path_manager = PathManager::default();
    if all || config {
        remove_if_exists(&path_manager.config_file(), "config", output)?;
    }
    if all || credentials {
        remove_if_exists(&path_manager.credentials_file(), "credentials", output)?;
    }
    Ok(())
}

//! Init command - write a default ihs.toml

use anyhow::{Context, Result};
use console::style;
use ihs::config::{CONFIG_FILE_NAME, DEFAULT_CONFIG_TEMPLATE};
use std::path::Path;

/// Run the init command
pub(super) fn run(path: &Path) -> Result<()> {
    let repo_path = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !repo_path.is_dir() {
        anyhow::bail!("Path is not a directory: {}", repo_path.display());
    }

    let config_path = repo_path.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        anyhow::bail!(
            "{} already exists; remove it first to regenerate",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to create {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );

    println!("\nNext steps:");
    println!("  {} Adjust layout and check commands", style(CONFIG_FILE_NAME).cyan());
    println!("  {} Score the repository", style("ihs score .").cyan());

    Ok(())
}

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::utils::{load_config, resolve_config_path, ConfigSource};
use crate::config::EXAMPLE_CONFIG;

/// Write the example configuration file
pub fn run_init(output: Option<PathBuf>, explicit_config: Option<&Path>, force: bool) -> Result<PathBuf> {
    let output_path = match output {
        Some(path) => path,
        None => resolve_config_path(explicit_config)?,
    };

    if output_path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists: {}\nUse --force to overwrite",
            output_path.display()
        );
    }

    crate::platform::write_private_file(&output_path, EXAMPLE_CONFIG.as_bytes())
        .with_context(|| format!("Failed to write config file: {}", output_path.display()))?;

    println!("✓ Created configuration file: {}", output_path.display());
    println!("\nFill in the [delivery] section with your EmailJS service id,");
    println!("template id and public key, or export:");
    println!("  PUNCH_CLOCK_SERVICE_ID, PUNCH_CLOCK_TEMPLATE_ID, PUNCH_CLOCK_PUBLIC_KEY");
    println!("\nThen start tracking: punch-clock start");

    Ok(output_path)
}

/// Print the effective configuration with secrets masked
pub fn run_show_config(explicit_config: Option<&Path>) -> Result<()> {
    let (source, config) = load_config(explicit_config)?;

    match &source {
        ConfigSource::File(path) => println!("# Configuration file: {}", path.display()),
        ConfigSource::Defaults(path) => {
            println!("# Configuration file: {} (not found, using defaults)", path.display())
        }
    }

    let rendered = toml::to_string_pretty(&config.redacted())
        .context("Failed to serialize config")?;
    println!("{}", rendered);

    if let Err(e) = config.validate(true) {
        println!("# Warning: {:#}", e);
    }

    Ok(())
}

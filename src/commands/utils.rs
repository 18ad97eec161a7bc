use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::config::{get_config_path, Config};

/// Initialize logging
///
/// `RUST_LOG` wins; otherwise `--verbose` selects debug and the configured
/// level applies. Output goes to stderr so it stays out of the prompt.
pub fn init_logging(verbose: bool, configured_level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if verbose { "debug" } else { configured_level };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

/// Resolve the config path from the command line or the platform default
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => get_config_path(),
    }
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// No file at this path; defaults plus environment
    Defaults(PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> &Path {
        match self {
            ConfigSource::File(path) | ConfigSource::Defaults(path) => path,
        }
    }

    /// Report the source; call once logging is initialized
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => {
                tracing::debug!("Using configuration: {}", path.display())
            }
            ConfigSource::Defaults(path) => {
                tracing::debug!("No config file at {}, using defaults", path.display())
            }
        }
    }
}

/// Load configuration (with environment overrides) from the resolved path
///
/// Runs before the subscriber exists, so the source is returned for
/// logging instead of being logged here.
pub fn load_config(explicit: Option<&Path>) -> Result<(ConfigSource, Config)> {
    let path = resolve_config_path(explicit)?;
    let source = if path.exists() {
        ConfigSource::File(path)
    } else {
        ConfigSource::Defaults(path)
    };
    let config = Config::load_or_default(source.path())?;
    Ok((source, config))
}

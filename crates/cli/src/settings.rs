use anyhow::{Context, Result};
use relmap_graph::{AnalyzerConfig, InheritanceDiscovery};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "RELMAP_CONFIG";

/// Command-line values that take precedence over the config file
#[derive(Debug, Default)]
pub struct Overrides {
    pub namespace: Option<String>,
    pub exclude: Vec<String>,
    pub inheritance: Option<InheritanceDiscovery>,
    pub max_objects: Option<usize>,
}

/// Config file from `--config`, else `$RELMAP_CONFIG`, else defaults
pub fn load(explicit: Option<&Path>) -> Result<AnalyzerConfig> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));

    let Some(path) = path else {
        return Ok(AnalyzerConfig::default());
    };

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: AnalyzerConfig = toml::from_str(&raw)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

pub fn apply(mut config: AnalyzerConfig, overrides: Overrides) -> AnalyzerConfig {
    if let Some(namespace) = overrides.namespace {
        config.target_namespace = Some(namespace);
    }
    for name in overrides.exclude {
        if !config.excluded.contains(&name) {
            config.excluded.push(name);
        }
    }
    if let Some(mode) = overrides.inheritance {
        config.inheritance = mode;
    }
    if overrides.max_objects.is_some() {
        config.max_objects = overrides.max_objects;
    }
    config
}

pub fn to_toml(config: &AnalyzerConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize config")
}

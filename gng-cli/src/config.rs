use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gng_core::Settings;
use serde::Deserialize;

/// Environment variable naming a configuration file.
pub const CONFIG_ENV: &str = "GNG_CONFIG";

/// Layout of the TOML configuration file.
///
/// ```toml
/// [generation]
/// ngram = 3
/// length = 12
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
struct FileConfig {
	#[serde(default)]
	generation: Settings,
}

/// Loads settings from `explicit`, else from `$GNG_CONFIG`, else defaults.
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
	let Some(path) = resolve_config_path(explicit) else {
		return Ok(Settings::default());
	};

	let raw = fs::read_to_string(&path)
		.with_context(|| format!("failed to read config file {}", path.display()))?;
	parse(&raw).with_context(|| format!("failed to parse TOML from {}", path.display()))
}

fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
	if let Some(path) = explicit {
		return Some(path.to_path_buf());
	}
	env::var_os(CONFIG_ENV).map(PathBuf::from)
}

pub fn parse(raw: &str) -> Result<Settings, toml::de::Error> {
	Ok(toml::from_str::<FileConfig>(raw)?.generation)
}

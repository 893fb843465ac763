use std::{fs, path::Path};

use anyhow::{Context, Result};
use road_skirmish_core::EncounterConfig;

/// Loads the encounter configuration at `path`, or the reference encounter when absent.
pub(crate) fn load(path: Option<&Path>) -> Result<EncounterConfig> {
    let Some(path) = path else {
        return Ok(EncounterConfig::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read encounter config at {}", path.display()))?;
    parse(&contents)
        .with_context(|| format!("invalid encounter config at {}", path.display()))
}

fn parse(contents: &str) -> Result<EncounterConfig> {
    toml::from_str(contents).context("failed to parse encounter config toml contents")
}

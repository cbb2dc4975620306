// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of WhenTo.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Default run settings loaded from `whento.toml`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};
use whento_types::RunWhen;

pub const DEFAULT_CONFIG_PATH: &str = "whento.toml";

fn default_table() -> String {
    "table".to_owned()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhenToConfig {
    /// Run duration used when neither --duration nor an appliance gives one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_duration_minutes: Option<i64>,

    /// Power draw used when neither --power nor an appliance gives one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_power_watts: Option<f64>,

    /// Look-ahead used when --when is not given
    #[serde(default)]
    pub default_when: RunWhen,

    /// Appliance preset used when --appliance is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_appliance: Option<String>,

    /// Pin the classification thresholds to a year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification_year: Option<i32>,

    /// Output format: table, json or csv
    #[serde(default = "default_table")]
    pub output: String,
}

impl Default for WhenToConfig {
    fn default() -> Self {
        Self {
            default_duration_minutes: None,
            default_power_watts: None,
            default_when: RunWhen::Whenever,
            default_appliance: None,
            classification_year: None,
            output: default_table(),
        }
    }
}

/// Load the config from `path` (or the default location). A missing file
/// yields the defaults.
pub fn load_config(path: Option<&Path>) -> Result<WhenToConfig> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
    if !path.exists() {
        debug!("No config at {}, using defaults", path.display());
        return Ok(WhenToConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config at {}", path.display()))?;
    let config: WhenToConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config at {}", path.display()))?;

    info!("Loaded config from {}", path.display());
    Ok(config)
}

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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Share of one fuel in the generation mix (percent, 0-100)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixEntry {
    pub fuel: String,
    #[serde(alias = "perc")]
    pub percent: f64,
}

impl MixEntry {
    pub fn new(fuel: impl Into<String>, percent: f64) -> Self {
        Self {
            fuel: fuel.into(),
            percent,
        }
    }
}

/// A single forecast block (30 minutes in practice)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBlock {
    /// Start of this block
    pub from: DateTime<Utc>,

    /// End of this block (exclusive)
    pub to: DateTime<Utc>,

    /// Forecast carbon intensity (gCO2/kWh)
    pub intensity: f64,

    /// Generation mix for this block
    #[serde(default)]
    pub generation_mix: Vec<MixEntry>,
}

impl TimeBlock {
    /// Block width in whole minutes, derived from `to - from`
    pub fn duration_minutes(&self) -> i64 {
        (self.to - self.from).num_minutes()
    }
}

/// Ordered sequence of forecast blocks for one location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Opaque location identifier (postcode or region name), passed through for display
    pub location: String,

    /// Numeric region id, when the source provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<u32>,

    /// Distribution network operator region name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dno_region: Option<String>,

    /// Contiguous blocks, ascending by `from`
    pub blocks: Vec<TimeBlock>,
}

impl Forecast {
    pub fn new(location: impl Into<String>, blocks: Vec<TimeBlock>) -> Self {
        Self {
            location: location.into(),
            region_id: None,
            dno_region: None,
            blocks,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Start of the first block
    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        self.blocks.first().map(|b| b.from)
    }

    /// End of the last block
    pub fn ends_at(&self) -> Option<DateTime<Utc>> {
        self.blocks.last().map(|b| b.to)
    }

    /// Total minutes covered by all blocks
    pub fn total_minutes(&self) -> i64 {
        self.blocks.iter().map(TimeBlock::duration_minutes).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn block(start: DateTime<Utc>, minutes: i64, intensity: f64) -> TimeBlock {
        TimeBlock {
            from: start,
            to: start + Duration::minutes(minutes),
            intensity,
            generation_mix: Vec::new(),
        }
    }

    #[test]
    fn test_block_duration_is_derived() {
        let start = Utc.with_ymd_and_hms(2024, 5, 10, 23, 30, 0).unwrap();
        assert_eq!(block(start, 30, 100.0).duration_minutes(), 30);
        assert_eq!(block(start, 15, 100.0).duration_minutes(), 15);
    }

    #[test]
    fn test_forecast_span() {
        let start = Utc.with_ymd_and_hms(2024, 5, 10, 0, 0, 0).unwrap();
        let forecast = Forecast::new(
            "RG10",
            vec![
                block(start, 30, 100.0),
                block(start + Duration::minutes(30), 30, 50.0),
            ],
        );

        assert_eq!(forecast.total_minutes(), 60);
        assert_eq!(forecast.starts_at(), Some(start));
        assert_eq!(forecast.ends_at(), Some(start + Duration::hours(1)));
        assert!(Forecast::default().is_empty());
        assert_eq!(Forecast::default().total_minutes(), 0);
    }

    #[test]
    fn test_mix_entry_accepts_perc_alias() {
        let entry: MixEntry = serde_json::from_str(r#"{"fuel":"wind","perc":42.5}"#).unwrap();
        assert_eq!(entry, MixEntry::new("wind", 42.5));
    }
}

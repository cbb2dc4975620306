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
use std::fmt;

use crate::forecast::MixEntry;
use crate::request::{HorizonKey, RunWhen};

/// Qualitative carbon intensity label, ordered from cleanest to dirtiest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ForecastIndex {
    #[serde(rename = "very low")]
    VeryLow,
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "moderate")]
    Moderate,
    #[serde(rename = "high")]
    High,
    #[serde(rename = "very high")]
    VeryHigh,
}

impl ForecastIndex {
    pub fn label(self) -> &'static str {
        match self {
            Self::VeryLow => "very low",
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::VeryHigh => "very high",
        }
    }
}

impl fmt::Display for ForecastIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Distance from the best overall option, after future discounting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Best,
    Ok,
    NotBad,
    Avoid,
}

impl Band {
    pub fn label(self) -> &'static str {
        match self {
            Self::Best => "best",
            Self::Ok => "ok",
            Self::NotBad => "not bad",
            Self::Avoid => "avoid",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Analysis of a run starting at one forecast slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeAnalysis {
    /// Start of the originating slot (unique per analysis)
    pub from: DateTime<Utc>,

    /// End of the run window
    pub to: DateTime<Utc>,

    /// End of the originating slot
    pub slot_end: DateTime<Utc>,

    /// Raw intensity of the originating slot (gCO2/kWh)
    pub instant_forecast: f64,

    /// Duration-weighted average intensity for a run starting here (gCO2/kWh)
    pub window_forecast: f64,

    /// Window forecast scaled by the future discount. Only used to compare
    /// against the best overall option.
    pub weighted_forecast: f64,

    pub generation_mix: Vec<MixEntry>,

    pub index: ForecastIndex,

    /// Smallest horizon (hours) this start falls inside
    pub in_horizon_hours: i64,

    /// Grams of CO2 for the whole run, when the power draw is known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_carbon: Option<f64>,

    /// Percent lower than starting now (positive = better)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compared_to_now_percent: Option<f64>,

    /// Percent above the best overall option (0 = best)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compared_to_best_percent: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band: Option<Band>,
}

/// Raw per-slot reading, kept for every input block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstantReading {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub intensity: f64,
    pub index: ForecastIndex,
    pub in_horizon_hours: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compared_to_now_percent: Option<f64>,
}

/// Merged run of consecutive slots sharing a band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandSegment {
    pub band: Band,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,

    /// Duration-weighted average window forecast across the merged slots
    pub forecast: f64,

    pub generation_mix: Vec<MixEntry>,
    pub index: ForecastIndex,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_carbon: Option<f64>,

    /// Number of slots merged into this segment
    pub slots: usize,
}

/// Best analysis per horizon key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HorizonForecasts {
    #[serde(rename = "Now")]
    pub now: Option<TimeAnalysis>,
    #[serde(rename = "Next8h")]
    pub next_8h: Option<TimeAnalysis>,
    #[serde(rename = "Next12h")]
    pub next_12h: Option<TimeAnalysis>,
    #[serde(rename = "Next24h")]
    pub next_24h: Option<TimeAnalysis>,
    #[serde(rename = "Whenever")]
    pub whenever: Option<TimeAnalysis>,
}

impl HorizonForecasts {
    pub fn get(&self, key: HorizonKey) -> Option<&TimeAnalysis> {
        match key {
            HorizonKey::Now => self.now.as_ref(),
            HorizonKey::Next8h => self.next_8h.as_ref(),
            HorizonKey::Next12h => self.next_12h.as_ref(),
            HorizonKey::Next24h => self.next_24h.as_ref(),
            HorizonKey::Whenever => self.whenever.as_ref(),
        }
    }

    pub fn set(&mut self, key: HorizonKey, analysis: Option<TimeAnalysis>) {
        let slot = match key {
            HorizonKey::Now => &mut self.now,
            HorizonKey::Next8h => &mut self.next_8h,
            HorizonKey::Next12h => &mut self.next_12h,
            HorizonKey::Next24h => &mut self.next_24h,
            HorizonKey::Whenever => &mut self.whenever,
        };
        *slot = analysis;
    }

    pub fn iter(&self) -> impl Iterator<Item = (HorizonKey, Option<&TimeAnalysis>)> + '_ {
        HorizonKey::ALL.into_iter().map(|key| (key, self.get(key)))
    }
}

/// Result of analysing one forecast for one run request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastAnalysis {
    pub forecasts: HorizonForecasts,

    /// One entry per slot that supports a full window, in slot order
    pub all: Vec<TimeAnalysis>,

    /// One entry per input block
    pub instant: Vec<InstantReading>,

    pub bands: Vec<BandSegment>,
}

impl ForecastAnalysis {
    /// True when no slot could support a full-duration window
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    pub fn now(&self) -> Option<&TimeAnalysis> {
        self.forecasts.get(HorizonKey::Now)
    }

    pub fn best_overall(&self) -> Option<&TimeAnalysis> {
        self.forecasts.get(HorizonKey::Whenever)
    }

    /// Best start within the requested look-ahead
    pub fn best_for(&self, when: RunWhen) -> Option<&TimeAnalysis> {
        self.forecasts.get(HorizonKey::from(when))
    }

    /// Look up a slot analysis by its start time
    pub fn find(&self, from: DateTime<Utc>) -> Option<&TimeAnalysis> {
        self.all.iter().find(|a| a.from == from)
    }
}

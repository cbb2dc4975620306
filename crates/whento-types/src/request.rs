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

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How far ahead the user is willing to wait before starting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunWhen {
    Next8h,
    Next12h,
    #[serde(alias = "Next24")]
    Next24h,
    #[default]
    Whenever,
}

impl RunWhen {
    pub const ALL: [RunWhen; 4] = [
        RunWhen::Next8h,
        RunWhen::Next12h,
        RunWhen::Next24h,
        RunWhen::Whenever,
    ];

    /// Lenient parse, anything unrecognised means "whenever"
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "next8h" | "8h" | "8" => Self::Next8h,
            "next12h" | "12h" | "12" => Self::Next12h,
            "next24h" | "next24" | "24h" | "24" => Self::Next24h,
            _ => Self::Whenever,
        }
    }

    /// Human readable description of the look-ahead
    pub fn describe(self) -> &'static str {
        match self {
            Self::Next8h => "next 8 hours",
            Self::Next12h => "next 12 hours",
            Self::Next24h => "next 24 hours",
            Self::Whenever => "next 48 hours",
        }
    }

    pub fn hours(self) -> i64 {
        HorizonKey::from(self).hours()
    }
}

impl fmt::Display for RunWhen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Keys of the per-horizon best selections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HorizonKey {
    Now,
    Next8h,
    Next12h,
    Next24h,
    Whenever,
}

impl HorizonKey {
    pub const ALL: [HorizonKey; 5] = [
        HorizonKey::Now,
        HorizonKey::Next8h,
        HorizonKey::Next12h,
        HorizonKey::Next24h,
        HorizonKey::Whenever,
    ];

    /// Look-ahead ranges in ascending order of hours
    pub const RANGES: [HorizonKey; 4] = [
        HorizonKey::Next8h,
        HorizonKey::Next12h,
        HorizonKey::Next24h,
        HorizonKey::Whenever,
    ];

    /// Bounded ranges, i.e. everything except "whenever"
    pub const BOUNDED: [HorizonKey; 3] = [
        HorizonKey::Next8h,
        HorizonKey::Next12h,
        HorizonKey::Next24h,
    ];

    pub fn hours(self) -> i64 {
        match self {
            Self::Now => 0,
            Self::Next8h => 8,
            Self::Next12h => 12,
            Self::Next24h => 24,
            Self::Whenever => 48,
        }
    }

    /// Latest start instant that still counts as inside this horizon
    pub fn cutoff(self, reference_now: DateTime<Utc>) -> DateTime<Utc> {
        reference_now + Duration::hours(self.hours())
    }

    /// Smallest bounded horizon whose cutoff is at or after `from`,
    /// falling back to the "whenever" hours value
    pub fn horizon_hours_for(reference_now: DateTime<Utc>, from: DateTime<Utc>) -> i64 {
        Self::BOUNDED
            .iter()
            .find(|key| from <= key.cutoff(reference_now))
            .unwrap_or(&Self::Whenever)
            .hours()
    }
}

impl From<RunWhen> for HorizonKey {
    fn from(when: RunWhen) -> Self {
        match when {
            RunWhen::Next8h => Self::Next8h,
            RunWhen::Next12h => Self::Next12h,
            RunWhen::Next24h => Self::Next24h,
            RunWhen::Whenever => Self::Whenever,
        }
    }
}

/// What the user wants to run, and when they are asking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRequest {
    /// Run duration in minutes
    pub duration_minutes: i64,

    /// Average power draw while running (watts)
    #[serde(default)]
    pub power_watts: Option<f64>,

    /// How far ahead the user is willing to wait
    #[serde(default)]
    pub horizon: RunWhen,

    /// Anchor for "now" and for horizon cutoffs
    pub reference_now: DateTime<Utc>,

    /// Year used to pick classification thresholds (defaults to the year of `reference_now`)
    #[serde(default)]
    pub classification_year: Option<i32>,
}

impl RunRequest {
    pub fn new(duration_minutes: i64, reference_now: DateTime<Utc>) -> Self {
        Self {
            duration_minutes,
            power_watts: None,
            horizon: RunWhen::default(),
            reference_now,
            classification_year: None,
        }
    }

    #[must_use]
    pub fn with_power(mut self, power_watts: f64) -> Self {
        self.power_watts = Some(power_watts);
        self
    }

    #[must_use]
    pub fn with_horizon(mut self, horizon: RunWhen) -> Self {
        self.horizon = horizon;
        self
    }

    #[must_use]
    pub fn with_classification_year(mut self, year: i32) -> Self {
        self.classification_year = Some(year);
        self
    }

    pub fn classification_year(&self) -> i32 {
        self.classification_year
            .unwrap_or_else(|| self.reference_now.year())
    }

    /// Grams of CO2 for a full run at the given average intensity (gCO2/kWh)
    pub fn total_carbon(&self, intensity: f64) -> Option<f64> {
        self.power_watts
            .map(|watts| intensity * (watts / 1000.0) * (self.duration_minutes as f64 / 60.0))
    }
}

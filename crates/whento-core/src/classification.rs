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

//! Carbon intensity index lookup.
//!
//! Thresholds follow the National Grid ESO carbon intensity methodology and are
//! revised per calendar year. Years not in the table use the latest known year.

use whento_types::ForecastIndex;

/// Lower bounds (gCO2/kWh) of each index above "very low"
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexThresholds {
    pub low: f64,
    pub moderate: f64,
    pub high: f64,
    pub very_high: f64,
}

/// Known years, ascending. The last entry is the fallback.
const THRESHOLDS: [(i32, IndexThresholds); 4] = [
    (
        2021,
        IndexThresholds {
            low: 50.0,
            moderate: 140.0,
            high: 220.0,
            very_high: 330.0,
        },
    ),
    (
        2022,
        IndexThresholds {
            low: 45.0,
            moderate: 130.0,
            high: 210.0,
            very_high: 310.0,
        },
    ),
    (
        2023,
        IndexThresholds {
            low: 40.0,
            moderate: 120.0,
            high: 200.0,
            very_high: 290.0,
        },
    ),
    (
        2024,
        IndexThresholds {
            low: 35.0,
            moderate: 110.0,
            high: 190.0,
            very_high: 270.0,
        },
    ),
];

/// Thresholds for `year`, or the latest defined year's when unknown
pub fn thresholds_for(year: i32) -> IndexThresholds {
    let (_, latest) = THRESHOLDS[THRESHOLDS.len() - 1];
    THRESHOLDS
        .iter()
        .find(|(y, _)| *y == year)
        .map_or(latest, |(_, t)| *t)
}

/// Map an intensity to its index. Boundary values belong to the higher index.
pub fn classify(intensity: f64, year: i32) -> ForecastIndex {
    let t = thresholds_for(year);
    if intensity < t.low {
        ForecastIndex::VeryLow
    } else if intensity < t.moderate {
        ForecastIndex::Low
    } else if intensity < t.high {
        ForecastIndex::Moderate
    } else if intensity < t.very_high {
        ForecastIndex::High
    } else {
        ForecastIndex::VeryHigh
    }
}

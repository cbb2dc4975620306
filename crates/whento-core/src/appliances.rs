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

//! Built-in appliance presets with typical run duration and power draw.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Appliance {
    pub id: &'static str,
    pub label: &'static str,
    /// Typical run duration in minutes
    pub duration_minutes: Option<i64>,
    /// Typical average power draw while running (watts)
    pub power_watts: Option<f64>,
}

pub const APPLIANCES: [Appliance; 6] = [
    Appliance {
        id: "anything",
        label: "Any electrical item",
        duration_minutes: None,
        power_watts: None,
    },
    Appliance {
        id: "dishwasher",
        label: "Dishwasher",
        duration_minutes: Some(90),
        power_watts: Some(1200.0),
    },
    Appliance {
        id: "washing-machine",
        label: "Washing machine",
        duration_minutes: Some(120),
        power_watts: Some(1800.0),
    },
    Appliance {
        id: "tumble-dryer",
        label: "Tumble dryer",
        duration_minutes: Some(60),
        power_watts: Some(2500.0),
    },
    Appliance {
        id: "car-charge",
        label: "Electric car charge (3.6kW)",
        duration_minutes: Some(360),
        power_watts: Some(3600.0),
    },
    Appliance {
        id: "fast-car-charge",
        label: "Electric car charge (7kW)",
        duration_minutes: Some(180),
        power_watts: Some(7000.0),
    },
];

/// Look up a preset by id (case-insensitive)
pub fn find_appliance(id: &str) -> Option<&'static Appliance> {
    APPLIANCES.iter().find(|a| a.id.eq_ignore_ascii_case(id.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_appliance() {
        let dishwasher = find_appliance("Dishwasher").unwrap();
        assert_eq!(dishwasher.duration_minutes, Some(90));
        assert_eq!(dishwasher.power_watts, Some(1200.0));
        assert!(find_appliance("kettle").is_none());
    }

    #[test]
    fn test_anything_has_no_defaults() {
        let anything = find_appliance("anything").unwrap();
        assert!(anything.duration_minutes.is_none());
        assert!(anything.power_watts.is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        for (i, a) in APPLIANCES.iter().enumerate() {
            assert!(APPLIANCES[i + 1..].iter().all(|b| b.id != a.id));
        }
    }
}

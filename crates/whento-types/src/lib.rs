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

//! Shared data model for the WhenTo forecast analysis engine.
//!
//! Everything here is a plain value type: forecasts come in, analyses go out,
//! and nothing holds on to resources between calls.

pub mod analysis;
pub mod forecast;
pub mod request;

pub use analysis::{
    Band, BandSegment, ForecastAnalysis, ForecastIndex, HorizonForecasts, InstantReading,
    TimeAnalysis,
};
pub use forecast::{Forecast, MixEntry, TimeBlock};
pub use request::{HorizonKey, RunRequest, RunWhen};

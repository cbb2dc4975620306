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

//! WhenTo forecast analysis engine
//!
//! Turns a half-hourly carbon intensity forecast into the lowest-carbon start
//! times for running an appliance:
//!
//! - **Rolling windows**: duration-weighted intensity and generation mix for a
//!   run starting at every slot ([`window`])
//! - **Horizon bests**: cheapest start within the next 8, 12 and 24 hours and
//!   overall ([`analyser`])
//! - **Banding**: best / ok / not bad / avoid segments relative to the
//!   discounted best overall option ([`banding`])
//!
//! The engine is pure and synchronous. Callers inject "now" and the
//! classification year through [`RunRequest`].

pub mod analyser;
pub mod appliances;
pub mod banding;
pub mod classification;
pub mod error;
pub mod source;
pub mod window;

pub use analyser::{FUTURE_DISCOUNT, analyse_forecast};
pub use appliances::{APPLIANCES, Appliance, find_appliance};
pub use banding::{apply_bandings, band_for, segment_bands};
pub use classification::{IndexThresholds, classify, thresholds_for};
pub use error::{ForecastError, Result};
pub use source::{parse_forecast, read_forecast, read_forecast_from};
pub use window::{WindowForecast, blend_mix, compute_window};

pub use whento_types::{
    Band, BandSegment, Forecast, ForecastAnalysis, ForecastIndex, HorizonForecasts, HorizonKey,
    InstantReading, MixEntry, RunRequest, RunWhen, TimeAnalysis, TimeBlock,
};

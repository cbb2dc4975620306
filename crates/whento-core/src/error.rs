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

//! Error types for reading forecast payloads

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("invalid region: {0}")]
    InvalidRegion(String),

    #[error("no forecast data available for {location}")]
    NoData { location: String },

    #[error("forecast payload error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid timestamp in forecast: {0}")]
    Timestamp(String),

    #[error("failed to read forecast: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ForecastError>;

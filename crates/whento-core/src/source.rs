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

//! Reader for regional carbon intensity forecast payloads.
//!
//! Accepts the response body of the Carbon Intensity API regional endpoints
//! (`/regional/intensity/{from}/fw48h/postcode/{postcode}`) as saved to disk.
//! Nothing here talks to the network.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};
use whento_types::{Forecast, MixEntry, TimeBlock};

use crate::error::{ForecastError, Result};

#[derive(Debug, Deserialize)]
struct RawIntensity {
    forecast: f64,
}

#[derive(Debug, Deserialize)]
struct RawPeriod {
    from: String,
    to: String,
    intensity: RawIntensity,
    #[serde(default)]
    generationmix: Vec<MixEntry>,
}

#[derive(Debug, Deserialize)]
struct RegionPayload {
    #[serde(default)]
    regionid: Option<u32>,
    #[serde(default)]
    dnoregion: Option<String>,
    #[serde(default)]
    shortname: Option<String>,
    #[serde(default)]
    postcode: Option<String>,
    data: Vec<RawPeriod>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RegionData {
    One(RegionPayload),
    Many(Vec<RegionPayload>),
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Payload {
    Bare(RegionPayload),
    Failed { error: ApiError },
    Wrapped { data: Option<RegionData> },
}

/// Parse an API timestamp. The API omits seconds (`2024-05-10T23:30Z`).
pub fn parse_api_time(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%MZ")
        .map(|naive| naive.and_utc())
        .map_err(|e| ForecastError::Timestamp(format!("{value}: {e}")))
}

fn convert_period(period: RawPeriod) -> Result<TimeBlock> {
    Ok(TimeBlock {
        from: parse_api_time(&period.from)?,
        to: parse_api_time(&period.to)?,
        intensity: period.intensity.forecast,
        generation_mix: period.generationmix,
    })
}

fn convert_region(region: RegionPayload) -> Result<Forecast> {
    let location = region
        .postcode
        .or(region.shortname.clone())
        .unwrap_or_else(|| "unknown".to_owned());

    let mut blocks = region
        .data
        .into_iter()
        .map(convert_period)
        .collect::<Result<Vec<_>>>()?;

    if blocks.is_empty() {
        return Err(ForecastError::NoData { location });
    }

    blocks.sort_by_key(|b| b.from);

    let gaps = blocks.windows(2).filter(|w| w[0].to != w[1].from).count();
    if gaps > 0 {
        warn!("Forecast for {} has {} non-contiguous block(s)", location, gaps);
    }

    info!(
        "Loaded {} forecast blocks for {} ({} region)",
        blocks.len(),
        location,
        region.shortname.as_deref().unwrap_or("unnamed")
    );

    Ok(Forecast {
        location,
        region_id: region.regionid,
        dno_region: region.dnoregion,
        blocks,
    })
}

/// Parse a forecast payload from a JSON string
pub fn parse_forecast(json: &str) -> Result<Forecast> {
    match serde_json::from_str::<Payload>(json)? {
        Payload::Bare(region) | Payload::Wrapped { data: Some(RegionData::One(region)) } => {
            convert_region(region)
        }
        Payload::Wrapped {
            data: Some(RegionData::Many(regions)),
        } => match regions.into_iter().next() {
            Some(region) => convert_region(region),
            None => Err(ForecastError::InvalidRegion(
                "no region in payload".to_owned(),
            )),
        },
        Payload::Wrapped { data: None } => Err(ForecastError::InvalidRegion(
            "no data available".to_owned(),
        )),
        Payload::Failed { error } => Err(ForecastError::InvalidRegion(
            error
                .message
                .or(error.code)
                .unwrap_or_else(|| "request rejected".to_owned()),
        )),
    }
}

/// Read a forecast payload from any reader (e.g. stdin)
pub fn read_forecast_from(mut reader: impl Read) -> Result<Forecast> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    parse_forecast(&content)
}

/// Read a forecast payload from a file
pub fn read_forecast(path: &Path) -> Result<Forecast> {
    let content = std::fs::read_to_string(path)?;
    parse_forecast(&content)
}

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

//! Output formatters for analysis results.

use anyhow::Result;
use chrono::{DateTime, Utc};
use comfy_table::{Attribute, Cell, Color, Table, presets::UTF8_FULL};
use std::io::Write;
use whento_core::APPLIANCES;
use whento_types::{Band, Forecast, ForecastAnalysis, HorizonKey, TimeAnalysis};

use crate::cli::request::ResolvedRun;

/// Formatter for pretty terminal tables
#[derive(Debug)]
pub struct TableFormatter;

/// Formatter for JSON output
#[derive(Debug)]
pub struct JsonFormatter;

/// Formatter for per-slot CSV export
#[derive(Debug)]
pub struct CsvFormatter;

/// Grams of CO2, switching to kilograms from 1000g
pub fn format_carbon(grams: f64) -> String {
    if grams >= 1000.0 {
        format!("{:.2}kg", grams / 1000.0)
    } else {
        format!("{grams:.0}g")
    }
}

fn format_time(time: DateTime<Utc>) -> String {
    time.format("%a %H:%M").to_string()
}

fn horizon_label(key: HorizonKey) -> &'static str {
    match key {
        HorizonKey::Now => "Now",
        HorizonKey::Next8h => "Next 8 hours",
        HorizonKey::Next12h => "Next 12 hours",
        HorizonKey::Next24h => "Next 24 hours",
        HorizonKey::Whenever => "Whenever",
    }
}

fn band_color(band: Band) -> Color {
    match band {
        Band::Best => Color::Green,
        Band::Ok => Color::DarkGreen,
        Band::NotBad => Color::Yellow,
        Band::Avoid => Color::Red,
    }
}

fn compared_to_now_text(analysis: &TimeAnalysis) -> String {
    match analysis.compared_to_now_percent {
        Some(pct) if pct > 0.0 => format!("{pct:.0}% lower"),
        Some(pct) if pct < 0.0 => format!("{:.0}% higher", pct.abs()),
        Some(_) | None => "-".to_owned(),
    }
}

impl TableFormatter {
    /// Headline recommendation plus the per-horizon summary table
    pub fn format_results(
        analysis: &ForecastAnalysis,
        run: &ResolvedRun,
        forecast: &Forecast,
    ) -> String {
        let request = &run.request;
        let mut output = String::new();

        if analysis.is_empty() {
            output.push_str(&format!(
                "Could not identify a best period: the forecast for {} does not cover a {} minute run.\n",
                forecast.location, request.duration_minutes
            ));
            return output;
        }

        let what = run.appliance_label.unwrap_or("your appliance");
        if let Some(best) = analysis.best_for(request.horizon) {
            output.push_str(&format!(
                "Best time to start {} in the {}: {} to {} UTC, averaging {:.1} g/kWh ({})\n",
                what,
                request.horizon.describe(),
                format_time(best.from),
                best.to.format("%H:%M"),
                best.window_forecast,
                best.index
            ));
            if let Some(grams) = best.total_carbon {
                output.push_str(&format!("Total carbon impact: {}\n", format_carbon(grams)));
            }
            if let Some(pct) = best.compared_to_now_percent.filter(|p| *p > 0.0) {
                output.push_str(&format!("That is {pct:.0}% lower than starting now.\n"));
            }
            output.push('\n');
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![
            Cell::new("Horizon").add_attribute(Attribute::Bold),
            Cell::new("Start").add_attribute(Attribute::Bold),
            Cell::new("End").add_attribute(Attribute::Bold),
            Cell::new("Average\n(g/kWh)").add_attribute(Attribute::Bold),
            Cell::new("Index").add_attribute(Attribute::Bold),
            Cell::new("Total CO2").add_attribute(Attribute::Bold),
            Cell::new("vs Now").add_attribute(Attribute::Bold),
        ]);

        let requested = HorizonKey::from(request.horizon);
        for (key, best) in analysis.forecasts.iter() {
            let Some(best) = best else {
                table.add_row(vec![Cell::new(horizon_label(key)), Cell::new("-")]);
                continue;
            };

            let name_cell = if key == requested {
                Cell::new(horizon_label(key))
                    .fg(Color::Green)
                    .add_attribute(Attribute::Bold)
            } else {
                Cell::new(horizon_label(key))
            };

            table.add_row(vec![
                name_cell,
                Cell::new(format_time(best.from)),
                Cell::new(format_time(best.to)),
                Cell::new(format!("{:.1}", best.window_forecast)),
                Cell::new(best.index.label()),
                Cell::new(best.total_carbon.map_or_else(|| "-".to_owned(), format_carbon)),
                Cell::new(compared_to_now_text(best)),
            ]);
        }

        output.push_str(&table.to_string());
        output.push('\n');

        output.push_str(&format!(
            "Forecast: {} | {} blocks | Run: {} min | {} start times analysed\n",
            forecast.location,
            forecast.blocks.len(),
            request.duration_minutes,
            analysis.all.len()
        ));

        output
    }

    /// Banded timeline, one row per segment
    pub fn format_bands(analysis: &ForecastAnalysis) -> String {
        if analysis.bands.is_empty() {
            return "No bands available.\n".to_owned();
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![
            Cell::new("Band").add_attribute(Attribute::Bold),
            Cell::new("From").add_attribute(Attribute::Bold),
            Cell::new("To").add_attribute(Attribute::Bold),
            Cell::new("Average\n(g/kWh)").add_attribute(Attribute::Bold),
            Cell::new("Index").add_attribute(Attribute::Bold),
            Cell::new("Total CO2").add_attribute(Attribute::Bold),
            Cell::new("Starts").add_attribute(Attribute::Bold),
        ]);

        for segment in &analysis.bands {
            table.add_row(vec![
                Cell::new(segment.band.label()).fg(band_color(segment.band)),
                Cell::new(format_time(segment.from)),
                Cell::new(format_time(segment.to)),
                Cell::new(format!("{:.1}", segment.forecast)),
                Cell::new(segment.index.label()),
                Cell::new(
                    segment
                        .total_carbon
                        .map_or_else(|| "-".to_owned(), format_carbon),
                ),
                Cell::new(segment.slots),
            ]);
        }

        let mut output = table.to_string();
        output.push('\n');
        output
    }

    /// Built-in appliance presets
    pub fn format_appliances() -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![
            Cell::new("Id").add_attribute(Attribute::Bold),
            Cell::new("Appliance").add_attribute(Attribute::Bold),
            Cell::new("Duration\n(min)").add_attribute(Attribute::Bold),
            Cell::new("Power\n(W)").add_attribute(Attribute::Bold),
        ]);

        for appliance in &APPLIANCES {
            table.add_row(vec![
                Cell::new(appliance.id),
                Cell::new(appliance.label),
                Cell::new(
                    appliance
                        .duration_minutes
                        .map_or_else(|| "-".to_owned(), |d| d.to_string()),
                ),
                Cell::new(
                    appliance
                        .power_watts
                        .map_or_else(|| "-".to_owned(), |w| format!("{w:.0}")),
                ),
            ]);
        }

        let mut output = table.to_string();
        output.push('\n');
        output
    }
}

impl JsonFormatter {
    pub fn format(analysis: &ForecastAnalysis) -> Result<String> {
        Ok(serde_json::to_string_pretty(analysis)?)
    }
}

impl CsvFormatter {
    /// Write one row per analysed start slot
    pub fn write_slots<W: Write>(analysis: &ForecastAnalysis, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record([
            "from",
            "to",
            "instant_forecast",
            "window_forecast",
            "weighted_forecast",
            "index",
            "in_horizon_hours",
            "total_carbon",
            "compared_to_now_percent",
            "compared_to_best_percent",
            "band",
        ])?;

        let optional = |value: Option<f64>| value.map_or_else(String::new, |v| format!("{v:.3}"));

        for slot in &analysis.all {
            csv.write_record([
                slot.from.to_rfc3339(),
                slot.to.to_rfc3339(),
                format!("{:.3}", slot.instant_forecast),
                format!("{:.3}", slot.window_forecast),
                format!("{:.3}", slot.weighted_forecast),
                slot.index.label().to_owned(),
                slot.in_horizon_hours.to_string(),
                optional(slot.total_carbon),
                optional(slot.compared_to_now_percent),
                optional(slot.compared_to_best_percent),
                slot.band.map_or_else(String::new, |b| b.label().to_owned()),
            ])?;
        }

        csv.flush()?;
        Ok(())
    }
}

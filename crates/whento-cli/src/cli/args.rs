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

//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "whento")]
#[command(author, version, about = "Find the lowest-carbon time to run an appliance")]
#[command(
    long_about = "Analyses a regional 48 hour carbon intensity forecast and recommends\n\
    when to start an appliance so that it runs on the cleanest electricity.\n\
    \nThe forecast is read from a saved Carbon Intensity API response.\n\
    \nExamples:\n  \
    whento analyse --forecast rg10.json --appliance dishwasher\n  \
    whento analyse --forecast - --duration 120 --power 1800 --when next12h\n  \
    whento appliances"
)]
pub struct Cli {
    /// Path to TOML configuration file
    #[arg(
        long,
        global = true,
        env = "WHENTO_CONFIG",
        value_name = "PATH",
        help = "Configuration file with default run settings (default: ./whento.toml)"
    )]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyse a forecast and recommend start times
    #[command(
        long_about = "Compute the average carbon intensity for a run starting at every\n\
        forecast slot, pick the best start within each look-ahead horizon and\n\
        band the timeline by how close each start is to the best overall.\n\
        \nExamples:\n  \
        whento analyse --forecast rg10.json --appliance washing-machine\n  \
        whento analyse --forecast rg10.json --duration 45 --output json\n  \
        whento analyse --forecast rg10.json --duration 60 --output csv --csv-path slots.csv"
    )]
    Analyse(AnalyseArgs),

    /// List the built-in appliance presets
    Appliances,
}

#[derive(Debug, Parser)]
pub struct AnalyseArgs {
    /// Forecast payload file, or "-" for stdin
    #[arg(
        long,
        value_name = "PATH",
        default_value = "-",
        help = "Saved Carbon Intensity API response (\"-\" reads stdin)"
    )]
    pub forecast: String,

    /// Appliance preset id (see `whento appliances`)
    #[arg(
        long,
        value_name = "ID",
        help = "Use a preset's typical duration and power draw"
    )]
    pub appliance: Option<String>,

    /// Run duration in minutes
    #[arg(long, value_name = "MINUTES", help = "How long the appliance runs for")]
    pub duration: Option<i64>,

    /// Average power draw in watts
    #[arg(
        long,
        value_name = "WATTS",
        help = "Average power draw, enables total carbon estimates"
    )]
    pub power: Option<f64>,

    /// Look-ahead horizon
    #[arg(long,
          value_parser = ["next8h", "next12h", "next24h", "whenever"],
          help = "How far ahead you are willing to wait")]
    pub when: Option<String>,

    /// Reference time for "now" (RFC 3339, defaults to the current time)
    #[arg(
        long,
        value_name = "RFC3339",
        help = "Treat this instant as now",
        long_help = "Anchor for \"now\" and the horizon cutoffs.\n\
          Useful when analysing an older saved forecast.\n\
          \nExample: --now 2024-05-10T23:30:00Z"
    )]
    pub now: Option<String>,

    /// Year of the intensity index thresholds
    #[arg(
        long,
        value_name = "YYYY",
        help = "Classification threshold year (defaults to the year of --now)"
    )]
    pub year: Option<i32>,

    /// Output format
    #[arg(long,
          value_parser = ["table", "json", "csv"],
          help = "How to display results")]
    pub output: Option<String>,

    /// CSV file path (stdout when omitted)
    #[arg(long, value_name = "PATH", help = "Where to write CSV slot data")]
    pub csv_path: Option<String>,

    /// Show the banded timeline under the summary table
    #[arg(long, default_value_t = false)]
    pub show_bands: bool,
}

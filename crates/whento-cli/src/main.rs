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

//! WhenTo - recommend the lowest-carbon start time for an appliance.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use whento_cli::cli::{
    AnalyseArgs, Cli, Commands, CsvFormatter, JsonFormatter, OutputFormat, TableFormatter,
    WhenToConfig, load_config, resolve_run,
};
use whento_core::{analyse_forecast, read_forecast, read_forecast_from};
use whento_types::Forecast;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON and CSV output stay clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref().map(Path::new))?;

    match cli.command {
        Commands::Analyse(args) => run_analyse(&args, &config),
        Commands::Appliances => {
            print!("{}", TableFormatter::format_appliances());
            Ok(())
        }
    }
}

fn load_forecast(source: &str) -> anyhow::Result<Forecast> {
    if source == "-" {
        debug!("Reading forecast from stdin");
        read_forecast_from(io::stdin().lock()).context("Failed to read forecast from stdin")
    } else {
        read_forecast(Path::new(source))
            .with_context(|| format!("Failed to read forecast from {source}"))
    }
}

fn run_analyse(args: &AnalyseArgs, config: &WhenToConfig) -> anyhow::Result<()> {
    let run = resolve_run(args, config, Utc::now())?;
    let forecast = load_forecast(&args.forecast)?;

    info!(
        "Analysing {} min run for {} ({})",
        run.request.duration_minutes,
        forecast.location,
        run.request.horizon.describe()
    );
    let analysis = analyse_forecast(&run.request, &forecast);

    match run.output {
        OutputFormat::Table => {
            print!("{}", TableFormatter::format_results(&analysis, &run, &forecast));
            if args.show_bands {
                println!();
                print!("{}", TableFormatter::format_bands(&analysis));
            }
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::format(&analysis)?);
        }
        OutputFormat::Csv => match &args.csv_path {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create CSV file {path}"))?;
                CsvFormatter::write_slots(&analysis, BufWriter::new(file))?;
                info!("Wrote {} slots to {}", analysis.all.len(), path);
            }
            None => {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                CsvFormatter::write_slots(&analysis, &mut handle)?;
                handle.flush()?;
            }
        },
    }

    Ok(())
}

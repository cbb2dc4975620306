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

//! Resolve CLI flags, appliance presets and config defaults into a run request.
//!
//! Precedence: explicit flag, then appliance preset, then config default.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use whento_core::find_appliance;
use whento_types::{RunRequest, RunWhen};

use crate::cli::args::AnalyseArgs;
use crate::cli::config::WhenToConfig;

/// Output formats understood by the analyse command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => bail!("Unknown output format '{other}' (expected table, json or csv)"),
        }
    }
}

/// Fully resolved settings for one analysis
#[derive(Debug, Clone)]
pub struct ResolvedRun {
    pub request: RunRequest,
    pub appliance_label: Option<&'static str>,
    pub output: OutputFormat,
}

fn parse_now(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid --now '{value}', expected RFC 3339 (e.g. 2024-05-10T23:30:00Z)"))
}

/// Build the run request. `clock_now` is used only when `--now` is absent.
pub fn resolve_run(
    args: &AnalyseArgs,
    config: &WhenToConfig,
    clock_now: DateTime<Utc>,
) -> Result<ResolvedRun> {
    let appliance = match args.appliance.as_deref().or(config.default_appliance.as_deref()) {
        Some(id) => Some(
            find_appliance(id)
                .with_context(|| format!("Unknown appliance '{id}', see `whento appliances`"))?,
        ),
        None => None,
    };

    let Some(duration_minutes) = args
        .duration
        .or(appliance.and_then(|a| a.duration_minutes))
        .or(config.default_duration_minutes)
    else {
        bail!("A run duration is required (use --duration or --appliance)");
    };
    if duration_minutes <= 0 {
        bail!("Duration must be a positive number of minutes, got {duration_minutes}");
    }

    let power_watts = args
        .power
        .or(appliance.and_then(|a| a.power_watts))
        .or(config.default_power_watts);
    if let Some(watts) = power_watts.filter(|w| !w.is_finite() || *w <= 0.0) {
        bail!("Power must be a positive number of watts, got {watts}");
    }

    let horizon = args
        .when
        .as_deref()
        .map_or(config.default_when, RunWhen::parse);

    let reference_now = match args.now.as_deref() {
        Some(value) => parse_now(value)?,
        None => clock_now,
    };

    let mut request = RunRequest::new(duration_minutes, reference_now).with_horizon(horizon);
    if let Some(watts) = power_watts {
        request = request.with_power(watts);
    }
    if let Some(year) = args.year.or(config.classification_year) {
        request = request.with_classification_year(year);
    }

    let output = OutputFormat::parse(args.output.as_deref().unwrap_or(config.output.as_str()))?;

    Ok(ResolvedRun {
        request,
        appliance_label: appliance.map(|a| a.label),
        output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn args() -> AnalyseArgs {
        AnalyseArgs {
            forecast: "-".to_owned(),
            appliance: None,
            duration: None,
            power: None,
            when: None,
            now: None,
            year: None,
            output: None,
            csv_path: None,
            show_bands: false,
        }
    }

    fn clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 3, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_duration_is_required() {
        let err = resolve_run(&args(), &WhenToConfig::default(), clock()).unwrap_err();
        assert!(err.to_string().contains("duration"));
    }

    #[test]
    fn test_appliance_preset_fills_duration_and_power() {
        let mut a = args();
        a.appliance = Some("dishwasher".to_owned());

        let run = resolve_run(&a, &WhenToConfig::default(), clock()).unwrap();
        assert_eq!(run.request.duration_minutes, 90);
        assert_eq!(run.request.power_watts, Some(1200.0));
        assert_eq!(run.appliance_label, Some("Dishwasher"));
        assert_eq!(run.request.reference_now, clock());
        assert_eq!(run.output, OutputFormat::Table);
    }

    #[test]
    fn test_flags_override_preset_and_config() {
        let mut a = args();
        a.appliance = Some("tumble-dryer".to_owned());
        a.duration = Some(45);
        a.when = Some("next8h".to_owned());
        a.now = Some("2024-05-10T23:30:00Z".to_owned());
        a.output = Some("json".to_owned());

        let config = WhenToConfig {
            default_duration_minutes: Some(200),
            default_when: RunWhen::Next24h,
            classification_year: Some(2022),
            ..WhenToConfig::default()
        };

        let run = resolve_run(&a, &config, clock()).unwrap();
        assert_eq!(run.request.duration_minutes, 45);
        assert_eq!(run.request.power_watts, Some(2500.0));
        assert_eq!(run.request.horizon, RunWhen::Next8h);
        assert_eq!(
            run.request.reference_now,
            Utc.with_ymd_and_hms(2024, 5, 10, 23, 30, 0).unwrap()
        );
        assert_eq!(run.request.classification_year(), 2022);
        assert_eq!(run.output, OutputFormat::Json);
    }

    #[test]
    fn test_config_defaults_apply() {
        let config = WhenToConfig {
            default_duration_minutes: Some(30),
            default_when: RunWhen::Next12h,
            ..WhenToConfig::default()
        };

        let run = resolve_run(&args(), &config, clock()).unwrap();
        assert_eq!(run.request.duration_minutes, 30);
        assert_eq!(run.request.horizon, RunWhen::Next12h);
        assert!(run.request.power_watts.is_none());
        assert_eq!(run.request.classification_year(), 2025);
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        let mut a = args();
        a.duration = Some(0);
        assert!(resolve_run(&a, &WhenToConfig::default(), clock()).is_err());

        let mut a = args();
        a.duration = Some(60);
        a.power = Some(-5.0);
        assert!(resolve_run(&a, &WhenToConfig::default(), clock()).is_err());

        let mut a = args();
        a.appliance = Some("kettle".to_owned());
        assert!(resolve_run(&a, &WhenToConfig::default(), clock()).is_err());

        let mut a = args();
        a.duration = Some(60);
        a.now = Some("tomorrow".to_owned());
        assert!(resolve_run(&a, &WhenToConfig::default(), clock()).is_err());
    }

    #[test]
    fn test_non_finite_power_is_rejected() {
        for watts in [f64::NAN, f64::INFINITY, 0.0] {
            let mut a = args();
            a.duration = Some(60);
            a.power = Some(watts);
            let err = resolve_run(&a, &WhenToConfig::default(), clock()).unwrap_err();
            assert!(err.to_string().contains("Power"), "{watts}");
        }

        let config = WhenToConfig {
            default_duration_minutes: Some(60),
            default_power_watts: Some(f64::NAN),
            ..WhenToConfig::default()
        };
        assert!(resolve_run(&args(), &config, clock()).is_err());
    }
}

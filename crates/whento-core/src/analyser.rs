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

//! Forecast analysis: one forward pass over the slots computing rolling
//! windows and per-horizon bests, followed by banding against the best overall.

use tracing::debug;
use whento_types::{
    BandSegment, Forecast, ForecastAnalysis, HorizonForecasts, HorizonKey, InstantReading,
    RunRequest, TimeAnalysis,
};

use crate::banding::apply_bandings;
use crate::classification::classify;
use crate::window::compute_window;

/// Per-slot growth of the weighted forecast, modelling lower confidence and
/// convenience further into the future
pub const FUTURE_DISCOUNT: f64 = 1.002;

/// Discount factor for the slot at `slot_index` (1.0 for the first slot)
pub fn discount_factor(slot_index: usize) -> f64 {
    let exponent = i32::try_from(slot_index).unwrap_or(i32::MAX);
    FUTURE_DISCOUNT.powi(exponent)
}

/// Percent lower than `reference` (positive = better than the reference)
pub fn compared_to_now(value: f64, reference: f64) -> f64 {
    let reference = if reference == 0.0 { 1.0 } else { reference };
    100.0 - (value / reference) * 100.0
}

/// State threaded through the forward pass. Horizon bests are indices into `all`.
#[derive(Debug, Default)]
struct ForwardPass {
    all: Vec<TimeAnalysis>,
    instant: Vec<InstantReading>,
    now: Option<usize>,
    range_bests: [Option<usize>; HorizonKey::RANGES.len()],
}

impl ForwardPass {
    fn now_window_forecast(&self) -> Option<f64> {
        self.now.map(|i| self.all[i].window_forecast)
    }

    /// Record `analysis` as the running minimum of every range it fits in.
    /// Ties keep the earlier slot.
    fn push(&mut self, mut analysis: TimeAnalysis) {
        let position = self.all.len();

        for (slot, key) in self.range_bests.iter_mut().zip(HorizonKey::RANGES) {
            if analysis.in_horizon_hours > key.hours() {
                continue;
            }
            let improves = match *slot {
                None => true,
                Some(best) => analysis.window_forecast < self.all[best].window_forecast,
            };
            if improves {
                *slot = Some(position);
            }
        }

        match self.now_window_forecast() {
            None => {
                analysis.compared_to_now_percent = Some(0.0);
                self.now = Some(position);
            }
            Some(now_forecast) => {
                analysis.compared_to_now_percent =
                    Some(compared_to_now(analysis.window_forecast, now_forecast));
            }
        }

        self.all.push(analysis);
    }

    fn best_overall(&self) -> Option<usize> {
        self.range_bests[HorizonKey::RANGES.len() - 1]
    }

    fn into_analysis(self, bands: Vec<BandSegment>) -> ForecastAnalysis {
        let mut forecasts = HorizonForecasts::default();
        forecasts.set(HorizonKey::Now, self.now.map(|i| self.all[i].clone()));
        for (best, key) in self.range_bests.iter().zip(HorizonKey::RANGES) {
            forecasts.set(key, best.map(|i| self.all[i].clone()));
        }

        ForecastAnalysis {
            forecasts,
            all: self.all,
            instant: self.instant,
            bands,
        }
    }
}

/// Analyse `forecast` for a run described by `request`.
///
/// Never fails: when no slot supports a full window the result has empty
/// `all` and `bands` and no horizon bests.
pub fn analyse_forecast(request: &RunRequest, forecast: &Forecast) -> ForecastAnalysis {
    let year = request.classification_year();
    let mut pass = ForwardPass::default();

    for (slot_index, block) in forecast.blocks.iter().enumerate() {
        let in_horizon_hours = HorizonKey::horizon_hours_for(request.reference_now, block.from);
        // The reading at the Now slot is the reference and stays uncompared
        let now_forecast = pass.now_window_forecast();

        if let Some(window) = compute_window(&forecast.blocks, slot_index, request.duration_minutes)
        {
            pass.push(TimeAnalysis {
                from: block.from,
                to: window.end_time,
                slot_end: block.to,
                instant_forecast: block.intensity,
                window_forecast: window.window_forecast,
                weighted_forecast: window.window_forecast * discount_factor(slot_index),
                generation_mix: window.generation_mix,
                index: classify(window.window_forecast, year),
                in_horizon_hours,
                total_carbon: request.total_carbon(window.window_forecast),
                compared_to_now_percent: None,
                compared_to_best_percent: None,
                band: None,
            });
        }

        let compared = now_forecast
            .map(|now_forecast| compared_to_now(block.intensity, now_forecast));
        pass.instant.push(InstantReading {
            from: block.from,
            to: block.to,
            intensity: block.intensity,
            index: classify(block.intensity, year),
            in_horizon_hours,
            compared_to_now_percent: compared,
        });
    }

    let bands = match pass.best_overall() {
        Some(best) => {
            let best_weighted = pass.all[best].weighted_forecast;
            apply_bandings(&mut pass.all, best_weighted, request)
        }
        None => Vec::new(),
    };

    debug!(
        "Analysed {} blocks for {} ({} min run): {} windows, {} bands, best overall {:?}",
        forecast.blocks.len(),
        forecast.location,
        request.duration_minutes,
        pass.all.len(),
        bands.len(),
        pass.best_overall().map(|i| pass.all[i].from)
    );

    pass.into_analysis(bands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use whento_types::{Band, ForecastIndex, MixEntry, RunWhen, TimeBlock};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 18, 0, 0).unwrap()
    }

    fn forecast_of(intensities: &[f64]) -> Forecast {
        let blocks = intensities
            .iter()
            .enumerate()
            .map(|(i, &intensity)| {
                let from = start() + Duration::minutes(30 * i as i64);
                TimeBlock {
                    from,
                    to: from + Duration::minutes(30),
                    intensity,
                    generation_mix: vec![MixEntry::new("gas", 40.0), MixEntry::new("wind", 60.0)],
                }
            })
            .collect();
        Forecast::new("RG10", blocks)
    }

    #[test]
    fn test_discount_factor_grows_geometrically() {
        assert!((discount_factor(0) - 1.0).abs() < 1e-12);
        assert!((discount_factor(1) - 1.002).abs() < 1e-12);
        assert!((discount_factor(2) - 1.002 * 1.002).abs() < 1e-12);
    }

    #[test]
    fn test_compared_to_now() {
        assert!((compared_to_now(75.0, 100.0) - 25.0).abs() < 1e-9);
        assert!((compared_to_now(150.0, 100.0) + 50.0).abs() < 1e-9);
        // Zero reference falls back to 1
        assert!((compared_to_now(0.5, 0.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_first_valid_slot_is_now() {
        let request = RunRequest::new(60, start());
        let analysis = analyse_forecast(&request, &forecast_of(&[100.0, 50.0, 200.0, 30.0]));

        let now = analysis.now().unwrap();
        assert_eq!(now.from, start());
        assert_eq!(now.compared_to_now_percent, Some(0.0));

        // (50 + 200) / 2 = 125 vs 75 now
        let second = &analysis.all[1];
        assert!((second.compared_to_now_percent.unwrap() - (100.0 - 125.0 / 75.0 * 100.0)).abs() < 1e-9);
    }

    #[test]
    fn test_ties_keep_first_seen() {
        let request = RunRequest::new(30, start());
        let analysis = analyse_forecast(&request, &forecast_of(&[80.0, 60.0, 60.0, 90.0]));

        let best = analysis.best_overall().unwrap();
        assert_eq!(best.from, start() + Duration::minutes(30));
    }

    #[test]
    fn test_horizon_bests_respect_cutoffs() {
        // 96 half-hour slots; cheapest slot lies beyond 24h
        let mut intensities = vec![200.0; 96];
        intensities[4] = 150.0; // 2h in
        intensities[20] = 120.0; // 10h in
        intensities[40] = 100.0; // 20h in
        intensities[70] = 50.0; // 35h in

        let request = RunRequest::new(30, start()).with_horizon(RunWhen::Next8h);
        let analysis = analyse_forecast(&request, &forecast_of(&intensities));

        let at = |slot: i64| start() + Duration::minutes(30 * slot);
        assert_eq!(analysis.best_for(RunWhen::Next8h).unwrap().from, at(4));
        assert_eq!(analysis.best_for(RunWhen::Next12h).unwrap().from, at(20));
        assert_eq!(analysis.best_for(RunWhen::Next24h).unwrap().from, at(40));
        assert_eq!(analysis.best_for(RunWhen::Whenever).unwrap().from, at(70));
        assert_eq!(analysis.all[70].in_horizon_hours, 48);
        assert_eq!(analysis.all[16].in_horizon_hours, 8);
        assert_eq!(analysis.all[17].in_horizon_hours, 12);
    }

    #[test]
    fn test_horizon_bests_carry_band() {
        let request = RunRequest::new(60, start());
        let analysis = analyse_forecast(&request, &forecast_of(&[100.0, 50.0, 200.0, 30.0]));

        let best = analysis.best_overall().unwrap();
        assert_eq!(best.band, Some(Band::Best));
        assert_eq!(best.compared_to_best_percent, Some(0.0));
    }

    #[test]
    fn test_power_gives_total_carbon() {
        let request = RunRequest::new(60, start()).with_power(2000.0);
        let analysis = analyse_forecast(&request, &forecast_of(&[100.0, 50.0]));
        let only = &analysis.all[0];
        assert!((only.total_carbon.unwrap() - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_instant_readings_cover_every_block() {
        let request = RunRequest::new(60, start()).with_classification_year(2024);
        let analysis = analyse_forecast(&request, &forecast_of(&[100.0, 50.0, 200.0, 30.0]));

        assert_eq!(analysis.all.len(), 3);
        assert_eq!(analysis.instant.len(), 4);
        assert_eq!(analysis.instant[0].compared_to_now_percent, None);
        // 50 vs 75 now
        assert!((analysis.instant[1].compared_to_now_percent.unwrap() - 100.0 / 3.0).abs() < 1e-9);

        let last = analysis.instant.last().unwrap();
        assert_eq!(last.intensity, 30.0);
        assert_eq!(last.index, ForecastIndex::VeryLow);
        // 30 vs 75 now
        assert!((last.compared_to_now_percent.unwrap() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_gap_blocks_windows_that_span_it() {
        let mut forecast = forecast_of(&[100.0, 50.0, 200.0, 30.0, 60.0]);
        // Drop 19:00-19:30
        forecast.blocks.remove(2);

        let request = RunRequest::new(60, start());
        let analysis = analyse_forecast(&request, &forecast);

        let froms: Vec<_> = analysis.all.iter().map(|a| a.from).collect();
        assert_eq!(froms, vec![start(), start() + Duration::minutes(90)]);
        assert!((analysis.all[1].window_forecast - 45.0).abs() < 1e-9);
        assert_eq!(analysis.instant.len(), 4);
        assert_eq!(analysis.best_overall().unwrap().from, start() + Duration::minutes(90));
    }

    #[test]
    fn test_no_valid_window() {
        let request = RunRequest::new(240, start());
        let analysis = analyse_forecast(&request, &forecast_of(&[100.0, 50.0]));

        assert!(analysis.is_empty());
        assert!(analysis.bands.is_empty());
        assert!(analysis.forecasts.iter().all(|(_, a)| a.is_none()));
        assert_eq!(analysis.instant.len(), 2);
        assert!(analysis.instant.iter().all(|r| r.compared_to_now_percent.is_none()));
    }

    #[test]
    fn test_input_forecast_is_untouched() {
        let forecast = forecast_of(&[100.0, 50.0, 200.0, 30.0]);
        let before = forecast.clone();
        let request = RunRequest::new(60, start()).with_power(1000.0);
        let _ = analyse_forecast(&request, &forecast);
        assert_eq!(forecast, before);
    }
}

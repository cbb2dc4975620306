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

//! Banding of analysed slots by distance from the best overall option, and
//! segmentation of the timeline into runs of equal band.

use chrono::{DateTime, Utc};
use whento_types::{Band, BandSegment, MixEntry, RunRequest, TimeAnalysis};

use crate::classification::classify;
use crate::window::blend_mix;

/// Percentage above best still classed as best, ok and not bad
pub const BEST_BAND_PCT: f64 = 25.0;
pub const OK_BAND_PCT: f64 = 50.0;
pub const NOT_BAD_BAND_PCT: f64 = 75.0;

/// Percent above the best weighted forecast (0 = equal to best)
pub fn compared_to_best(weighted_forecast: f64, best_weighted_forecast: f64) -> f64 {
    if best_weighted_forecast > 0.0 {
        (weighted_forecast / best_weighted_forecast) * 100.0 - 100.0
    } else if weighted_forecast <= best_weighted_forecast {
        0.0
    } else {
        f64::INFINITY
    }
}

/// First band whose exclusive upper bound exceeds `compared_to_best`
pub fn band_for(compared_to_best: f64) -> Band {
    if compared_to_best < BEST_BAND_PCT {
        Band::Best
    } else if compared_to_best < OK_BAND_PCT {
        Band::Ok
    } else if compared_to_best < NOT_BAD_BAND_PCT {
        Band::NotBad
    } else {
        Band::Avoid
    }
}

/// Band every slot against the best overall weighted forecast and merge the
/// result into contiguous segments
pub fn apply_bandings(
    all: &mut [TimeAnalysis],
    best_weighted_forecast: f64,
    request: &RunRequest,
) -> Vec<BandSegment> {
    for analysis in all.iter_mut() {
        let pct = compared_to_best(analysis.weighted_forecast, best_weighted_forecast);
        analysis.compared_to_best_percent = Some(pct);
        analysis.band = Some(band_for(pct));
    }

    segment_bands(all, request)
}

#[derive(Debug)]
struct SegmentBuilder {
    band: Band,
    from: DateTime<Utc>,
    last_slot_end: DateTime<Utc>,
    forecast: f64,
    generation_mix: Vec<MixEntry>,
    minutes: i64,
    slots: usize,
}

impl SegmentBuilder {
    fn start(band: Band, slot: &TimeAnalysis) -> Self {
        Self {
            band,
            from: slot.from,
            last_slot_end: slot.slot_end,
            forecast: slot.window_forecast,
            generation_mix: slot.generation_mix.clone(),
            minutes: slot_minutes(slot),
            slots: 1,
        }
    }

    fn merge(self, slot: &TimeAnalysis) -> Self {
        let this_minutes = slot_minutes(slot);
        let total = self.minutes + this_minutes;
        let forecast = if total > 0 {
            (self.forecast * self.minutes as f64 + slot.window_forecast * this_minutes as f64)
                / total as f64
        } else {
            self.forecast
        };

        Self {
            forecast,
            generation_mix: blend_mix(
                &self.generation_mix,
                self.minutes,
                &slot.generation_mix,
                this_minutes,
            ),
            minutes: total,
            last_slot_end: slot.slot_end,
            slots: self.slots + 1,
            ..self
        }
    }

    fn finish(self, to: DateTime<Utc>, request: &RunRequest) -> BandSegment {
        BandSegment {
            band: self.band,
            from: self.from,
            to,
            forecast: self.forecast,
            index: classify(self.forecast, request.classification_year()),
            total_carbon: request.total_carbon(self.forecast),
            generation_mix: self.generation_mix,
            slots: self.slots,
        }
    }
}

fn slot_minutes(slot: &TimeAnalysis) -> i64 {
    (slot.slot_end - slot.from).num_minutes().max(0)
}

/// Merge banded slots into maximal runs of equal band.
///
/// Each segment ends where the next one starts; the last one ends at its final
/// slot's end. Slots without a band are skipped.
pub fn segment_bands(all: &[TimeAnalysis], request: &RunRequest) -> Vec<BandSegment> {
    let mut segments = Vec::new();
    let mut current: Option<SegmentBuilder> = None;

    for slot in all {
        let Some(band) = slot.band else {
            continue;
        };

        current = Some(match current.take() {
            Some(builder) if builder.band == band => builder.merge(slot),
            Some(builder) => {
                segments.push(builder.finish(slot.from, request));
                SegmentBuilder::start(band, slot)
            }
            None => SegmentBuilder::start(band, slot),
        });
    }

    if let Some(builder) = current {
        let end = builder.last_slot_end;
        segments.push(builder.finish(end, request));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use whento_types::ForecastIndex;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 6, 0, 0).unwrap()
    }

    fn slot(i: i64, window: f64, weighted: f64) -> TimeAnalysis {
        let from = start() + Duration::minutes(30 * i);
        TimeAnalysis {
            from,
            to: from + Duration::minutes(60),
            slot_end: from + Duration::minutes(30),
            instant_forecast: window,
            window_forecast: window,
            weighted_forecast: weighted,
            generation_mix: vec![MixEntry::new("wind", window / 10.0)],
            index: ForecastIndex::Moderate,
            in_horizon_hours: 8,
            total_carbon: None,
            compared_to_now_percent: None,
            compared_to_best_percent: None,
            band: None,
        }
    }

    #[test]
    fn test_band_thresholds_are_exclusive() {
        assert_eq!(band_for(0.0), Band::Best);
        assert_eq!(band_for(24.99), Band::Best);
        assert_eq!(band_for(25.0), Band::Ok);
        assert_eq!(band_for(49.99), Band::Ok);
        assert_eq!(band_for(50.0), Band::NotBad);
        assert_eq!(band_for(75.0), Band::Avoid);
        assert_eq!(band_for(f64::INFINITY), Band::Avoid);
    }

    #[test]
    fn test_compared_to_best() {
        assert!((compared_to_best(150.0, 100.0) - 50.0).abs() < 1e-9);
        assert!(compared_to_best(100.0, 100.0).abs() < 1e-9);
        assert!(compared_to_best(0.0, 0.0).abs() < 1e-9);
        assert!(compared_to_best(10.0, 0.0).is_infinite());
    }

    #[test]
    fn test_apply_bandings_merges_runs() {
        let request = RunRequest::new(60, start()).with_power(1000.0);
        let mut all = vec![
            slot(0, 100.0, 100.0),
            slot(1, 110.0, 110.0),
            slot(2, 160.0, 160.0),
            slot(3, 200.0, 200.0),
            slot(4, 105.0, 105.0),
        ];

        let segments = apply_bandings(&mut all, 100.0, &request);

        let bands: Vec<Band> = all.iter().filter_map(|a| a.band).collect();
        assert_eq!(
            bands,
            vec![Band::Best, Band::Best, Band::NotBad, Band::Avoid, Band::Best]
        );
        assert_eq!(segments.len(), 4);

        let first = &segments[0];
        assert_eq!(first.band, Band::Best);
        assert_eq!(first.slots, 2);
        assert!((first.forecast - 105.0).abs() < 1e-9);
        assert!((first.generation_mix[0].percent - 10.5).abs() < 1e-9);
        assert_eq!(first.from, all[0].from);
        assert_eq!(first.to, all[2].from);
        assert_eq!(first.index, ForecastIndex::Low);
        assert!((first.total_carbon.unwrap() - 105.0).abs() < 1e-9);

        let last = segments.last().unwrap();
        assert_eq!(last.from, all[4].from);
        assert_eq!(last.to, all[4].slot_end);
    }

    #[test]
    fn test_segments_tile_the_timeline() {
        let request = RunRequest::new(60, start());
        let mut all: Vec<TimeAnalysis> = [90.0, 95.0, 130.0, 180.0, 140.0, 91.0, 300.0]
            .iter()
            .enumerate()
            .map(|(i, &w)| slot(i as i64, w, w))
            .collect();

        let segments = apply_bandings(&mut all, 90.0, &request);

        assert_eq!(segments.first().unwrap().from, all[0].from);
        assert_eq!(segments.last().unwrap().to, all.last().unwrap().slot_end);
        for pair in segments.windows(2) {
            assert_eq!(pair[0].to, pair[1].from);
            assert_ne!(pair[0].band, pair[1].band);
        }
        assert_eq!(segments.iter().map(|s| s.slots).sum::<usize>(), all.len());
    }

    #[test]
    fn test_banding_is_idempotent() {
        let request = RunRequest::new(60, start());
        let mut all: Vec<TimeAnalysis> = [90.0, 120.0, 150.0, 170.0]
            .iter()
            .enumerate()
            .map(|(i, &w)| slot(i as i64, w, w))
            .collect();

        let first_segments = apply_bandings(&mut all, 90.0, &request);
        let first_pass = all.clone();
        let second_segments = apply_bandings(&mut all, 90.0, &request);

        assert_eq!(first_pass, all);
        assert_eq!(first_segments, second_segments);
    }

    #[test]
    fn test_empty_input_has_no_segments() {
        let request = RunRequest::new(60, start());
        assert!(apply_bandings(&mut [], 100.0, &request).is_empty());
    }
}

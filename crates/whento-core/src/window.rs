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

//! Rolling duration-weighted window over forecast blocks.

use chrono::{DateTime, Utc};
use std::ops::ControlFlow;
use whento_types::{MixEntry, TimeBlock};

/// Average intensity and mix for a run starting at one slot
#[derive(Debug, Clone, PartialEq)]
pub struct WindowForecast {
    /// Duration-weighted average intensity (gCO2/kWh)
    pub window_forecast: f64,

    /// `to` of the block that satisfied the duration
    pub end_time: DateTime<Utc>,

    pub generation_mix: Vec<MixEntry>,
}

#[derive(Debug, Default)]
struct WindowState {
    /// Sum of intensity-per-minute times consumed minutes
    carbon_sum: f64,
    minutes_found: i64,
    mix: Vec<MixEntry>,
    /// `to` of the last absorbed block
    last_end: Option<DateTime<Utc>>,
}

impl WindowState {
    /// True when `block` starts exactly where the previous one ended
    fn continues_with(&self, block: &TimeBlock) -> bool {
        self.last_end.is_none_or(|end| end == block.from)
    }

    fn absorb(self, block: &TimeBlock, duration_minutes: i64) -> Self {
        let minutes_left = duration_minutes - self.minutes_found;
        let consumed = block.duration_minutes().max(0).min(minutes_left);
        let intensity_per_minute = block.intensity / 60.0;

        Self {
            carbon_sum: self.carbon_sum + intensity_per_minute * consumed as f64,
            mix: blend_mix(
                &self.mix,
                self.minutes_found,
                &block.generation_mix,
                consumed,
            ),
            minutes_found: self.minutes_found + consumed,
            last_end: Some(block.to),
        }
    }

    fn finish(self, duration_minutes: i64, end_time: DateTime<Utc>) -> WindowForecast {
        WindowForecast {
            // Back to g/kWh
            window_forecast: (self.carbon_sum / duration_minutes as f64) * 60.0,
            end_time,
            generation_mix: self.mix,
        }
    }
}

/// Average intensity for a run of `duration_minutes` starting at `start_index`.
///
/// Returns `None` when the blocks run out or hit a gap before the duration is
/// covered, when `start_index` is past the end, or when the duration is not
/// positive.
pub fn compute_window(
    blocks: &[TimeBlock],
    start_index: usize,
    duration_minutes: i64,
) -> Option<WindowForecast> {
    if duration_minutes <= 0 {
        return None;
    }

    let outcome = blocks.get(start_index..)?.iter().try_fold(
        WindowState::default(),
        |state, block| {
            if !state.continues_with(block) {
                return ControlFlow::Break(None);
            }
            let next = state.absorb(block, duration_minutes);
            if next.minutes_found >= duration_minutes {
                ControlFlow::Break(Some(next.finish(duration_minutes, block.to)))
            } else {
                ControlFlow::Continue(next)
            }
        },
    );

    match outcome {
        ControlFlow::Break(window) => window,
        ControlFlow::Continue(_) => None,
    }
}

/// Minutes-weighted blend of two generation mixes.
///
/// Fuels missing from either side count as 0% for that side's minutes, so an
/// empty accumulated mix still dilutes the incoming one. With no accumulated
/// minutes the incoming mix is taken as-is.
pub fn blend_mix(
    accumulated: &[MixEntry],
    accumulated_minutes: i64,
    incoming: &[MixEntry],
    incoming_minutes: i64,
) -> Vec<MixEntry> {
    if incoming_minutes <= 0 {
        return accumulated.to_vec();
    }
    if accumulated_minutes <= 0 {
        return incoming.to_vec();
    }

    let acc_weight = accumulated_minutes as f64;
    let inc_weight = incoming_minutes as f64;
    let total = acc_weight + inc_weight;

    let percent_in = |mix: &[MixEntry], fuel: &str| {
        mix.iter()
            .find(|entry| entry.fuel == fuel)
            .map_or(0.0, |entry| entry.percent)
    };

    let merged = accumulated.iter().map(|entry| {
        let incoming_percent = percent_in(incoming, &entry.fuel);
        MixEntry::new(
            entry.fuel.clone(),
            (entry.percent * acc_weight + incoming_percent * inc_weight) / total,
        )
    });

    let new_fuels = incoming
        .iter()
        .filter(|entry| !accumulated.iter().any(|a| a.fuel == entry.fuel))
        .map(|entry| MixEntry::new(entry.fuel.clone(), entry.percent * inc_weight / total));

    merged.chain(new_fuels).collect()
}

//! Normalizer functions mapping a raw value onto a 0-100 sub-score.
//!
//! All three are pure and total: every finite input produces a score in
//! `[0, 100]`, and degenerate parameter shapes have a defined result instead of
//! dividing by zero.

use super::config::{Direction, Mode};

pub const MAX_SCORE: f64 = 100.0;

/// Linear ramp from `min` (0) to `max` (100), flipped for lower_is_better.
///
/// When `max == min` the ramp collapses to a step: 100 at or above `max`,
/// 0 below, before the direction flip.
pub fn linear(value: f64, min: f64, max: f64, direction: Direction) -> f64 {
    let t = if max == min {
        if value >= max {
            1.0
        } else {
            0.0
        }
    } else {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    };
    let t = match direction {
        Direction::HigherIsBetter => t,
        Direction::LowerIsBetter => 1.0 - t,
    };
    t * MAX_SCORE
}

/// Interpolate between `good_at` (100) and `zero_at` (0).
///
/// Which anchor is larger decides the direction: `good_at < zero_at` reads as
/// lower-is-better (commute minutes), `good_at > zero_at` as higher-is-better.
/// Equal anchors act as a lower-is-better step.
pub fn threshold(value: f64, good_at: f64, zero_at: f64) -> f64 {
    if good_at == zero_at {
        return if value <= good_at { MAX_SCORE } else { 0.0 };
    }
    let lower_is_better = good_at < zero_at;
    let at_good = if lower_is_better {
        value <= good_at
    } else {
        value >= good_at
    };
    let at_zero = if lower_is_better {
        value >= zero_at
    } else {
        value <= zero_at
    };
    if at_good {
        MAX_SCORE
    } else if at_zero {
        0.0
    } else {
        (zero_at - value) / (zero_at - good_at) * MAX_SCORE
    }
}

/// 100 at `ideal`, losing `decay_above` / `decay_below` points per unit of
/// distance on either side, floored at 0.
pub fn peak(value: f64, ideal: f64, decay_above: f64, decay_below: f64) -> f64 {
    let distance = value - ideal;
    let score = if distance >= 0.0 {
        MAX_SCORE - distance * decay_above
    } else {
        MAX_SCORE - distance.abs() * decay_below
    };
    score.clamp(0.0, MAX_SCORE)
}

/// Dispatch a value through the configured mode.
pub fn normalize(value: f64, mode: &Mode) -> f64 {
    match *mode {
        Mode::Linear {
            min,
            max,
            direction,
        } => linear(value, min, max, direction),
        Mode::Threshold { good_at, zero_at } => threshold(value, good_at, zero_at),
        Mode::Peak {
            ideal,
            decay_above,
            decay_below,
        } => peak(value, ideal, decay_above, decay_below),
    }
}

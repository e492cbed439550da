//! Time-weighted interpolation over irregular or gappy samples
//!
//! Positions are plain `f64` offsets (seconds, minutes, ...), so callers
//! decide the unit. Gaps are filled proportionally to the distance between
//! the surrounding known samples.

use crate::{MathError, Result};

/// Fill `None` gaps in `values` by linear interpolation over `positions`.
///
/// Interior gaps are interpolated; trailing gaps repeat the last known
/// value. Leading gaps (before the first known value) stay `None`.
pub fn fill_gaps(positions: &[f64], values: &[Option<f64>]) -> Result<Vec<Option<f64>>> {
    if positions.len() != values.len() {
        return Err(MathError::InvalidInput(format!(
            "Positions length ({}) doesn't match values length ({})",
            positions.len(),
            values.len()
        )));
    }

    let mut filled = values.to_vec();
    let mut previous: Option<usize> = None;

    for i in 0..values.len() {
        if values[i].is_none() {
            continue;
        }

        if let Some(p) = previous {
            if i > p + 1 {
                let (x0, y0) = (positions[p], values[p].unwrap_or_default());
                let (x1, y1) = (positions[i], values[i].unwrap_or_default());
                let span = x1 - x0;
                for j in p + 1..i {
                    let weight = if span.abs() < f64::EPSILON {
                        0.0
                    } else {
                        (positions[j] - x0) / span
                    };
                    filled[j] = Some(y0 + (y1 - y0) * weight);
                }
            }
        }
        previous = Some(i);
    }

    if let Some(last) = previous {
        let carried = values[last];
        for slot in filled.iter_mut().skip(last + 1) {
            *slot = carried;
        }
    }

    Ok(filled)
}

/// Interpolate the value at `position` from sorted `(position, value)` samples.
///
/// Returns `None` outside the sampled span.
pub fn value_at(samples: &[(f64, f64)], position: f64) -> Option<f64> {
    let first = samples.first()?;
    let last = samples.last()?;
    if position < first.0 || position > last.0 {
        return None;
    }

    let upper = samples.partition_point(|&(x, _)| x < position);
    if upper < samples.len() && (samples[upper].0 - position).abs() < f64::EPSILON {
        return Some(samples[upper].1);
    }
    if upper == 0 {
        return Some(first.1);
    }

    let (x0, y0) = samples[upper - 1];
    let (x1, y1) = samples[upper];
    let span = x1 - x0;
    if span.abs() < f64::EPSILON {
        return Some(y1);
    }
    Some(y0 + (y1 - y0) * (position - x0) / span)
}

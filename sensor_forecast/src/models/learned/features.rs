//! Feature preparation for the learned multi-output model
//!
//! Raw readings are re-indexed onto a fixed 5-minute cadence, gaps are filled
//! by time-weighted interpolation, and each row gains cyclical encodings of
//! its minute, hour, weekday and month.

use crate::channel::Channel;
use crate::data::Observation;
use crate::error::{ForecastError, Result};
use crate::models::validate_request;
use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Timelike};
use forecast_math::{cyclical, interpolation};
use polars::prelude::*;

/// Cadence of the resampled frame, in minutes
pub const RESAMPLE_MINUTES: i64 = 5;

/// Names of the engineered time features, in schema order
pub const TIME_FEATURES: [&str; 8] = [
    "minute_sin",
    "minute_cos",
    "hour_sin",
    "hour_cos",
    "day_sin",
    "day_cos",
    "month_sin",
    "month_cos",
];

/// Channel readings re-indexed onto a uniform grid
#[derive(Debug, Clone, PartialEq)]
pub struct ResampledFrame {
    timestamps: Vec<NaiveDateTime>,
    /// One column per channel, in [`Channel::ALL`] order
    columns: Vec<Vec<f64>>,
}

impl ResampledFrame {
    /// Resample every tracked channel onto a shared 5-minute grid.
    ///
    /// Bins are anchored at midnight of the earliest observed day and labelled
    /// by their left edge; each bin holds the mean of its readings. Empty bins
    /// are interpolated over time, bins after a channel's last reading repeat
    /// it, and bins before its first reading take the first reading.
    pub fn resample(readings: &[(Channel, &[Observation])]) -> Result<Self> {
        for channel in Channel::ALL {
            let present = readings
                .iter()
                .any(|(c, obs)| *c == channel && obs.iter().any(|o| o.value.is_finite()));
            if !present {
                return Err(ForecastError::InsufficientData(format!(
                    "No {} readings to build model features",
                    channel
                )));
            }
        }

        let earliest = readings
            .iter()
            .flat_map(|(_, obs)| obs.iter())
            .map(|o| o.timestamp)
            .min()
            .ok_or_else(|| {
                ForecastError::InsufficientData("No readings to resample".to_string())
            })?;
        let origin = earliest.date().and_time(NaiveTime::default());
        let bin_of = |timestamp: NaiveDateTime| -> i64 {
            (timestamp - origin)
                .num_seconds()
                .div_euclid(RESAMPLE_MINUTES * 60)
        };

        let (first_bin, last_bin) = readings
            .iter()
            .flat_map(|(_, obs)| obs.iter())
            .map(|o| bin_of(o.timestamp))
            .fold((i64::MAX, i64::MIN), |(lo, hi), bin| (lo.min(bin), hi.max(bin)));
        let rows = (last_bin - first_bin + 1) as usize;

        let timestamps: Vec<NaiveDateTime> = (0..rows as i64)
            .map(|offset| origin + Duration::minutes((first_bin + offset) * RESAMPLE_MINUTES))
            .collect();
        let positions: Vec<f64> = (0..rows).map(|row| row as f64).collect();

        let mut columns = Vec::with_capacity(Channel::ALL.len());
        for channel in Channel::ALL {
            let mut sums = vec![0.0; rows];
            let mut counts = vec![0usize; rows];
            for (_, observations) in readings.iter().filter(|(c, _)| *c == channel) {
                for observation in observations.iter().filter(|o| o.value.is_finite()) {
                    let row = (bin_of(observation.timestamp) - first_bin) as usize;
                    sums[row] += observation.value;
                    counts[row] += 1;
                }
            }

            let means: Vec<Option<f64>> = sums
                .iter()
                .zip(&counts)
                .map(|(&sum, &count)| (count > 0).then(|| sum / count as f64))
                .collect();
            let filled = interpolation::fill_gaps(&positions, &means)?;
            let first_known = filled.iter().flatten().next().copied().unwrap_or(f64::NAN);
            columns.push(
                filled
                    .into_iter()
                    .map(|value| value.unwrap_or(first_known))
                    .collect(),
            );
        }

        Ok(Self {
            timestamps,
            columns,
        })
    }

    /// Grid timestamps
    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    /// Resampled values of one channel
    pub fn channel(&self, channel: Channel) -> &[f64] {
        &self.columns[channel.index()]
    }

    /// Number of grid rows
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Whether the grid has no rows
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Rows at or before `cutoff`
    pub fn truncate_to(&self, cutoff: NaiveDateTime) -> Self {
        let rows = self.timestamps.partition_point(|t| *t <= cutoff);
        Self {
            timestamps: self.timestamps[..rows].to_vec(),
            columns: self.columns.iter().map(|c| c[..rows].to_vec()).collect(),
        }
    }

    /// Sensor values of the last row, in [`Channel::ALL`] order
    pub fn last_state(&self) -> Option<Vec<f64>> {
        let last = self.timestamps.len().checked_sub(1)?;
        Some(self.columns.iter().map(|c| c[last]).collect())
    }
}

/// Cyclical time features of one timestamp, in [`TIME_FEATURES`] order
pub fn time_features(timestamp: NaiveDateTime) -> [f64; 8] {
    let (minute_sin, minute_cos) = cyclical::encode(timestamp.minute() as f64, 60.0);
    let (hour_sin, hour_cos) = cyclical::encode(timestamp.hour() as f64, 24.0);
    let (day_sin, day_cos) =
        cyclical::encode(timestamp.weekday().num_days_from_monday() as f64, 7.0);
    let (month_sin, month_cos) = cyclical::encode(timestamp.month() as f64, 12.0);

    [
        minute_sin, minute_cos, hour_sin, hour_cos, day_sin, day_cos, month_sin, month_cos,
    ]
}

/// Build the model's feature frame: channel columns followed by time features
pub fn engineer_features(timestamps: &[NaiveDateTime], columns: &[Vec<f64>]) -> Result<DataFrame> {
    if columns.len() != Channel::ALL.len() {
        return Err(ForecastError::DataError(format!(
            "Expected {} channel columns, got {}",
            Channel::ALL.len(),
            columns.len()
        )));
    }
    if let Some(column) = columns.iter().find(|c| c.len() != timestamps.len()) {
        return Err(ForecastError::DataError(format!(
            "Channel column length ({}) doesn't match timestamps length ({})",
            column.len(),
            timestamps.len()
        )));
    }

    let mut series: Vec<Series> = Channel::ALL
        .iter()
        .zip(columns)
        .map(|(channel, values)| Series::new(channel.column(), values.clone()))
        .collect();

    let encoded: Vec<[f64; 8]> = timestamps.iter().map(|t| time_features(*t)).collect();
    for (i, name) in TIME_FEATURES.iter().enumerate() {
        let values: Vec<f64> = encoded.iter().map(|row| row[i]).collect();
        series.push(Series::new(name, values));
    }

    Ok(DataFrame::new(series)?)
}

/// Feature frame for `timestamps` with the sensor `state` repeated on every row
pub fn carried_forward_features(timestamps: &[NaiveDateTime], state: &[f64]) -> Result<DataFrame> {
    let columns: Vec<Vec<f64>> = state
        .iter()
        .map(|&value| vec![value; timestamps.len()])
        .collect();
    engineer_features(timestamps, &columns)
}

/// Future grid of the learned model: `num_points` steps of
/// `floor(horizon_hours * 60 / num_points)` whole minutes after `cutoff`.
pub fn minute_grid(
    cutoff: NaiveDateTime,
    horizon_hours: f64,
    num_points: usize,
) -> Result<Vec<NaiveDateTime>> {
    validate_request(horizon_hours, num_points)?;

    let step_minutes = (horizon_hours * 60.0 / num_points as f64).floor() as i64;
    if step_minutes < 1 {
        return Err(ForecastError::InvalidParameter(format!(
            "Horizon of {} hours over {} points is shorter than one minute per point",
            horizon_hours, num_points
        )));
    }

    (1..=num_points as i64)
        .map(|i| {
            cutoff
                .checked_add_signed(Duration::minutes(step_minutes * i))
                .ok_or_else(|| {
                    ForecastError::InvalidParameter(format!(
                        "Forecast grid of {} hours after {} is out of the timestamp range",
                        horizon_hours, cutoff
                    ))
                })
        })
        .collect()
}

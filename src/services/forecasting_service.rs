use thiserror::Error;

use crate::external::market_provider::PricePoint;

#[derive(Debug, Error, PartialEq)]
pub enum ForecastError {
    #[error("need at least 2 price points, got {0}")]
    InsufficientData(usize),

    #[error("price points share a single timestamp")]
    DegenerateTimestamps,
}

/// Fits an ordinary least-squares line through (timestamp, price) samples
/// and extrapolates one sampling interval past the last observation.
///
/// The extrapolation target is fixed at
/// `last_ts + (last_ts - second_to_last_ts)`: the series is assumed to be
/// uniformly sampled and the prediction is exactly one interval ahead.
pub fn predict_next(points: &[PricePoint]) -> Result<f64, ForecastError> {
    if points.len() < 2 {
        return Err(ForecastError::InsufficientData(points.len()));
    }

    let n = points.len() as f64;
    let t_mean = points.iter().map(|p| p.timestamp_ms).sum::<f64>() / n;
    let y_mean = points.iter().map(|p| p.price).sum::<f64>() / n;

    // Mean-centered sums keep the arithmetic stable for epoch-millisecond
    // timestamps.
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for point in points {
        let dt = point.timestamp_ms - t_mean;
        numerator += dt * (point.price - y_mean);
        denominator += dt * dt;
    }

    if denominator == 0.0 {
        return Err(ForecastError::DegenerateTimestamps);
    }

    let slope = numerator / denominator;
    let intercept = y_mean - slope * t_mean;

    let last = points[points.len() - 1].timestamp_ms;
    let second_to_last = points[points.len() - 2].timestamp_ms;
    let next_ts = last + (last - second_to_last);

    Ok(slope * next_ts + intercept)
}

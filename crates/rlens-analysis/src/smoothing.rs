//! Smoothing and statistical helpers for trajectory signals.
//!
//! This module contains the reusable math shared by the detection and
//! scoring stages:
//! - Basic statistics (mean, population variance)
//! - Extremum index helpers (first argmax/argmin)
//! - The valid-mode moving average that conditions the trajectory

use crate::error::{AnalysisError, AnalysisResult};

// === Statistical Functions ===

/// Calculate the arithmetic mean of a slice of values.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Calculate the population variance of a slice of values.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64
}

/// Index of the first maximum value, or `None` for an empty slice.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, current)) if v <= current => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Index of the first minimum value, or `None` for an empty slice.
pub fn argmin(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, current)) if v >= current => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Max minus min of a series, 0.0 when fewer than two samples.
pub fn span(values: &[f64]) -> f64 {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if max > min {
        max - min
    } else {
        0.0
    }
}

/// First difference of a series: `out[i] = values[i + 1] - values[i]`.
pub fn diff(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|pair| pair[1] - pair[0]).collect()
}

// === Filtering Functions ===

/// Apply a valid-mode moving average to a data series.
///
/// Unlike a padded filter, only windows fully inside the series are
/// averaged, so the output is shorter than the input by `window - 1`.
/// Output index `i` covers input frames `[i, i + window)`.
///
/// # Arguments
/// * `data` - The input data series
/// * `window` - Window size in samples
///
/// # Returns
/// The smoothed series, or [`AnalysisError::InsufficientData`] when the
/// series has fewer samples than one window.
pub fn moving_average_valid(data: &[f64], window: usize) -> AnalysisResult<Vec<f64>> {
    if window == 0 {
        return Err(AnalysisError::invalid_input("smoothing window must be > 0"));
    }
    if data.len() < window {
        return Err(AnalysisError::insufficient_data(window, data.len()));
    }

    let mut result = Vec::with_capacity(data.len() - window + 1);
    for start in 0..=(data.len() - window) {
        let slice = &data[start..start + window];
        result.push(slice.iter().sum::<f64>() / window as f64);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_variance() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[2.0, 4.0, 6.0]), 4.0);
        assert_eq!(variance(&[5.0]), 0.0);
        // Population variance of [1, 2, 3, 4] is 1.25
        assert!((variance(&[1.0, 2.0, 3.0, 4.0]) - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_argmax_prefers_first_of_ties() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0, 2.0]), Some(1));
        assert_eq!(argmin(&[4.0, 0.5, 0.5, 1.0]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_span_and_diff() {
        assert!((span(&[0.2, 0.8, 0.5]) - 0.6).abs() < 1e-12);
        assert_eq!(span(&[1.0]), 0.0);
        assert_eq!(span(&[]), 0.0);
        assert_eq!(diff(&[1.0, 3.0, 2.0]), vec![2.0, -1.0]);
        assert!(diff(&[4.0]).is_empty());
    }

    #[test]
    fn test_moving_average_shortens_by_window_minus_one() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let smoothed = moving_average_valid(&data, 5).unwrap();
        assert_eq!(smoothed.len(), data.len() - 4);
        assert!((smoothed[0] - 3.0).abs() < 1e-12);
        assert!((smoothed[1] - 4.0).abs() < 1e-12);
        assert!((smoothed[2] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_moving_average_exact_window_yields_one_sample() {
        let smoothed = moving_average_valid(&[1.0, 2.0, 3.0], 3).unwrap();
        assert_eq!(smoothed, vec![2.0]);
    }

    #[test]
    fn test_moving_average_rejects_short_series() {
        let err = moving_average_valid(&[1.0, 2.0], 5).unwrap_err();
        match err {
            AnalysisError::InsufficientData { required, actual } => {
                assert_eq!(required, 5);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_moving_average_is_deterministic() {
        let data: Vec<f64> = (0..50).map(|i| ((i as f64) * 0.37).sin()).collect();
        let a = moving_average_valid(&data, 5).unwrap();
        let b = moving_average_valid(&data, 5).unwrap();
        assert_eq!(a, b);
    }
}

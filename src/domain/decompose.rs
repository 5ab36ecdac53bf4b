//! Multiplicative trend/seasonal/residual decomposition of the close series.

use crate::domain::error::QuantlensError;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::series::TimeSeries;

pub const DEFAULT_DECOMPOSITION_PERIOD: usize = 30;

/// The three aligned components of a decomposition,
/// `close ≈ trend × seasonal × residual` wherever all are defined.
#[derive(Debug, Clone)]
pub struct Decomposition {
    pub trend: IndicatorSeries,
    pub seasonal: IndicatorSeries,
    pub residual: IndicatorSeries,
}

/// Classical multiplicative decomposition.
///
/// - trend: centered moving average (half-weighted endpoints when the period
///   is even), undefined for the first and last `period/2` positions;
/// - seasonal: per-phase means of close/trend, normalized to mean 1, defined
///   at every position;
/// - residual: close / (trend × seasonal), defined where trend is.
///
/// Requires at least `2 × period` bars.
pub fn decompose(series: &TimeSeries, period: usize) -> Result<Decomposition, QuantlensError> {
    let closes = series.closes();
    let n = closes.len();
    if period < 2 || n < 2 * period {
        return Err(QuantlensError::InsufficientHistory {
            needed: 2 * period.max(2),
            have: n,
        });
    }

    let trend = centered_trend(&closes, period);

    // Average the detrended ratio by phase within the period.
    let mut phase_sum = vec![0.0; period];
    let mut phase_count = vec![0usize; period];
    for (i, t) in trend.iter().enumerate() {
        if let Some(t) = t {
            phase_sum[i % period] += closes[i] / t;
            phase_count[i % period] += 1;
        }
    }
    let mut phase_avg: Vec<f64> = phase_sum
        .iter()
        .zip(&phase_count)
        .map(|(&sum, &count)| if count > 0 { sum / count as f64 } else { 1.0 })
        .collect();

    // Normalize so the seasonal factors multiply out to no net effect.
    let mean = phase_avg.iter().sum::<f64>() / period as f64;
    for factor in &mut phase_avg {
        *factor /= mean;
    }

    let seasonal: Vec<Option<f64>> = (0..n).map(|i| Some(phase_avg[i % period])).collect();
    let residual: Vec<Option<f64>> = (0..n)
        .map(|i| trend[i].map(|t| closes[i] / (t * phase_avg[i % period])))
        .collect();

    let dates = series.dates();
    Ok(Decomposition {
        trend: IndicatorSeries::from_options(IndicatorType::Trend(period), &dates, trend),
        seasonal: IndicatorSeries::from_options(IndicatorType::Seasonal(period), &dates, seasonal),
        residual: IndicatorSeries::from_options(IndicatorType::Residual(period), &dates, residual),
    })
}

/// Two-sided moving average. For an even period the window spans
/// `period + 1` bars with the two endpoints weighted by one half.
fn centered_trend(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let half = period / 2;
    let mut out = vec![None; n];

    if period % 2 == 0 {
        for i in half..n.saturating_sub(half) {
            let mut sum = 0.5 * values[i - half] + 0.5 * values[i + half];
            for j in (i - half + 1)..(i + half) {
                sum += values[j];
            }
            out[i] = Some(sum / period as f64);
        }
    } else {
        for i in half..n.saturating_sub(half) {
            let sum: f64 = values[i - half..=i + half].iter().sum();
            out[i] = Some(sum / period as f64);
        }
    }
    out
}

//! Momentum and overbought/oversold indicators: RSI, Stochastic, Fisher.

use crate::domain::indicator::{
    IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue,
};
use crate::domain::rolling::{diffs, rolling_max, rolling_mean, rolling_min};
use crate::domain::series::TimeSeries;

pub const DEFAULT_RSI_PERIOD: usize = 14;
pub const DEFAULT_STOCHASTIC_K: usize = 14;
pub const DEFAULT_STOCHASTIC_D: usize = 3;
pub const DEFAULT_FISHER_PERIOD: usize = 10;

/// Relative Strength Index over rolling-mean gains and losses.
///
/// `RSI = 100 - 100/(1+RS)` with `RS = mean(gains)/mean(losses)`. A window
/// with zero average loss but positive gains saturates at 100; a window where
/// both averages are zero (flat prices) is undefined.
pub fn calculate_rsi(series: &TimeSeries, period: usize) -> IndicatorSeries {
    let deltas = diffs(&series.closes());
    let gains: Vec<Option<f64>> = deltas.iter().map(|d| d.map(|d| d.max(0.0))).collect();
    let losses: Vec<Option<f64>> = deltas.iter().map(|d| d.map(|d| (-d).max(0.0))).collect();

    let avg_gain = rolling_mean(&gains, period);
    let avg_loss = rolling_mean(&losses, period);

    let values = avg_gain
        .into_iter()
        .zip(avg_loss)
        .map(|pair| match pair {
            (Some(gain), Some(loss)) => {
                if loss > 0.0 {
                    let rs = gain / loss;
                    Some(100.0 - 100.0 / (1.0 + rs))
                } else if gain > 0.0 {
                    Some(100.0)
                } else {
                    None
                }
            }
            _ => None,
        })
        .collect();

    IndicatorSeries::from_options(IndicatorType::Rsi(period), &series.dates(), values)
}

/// Stochastic Oscillator:
/// `%K = 100*(close - low_k)/(high_k - low_k)` over the trailing `k_period`
/// high/low range, `%D` = trailing mean of `%K` over `d_period`.
/// `%K` is undefined where the range is zero; a point is valid as soon as
/// `%K` exists, with `%D` joining after its own warm-up.
pub fn calculate_stochastic(
    series: &TimeSeries,
    k_period: usize,
    d_period: usize,
) -> IndicatorSeries {
    let highs: Vec<Option<f64>> = series.bars().iter().map(|b| Some(b.high)).collect();
    let lows: Vec<Option<f64>> = series.bars().iter().map(|b| Some(b.low)).collect();
    let high_k = rolling_max(&highs, k_period);
    let low_k = rolling_min(&lows, k_period);

    let k: Vec<Option<f64>> = series
        .bars()
        .iter()
        .enumerate()
        .map(|(i, bar)| match (high_k[i], low_k[i]) {
            (Some(h), Some(l)) if h > l => Some(100.0 * (bar.close - l) / (h - l)),
            _ => None,
        })
        .collect();
    let d = rolling_mean(&k, d_period);

    let values = series
        .dates()
        .into_iter()
        .enumerate()
        .map(|(i, date)| IndicatorPoint {
            date,
            valid: k[i].is_some(),
            value: IndicatorValue::Stochastic {
                k: k[i].unwrap_or(0.0),
                d: d[i],
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Stochastic { k_period, d_period },
        values,
    }
}

/// Fisher Transform of the close position inside its trailing min/max range.
///
/// `v = 2*((close - min)/(max - min) - 0.5)`, `Fisher = 0.5*ln((1+v)/(1-v))`.
/// Undefined where the range is zero or where `|v| >= 1` (the log diverges
/// when the close sits exactly on the window extreme).
pub fn calculate_fisher(series: &TimeSeries, period: usize) -> IndicatorSeries {
    let closes: Vec<Option<f64>> = series.closes().into_iter().map(Some).collect();
    let max_close = rolling_max(&closes, period);
    let min_close = rolling_min(&closes, period);

    let values = series
        .closes()
        .iter()
        .enumerate()
        .map(|(i, &close)| match (max_close[i], min_close[i]) {
            (Some(max), Some(min)) if max > min => {
                let v = 2.0 * ((close - min) / (max - min) - 0.5);
                if v.abs() >= 1.0 {
                    None
                } else {
                    Some(0.5 * ((1.0 + v) / (1.0 - v)).ln())
                }
            }
            _ => None,
        })
        .collect();

    IndicatorSeries::from_options(IndicatorType::Fisher(period), &series.dates(), values)
}

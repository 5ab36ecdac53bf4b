//! Trend-following indicators: SMA, EMA, VWAP, MACD.

use crate::domain::indicator::{
    IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue,
};
use crate::domain::rolling::rolling_mean;
use crate::domain::series::TimeSeries;

pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

/// Simple moving average of the close over a trailing window.
/// Warm-up: first `period - 1` points are invalid.
pub fn calculate_sma(series: &TimeSeries, period: usize) -> IndicatorSeries {
    let closes: Vec<Option<f64>> = series.closes().into_iter().map(Some).collect();
    IndicatorSeries::from_options(
        IndicatorType::Sma(period),
        &series.dates(),
        rolling_mean(&closes, period),
    )
}

/// Exponential moving average of the close, span `period`.
///
/// Recursive with seed = first close: `EMA[0] = close[0]`,
/// `EMA[i] = close[i]*α + EMA[i-1]*(1-α)`, `α = 2/(period+1)`.
/// Every position is defined.
pub fn calculate_ema(series: &TimeSeries, period: usize) -> IndicatorSeries {
    let values = ema_values(&series.closes(), period);
    IndicatorSeries::from_options(
        IndicatorType::Ema(period),
        &series.dates(),
        values.into_iter().map(Some).collect(),
    )
}

/// Volume-weighted average price from the series start:
/// `cum(close*volume) / cum(volume)`. Invalid while cumulative volume is zero.
pub fn calculate_vwap(series: &TimeSeries) -> IndicatorSeries {
    let mut cum_pv = 0.0;
    let mut cum_v = 0.0;
    let values = series
        .bars()
        .iter()
        .map(|bar| {
            cum_pv += bar.close * bar.volume;
            cum_v += bar.volume;
            if cum_v > 0.0 { Some(cum_pv / cum_v) } else { None }
        })
        .collect();

    IndicatorSeries::from_options(IndicatorType::Vwap, &series.dates(), values)
}

/// MACD line = EMA(12) - EMA(26); signal = EMA(MACD, 9).
/// Defined at every position (seeded EMAs have no warm-up).
pub fn calculate_macd(series: &TimeSeries) -> IndicatorSeries {
    let closes = series.closes();
    let fast = ema_values(&closes, MACD_FAST);
    let slow = ema_values(&closes, MACD_SLOW);
    let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal = ema_values(&line, MACD_SIGNAL);

    let values = series
        .dates()
        .into_iter()
        .enumerate()
        .map(|(i, date)| IndicatorPoint {
            date,
            valid: true,
            value: IndicatorValue::Macd {
                line: line[i],
                signal: signal[i],
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Macd {
            fast: MACD_FAST,
            slow: MACD_SLOW,
            signal: MACD_SIGNAL,
        },
        values,
    }
}

/// Seeded recursive EMA over a raw value slice, shared with MACD and Keltner.
pub(crate) fn ema_values(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut ema = 0.0;
    for (i, &v) in values.iter().enumerate() {
        ema = if i == 0 { v } else { v * alpha + ema * (1.0 - alpha) };
        out.push(ema);
    }
    out
}

//! Volatility and risk indicators: annualized volatility, ATR, Ulcer Index.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::rolling::{pct_change, rolling_mean, rolling_std, running_max};
use crate::domain::series::TimeSeries;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
pub const DEFAULT_VOLATILITY_WINDOW: usize = 30;
pub const DEFAULT_ATR_PERIOD: usize = 14;
pub const DEFAULT_ULCER_PERIOD: usize = 14;

/// Whole-range annualized volatility: sample standard deviation of daily
/// returns times √252. `None` with fewer than two defined returns.
pub fn annualized_volatility(series: &TimeSeries) -> Option<f64> {
    let returns: Vec<f64> = pct_change(&series.closes()).into_iter().flatten().collect();
    if returns.len() < 2 {
        return None;
    }
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let var = returns.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>()
        / (returns.len() - 1) as f64;
    Some(var.sqrt() * TRADING_DAYS_PER_YEAR.sqrt())
}

/// Rolling annualized volatility: trailing-window sample std of daily returns
/// times √252. The return at position 0 is undefined, so the first defined
/// point is at index `window`.
pub fn calculate_rolling_volatility(series: &TimeSeries, window: usize) -> IndicatorSeries {
    let returns = pct_change(&series.closes());
    let values = rolling_std(&returns, window)
        .into_iter()
        .map(|v| v.map(|s| s * TRADING_DAYS_PER_YEAR.sqrt()))
        .collect();
    IndicatorSeries::from_options(
        IndicatorType::RollingVolatility(window),
        &series.dates(),
        values,
    )
}

/// Average True Range: trailing mean of the true range.
///
/// The true range at position 0 has no previous close and is undefined, so
/// the first defined ATR is at index `period`.
pub fn calculate_atr(series: &TimeSeries, period: usize) -> IndicatorSeries {
    let bars = series.bars();
    let tr: Vec<Option<f64>> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                None
            } else {
                Some(bar.true_range(bars[i - 1].close))
            }
        })
        .collect();
    IndicatorSeries::from_options(
        IndicatorType::Atr(period),
        &series.dates(),
        rolling_mean(&tr, period),
    )
}

/// Ulcer Index: √(trailing mean of squared drawdown), drawdown measured
/// against the running maximum of the close.
pub fn calculate_ulcer_index(series: &TimeSeries, period: usize) -> IndicatorSeries {
    let closes = series.closes();
    let peaks = running_max(&closes);
    let squared_dd: Vec<Option<f64>> = closes
        .iter()
        .zip(&peaks)
        .map(|(&c, &peak)| {
            let dd = c / peak - 1.0;
            Some(dd * dd)
        })
        .collect();
    let values = rolling_mean(&squared_dd, period)
        .into_iter()
        .map(|v| v.map(f64::sqrt))
        .collect();
    IndicatorSeries::from_options(
        IndicatorType::UlcerIndex(period),
        &series.dates(),
        values,
    )
}

//! Volume-based indicators: OBV, IIX, CMF.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::rolling::{rolling_mean, rolling_sum};
use crate::domain::series::TimeSeries;

pub const DEFAULT_IIX_PERIOD: usize = 14;
pub const DEFAULT_CMF_PERIOD: usize = 20;

/// On-Balance Volume: cumulative signed volume.
///
/// The first bar has no previous close and contributes nothing; afterwards
/// volume is added on up days and subtracted otherwise (flat days subtract).
/// Every position is defined.
pub fn calculate_obv(series: &TimeSeries) -> IndicatorSeries {
    let bars = series.bars();
    let mut obv = 0.0;
    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i > 0 {
                let sign = if bar.close > bars[i - 1].close { 1.0 } else { -1.0 };
                obv += sign * bar.volume;
            }
            Some(obv)
        })
        .collect();

    IndicatorSeries::from_options(IndicatorType::Obv, &series.dates(), values)
}

/// Intraday Intensity Index: trailing mean of
/// `((close - low)/(high - low)) * volume`. A bar with zero range is
/// undefined and poisons the windows that contain it.
pub fn calculate_iix(series: &TimeSeries, period: usize) -> IndicatorSeries {
    let raw: Vec<Option<f64>> = series
        .bars()
        .iter()
        .map(|bar| {
            let range = bar.high - bar.low;
            if range > 0.0 {
                Some((bar.close - bar.low) / range * bar.volume)
            } else {
                None
            }
        })
        .collect();

    IndicatorSeries::from_options(
        IndicatorType::Iix(period),
        &series.dates(),
        rolling_mean(&raw, period),
    )
}

/// Chaikin Money Flow: trailing sum of money-flow volume over trailing sum of
/// volume, `MFV = ((close - low) - (high - close))/(high - low) * volume`.
pub fn calculate_cmf(series: &TimeSeries, period: usize) -> IndicatorSeries {
    let mfv: Vec<Option<f64>> = series
        .bars()
        .iter()
        .map(|bar| {
            let range = bar.high - bar.low;
            if range > 0.0 {
                Some(((bar.close - bar.low) - (bar.high - bar.close)) / range * bar.volume)
            } else {
                None
            }
        })
        .collect();
    let volumes: Vec<Option<f64>> = series.volumes().into_iter().map(Some).collect();

    let mfv_sum = rolling_sum(&mfv, period);
    let vol_sum = rolling_sum(&volumes, period);

    let values = mfv_sum
        .into_iter()
        .zip(vol_sum)
        .map(|pair| match pair {
            (Some(mfv), Some(vol)) if vol > 0.0 => Some(mfv / vol),
            _ => None,
        })
        .collect();

    IndicatorSeries::from_options(IndicatorType::Cmf(period), &series.dates(), values)
}

//! Performance and market-behavior indicators.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::rolling::pct_change;
use crate::domain::series::TimeSeries;

/// Daily proportional returns of the close. Undefined at index 0.
pub fn calculate_daily_returns(series: &TimeSeries) -> IndicatorSeries {
    IndicatorSeries::from_options(
        IndicatorType::DailyReturn,
        &series.dates(),
        pct_change(&series.closes()),
    )
}

/// Compounded cumulative return: `prod(1 + r) - 1` over the defined daily
/// returns. Undefined at index 0 where no return exists.
pub fn calculate_cumulative_return(series: &TimeSeries) -> IndicatorSeries {
    let returns = pct_change(&series.closes());
    let mut acc = 1.0;
    let values = returns
        .into_iter()
        .map(|r| {
            r.map(|r| {
                acc *= 1.0 + r;
                acc - 1.0
            })
        })
        .collect();

    IndicatorSeries::from_options(IndicatorType::CumulativeReturn, &series.dates(), values)
}

/// Simple-sum cumulative return, the benchmark line the comparison overlay
/// plots next to the compounded series.
pub fn calculate_relative_performance(series: &TimeSeries) -> IndicatorSeries {
    let returns = pct_change(&series.closes());
    let mut acc = 0.0;
    let values = returns
        .into_iter()
        .map(|r| {
            r.map(|r| {
                acc += r;
                acc
            })
        })
        .collect();

    IndicatorSeries::from_options(IndicatorType::RelativePerformance, &series.dates(), values)
}

/// Elder's Force Index: `volume * (close - prev_close)`. Undefined at index 0.
pub fn calculate_force_index(series: &TimeSeries) -> IndicatorSeries {
    let bars = series.bars();
    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                None
            } else {
                Some(bar.volume * (bar.close - bars[i - 1].close))
            }
        })
        .collect();

    IndicatorSeries::from_options(IndicatorType::ForceIndex, &series.dates(), values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use crate::domain::ohlcv::Bar;

    fn close_series(closes: &[f64]) -> TimeSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Days::new(i as u64),
                open: close,
                high: close,
                low: close,
                close,
                adj_close: close,
                volume: 1000.0,
            })
            .collect();
        TimeSeries::new("TEST", bars).unwrap()
    }

    #[test]
    fn daily_returns_undefined_at_start() {
        let ts = close_series(&[100.0, 110.0, 99.0]);
        let returns = calculate_daily_returns(&ts);
        assert_eq!(returns.value_at(0), None);
        assert_relative_eq!(returns.value_at(1).unwrap(), 0.1);
        assert_relative_eq!(returns.value_at(2).unwrap(), -0.1);
    }

    #[test]
    fn cumulative_return_compounds() {
        let ts = close_series(&[100.0, 110.0, 99.0]);
        let cum = calculate_cumulative_return(&ts);
        assert_eq!(cum.value_at(0), None);
        assert_relative_eq!(cum.value_at(1).unwrap(), 0.1, epsilon = 1e-12);
        // (1.1)(0.9) - 1 = -0.01
        assert_relative_eq!(cum.value_at(2).unwrap(), -0.01, epsilon = 1e-12);
    }

    #[test]
    fn cumulative_return_monotone_on_rising_close() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let ts = close_series(&closes);
        let cum = calculate_cumulative_return(&ts);
        for i in 2..60 {
            assert!(cum.value_at(i).unwrap() > cum.value_at(i - 1).unwrap());
        }
        // Total compounded return equals 159/100 - 1.
        assert_relative_eq!(cum.value_at(59).unwrap(), 0.59, epsilon = 1e-12);
    }

    #[test]
    fn relative_performance_sums_returns() {
        let ts = close_series(&[100.0, 110.0, 99.0]);
        let rel = calculate_relative_performance(&ts);
        assert_relative_eq!(rel.value_at(2).unwrap(), 0.1 - 0.1, epsilon = 1e-12);
    }

    #[test]
    fn force_index_scales_price_move_by_volume() {
        let ts = close_series(&[100.0, 102.0, 101.0]);
        let efi = calculate_force_index(&ts);
        assert_eq!(efi.value_at(0), None);
        assert_relative_eq!(efi.value_at(1).unwrap(), 2000.0);
        assert_relative_eq!(efi.value_at(2).unwrap(), -1000.0);
    }
}

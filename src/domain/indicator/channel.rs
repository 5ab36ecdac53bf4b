//! Channel indicators: Bollinger Bands, Keltner Channel, Donchian Channel.

use crate::domain::indicator::{
    IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue,
};
use crate::domain::indicator::trend::ema_values;
use crate::domain::rolling::{rolling_max, rolling_mean, rolling_min, rolling_std};
use crate::domain::series::TimeSeries;

pub const DEFAULT_CHANNEL_PERIOD: usize = 20;
pub const DEFAULT_CHANNEL_MULT_X100: u32 = 200;

/// Bollinger Bands: SMA(period) ± mult × rolling sample std of the close.
/// Warm-up: first `period - 1` points are invalid.
pub fn calculate_bollinger(series: &TimeSeries, period: usize, mult_x100: u32) -> IndicatorSeries {
    let closes: Vec<Option<f64>> = series.closes().into_iter().map(Some).collect();
    let middle = rolling_mean(&closes, period);
    let std = rolling_std(&closes, period);
    let mult = mult_x100 as f64 / 100.0;

    let values = series
        .dates()
        .into_iter()
        .enumerate()
        .map(|(i, date)| {
            let band = match (middle[i], std[i]) {
                (Some(m), Some(s)) => Some((m + mult * s, m, m - mult * s)),
                _ => None,
            };
            IndicatorPoint {
                date,
                valid: band.is_some(),
                value: match band {
                    Some((upper, middle, lower)) => IndicatorValue::Band {
                        upper,
                        middle,
                        lower,
                    },
                    None => IndicatorValue::Band {
                        upper: 0.0,
                        middle: 0.0,
                        lower: 0.0,
                    },
                },
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Bollinger { period, mult_x100 },
        values,
    }
}

/// Keltner Channel: EMA(period) ± mult × rolling mean of the true range.
///
/// The EMA midline has no warm-up but the true-range mean does (the TR at
/// index 0 is undefined), so points are valid from index `period` onwards.
pub fn calculate_keltner(series: &TimeSeries, period: usize, mult_x100: u32) -> IndicatorSeries {
    let bars = series.bars();
    let middle = ema_values(&series.closes(), period);
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
    let atr = rolling_mean(&tr, period);
    let mult = mult_x100 as f64 / 100.0;

    let values = series
        .dates()
        .into_iter()
        .enumerate()
        .map(|(i, date)| IndicatorPoint {
            date,
            valid: atr[i].is_some(),
            value: match atr[i] {
                Some(a) => IndicatorValue::Band {
                    upper: middle[i] + mult * a,
                    middle: middle[i],
                    lower: middle[i] - mult * a,
                },
                None => IndicatorValue::Band {
                    upper: 0.0,
                    middle: 0.0,
                    lower: 0.0,
                },
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Keltner { period, mult_x100 },
        values,
    }
}

/// Donchian Channel: rolling max of the high and rolling min of the low.
pub fn calculate_donchian(series: &TimeSeries, period: usize) -> IndicatorSeries {
    let highs: Vec<Option<f64>> = series.bars().iter().map(|b| Some(b.high)).collect();
    let lows: Vec<Option<f64>> = series.bars().iter().map(|b| Some(b.low)).collect();
    let upper = rolling_max(&highs, period);
    let lower = rolling_min(&lows, period);

    let values = series
        .dates()
        .into_iter()
        .enumerate()
        .map(|(i, date)| IndicatorPoint {
            date,
            valid: upper[i].is_some() && lower[i].is_some(),
            value: IndicatorValue::Channel {
                upper: upper[i].unwrap_or(0.0),
                lower: lower[i].unwrap_or(0.0),
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Donchian(period),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use crate::domain::ohlcv::Bar;

    fn make_bar(i: usize, high: f64, low: f64, close: f64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64),
            open: close,
            high,
            low,
            close,
            adj_close: close,
            volume: 1000.0,
        }
    }

    fn close_series(closes: &[f64]) -> TimeSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| make_bar(i, c, c, c))
            .collect();
        TimeSeries::new("TEST", bars).unwrap()
    }

    #[test]
    fn bollinger_constant_series_collapses_to_price() {
        let ts = close_series(&[100.0; 5]);
        let bb = calculate_bollinger(&ts, 3, 200);

        assert!(!bb.values[1].valid);
        if let IndicatorValue::Band { upper, middle, lower } = bb.values[2].value {
            assert_relative_eq!(upper, 100.0);
            assert_relative_eq!(middle, 100.0);
            assert_relative_eq!(lower, 100.0);
        } else {
            panic!("expected Band value");
        }
    }

    #[test]
    fn bollinger_bands_bracket_the_sma() {
        let ts = close_series(&[10.0, 20.0, 30.0, 25.0, 15.0, 35.0]);
        let bb = calculate_bollinger(&ts, 3, 200);

        for point in bb.values.iter().filter(|p| p.valid) {
            if let IndicatorValue::Band { upper, middle, lower } = point.value {
                assert!(upper >= middle);
                assert!(middle >= lower);
            }
        }
    }

    #[test]
    fn bollinger_uses_sample_std() {
        let ts = close_series(&[10.0, 20.0, 30.0]);
        let bb = calculate_bollinger(&ts, 3, 200);

        if let IndicatorValue::Band { upper, middle, .. } = bb.values[2].value {
            // Sample std of {10,20,30} is 10.
            assert_relative_eq!(middle, 20.0);
            assert_relative_eq!(upper, 40.0, epsilon = 1e-12);
        } else {
            panic!("expected Band value");
        }
    }

    #[test]
    fn keltner_valid_from_period_onwards() {
        let bars: Vec<Bar> = (0..8).map(|i| make_bar(i, 110.0, 90.0, 100.0)).collect();
        let ts = TimeSeries::new("TEST", bars).unwrap();
        let kc = calculate_keltner(&ts, 3, 200);

        assert!(!kc.values[2].valid);
        assert!(kc.values[3].valid);
        if let IndicatorValue::Band { upper, middle, lower } = kc.values[3].value {
            // Constant price: EMA = 100, ATR = 20 → 100 ± 40.
            assert_relative_eq!(middle, 100.0);
            assert_relative_eq!(upper, 140.0);
            assert_relative_eq!(lower, 60.0);
        } else {
            panic!("expected Band value");
        }
    }

    #[test]
    fn donchian_tracks_extremes() {
        let bars = vec![
            make_bar(0, 110.0, 95.0, 100.0),
            make_bar(1, 120.0, 90.0, 105.0),
            make_bar(2, 115.0, 98.0, 102.0),
        ];
        let ts = TimeSeries::new("TEST", bars).unwrap();
        let dc = calculate_donchian(&ts, 3);

        assert!(!dc.values[1].valid);
        if let IndicatorValue::Channel { upper, lower } = dc.values[2].value {
            assert_relative_eq!(upper, 120.0);
            assert_relative_eq!(lower, 90.0);
        } else {
            panic!("expected Channel value");
        }
    }
}

//! Technical indicator library.
//!
//! Each indicator is a pure function `f(&TimeSeries, params) -> IndicatorSeries`
//! producing one point per source bar, aligned 1:1 with the series dates.
//! Positions inside a warm-up period, and positions where a formula divides by
//! zero, are marked invalid rather than reported as errors.
//!
//! Families:
//! - [`trend`]: SMA, EMA, VWAP, MACD
//! - [`volatility`]: annualized volatility, ATR, Ulcer Index
//! - [`momentum`]: RSI, Stochastic Oscillator, Fisher Transform
//! - [`volume`]: OBV, IIX, CMF
//! - [`channel`]: Bollinger, Keltner, Donchian
//! - [`performance`]: daily/cumulative returns, relative performance, Force Index

pub mod channel;
pub mod momentum;
pub mod performance;
pub mod trend;
pub mod volatility;
pub mod volume;

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: IndicatorValue,
}

#[derive(Debug, Clone)]
pub enum IndicatorValue {
    Simple(f64),
    Macd { line: f64, signal: f64 },
    /// `%D` lags `%K` by its own warm-up, so it is optional per point.
    Stochastic { k: f64, d: Option<f64> },
    Band { upper: f64, middle: f64, lower: f64 },
    Channel { upper: f64, lower: f64 },
}

impl IndicatorValue {
    /// The scalar payload for single-valued indicators; 0.0 for compound shapes.
    pub fn simple(&self) -> f64 {
        match self {
            IndicatorValue::Simple(v) => *v,
            _ => 0.0,
        }
    }
}

/// Indicator identity plus parameters. Usable as a map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Vwap,
    Macd { fast: usize, slow: usize, signal: usize },
    RollingVolatility(usize),
    Atr(usize),
    UlcerIndex(usize),
    Rsi(usize),
    Stochastic { k_period: usize, d_period: usize },
    Fisher(usize),
    Obv,
    Iix(usize),
    Cmf(usize),
    Bollinger { period: usize, mult_x100: u32 },
    Keltner { period: usize, mult_x100: u32 },
    Donchian(usize),
    DailyReturn,
    CumulativeReturn,
    RelativePerformance,
    ForceIndex,
    Trend(usize),
    Seasonal(usize),
    Residual(usize),
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Build a single-valued series from per-date optional values.
    pub(crate) fn from_options(
        indicator_type: IndicatorType,
        dates: &[NaiveDate],
        values: Vec<Option<f64>>,
    ) -> Self {
        let values = dates
            .iter()
            .zip(values)
            .map(|(&date, value)| IndicatorPoint {
                date,
                valid: value.is_some(),
                value: IndicatorValue::Simple(value.unwrap_or(0.0)),
            })
            .collect();
        Self {
            indicator_type,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Scalar value at `index`, or `None` when the point is invalid.
    pub fn value_at(&self, index: usize) -> Option<f64> {
        let point = &self.values[index];
        if point.valid {
            Some(point.value.simple())
        } else {
            None
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Vwap => write!(f, "VWAP"),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::RollingVolatility(period) => write!(f, "VOLATILITY({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::UlcerIndex(period) => write!(f, "ULCER({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Stochastic { k_period, d_period } => {
                write!(f, "STOCHASTIC({},{})", k_period, d_period)
            }
            IndicatorType::Fisher(period) => write!(f, "FISHER({})", period),
            IndicatorType::Obv => write!(f, "OBV"),
            IndicatorType::Iix(period) => write!(f, "IIX({})", period),
            IndicatorType::Cmf(period) => write!(f, "CMF({})", period),
            IndicatorType::Bollinger { period, mult_x100 } => {
                write!(f, "BOLLINGER({},{})", period, *mult_x100 as f64 / 100.0)
            }
            IndicatorType::Keltner { period, mult_x100 } => {
                write!(f, "KELTNER({},{})", period, *mult_x100 as f64 / 100.0)
            }
            IndicatorType::Donchian(period) => write!(f, "DONCHIAN({})", period),
            IndicatorType::DailyReturn => write!(f, "DAILY_RETURN"),
            IndicatorType::CumulativeReturn => write!(f, "CUMULATIVE_RETURN"),
            IndicatorType::RelativePerformance => write!(f, "RELATIVE_PERFORMANCE"),
            IndicatorType::ForceIndex => write!(f, "FORCE_INDEX"),
            IndicatorType::Trend(period) => write!(f, "TREND({})", period),
            IndicatorType::Seasonal(period) => write!(f, "SEASONAL({})", period),
            IndicatorType::Residual(period) => write!(f, "RESIDUAL({})", period),
        }
    }
}

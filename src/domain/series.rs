//! Immutable OHLCV time series with a date index.

use crate::domain::error::QuantlensError;
use crate::domain::ohlcv::Bar;
use chrono::NaiveDate;
use std::collections::HashMap;

/// An ordered sequence of bars for one symbol, strictly increasing by date.
///
/// Construction sorts the bars and drops duplicate dates (first occurrence
/// wins). Once built the series is immutable; derived indicator columns live
/// in separate [`IndicatorSeries`](crate::domain::indicator::IndicatorSeries)
/// values keyed by the same dates.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    symbol: String,
    bars: Vec<Bar>,
    date_index: HashMap<NaiveDate, usize>,
}

impl TimeSeries {
    pub fn new(symbol: impl Into<String>, mut bars: Vec<Bar>) -> Result<Self, QuantlensError> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(QuantlensError::EmptyRange { symbol });
        }
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);

        let date_index = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| (bar.date, i))
            .collect();

        Ok(Self {
            symbol,
            bars,
            date_index,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// A constructed series is never empty, but callers iterating generically
    /// still get the conventional pair.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn bar(&self, index: usize) -> &Bar {
        &self.bars[index]
    }

    pub fn bar_on(&self, date: NaiveDate) -> Option<&Bar> {
        self.date_index.get(&date).map(|&i| &self.bars[i])
    }

    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.date_index.get(&date).copied()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.bars[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.bars[self.bars.len() - 1].date
    }
}

//! Multi-symbol comparison: overlays, return series, and histogram binning.

use crate::domain::error::QuantlensError;
use crate::domain::indicator::IndicatorSeries;
use crate::domain::indicator::performance::calculate_daily_returns;
use crate::domain::series::TimeSeries;
use crate::ports::data_port::MarketDataPort;
use chrono::NaiveDate;

pub const HISTOGRAM_BINS: usize = 50;

/// One successfully compared symbol: its series (original calendar, never
/// reindexed against the other symbols) and its daily-return series.
#[derive(Debug, Clone)]
pub struct SymbolPanel {
    pub series: TimeSeries,
    pub returns: IndicatorSeries,
}

/// A per-symbol failure collected during comparison.
#[derive(Debug)]
pub struct SymbolFailure {
    pub symbol: String,
    pub error: QuantlensError,
}

/// Aggregated comparison outcome: panels for the symbols that resolved,
/// failures for the ones that did not.
#[derive(Debug)]
pub struct Comparison {
    pub panels: Vec<SymbolPanel>,
    pub failures: Vec<SymbolFailure>,
}

/// Shared-edge return histogram for overlaid rendering.
#[derive(Debug, Clone)]
pub struct ReturnHistogram {
    /// `bins + 1` edges spanning the combined return range of all panels.
    pub edges: Vec<f64>,
    /// Per-symbol bin counts, parallel to the panel order.
    pub counts: Vec<(String, Vec<usize>)>,
}

/// Fetch and prepare each symbol independently. One symbol's failure is
/// recorded and does not abort the others.
pub fn compare_symbols(
    port: &dyn MarketDataPort,
    symbols: &[String],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Comparison {
    let mut panels = Vec::new();
    let mut failures = Vec::new();

    for symbol in symbols {
        match fetch_panel(port, symbol, start_date, end_date) {
            Ok(panel) => panels.push(panel),
            Err(error) => failures.push(SymbolFailure {
                symbol: symbol.clone(),
                error,
            }),
        }
    }

    Comparison { panels, failures }
}

fn fetch_panel(
    port: &dyn MarketDataPort,
    symbol: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<SymbolPanel, QuantlensError> {
    let bars = port.fetch_ohlcv(symbol, start_date, end_date)?;
    let series = TimeSeries::new(symbol, bars)?;
    let returns = calculate_daily_returns(&series);
    Ok(SymbolPanel { series, returns })
}

/// Bin every defined daily return into `bins` equal-width bins over the
/// combined range of all panels. `None` when no panel has a defined return.
pub fn return_histogram(panels: &[SymbolPanel], bins: usize) -> Option<ReturnHistogram> {
    if bins == 0 {
        return None;
    }

    let all: Vec<f64> = panels
        .iter()
        .flat_map(|p| (0..p.returns.len()).filter_map(|i| p.returns.value_at(i)))
        .collect();
    if all.is_empty() {
        return None;
    }

    let min = all.iter().copied().fold(f64::INFINITY, f64::min);
    let max = all.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // A degenerate range still yields one populated bin.
    let width = if max > min { (max - min) / bins as f64 } else { 1.0 };

    let edges = (0..=bins).map(|i| min + width * i as f64).collect();

    let counts = panels
        .iter()
        .map(|panel| {
            let mut count = vec![0usize; bins];
            for i in 0..panel.returns.len() {
                if let Some(r) = panel.returns.value_at(i) {
                    let bin = (((r - min) / width) as usize).min(bins - 1);
                    count[bin] += 1;
                }
            }
            (panel.series.symbol().to_string(), count)
        })
        .collect();

    Some(ReturnHistogram { edges, counts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::Bar;
    use std::collections::HashMap;

    struct MockDataPort {
        bars: HashMap<String, Vec<Bar>>,
    }

    impl MockDataPort {
        fn new() -> Self {
            Self {
                bars: HashMap::new(),
            }
        }

        fn with_closes(mut self, symbol: &str, closes: &[f64]) -> Self {
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
            self.bars.insert(symbol.to_string(), bars);
            self
        }
    }

    impl MarketDataPort for MockDataPort {
        fn fetch_ohlcv(
            &self,
            symbol: &str,
            _start_date: NaiveDate,
            _end_date: NaiveDate,
        ) -> Result<Vec<Bar>, QuantlensError> {
            self.bars
                .get(symbol)
                .cloned()
                .ok_or_else(|| QuantlensError::Retrieval {
                    symbol: symbol.to_string(),
                    reason: "unknown symbol".into(),
                })
        }

        fn list_symbols(&self) -> Result<Vec<String>, QuantlensError> {
            Ok(self.bars.keys().cloned().collect())
        }
    }

    fn range() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
    }

    #[test]
    fn one_failure_does_not_abort_the_rest() {
        let port = MockDataPort::new()
            .with_closes("AAPL", &[100.0, 101.0, 102.0])
            .with_closes("MSFT", &[200.0, 198.0, 202.0]);
        let symbols = vec!["AAPL".to_string(), "NOPE".to_string(), "MSFT".to_string()];
        let (start, end) = range();

        let comparison = compare_symbols(&port, &symbols, start, end);

        assert_eq!(comparison.panels.len(), 2);
        assert_eq!(comparison.failures.len(), 1);
        assert_eq!(comparison.failures[0].symbol, "NOPE");
        assert!(matches!(
            comparison.failures[0].error,
            QuantlensError::Retrieval { .. }
        ));
    }

    #[test]
    fn panels_keep_their_own_calendars() {
        let mut port = MockDataPort::new().with_closes("AAPL", &[100.0, 101.0]);
        // MSFT trades on different dates.
        port.bars.insert(
            "MSFT".to_string(),
            vec![Bar {
                date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                open: 200.0,
                high: 200.0,
                low: 200.0,
                close: 200.0,
                adj_close: 200.0,
                volume: 1000.0,
            }],
        );
        let symbols = vec!["AAPL".to_string(), "MSFT".to_string()];
        let (start, end) = range();

        let comparison = compare_symbols(&port, &symbols, start, end);

        assert_eq!(comparison.panels[0].series.len(), 2);
        assert_eq!(comparison.panels[1].series.len(), 1);
        assert_ne!(
            comparison.panels[0].series.first_date(),
            comparison.panels[1].series.first_date()
        );
    }

    #[test]
    fn histogram_counts_defined_returns() {
        let port = MockDataPort::new()
            .with_closes("AAPL", &[100.0, 110.0, 99.0])
            .with_closes("MSFT", &[100.0, 105.0]);
        let symbols = vec!["AAPL".to_string(), "MSFT".to_string()];
        let (start, end) = range();
        let comparison = compare_symbols(&port, &symbols, start, end);

        let hist = return_histogram(&comparison.panels, HISTOGRAM_BINS).unwrap();

        assert_eq!(hist.edges.len(), HISTOGRAM_BINS + 1);
        assert_eq!(hist.counts.len(), 2);
        // AAPL has two defined returns, MSFT one.
        assert_eq!(hist.counts[0].1.iter().sum::<usize>(), 2);
        assert_eq!(hist.counts[1].1.iter().sum::<usize>(), 1);
    }

    #[test]
    fn histogram_of_single_bar_panels_is_none() {
        let port = MockDataPort::new().with_closes("AAPL", &[100.0]);
        let symbols = vec!["AAPL".to_string()];
        let (start, end) = range();
        let comparison = compare_symbols(&port, &symbols, start, end);

        assert!(return_histogram(&comparison.panels, HISTOGRAM_BINS).is_none());
    }

    #[test]
    fn histogram_degenerate_range_uses_one_bin() {
        // Identical returns everywhere: min == max.
        let port = MockDataPort::new().with_closes("AAPL", &[100.0, 110.0, 121.0]);
        let symbols = vec!["AAPL".to_string()];
        let (start, end) = range();
        let comparison = compare_symbols(&port, &symbols, start, end);

        let hist = return_histogram(&comparison.panels, 10).unwrap();
        assert_eq!(hist.counts[0].1[0], 2);
    }
}

//! CSV file data adapter.
//!
//! Reads `<base>/<SYMBOL>.csv` files with a
//! `Date,Open,High,Low,Close,Adj Close,Volume` header. The `Adj Close`
//! column is optional; when absent the close stands in for it.

use crate::domain::error::QuantlensError;
use crate::domain::ohlcv::Bar;
use crate::ports::data_port::MarketDataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn retrieval_error(symbol: &str, reason: impl Into<String>) -> QuantlensError {
    QuantlensError::Retrieval {
        symbol: symbol.to_string(),
        reason: reason.into(),
    }
}

fn parse_number(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    symbol: &str,
) -> Result<f64, QuantlensError> {
    record
        .get(index)
        .ok_or_else(|| retrieval_error(symbol, format!("missing {} column", name)))?
        .parse()
        .map_err(|e| retrieval_error(symbol, format!("invalid {} value: {}", name, e)))
}

impl MarketDataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, QuantlensError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| {
            retrieval_error(symbol, format!("failed to read {}: {}", path.display(), e))
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| retrieval_error(symbol, format!("CSV parse error: {}", e)))?;
        let adj_close_col = headers.iter().position(|h| h == "Adj Close");
        let volume_col = headers
            .iter()
            .position(|h| h == "Volume")
            .unwrap_or(if adj_close_col.is_some() { 6 } else { 5 });

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record =
                result.map_err(|e| retrieval_error(symbol, format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(0)
                .ok_or_else(|| retrieval_error(symbol, "missing date column"))?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .map_err(|e| retrieval_error(symbol, format!("invalid date format: {}", e)))?;

            if date < start_date || date > end_date {
                continue;
            }

            let open = parse_number(&record, 1, "open", symbol)?;
            let high = parse_number(&record, 2, "high", symbol)?;
            let low = parse_number(&record, 3, "low", symbol)?;
            let close = parse_number(&record, 4, "close", symbol)?;
            let adj_close = match adj_close_col {
                Some(col) => parse_number(&record, col, "adjusted close", symbol)?,
                None => close,
            };
            let volume = parse_number(&record, volume_col, "volume", symbol)?;

            bars.push(Bar {
                date,
                open,
                high,
                low,
                close,
                adj_close,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, QuantlensError> {
        let entries = fs::read_dir(&self.base_path)?;
        let mut symbols = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "csv") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    symbols.push(stem.to_string());
                }
            }
        }
        symbols.sort();
        Ok(symbols)
    }
}

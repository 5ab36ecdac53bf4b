//! Market-data retrieval port trait.

use crate::domain::error::QuantlensError;
use crate::domain::ohlcv::Bar;
use chrono::NaiveDate;

/// Retrieval collaborator: given a symbol and date range, return an ordered
/// OHLCV table or a typed error. The core never crashes on a retrieval
/// failure; it surfaces the error message.
pub trait MarketDataPort {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, QuantlensError>;

    fn list_symbols(&self) -> Result<Vec<String>, QuantlensError>;
}

//! Core domain: market data model, indicator library, and the analysis,
//! comparison, decomposition, and forecasting operations over it.
//!
//! Everything in here is pure computation against the port traits; no I/O.

pub mod analysis;
pub mod compare;
pub mod decompose;
pub mod error;
pub mod forecast;
pub mod indicator;
pub mod ohlcv;
pub mod request;
pub mod rolling;
pub mod series;

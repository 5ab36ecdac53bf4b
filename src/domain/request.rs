//! Request-scoped analysis parameters.

use chrono::NaiveDate;

pub const MIN_WINDOW: usize = 5;
pub const MAX_WINDOW: usize = 200;
pub const DEFAULT_SMA_WINDOW: usize = 20;
pub const DEFAULT_EMA_WINDOW: usize = 20;

/// Everything one analysis run needs, fixed at construction. User-selectable
/// window sizes are clamped to `[MIN_WINDOW, MAX_WINDOW]` here so the
/// indicator formulas never see an out-of-range parameter.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub sma_window: usize,
    pub ema_window: usize,
}

impl AnalysisRequest {
    pub fn new(
        symbol: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        sma_window: usize,
        ema_window: usize,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            start_date,
            end_date,
            sma_window: clamp_window(sma_window),
            ema_window: clamp_window(ema_window),
        }
    }
}

pub fn clamp_window(window: usize) -> usize {
    window.clamp(MIN_WINDOW, MAX_WINDOW)
}

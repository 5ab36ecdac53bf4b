//! The single-symbol analysis pipeline.

use crate::domain::decompose::{decompose, Decomposition, DEFAULT_DECOMPOSITION_PERIOD};
use crate::domain::error::QuantlensError;
use crate::domain::indicator::channel::{
    calculate_bollinger, calculate_donchian, calculate_keltner, DEFAULT_CHANNEL_MULT_X100,
    DEFAULT_CHANNEL_PERIOD,
};
use crate::domain::indicator::momentum::{
    calculate_fisher, calculate_rsi, calculate_stochastic, DEFAULT_FISHER_PERIOD,
    DEFAULT_RSI_PERIOD, DEFAULT_STOCHASTIC_D, DEFAULT_STOCHASTIC_K,
};
use crate::domain::indicator::performance::{
    calculate_cumulative_return, calculate_daily_returns, calculate_force_index,
    calculate_relative_performance,
};
use crate::domain::indicator::trend::{
    calculate_ema, calculate_macd, calculate_sma, calculate_vwap,
};
use crate::domain::indicator::volatility::{
    annualized_volatility, calculate_atr, calculate_rolling_volatility, calculate_ulcer_index,
    DEFAULT_ATR_PERIOD, DEFAULT_ULCER_PERIOD, DEFAULT_VOLATILITY_WINDOW,
};
use crate::domain::indicator::volume::{
    calculate_cmf, calculate_iix, calculate_obv, DEFAULT_CMF_PERIOD, DEFAULT_IIX_PERIOD,
};
use crate::domain::indicator::IndicatorSeries;
use crate::domain::request::AnalysisRequest;
use crate::domain::series::TimeSeries;
use crate::ports::data_port::MarketDataPort;

/// Every panel one analysis run produces. The decomposition is captured as a
/// `Result` so a short series reports its failure alongside the panels that
/// did compute.
#[derive(Debug)]
pub struct AnalysisReport {
    pub series: TimeSeries,
    pub sma: IndicatorSeries,
    pub ema: IndicatorSeries,
    pub vwap: IndicatorSeries,
    pub macd: IndicatorSeries,
    pub annualized_volatility: Option<f64>,
    pub rolling_volatility: IndicatorSeries,
    pub atr: IndicatorSeries,
    pub ulcer_index: IndicatorSeries,
    pub rsi: IndicatorSeries,
    pub stochastic: IndicatorSeries,
    pub fisher: IndicatorSeries,
    pub obv: IndicatorSeries,
    pub iix: IndicatorSeries,
    pub cmf: IndicatorSeries,
    pub bollinger: IndicatorSeries,
    pub keltner: IndicatorSeries,
    pub donchian: IndicatorSeries,
    pub daily_returns: IndicatorSeries,
    pub cumulative_return: IndicatorSeries,
    pub relative_performance: IndicatorSeries,
    pub force_index: IndicatorSeries,
    pub decomposition: Result<Decomposition, QuantlensError>,
}

/// One retrieval call, then the full indicator battery over the result.
///
/// Retrieval failure or an empty range aborts the request with a typed
/// error; everything downstream is pure computation over the series.
pub fn run_analysis(
    port: &dyn MarketDataPort,
    request: &AnalysisRequest,
) -> Result<AnalysisReport, QuantlensError> {
    let bars = port.fetch_ohlcv(&request.symbol, request.start_date, request.end_date)?;
    let series = TimeSeries::new(request.symbol.clone(), bars)?;

    Ok(AnalysisReport {
        sma: calculate_sma(&series, request.sma_window),
        ema: calculate_ema(&series, request.ema_window),
        vwap: calculate_vwap(&series),
        macd: calculate_macd(&series),
        annualized_volatility: annualized_volatility(&series),
        rolling_volatility: calculate_rolling_volatility(&series, DEFAULT_VOLATILITY_WINDOW),
        atr: calculate_atr(&series, DEFAULT_ATR_PERIOD),
        ulcer_index: calculate_ulcer_index(&series, DEFAULT_ULCER_PERIOD),
        rsi: calculate_rsi(&series, DEFAULT_RSI_PERIOD),
        stochastic: calculate_stochastic(&series, DEFAULT_STOCHASTIC_K, DEFAULT_STOCHASTIC_D),
        fisher: calculate_fisher(&series, DEFAULT_FISHER_PERIOD),
        obv: calculate_obv(&series),
        iix: calculate_iix(&series, DEFAULT_IIX_PERIOD),
        cmf: calculate_cmf(&series, DEFAULT_CMF_PERIOD),
        bollinger: calculate_bollinger(&series, DEFAULT_CHANNEL_PERIOD, DEFAULT_CHANNEL_MULT_X100),
        keltner: calculate_keltner(&series, DEFAULT_CHANNEL_PERIOD, DEFAULT_CHANNEL_MULT_X100),
        donchian: calculate_donchian(&series, DEFAULT_CHANNEL_PERIOD),
        daily_returns: calculate_daily_returns(&series),
        cumulative_return: calculate_cumulative_return(&series),
        relative_performance: calculate_relative_performance(&series),
        force_index: calculate_force_index(&series),
        decomposition: decompose(&series, DEFAULT_DECOMPOSITION_PERIOD),
        series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::Bar;
    use chrono::NaiveDate;

    struct FixedPort {
        bars: Vec<Bar>,
    }

    impl MarketDataPort for FixedPort {
        fn fetch_ohlcv(
            &self,
            symbol: &str,
            _start_date: NaiveDate,
            _end_date: NaiveDate,
        ) -> Result<Vec<Bar>, QuantlensError> {
            if self.bars.is_empty() {
                return Err(QuantlensError::Retrieval {
                    symbol: symbol.to_string(),
                    reason: "no data".into(),
                });
            }
            Ok(self.bars.clone())
        }

        fn list_symbols(&self) -> Result<Vec<String>, QuantlensError> {
            Ok(vec![])
        }
    }

    fn ramp_bars(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let close = 100.0 + i as f64;
                Bar {
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                        + chrono::Days::new(i as u64),
                    open: close - 0.5,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    adj_close: close,
                    volume: 1000.0,
                }
            })
            .collect()
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest::new(
            "TEST",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            5,
            5,
        )
    }

    #[test]
    fn retrieval_failure_aborts_the_request() {
        let port = FixedPort { bars: vec![] };
        let result = run_analysis(&port, &request());
        assert!(matches!(result, Err(QuantlensError::Retrieval { .. })));
    }

    #[test]
    fn every_panel_aligns_with_the_series() {
        let port = FixedPort {
            bars: ramp_bars(80),
        };
        let report = run_analysis(&port, &request()).unwrap();

        let n = report.series.len();
        for panel in [
            &report.sma,
            &report.ema,
            &report.vwap,
            &report.macd,
            &report.rolling_volatility,
            &report.atr,
            &report.ulcer_index,
            &report.rsi,
            &report.stochastic,
            &report.fisher,
            &report.obv,
            &report.iix,
            &report.cmf,
            &report.bollinger,
            &report.keltner,
            &report.donchian,
            &report.daily_returns,
            &report.cumulative_return,
            &report.relative_performance,
            &report.force_index,
        ] {
            assert_eq!(panel.len(), n, "{} misaligned", panel.indicator_type);
        }
        assert!(report.annualized_volatility.is_some());
        assert!(report.decomposition.is_ok());
    }

    #[test]
    fn short_series_reports_decomposition_failure_without_losing_panels() {
        // 40 bars: plenty for SMA(5), too few for a 30-day decomposition.
        let port = FixedPort {
            bars: ramp_bars(40),
        };
        let report = run_analysis(&port, &request()).unwrap();

        assert!(report.sma.value_at(10).is_some());
        assert!(matches!(
            report.decomposition,
            Err(QuantlensError::InsufficientHistory { needed: 60, have: 40 })
        ));
    }

    #[test]
    fn sixty_bar_ramp_scenario() {
        let port = FixedPort {
            bars: ramp_bars(60),
        };
        let report = run_analysis(&port, &request()).unwrap();

        // Closes 100..159: SMA(5) at the last bar averages 155..=159.
        assert_eq!(report.sma.value_at(59), Some(157.0));
        // Monotone rise: every bar after the first adds its volume.
        assert_eq!(report.obv.value_at(59), Some(59_000.0));
    }
}

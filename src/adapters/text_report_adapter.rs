//! Plain-text report adapter.

use crate::domain::analysis::AnalysisReport;
use crate::domain::compare::{return_histogram, Comparison, HISTOGRAM_BINS};
use crate::domain::error::QuantlensError;
use crate::domain::forecast::Forecast;
use crate::domain::indicator::IndicatorSeries;
use crate::ports::report_port::ReportPort;
use std::fs;

pub struct TextReportAdapter;

/// The most recent defined value of a panel, for the summary table.
fn last_valid(series: &IndicatorSeries) -> Option<f64> {
    (0..series.len()).rev().find_map(|i| series.value_at(i))
}

fn summary_line(out: &mut String, label: &str, value: Option<f64>) {
    match value {
        Some(v) => out.push_str(&format!("{:<24} {:.4}\n", label, v)),
        None => out.push_str(&format!("{:<24} undefined\n", label)),
    }
}

impl ReportPort for TextReportAdapter {
    fn write_analysis(
        &self,
        report: &AnalysisReport,
        output_path: &str,
    ) -> Result<(), QuantlensError> {
        let mut out = String::new();
        out.push_str(&format!("Analysis: {}\n", report.series.symbol()));
        out.push_str(&format!(
            "Range: {} to {} ({} bars)\n\n",
            report.series.first_date(),
            report.series.last_date(),
            report.series.len()
        ));

        let last_close = report.series.bar(report.series.len() - 1).close;
        summary_line(&mut out, "Close", Some(last_close));
        summary_line(&mut out, &report.sma.indicator_type.to_string(), last_valid(&report.sma));
        summary_line(&mut out, &report.ema.indicator_type.to_string(), last_valid(&report.ema));
        summary_line(&mut out, "VWAP", last_valid(&report.vwap));
        summary_line(&mut out, "Annualized volatility", report.annualized_volatility);
        summary_line(&mut out, &report.atr.indicator_type.to_string(), last_valid(&report.atr));
        summary_line(&mut out, &report.rsi.indicator_type.to_string(), last_valid(&report.rsi));
        summary_line(&mut out, "OBV", last_valid(&report.obv));
        summary_line(&mut out, &report.cmf.indicator_type.to_string(), last_valid(&report.cmf));
        summary_line(
            &mut out,
            "Cumulative return",
            last_valid(&report.cumulative_return),
        );

        match &report.decomposition {
            Ok(_) => out.push_str("\nDecomposition: ok\n"),
            Err(e) => out.push_str(&format!("\nDecomposition: {}\n", e)),
        }

        fs::write(output_path, out)?;
        Ok(())
    }

    fn write_comparison(
        &self,
        comparison: &Comparison,
        output_path: &str,
    ) -> Result<(), QuantlensError> {
        let mut out = String::new();
        out.push_str(&format!(
            "Comparison: {} symbols\n",
            comparison.panels.len()
        ));

        for panel in &comparison.panels {
            out.push_str(&format!(
                "  {:<8} {} bars, {} to {}\n",
                panel.series.symbol(),
                panel.series.len(),
                panel.series.first_date(),
                panel.series.last_date()
            ));
        }

        for failure in &comparison.failures {
            out.push_str(&format!(
                "  {:<8} FAILED: {}\n",
                failure.symbol, failure.error
            ));
        }

        if let Some(hist) = return_histogram(&comparison.panels, HISTOGRAM_BINS) {
            out.push_str(&format!(
                "\nDaily return histogram ({} bins over [{:.4}, {:.4}]):\n",
                HISTOGRAM_BINS,
                hist.edges[0],
                hist.edges[hist.edges.len() - 1]
            ));
            for (symbol, counts) in &hist.counts {
                out.push_str(&format!(
                    "  {:<8} {} returns\n",
                    symbol,
                    counts.iter().sum::<usize>()
                ));
            }
        }

        fs::write(output_path, out)?;
        Ok(())
    }

    fn write_forecast(
        &self,
        forecast: &Forecast,
        symbol: &str,
        output_path: &str,
    ) -> Result<(), QuantlensError> {
        let mut out = String::new();
        let features: Vec<String> = forecast.features.iter().map(|f| f.to_string()).collect();
        out.push_str(&format!("Forecast: {}\n", symbol));
        out.push_str(&format!("Features: {}\n", features.join(", ")));
        out.push_str(&format!("MSE: {:.6}\n", forecast.evaluation.mse));
        out.push_str(&format!("R2:  {:.6}\n\n", forecast.evaluation.r2));

        out.push_str(&format!(
            "{:<12} {:>12} {:>12}\n",
            "Date", "Actual", "Predicted"
        ));
        for point in &forecast.evaluation.holdout {
            out.push_str(&format!(
                "{:<12} {:>12.4} {:>12.4}\n",
                point.date.to_string(),
                point.actual,
                point.predicted
            ));
        }

        fs::write(output_path, out)?;
        Ok(())
    }
}

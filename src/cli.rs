//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::analysis::run_analysis;
use crate::domain::compare::compare_symbols;
use crate::domain::error::QuantlensError;
use crate::domain::forecast::{self, Feature};
use crate::domain::request::{AnalysisRequest, DEFAULT_EMA_WINDOW, DEFAULT_SMA_WINDOW};
use crate::domain::series::TimeSeries;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::MarketDataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "quantlens", about = "Technical analysis over OHLCV series")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full indicator battery over one symbol
    Analyze {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        #[arg(long)]
        sma_window: Option<usize>,
        #[arg(long)]
        ema_window: Option<usize>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compare several symbols over the same date range
    Compare {
        /// Comma-separated symbols, e.g. AAPL,MSFT,GOOG
        #[arg(long)]
        symbols: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Train a next-day close model and report holdout accuracy
    Forecast {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        /// Comma-separated feature names, e.g. prev_close,sma_50,open
        #[arg(long)]
        features: Option<String>,
        /// Comma-separated feature values for one ad-hoc prediction,
        /// ordered like --features
        #[arg(long)]
        predict: Option<String>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            symbol,
            start,
            end,
            sma_window,
            ema_window,
            config,
            data_dir,
            output,
        } => run_analyze(
            &symbol,
            start,
            end,
            sma_window,
            ema_window,
            config.as_ref(),
            data_dir,
            output,
        ),
        Command::Compare {
            symbols,
            start,
            end,
            config,
            data_dir,
            output,
        } => run_compare(&symbols, start, end, config.as_ref(), data_dir, output),
        Command::Forecast {
            symbol,
            start,
            end,
            features,
            predict,
            config,
            data_dir,
            output,
        } => run_forecast(
            &symbol,
            start,
            end,
            features.as_deref(),
            predict.as_deref(),
            config.as_ref(),
            data_dir,
            output,
        ),
        Command::ListSymbols { config, data_dir } => {
            run_list_symbols(config.as_ref(), data_dir)
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Option<FileConfigAdapter>, ExitCode> {
    match path {
        Some(path) => FileConfigAdapter::from_file(path).map(Some).map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }),
        None => Ok(None),
    }
}

/// Flag beats config file beats built-in default.
fn resolve_window(
    flag: Option<usize>,
    config: Option<&FileConfigAdapter>,
    key: &str,
    default: usize,
) -> usize {
    flag.unwrap_or_else(|| {
        config
            .map(|c| c.get_int("analysis", key, default as i64) as usize)
            .unwrap_or(default)
    })
}

fn resolve_data_dir(flag: Option<PathBuf>, config: Option<&FileConfigAdapter>) -> PathBuf {
    flag.unwrap_or_else(|| {
        config
            .and_then(|c| c.get_string("data", "csv_dir"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data"))
    })
}

fn parse_features(spec: &str) -> Result<Vec<Feature>, QuantlensError> {
    spec.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|name| match name {
            "prev_close" => Ok(Feature::PrevClose),
            "sma_50" => Ok(Feature::Sma50),
            "sma_200" => Ok(Feature::Sma200),
            "open" => Ok(Feature::Open),
            "high" => Ok(Feature::High),
            "low" => Ok(Feature::Low),
            "adj_close" => Ok(Feature::AdjClose),
            other => Err(QuantlensError::ConfigInvalid {
                section: "forecast".into(),
                key: "features".into(),
                reason: format!("unknown feature '{}'", other),
            }),
        })
        .collect()
}

fn parse_feature_values(spec: &str) -> Result<Vec<f64>, QuantlensError> {
    spec.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|value| {
            value.parse().map_err(|e| QuantlensError::ConfigInvalid {
                section: "forecast".into(),
                key: "predict".into(),
                reason: format!("invalid value '{}': {}", value, e),
            })
        })
        .collect()
}

fn split_symbols(spec: &str) -> Vec<String> {
    spec.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn report_failure(err: &QuantlensError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

#[allow(clippy::too_many_arguments)]
fn run_analyze(
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    sma_flag: Option<usize>,
    ema_flag: Option<usize>,
    config_path: Option<&PathBuf>,
    data_dir: Option<PathBuf>,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let sma_window = resolve_window(sma_flag, config.as_ref(), "sma_window", DEFAULT_SMA_WINDOW);
    let ema_window = resolve_window(ema_flag, config.as_ref(), "ema_window", DEFAULT_EMA_WINDOW);
    let port = CsvAdapter::new(resolve_data_dir(data_dir, config.as_ref()));

    let request = AnalysisRequest::new(symbol, start, end, sma_window, ema_window);
    let report = match run_analysis(&port, &request) {
        Ok(r) => r,
        Err(e) => return report_failure(&e),
    };

    let output = output.unwrap_or_else(|| PathBuf::from(format!("{}_analysis.txt", symbol)));
    if let Err(e) = TextReportAdapter.write_analysis(&report, &output.to_string_lossy()) {
        return report_failure(&e);
    }
    println!("wrote {}", output.display());
    ExitCode::SUCCESS
}

fn run_compare(
    symbols_spec: &str,
    start: NaiveDate,
    end: NaiveDate,
    config_path: Option<&PathBuf>,
    data_dir: Option<PathBuf>,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let port = CsvAdapter::new(resolve_data_dir(data_dir, config.as_ref()));
    let symbols = split_symbols(symbols_spec);

    let comparison = compare_symbols(&port, &symbols, start, end);
    for failure in &comparison.failures {
        eprintln!("warning: {}: {}", failure.symbol, failure.error);
    }

    let output = output.unwrap_or_else(|| PathBuf::from("comparison.txt"));
    if let Err(e) = TextReportAdapter.write_comparison(&comparison, &output.to_string_lossy()) {
        return report_failure(&e);
    }
    println!("wrote {}", output.display());
    ExitCode::SUCCESS
}

#[allow(clippy::too_many_arguments)]
fn run_forecast(
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    features_spec: Option<&str>,
    predict_spec: Option<&str>,
    config_path: Option<&PathBuf>,
    data_dir: Option<PathBuf>,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let features_spec = features_spec
        .map(str::to_string)
        .or_else(|| config.as_ref().and_then(|c| c.get_string("forecast", "features")))
        .unwrap_or_else(|| "prev_close".to_string());
    let features = match parse_features(&features_spec) {
        Ok(f) => f,
        Err(e) => return report_failure(&e),
    };

    let port = CsvAdapter::new(resolve_data_dir(data_dir, config.as_ref()));
    let bars = match port.fetch_ohlcv(symbol, start, end) {
        Ok(b) => b,
        Err(e) => return report_failure(&e),
    };
    let series = match TimeSeries::new(symbol, bars) {
        Ok(s) => s,
        Err(e) => return report_failure(&e),
    };

    let forecast = match forecast::fit(&series, &features) {
        Ok(f) => f,
        Err(e) => return report_failure(&e),
    };

    let output = output.unwrap_or_else(|| PathBuf::from(format!("{}_forecast.txt", symbol)));
    if let Err(e) =
        TextReportAdapter.write_forecast(&forecast, symbol, &output.to_string_lossy())
    {
        return report_failure(&e);
    }
    println!(
        "wrote {} (mse {:.6}, r2 {:.6})",
        output.display(),
        forecast.evaluation.mse,
        forecast.evaluation.r2
    );

    if let Some(spec) = predict_spec {
        let row = match parse_feature_values(spec) {
            Ok(r) => r,
            Err(e) => return report_failure(&e),
        };
        match forecast.predict(&row) {
            Ok(predicted) => println!("predicted close: {:.4}", predicted),
            Err(e) => return report_failure(&e),
        }
    }
    ExitCode::SUCCESS
}

fn run_list_symbols(config_path: Option<&PathBuf>, data_dir: Option<PathBuf>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let port = CsvAdapter::new(resolve_data_dir(data_dir, config.as_ref()));

    match port.list_symbols() {
        Ok(symbols) => {
            for symbol in symbols {
                println!("{}", symbol);
            }
            ExitCode::SUCCESS
        }
        Err(e) => report_failure(&e),
    }
}

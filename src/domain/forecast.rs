//! Next-day close forecasting with a random-forest regressor.

use crate::domain::error::QuantlensError;
use crate::domain::rolling::rolling_mean;
use crate::domain::series::TimeSeries;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fmt;

pub const FOREST_TREES: u16 = 100;
pub const SPLIT_SEED: u64 = 42;
pub const TEST_FRACTION: f64 = 0.2;
pub const MIN_TRAINING_ROWS: usize = 10;
pub const SHORT_SMA_WINDOW: usize = 50;
pub const LONG_SMA_WINDOW: usize = 200;

/// Predictor columns the model can be trained on. `PrevClose` is the prior
/// bar's close; the moving averages are trailing windows ending at the
/// current row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    PrevClose,
    Sma50,
    Sma200,
    Open,
    High,
    Low,
    AdjClose,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feature::PrevClose => "prev_close",
            Feature::Sma50 => "sma_50",
            Feature::Sma200 => "sma_200",
            Feature::Open => "open",
            Feature::High => "high",
            Feature::Low => "low",
            Feature::AdjClose => "adj_close",
        };
        f.write_str(name)
    }
}

/// One held-out observation with the model's prediction for it.
#[derive(Debug, Clone)]
pub struct HoldoutPoint {
    pub date: NaiveDate,
    pub actual: f64,
    pub predicted: f64,
}

/// Holdout-set accuracy of a fitted model.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub mse: f64,
    pub r2: f64,
    pub holdout: Vec<HoldoutPoint>,
}

/// A fitted model plus the feature layout its prediction rows must follow.
pub struct Forecast {
    model: RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>,
    pub features: Vec<Feature>,
    pub evaluation: Evaluation,
}

impl fmt::Debug for Forecast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Forecast")
            .field("features", &self.features)
            .field("evaluation", &self.evaluation)
            .finish()
    }
}

impl Forecast {
    /// Predict the close for one ad-hoc feature row, ordered as `features`.
    pub fn predict(&self, row: &[f64]) -> Result<f64, QuantlensError> {
        if row.len() != self.features.len() {
            return Err(QuantlensError::Model {
                reason: format!(
                    "prediction row has {} values, model expects {}",
                    row.len(),
                    self.features.len()
                ),
            });
        }
        let x = DenseMatrix::from_2d_vec(&vec![row.to_vec()]).map_err(|e| {
            QuantlensError::Model {
                reason: e.to_string(),
            }
        })?;
        let predicted = self
            .model
            .predict(&x)
            .map_err(|e| QuantlensError::Model {
                reason: e.to_string(),
            })?;
        Ok(predicted[0])
    }
}

/// Train a random forest to predict the close from the chosen features.
///
/// Rows where any selected feature is undefined (lags and moving-average
/// warm-ups) are dropped before the seeded 80/20 split. The returned model
/// carries its holdout evaluation.
pub fn fit(series: &TimeSeries, features: &[Feature]) -> Result<Forecast, QuantlensError> {
    if features.is_empty() {
        return Err(QuantlensError::EmptyFeatureSet);
    }

    let (dates, rows, targets) = build_rows(series, features);
    if rows.len() < MIN_TRAINING_ROWS {
        return Err(QuantlensError::InsufficientData {
            rows: rows.len(),
            minimum: MIN_TRAINING_ROWS,
        });
    }

    let mut indices: Vec<usize> = (0..rows.len()).collect();
    let mut rng = StdRng::seed_from_u64(SPLIT_SEED);
    indices.shuffle(&mut rng);

    let test_len = ((rows.len() as f64) * TEST_FRACTION).ceil() as usize;
    let (test_idx, train_idx) = indices.split_at(test_len);

    let train_x: Vec<Vec<f64>> = train_idx.iter().map(|&i| rows[i].clone()).collect();
    let train_y: Vec<f64> = train_idx.iter().map(|&i| targets[i]).collect();
    let test_x: Vec<Vec<f64>> = test_idx.iter().map(|&i| rows[i].clone()).collect();
    let test_y: Vec<f64> = test_idx.iter().map(|&i| targets[i]).collect();

    let matrix_error = |e: smartcore::error::Failed| QuantlensError::Model {
        reason: e.to_string(),
    };
    let params = RandomForestRegressorParameters::default()
        .with_n_trees(FOREST_TREES.into())
        .with_seed(SPLIT_SEED);
    let model = RandomForestRegressor::fit(
        &DenseMatrix::from_2d_vec(&train_x).map_err(matrix_error)?,
        &train_y,
        params,
    )
    .map_err(matrix_error)?;

    let predicted = model
        .predict(&DenseMatrix::from_2d_vec(&test_x).map_err(matrix_error)?)
        .map_err(matrix_error)?;

    let mut holdout: Vec<HoldoutPoint> = test_idx
        .iter()
        .zip(test_y.iter().zip(&predicted))
        .map(|(&i, (&actual, &predicted))| HoldoutPoint {
            date: dates[i],
            actual,
            predicted,
        })
        .collect();
    holdout.sort_by_key(|p| p.date);

    let (mse, r2) = regression_metrics(&test_y, &predicted);

    Ok(Forecast {
        model,
        features: features.to_vec(),
        evaluation: Evaluation { mse, r2, holdout },
    })
}

/// Materialize the feature matrix, skipping rows with any undefined feature.
fn build_rows(
    series: &TimeSeries,
    features: &[Feature],
) -> (Vec<NaiveDate>, Vec<Vec<f64>>, Vec<f64>) {
    let closes = series.closes();
    let optional: Vec<Option<f64>> = closes.iter().map(|&c| Some(c)).collect();
    let sma_short = rolling_mean(&optional, SHORT_SMA_WINDOW);
    let sma_long = rolling_mean(&optional, LONG_SMA_WINDOW);

    let mut dates = Vec::new();
    let mut rows = Vec::new();
    let mut targets = Vec::new();

    'bars: for (i, bar) in series.bars().iter().enumerate() {
        let mut row = Vec::with_capacity(features.len());
        for feature in features {
            let value = match feature {
                Feature::PrevClose => (i > 0).then(|| closes[i - 1]),
                Feature::Sma50 => sma_short[i],
                Feature::Sma200 => sma_long[i],
                Feature::Open => Some(bar.open),
                Feature::High => Some(bar.high),
                Feature::Low => Some(bar.low),
                Feature::AdjClose => Some(bar.adj_close),
            };
            match value {
                Some(v) => row.push(v),
                None => continue 'bars,
            }
        }
        dates.push(bar.date);
        rows.push(row);
        targets.push(bar.close);
    }

    (dates, rows, targets)
}

/// Mean squared error and coefficient of determination. A constant target
/// has no variance to explain, so its R² reports as zero.
fn regression_metrics(actual: &[f64], predicted: &[f64]) -> (f64, f64) {
    let n = actual.len() as f64;
    let mse = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p) * (a - p))
        .sum::<f64>()
        / n;

    let mean = actual.iter().sum::<f64>() / n;
    let ss_tot = actual.iter().map(|a| (a - mean) * (a - mean)).sum::<f64>();
    let ss_res = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p) * (a - p))
        .sum::<f64>();
    let r2 = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };

    (mse, r2)
}

//! Domain error types.

/// Top-level error type for quantlens.
///
/// Every fallible pipeline stage returns one of these; failures are caught at
/// the boundary of each independent computation (one symbol, one panel) and
/// converted to a displayed message, never a crash.
#[derive(Debug, thiserror::Error)]
pub enum QuantlensError {
    #[error("could not fetch data for {symbol}: {reason}")]
    Retrieval { symbol: String, reason: String },

    #[error("no bars for {symbol} in the requested date range")]
    EmptyRange { symbol: String },

    #[error("insufficient history: have {have} bars, need {needed}")]
    InsufficientHistory { needed: usize, have: usize },

    #[error("no features selected")]
    EmptyFeatureSet,

    #[error("insufficient data after warm-up: {rows} rows remain, need {minimum}")]
    InsufficientData { rows: usize, minimum: usize },

    #[error("model error: {reason}")]
    Model { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&QuantlensError> for std::process::ExitCode {
    fn from(err: &QuantlensError) -> Self {
        let code: u8 = match err {
            QuantlensError::Io(_) => 1,
            QuantlensError::ConfigParse { .. } | QuantlensError::ConfigInvalid { .. } => 2,
            QuantlensError::Retrieval { .. } | QuantlensError::EmptyRange { .. } => 3,
            QuantlensError::InsufficientHistory { .. }
            | QuantlensError::EmptyFeatureSet
            | QuantlensError::InsufficientData { .. } => 4,
            QuantlensError::Model { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

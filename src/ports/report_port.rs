//! Report generation port trait.

use crate::domain::analysis::AnalysisReport;
use crate::domain::compare::Comparison;
use crate::domain::error::QuantlensError;
use crate::domain::forecast::Forecast;

/// Rendering collaborator. The core hands over aligned series and typed
/// results; how they are laid out is the adapter's business.
pub trait ReportPort {
    fn write_analysis(
        &self,
        report: &AnalysisReport,
        output_path: &str,
    ) -> Result<(), QuantlensError>;

    fn write_comparison(
        &self,
        comparison: &Comparison,
        output_path: &str,
    ) -> Result<(), QuantlensError>;

    fn write_forecast(
        &self,
        forecast: &Forecast,
        symbol: &str,
        output_path: &str,
    ) -> Result<(), QuantlensError>;
}

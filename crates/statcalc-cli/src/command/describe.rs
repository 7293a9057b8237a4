use std::io;

use anyhow::Context as _;
use clap::Args;
use serde::Serialize;
use statcalc_engine::{
    CalcError,
    descriptive::{DescriptiveReport, DescriptiveStats, StandardErrorAnalysis},
};

use crate::{
    render::{Render, TextRenderer},
    settings::Settings,
};

#[derive(Debug, Clone, Args)]
pub(crate) struct DescribeArg {
    /// Data values (space or comma separated)
    #[arg(required = true, value_delimiter = ',', allow_negative_numbers = true)]
    pub values: Vec<f64>,

    /// Also compute this percentile (exclusive range 0-100)
    #[arg(long)]
    pub percentile: Option<f64>,

    /// Include standard error and margin of error of the mean
    #[arg(long)]
    pub standard_error: bool,

    /// Confidence level for the standard error analysis
    #[arg(long, default_value_t = 0.95)]
    pub confidence_level: f64,
}

/// Descriptive report with the optional standard error analysis.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct DescribeOutput {
    #[serde(flatten)]
    pub report: DescriptiveReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard_error_analysis: Option<StandardErrorAnalysis>,
}

impl DescribeOutput {
    pub(crate) fn compute(
        values: Vec<f64>,
        custom_percentile: Option<f64>,
        standard_error_level: Option<f64>,
    ) -> Result<Self, CalcError> {
        let stats = DescriptiveStats::new(values)?;
        let report = stats.calculate_all_stats(custom_percentile)?;
        let standard_error_analysis = standard_error_level
            .map(|level| stats.calculate_standard_error(level))
            .transpose()?;
        Ok(Self {
            report,
            standard_error_analysis,
        })
    }
}

impl Render for DescribeOutput {
    fn render<W: io::Write>(&self, out: &mut TextRenderer<W>) -> io::Result<()> {
        self.report.render(out)?;
        match &self.standard_error_analysis {
            Some(analysis) => analysis.render(out),
            None => Ok(()),
        }
    }
}

pub(crate) fn run(arg: &DescribeArg, settings: &Settings) -> anyhow::Result<()> {
    let standard_error_level = arg.standard_error.then_some(arg.confidence_level);
    let output = DescribeOutput::compute(arg.values.clone(), arg.percentile, standard_error_level)
        .context("Failed to compute descriptive statistics")?;
    super::emit(settings, &output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_error_is_optional() {
        let values = (1..=10).map(f64::from).collect::<Vec<_>>();
        let without = DescribeOutput::compute(values.clone(), None, None).unwrap();
        assert!(without.standard_error_analysis.is_none());

        let with = DescribeOutput::compute(values, Some(90.0), Some(0.95)).unwrap();
        let json = serde_json::to_value(&with).unwrap();
        assert!(json.get("standard_error_analysis").is_some());
        assert!(json.get("central_tendency").is_some());
        assert!(json.get("custom_percentile").is_some());
    }

    #[test]
    fn test_single_value_cannot_have_standard_error() {
        assert!(DescribeOutput::compute(vec![4.0], None, None).is_ok());
        assert!(matches!(
            DescribeOutput::compute(vec![4.0], None, Some(0.95)),
            Err(CalcError::InsufficientData { .. })
        ));
    }
}

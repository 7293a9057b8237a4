//! Plain-text presentation of calculation results.

use std::{fmt::Display, io};

use statcalc_engine::{
    confidence::{
        MeanConfidenceInterval, ProportionConfidenceInterval, SampleSizeForMean,
        SampleSizeForProportion,
    },
    descriptive::{DescriptiveReport, Measure, Mode, ShapeMeasure, StandardErrorAnalysis},
    hypothesis::{
        OneSampleMeanTest, OneSampleProportionTest, TestOutcome, TwoSampleMeanTest,
        TwoSampleProportionTest,
    },
    normal::{
        BetweenProbabilityResult, CriticalValuesResult, EmpiricalRuleResult, PercentileResult,
        ProbabilityResult, ZScoreResult,
    },
    steps::Steps,
};

use crate::util::{format_rounded_list, format_value, round_to};

const RULE_WIDTH: usize = 50;

/// Writes labelled values, formulas and derivation steps to `W`.
pub struct TextRenderer<W> {
    writer: W,
    decimals: u8,
}

impl<W> TextRenderer<W>
where
    W: io::Write,
{
    pub fn new(writer: W, decimals: u8) -> Self {
        Self { writer, decimals }
    }

    pub fn title(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.writer, "{title}")?;
        writeln!(self.writer, "{}", "=".repeat(RULE_WIDTH))
    }

    pub fn section(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.writer, "\n{title}:")
    }

    pub fn value(&mut self, name: &str, value: f64) -> io::Result<()> {
        writeln!(self.writer, "   {name}: {}", format_value(value, self.decimals))
    }

    pub fn rounded(&mut self, name: &str, value: f64) -> io::Result<()> {
        writeln!(self.writer, "   {name}: {}", round_to(value, self.decimals))
    }

    pub fn text(&mut self, name: &str, text: impl Display) -> io::Result<()> {
        writeln!(self.writer, "   {name}: {text}")
    }

    pub fn list(&mut self, name: &str, values: &[f64]) -> io::Result<()> {
        let list = format_rounded_list(values, self.decimals);
        writeln!(self.writer, "   {name}: {list}")
    }

    pub fn formula(&mut self, formula: &str) -> io::Result<()> {
        writeln!(self.writer, "\nFormula: {formula}")
    }

    pub fn steps(&mut self, steps: &Steps) -> io::Result<()> {
        writeln!(self.writer, "\nStep-by-Step Solution:")?;
        for (i, step) in steps.iter().enumerate() {
            writeln!(self.writer, "   {}. {step}", i + 1)?;
        }
        Ok(())
    }

    pub fn description(&mut self, description: &str) -> io::Result<()> {
        writeln!(self.writer, "\nDescription: {description}")
    }

    pub fn interpretation(&mut self, interpretation: &str) -> io::Result<()> {
        writeln!(self.writer, "\nInterpretation: {interpretation}")
    }

    pub fn warning(&mut self, warning: Option<&str>) -> io::Result<()> {
        match warning {
            Some(warning) => writeln!(self.writer, "\nWarning: {warning}"),
            None => Ok(()),
        }
    }

    fn measure(&mut self, name: &str, measure: &Measure) -> io::Result<()> {
        self.value(name, measure.value)?;
        self.detail(&measure.description)
    }

    fn optional_measure(&mut self, name: &str, measure: &Measure<Option<f64>>) -> io::Result<()> {
        match measure.value {
            Some(value) => self.value(name, value)?,
            None => self.text(name, "undefined")?,
        }
        self.detail(&measure.description)
    }

    fn shape(&mut self, name: &str, shape: &ShapeMeasure) -> io::Result<()> {
        match shape.value {
            Some(value) => {
                let rounded = round_to(value, self.decimals);
                self.text(name, format_args!("{rounded} ({})", shape.interpretation))
            }
            None => self.text(name, &shape.interpretation),
        }
    }

    fn detail(&mut self, description: &str) -> io::Result<()> {
        writeln!(self.writer, "      {description}")
    }

    fn outcome(&mut self, outcome: &TestOutcome) -> io::Result<()> {
        self.section("Hypotheses")?;
        writeln!(self.writer, "   {}", outcome.null_hypothesis)?;
        writeln!(self.writer, "   {}", outcome.alternative_hypothesis)?;

        self.section("Test Results")?;
        self.rounded("Test Statistic", outcome.test_statistic)?;
        self.rounded("P-value", outcome.p_value)?;
        self.list("Critical Value(s)", &outcome.critical_values.values())?;
        self.text("α (alpha)", outcome.alpha)?;

        let decision = if outcome.reject_null {
            "REJECT"
        } else {
            "FAIL TO REJECT"
        };
        writeln!(self.writer, "\nDecision: {decision} the null hypothesis")?;
        self.text("Conclusion", &outcome.conclusion)
    }

    fn outcome_footer(&mut self, outcome: &TestOutcome) -> io::Result<()> {
        self.interpretation(&outcome.interpretation)?;
        self.warning(outcome.warning.as_deref())
    }
}

/// A result that knows how to present itself as text.
pub trait Render {
    fn render<W: io::Write>(&self, out: &mut TextRenderer<W>) -> io::Result<()>;
}

fn format_mode(mode: Option<&Mode>) -> String {
    match mode {
        Some(mode) => {
            let values = mode
                .values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            format!("{values} (frequency {})", mode.frequency)
        }
        None => "No mode".to_owned(),
    }
}

impl Render for DescriptiveReport {
    fn render<W: io::Write>(&self, out: &mut TextRenderer<W>) -> io::Result<()> {
        out.title("DESCRIPTIVE STATISTICS RESULTS")?;

        out.section("Dataset Information")?;
        out.text("Sample Size", self.data_info.sample_size)?;
        out.list("Original Data", &self.data_info.original_data)?;
        out.list("Sorted Data", &self.data_info.sorted_data)?;

        let central = &self.central_tendency;
        out.section("Measures of Central Tendency")?;
        out.measure("Mean", &central.mean)?;
        out.measure("Median", &central.median)?;
        out.text("Mode", format_mode(central.mode.value.as_ref()))?;
        out.detail(&central.mode.description)?;

        let dispersion = &self.dispersion;
        out.section("Measures of Dispersion")?;
        out.optional_measure("Sample Variance", &dispersion.sample_variance)?;
        out.optional_measure("Sample Std Dev", &dispersion.sample_std_dev)?;
        out.measure("Population Variance", &dispersion.population_variance)?;
        out.measure("Population Std Dev", &dispersion.population_std_dev)?;
        out.measure("Range", &dispersion.range)?;

        out.section("Measures of Position")?;
        out.measure("Q1 (25th percentile)", &self.position.q1)?;
        out.measure("Q2 (50th percentile)", &self.position.q2)?;
        out.measure("Q3 (75th percentile)", &self.position.q3)?;
        if let Some(custom) = &self.custom_percentile {
            out.measure(&format!("{}th Percentile", custom.percentile), &custom.measure)?;
        }

        let summary = &self.five_number_summary;
        out.section("Five-Number Summary")?;
        out.rounded("Min", summary.minimum)?;
        out.rounded("Q1", summary.q1)?;
        out.rounded("Median", summary.median)?;
        out.rounded("Q3", summary.q3)?;
        out.rounded("Max", summary.maximum)?;
        out.measure("IQR", &summary.iqr)?;

        out.section("Distribution Shape")?;
        out.shape("Skewness", &self.shape.skewness)?;
        out.shape("Kurtosis", &self.shape.kurtosis)
    }
}

impl Render for StandardErrorAnalysis {
    fn render<W: io::Write>(&self, out: &mut TextRenderer<W>) -> io::Result<()> {
        out.section("Standard Error Analysis")?;
        out.text("Degrees of Freedom", self.degrees_of_freedom)?;
        out.value("Critical t-value", self.critical_value)?;
        out.measure("Standard Error", &self.standard_error)?;
        out.measure("Margin of Error", &self.margin_of_error)
    }
}

impl Render for ZScoreResult {
    fn render<W: io::Write>(&self, out: &mut TextRenderer<W>) -> io::Result<()> {
        out.title("NORMAL DISTRIBUTION RESULTS")?;
        out.formula(self.formula)?;
        out.section("Result")?;
        out.value("Z-Score", self.z_score)?;
        out.text("Interpretation", &self.interpretation)?;
        out.steps(&self.steps)?;
        out.description(self.description)
    }
}

impl Render for ProbabilityResult {
    fn render<W: io::Write>(&self, out: &mut TextRenderer<W>) -> io::Result<()> {
        out.title("NORMAL DISTRIBUTION RESULTS")?;
        out.formula(self.formula)?;
        out.section("Result")?;
        out.value("Probability", self.probability)?;
        out.text("Percentage", format_args!("{}%", round_to(self.percentage, 2)))?;
        out.value("Z-Score", self.z_score)?;
        out.steps(&self.steps)?;
        out.description(&self.description)
    }
}

impl Render for BetweenProbabilityResult {
    fn render<W: io::Write>(&self, out: &mut TextRenderer<W>) -> io::Result<()> {
        out.title("NORMAL DISTRIBUTION RESULTS")?;
        out.formula(self.formula)?;
        out.section("Result")?;
        out.value("Probability", self.probability)?;
        out.text("Percentage", format_args!("{}%", round_to(self.percentage, 2)))?;
        out.list("Z-Scores", &self.z_scores)?;
        out.steps(&self.steps)?;
        out.description(&self.description)
    }
}

impl Render for PercentileResult {
    fn render<W: io::Write>(&self, out: &mut TextRenderer<W>) -> io::Result<()> {
        out.title("NORMAL DISTRIBUTION RESULTS")?;
        out.formula(self.formula)?;
        out.section("Result")?;
        out.value("x-value", self.x_value)?;
        out.value("Z-Score", self.z_score)?;
        out.steps(&self.steps)?;
        out.interpretation(&self.interpretation)?;
        out.description(&self.description)
    }
}

impl Render for CriticalValuesResult {
    fn render<W: io::Write>(&self, out: &mut TextRenderer<W>) -> io::Result<()> {
        out.title("NORMAL DISTRIBUTION RESULTS")?;
        out.formula(self.formula)?;
        out.section("Result")?;
        out.list("Critical z-values", &[self.z_critical_lower, self.z_critical_upper])?;
        out.list("Critical x-values", &[self.x_critical_lower, self.x_critical_upper])?;
        out.steps(&self.steps)?;
        out.description(&self.description)
    }
}

impl Render for EmpiricalRuleResult {
    fn render<W: io::Write>(&self, out: &mut TextRenderer<W>) -> io::Result<()> {
        out.title("NORMAL DISTRIBUTION RESULTS")?;
        out.formula(self.formula)?;
        out.section("Empirical Rule Boundaries")?;
        for band in [&self.one_std, &self.two_std, &self.three_std] {
            out.list(&format!("{}% within", band.percentage), &[band.lower, band.upper])?;
        }
        out.steps(&self.steps)?;
        out.description(self.description)
    }
}

impl Render for MeanConfidenceInterval {
    fn render<W: io::Write>(&self, out: &mut TextRenderer<W>) -> io::Result<()> {
        out.title("CONFIDENCE INTERVAL RESULTS")?;
        out.formula(self.formula)?;
        out.section(&format!(
            "{}% Confidence Interval",
            round_to(self.confidence_level * 100.0, 1)
        ))?;
        out.list("Interval", &self.confidence_interval)?;
        out.value("Margin of Error", self.margin_of_error)?;
        out.value("Standard Error", self.standard_error)?;
        out.value(&format!("Critical {}-value", self.distribution), self.critical_value)?;
        if let Some(df) = self.degrees_of_freedom {
            out.text("Degrees of Freedom", df)?;
        }
        out.steps(&self.steps)?;
        out.interpretation(&self.interpretation)?;
        out.warning(self.warning.as_deref())?;
        out.description(&self.description)
    }
}

impl Render for ProportionConfidenceInterval {
    fn render<W: io::Write>(&self, out: &mut TextRenderer<W>) -> io::Result<()> {
        out.title("CONFIDENCE INTERVAL RESULTS")?;
        out.formula(self.formula)?;
        out.section(&format!(
            "{}% Confidence Interval",
            round_to(self.confidence_level * 100.0, 1)
        ))?;
        out.list("Interval", &self.confidence_interval)?;
        out.value("Margin of Error", self.margin_of_error)?;
        out.value("Standard Error", self.standard_error)?;
        out.steps(&self.steps)?;
        out.interpretation(&self.interpretation)?;
        out.text("As percentages", &self.percentage_interpretation)?;
        out.warning(self.warning.as_deref())
    }
}

impl Render for SampleSizeForMean {
    fn render<W: io::Write>(&self, out: &mut TextRenderer<W>) -> io::Result<()> {
        out.title("SAMPLE SIZE RESULTS")?;
        out.formula(self.formula)?;
        out.section("Result")?;
        out.text("Required Sample Size", self.sample_size_required)?;
        out.value("Exact calculation", self.sample_size_exact)?;
        out.steps(&self.steps)?;
        out.description(&self.description)
    }
}

impl Render for SampleSizeForProportion {
    fn render<W: io::Write>(&self, out: &mut TextRenderer<W>) -> io::Result<()> {
        out.title("SAMPLE SIZE RESULTS")?;
        out.formula(self.formula)?;
        out.section("Result")?;
        out.text("Required Sample Size", self.sample_size_required)?;
        out.value("Exact calculation", self.sample_size_exact)?;
        if self.conservative_estimate {
            out.text("Estimated proportion", "0.5 (conservative estimate)")?;
        }
        out.steps(&self.steps)?;
        out.description(&self.description)
    }
}

impl Render for OneSampleMeanTest {
    fn render<W: io::Write>(&self, out: &mut TextRenderer<W>) -> io::Result<()> {
        out.title("HYPOTHESIS TESTING RESULTS")?;
        out.formula(self.formula)?;
        out.outcome(&self.outcome)?;
        out.value("Standard Error", self.standard_error)?;
        out.steps(&self.steps)?;
        out.outcome_footer(&self.outcome)?;
        out.description(&self.description)
    }
}

impl Render for OneSampleProportionTest {
    fn render<W: io::Write>(&self, out: &mut TextRenderer<W>) -> io::Result<()> {
        out.title("HYPOTHESIS TESTING RESULTS")?;
        out.formula(self.formula)?;
        out.outcome(&self.outcome)?;
        out.value("Standard Error", self.standard_error)?;
        out.steps(&self.steps)?;
        out.outcome_footer(&self.outcome)?;
        out.description(&self.description)
    }
}

impl Render for TwoSampleMeanTest {
    fn render<W: io::Write>(&self, out: &mut TextRenderer<W>) -> io::Result<()> {
        out.title("HYPOTHESIS TESTING RESULTS")?;
        out.formula(self.formula)?;
        out.outcome(&self.outcome)?;
        out.value("Standard Error", self.standard_error)?;
        out.value("Degrees of Freedom", self.degrees_of_freedom)?;
        if let Some(pooled) = self.pooled_variance {
            out.value("Pooled Variance", pooled)?;
        }
        out.steps(&self.steps)?;
        out.outcome_footer(&self.outcome)?;
        out.description(&self.description)
    }
}

impl Render for TwoSampleProportionTest {
    fn render<W: io::Write>(&self, out: &mut TextRenderer<W>) -> io::Result<()> {
        out.title("HYPOTHESIS TESTING RESULTS")?;
        out.formula(self.formula)?;
        out.outcome(&self.outcome)?;
        out.value("Standard Error", self.standard_error)?;
        out.value("Pooled Proportion", self.pooled_proportion)?;
        out.steps(&self.steps)?;
        out.outcome_footer(&self.outcome)?;
        out.description(&self.description)
    }
}

#[cfg(test)]
mod tests {
    use statcalc_engine::{
        confidence::{StdDevSource, mean_confidence_interval, proportion_confidence_interval},
        hypothesis::{
            TailType, TwoSampleSummary, one_sample_mean_test, one_sample_proportion_test,
            two_sample_mean_test, two_sample_proportion_test,
        },
        normal::NormalDistribution,
    };

    use super::*;

    fn render_to_string<T: Render>(result: &T, decimals: u8) -> String {
        let mut buf = Vec::new();
        result
            .render(&mut TextRenderer::new(&mut buf, decimals))
            .unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_steps_are_numbered() {
        let dist = NormalDistribution::new(100.0, 15.0).unwrap();
        let text = render_to_string(&dist.calculate_z_score(130.0), 4);
        assert!(text.contains("   Z-Score: 2\n"));
        assert!(text.contains("   1. Given: μ = 100, σ = 15, x = 130\n"));
        assert!(text.contains("Formula: Z = (x - μ) / σ"));
    }

    #[test]
    fn test_values_show_exact_and_rounded() {
        let ci = proportion_confidence_interval(0.6, 100, 0.95).unwrap();
        let text = render_to_string(&ci, 3);
        assert!(text.contains("95% Confidence Interval:"));
        assert!(text.contains("   Interval: [0.504, 0.696]\n"));
        assert!(text.contains("(rounded: 0.096)"));
        assert!(!text.contains("Warning"));
    }

    #[test]
    fn test_hypothesis_decision_and_warning() {
        let result = one_sample_proportion_test(0.9, 8, 0.5, 0.05, TailType::TwoTailed).unwrap();
        let text = render_to_string(&result, 4);
        assert!(text.contains("Decision: REJECT the null hypothesis"));
        assert!(text.contains("Warning: Normal approximation may not be appropriate"));
    }

    #[test]
    fn test_hypothesis_tests_show_standard_error_and_description() {
        let mean = one_sample_mean_test(
            105.0,
            36,
            100.0,
            0.05,
            TailType::TwoTailed,
            StdDevSource::KnownPopulation(15.0),
        )
        .unwrap();
        let text = render_to_string(&mean, 4);
        assert!(text.contains("   Standard Error: 2.5\n"));
        assert!(text.contains("Description: One-sample z-test for population mean"));

        let proportion =
            one_sample_proportion_test(0.55, 100, 0.5, 0.05, TailType::RightTailed).unwrap();
        let text = render_to_string(&proportion, 4);
        assert!(text.contains("   Standard Error: 0.05\n"));
        assert!(text.contains("Description: One-sample z-test for population proportion"));

        let two_mean = two_sample_mean_test(
            TwoSampleSummary::new(20.0, 10, 4.0),
            TwoSampleSummary::new(17.0, 12, 5.0),
            0.05,
            TailType::TwoTailed,
            true,
        )
        .unwrap();
        let text = render_to_string(&two_mean, 4);
        assert!(text.contains("   Standard Error: "));
        assert!(text.contains(&format!("Description: {}", two_mean.description)));

        let two_proportion =
            two_sample_proportion_test(45, 100, 30, 100, 0.05, TailType::TwoTailed).unwrap();
        let text = render_to_string(&two_proportion, 4);
        assert!(text.contains("   Standard Error: "));
        assert!(text.contains("Description: Two-sample z-test for difference in proportions"));
    }

    #[test]
    fn test_mean_interval_shows_description_and_warning() {
        let ci = mean_confidence_interval(20.0, 10, 0.95, StdDevSource::SampleEstimate(3.0))
            .unwrap();
        let text = render_to_string(&ci, 4);
        assert!(text.contains("Description: 95% confidence interval for population mean"));
        assert!(text.contains("Warning: Small sample (n = 10 < 30)"));
    }
}

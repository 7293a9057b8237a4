//! Descriptive statistics for a single dataset.
//!
//! [`DescriptiveStats`] owns a copy of the data together with its sorted
//! form. The individual measures are available as plain accessors, and
//! [`DescriptiveStats::calculate_all_stats`] bundles every measure with its
//! formula and derivation steps.

use serde::Serialize;

use crate::{
    error::{self, CalcError},
    percentiles,
    sampling::SamplingDistribution,
    steps::{self, Steps},
};

/// Threshold below which skewness and excess kurtosis read as "normal".
const SHAPE_THRESHOLD: f64 = 0.5;

/// A dataset prepared for descriptive analysis.
#[derive(Debug, Clone)]
pub struct DescriptiveStats {
    data: Vec<f64>,
    sorted: Vec<f64>,
}

/// A single measure with its formula and derivation trail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measure<T = f64> {
    pub value: T,
    pub formula: String,
    pub steps: Steps,
    pub description: String,
}

impl<T> Measure<T> {
    fn new(
        value: T,
        formula: impl Into<String>,
        steps: Steps,
        description: impl Into<String>,
    ) -> Self {
        Self {
            value,
            formula: formula.into(),
            steps,
            description: description.into(),
        }
    }
}

/// The most frequent value(s) of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mode {
    /// All values sharing the highest frequency, ascending.
    pub values: Vec<f64>,
    pub frequency: usize,
}

/// A shape measure; `value` is `None` when the data has no spread.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeMeasure {
    pub value: Option<f64>,
    pub formula: String,
    pub interpretation: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataInfo {
    pub original_data: Vec<f64>,
    pub sorted_data: Vec<f64>,
    pub sample_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CentralTendency {
    pub mean: Measure,
    pub median: Measure,
    pub mode: Measure<Option<Mode>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dispersion {
    /// Undefined for a single observation.
    pub sample_variance: Measure<Option<f64>>,
    pub sample_std_dev: Measure<Option<f64>>,
    pub population_variance: Measure,
    pub population_std_dev: Measure,
    pub range: Measure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub q1: Measure,
    pub q2: Measure,
    pub q3: Measure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    pub skewness: ShapeMeasure,
    pub kurtosis: ShapeMeasure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiveNumberSummary {
    pub minimum: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub maximum: f64,
    pub iqr: Measure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomPercentile {
    pub percentile: f64,
    #[serde(flatten)]
    pub measure: Measure,
}

/// Every descriptive measure for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveReport {
    pub data_info: DataInfo,
    pub central_tendency: CentralTendency,
    pub dispersion: Dispersion,
    pub position: Position,
    pub shape: Shape,
    pub five_number_summary: FiveNumberSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_percentile: Option<CustomPercentile>,
}

/// Standard error of the mean and the t-based margin of error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardErrorAnalysis {
    pub confidence_level: f64,
    pub degrees_of_freedom: usize,
    pub critical_value: f64,
    pub standard_error: Measure,
    pub margin_of_error: Measure,
}

impl DescriptiveStats {
    /// Copies and sorts the dataset.
    ///
    /// Fails when the dataset is empty or contains a non-finite value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use statcalc_engine::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([5.0, 2.0, 4.0, 1.0, 3.0]).unwrap();
    /// assert_eq!(stats.min(), 1.0);
    /// assert_eq!(stats.max(), 5.0);
    /// assert_eq!(stats.mean(), 3.0);
    /// assert_eq!(stats.median(), 3.0);
    /// ```
    pub fn new<I>(values: I) -> Result<Self, CalcError>
    where
        I: IntoIterator<Item = f64>,
    {
        let data = values.into_iter().collect::<Vec<_>>();
        if data.is_empty() {
            return Err(CalcError::EmptyDataset);
        }
        if let Some(index) = data.iter().position(|v| !v.is_finite()) {
            return Err(CalcError::NonFiniteValue { index });
        }
        let mut sorted = data.clone();
        sorted.sort_by(f64::total_cmp);
        Ok(Self { data, sorted })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    #[must_use]
    pub fn sorted(&self) -> &[f64] {
        &self.sorted
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.sorted[0]
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.sorted[self.sorted.len() - 1]
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    #[expect(clippy::cast_precision_loss)]
    fn n(&self) -> f64 {
        self.data.len() as f64
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        self.sum() / self.n()
    }

    /// Middle value, or the average of the two middle values for even `n`.
    #[must_use]
    pub fn median(&self) -> f64 {
        let (lower, upper) = self.middle_values();
        (lower + upper) / 2.0
    }

    fn middle_values(&self) -> (f64, f64) {
        let n = self.sorted.len();
        if n % 2 == 1 {
            (self.sorted[n / 2], self.sorted[n / 2])
        } else {
            (self.sorted[n / 2 - 1], self.sorted[n / 2])
        }
    }

    /// Distinct values with their frequencies, ascending by value.
    #[must_use]
    pub fn frequencies(&self) -> Vec<(f64, usize)> {
        self.sorted
            .chunk_by(|a, b| a == b)
            .map(|run| (run[0], run.len()))
            .collect()
    }

    /// Most frequent value(s); `None` when no value repeats.
    #[must_use]
    pub fn mode(&self) -> Option<Mode> {
        let frequencies = self.frequencies();
        let frequency = frequencies.iter().map(|(_, count)| *count).max()?;
        if frequency <= 1 {
            return None;
        }
        let values = frequencies
            .iter()
            .filter(|(_, count)| *count == frequency)
            .map(|(value, _)| *value)
            .collect();
        Some(Mode { values, frequency })
    }

    fn deviations(&self) -> Vec<f64> {
        let mean = self.mean();
        self.data.iter().map(|v| v - mean).collect()
    }

    #[must_use]
    pub fn sum_of_squared_deviations(&self) -> f64 {
        self.deviations().iter().map(|d| d * d).sum()
    }

    /// Sum of squares divided by `n - 1`; `None` for a single observation.
    #[must_use]
    pub fn sample_variance(&self) -> Option<f64> {
        (self.len() > 1).then(|| self.sum_of_squared_deviations() / (self.n() - 1.0))
    }

    #[must_use]
    pub fn sample_std_dev(&self) -> Option<f64> {
        self.sample_variance().map(f64::sqrt)
    }

    #[must_use]
    pub fn population_variance(&self) -> f64 {
        self.sum_of_squared_deviations() / self.n()
    }

    #[must_use]
    pub fn population_std_dev(&self) -> f64 {
        self.population_variance().sqrt()
    }

    #[must_use]
    pub fn range(&self) -> f64 {
        self.max() - self.min()
    }

    /// Linear-interpolation percentile; `percentile` must lie in `(0, 100)`.
    pub fn percentile(&self, percentile: f64) -> Result<f64, CalcError> {
        let percentile = error::percentile(percentile)?;
        Ok(percentiles::compute_percentile(&self.sorted, percentile))
    }

    fn quartiles(&self) -> (f64, f64, f64) {
        let at = |p| percentiles::compute_percentile(&self.sorted, p);
        (at(25.0), at(50.0), at(75.0))
    }

    fn central_moment(&self, order: i32) -> f64 {
        self.deviations().iter().map(|d| d.powi(order)).sum::<f64>() / self.n()
    }

    /// Sample skewness `m3 / m2^1.5`; `None` when all values are equal.
    #[must_use]
    pub fn skewness(&self) -> Option<f64> {
        let m2 = self.central_moment(2);
        (m2 > 0.0).then(|| self.central_moment(3) / m2.powf(1.5))
    }

    /// Excess kurtosis `m4 / m2^2 - 3`; `None` when all values are equal.
    #[must_use]
    pub fn kurtosis(&self) -> Option<f64> {
        let m2 = self.central_moment(2);
        (m2 > 0.0).then(|| self.central_moment(4) / (m2 * m2) - 3.0)
    }

    /// Computes every descriptive measure, plus `custom_percentile` when given.
    ///
    /// # Examples
    ///
    /// ```
    /// # use statcalc_engine::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new((1..=10).map(f64::from)).unwrap();
    /// let report = stats.calculate_all_stats(Some(90.0)).unwrap();
    /// assert_eq!(report.five_number_summary.iqr.value, 4.5);
    /// let p90 = report.custom_percentile.unwrap().measure.value;
    /// assert!((p90 - 9.1).abs() < 1e-12);
    /// ```
    pub fn calculate_all_stats(
        &self,
        custom_percentile: Option<f64>,
    ) -> Result<DescriptiveReport, CalcError> {
        let custom_percentile = custom_percentile
            .map(|p| self.custom_percentile(p))
            .transpose()?;

        Ok(DescriptiveReport {
            data_info: DataInfo {
                original_data: self.data.clone(),
                sorted_data: self.sorted.clone(),
                sample_size: self.len(),
            },
            central_tendency: self.central_tendency(),
            dispersion: self.dispersion(),
            position: self.position(),
            shape: self.shape(),
            five_number_summary: self.five_number_summary(),
            custom_percentile,
        })
    }

    fn central_tendency(&self) -> CentralTendency {
        let n = self.len();
        let sum = self.sum();
        let mean = self.mean();
        let terms = self
            .data
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" + ");
        let mean_steps = Steps::from([
            format!("Sum of all values: {terms} = {sum}"),
            format!("Number of values: n = {n}"),
            format!("Mean = Sum / n = {sum} / {n} = {mean}"),
        ]);

        let median = self.median();
        let mut median_steps = Steps::new();
        median_steps.push(format!(
            "Sorted data: {}",
            steps::format_list(&self.sorted)
        ));
        if n % 2 == 1 {
            median_steps.extend([
                format!("n = {n} (odd), so median is the middle value"),
                format!("Position = (n + 1) / 2 = ({n} + 1) / 2 = {}", n.div_ceil(2)),
                format!("Median = {median}"),
            ]);
        } else {
            let (lower, upper) = self.middle_values();
            median_steps.extend([
                format!("n = {n} (even), so median is average of two middle values"),
                format!("Middle values: {lower} and {upper}"),
                format!("Median = ({lower} + {upper}) / 2 = {median}"),
            ]);
        }

        let mode = self.mode();
        let mut mode_steps = Steps::new();
        match &mode {
            Some(Mode { values, frequency }) => {
                mode_steps.push("Count frequency of each value:");
                for (value, count) in self.frequencies() {
                    mode_steps.push(format!("  {value}: {count} times"));
                }
                mode_steps.push(format!(
                    "Mode = {} (appears {frequency} times)",
                    values
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                ));
            }
            None => mode_steps.push("No mode exists (no value appears more than once)"),
        }

        CentralTendency {
            mean: Measure::new(
                mean,
                "x̄ = Σx / n",
                mean_steps,
                "The arithmetic average of all values",
            ),
            median: Measure::new(
                median,
                "Middle value when data is arranged in order",
                median_steps,
                "The middle value that separates the higher half from the lower half",
            ),
            mode: Measure::new(
                mode,
                "Most frequently occurring value",
                mode_steps,
                "The value that appears most frequently in the dataset",
            ),
        }
    }

    fn dispersion(&self) -> Dispersion {
        let n = self.len();
        let mean = self.mean();
        let deviations = self.deviations();
        let squared = deviations.iter().map(|d| d * d).collect::<Vec<_>>();
        let ss = squared.iter().sum::<f64>();
        let sample_variance = self.sample_variance();
        let sample_std = self.sample_std_dev();
        let pop_variance = self.population_variance();
        let pop_std = self.population_std_dev();
        let (min, max, range) = (self.min(), self.max(), self.range());

        let mut sample_var_steps = Steps::from([
            format!("Mean (x̄) = {mean}"),
            format!("Deviations from mean: {}", steps::format_list(&deviations)),
            format!("Squared deviations: {}", steps::format_list(&squared)),
            format!("Sum of squared deviations: {ss}"),
        ]);
        let sample_std_steps = match (sample_variance, sample_std) {
            (Some(variance), Some(std)) => {
                sample_var_steps.extend([
                    format!(
                        "Sample variance = Σ(x - x̄)² / (n - 1) = {ss} / {} = {variance}",
                        n - 1
                    ),
                    format!("Sample standard deviation = √{variance} = {std}"),
                ]);
                Steps::from([format!("Sample standard deviation = √{variance} = {std}")])
            }
            _ => {
                let undefined = "Sample variance is undefined for n = 1 (n - 1 = 0)";
                sample_var_steps.push(undefined);
                Steps::from([undefined])
            }
        };

        let pop_var_steps = Steps::from([
            format!("Population variance = Σ(x - x̄)² / n = {ss} / {n} = {pop_variance}"),
            format!("Population standard deviation = √{pop_variance} = {pop_std}"),
        ]);
        let pop_std_steps = Steps::from([format!(
            "Population standard deviation = √{pop_variance} = {pop_std}"
        )]);

        Dispersion {
            sample_variance: Measure::new(
                sample_variance,
                "s² = Σ(x - x̄)² / (n - 1)",
                sample_var_steps,
                "Sample variance (divides by n-1 for unbiased estimate)",
            ),
            sample_std_dev: Measure::new(
                sample_std,
                "s = √[Σ(x - x̄)² / (n - 1)]",
                sample_std_steps,
                "Sample standard deviation (square root of sample variance)",
            ),
            population_variance: Measure::new(
                pop_variance,
                "σ² = Σ(x - μ)² / n",
                pop_var_steps,
                "Population variance (divides by n)",
            ),
            population_std_dev: Measure::new(
                pop_std,
                "σ = √[Σ(x - μ)² / n]",
                pop_std_steps,
                "Population standard deviation (square root of population variance)",
            ),
            range: Measure::new(
                range,
                "Range = Maximum - Minimum",
                Steps::from([format!("Range = {max} - {min} = {range}")]),
                "The difference between the largest and smallest values",
            ),
        }
    }

    fn position(&self) -> Position {
        let (q1, q2, q3) = self.quartiles();
        Position {
            q1: Measure::new(
                q1,
                "Q1 = 25th percentile",
                Steps::from([format!("Q1 (25th percentile) = {q1}")]),
                "First quartile - 25% of data falls below this value",
            ),
            q2: Measure::new(
                q2,
                "Q2 = 50th percentile = Median",
                Steps::from([format!("Q2 (50th percentile) = {q2}")]),
                "Second quartile - same as median",
            ),
            q3: Measure::new(
                q3,
                "Q3 = 75th percentile",
                Steps::from([format!("Q3 (75th percentile) = {q3}")]),
                "Third quartile - 75% of data falls below this value",
            ),
        }
    }

    fn shape(&self) -> Shape {
        let skewness = self.skewness();
        let kurtosis = self.kurtosis();
        Shape {
            skewness: ShapeMeasure {
                value: skewness,
                formula: "Skewness = E[(X - μ)³] / σ³".into(),
                interpretation: interpret_skewness(skewness).into(),
                description: "Measures asymmetry of the distribution".into(),
            },
            kurtosis: ShapeMeasure {
                value: kurtosis,
                formula: "Kurtosis = E[(X - μ)⁴] / σ⁴ - 3".into(),
                interpretation: interpret_kurtosis(kurtosis).into(),
                description: "Measures tail heaviness relative to normal distribution".into(),
            },
        }
    }

    fn five_number_summary(&self) -> FiveNumberSummary {
        let (q1, _, q3) = self.quartiles();
        let iqr = q3 - q1;
        FiveNumberSummary {
            minimum: self.min(),
            q1,
            median: self.median(),
            q3,
            maximum: self.max(),
            iqr: Measure::new(
                iqr,
                "IQR = Q3 - Q1",
                Steps::from([format!("IQR = {q3} - {q1} = {iqr}")]),
                "Interquartile range - spread of middle 50% of data",
            ),
        }
    }

    fn custom_percentile(&self, percentile: f64) -> Result<CustomPercentile, CalcError> {
        let value = self.percentile(percentile)?;
        Ok(CustomPercentile {
            percentile,
            measure: Measure::new(
                value,
                format!("{percentile}th percentile"),
                Steps::from([format!("{percentile}th percentile = {value}")]),
                format!("{percentile}% of the data falls below this value"),
            ),
        })
    }

    /// Standard error of the mean with the t-based margin of error at
    /// `confidence_level`. Needs at least two observations.
    pub fn calculate_standard_error(
        &self,
        confidence_level: f64,
    ) -> Result<StandardErrorAnalysis, CalcError> {
        let confidence_level = error::confidence_level(confidence_level)?;
        let n = self.len();
        let sample_std = self.sample_std_dev().ok_or(CalcError::InsufficientData {
            required: 2,
            actual: n,
        })?;
        let df = n - 1;
        #[expect(clippy::cast_precision_loss)]
        let t = SamplingDistribution::students_t(df as f64)?;
        let critical_value = t.two_sided_critical(confidence_level);
        let standard_error = sample_std / self.n().sqrt();
        let margin_of_error = critical_value * standard_error;
        let level = steps::percent(confidence_level);

        Ok(StandardErrorAnalysis {
            confidence_level,
            degrees_of_freedom: df,
            critical_value,
            standard_error: Measure::new(
                standard_error,
                "SE = s / √n",
                Steps::from([
                    format!("Sample standard deviation (s) = {sample_std}"),
                    format!("Sample size (n) = {n}"),
                    format!("Standard error = {sample_std} / √{n} = {standard_error}"),
                ]),
                "Standard error of the sample mean",
            ),
            margin_of_error: Measure::new(
                margin_of_error,
                "ME = t_(α/2, n-1) × SE",
                Steps::from([
                    format!("Confidence level = {level}%"),
                    format!("Degrees of freedom = {df}"),
                    format!("t-critical value = {critical_value}"),
                    format!("Margin of error = {critical_value} × {standard_error} = {margin_of_error}"),
                ]),
                format!("Margin of error for {level}% confidence interval"),
            ),
        })
    }
}

fn interpret_skewness(skewness: Option<f64>) -> &'static str {
    match skewness {
        None => "Undefined (all values are identical)",
        Some(v) if v.abs() < SHAPE_THRESHOLD => "Approximately symmetric",
        Some(v) if v > 0.0 => "Right-skewed (positively skewed)",
        Some(_) => "Left-skewed (negatively skewed)",
    }
}

fn interpret_kurtosis(kurtosis: Option<f64>) -> &'static str {
    match kurtosis {
        None => "Undefined (all values are identical)",
        Some(v) if v.abs() < SHAPE_THRESHOLD => "Approximately normal (mesokurtic)",
        Some(v) if v > 0.0 => "Heavy-tailed (leptokurtic)",
        Some(_) => "Light-tailed (platykurtic)",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::assert_close;

    fn one_to_ten() -> DescriptiveStats {
        DescriptiveStats::new((1..=10).map(f64::from)).unwrap()
    }

    #[test]
    fn test_one_to_ten_scenario() {
        let report = one_to_ten().calculate_all_stats(None).unwrap();
        assert_eq!(report.central_tendency.mean.value, 5.5);
        assert_eq!(report.central_tendency.median.value, 5.5);
        assert_close(report.dispersion.sample_variance.value.unwrap(), 9.1667, 1e-4);
        assert_eq!(report.position.q1.value, 3.25);
        assert_eq!(report.position.q3.value, 7.75);
        assert_eq!(report.five_number_summary.iqr.value, 4.5);
        assert_eq!(report.five_number_summary.minimum, 1.0);
        assert_eq!(report.five_number_summary.maximum, 10.0);
        assert_eq!(report.dispersion.range.value, 9.0);
        assert!(report.custom_percentile.is_none());
    }

    #[test]
    fn test_variance_identity() {
        for data in [
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
            vec![2.5, -1.0, 7.25, 7.25, 0.0],
            vec![1e6, 1e6 + 1.0, 1e6 + 3.0],
        ] {
            let stats = DescriptiveStats::new(data).unwrap();
            #[expect(clippy::cast_precision_loss)]
            let n = stats.len() as f64;
            let lhs = stats.sample_variance().unwrap() * (n - 1.0);
            let rhs = stats.population_variance() * n;
            assert_close(lhs, rhs, 1e-9 * rhs.abs().max(1.0));
        }
    }

    #[test]
    fn test_median_odd_and_even() {
        let odd = DescriptiveStats::new([3.0, 1.0, 2.0]).unwrap();
        assert_eq!(odd.median(), 2.0);
        let even = DescriptiveStats::new([4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(even.median(), 2.5);
        let report = even.calculate_all_stats(None).unwrap();
        assert!(
            report
                .central_tendency
                .median
                .steps
                .iter()
                .any(|s| s == "Median = (2 + 3) / 2 = 2.5")
        );
    }

    #[test]
    fn test_mode_absent_without_repeats() {
        let stats = DescriptiveStats::new([1.0, 2.0, 3.0]).unwrap();
        assert_eq!(stats.mode(), None);
        let report = stats.calculate_all_stats(None).unwrap();
        assert_eq!(report.central_tendency.mode.value, None);
        assert_eq!(report.central_tendency.mode.steps.len(), 1);
    }

    #[test]
    fn test_mode_reports_every_tied_value() {
        let stats = DescriptiveStats::new([4.0, 1.0, 4.0, 2.0, 1.0, 3.0]).unwrap();
        assert_eq!(
            stats.mode(),
            Some(Mode {
                values: vec![1.0, 4.0],
                frequency: 2,
            })
        );
    }

    #[test]
    fn test_single_value_dataset() {
        let stats = DescriptiveStats::new([7.0]).unwrap();
        let report = stats.calculate_all_stats(None).unwrap();
        assert_eq!(report.dispersion.sample_variance.value, None);
        assert_eq!(report.dispersion.sample_std_dev.value, None);
        assert_eq!(report.dispersion.population_variance.value, 0.0);
        assert_eq!(report.shape.skewness.value, None);
        assert_eq!(report.position.q1.value, 7.0);
        assert!(matches!(
            stats.calculate_standard_error(0.95),
            Err(CalcError::InsufficientData {
                required: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_rejects_empty_and_non_finite() {
        assert_eq!(
            DescriptiveStats::new(Vec::new()).unwrap_err(),
            CalcError::EmptyDataset
        );
        assert_eq!(
            DescriptiveStats::new([1.0, f64::NAN]).unwrap_err(),
            CalcError::NonFiniteValue { index: 1 }
        );
    }

    #[test]
    fn test_shape_interpretation() {
        let symmetric = one_to_ten();
        assert_close(symmetric.skewness().unwrap(), 0.0, 1e-12);
        assert_close(symmetric.kurtosis().unwrap(), -1.224_242_424_242_424, 1e-9);
        let report = symmetric.calculate_all_stats(None).unwrap();
        assert_eq!(report.shape.skewness.interpretation, "Approximately symmetric");
        assert_eq!(
            report.shape.kurtosis.interpretation,
            "Light-tailed (platykurtic)"
        );

        let right = DescriptiveStats::new([1.0, 1.0, 1.0, 2.0, 2.0, 3.0, 10.0]).unwrap();
        assert!(right.skewness().unwrap() > SHAPE_THRESHOLD);
        assert_eq!(
            interpret_skewness(right.skewness()),
            "Right-skewed (positively skewed)"
        );
        assert_eq!(interpret_skewness(Some(-0.8)), "Left-skewed (negatively skewed)");
        assert_eq!(interpret_kurtosis(Some(1.2)), "Heavy-tailed (leptokurtic)");
    }

    #[test]
    fn test_custom_percentile_bounds() {
        let stats = one_to_ten();
        let report = stats.calculate_all_stats(Some(10.0)).unwrap();
        let custom = report.custom_percentile.unwrap();
        assert_close(custom.measure.value, 1.9, 1e-12);
        assert_eq!(custom.percentile, 10.0);
        assert!(matches!(
            stats.calculate_all_stats(Some(0.0)),
            Err(CalcError::PercentileOutOfRange { .. })
        ));
        assert!(stats.calculate_all_stats(Some(100.0)).is_err());
    }

    #[test]
    fn test_standard_error() {
        let analysis = one_to_ten().calculate_standard_error(0.95).unwrap();
        let expected_se = (55.0_f64 / 6.0).sqrt() / 10.0_f64.sqrt();
        assert_close(analysis.standard_error.value, expected_se, 1e-12);
        assert_eq!(analysis.degrees_of_freedom, 9);
        assert_close(analysis.critical_value, 2.262_157, 1e-5);
        assert_close(
            analysis.margin_of_error.value,
            analysis.critical_value * expected_se,
            1e-12,
        );
        assert!(one_to_ten().calculate_standard_error(1.5).is_err());
    }

    #[test]
    fn test_steps_use_computed_values() {
        let report = DescriptiveStats::new([2.0, 4.0])
            .unwrap()
            .calculate_all_stats(None)
            .unwrap();
        assert_eq!(
            report.central_tendency.mean.steps.as_slice(),
            [
                "Sum of all values: 2 + 4 = 6",
                "Number of values: n = 2",
                "Mean = Sum / n = 6 / 2 = 3",
            ]
        );
    }
}

//! One- and two-sample significance tests for means and proportions.
//!
//! Every test follows the same shape: validate the inputs, pick the
//! reference distribution, compute the statistic, then derive the critical
//! region and p-value from the tail direction. The shared part of the
//! result lives in [`TestOutcome`], which is flattened into each test's
//! record when serialized.

use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::{
    confidence::StdDevSource,
    error::{self, CalcError},
    sampling::{DistributionKind, SamplingDistribution},
    steps::{self, Steps},
};

/// Direction of the alternative hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, derive_more::Display)]
#[serde(rename_all = "kebab-case")]
pub enum TailType {
    #[default]
    #[display("two-tailed")]
    TwoTailed,
    #[display("left-tailed")]
    LeftTailed,
    #[display("right-tailed")]
    RightTailed,
}

impl FromStr for TailType {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "two-tailed" => Ok(Self::TwoTailed),
            "left-tailed" => Ok(Self::LeftTailed),
            "right-tailed" => Ok(Self::RightTailed),
            _ => Err(CalcError::UnknownVariant {
                kind: "tail type",
                value: s.to_owned(),
                expected: "two-tailed, left-tailed, right-tailed",
            }),
        }
    }
}

impl TailType {
    /// Relation symbol used in the alternative hypothesis.
    #[must_use]
    pub fn operator(self) -> &'static str {
        match self {
            Self::TwoTailed => "≠",
            Self::LeftTailed => "<",
            Self::RightTailed => ">",
        }
    }

    fn relation(self) -> &'static str {
        match self {
            Self::TwoTailed => "is not equal to",
            Self::LeftTailed => "is less than",
            Self::RightTailed => "is greater than",
        }
    }
}

/// Rejection region boundaries of a test statistic.
///
/// Serializes as a plain list of one or two numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CriticalRegion {
    /// Reject outside `[lower, upper]`.
    TwoSided { lower: f64, upper: f64 },
    /// Reject below the bound.
    Lower(f64),
    /// Reject above the bound.
    Upper(f64),
}

impl CriticalRegion {
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        match *self {
            Self::TwoSided { lower, upper } => vec![lower, upper],
            Self::Lower(bound) | Self::Upper(bound) => vec![bound],
        }
    }

    #[must_use]
    pub fn rejects(&self, statistic: f64) -> bool {
        match *self {
            Self::TwoSided { upper, .. } => statistic.abs() > upper,
            Self::Lower(bound) => statistic < bound,
            Self::Upper(bound) => statistic > bound,
        }
    }
}

impl Serialize for CriticalRegion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.values())
    }
}

/// Decision part shared by every test result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestOutcome {
    pub test_type: TailType,
    pub null_hypothesis: String,
    pub alternative_hypothesis: String,
    pub test_statistic: f64,
    pub critical_values: CriticalRegion,
    pub p_value: f64,
    pub alpha: f64,
    pub reject_null: bool,
    pub conclusion: String,
    pub interpretation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl TestOutcome {
    fn evaluate(
        dist: &SamplingDistribution,
        tail: TailType,
        alpha: f64,
        statistic: f64,
        hypotheses: (String, String),
        claim: &str,
    ) -> Self {
        let (critical_values, p_value) = match tail {
            TailType::TwoTailed => {
                let q = dist.quantile(1.0 - alpha / 2.0);
                (
                    CriticalRegion::TwoSided { lower: -q, upper: q },
                    2.0 * dist.sf(statistic.abs()),
                )
            }
            TailType::LeftTailed => (
                CriticalRegion::Lower(dist.quantile(alpha)),
                dist.cdf(statistic),
            ),
            TailType::RightTailed => (
                CriticalRegion::Upper(dist.quantile(1.0 - alpha)),
                dist.sf(statistic),
            ),
        };
        let reject_null = critical_values.rejects(statistic);
        let (null_hypothesis, alternative_hypothesis) = hypotheses;

        Self {
            test_type: tail,
            null_hypothesis,
            alternative_hypothesis,
            test_statistic: statistic,
            critical_values,
            p_value,
            alpha,
            reject_null,
            conclusion: format!(
                "{} the null hypothesis at α = {alpha} level",
                if reject_null { "Reject" } else { "Fail to reject" }
            ),
            interpretation: format!(
                "There {} sufficient evidence to conclude that {claim}",
                if reject_null { "is" } else { "is not" }
            ),
            warning: None,
        }
    }

    fn with_warning(mut self, warning: Option<String>) -> Self {
        self.warning = warning;
        self
    }

    fn push_hypotheses(&self, steps: &mut Steps) {
        steps.extend([
            "Step 1: State the hypotheses",
            self.null_hypothesis.as_str(),
            self.alternative_hypothesis.as_str(),
        ]);
    }

    fn push_decision(&self, steps: &mut Steps, first_step: u8) {
        let p = self.p_value;
        let alpha = self.alpha;
        steps.extend([
            format!("Step {first_step}: Find critical value(s) and p-value"),
            format!(
                "Critical value(s): {}",
                steps::format_list(&self.critical_values.values())
            ),
            format!("p-value = {p}"),
            format!("Step {}: Make decision", first_step + 1),
            if self.reject_null {
                format!("Since p-value ({p}) < α ({alpha}), we reject H₀")
            } else {
                format!("Since p-value ({p}) ≥ α ({alpha}), we fail to reject H₀")
            },
        ]);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OneSampleMeanTest {
    #[serde(flatten)]
    pub outcome: TestOutcome,
    pub distribution: DistributionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degrees_of_freedom: Option<f64>,
    pub standard_error: f64,
    pub sample_mean: f64,
    pub sample_size: u32,
    pub null_mean: f64,
    pub formula: &'static str,
    pub steps: Steps,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OneSampleProportionTest {
    #[serde(flatten)]
    pub outcome: TestOutcome,
    pub standard_error: f64,
    pub sample_proportion: f64,
    pub sample_size: u32,
    pub null_proportion: f64,
    pub formula: &'static str,
    pub steps: Steps,
    pub description: &'static str,
}

/// Summary statistics of one independent sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TwoSampleSummary {
    pub mean: f64,
    pub size: u32,
    pub std_dev: f64,
}

impl TwoSampleSummary {
    #[must_use]
    pub fn new(mean: f64, size: u32, std_dev: f64) -> Self {
        Self {
            mean,
            size,
            std_dev,
        }
    }

    fn validated(self, label: &SampleLabel) -> Result<Self, CalcError> {
        error::finite(label.mean, self.mean)?;
        error::sample_size(label.size, self.size, 2)?;
        error::positive(label.std_dev, self.std_dev)?;
        Ok(self)
    }

    /// `s² / n`
    fn variance_of_mean(&self) -> f64 {
        self.std_dev.powi(2) / f64::from(self.size)
    }
}

struct SampleLabel {
    mean: &'static str,
    size: &'static str,
    std_dev: &'static str,
}

const SAMPLE1: SampleLabel = SampleLabel {
    mean: "sample 1 mean",
    size: "sample 1 size",
    std_dev: "sample 1 standard deviation",
};

const SAMPLE2: SampleLabel = SampleLabel {
    mean: "sample 2 mean",
    size: "sample 2 size",
    std_dev: "sample 2 standard deviation",
};

/// Standard error and degrees of freedom of `x̄₁ - x̄₂`.
struct VarianceEstimate {
    standard_error: f64,
    degrees_of_freedom: f64,
    pooled_variance: Option<f64>,
    steps: Steps,
}

impl VarianceEstimate {
    fn pooled(s1: &TwoSampleSummary, s2: &TwoSampleSummary) -> Self {
        let (n1, n2) = (f64::from(s1.size), f64::from(s2.size));
        let df = n1 + n2 - 2.0;
        let var1 = s1.std_dev.powi(2);
        let var2 = s2.std_dev.powi(2);
        let pooled_var = ((n1 - 1.0) * var1 + (n2 - 1.0) * var2) / df;
        let pooled_std = pooled_var.sqrt();
        let se = pooled_std * (1.0 / n1 + 1.0 / n2).sqrt();
        Self {
            standard_error: se,
            degrees_of_freedom: df,
            pooled_variance: Some(pooled_var),
            steps: Steps::from([
                "Pooled variance: s²ₚ = [(n₁-1)s₁² + (n₂-1)s₂²] / (n₁+n₂-2)".to_owned(),
                format!(
                    "s²ₚ = [({n1}-1)×{}² + ({n2}-1)×{}²] / ({n1}+{n2}-2)",
                    s1.std_dev, s2.std_dev
                ),
                format!("s²ₚ = [{}×{var1} + {}×{var2}] / {df}", n1 - 1.0, n2 - 1.0),
                format!("s²ₚ = {pooled_var}"),
                format!("sₚ = √{pooled_var} = {pooled_std}"),
                format!("SE = sₚ√(1/n₁ + 1/n₂) = {pooled_std}√(1/{n1} + 1/{n2}) = {se}"),
            ]),
        }
    }

    /// Welch–Satterthwaite approximation; the degrees of freedom are fractional.
    fn welch(s1: &TwoSampleSummary, s2: &TwoSampleSummary) -> Self {
        let (n1, n2) = (f64::from(s1.size), f64::from(s2.size));
        let v1 = s1.variance_of_mean();
        let v2 = s2.variance_of_mean();
        let se = (v1 + v2).sqrt();
        let df = (v1 + v2).powi(2) / (v1.powi(2) / (n1 - 1.0) + v2.powi(2) / (n2 - 1.0));
        Self {
            standard_error: se,
            degrees_of_freedom: df,
            pooled_variance: None,
            steps: Steps::from([
                "Welch's t-test (unequal variances assumed)".to_owned(),
                format!(
                    "SE = √(s₁²/n₁ + s₂²/n₂) = √({}²/{n1} + {}²/{n2}) = {se}",
                    s1.std_dev, s2.std_dev
                ),
                format!(
                    "df = (s₁²/n₁ + s₂²/n₂)² / [(s₁²/n₁)²/(n₁-1) + (s₂²/n₂)²/(n₂-1)] = {df}"
                ),
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwoSampleMeanTest {
    #[serde(flatten)]
    pub outcome: TestOutcome,
    /// `n₁ + n₂ - 2` when pooled, Welch–Satterthwaite (fractional) otherwise.
    pub degrees_of_freedom: f64,
    pub standard_error: f64,
    pub equal_variances: bool,
    /// Present only for the pooled test.
    pub pooled_variance: Option<f64>,
    pub sample1: TwoSampleSummary,
    pub sample2: TwoSampleSummary,
    pub formula: &'static str,
    pub steps: Steps,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwoSampleProportionTest {
    #[serde(flatten)]
    pub outcome: TestOutcome,
    pub standard_error: f64,
    pub sample1_proportion: f64,
    pub sample2_proportion: f64,
    pub pooled_proportion: f64,
    pub formula: &'static str,
    pub steps: Steps,
    pub description: &'static str,
}

const NORMAL_APPROXIMATION_MIN: f64 = 5.0;

fn push_significance_level(steps: &mut Steps, alpha: f64) {
    steps.push(format!("Step 2: Set significance level α = {alpha}"));
}

/// Tests a population mean against `null_mean`.
///
/// A known population standard deviation gives a z-test; a sample estimate
/// gives a t-test with `n - 1` degrees of freedom.
///
/// # Examples
///
/// ```
/// use statcalc_engine::confidence::StdDevSource;
/// use statcalc_engine::hypothesis::{TailType, one_sample_mean_test};
///
/// let result = one_sample_mean_test(
///     105.0,
///     36,
///     100.0,
///     0.05,
///     TailType::TwoTailed,
///     StdDevSource::KnownPopulation(15.0),
/// )
/// .unwrap();
/// assert_eq!(result.standard_error, 2.5);
/// assert_eq!(result.outcome.test_statistic, 2.0);
/// assert!(result.outcome.reject_null);
/// ```
pub fn one_sample_mean_test(
    sample_mean: f64,
    sample_size: u32,
    null_mean: f64,
    alpha: f64,
    tail: TailType,
    std_dev: StdDevSource,
) -> Result<OneSampleMeanTest, CalcError> {
    let sample_mean = error::finite("sample mean", sample_mean)?;
    let null_mean = error::finite("null mean", null_mean)?;
    let alpha = error::alpha(alpha)?;
    let std_dev = std_dev.validated()?;
    let n = error::sample_size("sample size", sample_size, std_dev.min_sample_size())?;
    let dist = std_dev.distribution(n)?;

    let spread = std_dev.value();
    let symbol = std_dev.symbol();
    let kind = dist.kind();
    let standard_error = spread / f64::from(n).sqrt();
    let statistic = (sample_mean - null_mean) / standard_error;

    let outcome = TestOutcome::evaluate(
        &dist,
        tail,
        alpha,
        statistic,
        (
            format!("H₀: μ = {null_mean}"),
            format!("H₁: μ {} {null_mean}", tail.operator()),
        ),
        &format!("the population mean {} {null_mean}", tail.relation()),
    );

    let mut steps = Steps::new();
    outcome.push_hypotheses(&mut steps);
    push_significance_level(&mut steps, alpha);
    steps.extend([
        "Step 3: Choose test statistic".to_owned(),
        match kind {
            DistributionKind::Z => "Using z-test (σ known)".to_owned(),
            DistributionKind::T => "Using t-test (σ unknown)".to_owned(),
        },
        "Step 4: Calculate test statistic".to_owned(),
        format!("Given: x̄ = {sample_mean}, μ₀ = {null_mean}, n = {n}"),
        format!("{symbol} = {spread}"),
    ]);
    if let Some(df) = dist.degrees_of_freedom() {
        steps.push(format!("df = n - 1 = {n} - 1 = {df}"));
    }
    steps.extend([
        format!("SE = {symbol}/√n = {spread}/√{n} = {standard_error}"),
        format!(
            "{kind} = (x̄ - μ₀)/SE = ({sample_mean} - {null_mean})/{standard_error} = {statistic}"
        ),
    ]);
    outcome.push_decision(&mut steps, 5);

    Ok(OneSampleMeanTest {
        outcome,
        distribution: kind,
        degrees_of_freedom: dist.degrees_of_freedom(),
        standard_error,
        sample_mean,
        sample_size: n,
        null_mean,
        formula: match kind {
            DistributionKind::Z => "z = (x̄ - μ₀) / (σ/√n)",
            DistributionKind::T => "t = (x̄ - μ₀) / (s/√n)",
        },
        steps,
        description: format!("One-sample {kind}-test for population mean"),
    })
}

/// Tests a population proportion against `null_proportion` with a z-test.
///
/// The standard error is computed from the null proportion.
pub fn one_sample_proportion_test(
    sample_proportion: f64,
    sample_size: u32,
    null_proportion: f64,
    alpha: f64,
    tail: TailType,
) -> Result<OneSampleProportionTest, CalcError> {
    let p_hat = error::proportion("sample proportion", sample_proportion)?;
    let n = error::sample_size("sample size", sample_size, 1)?;
    let p0 = error::open_proportion("null proportion", null_proportion)?;
    let alpha = error::alpha(alpha)?;
    let n_f = f64::from(n);

    let q0 = 1.0 - p0;
    let np0 = n_f * p0;
    let nq0 = n_f * q0;
    let conditions_met = np0 >= NORMAL_APPROXIMATION_MIN && nq0 >= NORMAL_APPROXIMATION_MIN;
    let warning = (!conditions_met).then(|| {
        format!(
            "Normal approximation may not be appropriate (np₀ = {np0}, nq₀ = {nq0}). Both should be ≥ 5."
        )
    });

    let standard_error = (p0 * q0 / n_f).sqrt();
    let statistic = (p_hat - p0) / standard_error;
    let outcome = TestOutcome::evaluate(
        &SamplingDistribution::standard_normal(),
        tail,
        alpha,
        statistic,
        (
            format!("H₀: p = {p0}"),
            format!("H₁: p {} {p0}", tail.operator()),
        ),
        &format!("the population proportion {} {p0}", tail.relation()),
    )
    .with_warning(warning);

    let mut steps = Steps::new();
    outcome.push_hypotheses(&mut steps);
    steps.extend([
        "Step 2: Check normal approximation conditions".to_owned(),
        format!("np₀ = {n} × {p0} = {np0}"),
        format!("nq₀ = n(1-p₀) = {n} × {q0} = {nq0}"),
        format!(
            "Both np₀ ≥ 5 and nq₀ ≥ 5? {}",
            if conditions_met { "Yes" } else { "No" }
        ),
        format!("Step 3: Set significance level α = {alpha}"),
        "Step 4: Calculate test statistic".to_owned(),
        format!("Given: p̂ = {p_hat}, p₀ = {p0}, n = {n}"),
        format!("SE = √[p₀(1-p₀)/n] = √[{p0} × {q0} / {n}] = {standard_error}"),
        format!("z = (p̂ - p₀)/SE = ({p_hat} - {p0})/{standard_error} = {statistic}"),
    ]);
    outcome.push_decision(&mut steps, 5);

    Ok(OneSampleProportionTest {
        outcome,
        standard_error,
        sample_proportion: p_hat,
        sample_size: n,
        null_proportion: p0,
        formula: "z = (p̂ - p₀) / √[p₀(1-p₀)/n]",
        steps,
        description: "One-sample z-test for population proportion",
    })
}

/// Compares the means of two independent samples with a t-test.
///
/// With `equal_variances` the variances are pooled and the test has
/// `n₁ + n₂ - 2` degrees of freedom; otherwise Welch's test is used.
pub fn two_sample_mean_test(
    sample1: TwoSampleSummary,
    sample2: TwoSampleSummary,
    alpha: f64,
    tail: TailType,
    equal_variances: bool,
) -> Result<TwoSampleMeanTest, CalcError> {
    let s1 = sample1.validated(&SAMPLE1)?;
    let s2 = sample2.validated(&SAMPLE2)?;
    let alpha = error::alpha(alpha)?;

    let VarianceEstimate {
        standard_error,
        degrees_of_freedom,
        pooled_variance,
        steps: variance_steps,
    } = if equal_variances {
        VarianceEstimate::pooled(&s1, &s2)
    } else {
        VarianceEstimate::welch(&s1, &s2)
    };

    let dist = SamplingDistribution::students_t(degrees_of_freedom)?;
    let statistic = (s1.mean - s2.mean) / standard_error;
    let op = tail.operator();
    let claim = match tail {
        TailType::TwoTailed => {
            "there is a significant difference between the two population means".to_owned()
        }
        TailType::LeftTailed | TailType::RightTailed => {
            format!("the first population mean {} the second", tail.relation())
        }
    };
    let outcome = TestOutcome::evaluate(
        &dist,
        tail,
        alpha,
        statistic,
        (
            "H₀: μ₁ = μ₂ (or μ₁ - μ₂ = 0)".to_owned(),
            format!("H₁: μ₁ {op} μ₂ (or μ₁ - μ₂ {op} 0)"),
        ),
        &claim,
    );

    let mut steps = Steps::new();
    outcome.push_hypotheses(&mut steps);
    push_significance_level(&mut steps, alpha);
    steps.extend([
        "Step 3: Calculate test statistic".to_owned(),
        format!(
            "Given: x̄₁ = {}, n₁ = {}, s₁ = {}",
            s1.mean, s1.size, s1.std_dev
        ),
        format!(
            "       x̄₂ = {}, n₂ = {}, s₂ = {}",
            s2.mean, s2.size, s2.std_dev
        ),
    ]);
    steps.extend(variance_steps.iter());
    steps.extend([
        format!(
            "t = (x̄₁ - x̄₂) / SE = ({} - {}) / {standard_error} = {statistic}",
            s1.mean, s2.mean
        ),
        format!("df = {degrees_of_freedom}"),
    ]);
    outcome.push_decision(&mut steps, 4);

    Ok(TwoSampleMeanTest {
        outcome,
        degrees_of_freedom,
        standard_error,
        equal_variances,
        pooled_variance,
        sample1: s1,
        sample2: s2,
        formula: "t = (x̄₁ - x̄₂) / SE",
        steps,
        description: format!(
            "Two-sample t-test for difference in means ({} variances)",
            if equal_variances { "equal" } else { "unequal" }
        ),
    })
}

/// Compares two population proportions with a pooled z-test.
///
/// # Examples
///
/// ```
/// use statcalc_engine::hypothesis::{TailType, two_sample_proportion_test};
///
/// let result = two_sample_proportion_test(45, 100, 30, 100, 0.05, TailType::TwoTailed).unwrap();
/// assert_eq!(result.pooled_proportion, 0.375);
/// assert!(result.outcome.reject_null);
/// ```
pub fn two_sample_proportion_test(
    sample1_successes: u32,
    sample1_size: u32,
    sample2_successes: u32,
    sample2_size: u32,
    alpha: f64,
    tail: TailType,
) -> Result<TwoSampleProportionTest, CalcError> {
    let n1 = error::sample_size("sample 1 size", sample1_size, 1)?;
    let n2 = error::sample_size("sample 2 size", sample2_size, 1)?;
    for (successes, sample_size) in [(sample1_successes, n1), (sample2_successes, n2)] {
        if successes > sample_size {
            return Err(CalcError::SuccessesExceedSampleSize {
                successes,
                sample_size,
            });
        }
    }
    let alpha = error::alpha(alpha)?;

    let (x1, x2) = (f64::from(sample1_successes), f64::from(sample2_successes));
    let (n1f, n2f) = (f64::from(n1), f64::from(n2));
    let p1 = x1 / n1f;
    let p2 = x2 / n2f;
    let pooled = (x1 + x2) / (n1f + n2f);
    let q_pooled = 1.0 - pooled;
    let expected = [n1f * pooled, n1f * q_pooled, n2f * pooled, n2f * q_pooled];
    let conditions_met = expected.iter().all(|&c| c >= NORMAL_APPROXIMATION_MIN);
    let warning = (!conditions_met).then(|| {
        "Normal approximation conditions not met. All of n₁p̂, n₁q̂, n₂p̂, n₂q̂ should be ≥ 5."
            .to_owned()
    });

    let standard_error = (pooled * q_pooled * (1.0 / n1f + 1.0 / n2f)).sqrt();
    if standard_error <= 0.0 {
        return Err(CalcError::ZeroStandardError);
    }
    let statistic = (p1 - p2) / standard_error;
    let op = tail.operator();
    let claim = match tail {
        TailType::TwoTailed => {
            "there is a significant difference between the two population proportions".to_owned()
        }
        TailType::LeftTailed | TailType::RightTailed => {
            format!("the first population proportion {} the second", tail.relation())
        }
    };
    let outcome = TestOutcome::evaluate(
        &SamplingDistribution::standard_normal(),
        tail,
        alpha,
        statistic,
        (
            "H₀: p₁ = p₂ (or p₁ - p₂ = 0)".to_owned(),
            format!("H₁: p₁ {op} p₂ (or p₁ - p₂ {op} 0)"),
        ),
        &claim,
    )
    .with_warning(warning);

    let [n1p, n1q, n2p, n2q] = expected;
    let mut steps = Steps::new();
    outcome.push_hypotheses(&mut steps);
    steps.extend([
        "Step 2: Calculate sample proportions".to_owned(),
        format!("p̂₁ = {sample1_successes}/{n1} = {p1}"),
        format!("p̂₂ = {sample2_successes}/{n2} = {p2}"),
        "Step 3: Calculate pooled proportion".to_owned(),
        format!(
            "p̂ = (x₁ + x₂)/(n₁ + n₂) = ({sample1_successes} + {sample2_successes})/({n1} + {n2}) = {pooled}"
        ),
        "Step 4: Check normal approximation conditions".to_owned(),
        format!("n₁p̂ = {n1} × {pooled} = {n1p}"),
        format!("n₁q̂ = {n1} × {q_pooled} = {n1q}"),
        format!("n₂p̂ = {n2} × {pooled} = {n2p}"),
        format!("n₂q̂ = {n2} × {q_pooled} = {n2q}"),
        format!("All ≥ 5? {}", if conditions_met { "Yes" } else { "No" }),
        format!("Step 5: Set significance level α = {alpha}"),
        "Step 6: Calculate test statistic".to_owned(),
        format!(
            "SE = √[p̂q̂(1/n₁ + 1/n₂)] = √[{pooled} × {q_pooled} × (1/{n1} + 1/{n2})] = {standard_error}"
        ),
        format!("z = (p̂₁ - p̂₂) / SE = ({p1} - {p2}) / {standard_error} = {statistic}"),
    ]);
    outcome.push_decision(&mut steps, 7);

    Ok(TwoSampleProportionTest {
        outcome,
        standard_error,
        sample1_proportion: p1,
        sample2_proportion: p2,
        pooled_proportion: pooled,
        formula: "z = (p̂₁ - p̂₂) / √[p̂q̂(1/n₁ + 1/n₂)]",
        steps,
        description: "Two-sample z-test for difference in proportions",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::assert_close;

    fn z_test(sample_mean: f64, tail: TailType, alpha: f64) -> OneSampleMeanTest {
        one_sample_mean_test(
            sample_mean,
            36,
            100.0,
            alpha,
            tail,
            StdDevSource::KnownPopulation(15.0),
        )
        .unwrap()
    }

    #[test]
    fn test_one_sample_z_test() {
        let result = z_test(105.0, TailType::TwoTailed, 0.05);
        let outcome = &result.outcome;
        assert_eq!(result.distribution, DistributionKind::Z);
        assert_close(outcome.p_value, 0.045_500_263_896_358_4, 1e-9);
        assert_close(outcome.critical_values.values()[1], 1.959_964, 1e-6);
        assert!(outcome.reject_null);
        assert_eq!(outcome.null_hypothesis, "H₀: μ = 100");
        assert_eq!(outcome.alternative_hypothesis, "H₁: μ ≠ 100");
        assert_eq!(outcome.conclusion, "Reject the null hypothesis at α = 0.05 level");
        assert_eq!(
            outcome.interpretation,
            "There is sufficient evidence to conclude that the population mean is not equal to 100"
        );
        assert!(result.steps.iter().last().unwrap().ends_with("< α (0.05), we reject H₀"));
    }

    const TAILS: [TailType; 3] = [TailType::TwoTailed, TailType::LeftTailed, TailType::RightTailed];
    const ALPHAS: [f64; 3] = [0.01, 0.05, 0.1];

    #[track_caller]
    fn assert_decision_matches_p_value(outcome: &TestOutcome, context: &str) {
        assert_eq!(
            outcome.reject_null,
            outcome.p_value < outcome.alpha,
            "{context}: statistic = {}, p = {}, α = {}",
            outcome.test_statistic,
            outcome.p_value,
            outcome.alpha
        );
        assert_eq!(
            outcome.reject_null,
            outcome.critical_values.rejects(outcome.test_statistic),
            "{context}"
        );
    }

    #[test]
    fn test_reject_matches_p_value_for_z_test() {
        for sample_mean in [92.0, 95.1, 97.0, 100.0, 103.5, 104.9, 106.0, 111.0] {
            for alpha in ALPHAS {
                for tail in TAILS {
                    let outcome = z_test(sample_mean, tail, alpha).outcome;
                    assert_decision_matches_p_value(&outcome, &format!("x̄ = {sample_mean}, {tail}"));
                }
            }
        }
    }

    #[test]
    fn test_reject_matches_p_value_for_t_test() {
        for sample_mean in [44.0, 47.5, 49.0, 50.0, 51.2, 52.0, 53.5, 55.0, 58.0] {
            for alpha in ALPHAS {
                for tail in TAILS {
                    let result = one_sample_mean_test(
                        sample_mean,
                        10,
                        50.0,
                        alpha,
                        tail,
                        StdDevSource::SampleEstimate(4.0),
                    )
                    .unwrap();
                    assert_decision_matches_p_value(
                        &result.outcome,
                        &format!("x̄ = {sample_mean}, {tail}"),
                    );
                }
            }
        }
    }

    #[test]
    fn test_reject_matches_p_value_for_proportion_test() {
        for sample_proportion in [0.38, 0.42, 0.45, 0.5, 0.53, 0.56, 0.6, 0.65] {
            for alpha in ALPHAS {
                for tail in TAILS {
                    let result =
                        one_sample_proportion_test(sample_proportion, 100, 0.5, alpha, tail)
                            .unwrap();
                    assert_decision_matches_p_value(
                        &result.outcome,
                        &format!("p̂ = {sample_proportion}, {tail}"),
                    );
                }
            }
        }
    }

    #[test]
    fn test_reject_matches_p_value_for_two_sample_mean_test() {
        for mean1 in [12.0, 15.5, 17.0, 18.5, 20.0, 21.5, 24.0] {
            for equal_variances in [true, false] {
                for alpha in ALPHAS {
                    for tail in TAILS {
                        let result = two_sample_mean_test(
                            TwoSampleSummary::new(mean1, 10, 4.0),
                            TwoSampleSummary::new(17.0, 12, 5.0),
                            alpha,
                            tail,
                            equal_variances,
                        )
                        .unwrap();
                        assert_decision_matches_p_value(
                            &result.outcome,
                            &format!("x̄₁ = {mean1}, pooled = {equal_variances}, {tail}"),
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_reject_matches_p_value_for_two_sample_proportion_test() {
        for successes1 in [18, 22, 26, 30, 34, 38, 42, 48] {
            for alpha in ALPHAS {
                for tail in TAILS {
                    let result =
                        two_sample_proportion_test(successes1, 100, 30, 100, alpha, tail).unwrap();
                    assert_decision_matches_p_value(
                        &result.outcome,
                        &format!("x₁ = {successes1}, {tail}"),
                    );
                }
            }
        }
    }

    #[test]
    fn test_one_tailed_directions() {
        let right = z_test(105.0, TailType::RightTailed, 0.05).outcome;
        assert_close(right.p_value, 0.022_750_131_948_179_2, 1e-9);
        assert!(matches!(right.critical_values, CriticalRegion::Upper(q) if (q - 1.644_854).abs() < 1e-6));
        assert!(right.reject_null);

        let left = z_test(105.0, TailType::LeftTailed, 0.05).outcome;
        assert_close(left.p_value, 1.0 - right.p_value, 1e-12);
        assert!(!left.reject_null);
        assert_eq!(left.alternative_hypothesis, "H₁: μ < 100");
        assert!(left.interpretation.starts_with("There is not sufficient evidence"));
    }

    #[test]
    fn test_one_sample_t_test() {
        let result = one_sample_mean_test(
            52.0,
            10,
            50.0,
            0.05,
            TailType::TwoTailed,
            StdDevSource::SampleEstimate(4.0),
        )
        .unwrap();
        assert_eq!(result.distribution, DistributionKind::T);
        assert_eq!(result.degrees_of_freedom, Some(9.0));
        assert_close(result.outcome.test_statistic, 2.0 / (4.0 / 10f64.sqrt()), 1e-12);
        assert_close(result.outcome.critical_values.values()[1], 2.262_157, 1e-6);
        assert!(!result.outcome.reject_null);
        assert!(result.steps.iter().any(|s| s == "df = n - 1 = 10 - 1 = 9"));
        assert_eq!(result.description, "One-sample t-test for population mean");
    }

    #[test]
    fn test_one_sample_proportion_test() {
        let result = one_sample_proportion_test(0.55, 100, 0.5, 0.05, TailType::RightTailed).unwrap();
        assert_close(result.standard_error, 0.05, 1e-12);
        assert_close(result.outcome.test_statistic, 1.0, 1e-9);
        assert_close(result.outcome.p_value, 0.158_655_253_931_457, 1e-6);
        assert!(!result.outcome.reject_null);
        assert_eq!(result.outcome.warning, None);

        let small = one_sample_proportion_test(0.75, 8, 0.5, 0.05, TailType::TwoTailed).unwrap();
        assert!(small.outcome.warning.is_some());
        assert!(one_sample_proportion_test(0.5, 10, 1.0, 0.05, TailType::TwoTailed).is_err());
    }

    #[test]
    fn test_pooled_two_sample_test() {
        let result = two_sample_mean_test(
            TwoSampleSummary::new(20.0, 10, 4.0),
            TwoSampleSummary::new(17.0, 12, 5.0),
            0.05,
            TailType::TwoTailed,
            true,
        )
        .unwrap();
        assert_eq!(result.degrees_of_freedom, 20.0);
        assert_close(result.pooled_variance.unwrap(), 20.95, 1e-12);
        assert_close(result.outcome.test_statistic, 1.530_8, 1e-3);
        assert!(!result.outcome.reject_null);
        assert_eq!(result.description, "Two-sample t-test for difference in means (equal variances)");
    }

    #[test]
    fn test_welch_two_sample_test() {
        let result = two_sample_mean_test(
            TwoSampleSummary::new(20.0, 10, 4.0),
            TwoSampleSummary::new(17.0, 12, 5.0),
            0.05,
            TailType::RightTailed,
            false,
        )
        .unwrap();
        let df = result.degrees_of_freedom;
        assert_eq!(result.pooled_variance, None);
        assert_close(df, 19.980_326_527_576_332, 1e-9);
        assert_close(result.standard_error, (1.6f64 + 25.0 / 12.0).sqrt(), 1e-12);
        assert_eq!(
            result.outcome.interpretation,
            "There is not sufficient evidence to conclude that the first population mean is greater than the second"
        );
    }

    #[test]
    fn test_two_sample_mean_rejects_tiny_samples() {
        let result = two_sample_mean_test(
            TwoSampleSummary::new(1.0, 1, 1.0),
            TwoSampleSummary::new(1.0, 5, 1.0),
            0.05,
            TailType::TwoTailed,
            true,
        );
        assert!(matches!(
            result,
            Err(CalcError::SampleSizeTooSmall {
                name: "sample 1 size",
                ..
            })
        ));
    }

    #[test]
    fn test_two_sample_proportion_test() {
        let result = two_sample_proportion_test(45, 100, 30, 100, 0.05, TailType::TwoTailed).unwrap();
        assert_close(result.standard_error, 0.068_465, 1e-6);
        assert_close(result.outcome.test_statistic, 2.190_89, 1e-5);
        assert_close(result.outcome.p_value, 0.028_459, 1e-5);
        assert_eq!(result.outcome.warning, None);
        assert_eq!(result.steps.iter().filter(|s| s.starts_with("Step ")).count(), 8);
    }

    #[test]
    fn test_two_sample_proportion_edge_cases() {
        assert_eq!(
            two_sample_proportion_test(0, 10, 0, 12, 0.05, TailType::TwoTailed),
            Err(CalcError::ZeroStandardError)
        );
        assert_eq!(
            two_sample_proportion_test(11, 10, 3, 12, 0.05, TailType::TwoTailed),
            Err(CalcError::SuccessesExceedSampleSize {
                successes: 11,
                sample_size: 10
            })
        );
        let sparse = two_sample_proportion_test(1, 10, 2, 12, 0.05, TailType::LeftTailed).unwrap();
        assert!(sparse.outcome.warning.is_some());
    }

    #[test]
    fn test_critical_values_serialize_as_list() {
        let two = CriticalRegion::TwoSided {
            lower: -1.5,
            upper: 1.5,
        };
        assert_eq!(serde_json::to_string(&two).unwrap(), "[-1.5,1.5]");
        assert_eq!(serde_json::to_string(&CriticalRegion::Lower(-2.0)).unwrap(), "[-2.0]");
    }

    #[test]
    fn test_tail_type_parses() {
        assert_eq!("left-tailed".parse::<TailType>(), Ok(TailType::LeftTailed));
        assert_eq!(TailType::RightTailed.to_string(), "right-tailed");
        assert!("two_tailed".parse::<TailType>().is_err());
    }
}

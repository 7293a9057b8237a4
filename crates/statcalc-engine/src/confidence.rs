//! Interval estimation and required-sample-size planning.

use serde::Serialize;

use crate::{
    error::{self, CalcError},
    sampling::{DistributionKind, SamplingDistribution},
    steps::{self, Steps},
};

/// Where the spread of a mean estimate comes from.
///
/// A known population standard deviation selects the z distribution; a
/// sample estimate selects Student's t with `n - 1` degrees of freedom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StdDevSource {
    KnownPopulation(f64),
    SampleEstimate(f64),
}

impl StdDevSource {
    /// Builds a source from the pair of optional inputs a front end collects.
    ///
    /// ```
    /// use statcalc_engine::{CalcError, confidence::StdDevSource};
    ///
    /// assert_eq!(
    ///     StdDevSource::from_options(None, Some(2.0)),
    ///     Ok(StdDevSource::SampleEstimate(2.0))
    /// );
    /// assert_eq!(
    ///     StdDevSource::from_options(None, None),
    ///     Err(CalcError::MissingStandardDeviation)
    /// );
    /// ```
    pub fn from_options(population: Option<f64>, sample: Option<f64>) -> Result<Self, CalcError> {
        match (population, sample) {
            (Some(sigma), None) => Ok(Self::KnownPopulation(sigma)),
            (None, Some(s)) => Ok(Self::SampleEstimate(s)),
            (None, None) => Err(CalcError::MissingStandardDeviation),
            (Some(_), Some(_)) => Err(CalcError::ConflictingStandardDeviation),
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            Self::KnownPopulation(v) | Self::SampleEstimate(v) => v,
        }
    }

    pub(crate) fn validated(self) -> Result<Self, CalcError> {
        match self {
            Self::KnownPopulation(v) => {
                error::positive("population standard deviation", v).map(Self::KnownPopulation)
            }
            Self::SampleEstimate(v) => {
                error::positive("sample standard deviation", v).map(Self::SampleEstimate)
            }
        }
    }

    /// Sampling distribution for a sample of size `n`.
    pub(crate) fn distribution(self, n: u32) -> Result<SamplingDistribution, CalcError> {
        match self {
            Self::KnownPopulation(_) => Ok(SamplingDistribution::standard_normal()),
            Self::SampleEstimate(_) => SamplingDistribution::students_t(f64::from(n) - 1.0),
        }
    }

    /// Smallest sample size the matching distribution accepts.
    pub(crate) fn min_sample_size(self) -> u32 {
        match self {
            Self::KnownPopulation(_) => 1,
            Self::SampleEstimate(_) => 2,
        }
    }

    pub(crate) fn symbol(self) -> &'static str {
        match self {
            Self::KnownPopulation(_) => "σ",
            Self::SampleEstimate(_) => "s",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeanConfidenceInterval {
    pub confidence_interval: [f64; 2],
    pub margin_of_error: f64,
    pub critical_value: f64,
    pub standard_error: f64,
    pub distribution: DistributionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degrees_of_freedom: Option<f64>,
    pub confidence_level: f64,
    pub sample_mean: f64,
    pub sample_size: u32,
    pub formula: &'static str,
    pub steps: Steps,
    pub interpretation: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl MeanConfidenceInterval {
    #[must_use]
    pub fn lower_bound(&self) -> f64 {
        self.confidence_interval[0]
    }

    #[must_use]
    pub fn upper_bound(&self) -> f64 {
        self.confidence_interval[1]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProportionConfidenceInterval {
    /// Clamped to `[0, 1]`.
    pub confidence_interval: [f64; 2],
    pub margin_of_error: f64,
    pub critical_value: f64,
    pub standard_error: f64,
    pub confidence_level: f64,
    pub sample_proportion: f64,
    pub sample_size: u32,
    pub formula: &'static str,
    pub steps: Steps,
    pub interpretation: String,
    pub percentage_interpretation: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl ProportionConfidenceInterval {
    #[must_use]
    pub fn lower_bound(&self) -> f64 {
        self.confidence_interval[0]
    }

    #[must_use]
    pub fn upper_bound(&self) -> f64 {
        self.confidence_interval[1]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSizeForMean {
    pub sample_size_exact: f64,
    pub sample_size_required: u64,
    pub margin_error: f64,
    pub confidence_level: f64,
    pub critical_value: f64,
    pub population_std: f64,
    pub formula: &'static str,
    pub steps: Steps,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSizeForProportion {
    pub sample_size_exact: f64,
    pub sample_size_required: u64,
    pub margin_error: f64,
    pub confidence_level: f64,
    pub critical_value: f64,
    pub estimated_proportion: f64,
    pub conservative_estimate: bool,
    pub formula: &'static str,
    pub steps: Steps,
    pub description: String,
}

/// Count below which the normal approximation to a binomial is doubtful.
const NORMAL_APPROXIMATION_MIN: f64 = 5.0;

/// Proportion assumed when no prior estimate exists; it maximizes `p(1 - p)`.
const CONSERVATIVE_PROPORTION: f64 = 0.5;

/// Sample size below which a t interval leans on the population being normal.
const SMALL_SAMPLE: u32 = 30;

/// Confidence interval for a population mean.
///
/// A t-based interval from fewer than 30 observations carries a warning that
/// it assumes an approximately normal population.
///
/// # Examples
///
/// ```
/// use statcalc_engine::confidence::{StdDevSource, mean_confidence_interval};
///
/// let ci = mean_confidence_interval(50.0, 25, 0.95, StdDevSource::KnownPopulation(10.0)).unwrap();
/// assert_eq!(ci.standard_error, 2.0);
/// assert!(ci.lower_bound() < 50.0 && 50.0 < ci.upper_bound());
/// assert_eq!(ci.degrees_of_freedom, None);
/// ```
pub fn mean_confidence_interval(
    sample_mean: f64,
    sample_size: u32,
    confidence_level: f64,
    std_dev: StdDevSource,
) -> Result<MeanConfidenceInterval, CalcError> {
    let sample_mean = error::finite("sample mean", sample_mean)?;
    let confidence_level = error::confidence_level(confidence_level)?;
    let std_dev = std_dev.validated()?;
    let n = error::sample_size("sample size", sample_size, std_dev.min_sample_size())?;
    let dist = std_dev.distribution(n)?;

    let alpha = 1.0 - confidence_level;
    let alpha_half = alpha / 2.0;
    let critical_value = dist.two_sided_critical(confidence_level);
    let spread = std_dev.value();
    let standard_error = spread / f64::from(n).sqrt();
    let margin_of_error = critical_value * standard_error;
    let lower = sample_mean - margin_of_error;
    let upper = sample_mean + margin_of_error;
    let level_pct = steps::percent(confidence_level);
    let symbol = std_dev.symbol();
    let kind = dist.kind();

    let mut steps = Steps::from([
        format!("Given: x̄ = {sample_mean}, n = {n}, {symbol} = {spread}"),
        format!("Confidence level = {level_pct}%"),
        format!("Step 1: Calculate α = 1 - {confidence_level} = {alpha}"),
        format!("Step 2: Find α/2 = {alpha}/2 = {alpha_half}"),
    ]);
    match dist.degrees_of_freedom() {
        None => steps.extend([
            "Step 3: Since σ is known, use z-distribution".to_owned(),
            format!("z_{} = {critical_value}", 1.0 - alpha_half),
        ]),
        Some(df) => steps.extend([
            "Step 3: Since σ is unknown, use t-distribution".to_owned(),
            format!("Degrees of freedom = n - 1 = {n} - 1 = {df}"),
            format!("t_{},{df} = {critical_value}", 1.0 - alpha_half),
        ]),
    }
    steps.extend([
        "Step 4: Calculate standard error".to_owned(),
        format!("SE = {symbol}/√n = {spread}/√{n} = {standard_error}"),
        "Step 5: Calculate margin of error".to_owned(),
        format!("ME = {kind} × SE = {critical_value} × {standard_error} = {margin_of_error}"),
        "Step 6: Calculate confidence interval".to_owned(),
        format!("CI = x̄ ± ME = {sample_mean} ± {margin_of_error}"),
        format!("CI = [{lower}, {upper}]"),
    ]);

    Ok(MeanConfidenceInterval {
        confidence_interval: [lower, upper],
        margin_of_error,
        critical_value,
        standard_error,
        distribution: kind,
        degrees_of_freedom: dist.degrees_of_freedom(),
        confidence_level,
        sample_mean,
        sample_size: n,
        formula: match kind {
            DistributionKind::Z => "CI = x̄ ± z_(α/2) × (σ/√n)",
            DistributionKind::T => "CI = x̄ ± t_(α/2,df) × (s/√n)",
        },
        steps,
        interpretation: format!(
            "We are {level_pct}% confident that the true population mean is between {lower} and {upper}"
        ),
        description: format!("{level_pct}% confidence interval for population mean"),
        warning: (kind == DistributionKind::T && n < SMALL_SAMPLE).then(|| {
            format!(
                "Small sample (n = {n} < {SMALL_SAMPLE}): the t interval assumes the population is approximately normal"
            )
        }),
    })
}

/// Wald confidence interval for a population proportion.
///
/// The bounds are clamped to `[0, 1]`; a warning is attached when either
/// expected count `n·p̂` or `n·(1 - p̂)` is below 5.
pub fn proportion_confidence_interval(
    sample_proportion: f64,
    sample_size: u32,
    confidence_level: f64,
) -> Result<ProportionConfidenceInterval, CalcError> {
    let p_hat = error::proportion("sample proportion", sample_proportion)?;
    let n = error::sample_size("sample size", sample_size, 1)?;
    let confidence_level = error::confidence_level(confidence_level)?;
    let n_f = f64::from(n);

    let alpha = 1.0 - confidence_level;
    let alpha_half = alpha / 2.0;
    let q_hat = 1.0 - p_hat;
    let np_hat = n_f * p_hat;
    let nq_hat = n_f * q_hat;
    let conditions_met = np_hat >= NORMAL_APPROXIMATION_MIN && nq_hat >= NORMAL_APPROXIMATION_MIN;
    let warning = (!conditions_met).then(|| {
        format!(
            "Normal approximation may not be appropriate (np̂ = {np_hat}, nq̂ = {nq_hat}). Both should be ≥ 5."
        )
    });

    let critical_value = SamplingDistribution::standard_normal().two_sided_critical(confidence_level);
    let standard_error = (p_hat * q_hat / n_f).sqrt();
    let margin_of_error = critical_value * standard_error;
    let lower = (p_hat - margin_of_error).max(0.0);
    let upper = (p_hat + margin_of_error).min(1.0);
    let level_pct = steps::percent(confidence_level);

    let steps = Steps::from([
        format!("Given: p̂ = {p_hat}, n = {n}"),
        format!("Confidence level = {level_pct}%"),
        "Step 1: Check normal approximation conditions".to_owned(),
        format!("np̂ = {n} × {p_hat} = {np_hat}"),
        format!("nq̂ = n(1-p̂) = {n} × {q_hat} = {nq_hat}"),
        format!(
            "Both np̂ ≥ 5 and nq̂ ≥ 5? {}",
            if conditions_met { "Yes" } else { "No" }
        ),
        format!("Step 2: Calculate α = 1 - {confidence_level} = {alpha}"),
        format!("Step 3: Find critical value z_{} = {critical_value}", 1.0 - alpha_half),
        "Step 4: Calculate standard error".to_owned(),
        format!("SE = √[p̂(1-p̂)/n] = √[{p_hat} × {q_hat} / {n}] = {standard_error}"),
        "Step 5: Calculate margin of error".to_owned(),
        format!("ME = z × SE = {critical_value} × {standard_error} = {margin_of_error}"),
        "Step 6: Calculate confidence interval".to_owned(),
        format!("CI = p̂ ± ME = {p_hat} ± {margin_of_error}"),
        format!("CI = [{lower}, {upper}]"),
    ]);

    Ok(ProportionConfidenceInterval {
        confidence_interval: [lower, upper],
        margin_of_error,
        critical_value,
        standard_error,
        confidence_level,
        sample_proportion: p_hat,
        sample_size: n,
        formula: "CI = p̂ ± z_(α/2) × √[p̂(1-p̂)/n]",
        steps,
        interpretation: format!(
            "We are {level_pct}% confident that the true population proportion is between {lower:.4} and {upper:.4}"
        ),
        percentage_interpretation: format!(
            "We are {level_pct}% confident that the true population proportion is between {:.2}% and {:.2}%",
            lower * 100.0,
            upper * 100.0
        ),
        description: format!("{level_pct}% confidence interval for population proportion"),
        warning,
    })
}

/// Sample size needed to estimate a mean within `margin_error`.
pub fn sample_size_for_mean(
    margin_error: f64,
    confidence_level: f64,
    population_std: f64,
) -> Result<SampleSizeForMean, CalcError> {
    let margin_error = error::positive("margin of error", margin_error)?;
    let confidence_level = error::confidence_level(confidence_level)?;
    let population_std = error::positive("population standard deviation", population_std)?;

    let alpha = 1.0 - confidence_level;
    let z = SamplingDistribution::standard_normal().two_sided_critical(confidence_level);
    let ratio = z * population_std / margin_error;
    let exact = ratio.powi(2);
    let required = round_up(exact);
    let level_pct = steps::percent(confidence_level);

    Ok(SampleSizeForMean {
        sample_size_exact: exact,
        sample_size_required: required,
        margin_error,
        confidence_level,
        critical_value: z,
        population_std,
        formula: "n = (z_(α/2) × σ / ME)²",
        steps: Steps::from([
            format!(
                "Given: ME = {margin_error}, confidence level = {level_pct}%, σ = {population_std}"
            ),
            format!("Step 1: Find critical value z_{} = {z}", 1.0 - alpha / 2.0),
            "Step 2: Use sample size formula".to_owned(),
            "n = (z × σ / ME)²".to_owned(),
            format!("n = ({z} × {population_std} / {margin_error})²"),
            format!("n = ({ratio})²"),
            format!("n = {exact}"),
            "Step 3: Round up to next integer".to_owned(),
            format!("Required sample size = {required}"),
        ]),
        description: format!(
            "Sample size needed for {level_pct}% confidence with margin of error {margin_error}"
        ),
    })
}

/// Sample size needed to estimate a proportion within `margin_error`.
///
/// Without a prior estimate the conservative `p = 0.5` is used.
///
/// ```
/// use statcalc_engine::confidence::sample_size_for_proportion;
///
/// let result = sample_size_for_proportion(0.03, 0.95, None).unwrap();
/// assert_eq!(result.sample_size_required, 1068);
/// assert!(result.conservative_estimate);
/// ```
pub fn sample_size_for_proportion(
    margin_error: f64,
    confidence_level: f64,
    estimated_proportion: Option<f64>,
) -> Result<SampleSizeForProportion, CalcError> {
    let margin_error = error::positive("margin of error", margin_error)?;
    let confidence_level = error::confidence_level(confidence_level)?;
    let (p, conservative) = match estimated_proportion {
        Some(p) => (error::open_proportion("estimated proportion", p)?, false),
        None => (CONSERVATIVE_PROPORTION, true),
    };

    let alpha = 1.0 - confidence_level;
    let z = SamplingDistribution::standard_normal().two_sided_critical(confidence_level);
    let variance = p * (1.0 - p);
    let exact = z.powi(2) * variance / margin_error.powi(2);
    let required = round_up(exact);
    let level_pct = steps::percent(confidence_level);

    Ok(SampleSizeForProportion {
        sample_size_exact: exact,
        sample_size_required: required,
        margin_error,
        confidence_level,
        critical_value: z,
        estimated_proportion: p,
        conservative_estimate: conservative,
        formula: "n = z²_(α/2) × p̂(1-p̂) / ME²",
        steps: Steps::from([
            format!("Given: ME = {margin_error}, confidence level = {level_pct}%"),
            if conservative {
                format!("Prior estimate: p̂ = {p} (conservative estimate)")
            } else {
                format!("Prior estimate: p̂ = {p}")
            },
            format!("Step 1: Find critical value z_{} = {z}", 1.0 - alpha / 2.0),
            "Step 2: Use sample size formula".to_owned(),
            "n = z² × p̂(1-p̂) / ME²".to_owned(),
            format!("n = {z}² × {p} × {} / {margin_error}²", 1.0 - p),
            format!("n = {} × {variance} / {}", z.powi(2), margin_error.powi(2)),
            format!("n = {exact}"),
            "Step 3: Round up to next integer".to_owned(),
            format!("Required sample size = {required}"),
        ]),
        description: format!(
            "Sample size needed for {level_pct}% confidence with margin of error {margin_error}"
        ),
    })
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_up(exact: f64) -> u64 {
    exact.ceil() as u64
}

//! Queries against a normal distribution with known parameters.

use std::{fmt, str::FromStr};

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

use crate::{
    error::{self, CalcError},
    steps::{self, Steps},
};

/// A normal distribution `N(mean, std_dev²)`.
///
/// # Examples
///
/// ```
/// use statcalc_engine::normal::NormalDistribution;
///
/// let dist = NormalDistribution::new(100.0, 15.0).unwrap();
/// let result = dist.calculate_z_score(130.0);
/// assert_eq!(result.z_score, 2.0);
/// assert!(NormalDistribution::new(0.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct NormalDistribution {
    mean: f64,
    std_dev: f64,
    standard: Normal,
}

/// Direction of a single-value probability query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    #[default]
    #[display("less_than")]
    LessThan,
    #[display("greater_than")]
    GreaterThan,
    /// Evaluates to the CDF, `P(X <= x)`; an exact point of a continuous
    /// distribution has probability zero.
    #[display("equal_to")]
    EqualTo,
}

impl FromStr for Comparison {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "less_than" => Ok(Self::LessThan),
            "greater_than" => Ok(Self::GreaterThan),
            "equal_to" => Ok(Self::EqualTo),
            _ => Err(CalcError::UnknownVariant {
                kind: "comparison",
                value: s.to_owned(),
                expected: "less_than, greater_than, equal_to",
            }),
        }
    }
}

/// How unusual a z-score is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZScoreBand {
    Common,
    FairlyCommon,
    Uncommon,
    VeryRare,
}

impl ZScoreBand {
    #[must_use]
    pub fn from_z(z: f64) -> Self {
        match z.abs() {
            v if v < 1.0 => Self::Common,
            v if v < 2.0 => Self::FairlyCommon,
            v if v < 3.0 => Self::Uncommon,
            _ => Self::VeryRare,
        }
    }

    #[must_use]
    pub fn interpretation(self) -> &'static str {
        match self {
            Self::Common => "Within 1 standard deviation of the mean (common)",
            Self::FairlyCommon => "Within 2 standard deviations of the mean (fairly common)",
            Self::Uncommon => "Within 3 standard deviations of the mean (uncommon)",
            Self::VeryRare => "More than 3 standard deviations from the mean (very rare)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZScoreResult {
    pub x_value: f64,
    pub z_score: f64,
    pub band: ZScoreBand,
    pub formula: &'static str,
    pub steps: Steps,
    pub interpretation: String,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityResult {
    pub x_value: f64,
    pub comparison: Comparison,
    pub z_score: f64,
    pub probability: f64,
    pub percentage: f64,
    pub formula: &'static str,
    pub steps: Steps,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BetweenProbabilityResult {
    /// Bounds after ordering, `lower <= upper`.
    pub lower: f64,
    pub upper: f64,
    pub z_scores: [f64; 2],
    pub probability: f64,
    pub percentage: f64,
    pub formula: &'static str,
    pub steps: Steps,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentileResult {
    pub percentile: f64,
    pub proportion: f64,
    pub z_score: f64,
    pub x_value: f64,
    pub formula: &'static str,
    pub steps: Steps,
    pub interpretation: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalValuesResult {
    pub confidence_level: f64,
    pub alpha: f64,
    pub z_critical_lower: f64,
    pub z_critical_upper: f64,
    pub x_critical_lower: f64,
    pub x_critical_upper: f64,
    pub formula: &'static str,
    pub steps: Steps,
    pub description: String,
}

/// One band of the empirical rule, `mean ± k·std_dev`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmpiricalBand {
    pub k: u8,
    pub lower: f64,
    pub upper: f64,
    pub percentage: f64,
    pub description: String,
}

impl EmpiricalBand {
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.lower <= other.lower && other.upper <= self.upper
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmpiricalRuleResult {
    pub one_std: EmpiricalBand,
    pub two_std: EmpiricalBand,
    pub three_std: EmpiricalBand,
    pub formula: &'static str,
    pub steps: Steps,
    pub description: &'static str,
}

impl NormalDistribution {
    /// Fails unless `std_dev` is a positive finite number and `mean` is finite.
    pub fn new(mean: f64, std_dev: f64) -> Result<Self, CalcError> {
        let mean = error::finite("mean", mean)?;
        let std_dev = error::positive("standard deviation", std_dev)?;
        Ok(Self {
            mean,
            std_dev,
            standard: Normal::standard(),
        })
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    fn z(&self, x: f64) -> f64 {
        (x - self.mean) / self.std_dev
    }

    fn x(&self, z: f64) -> f64 {
        self.mean + z * self.std_dev
    }

    fn given(&self) -> String {
        format!("Given: μ = {}, σ = {}", self.mean, self.std_dev)
    }

    #[must_use]
    pub fn calculate_z_score(&self, x_value: f64) -> ZScoreResult {
        let (mean, std_dev) = (self.mean, self.std_dev);
        let difference = x_value - mean;
        let z_score = self.z(x_value);
        let band = ZScoreBand::from_z(z_score);

        ZScoreResult {
            x_value,
            z_score,
            band,
            formula: "Z = (x - μ) / σ",
            steps: Steps::from([
                format!("{}, x = {x_value}", self.given()),
                "Z = (x - μ) / σ".to_owned(),
                format!("Z = ({x_value} - {mean}) / {std_dev}"),
                format!("Z = {difference} / {std_dev}"),
                format!("Z = {z_score}"),
            ]),
            interpretation: band.interpretation().to_owned(),
            description: "Standardized score showing how many standard deviations from the mean",
        }
    }

    #[must_use]
    pub fn calculate_probability(&self, x_value: f64, comparison: Comparison) -> ProbabilityResult {
        let z_score = self.z(x_value);
        let cdf = self.standard.cdf(z_score);
        let mut steps = Steps::from([
            format!("{}, x = {x_value}", self.given()),
            "Step 1: Calculate z-score".to_owned(),
            format!(
                "Z = (x - μ) / σ = ({x_value} - {}) / {} = {z_score}",
                self.mean, self.std_dev
            ),
            "Step 2: Find probability using standard normal table".to_owned(),
        ]);

        let (probability, description) = match comparison {
            Comparison::LessThan => {
                steps.push(format!("P(X < {x_value}) = P(Z < {z_score}) = {cdf}"));
                (cdf, format!("Probability that X is less than {x_value}"))
            }
            Comparison::GreaterThan => {
                let upper = self.standard.sf(z_score);
                steps.push(format!("P(X > {x_value}) = P(Z > {z_score}) = {upper}"));
                (upper, format!("Probability that X is greater than {x_value}"))
            }
            Comparison::EqualTo => {
                steps.push(format!("P(X ≤ {x_value}) = P(Z ≤ {z_score}) = {cdf}"));
                steps.push("A single point has probability 0 for a continuous distribution, so the cumulative probability P(X ≤ x) is reported");
                (cdf, format!("Probability that X is at most {x_value}"))
            }
        };

        ProbabilityResult {
            x_value,
            comparison,
            z_score,
            probability,
            percentage: probability * 100.0,
            formula: "P = Φ(z) where Φ is the standard normal CDF",
            steps,
            description,
        }
    }

    /// `P(x1 < X < x2)`; the bounds are swapped when given in reverse.
    #[must_use]
    pub fn calculate_probability_between(&self, x1: f64, x2: f64) -> BetweenProbabilityResult {
        let (lower, upper) = if x1 > x2 { (x2, x1) } else { (x1, x2) };
        let (mean, std_dev) = (self.mean, self.std_dev);
        let z1 = self.z(lower);
        let z2 = self.z(upper);
        let p1 = self.standard.cdf(z1);
        let p2 = self.standard.cdf(z2);
        let probability = p2 - p1;

        BetweenProbabilityResult {
            lower,
            upper,
            z_scores: [z1, z2],
            probability,
            percentage: probability * 100.0,
            formula: "P(a < X < b) = Φ(z₂) - Φ(z₁)",
            steps: Steps::from([
                self.given(),
                format!("Find P({lower} < X < {upper})"),
                "Step 1: Calculate z-scores".to_owned(),
                format!("Z₁ = ({lower} - {mean}) / {std_dev} = {z1}"),
                format!("Z₂ = ({upper} - {mean}) / {std_dev} = {z2}"),
                "Step 2: Find probabilities".to_owned(),
                format!("P(Z < {z1}) = {p1}"),
                format!("P(Z < {z2}) = {p2}"),
                "Step 3: Calculate difference".to_owned(),
                format!("P({lower} < X < {upper}) = P(Z < {z2}) - P(Z < {z1})"),
                format!("P({lower} < X < {upper}) = {p2} - {p1} = {probability}"),
            ]),
            description: format!("Probability that X is between {lower} and {upper}"),
        }
    }

    /// Value below which `percentile` percent of the distribution lies.
    pub fn find_percentile(&self, percentile: f64) -> Result<PercentileResult, CalcError> {
        let percentile = error::percentile(percentile)?;
        let (mean, std_dev) = (self.mean, self.std_dev);
        let proportion = percentile / 100.0;
        let z_score = self.standard.inverse_cdf(proportion);
        let offset = z_score * std_dev;
        let x_value = mean + offset;

        Ok(PercentileResult {
            percentile,
            proportion,
            z_score,
            x_value,
            formula: "x = μ + z × σ",
            steps: Steps::from([
                self.given(),
                format!("Find the {percentile}th percentile"),
                format!("Step 1: Convert percentile to proportion: p = {percentile}/100 = {proportion}"),
                format!("Step 2: Find z-score where P(Z < z) = {proportion}"),
                format!("From standard normal table: z = {z_score}"),
                "Step 3: Convert z-score to x-value".to_owned(),
                format!("x = μ + z × σ = {mean} + {z_score} × {std_dev}"),
                format!("x = {mean} + {offset} = {x_value}"),
            ]),
            interpretation: format!("The {percentile}th percentile is {x_value}"),
            description: format!("{percentile}% of values fall below {x_value}"),
        })
    }

    /// Symmetric two-sided bounds containing `confidence_level` of the mass.
    pub fn find_critical_values(
        &self,
        confidence_level: f64,
    ) -> Result<CriticalValuesResult, CalcError> {
        let confidence_level = error::confidence_level(confidence_level)?;
        let (mean, std_dev) = (self.mean, self.std_dev);
        let alpha = 1.0 - confidence_level;
        let alpha_half = alpha / 2.0;
        let z_lower = self.standard.inverse_cdf(alpha_half);
        let z_upper = self.standard.inverse_cdf(1.0 - alpha_half);
        let x_lower = self.x(z_lower);
        let x_upper = self.x(z_upper);

        Ok(CriticalValuesResult {
            confidence_level,
            alpha,
            z_critical_lower: z_lower,
            z_critical_upper: z_upper,
            x_critical_lower: x_lower,
            x_critical_upper: x_upper,
            formula: "x = μ ± z_(α/2) × σ",
            steps: Steps::from([
                self.given(),
                format!("Confidence level = {}%", steps::percent(confidence_level)),
                format!("Step 1: Calculate α = 1 - {confidence_level} = {alpha}"),
                format!("Step 2: Find α/2 = {alpha}/2 = {alpha_half}"),
                "Step 3: Find critical z-values".to_owned(),
                format!("z_lower = z_{alpha_half} = {z_lower}"),
                format!("z_upper = z_{} = {z_upper}", 1.0 - alpha_half),
                "Step 4: Convert to x-values".to_owned(),
                format!("x_lower = μ + z_lower × σ = {mean} + {z_lower} × {std_dev} = {x_lower}"),
                format!("x_upper = μ + z_upper × σ = {mean} + {z_upper} × {std_dev} = {x_upper}"),
            ]),
            description: format!(
                "Critical values for {}% confidence interval",
                steps::percent(confidence_level)
            ),
        })
    }

    /// The 68-95-99.7 rule bands.
    #[must_use]
    pub fn empirical_rule(&self) -> EmpiricalRuleResult {
        let band = |k: u8, percentage: f64| {
            let spread = f64::from(k) * self.std_dev;
            let noun = if k == 1 { "deviation" } else { "deviations" };
            EmpiricalBand {
                k,
                lower: self.mean - spread,
                upper: self.mean + spread,
                percentage,
                description: format!("{percentage}% of data falls within {k} standard {noun}"),
            }
        };
        let bands = [band(1, 68.0), band(2, 95.0), band(3, 99.7)];

        let mut steps = Steps::from([self.given(), "Empirical Rule (68-95-99.7 Rule):".to_owned()]);
        for b in &bands {
            steps.push(format!(
                "{}% of data falls within μ ± {}σ = {} ± {} = [{}, {}]",
                b.percentage,
                b.k,
                self.mean,
                f64::from(b.k) * self.std_dev,
                b.lower,
                b.upper
            ));
        }
        let [one_std, two_std, three_std] = bands;

        EmpiricalRuleResult {
            one_std,
            two_std,
            three_std,
            formula: "μ ± kσ where k = 1, 2, or 3",
            steps,
            description: "Empirical rule boundaries for normal distribution",
        }
    }
}

impl fmt::Display for NormalDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N(μ = {}, σ = {})", self.mean, self.std_dev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::assert_close;

    #[test]
    fn test_rejects_non_positive_std_dev() {
        assert!(matches!(
            NormalDistribution::new(0.0, -1.0),
            Err(CalcError::NonPositiveParameter { .. })
        ));
        assert!(NormalDistribution::new(0.0, 0.0).is_err());
        assert!(NormalDistribution::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_z_score_bands() {
        let dist = NormalDistribution::new(0.0, 1.0).unwrap();
        assert_eq!(dist.calculate_z_score(0.5).band, ZScoreBand::Common);
        assert_eq!(dist.calculate_z_score(-1.5).band, ZScoreBand::FairlyCommon);
        assert_eq!(dist.calculate_z_score(2.0).band, ZScoreBand::Uncommon);
        assert_eq!(dist.calculate_z_score(-3.0).band, ZScoreBand::VeryRare);
    }

    #[test]
    fn test_z_score_round_trip() {
        let dist = NormalDistribution::new(0.0, 1.0).unwrap();
        for x in [-4.2, -1.0, 0.0, 0.3, 2.75, 10.0] {
            let z = dist.calculate_z_score(x).z_score;
            assert_close(dist.mean() + z * dist.std_dev(), x, 1e-12);
        }
    }

    #[test]
    fn test_probability_directions() {
        let dist = NormalDistribution::new(100.0, 15.0).unwrap();
        let less = dist.calculate_probability(115.0, Comparison::LessThan);
        let greater = dist.calculate_probability(115.0, Comparison::GreaterThan);
        let equal = dist.calculate_probability(115.0, Comparison::EqualTo);
        assert_close(less.probability, 0.841_344_746_068_542_9, 1e-9);
        assert_close(less.probability + greater.probability, 1.0, 1e-12);
        assert_eq!(equal.probability, less.probability);
        assert_close(less.percentage, less.probability * 100.0, 1e-12);
        assert_eq!(less.z_score, 1.0);
    }

    #[test]
    fn test_probability_steps_end_with_result() {
        let dist = NormalDistribution::new(100.0, 15.0).unwrap();
        for x in [55.0, 99.0, 115.0, 160.0] {
            for comparison in [Comparison::LessThan, Comparison::GreaterThan, Comparison::EqualTo] {
                let result = dist.calculate_probability(x, comparison);
                let expected = format!(" = {}", result.probability);
                assert!(
                    result.steps.iter().any(|step| step.ends_with(&expected)),
                    "{comparison} {x}: {:?}",
                    result.steps
                );
            }
        }
        let greater = dist.calculate_probability(160.0, Comparison::GreaterThan);
        let last = greater.steps.iter().last().unwrap();
        assert_eq!(last, format!("P(X > 160) = P(Z > 4) = {}", greater.probability));
    }

    #[test]
    fn test_probability_between_swaps_bounds() {
        let dist = NormalDistribution::new(0.0, 1.0).unwrap();
        let forward = dist.calculate_probability_between(-1.0, 1.0);
        let reversed = dist.calculate_probability_between(1.0, -1.0);
        assert_eq!(forward, reversed);
        assert_eq!(reversed.lower, -1.0);
        assert_close(forward.probability, 0.682_689_492_137_085_9, 1e-9);
    }

    #[test]
    fn test_median_percentile_is_mean() {
        for (mu, sigma) in [(0.0, 1.0), (100.0, 15.0), (-3.5, 0.25), (1e4, 250.0)] {
            let dist = NormalDistribution::new(mu, sigma).unwrap();
            let result = dist.find_percentile(50.0).unwrap();
            assert_close(result.x_value, mu, 1e-9 * mu.abs().max(1.0));
        }
    }

    #[test]
    fn test_percentile_bounds() {
        let dist = NormalDistribution::new(0.0, 1.0).unwrap();
        assert_close(dist.find_percentile(97.5).unwrap().x_value, 1.959_964, 1e-6);
        assert!(dist.find_percentile(0.0).is_err());
        assert!(dist.find_percentile(100.0).is_err());
    }

    #[test]
    fn test_critical_values_are_symmetric() {
        let dist = NormalDistribution::new(50.0, 10.0).unwrap();
        let result = dist.find_critical_values(0.95).unwrap();
        assert_close(result.z_critical_lower, -result.z_critical_upper, 1e-9);
        assert_close(result.x_critical_upper - 50.0, 50.0 - result.x_critical_lower, 1e-9);
        assert_close(result.z_critical_upper, 1.959_964, 1e-6);
        assert!(dist.find_critical_values(0.0).is_err());
    }

    #[test]
    fn test_empirical_rule_nests() {
        let dist = NormalDistribution::new(10.0, 2.0).unwrap();
        let rule = dist.empirical_rule();
        assert!(rule.two_std.contains(&rule.one_std));
        assert!(rule.three_std.contains(&rule.two_std));
        assert_eq!((rule.one_std.lower, rule.one_std.upper), (8.0, 12.0));
        assert_eq!((rule.three_std.lower, rule.three_std.upper), (4.0, 16.0));
        assert_eq!(rule.three_std.percentage, 99.7);
        assert_eq!(rule.steps.len(), 5);
    }

    #[test]
    fn test_comparison_parses_fixed_vocabulary() {
        assert_eq!("greater_than".parse::<Comparison>(), Ok(Comparison::GreaterThan));
        assert_eq!(Comparison::EqualTo.to_string(), "equal_to");
        assert!("between".parse::<Comparison>().is_err());
    }
}

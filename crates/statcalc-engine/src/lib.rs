//! Calculation engine for introductory statistics.
//!
//! Every calculator returns a typed result record that carries the numeric
//! answer together with the formula used, an ordered list of derivation
//! steps and a plain-language description. Invalid inputs are rejected with
//! a [`CalcError`] before anything is computed.
//!
//! # Modules
//!
//! - [`descriptive`]: Central tendency, dispersion, position and shape of a dataset
//! - [`normal`]: Z-scores, probabilities and percentiles of a normal distribution
//! - [`confidence`]: Confidence intervals and required sample sizes
//! - [`hypothesis`]: One- and two-sample tests for means and proportions
//! - [`percentiles`]: Linear-interpolation percentiles of sorted data
//!
//! # Examples
//!
//! ## Summarizing a dataset
//!
//! ```
//! use statcalc_engine::descriptive::DescriptiveStats;
//!
//! let stats = DescriptiveStats::new([2.0, 4.0, 4.0, 5.0]).unwrap();
//! let report = stats.calculate_all_stats(None).unwrap();
//! assert_eq!(report.central_tendency.mean.value, 3.75);
//! assert_eq!(report.central_tendency.median.value, 4.0);
//! ```
//!
//! ## Querying a normal distribution
//!
//! ```
//! use statcalc_engine::normal::{Comparison, NormalDistribution};
//!
//! let dist = NormalDistribution::new(100.0, 15.0).unwrap();
//! let result = dist.calculate_probability(100.0, Comparison::LessThan);
//! assert!((result.probability - 0.5).abs() < 1e-12);
//! ```
//!
//! ## Estimating a proportion
//!
//! ```
//! use statcalc_engine::confidence::proportion_confidence_interval;
//!
//! let ci = proportion_confidence_interval(0.6, 100, 0.95).unwrap();
//! assert!(ci.lower_bound() > 0.5 && ci.upper_bound() < 0.7);
//! assert!(ci.warning.is_none());
//! ```
//!
//! ## Testing a hypothesis
//!
//! ```
//! use statcalc_engine::hypothesis::{TailType, one_sample_proportion_test};
//!
//! let result = one_sample_proportion_test(0.62, 200, 0.5, 0.05, TailType::RightTailed).unwrap();
//! assert!(result.outcome.reject_null);
//! println!("{}", result.outcome.conclusion);
//! ```

pub mod confidence;
pub mod descriptive;
pub mod error;
pub mod hypothesis;
pub mod normal;
pub mod percentiles;
pub mod sampling;
pub mod steps;

pub use self::error::CalcError;

#[cfg(test)]
mod test_util {
    #[track_caller]
    pub(crate) fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected} ± {tolerance}, got {actual}"
        );
    }
}

//! Reference distributions for test statistics and interval estimates.
//!
//! The calculators only ever need the standard normal distribution and the
//! standard Student's t distribution. [`SamplingDistribution`] wraps both
//! behind one set of tail queries so the z/t decision is made once, at
//! construction, and the rest of each calculation is shared.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

use crate::error::CalcError;

/// Above this, t quantiles come from the Cornish-Fisher expansion around the
/// normal quantile. `StudentsT::inverse_cdf` loses accuracy and eventually
/// stops converging as the degrees of freedom grow.
const LARGE_DF_QUANTILE: f64 = 1e3;

/// Above this, t tail probabilities come from mapping t onto z
/// (Abramowitz & Stegun 26.7.8) instead of the incomplete beta function.
const LARGE_DF_CDF: f64 = 1e5;

/// Which family a result was computed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum DistributionKind {
    #[display("z")]
    Z,
    #[display("t")]
    T,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum SamplingDistribution {
    StandardNormal(Normal),
    StudentsT {
        dist: StudentsT,
        degrees_of_freedom: f64,
    },
}

impl SamplingDistribution {
    pub(crate) fn standard_normal() -> Self {
        Self::StandardNormal(Normal::standard())
    }

    pub(crate) fn students_t(degrees_of_freedom: f64) -> Result<Self, CalcError> {
        if !(degrees_of_freedom.is_finite() && degrees_of_freedom > 0.0) {
            return Err(CalcError::InvalidDegreesOfFreedom {
                value: degrees_of_freedom,
            });
        }
        let dist = StudentsT::new(0.0, 1.0, degrees_of_freedom).map_err(|_| {
            CalcError::InvalidDegreesOfFreedom {
                value: degrees_of_freedom,
            }
        })?;
        Ok(Self::StudentsT {
            dist,
            degrees_of_freedom,
        })
    }

    pub(crate) fn kind(&self) -> DistributionKind {
        match self {
            Self::StandardNormal(_) => DistributionKind::Z,
            Self::StudentsT { .. } => DistributionKind::T,
        }
    }

    pub(crate) fn degrees_of_freedom(&self) -> Option<f64> {
        match self {
            Self::StandardNormal(_) => None,
            Self::StudentsT {
                degrees_of_freedom, ..
            } => Some(*degrees_of_freedom),
        }
    }

    /// `P(T <= x)`
    pub(crate) fn cdf(&self, x: f64) -> f64 {
        match self {
            Self::StandardNormal(dist) => dist.cdf(x),
            Self::StudentsT {
                degrees_of_freedom: df,
                ..
            } if *df > LARGE_DF_CDF => Normal::standard().cdf(t_to_z(x, *df)),
            Self::StudentsT { dist, .. } => dist.cdf(x),
        }
    }

    /// `P(T > x)`, computed directly rather than as `1 - cdf(x)`.
    pub(crate) fn sf(&self, x: f64) -> f64 {
        match self {
            Self::StandardNormal(dist) => dist.sf(x),
            Self::StudentsT {
                degrees_of_freedom: df,
                ..
            } if *df > LARGE_DF_CDF => Normal::standard().sf(t_to_z(x, *df)),
            Self::StudentsT { dist, .. } => dist.sf(x),
        }
    }

    pub(crate) fn quantile(&self, p: f64) -> f64 {
        match self {
            Self::StandardNormal(dist) => dist.inverse_cdf(p),
            Self::StudentsT {
                degrees_of_freedom: df,
                ..
            } if *df > LARGE_DF_QUANTILE => {
                cornish_fisher_t(Normal::standard().inverse_cdf(p), *df)
            }
            Self::StudentsT { dist, .. } => dist.inverse_cdf(p),
        }
    }

    /// Upper critical value for a two-sided interval at `confidence_level`.
    pub(crate) fn two_sided_critical(&self, confidence_level: f64) -> f64 {
        let alpha = 1.0 - confidence_level;
        self.quantile(1.0 - alpha / 2.0)
    }
}

/// Fourth-order Cornish-Fisher expansion of the t quantile in powers of `1/df`.
fn cornish_fisher_t(z: f64, df: f64) -> f64 {
    let z2 = z * z;
    let g1 = (z2 + 1.0) * z / 4.0;
    let g2 = ((5.0 * z2 + 16.0) * z2 + 3.0) * z / 96.0;
    let g3 = (((3.0 * z2 + 19.0) * z2 + 17.0) * z2 - 15.0) * z / 384.0;
    let g4 = ((((79.0 * z2 + 776.0) * z2 + 1482.0) * z2 - 1920.0) * z2 - 945.0) * z / 92160.0;
    z + (g1 + (g2 + (g3 + g4 / df) / df) / df) / df
}

/// Normal deviate with approximately the same tail probability as `t`.
fn t_to_z(t: f64, df: f64) -> f64 {
    t * (1.0 - 1.0 / (4.0 * df)) / (1.0 + t * t / (2.0 * df)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::assert_close;

    #[test]
    fn test_standard_normal_landmarks() {
        let z = SamplingDistribution::standard_normal();
        assert_close(z.cdf(0.0), 0.5, 1e-12);
        assert_close(z.two_sided_critical(0.95), 1.959_963_984_540_054, 1e-9);
        assert_close(z.sf(2.0) * 2.0, 0.045_500_263_896_358_4, 1e-9);
        assert_eq!(z.kind(), DistributionKind::Z);
        assert_eq!(z.degrees_of_freedom(), None);
    }

    #[test]
    fn test_students_t_critical_values() {
        let t = SamplingDistribution::students_t(9.0).unwrap();
        assert_close(t.two_sided_critical(0.95), 2.262_157_162_740_992, 1e-6);
        assert_close(t.quantile(0.5), 0.0, 1e-9);
        assert_eq!(t.degrees_of_freedom(), Some(9.0));
    }

    #[test]
    fn test_students_t_accepts_fractional_degrees_of_freedom() {
        let t = SamplingDistribution::students_t(17.5).unwrap();
        let lower = SamplingDistribution::students_t(17.0).unwrap();
        let upper = SamplingDistribution::students_t(18.0).unwrap();
        let q = t.quantile(0.975);
        assert!(q < lower.quantile(0.975));
        assert!(q > upper.quantile(0.975));
    }

    #[test]
    fn test_students_t_quantile_at_large_degrees_of_freedom() {
        let cases = [
            (1_001.0, 1.962_336_705_280_880),
            (1e6, 1.959_966_356_814_107),
            (1e7, 1.959_964_221_767_205),
            (4e9, 1.959_963_985_133_122),
            (2.0 * f64::from(u32::MAX), 1.959_963_984_816_223),
        ];
        for (df, expected) in cases {
            let t = SamplingDistribution::students_t(df).unwrap();
            assert_close(t.two_sided_critical(0.95), expected, 1e-9);
        }

        let t = SamplingDistribution::students_t(1e6).unwrap();
        assert_close(t.quantile(0.995), 2.575_834_220_105_334, 1e-9);
        assert_close(t.quantile(0.005), -2.575_834_220_105_334, 1e-9);
    }

    #[test]
    fn test_students_t_tails_at_large_degrees_of_freedom() {
        let t = SamplingDistribution::students_t(1e6).unwrap();
        assert_close(t.sf(2.0), 0.022_750_266_925_659_6, 1e-11);
        assert_close(t.cdf(-2.0), 0.022_750_266_925_659_6, 1e-11);
        assert_close(t.cdf(1.0), 1.0 - 0.158_655_374_916_789, 1e-11);

        let huge = SamplingDistribution::students_t(4e9).unwrap();
        let q = huge.quantile(0.975);
        assert_close(huge.sf(q), 0.025, 1e-12);
    }

    #[test]
    fn test_students_t_rejects_non_positive_degrees_of_freedom() {
        assert!(matches!(
            SamplingDistribution::students_t(0.0),
            Err(CalcError::InvalidDegreesOfFreedom { .. })
        ));
        assert!(SamplingDistribution::students_t(f64::NAN).is_err());
    }
}

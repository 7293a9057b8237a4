/// Precondition violations reported by the calculators.
///
/// Every operation validates its inputs before computing anything, so an
/// `Err` never comes with a partially built result.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum CalcError {
    #[display("dataset must contain at least one value")]
    EmptyDataset,
    #[display("dataset value at index {index} is not a finite number")]
    NonFiniteValue { index: usize },
    #[display("at least {required} values are required, but the dataset has {actual}")]
    InsufficientData { required: usize, actual: usize },
    #[display("{name} must be a finite number, got {value}")]
    NonFiniteParameter { name: &'static str, value: f64 },
    #[display("{name} must be positive, got {value}")]
    NonPositiveParameter { name: &'static str, value: f64 },
    #[display("percentile must be strictly between 0 and 100, got {value}")]
    PercentileOutOfRange { value: f64 },
    #[display("confidence level must be strictly between 0 and 1, got {value}")]
    ConfidenceLevelOutOfRange { value: f64 },
    #[display("significance level must be strictly between 0 and 1, got {value}")]
    AlphaOutOfRange { value: f64 },
    #[display("{name} must be between 0 and 1, got {value}")]
    ProportionOutOfRange { name: &'static str, value: f64 },
    #[display("{name} must be at least {min}, got {value}")]
    SampleSizeTooSmall {
        name: &'static str,
        min: u32,
        value: u32,
    },
    #[display("successes ({successes}) cannot exceed the sample size ({sample_size})")]
    SuccessesExceedSampleSize { successes: u32, sample_size: u32 },
    #[display("either the population or the sample standard deviation must be provided")]
    MissingStandardDeviation,
    #[display("only one of the population or the sample standard deviation may be provided")]
    ConflictingStandardDeviation,
    #[display("degrees of freedom must be positive, got {value}")]
    InvalidDegreesOfFreedom { value: f64 },
    #[display("standard error is zero; the test statistic is undefined")]
    ZeroStandardError,
    #[display("unknown {kind} '{value}' (expected one of: {expected})")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },
}

pub(crate) fn finite(name: &'static str, value: f64) -> Result<f64, CalcError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::NonFiniteParameter { name, value })
    }
}

pub(crate) fn positive(name: &'static str, value: f64) -> Result<f64, CalcError> {
    if finite(name, value)? > 0.0 {
        Ok(value)
    } else {
        Err(CalcError::NonPositiveParameter { name, value })
    }
}

pub(crate) fn confidence_level(value: f64) -> Result<f64, CalcError> {
    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(CalcError::ConfidenceLevelOutOfRange { value })
    }
}

pub(crate) fn alpha(value: f64) -> Result<f64, CalcError> {
    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(CalcError::AlphaOutOfRange { value })
    }
}

pub(crate) fn percentile(value: f64) -> Result<f64, CalcError> {
    if value > 0.0 && value < 100.0 {
        Ok(value)
    } else {
        Err(CalcError::PercentileOutOfRange { value })
    }
}

/// Accepts proportions in the closed interval `[0, 1]`.
pub(crate) fn proportion(name: &'static str, value: f64) -> Result<f64, CalcError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(CalcError::ProportionOutOfRange { name, value })
    }
}

/// Accepts proportions in the open interval `(0, 1)`.
pub(crate) fn open_proportion(name: &'static str, value: f64) -> Result<f64, CalcError> {
    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(CalcError::ProportionOutOfRange { name, value })
    }
}

pub(crate) fn sample_size(name: &'static str, value: u32, min: u32) -> Result<u32, CalcError> {
    if value >= min {
        Ok(value)
    } else {
        Err(CalcError::SampleSizeTooSmall { name, min, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_interval_checks() {
        assert!(confidence_level(0.95).is_ok());
        assert_eq!(
            confidence_level(1.0),
            Err(CalcError::ConfidenceLevelOutOfRange { value: 1.0 })
        );
        assert!(alpha(0.0).is_err());
        assert!(percentile(100.0).is_err());
        assert!(percentile(0.5).is_ok());
    }

    #[test]
    fn test_positive_rejects_nan_as_non_finite() {
        assert!(matches!(
            positive("std_dev", f64::NAN),
            Err(CalcError::NonFiniteParameter { name: "std_dev", .. })
        ));
        assert!(matches!(
            positive("std_dev", 0.0),
            Err(CalcError::NonPositiveParameter { .. })
        ));
    }

    #[test]
    fn test_display_messages() {
        let err = CalcError::SampleSizeTooSmall {
            name: "sample size",
            min: 2,
            value: 1,
        };
        assert_eq!(err.to_string(), "sample size must be at least 2, got 1");
    }
}

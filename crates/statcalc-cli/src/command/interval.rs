use anyhow::Context as _;
use clap::{Args, Subcommand};
use statcalc_engine::confidence::{self, StdDevSource};

use crate::settings::Settings;

#[derive(Debug, Clone, Args)]
pub(crate) struct IntervalArg {
    #[command(subcommand)]
    pub kind: IntervalKind,
}

#[derive(Debug, Clone, Subcommand)]
pub(crate) enum IntervalKind {
    /// Confidence interval for a population mean
    Mean {
        /// Sample mean (x̄)
        #[arg(long, allow_negative_numbers = true)]
        sample_mean: f64,
        /// Sample size (n)
        #[arg(long)]
        sample_size: u32,
        #[arg(long, default_value_t = 0.95)]
        confidence_level: f64,
        /// Known population standard deviation (σ); selects the z distribution
        #[arg(long, conflicts_with = "sample_std")]
        population_std: Option<f64>,
        /// Sample standard deviation (s); selects the t distribution
        #[arg(long)]
        sample_std: Option<f64>,
    },
    /// Confidence interval for a population proportion
    Proportion {
        /// Sample proportion (p̂)
        #[arg(long)]
        sample_proportion: f64,
        #[arg(long)]
        sample_size: u32,
        #[arg(long, default_value_t = 0.95)]
        confidence_level: f64,
    },
    /// Sample size needed to estimate a mean
    SampleSizeMean {
        #[arg(long)]
        margin_error: f64,
        #[arg(long, default_value_t = 0.95)]
        confidence_level: f64,
        #[arg(long)]
        population_std: f64,
    },
    /// Sample size needed to estimate a proportion
    SampleSizeProportion {
        #[arg(long)]
        margin_error: f64,
        #[arg(long, default_value_t = 0.95)]
        confidence_level: f64,
        /// Prior estimate of the proportion; 0.5 is assumed when omitted
        #[arg(long)]
        estimated_proportion: Option<f64>,
    },
}

pub(crate) fn run(arg: &IntervalArg, settings: &Settings) -> anyhow::Result<()> {
    match arg.kind {
        IntervalKind::Mean {
            sample_mean,
            sample_size,
            confidence_level,
            population_std,
            sample_std,
        } => {
            let std_dev = StdDevSource::from_options(population_std, sample_std)?;
            let result = confidence::mean_confidence_interval(
                sample_mean,
                sample_size,
                confidence_level,
                std_dev,
            )
            .context("Failed to compute mean confidence interval")?;
            super::emit(settings, &result)
        }
        IntervalKind::Proportion {
            sample_proportion,
            sample_size,
            confidence_level,
        } => {
            let result = confidence::proportion_confidence_interval(
                sample_proportion,
                sample_size,
                confidence_level,
            )
            .context("Failed to compute proportion confidence interval")?;
            super::emit(settings, &result)
        }
        IntervalKind::SampleSizeMean {
            margin_error,
            confidence_level,
            population_std,
        } => {
            let result =
                confidence::sample_size_for_mean(margin_error, confidence_level, population_std)
                    .context("Failed to compute sample size for mean")?;
            super::emit(settings, &result)
        }
        IntervalKind::SampleSizeProportion {
            margin_error,
            confidence_level,
            estimated_proportion,
        } => {
            let result = confidence::sample_size_for_proportion(
                margin_error,
                confidence_level,
                estimated_proportion,
            )
            .context("Failed to compute sample size for proportion")?;
            super::emit(settings, &result)
        }
    }
}

use anyhow::Context as _;
use clap::{Args, Subcommand};
use statcalc_engine::{
    confidence::StdDevSource,
    hypothesis::{self, TailType, TwoSampleSummary},
};

use crate::settings::Settings;

#[derive(Debug, Clone, Args)]
pub(crate) struct TestArg {
    #[command(subcommand)]
    pub kind: TestKind,
}

/// Significance level and direction shared by every test.
#[derive(Debug, Clone, Copy, Args)]
pub(crate) struct TestOptions {
    /// Significance level (α)
    #[arg(long, default_value_t = 0.05)]
    pub alpha: f64,

    /// two-tailed, left-tailed or right-tailed
    #[arg(long, default_value_t = TailType::TwoTailed)]
    pub tail: TailType,
}

#[derive(Debug, Clone, Subcommand)]
pub(crate) enum TestKind {
    /// One-sample test for a population mean
    Mean {
        #[arg(long, allow_negative_numbers = true)]
        sample_mean: f64,
        #[arg(long)]
        sample_size: u32,
        /// Hypothesized population mean (μ₀)
        #[arg(long, allow_negative_numbers = true)]
        null_mean: f64,
        /// Known population standard deviation (σ); selects the z-test
        #[arg(long, conflicts_with = "sample_std")]
        population_std: Option<f64>,
        /// Sample standard deviation (s); selects the t-test
        #[arg(long)]
        sample_std: Option<f64>,
        #[command(flatten)]
        options: TestOptions,
    },
    /// One-sample test for a population proportion
    Proportion {
        #[arg(long)]
        sample_proportion: f64,
        #[arg(long)]
        sample_size: u32,
        /// Hypothesized population proportion (p₀)
        #[arg(long)]
        null_proportion: f64,
        #[command(flatten)]
        options: TestOptions,
    },
    /// Two-sample t-test for a difference in means
    TwoMean {
        #[arg(long, allow_negative_numbers = true)]
        mean1: f64,
        #[arg(long)]
        size1: u32,
        #[arg(long)]
        std1: f64,
        #[arg(long, allow_negative_numbers = true)]
        mean2: f64,
        #[arg(long)]
        size2: u32,
        #[arg(long)]
        std2: f64,
        /// Use Welch's test instead of pooling the variances
        #[arg(long)]
        unequal_variances: bool,
        #[command(flatten)]
        options: TestOptions,
    },
    /// Two-sample z-test for a difference in proportions
    TwoProportion {
        #[arg(long)]
        successes1: u32,
        #[arg(long)]
        size1: u32,
        #[arg(long)]
        successes2: u32,
        #[arg(long)]
        size2: u32,
        #[command(flatten)]
        options: TestOptions,
    },
}

pub(crate) fn run(arg: &TestArg, settings: &Settings) -> anyhow::Result<()> {
    match arg.kind {
        TestKind::Mean {
            sample_mean,
            sample_size,
            null_mean,
            population_std,
            sample_std,
            options,
        } => {
            let std_dev = StdDevSource::from_options(population_std, sample_std)?;
            let result = hypothesis::one_sample_mean_test(
                sample_mean,
                sample_size,
                null_mean,
                options.alpha,
                options.tail,
                std_dev,
            )
            .context("Failed to run one-sample mean test")?;
            super::emit(settings, &result)
        }
        TestKind::Proportion {
            sample_proportion,
            sample_size,
            null_proportion,
            options,
        } => {
            let result = hypothesis::one_sample_proportion_test(
                sample_proportion,
                sample_size,
                null_proportion,
                options.alpha,
                options.tail,
            )
            .context("Failed to run one-sample proportion test")?;
            super::emit(settings, &result)
        }
        TestKind::TwoMean {
            mean1,
            size1,
            std1,
            mean2,
            size2,
            std2,
            unequal_variances,
            options,
        } => {
            let result = hypothesis::two_sample_mean_test(
                TwoSampleSummary::new(mean1, size1, std1),
                TwoSampleSummary::new(mean2, size2, std2),
                options.alpha,
                options.tail,
                !unequal_variances,
            )
            .context("Failed to run two-sample mean test")?;
            super::emit(settings, &result)
        }
        TestKind::TwoProportion {
            successes1,
            size1,
            successes2,
            size2,
            options,
        } => {
            let result = hypothesis::two_sample_proportion_test(
                successes1,
                size1,
                successes2,
                size2,
                options.alpha,
                options.tail,
            )
            .context("Failed to run two-sample proportion test")?;
            super::emit(settings, &result)
        }
    }
}

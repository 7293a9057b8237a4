use anyhow::Context as _;
use clap::{Args, Subcommand};
use log::debug;
use statcalc_engine::normal::{Comparison, NormalDistribution};

use crate::settings::Settings;

#[derive(Debug, Clone, Args)]
pub(crate) struct NormalArg {
    /// Mean of the distribution (μ)
    #[arg(long, allow_negative_numbers = true)]
    pub mean: f64,

    /// Standard deviation of the distribution (σ)
    #[arg(long)]
    pub std_dev: f64,

    #[command(subcommand)]
    pub query: NormalQuery,
}

#[derive(Debug, Clone, Subcommand)]
pub(crate) enum NormalQuery {
    /// Standardize an x-value
    ZScore {
        #[arg(allow_negative_numbers = true)]
        x: f64,
    },
    /// Probability of a single tail
    Probability {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(long, default_value_t = Comparison::LessThan)]
        comparison: Comparison,
    },
    /// Probability between two values
    Between {
        #[arg(allow_negative_numbers = true)]
        x1: f64,
        #[arg(allow_negative_numbers = true)]
        x2: f64,
    },
    /// Value at a percentile (exclusive range 0-100)
    Percentile { percentile: f64 },
    /// Symmetric critical values for a confidence level
    Critical {
        #[arg(default_value_t = 0.95)]
        confidence_level: f64,
    },
    /// Bounds of the 68-95-99.7 rule
    Empirical,
}

pub(crate) fn run(arg: &NormalArg, settings: &Settings) -> anyhow::Result<()> {
    let dist = NormalDistribution::new(arg.mean, arg.std_dev)
        .context("Invalid normal distribution parameters")?;
    debug!("querying {dist}: {:?}", arg.query);

    match arg.query {
        NormalQuery::ZScore { x } => super::emit(settings, &dist.calculate_z_score(x)),
        NormalQuery::Probability { x, comparison } => {
            super::emit(settings, &dist.calculate_probability(x, comparison))
        }
        NormalQuery::Between { x1, x2 } => {
            super::emit(settings, &dist.calculate_probability_between(x1, x2))
        }
        NormalQuery::Percentile { percentile } => {
            let result = dist
                .find_percentile(percentile)
                .context("Failed to find percentile")?;
            super::emit(settings, &result)
        }
        NormalQuery::Critical { confidence_level } => {
            let result = dist
                .find_critical_values(confidence_level)
                .context("Failed to find critical values")?;
            super::emit(settings, &result)
        }
        NormalQuery::Empirical => super::emit(settings, &dist.empirical_rule()),
    }
}

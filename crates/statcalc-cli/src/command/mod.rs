use std::io::Write as _;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use log::debug;
use serde::Serialize;

use crate::{
    render::{Render, TextRenderer},
    settings::{Settings, SettingsArg},
    util::Output,
};

use self::{
    describe::DescribeArg, hypothesis::TestArg, interval::IntervalArg, normal::NormalArg,
};

mod describe;
mod hypothesis;
mod interactive;
mod interval;
mod normal;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(flatten)]
    settings: SettingsArg,

    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Descriptive statistics of a dataset
    Describe(#[clap(flatten)] DescribeArg),
    /// Queries against a normal distribution
    Normal(#[clap(flatten)] NormalArg),
    /// Confidence intervals and sample size planning
    Interval(#[clap(flatten)] IntervalArg),
    /// Hypothesis tests for means and proportions
    Test(#[clap(flatten)] TestArg),
    /// Menu-driven console (default)
    Interactive,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logger(args.settings.verbose);
    let settings = Settings::from(&args.settings);
    debug!("settings: {settings:?}");

    match args.mode.unwrap_or(Mode::Interactive) {
        Mode::Describe(arg) => describe::run(&arg, &settings)?,
        Mode::Normal(arg) => normal::run(&arg, &settings)?,
        Mode::Interval(arg) => interval::run(&arg, &settings)?,
        Mode::Test(arg) => hypothesis::run(&arg, &settings)?,
        Mode::Interactive => interactive::run(settings)?,
    }
    Ok(())
}

fn init_logger(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

/// Writes a one-shot result as text or JSON to the configured destination.
fn emit<T>(settings: &Settings, result: &T) -> anyhow::Result<()>
where
    T: Serialize + Render,
{
    let mut output = Output::from_output_path(settings.output.clone())?;
    debug!("writing result to {}", output.display_path());
    if settings.json {
        return output.write_json(result, settings.decimals);
    }
    result
        .render(&mut TextRenderer::new(&mut output, settings.decimals))
        .with_context(|| format!("Failed to write result to {}", output.display_path()))?;
    output
        .flush()
        .with_context(|| format!("Failed to flush output to {}", output.display_path()))?;
    Ok(())
}

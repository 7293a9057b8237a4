//! Menu-driven console reading answers line by line.

use std::io::{self, BufRead, Write};

use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use log::debug;
use statcalc_engine::{
    CalcError,
    confidence::{self, StdDevSource},
    hypothesis::{self, TailType, TwoSampleSummary},
    normal::{Comparison, NormalDistribution},
};

use crate::{
    render::{Render, TextRenderer},
    settings::{MAX_DECIMALS, Settings},
};

use super::describe::DescribeOutput;

const HEADER_WIDTH: usize = 70;
const MENU_WIDTH: usize = 40;
const MIN_DATASET_LEN: usize = 2;

/// Dataset entry that is not a finite number.
#[derive(Debug, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("'{item}' is not a finite number")]
pub(crate) struct InvalidDatasetItem {
    item: String,
}

/// Raised when the input stream closes in the middle of a prompt.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("input stream closed")]
struct EndOfInput;

pub(crate) fn run(settings: Settings) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    Console::new(stdin.lock(), stdout.lock(), settings).run()
}

pub(crate) struct Console<R, W> {
    input: R,
    output: W,
    settings: Settings,
}

impl<R, W> Console<R, W>
where
    R: BufRead,
    W: Write,
{
    pub(crate) fn new(input: R, output: W, settings: Settings) -> Self {
        Self {
            input,
            output,
            settings,
        }
    }

    /// Runs the main menu until the user exits or the input closes.
    pub(crate) fn run(&mut self) -> anyhow::Result<()> {
        match self.main_menu() {
            Err(e) if e.is::<EndOfInput>() => {
                debug!("input closed, leaving interactive console");
                writeln!(self.output)?;
                Ok(())
            }
            result => result,
        }
    }

    fn main_menu(&mut self) -> anyhow::Result<()> {
        loop {
            self.clear_screen()?;
            self.header()?;
            writeln!(self.output, "\nSELECT ANALYSIS TYPE:")?;
            self.options(&[
                "Descriptive Statistics",
                "Normal Distribution",
                "Confidence Intervals",
                "Hypothesis Testing",
                "Settings (Decimal Places)",
                "Exit",
            ])?;

            match self.read_line("\nEnter your choice (1-6): ")?.as_str() {
                "1" => self.descriptive_menu()?,
                "2" => self.normal_menu()?,
                "3" => self.interval_menu()?,
                "4" => self.hypothesis_menu()?,
                "5" => self.settings_menu()?,
                "6" => {
                    writeln!(self.output, "\nThank you for using Statistics Calculator!")?;
                    return Ok(());
                }
                _ => {
                    writeln!(self.output, "\nInvalid choice. Please try again.")?;
                    self.pause()?;
                }
            }
        }
    }

    fn descriptive_menu(&mut self) -> anyhow::Result<()> {
        self.menu_title("DESCRIPTIVE STATISTICS")?;
        let data = self.dataset()?;
        let custom_percentile = if self.yes_no("Calculate a custom percentile? (y/n): ")? {
            Some(self.percentile()?)
        } else {
            None
        };
        let standard_error_level = if self.yes_no("Include standard error analysis? (y/n): ")? {
            Some(self.float("Enter confidence level (0-1, default 0.95): ", Some(0.95))?)
        } else {
            None
        };
        self.show(DescribeOutput::compute(
            data,
            custom_percentile,
            standard_error_level,
        ))
    }

    fn normal_menu(&mut self) -> anyhow::Result<()> {
        self.menu_title("NORMAL DISTRIBUTION")?;
        let mean = self.float("Enter mean (μ): ", None)?;
        let std_dev = self.positive_float("Enter standard deviation (σ): ")?;
        let dist = match NormalDistribution::new(mean, std_dev) {
            Ok(dist) => dist,
            Err(e) => return self.show_error(&e),
        };

        writeln!(self.output, "\nSelect calculation type:")?;
        self.options(&[
            "Z-Score Calculation",
            "Probability Calculation",
            "Probability Between Values",
            "Find Percentile Value",
            "Critical Values",
            "Empirical Rule (68-95-99.7)",
        ])?;

        match self.read_line("\nEnter choice (1-6): ")?.as_str() {
            "1" => {
                let x = self.float("Enter x-value: ", None)?;
                self.show(Ok(dist.calculate_z_score(x)))
            }
            "2" => {
                let x = self.float("Enter x-value: ", None)?;
                let comparison = self.comparison()?;
                self.show(Ok(dist.calculate_probability(x, comparison)))
            }
            "3" => {
                let x1 = self.float("Enter lower bound (x1): ", None)?;
                let x2 = self.float("Enter upper bound (x2): ", None)?;
                self.show(Ok(dist.calculate_probability_between(x1, x2)))
            }
            "4" => {
                let percentile = self.percentile()?;
                self.show(dist.find_percentile(percentile))
            }
            "5" => {
                let confidence_level = self.confidence_level()?;
                self.show(dist.find_critical_values(confidence_level))
            }
            "6" => self.show(Ok(dist.empirical_rule())),
            _ => self.invalid_choice(),
        }
    }

    fn interval_menu(&mut self) -> anyhow::Result<()> {
        self.menu_title("CONFIDENCE INTERVALS")?;
        writeln!(self.output, "Select interval type:")?;
        self.options(&[
            "Mean Confidence Interval",
            "Proportion Confidence Interval",
            "Sample Size for Mean",
            "Sample Size for Proportion",
        ])?;

        match self.read_line("\nEnter choice (1-4): ")?.as_str() {
            "1" => {
                let sample_mean = self.float("Enter sample mean (x̄): ", None)?;
                let sample_size = self.positive_int("Enter sample size (n): ")?;
                let confidence_level = self.confidence_level()?;
                let std_dev = self.std_dev_source()?;
                self.show(confidence::mean_confidence_interval(
                    sample_mean,
                    sample_size,
                    confidence_level,
                    std_dev,
                ))
            }
            "2" => {
                let sample_proportion = self.proportion("Enter sample proportion (p̂): ")?;
                let sample_size = self.positive_int("Enter sample size (n): ")?;
                let confidence_level = self.confidence_level()?;
                self.show(confidence::proportion_confidence_interval(
                    sample_proportion,
                    sample_size,
                    confidence_level,
                ))
            }
            "3" => {
                let margin_error = self.positive_float("Enter desired margin of error: ")?;
                let confidence_level = self.confidence_level()?;
                let population_std =
                    self.positive_float("Enter population standard deviation (σ): ")?;
                self.show(confidence::sample_size_for_mean(
                    margin_error,
                    confidence_level,
                    population_std,
                ))
            }
            "4" => {
                let margin_error = self.positive_float("Enter desired margin of error: ")?;
                let confidence_level = self.confidence_level()?;
                let estimated = if self.yes_no("Do you have a prior proportion estimate? (y/n): ")?
                {
                    Some(self.proportion("Enter estimated proportion: ")?)
                } else {
                    None
                };
                self.show(confidence::sample_size_for_proportion(
                    margin_error,
                    confidence_level,
                    estimated,
                ))
            }
            _ => self.invalid_choice(),
        }
    }

    fn hypothesis_menu(&mut self) -> anyhow::Result<()> {
        self.menu_title("HYPOTHESIS TESTING")?;
        writeln!(self.output, "Select test type:")?;
        self.options(&[
            "One-Sample Mean Test",
            "One-Sample Proportion Test",
            "Two-Sample Mean Test",
            "Two-Sample Proportion Test",
        ])?;

        let choice = self.read_line("\nEnter choice (1-4): ")?;
        if !matches!(choice.as_str(), "1" | "2" | "3" | "4") {
            return self.invalid_choice();
        }
        let alpha = self.alpha()?;
        let tail = self.tail()?;

        match choice.as_str() {
            "1" => {
                let sample_mean = self.float("Enter sample mean (x̄): ", None)?;
                let sample_size = self.positive_int("Enter sample size (n): ")?;
                let null_mean = self.float("Enter null hypothesis mean (μ₀): ", None)?;
                let std_dev = self.std_dev_source()?;
                self.show(hypothesis::one_sample_mean_test(
                    sample_mean,
                    sample_size,
                    null_mean,
                    alpha,
                    tail,
                    std_dev,
                ))
            }
            "2" => {
                let sample_proportion = self.proportion("Enter sample proportion (p̂): ")?;
                let sample_size = self.positive_int("Enter sample size (n): ")?;
                let null_proportion = self.proportion("Enter null hypothesis proportion (p₀): ")?;
                self.show(hypothesis::one_sample_proportion_test(
                    sample_proportion,
                    sample_size,
                    null_proportion,
                    alpha,
                    tail,
                ))
            }
            "3" => {
                let sample1 = self.sample_summary(1)?;
                let sample2 = self.sample_summary(2)?;
                let equal_variances = self.yes_no("Assume equal variances? (y/n): ")?;
                self.show(hypothesis::two_sample_mean_test(
                    sample1,
                    sample2,
                    alpha,
                    tail,
                    equal_variances,
                ))
            }
            _ => {
                writeln!(self.output, "\nSample 1:")?;
                let successes1 = self.count("Enter sample 1 successes: ")?;
                let size1 = self.positive_int("Enter sample 1 size (n₁): ")?;
                writeln!(self.output, "\nSample 2:")?;
                let successes2 = self.count("Enter sample 2 successes: ")?;
                let size2 = self.positive_int("Enter sample 2 size (n₂): ")?;
                self.show(hypothesis::two_sample_proportion_test(
                    successes1, size1, successes2, size2, alpha, tail,
                ))
            }
        }
    }

    fn settings_menu(&mut self) -> anyhow::Result<()> {
        self.menu_title("SETTINGS")?;
        writeln!(
            self.output,
            "Current decimal places: {}",
            self.settings.decimals
        )?;
        let prompt = format!("Enter new decimal places (0-{MAX_DECIMALS}): ");
        if let Some(decimals) = self.int_in_range(&prompt, 0, MAX_DECIMALS)? {
            self.settings.decimals = decimals;
            debug!("decimal places set to {decimals}");
            writeln!(self.output, "Decimal places updated to {decimals}")?;
        }
        self.pause()
    }

    fn sample_summary(&mut self, index: u8) -> anyhow::Result<TwoSampleSummary> {
        let sub = if index == 1 { '₁' } else { '₂' };
        writeln!(self.output, "\nSample {index}:")?;
        let mean = self.float(&format!("Enter sample {index} mean (x̄{sub}): "), None)?;
        let size = self.positive_int(&format!("Enter sample {index} size (n{sub}): "))?;
        let std_dev = self.positive_float(&format!("Enter sample {index} std dev (s{sub}): "))?;
        Ok(TwoSampleSummary::new(mean, size, std_dev))
    }

    fn std_dev_source(&mut self) -> anyhow::Result<StdDevSource> {
        if self.yes_no("Do you know the population standard deviation? (y/n): ")? {
            let sigma = self.positive_float("Enter population standard deviation (σ): ")?;
            Ok(StdDevSource::KnownPopulation(sigma))
        } else {
            let s = self.positive_float("Enter sample standard deviation (s): ")?;
            Ok(StdDevSource::SampleEstimate(s))
        }
    }

    fn show<T: Render>(&mut self, result: Result<T, CalcError>) -> anyhow::Result<()> {
        match result {
            Ok(result) => {
                self.clear_screen()?;
                result.render(&mut TextRenderer::new(
                    &mut self.output,
                    self.settings.decimals,
                ))?;
                self.pause()
            }
            Err(e) => self.show_error(&e),
        }
    }

    fn show_error(&mut self, error: &CalcError) -> anyhow::Result<()> {
        debug!("calculation rejected: {error:?}");
        writeln!(self.output, "\nError: {error}")?;
        self.pause()
    }

    fn invalid_choice(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "Invalid choice.")?;
        self.pause()
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        if self.settings.clear_screen {
            execute!(self.output, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        Ok(())
    }

    fn header(&mut self) -> io::Result<()> {
        writeln!(self.output, "{}", "=".repeat(HEADER_WIDTH))?;
        writeln!(self.output, "           STATISTICS CALCULATOR CONSOLE")?;
        writeln!(
            self.output,
            "     Comprehensive Statistical Analysis with Step-by-Step Solutions"
        )?;
        writeln!(self.output, "{}", "=".repeat(HEADER_WIDTH))?;
        writeln!(
            self.output,
            "Current decimal places: {}",
            self.settings.decimals
        )?;
        writeln!(self.output, "{}", "-".repeat(HEADER_WIDTH))
    }

    fn menu_title(&mut self, title: &str) -> io::Result<()> {
        self.clear_screen()?;
        self.header()?;
        writeln!(self.output, "\n{title}")?;
        writeln!(self.output, "{}", "-".repeat(MENU_WIDTH))
    }

    fn options(&mut self, options: &[&str]) -> io::Result<()> {
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "{}. {option}", i + 1)?;
        }
        Ok(())
    }

    fn pause(&mut self) -> anyhow::Result<()> {
        self.read_line("\nPress Enter to continue...")?;
        Ok(())
    }

    fn read_line(&mut self, prompt: &str) -> anyhow::Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(EndOfInput.into());
        }
        Ok(line.trim().to_owned())
    }

    /// Prompts until `parse` accepts the trimmed answer.
    fn prompt<T>(
        &mut self,
        prompt: &str,
        mut parse: impl FnMut(&str) -> Result<T, &'static str>,
    ) -> anyhow::Result<T> {
        loop {
            let line = self.read_line(prompt)?;
            match parse(&line) {
                Ok(value) => return Ok(value),
                Err(message) => writeln!(self.output, "{message}")?,
            }
        }
    }

    fn float(&mut self, prompt: &str, default: Option<f64>) -> anyhow::Result<f64> {
        self.prompt(prompt, |line| match (line, default) {
            ("", Some(default)) => Ok(default),
            _ => parse_finite(line).ok_or("Please enter a valid number."),
        })
    }

    fn bounded_float(
        &mut self,
        prompt: &str,
        accept: impl Fn(f64) -> bool,
        message: &'static str,
    ) -> anyhow::Result<f64> {
        self.prompt(prompt, |line| {
            let value = parse_finite(line).ok_or("Please enter a valid number.")?;
            if accept(value) { Ok(value) } else { Err(message) }
        })
    }

    fn positive_float(&mut self, prompt: &str) -> anyhow::Result<f64> {
        self.bounded_float(prompt, |v| v > 0.0, "Please enter a positive number.")
    }

    fn proportion(&mut self, prompt: &str) -> anyhow::Result<f64> {
        self.bounded_float(
            prompt,
            |v| (0.0..=1.0).contains(&v),
            "Proportion must be between 0 and 1.",
        )
    }

    fn percentile(&mut self) -> anyhow::Result<f64> {
        self.bounded_float(
            "Enter percentile (0-100): ",
            |v| v > 0.0 && v < 100.0,
            "Percentile must be between 0 and 100 (exclusive).",
        )
    }

    fn confidence_level(&mut self) -> anyhow::Result<f64> {
        writeln!(self.output, "\nCommon confidence levels:")?;
        writeln!(self.output, "  90% = 0.90")?;
        writeln!(self.output, "  95% = 0.95")?;
        writeln!(self.output, "  99% = 0.99")?;
        self.bounded_float(
            "Enter confidence level (0-1): ",
            |v| v > 0.0 && v < 1.0,
            "Confidence level must be between 0 and 1.",
        )
    }

    fn alpha(&mut self) -> anyhow::Result<f64> {
        writeln!(self.output, "\nCommon significance levels:")?;
        writeln!(self.output, "  α = 0.01 (99% confidence)")?;
        writeln!(self.output, "  α = 0.05 (95% confidence)")?;
        writeln!(self.output, "  α = 0.10 (90% confidence)")?;
        self.bounded_float(
            "Enter significance level α (0-1): ",
            |v| v > 0.0 && v < 1.0,
            "Significance level must be between 0 and 1.",
        )
    }

    fn count(&mut self, prompt: &str) -> anyhow::Result<u32> {
        self.prompt(prompt, |line| {
            line.parse().map_err(|_| "Please enter a whole number (0 or more).")
        })
    }

    fn positive_int(&mut self, prompt: &str) -> anyhow::Result<u32> {
        self.prompt(prompt, |line| match line.parse::<u32>() {
            Ok(0) | Err(_) => Err("Please enter a positive integer."),
            Ok(value) => Ok(value),
        })
    }

    /// Like the other prompts, but an empty answer means "keep the current value".
    fn int_in_range(&mut self, prompt: &str, min: u8, max: u8) -> anyhow::Result<Option<u8>> {
        loop {
            let line = self.read_line(prompt)?;
            if line.is_empty() {
                return Ok(None);
            }
            match line.parse::<u8>() {
                Ok(value) if (min..=max).contains(&value) => return Ok(Some(value)),
                _ => writeln!(
                    self.output,
                    "Please enter a number between {min} and {max}."
                )?,
            }
        }
    }

    fn yes_no(&mut self, prompt: &str) -> anyhow::Result<bool> {
        self.prompt(prompt, |line| match line.to_lowercase().as_str() {
            "y" | "yes" | "1" | "true" => Ok(true),
            "n" | "no" | "0" | "false" => Ok(false),
            _ => Err("Please enter 'y' for yes or 'n' for no."),
        })
    }

    fn choice<T: Copy>(&mut self, title: &str, options: &[(&str, T)]) -> anyhow::Result<T> {
        writeln!(self.output, "\n{title}")?;
        for (i, (label, _)) in options.iter().enumerate() {
            writeln!(self.output, "{}. {label}", i + 1)?;
        }
        let prompt = format!("Enter choice (1-{}): ", options.len());
        self.prompt(&prompt, |line| {
            line.parse::<usize>()
                .ok()
                .and_then(|i| i.checked_sub(1))
                .and_then(|i| options.get(i))
                .map(|&(_, value)| value)
                .ok_or("Please enter one of the listed numbers.")
        })
    }

    fn comparison(&mut self) -> anyhow::Result<Comparison> {
        self.choice(
            "Select comparison type:",
            &[
                ("P(X < x) - Less than", Comparison::LessThan),
                ("P(X > x) - Greater than", Comparison::GreaterThan),
                ("P(X ≤ x) - Less than or equal", Comparison::EqualTo),
            ],
        )
    }

    fn tail(&mut self) -> anyhow::Result<TailType> {
        self.choice(
            "Select test type:",
            &[
                ("Two-tailed test (≠)", TailType::TwoTailed),
                ("Left-tailed test (<)", TailType::LeftTailed),
                ("Right-tailed test (>)", TailType::RightTailed),
            ],
        )
    }

    fn dataset(&mut self) -> anyhow::Result<Vec<f64>> {
        writeln!(self.output, "\nEnter your dataset:")?;
        writeln!(self.output, "You can enter numbers in several ways:")?;
        writeln!(self.output, "  - Space separated: 1 2 3 4 5")?;
        writeln!(self.output, "  - Comma separated: 1, 2, 3, 4, 5")?;
        writeln!(self.output, "  - One per line (press Enter twice when done)")?;

        loop {
            let line = self.read_line("\nEnter data (single line): ")?;
            if !line.is_empty() {
                match parse_dataset(&line) {
                    Ok(values) if values.len() >= MIN_DATASET_LEN => {
                        return self.dataset_loaded(values);
                    }
                    Ok(_) => writeln!(self.output, "Please enter at least 2 numbers.")?,
                    Err(e) => writeln!(
                        self.output,
                        "Error parsing numbers ({e}). Please check your input."
                    )?,
                }
            }

            writeln!(
                self.output,
                "\nEnter numbers one per line (press Enter on empty line when done):"
            )?;
            let mut values = Vec::new();
            loop {
                let line = self.read_line("Number: ")?;
                if line.is_empty() {
                    break;
                }
                match parse_finite(&line) {
                    Some(value) => values.push(value),
                    None => writeln!(self.output, "Please enter a valid number.")?,
                }
            }
            if values.len() >= MIN_DATASET_LEN {
                return self.dataset_loaded(values);
            }
            writeln!(self.output, "Please enter at least 2 numbers.")?;
        }
    }

    fn dataset_loaded(&mut self, values: Vec<f64>) -> anyhow::Result<Vec<f64>> {
        writeln!(self.output, "Dataset loaded: {values:?}")?;
        Ok(values)
    }
}

fn parse_finite(line: &str) -> Option<f64> {
    line.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Splits a line on commas when it has any, otherwise on whitespace.
///
/// Fails on the first item that is not a finite number.
pub(crate) fn parse_dataset(line: &str) -> Result<Vec<f64>, InvalidDatasetItem> {
    let items: Vec<&str> = if line.contains(',') {
        line.split(',').map(str::trim).collect()
    } else {
        line.split_whitespace().collect()
    };
    items
        .into_iter()
        .filter(|item| !item.is_empty())
        .map(|item| {
            parse_finite(item).ok_or_else(|| InvalidDatasetItem {
                item: item.to_owned(),
            })
        })
        .collect()
}

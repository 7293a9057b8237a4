use std::path::PathBuf;

use clap::Args;

pub const DEFAULT_DECIMALS: u8 = 4;
pub const MAX_DECIMALS: u8 = 10;

/// Options shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct SettingsArg {
    /// Decimal places used when rounding displayed numbers
    #[arg(
        short,
        long,
        global = true,
        env = "STATCALC_DECIMALS",
        default_value_t = DEFAULT_DECIMALS,
        value_parser = clap::value_parser!(u8).range(0..=i64::from(MAX_DECIMALS)),
    )]
    pub decimals: u8,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Write results to this file instead of stdout
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    /// Do not clear the screen between interactive menus
    #[arg(long, global = true, env = "STATCALC_NO_CLEAR")]
    pub no_clear: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Presentation settings for the current process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub decimals: u8,
    pub json: bool,
    pub output: Option<PathBuf>,
    pub clear_screen: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            decimals: DEFAULT_DECIMALS,
            json: false,
            output: None,
            clear_screen: true,
        }
    }
}

impl From<&SettingsArg> for Settings {
    fn from(arg: &SettingsArg) -> Self {
        Self {
            decimals: arg.decimals,
            json: arg.json,
            output: arg.output.clone(),
            clear_screen: !arg.no_clear,
        }
    }
}

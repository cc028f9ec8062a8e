pub mod tier_file;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::config::tier_file::TierFileFormat;
#[cfg(feature = "cli")]
use crate::domain::model::DurationUnit;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Parser)]
#[command(name = "tier-form")]
#[command(about = "Validate duration pricing tiers and OTP form fields")]
pub struct CliConfig {
    /// Path to a TOML form configuration
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate a tier file (TOML, JSON or CSV)
    Validate {
        /// Tier file; falls back to the [[tiers]] of --config when omitted
        file: Option<String>,

        /// Override the format inferred from the file extension
        #[arg(long, value_enum)]
        format: Option<TierFileFormat>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the units offered after a given unit
    Units {
        #[arg(long, value_parser = parse_unit)]
        after: Option<DurationUnit>,
    },

    /// Check the fields of the phone verification form
    VerifyOtp {
        #[arg(long)]
        phone: String,

        #[arg(long)]
        code: String,

        /// Defaults to the configured country code
        #[arg(long)]
        country_code: Option<String>,
    },
}

#[cfg(feature = "cli")]
fn parse_unit(value: &str) -> Result<DurationUnit, String> {
    value.parse().map_err(|e: crate::utils::error::TierError| e.to_string())
}

pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use config::tier_file::{TierFile, TierFileFormat};
pub use config::toml_config::{FormConfig, OtpConfig};
pub use crate::core::duration::{available_units, elapsed_days, validate_next_tier};
pub use crate::core::otp::{validate_otp_form, OtpReport, OtpSubmission};
pub use crate::core::tiers::{validate_tiers, TierForm, TierIssue, TierIssueKind, ValidationReport};
pub use domain::model::{DurationUnit, Tier};
pub use domain::ports::{OtpRules, TierSource};
pub use utils::error::{Result, TierError};

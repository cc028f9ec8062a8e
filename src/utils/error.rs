use crate::core::otp::OtpReport;
use crate::core::tiers::ValidationReport;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TierError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Unknown duration unit: '{value}'")]
    UnknownUnit { value: String },

    #[error("Unsupported tier file format: {path}")]
    UnsupportedFormat { path: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Tier validation failed with {} issue(s)", .report.issues().len())]
    InvalidTiers { report: ValidationReport },

    #[error("OTP form validation failed with {} issue(s)", .report.issues().len())]
    InvalidOtp { report: OtpReport },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Validation,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code. 0 is left for success.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 1,
            ErrorSeverity::High => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl TierError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TierError::IoError(_) => ErrorCategory::System,
            TierError::TomlError(_)
            | TierError::JsonError(_)
            | TierError::CsvError(_)
            | TierError::UnknownUnit { .. }
            | TierError::UnsupportedFormat { .. } => ErrorCategory::Input,
            TierError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            TierError::InvalidTiers { .. } | TierError::InvalidOtp { .. } => {
                ErrorCategory::Validation
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 根據錯誤嚴重程度決定退出碼
    pub fn exit_code(&self) -> i32 {
        self.severity().exit_code()
    }

    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            TierError::IoError(e) => format!("Could not read the file: {}", e),
            TierError::TomlError(_) | TierError::JsonError(_) | TierError::CsvError(_) => {
                format!("The tier file could not be parsed: {}", self)
            }
            TierError::UnknownUnit { value } => format!(
                "'{}' is not a duration unit. Use days, months or years",
                value
            ),
            TierError::UnsupportedFormat { path } => {
                format!("Cannot tell the format of '{}'", path)
            }
            TierError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
            TierError::InvalidTiers { .. } => {
                "Please fix the validation errors before saving".to_string()
            }
            TierError::InvalidOtp { .. } => "Please check the form for errors".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TierError::IoError(_) => "Check that the path exists and is readable",
            TierError::TomlError(_) => "Check the TOML syntax and the [[tiers]] tables",
            TierError::JsonError(_) => "Provide a JSON array of tiers or an object with a 'tiers' field",
            TierError::CsvError(_) => "Use a CSV header of 'duration,unit,cost'",
            TierError::UnknownUnit { .. } => "Valid units are: days, months, years",
            TierError::UnsupportedFormat { .. } => "Use a .toml, .json or .csv file, or pass --format",
            TierError::InvalidConfigValueError { .. } => "Fix the configuration value and try again",
            TierError::InvalidTiers { .. } => {
                "Make every tier longer than the one before it, with a positive duration and a non-negative cost"
            }
            TierError::InvalidOtp { .. } => "Enter the full code sent via SMS to the number above",
        }
    }
}

pub type Result<T> = std::result::Result<T, TierError>;

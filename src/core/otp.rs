use crate::domain::ports::OtpRules;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpSubmission {
    pub country_code: String,
    pub phone_number: String,
    pub code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpField {
    CountryCode,
    PhoneNumber,
    Code,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum OtpIssue {
    InvalidCountryCode,
    PhoneTooShort { min: usize },
    OtpWrongLength { expected: usize },
    OtpNotNumeric,
}

impl OtpIssue {
    pub fn field(&self) -> OtpField {
        match self {
            OtpIssue::InvalidCountryCode => OtpField::CountryCode,
            OtpIssue::PhoneTooShort { .. } => OtpField::PhoneNumber,
            OtpIssue::OtpWrongLength { .. } | OtpIssue::OtpNotNumeric => OtpField::Code,
        }
    }
}

impl fmt::Display for OtpIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OtpIssue::InvalidCountryCode => {
                write!(f, "Country code must be '+' followed by 1 to 3 digits")
            }
            OtpIssue::PhoneTooShort { min } => {
                write!(f, "Phone number must be at least {} digits", min)
            }
            OtpIssue::OtpWrongLength { expected } => {
                write!(f, "OTP code must be {} digits.", expected)
            }
            OtpIssue::OtpNotNumeric => write!(f, "OTP code may only contain digits"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OtpReport {
    issues: Vec<OtpIssue>,
}

impl OtpReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[OtpIssue] {
        &self.issues
    }
}

pub fn is_valid_country_code(code: &str) -> bool {
    let Some(digits) = code.strip_prefix('+') else {
        return false;
    };
    (1..=3).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Field checks of the phone verification form.
pub fn validate_otp_form(submission: &OtpSubmission, rules: &dyn OtpRules) -> OtpReport {
    let mut issues = Vec::new();

    // 沒填國碼時沿用預設值
    let country_code = match submission.country_code.trim() {
        "" => rules.country_code(),
        code => code,
    };
    if !is_valid_country_code(country_code) {
        issues.push(OtpIssue::InvalidCountryCode);
    }

    let min = rules.phone_min_length();
    // 與表單一致: 以原始輸入計算長度, 不先去除空白
    if submission.phone_number.chars().count() < min {
        issues.push(OtpIssue::PhoneTooShort { min });
    }

    let expected = rules.code_length();
    if submission.code.chars().count() != expected {
        issues.push(OtpIssue::OtpWrongLength { expected });
    }
    if !submission.code.chars().all(|c| c.is_ascii_digit()) {
        issues.push(OtpIssue::OtpNotNumeric);
    }

    if !issues.is_empty() {
        tracing::debug!("OTP form rejected with {} issue(s)", issues.len());
    }

    OtpReport { issues }
}

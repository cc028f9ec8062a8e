use crate::domain::model::Tier;
use crate::domain::ports::{OtpRules, TierSource};
use crate::utils::error::{Result, TierError};
use crate::utils::validation::{validate_non_empty_string, validate_pattern, validate_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

static CURRENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").expect("valid currency pattern"));

static COUNTRY_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[0-9]{1,3}$").expect("valid country code pattern"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    pub form: FormSection,
    #[serde(default)]
    pub otp: OtpConfig,
    #[serde(default)]
    pub tiers: Vec<Tier>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSection {
    pub name: String,
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtpConfig {
    pub country_code: String,
    pub phone_min_length: usize,
    pub code_length: usize,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            country_code: "+65".to_string(),
            phone_min_length: 8,
            code_length: 6,
        }
    }
}

impl FormConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${FORM_NAME}), 找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("form.name", &self.form.name)?;
        validate_pattern(
            "form.currency",
            &self.form.currency,
            &CURRENCY_RE,
            "a 3-letter uppercase currency code",
        )?;
        self.otp.validate()
    }
}

impl Validate for FormConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

impl Validate for OtpConfig {
    fn validate(&self) -> Result<()> {
        validate_pattern(
            "otp.country_code",
            &self.country_code,
            &COUNTRY_CODE_RE,
            "'+' followed by 1 to 3 digits",
        )?;
        validate_range("otp.phone_min_length", self.phone_min_length, 4, 15)?;
        validate_range("otp.code_length", self.code_length, 4, 10)
    }
}

impl OtpRules for OtpConfig {
    fn country_code(&self) -> &str {
        &self.country_code
    }

    fn phone_min_length(&self) -> usize {
        self.phone_min_length
    }

    fn code_length(&self) -> usize {
        self.code_length
    }
}

impl TierSource for FormConfig {
    fn load_tiers(&self) -> Result<Vec<Tier>> {
        if self.tiers.is_empty() {
            return Err(TierError::InvalidConfigValueError {
                field: "tiers".to_string(),
                value: String::new(),
                reason: "No [[tiers]] defined in configuration".to_string(),
            });
        }
        Ok(self.tiers.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::DurationUnit;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_form_config() {
        let toml_content = r#"
[form]
name = "Storage plans"
currency = "SGD"

[otp]
country_code = "+60"

[[tiers]]
duration = 7
unit = "days"
cost = 20

[[tiers]]
duration = 1
unit = "months"
cost = 55.5
"#;

        let config = FormConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.form.name, "Storage plans");
        assert_eq!(config.otp.country_code, "+60");
        assert_eq!(config.otp.code_length, 6);
        let tiers = config.load_tiers().unwrap();
        assert_eq!(tiers[1], Tier::new(1.0, DurationUnit::Months, 55.5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = FormConfig::from_toml_str("[form]\nname = \"Basic\"\n").unwrap();
        assert_eq!(config.form.currency, "USD");
        assert_eq!(config.otp, OtpConfig::default());
        assert!(config.load_tiers().is_err());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TIER_FORM_TEST_NAME", "From env");

        let toml_content = r#"
[form]
name = "${TIER_FORM_TEST_NAME}"
"#;

        let config = FormConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.form.name, "From env");

        std::env::remove_var("TIER_FORM_TEST_NAME");
    }

    #[test]
    fn test_unset_env_var_kept() {
        let config = FormConfig::from_toml_str("[form]\nname = \"${TIER_FORM_UNSET_VAR}\"\n").unwrap();
        assert_eq!(config.form.name, "${TIER_FORM_UNSET_VAR}");
    }

    #[test]
    fn test_config_validation() {
        let config = FormConfig::from_toml_str("[form]\nname = \"x\"\ncurrency = \"dollars\"\n").unwrap();
        assert!(config.validate().is_err());

        let config =
            FormConfig::from_toml_str("[form]\nname = \"x\"\n[otp]\ncode_length = 2\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("otp.code_length"));
    }

    #[test]
    fn test_unknown_unit_rejected() {
        let toml_content = r#"
[form]
name = "x"

[[tiers]]
duration = 2
unit = "weeks"
cost = 1
"#;
        assert!(matches!(
            FormConfig::from_toml_str(toml_content),
            Err(TierError::TomlError(_))
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[form]\nname = \"file-test\"\n")
            .unwrap();

        let config = FormConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.form.name, "file-test");
    }
}

use crate::utils::error::TierError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Granularity of a tier's duration. Variants are declared in canonical order,
/// so the derived `Ord` goes from finest to coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Days,
    Months,
    Years,
}

impl DurationUnit {
    pub const ALL: [DurationUnit; 3] = [DurationUnit::Days, DurationUnit::Months, DurationUnit::Years];

    /// Days per unit (approximate: 30-day months, 365-day years).
    pub fn days_factor(self) -> f64 {
        match self {
            DurationUnit::Days => 1.0,
            DurationUnit::Months => 30.0,
            DurationUnit::Years => 365.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DurationUnit::Days => "days",
            DurationUnit::Months => "months",
            DurationUnit::Years => "years",
        }
    }

    /// 下拉選單顯示用的標籤
    pub fn label(self) -> &'static str {
        match self {
            DurationUnit::Days => "Days",
            DurationUnit::Months => "Months",
            DurationUnit::Years => "Years",
        }
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DurationUnit {
    type Err = TierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "days" => Ok(DurationUnit::Days),
            "months" => Ok(DurationUnit::Months),
            "years" => Ok(DurationUnit::Years),
            _ => Err(TierError::UnknownUnit {
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub duration: f64,
    pub unit: DurationUnit,
    pub cost: f64,
}

impl Tier {
    pub fn new(duration: f64, unit: DurationUnit, cost: f64) -> Self {
        Self {
            duration,
            unit,
            cost,
        }
    }

    /// First tier of a fresh form.
    pub fn initial() -> Self {
        Self::new(7.0, DurationUnit::Days, 20.0)
    }

    /// Tier appended by "add tier".
    pub fn appended() -> Self {
        Self::new(1.0, DurationUnit::Days, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unit() {
        assert_eq!("days".parse::<DurationUnit>().unwrap(), DurationUnit::Days);
        assert_eq!(" Months ".parse::<DurationUnit>().unwrap(), DurationUnit::Months);
        assert_eq!("YEARS".parse::<DurationUnit>().unwrap(), DurationUnit::Years);
    }

    #[test]
    fn test_parse_unknown_unit_is_error() {
        let err = "weeks".parse::<DurationUnit>().unwrap_err();
        assert!(matches!(err, TierError::UnknownUnit { ref value } if value == "weeks"));
    }

    #[test]
    fn test_unit_serde_is_lowercase() {
        let json = serde_json::to_string(&DurationUnit::Months).unwrap();
        assert_eq!(json, "\"months\"");
        let unit: DurationUnit = serde_json::from_str("\"years\"").unwrap();
        assert_eq!(unit, DurationUnit::Years);
    }

    #[test]
    fn test_canonical_order() {
        let mut units = vec![DurationUnit::Years, DurationUnit::Days, DurationUnit::Months];
        units.sort();
        assert_eq!(units, DurationUnit::ALL.to_vec());
        assert_eq!(DurationUnit::Months.label(), "Months");
    }
}

use crate::core::duration::{available_units, elapsed_days, validate_next_tier};
use crate::domain::model::{DurationUnit, Tier};
use crate::utils::error::{Result, TierError};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TierIssueKind {
    NonPositiveDuration,
    NegativeCost,
    /// The tier is not longer than the one before it.
    NonMonotonic,
    /// The unit is finer than the previous tier's unit. Advisory only.
    UnitNotOffered { previous: DurationUnit },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierIssue {
    pub index: usize,
    #[serde(flatten)]
    pub kind: TierIssueKind,
}

impl TierIssue {
    pub fn message(&self) -> String {
        match self.kind {
            TierIssueKind::NonPositiveDuration => "Duration must be greater than 0".to_string(),
            TierIssueKind::NegativeCost => "Cost must be non-negative".to_string(),
            TierIssueKind::NonMonotonic => {
                "Each tier must have a longer duration than the previous tier".to_string()
            }
            TierIssueKind::UnitNotOffered { previous } => format!(
                "Unit must be one of: {}",
                available_units(Some(previous))
                    .iter()
                    .map(|u| u.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

impl fmt::Display for TierIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tiers.{}: {}", self.index, self.message())
    }
}

/// Outcome of validating a tier sequence. Issues are ordered by tier index.
/// Advisories mirror the unit selector's granularity rule and never make a
/// sequence invalid.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    issues: Vec<TierIssue>,
    advisories: Vec<TierIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[TierIssue] {
        &self.issues
    }

    pub fn advisories(&self) -> &[TierIssue] {
        &self.advisories
    }

    pub fn first_failure(&self) -> Option<&TierIssue> {
        self.issues.first()
    }

    pub fn issues_at(&self, index: usize) -> impl Iterator<Item = &TierIssue> {
        self.issues.iter().filter(move |issue| issue.index == index)
    }

    fn push(&mut self, index: usize, kind: TierIssueKind) {
        self.issues.push(TierIssue { index, kind });
    }

    fn advise(&mut self, index: usize, kind: TierIssueKind) {
        self.advisories.push(TierIssue { index, kind });
    }
}

/// Checks every tier and every adjacent pair. Pairs are evaluated
/// independently so one bad tier does not hide later failures. An empty
/// sequence has no pairs and is valid.
pub fn validate_tiers(tiers: &[Tier]) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (index, tier) in tiers.iter().enumerate() {
        // NaN fails both comparisons
        if !(tier.duration > 0.0) {
            report.push(index, TierIssueKind::NonPositiveDuration);
        }
        if !(tier.cost >= 0.0) {
            report.push(index, TierIssueKind::NegativeCost);
        }

        let Some(prev) = index.checked_sub(1).map(|i| &tiers[i]) else {
            continue;
        };

        if !available_units(Some(prev.unit)).contains(&tier.unit) {
            report.advise(index, TierIssueKind::UnitNotOffered { previous: prev.unit });
        }

        if !validate_next_tier(prev.duration, prev.unit, tier.duration, tier.unit) {
            tracing::debug!(
                "Tier {} ({} {}, {} days) is not longer than tier {} ({} {}, {} days)",
                index,
                tier.duration,
                tier.unit,
                elapsed_days(tier.duration, tier.unit),
                index - 1,
                prev.duration,
                prev.unit,
                elapsed_days(prev.duration, prev.unit)
            );
            report.push(index, TierIssueKind::NonMonotonic);
        }
    }

    report
}

/// Editable tier list behind the pricing form.
#[derive(Debug, Clone, PartialEq)]
pub struct TierForm {
    tiers: Vec<Tier>,
}

impl Default for TierForm {
    fn default() -> Self {
        Self::new()
    }
}

impl TierForm {
    pub fn new() -> Self {
        Self {
            tiers: vec![Tier::initial()],
        }
    }

    /// Starts from existing tiers, falling back to the default first tier
    /// when none are given.
    pub fn from_tiers(tiers: Vec<Tier>) -> Self {
        if tiers.is_empty() {
            Self::new()
        } else {
            Self { tiers }
        }
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn tier_mut(&mut self, index: usize) -> Option<&mut Tier> {
        self.tiers.get_mut(index)
    }

    pub fn push_default(&mut self) -> usize {
        self.tiers.push(Tier::appended());
        self.tiers.len() - 1
    }

    /// Removes a tier. The first tier is never removable.
    pub fn remove(&mut self, index: usize) -> Option<Tier> {
        if index == 0 || index >= self.tiers.len() {
            return None;
        }
        Some(self.tiers.remove(index))
    }

    /// Units the selector should offer for the tier at `index`. `index` may
    /// be one past the last tier (the row about to be added); anything
    /// further has no row and gets `None`.
    pub fn units_for(&self, index: usize) -> Option<&'static [DurationUnit]> {
        if index > self.tiers.len() {
            return None;
        }
        let prev = index.checked_sub(1).map(|i| self.tiers[i].unit);
        Some(available_units(prev))
    }

    pub fn validate(&self) -> ValidationReport {
        validate_tiers(&self.tiers)
    }

    pub fn submit(&self) -> Result<Vec<Tier>> {
        let report = self.validate();
        if !report.is_valid() {
            return Err(TierError::InvalidTiers { report });
        }
        tracing::info!("Tiers saved: {} tier(s)", self.tiers.len());
        Ok(self.tiers.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DurationUnit::*;

    fn tier(duration: f64, unit: DurationUnit) -> Tier {
        Tier::new(duration, unit, 10.0)
    }

    #[test]
    fn test_increasing_sequence_is_valid() {
        let report = validate_tiers(&[tier(7.0, Days), tier(2.0, Months), tier(1.0, Years)]);
        assert!(report.is_valid());
        assert!(report.first_failure().is_none());
    }

    #[test]
    fn test_failure_reported_at_later_index() {
        let report = validate_tiers(&[tier(7.0, Days), tier(2.0, Months), tier(50.0, Days)]);
        assert!(!report.is_valid());
        assert_eq!(
            report.issues(),
            &[TierIssue {
                index: 2,
                kind: TierIssueKind::NonMonotonic
            }]
        );
        assert!(report.issues_at(1).next().is_none());
    }

    #[test]
    fn test_all_pairs_are_evaluated() {
        let report = validate_tiers(&[
            tier(10.0, Days),
            tier(5.0, Days),
            tier(20.0, Days),
            tier(20.0, Days),
        ]);
        let failing: Vec<usize> = report.issues().iter().map(|i| i.index).collect();
        assert_eq!(failing, vec![1, 3]);
    }

    #[test]
    fn test_field_rules() {
        let report = validate_tiers(&[Tier::new(0.0, Days, -1.0), Tier::new(f64::NAN, Months, f64::NAN)]);
        let kinds: Vec<(usize, TierIssueKind)> = report.issues().iter().map(|i| (i.index, i.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (0, TierIssueKind::NonPositiveDuration),
                (0, TierIssueKind::NegativeCost),
                (1, TierIssueKind::NonPositiveDuration),
                (1, TierIssueKind::NegativeCost),
                (1, TierIssueKind::NonMonotonic),
            ]
        );
    }

    #[test]
    fn test_zero_cost_allowed() {
        assert!(validate_tiers(&[Tier::new(1.0, Days, 0.0)]).is_valid());
    }

    #[test]
    fn test_finer_unit_after_coarser_is_only_advisory() {
        let tiers = [tier(1.0, Months), tier(45.0, Days)];
        assert!(tiers
            .windows(2)
            .all(|w| validate_next_tier(w[0].duration, w[0].unit, w[1].duration, w[1].unit)));

        let report = validate_tiers(&tiers);
        assert!(report.is_valid());
        assert!(report.issues().is_empty());
        assert_eq!(
            report.advisories(),
            &[TierIssue {
                index: 1,
                kind: TierIssueKind::UnitNotOffered { previous: Months }
            }]
        );
    }

    #[test]
    fn test_empty_sequence_is_valid() {
        let report = validate_tiers(&[]);
        assert!(report.is_valid());
        assert!(report.advisories().is_empty());
    }

    #[test]
    fn test_issue_messages() {
        let report = validate_tiers(&[tier(2.0, Months), tier(1.0, Months)]);
        let issue = report.first_failure().unwrap();
        assert_eq!(
            issue.to_string(),
            "tiers.1: Each tier must have a longer duration than the previous tier"
        );

        let report = validate_tiers(&[tier(1.0, Years), tier(400.0, Days)]);
        assert!(report.is_valid());
        assert_eq!(report.advisories()[0].message(), "Unit must be one of: years");
    }

    #[test]
    fn test_issue_serializes_kind_tag() {
        let issue = TierIssue {
            index: 2,
            kind: TierIssueKind::NonMonotonic,
        };
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json, serde_json::json!({"index": 2, "kind": "non-monotonic"}));
    }

    #[test]
    fn test_form_defaults() {
        let mut form = TierForm::new();
        assert_eq!(form.tiers(), &[Tier::new(7.0, Days, 20.0)]);

        let index = form.push_default();
        assert_eq!(index, 1);
        assert_eq!(form.tiers()[1], Tier::new(1.0, Days, 0.0));
        // 1 day is shorter than 7 days
        assert!(!form.validate().is_valid());
    }

    #[test]
    fn test_form_remove_keeps_first_tier() {
        let mut form = TierForm::new();
        form.push_default();
        assert!(form.remove(0).is_none());
        assert!(form.remove(5).is_none());
        assert!(form.remove(1).is_some());
        assert_eq!(form.tiers().len(), 1);
    }

    #[test]
    fn test_form_units_follow_previous_tier() {
        let mut form = TierForm::from_tiers(vec![tier(7.0, Days), tier(2.0, Months)]);
        assert_eq!(form.units_for(0), Some(&[Days, Months, Years][..]));
        assert_eq!(form.units_for(1), Some(&[Days, Months, Years][..]));
        assert_eq!(form.units_for(2), Some(&[Months, Years][..]));

        if let Some(t) = form.tier_mut(1) {
            t.unit = Years;
        }
        assert_eq!(form.units_for(2), Some(&[Years][..]));
    }

    #[test]
    fn test_form_units_past_end_have_no_row() {
        let form = TierForm::from_tiers(vec![tier(1.0, Years)]);
        assert_eq!(form.units_for(1), Some(&[Years][..]));
        assert_eq!(form.units_for(2), None);
        assert_eq!(form.units_for(10), None);
    }

    #[test]
    fn test_form_submit() {
        let mut form = TierForm::new();
        let index = form.push_default();
        let err = form.submit().unwrap_err();
        match err {
            TierError::InvalidTiers { report } => {
                assert_eq!(report.first_failure().map(|i| i.index), Some(1));
            }
            other => panic!("unexpected error: {other}"),
        }

        if let Some(t) = form.tier_mut(index) {
            t.duration = 1.0;
            t.unit = Months;
            t.cost = 50.0;
        }
        let saved = form.submit().unwrap();
        assert_eq!(saved.len(), 2);
    }
}

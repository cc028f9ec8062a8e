use crate::domain::model::DurationUnit;

/// Converts a (duration, unit) pair into a comparable day count.
pub fn elapsed_days(duration: f64, unit: DurationUnit) -> f64 {
    duration * unit.days_factor()
}

/// True iff the next tier lasts strictly longer than the previous one.
/// Equal day counts are rejected.
pub fn validate_next_tier(
    prev_duration: f64,
    prev_unit: DurationUnit,
    next_duration: f64,
    next_unit: DurationUnit,
) -> bool {
    elapsed_days(next_duration, next_unit) > elapsed_days(prev_duration, prev_unit)
}

/// Units a tier may pick given the unit of the tier before it.
///
/// Once a coarser unit has been chosen, finer units are no longer offered.
/// This is a granularity rule for the unit selector and is stricter than
/// [`validate_next_tier`] alone: `(1, months)` followed by `(45, days)` would
/// pass the monotonicity check but `days` is not offered after `months`.
pub fn available_units(prev_unit: Option<DurationUnit>) -> &'static [DurationUnit] {
    match prev_unit {
        None | Some(DurationUnit::Days) => &DurationUnit::ALL,
        Some(DurationUnit::Months) => &DurationUnit::ALL[1..],
        Some(DurationUnit::Years) => &DurationUnit::ALL[2..],
    }
}

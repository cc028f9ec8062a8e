use crate::domain::model::Tier;
use crate::utils::error::Result;

/// Anything that can hand over a tier sequence for validation.
pub trait TierSource {
    fn load_tiers(&self) -> Result<Vec<Tier>>;
}

pub trait OtpRules {
    fn country_code(&self) -> &str;
    fn phone_min_length(&self) -> usize;
    fn code_length(&self) -> usize;
}

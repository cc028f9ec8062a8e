pub mod duration;
pub mod otp;
pub mod tiers;

pub use crate::domain::model::{DurationUnit, Tier};
pub use crate::domain::ports::{OtpRules, TierSource};
pub use crate::utils::error::Result;

//! 邀请归因模块

pub mod referral_service;

pub use referral_service::{AttributionOutcome, DynReferralService, ReferralService, ReferralServiceTrait};

//! 身份核验模块
//!
//! Twitter OAuth资料归一化、邀请码生成与成员落库

pub mod identity_service;
pub mod profile;
pub mod referral_code;
pub mod twitter_oauth;

pub use identity_service::{DynIdentityService, IdentityService, IdentityServiceTrait};
pub use profile::{resolve_profile, ProfileHint, PublicMetrics, TwitterProfilePayload, TwitterUserFields};
pub use referral_code::{derive_referral_code, regenerate_referral_code};
pub use twitter_oauth::{DynIdentityProvider, IdentityProviderTrait, TwitterOAuthProvider, TwitterTokenResponse};

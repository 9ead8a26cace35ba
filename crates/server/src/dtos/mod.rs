pub mod auth_dto;
pub mod member_dto;
pub mod referral_dto;
pub mod waitlist_dto;
pub mod wallet_dto;

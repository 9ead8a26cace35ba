//! 成员查询与钱包模块

pub mod member_service;

pub use member_service::{DynMemberService, MemberService, MemberServiceTrait, MembershipStatus, WaitlistStats};

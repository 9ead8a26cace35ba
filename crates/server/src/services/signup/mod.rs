//! 注册流程编排模块

pub mod signup_service;

pub use signup_service::{CompletedLogin, DynSignupService, SignupService, SignupServiceTrait};

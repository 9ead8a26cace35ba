//! 候补名单成员数据模块
//!
//! 提供成员的数据模型定义和数据库操作接口

pub mod model;
pub mod repository;

pub use model::*;
pub use repository::*;

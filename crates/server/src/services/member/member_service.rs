use async_trait::async_trait;
use chrono::Utc;
use database::member::model::WaitlistMember;
use database::member::repository::DynMemberRepository;
use std::sync::Arc;
use tracing::info;
use utils::{AppError, AppResult};

/// 最近注册数的统计窗口：24小时
const RECENT_WINDOW_SECS: u64 = 24 * 60 * 60;

pub type DynMemberService = Arc<dyn MemberServiceTrait + Send + Sync>;

/// 成员状态
///
/// unknown=未登录，new=已登录但未留钱包（或成员记录缺失），
/// existing=已登录且留过钱包。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipStatus {
    Unknown,
    New,
    Existing,
}

impl MembershipStatus {
    /// 由已认证用户的成员记录推导状态
    pub fn of(member: Option<&WaitlistMember>) -> Self {
        match member {
            Some(m) if m.has_wallet() => MembershipStatus::Existing,
            Some(_) | None => MembershipStatus::New,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Unknown => "unknown",
            MembershipStatus::New => "new",
            MembershipStatus::Existing => "existing",
        }
    }
}

/// 候补名单统计
#[derive(Debug, Clone, Default)]
pub struct WaitlistStats {
    pub total_members: u64,
    pub recent_signups: u64,
}

#[async_trait]
pub trait MemberServiceTrait {
    async fn get_member(&self, twitter_id: &str) -> AppResult<Option<WaitlistMember>>;

    /// 写入钱包地址，返回更新后的成员记录
    async fn update_wallet(&self, twitter_id: &str, wallet_address: &str) -> AppResult<WaitlistMember>;

    async fn get_stats(&self) -> AppResult<WaitlistStats>;

    /// 按粉丝数降序的前N名
    async fn get_leaderboard(&self, limit: i64) -> AppResult<Vec<WaitlistMember>>;
}

#[derive(Clone)]
pub struct MemberService {
    repository: DynMemberRepository,
}

impl MemberService {
    pub fn new(repository: DynMemberRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl MemberServiceTrait for MemberService {
    async fn get_member(&self, twitter_id: &str) -> AppResult<Option<WaitlistMember>> {
        let member = self.repository.find_by_twitter_id(twitter_id).await?;

        Ok(member)
    }

    async fn update_wallet(&self, twitter_id: &str, wallet_address: &str) -> AppResult<WaitlistMember> {
        let wallet_address = wallet_address.trim();
        if wallet_address.is_empty() {
            return Err(AppError::BadRequest("Wallet address is required".to_string()));
        }

        let member = self
            .repository
            .set_wallet_address(twitter_id, wallet_address)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member with twitter_id: {} not found", twitter_id)))?;

        info!("💰 钱包地址已更新: handle={}", member.handle);
        Ok(member)
    }

    async fn get_stats(&self) -> AppResult<WaitlistStats> {
        let now = Utc::now().timestamp() as u64;
        let cutoff = now.saturating_sub(RECENT_WINDOW_SECS);

        let total_members = self.repository.count_members().await?;
        let recent_signups = self.repository.count_members_since(cutoff).await?;

        Ok(WaitlistStats {
            total_members,
            recent_signups,
        })
    }

    async fn get_leaderboard(&self, limit: i64) -> AppResult<Vec<WaitlistMember>> {
        let members = self.repository.top_by_follower_count(limit).await?;

        Ok(members)
    }
}

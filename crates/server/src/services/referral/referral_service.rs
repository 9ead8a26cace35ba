use async_trait::async_trait;
use database::member::model::WaitlistMember;
use database::member::repository::DynMemberRepository;
use std::sync::Arc;
use tracing::info;
use utils::{AppError, AppResult};

pub type DynReferralService = Arc<dyn ReferralServiceTrait + Send + Sync>;

/// 归因结果
#[derive(Debug, Clone)]
pub struct AttributionOutcome {
    /// 归因后的成员记录（已绑定过时为原样返回）
    pub member: WaitlistMember,
    /// 邀请人的Twitter用户名
    pub referrer_handle: String,
    /// 本次是否实际写入，已绑定过的成员为false
    pub applied: bool,
}

#[async_trait]
pub trait ReferralServiceTrait {
    /// 把邀请码归因到成员身上
    ///
    /// referred_by只在当前未绑定时写入，已有归因永不覆盖。
    async fn attribute(&self, twitter_id: &str, code: &str) -> AppResult<AttributionOutcome>;
}

#[derive(Clone)]
pub struct ReferralService {
    repository: DynMemberRepository,
}

impl ReferralService {
    pub fn new(repository: DynMemberRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl ReferralServiceTrait for ReferralService {
    async fn attribute(&self, twitter_id: &str, code: &str) -> AppResult<AttributionOutcome> {
        // 1. 邀请码必须属于一个真实成员
        let referrer = self
            .repository
            .find_by_referral_code(code)
            .await?
            .ok_or_else(|| AppError::BadRequest("Invalid referral code".to_string()))?;

        // 2. 拒绝自我邀请
        if referrer.twitter_id == twitter_id {
            return Err(AppError::BadRequest("Cannot use your own referral code".to_string()));
        }

        // 3. 条件更新：referred_by为null时才写入，并发下也不会覆盖已有归因
        let applied = self.repository.attribute_referral(twitter_id, &referrer.twitter_id).await?;

        // 4. 回读成员状态；更新没有匹配到文档时由这里区分"已绑定"和"成员不存在"
        let member = self
            .repository
            .find_by_twitter_id(twitter_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member with twitter_id: {} not found", twitter_id)))?;

        if applied {
            info!("🔗 邀请归因成功: member={} referrer={}", member.handle, referrer.handle);
        }

        Ok(AttributionOutcome {
            member,
            referrer_handle: referrer.handle,
            applied,
        })
    }
}

use crate::services::identity::referral_code::{derive_referral_code, regenerate_referral_code};
use async_trait::async_trait;
use database::member::model::{MemberProfile, WaitlistMember};
use database::member::repository::DynMemberRepository;
use std::sync::Arc;
use tracing::{info, warn};
use utils::{AppError, AppResult};

/// 邀请码唯一性冲突时的重试上限
const MAX_CODE_ATTEMPTS: usize = 5;

pub type DynIdentityService = Arc<dyn IdentityServiceTrait + Send + Sync>;

#[async_trait]
pub trait IdentityServiceTrait {
    /// 核验通过的资料落库
    ///
    /// 已有成员刷新画像字段，新成员分配邀请码后插入。
    /// 返回成员记录和是否为首次注册。
    async fn verify_and_upsert(&self, profile: &MemberProfile) -> AppResult<(WaitlistMember, bool)>;
}

#[derive(Clone)]
pub struct IdentityService {
    repository: DynMemberRepository,
}

impl IdentityService {
    pub fn new(repository: DynMemberRepository) -> Self {
        Self { repository }
    }

    async fn refresh_existing(&self, existing: WaitlistMember, profile: &MemberProfile) -> AppResult<WaitlistMember> {
        let refreshed = self.repository.refresh_profile(&profile.twitter_id, profile).await?;
        // 成员恰好在查到之后被删除时matched_count为0，返回查到的记录即可
        Ok(refreshed.unwrap_or(existing))
    }
}

#[async_trait]
impl IdentityServiceTrait for IdentityService {
    async fn verify_and_upsert(&self, profile: &MemberProfile) -> AppResult<(WaitlistMember, bool)> {
        // 1. 已注册成员：每次登录刷新五个画像字段，
        //    referral_code、wallet_address、referred_by、created_at保持不变
        if let Some(existing) = self.repository.find_by_twitter_id(&profile.twitter_id).await? {
            let member = self.refresh_existing(existing, profile).await?;
            return Ok((member, false));
        }

        // 2. 新成员：先派生邀请码，唯一性冲突时有界重试
        let mut code = derive_referral_code(&profile.handle);
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            // 预检消化大部分撞码，并发窗口内的冲突由唯一索引兜底
            if self.repository.find_by_referral_code(&code).await?.is_some() {
                code = regenerate_referral_code(&profile.handle);
                continue;
            }

            let member = WaitlistMember::from_profile(profile, &code);
            match self.repository.create_member(member).await {
                Ok(created) => {
                    info!("✅ 新成员注册: handle={} code={}", created.handle, created.referral_code);
                    return Ok((created, true));
                }
                Err(AppError::Conflict(_)) | Err(AppError::MongoError(_)) => {
                    // 冲突可能落在twitter_id或referral_code任一唯一索引上，
                    // 通过重读成员状态区分，而不是解析驱动的错误信息
                    if let Some(existing) = self.repository.find_by_twitter_id(&profile.twitter_id).await? {
                        // 同一用户并发注册，输掉竞争的一方转入刷新路径
                        let member = self.refresh_existing(existing, profile).await?;
                        return Ok((member, false));
                    }
                    warn!("⚠️ 邀请码冲突，重新生成后重试: attempt={} code={}", attempt, code);
                    code = regenerate_referral_code(&profile.handle);
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::InternalServerErrorWithContext(
            "Failed to allocate a unique referral code".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{test_member, test_profile, MockMemberRepository};
    use std::sync::atomic::Ordering;

    fn create_service(repository: Arc<MockMemberRepository>) -> IdentityService {
        IdentityService::new(repository)
    }

    #[tokio::test]
    async fn test_new_member_gets_derived_code() {
        let repository = Arc::new(MockMemberRepository::new());
        let service = create_service(repository.clone());

        let profile = test_profile("100", "alicewonder", 1500);
        let (member, is_new) = service.verify_and_upsert(&profile).await.unwrap();

        assert!(is_new);
        assert_eq!(member.referral_code, "alicewon");
        assert_eq!(member.follower_count, 1500);
        assert!(repository.get("100").is_some());
    }

    #[tokio::test]
    async fn test_existing_member_profile_refreshed() {
        let repository = Arc::new(MockMemberRepository::new());
        let mut seeded = test_member("100", "alice", "alice123");
        seeded.wallet_address = Some("0xabc".to_string());
        seeded.referred_by = Some("42".to_string());
        repository.insert(seeded);

        let service = create_service(repository.clone());

        let mut profile = test_profile("100", "alice_renamed", 9000);
        profile.is_verified = true;
        let (member, is_new) = service.verify_and_upsert(&profile).await.unwrap();

        assert!(!is_new);
        assert_eq!(member.handle, "alice_renamed");
        assert_eq!(member.follower_count, 9000);
        assert!(member.is_verified);
        // 身份之外的字段不被登录刷新覆盖
        assert_eq!(member.referral_code, "alice123");
        assert_eq!(member.wallet_address, Some("0xabc".to_string()));
        assert_eq!(member.referred_by, Some("42".to_string()));
    }

    #[tokio::test]
    async fn test_code_collision_regenerates_suffix() {
        let repository = Arc::new(MockMemberRepository::new());
        // 另一个成员已经占用了派生码alicewon
        repository.insert(test_member("999", "other", "alicewon"));

        let service = create_service(repository.clone());

        let profile = test_profile("100", "alicewonder", 10);
        let (member, is_new) = service.verify_and_upsert(&profile).await.unwrap();

        assert!(is_new);
        assert_ne!(member.referral_code, "alicewon");
        assert!(member.referral_code.starts_with("alic"));
        assert_eq!(member.referral_code.len(), 8);
        assert_eq!(repository.len(), 2);
    }

    #[tokio::test]
    async fn test_losing_concurrent_signup_falls_back_to_refresh() {
        let repository = Arc::new(MockMemberRepository::new());
        // 并发赢家携带同一twitter_id先落库，本次插入收到冲突
        let winner = test_member("100", "alice", "winner12");
        *repository.conflict_with.lock().unwrap() = Some(winner);

        let service = create_service(repository.clone());

        let profile = test_profile("100", "alice", 777);
        let (member, is_new) = service.verify_and_upsert(&profile).await.unwrap();

        assert!(!is_new);
        assert_eq!(member.referral_code, "winner12");
        assert_eq!(member.follower_count, 777);
        assert_eq!(repository.len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_aborts_signup() {
        let repository = Arc::new(MockMemberRepository::new());
        repository.fail_writes.store(true, Ordering::SeqCst);

        let service = create_service(repository.clone());

        let profile = test_profile("100", "alice", 1);
        let result = service.verify_and_upsert(&profile).await;

        assert!(matches!(result, Err(AppError::InternalServerErrorWithContext(_))));
        assert_eq!(repository.len(), 0);
    }

    #[tokio::test]
    async fn test_retry_exhaustion_yields_error() {
        let repository = Arc::new(MockMemberRepository::new());
        repository.always_conflict.store(true, Ordering::SeqCst);

        let service = create_service(repository.clone());

        let profile = test_profile("100", "alice", 1);
        let result = service.verify_and_upsert(&profile).await;

        assert!(matches!(result, Err(AppError::InternalServerErrorWithContext(_))));
    }
}

use crate::auth::{JwtManager, PkcePair};
use crate::services::identity::profile::{resolve_profile, ProfileHint};
use crate::services::identity::twitter_oauth::DynIdentityProvider;
use crate::services::identity::DynIdentityService;
use crate::services::member::MembershipStatus;
use crate::services::referral::DynReferralService;
use async_trait::async_trait;
use database::member::model::WaitlistMember;
use std::sync::Arc;
use tracing::{info, warn};
use utils::{AppError, AppResult};

pub type DynSignupService = Arc<dyn SignupServiceTrait + Send + Sync>;

/// 登录回调处理完成后的结果
#[derive(Debug, Clone)]
pub struct CompletedLogin {
    pub member: WaitlistMember,
    pub status: MembershipStatus,
    pub session_token: String,
}

#[async_trait]
pub trait SignupServiceTrait {
    /// 发起登录
    ///
    /// 生成PKCE验证对和续接令牌（OAuth state参数），返回授权跳转地址。
    /// 待归因的邀请码随令牌带出，服务端不保存任何中间状态。
    fn begin_login(&self, pending_ref: Option<&str>) -> AppResult<String>;

    /// 回调续接
    ///
    /// 校验续接令牌 → 授权码换token → 拉取资料 → 归一化 → 落库 →
    /// 归因（如有待处理邀请码，失败不阻断登录）→ 签发会话令牌。
    async fn complete_login(&self, code: &str, state: &str) -> AppResult<CompletedLogin>;
}

pub struct SignupService {
    provider: DynIdentityProvider,
    identity: DynIdentityService,
    referral: DynReferralService,
    jwt_manager: Arc<JwtManager>,
}

impl SignupService {
    pub fn new(
        provider: DynIdentityProvider,
        identity: DynIdentityService,
        referral: DynReferralService,
        jwt_manager: Arc<JwtManager>,
    ) -> Self {
        Self {
            provider,
            identity,
            referral,
            jwt_manager,
        }
    }
}

#[async_trait]
impl SignupServiceTrait for SignupService {
    fn begin_login(&self, pending_ref: Option<&str>) -> AppResult<String> {
        let pkce = PkcePair::generate();
        let state = self.jwt_manager.generate_signup_state_token(pending_ref, &pkce.verifier)?;
        let url = self.provider.authorize_url(&state, &pkce.challenge);

        info!("🚀 发起Twitter登录跳转: pending_ref={:?}", pending_ref);
        Ok(url)
    }

    async fn complete_login(&self, code: &str, state: &str) -> AppResult<CompletedLogin> {
        // 1. 续接令牌校验失败（过期、伪造、签发者不符）时登录作废
        let claims = self.jwt_manager.verify_signup_state_token(state).map_err(|e| {
            warn!("⚠️ 续接令牌校验失败: {}", e);
            AppError::Unauthorized
        })?;

        // 2. 授权码换token，verifier从续接令牌里恢复
        let token = self.provider.exchange_code(code, &claims.verifier).await?;

        // 3. 拉取并归一化用户资料
        let payload = self.provider.fetch_profile(&token.access_token).await?;
        let profile = resolve_profile(&payload, &ProfileHint::default())?;

        // 4. 落库：新成员插入，老成员刷新画像
        let (mut member, is_new) = self.identity.verify_and_upsert(&profile).await?;

        // 5. 邀请归因：只在携带了待处理邀请码且尚未绑定时执行，
        //    无效码/自我邀请等失败不阻断登录
        if let Some(pending) = claims.pending_ref.as_deref().filter(|c| !c.is_empty()) {
            if member.referred_by.is_none() {
                match self.referral.attribute(&member.twitter_id, pending).await {
                    Ok(outcome) => member = outcome.member,
                    Err(e) => warn!("⚠️ 邀请归因失败（登录继续）: code={} err={}", pending, e),
                }
            }
        }

        // 6. 状态以钱包为准：没留钱包的老成员仍是new
        let status = MembershipStatus::of(Some(&member));

        let session_token = self.jwt_manager.generate_session_token(&member.twitter_id, &member.handle)?;

        info!(
            "🟢 登录完成: handle={} status={} is_new={}",
            member.handle,
            status.as_str(),
            is_new
        );

        Ok(CompletedLogin {
            member,
            status,
            session_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthConfig;
    use crate::services::identity::IdentityService;
    use crate::services::referral::ReferralService;
    use crate::services::test_support::{test_member, MockIdentityProvider, MockMemberRepository};
    use std::sync::atomic::Ordering;

    fn create_test_config() -> AuthConfig {
        AuthConfig {
            session_secret: "test_secret_key_for_signup_testing".to_string(),
            session_expires_in_hours: 24,
            signup_state_ttl_minutes: 10,
            auth_disabled: false,
        }
    }

    struct TestHarness {
        repository: Arc<MockMemberRepository>,
        provider: Arc<MockIdentityProvider>,
        jwt_manager: Arc<JwtManager>,
        service: SignupService,
    }

    fn create_harness(provider: MockIdentityProvider) -> TestHarness {
        let repository = Arc::new(MockMemberRepository::new());
        let provider = Arc::new(provider);
        let jwt_manager = Arc::new(JwtManager::new(create_test_config()));

        let identity = Arc::new(IdentityService::new(repository.clone())) as DynIdentityService;
        let referral = Arc::new(ReferralService::new(repository.clone())) as DynReferralService;
        let service = SignupService::new(
            provider.clone() as DynIdentityProvider,
            identity,
            referral,
            jwt_manager.clone(),
        );

        TestHarness {
            repository,
            provider,
            jwt_manager,
            service,
        }
    }

    /// 从Mock授权地址中取出state参数
    fn state_from_url(url: &str) -> String {
        let start = url.find("state=").unwrap() + "state=".len();
        let end = url[start..].find('&').map(|i| start + i).unwrap_or(url.len());
        url[start..end].to_string()
    }

    #[tokio::test]
    async fn test_full_signup_flow_with_referral() {
        let harness = create_harness(MockIdentityProvider::with_user("100", "Alice", 1500));
        harness.repository.insert(test_member("1", "referrer", "refcode1"));

        let authorize_url = harness.service.begin_login(Some("refcode1")).unwrap();
        let state = state_from_url(&authorize_url);

        let login = harness.service.complete_login("auth-code", &state).await.unwrap();

        assert_eq!(login.member.twitter_id, "100");
        assert_eq!(login.member.handle, "alice");
        assert_eq!(login.member.referred_by, Some("1".to_string()));
        assert_eq!(login.status, MembershipStatus::New);

        let claims = harness.jwt_manager.verify_session_token(&login.session_token).unwrap();
        assert_eq!(claims.sub, "100");
        assert_eq!(claims.handle, "alice");
    }

    #[tokio::test]
    async fn test_signup_without_referral() {
        let harness = create_harness(MockIdentityProvider::with_user("100", "bob", 10));

        let authorize_url = harness.service.begin_login(None).unwrap();
        let state = state_from_url(&authorize_url);

        let login = harness.service.complete_login("auth-code", &state).await.unwrap();

        assert_eq!(login.member.referred_by, None);
        assert_eq!(login.status, MembershipStatus::New);
        assert_eq!(harness.repository.len(), 1);
    }

    #[tokio::test]
    async fn test_returning_member_with_wallet_is_existing() {
        let harness = create_harness(MockIdentityProvider::with_user("100", "alice", 2000));
        let mut seeded = test_member("100", "alice", "alice123");
        seeded.wallet_address = Some("0xCAFE".to_string());
        harness.repository.insert(seeded);

        let authorize_url = harness.service.begin_login(None).unwrap();
        let state = state_from_url(&authorize_url);

        let login = harness.service.complete_login("auth-code", &state).await.unwrap();

        assert_eq!(login.status, MembershipStatus::Existing);
        // 登录刷新了画像
        assert_eq!(login.member.follower_count, 2000);
        // 原有字段保留
        assert_eq!(login.member.referral_code, "alice123");
    }

    #[tokio::test]
    async fn test_invalid_state_rejected() {
        let harness = create_harness(MockIdentityProvider::with_user("100", "alice", 1));

        let result = harness.service.complete_login("auth-code", "not-a-valid-state").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
        assert_eq!(harness.repository.len(), 0);
    }

    #[tokio::test]
    async fn test_state_signed_by_other_secret_rejected() {
        let harness = create_harness(MockIdentityProvider::with_user("100", "alice", 1));
        let foreign_manager = JwtManager::new(AuthConfig {
            session_secret: "some_other_secret_entirely".to_string(),
            ..create_test_config()
        });
        let foreign_state = foreign_manager.generate_signup_state_token(None, "v").unwrap();

        let result = harness.service.complete_login("auth-code", &foreign_state).await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_invalid_referral_code_does_not_block_login() {
        let harness = create_harness(MockIdentityProvider::with_user("100", "alice", 1));

        let authorize_url = harness.service.begin_login(Some("nosuchcd")).unwrap();
        let state = state_from_url(&authorize_url);

        let login = harness.service.complete_login("auth-code", &state).await.unwrap();

        assert_eq!(login.member.referred_by, None);
        assert_eq!(harness.repository.len(), 1);
    }

    #[tokio::test]
    async fn test_own_code_is_not_applied() {
        let harness = create_harness(MockIdentityProvider::with_user("100", "alice", 1));
        harness.repository.insert(test_member("100", "alice", "alice123"));

        let authorize_url = harness.service.begin_login(Some("alice123")).unwrap();
        let state = state_from_url(&authorize_url);

        let login = harness.service.complete_login("auth-code", &state).await.unwrap();

        assert_eq!(login.member.referred_by, None);
        assert_eq!(login.status, MembershipStatus::New);
    }

    #[tokio::test]
    async fn test_existing_attribution_never_overwritten() {
        let harness = create_harness(MockIdentityProvider::with_user("100", "alice", 1));
        harness.repository.insert(test_member("1", "first", "first123"));
        harness.repository.insert(test_member("2", "second", "second12"));
        let mut seeded = test_member("100", "alice", "alice123");
        seeded.referred_by = Some("1".to_string());
        harness.repository.insert(seeded);

        let authorize_url = harness.service.begin_login(Some("second12")).unwrap();
        let state = state_from_url(&authorize_url);

        let login = harness.service.complete_login("auth-code", &state).await.unwrap();

        assert_eq!(login.member.referred_by, Some("1".to_string()));
    }

    #[tokio::test]
    async fn test_token_exchange_failure_aborts() {
        let provider = MockIdentityProvider::with_user("100", "alice", 1);
        provider.fail_exchange.store(true, Ordering::SeqCst);
        let harness = create_harness(provider);

        let authorize_url = harness.service.begin_login(None).unwrap();
        let state = state_from_url(&authorize_url);

        let result = harness.service.complete_login("auth-code", &state).await;

        assert!(result.is_err());
        assert_eq!(harness.repository.len(), 0);
    }

    #[tokio::test]
    async fn test_profile_fetch_failure_aborts() {
        let provider = MockIdentityProvider::with_user("100", "alice", 1);
        provider.fail_profile.store(true, Ordering::SeqCst);
        let harness = create_harness(provider);

        let authorize_url = harness.service.begin_login(None).unwrap();
        let state = state_from_url(&authorize_url);

        let result = harness.service.complete_login("auth-code", &state).await;

        assert!(result.is_err());
        assert_eq!(harness.repository.len(), 0);
    }
}

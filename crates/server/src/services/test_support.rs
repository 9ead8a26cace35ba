//! 测试辅助：内存版仓储与身份提供方

use crate::services::identity::profile::{TwitterProfilePayload, TwitterUserFields};
use crate::services::identity::twitter_oauth::{IdentityProviderTrait, TwitterTokenResponse};
use async_trait::async_trait;
use database::member::model::{MemberProfile, WaitlistMember};
use database::member::repository::MemberRepositoryTrait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use utils::{AppError, AppResult};

/// 内存版成员仓储，按twitter_id索引
#[derive(Default)]
pub struct MockMemberRepository {
    pub members: Mutex<HashMap<String, WaitlistMember>>,
    /// 写操作直接失败，模拟存储故障
    pub fail_writes: AtomicBool,
    /// create_member永远返回冲突且不落库，模拟撞码重试耗尽
    pub always_conflict: AtomicBool,
    /// 下一次create_member先插入该成员再返回冲突，模拟输掉并发竞争
    pub conflict_with: Mutex<Option<WaitlistMember>>,
}

impl MockMemberRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, member: WaitlistMember) {
        self.members
            .lock()
            .unwrap()
            .insert(member.twitter_id.clone(), member);
    }

    pub fn get(&self, twitter_id: &str) -> Option<WaitlistMember> {
        self.members.lock().unwrap().get(twitter_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.members.lock().unwrap().len()
    }

    fn check_write(&self) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::InternalServerErrorWithContext(
                "mock write failure".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl MemberRepositoryTrait for MockMemberRepository {
    async fn create_member(&self, member: WaitlistMember) -> AppResult<WaitlistMember> {
        self.check_write()?;

        if self.always_conflict.load(Ordering::SeqCst) {
            return Err(AppError::Conflict("duplicate key".to_string()));
        }

        if let Some(winner) = self.conflict_with.lock().unwrap().take() {
            self.insert(winner);
            return Err(AppError::Conflict("duplicate key".to_string()));
        }

        let mut members = self.members.lock().unwrap();
        if members.contains_key(&member.twitter_id) {
            return Err(AppError::Conflict(format!(
                "Member with twitter_id: {} already exists.",
                member.twitter_id
            )));
        }
        if members.values().any(|m| m.referral_code == member.referral_code) {
            return Err(AppError::Conflict(format!(
                "Member with referral_code: {} already exists.",
                member.referral_code
            )));
        }

        members.insert(member.twitter_id.clone(), member.clone());
        Ok(member)
    }

    async fn find_by_twitter_id(&self, twitter_id: &str) -> AppResult<Option<WaitlistMember>> {
        Ok(self.get(twitter_id))
    }

    async fn find_by_referral_code(&self, code: &str) -> AppResult<Option<WaitlistMember>> {
        let members = self.members.lock().unwrap();
        Ok(members.values().find(|m| m.referral_code == code).cloned())
    }

    async fn refresh_profile(&self, twitter_id: &str, profile: &MemberProfile) -> AppResult<Option<WaitlistMember>> {
        self.check_write()?;

        let mut members = self.members.lock().unwrap();
        match members.get_mut(twitter_id) {
            Some(member) => {
                member.handle = profile.handle.clone();
                member.display_name = profile.display_name.clone();
                member.avatar_url = profile.avatar_url.clone();
                member.follower_count = profile.follower_count;
                member.is_verified = profile.is_verified;
                Ok(Some(member.clone()))
            }
            None => Ok(None),
        }
    }

    async fn set_wallet_address(&self, twitter_id: &str, wallet_address: &str) -> AppResult<Option<WaitlistMember>> {
        self.check_write()?;

        let mut members = self.members.lock().unwrap();
        match members.get_mut(twitter_id) {
            Some(member) => {
                member.wallet_address = Some(wallet_address.to_string());
                Ok(Some(member.clone()))
            }
            None => Ok(None),
        }
    }

    async fn attribute_referral(&self, twitter_id: &str, referrer_twitter_id: &str) -> AppResult<bool> {
        self.check_write()?;

        let mut members = self.members.lock().unwrap();
        match members.get_mut(twitter_id) {
            Some(member) if member.referred_by.is_none() => {
                member.referred_by = Some(referrer_twitter_id.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn count_members(&self) -> AppResult<u64> {
        Ok(self.members.lock().unwrap().len() as u64)
    }

    async fn count_members_since(&self, cutoff: u64) -> AppResult<u64> {
        let members = self.members.lock().unwrap();
        Ok(members.values().filter(|m| m.created_at >= cutoff).count() as u64)
    }

    async fn top_by_follower_count(&self, limit: i64) -> AppResult<Vec<WaitlistMember>> {
        let members = self.members.lock().unwrap();
        let mut all: Vec<WaitlistMember> = members.values().cloned().collect();
        all.sort_by(|a, b| b.follower_count.cmp(&a.follower_count));
        all.truncate(limit.max(0) as usize);
        Ok(all)
    }
}

/// 内存版身份提供方
pub struct MockIdentityProvider {
    pub payload: Mutex<TwitterProfilePayload>,
    pub fail_exchange: AtomicBool,
    pub fail_profile: AtomicBool,
}

impl MockIdentityProvider {
    pub fn with_user(twitter_id: &str, username: &str, followers: u64) -> Self {
        let payload = TwitterProfilePayload {
            data: Some(TwitterUserFields {
                id: Some(twitter_id.to_string()),
                username: Some(username.to_string()),
                name: Some(format!("{} Display", username)),
                profile_image_url: Some(format!("https://pbs.twimg.com/{}.png", username)),
                public_metrics: Some(crate::services::identity::profile::PublicMetrics {
                    followers_count: Some(followers),
                    following_count: None,
                    tweet_count: None,
                    listed_count: None,
                }),
                verified: Some(false),
            }),
            flat: TwitterUserFields::default(),
        };

        Self {
            payload: Mutex::new(payload),
            fail_exchange: AtomicBool::new(false),
            fail_profile: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl IdentityProviderTrait for MockIdentityProvider {
    fn authorize_url(&self, state: &str, code_challenge: &str) -> String {
        format!(
            "https://provider.test/authorize?state={}&code_challenge={}",
            state, code_challenge
        )
    }

    async fn exchange_code(&self, _code: &str, _verifier: &str) -> AppResult<TwitterTokenResponse> {
        if self.fail_exchange.load(Ordering::SeqCst) {
            return Err(AppError::InternalServerErrorWithContext(
                "mock token exchange failure".to_string(),
            ));
        }
        Ok(TwitterTokenResponse {
            access_token: "mock-access-token".to_string(),
            token_type: Some("bearer".to_string()),
            expires_in: Some(7200),
            scope: Some("tweet.read users.read".to_string()),
        })
    }

    async fn fetch_profile(&self, _access_token: &str) -> AppResult<TwitterProfilePayload> {
        if self.fail_profile.load(Ordering::SeqCst) {
            return Err(AppError::InternalServerErrorWithContext(
                "mock profile fetch failure".to_string(),
            ));
        }
        Ok(self.payload.lock().unwrap().clone())
    }
}

/// 构造测试用的成员资料
pub fn test_profile(twitter_id: &str, handle: &str, followers: u64) -> MemberProfile {
    MemberProfile {
        twitter_id: twitter_id.to_string(),
        handle: handle.to_string(),
        display_name: format!("{} Display", handle),
        avatar_url: format!("https://pbs.twimg.com/{}.png", handle),
        follower_count: followers,
        is_verified: false,
    }
}

/// 构造测试用的成员记录
pub fn test_member(twitter_id: &str, handle: &str, code: &str) -> WaitlistMember {
    WaitlistMember::from_profile(&test_profile(twitter_id, handle, 100), code)
}

use crate::{
    member::model::{MemberProfile, WaitlistMember},
    Database,
};
use async_trait::async_trait;
use mongodb::{bson::doc, options::FindOptions};
use std::sync::Arc;
use utils::{AppError, AppResult};

pub type DynMemberRepository = Arc<dyn MemberRepositoryTrait + Send + Sync>;

// 主要用于Service中，表示提供了该Trait功能
#[async_trait]
pub trait MemberRepositoryTrait {
    // 新成员入库（twitter_id已存在时返回Conflict，邀请码冲突由唯一索引兜底）
    async fn create_member(&self, member: WaitlistMember) -> AppResult<WaitlistMember>;

    async fn find_by_twitter_id(&self, twitter_id: &str) -> AppResult<Option<WaitlistMember>>;

    async fn find_by_referral_code(&self, code: &str) -> AppResult<Option<WaitlistMember>>;

    // 每次登录时用最新的身份快照覆盖资料字段，邀请码/钱包/邀请人保持不变
    async fn refresh_profile(&self, twitter_id: &str, profile: &MemberProfile) -> AppResult<Option<WaitlistMember>>;

    async fn set_wallet_address(&self, twitter_id: &str, wallet_address: &str) -> AppResult<Option<WaitlistMember>>;

    // 仅在referred_by尚未设置时写入；返回是否真正发生了写入
    async fn attribute_referral(&self, twitter_id: &str, referrer_twitter_id: &str) -> AppResult<bool>;

    async fn count_members(&self) -> AppResult<u64>;

    // 统计cutoff时间戳之后注册的成员数
    async fn count_members_since(&self, cutoff: u64) -> AppResult<u64>;

    // 按粉丝数从高到低取前limit名
    async fn top_by_follower_count(&self, limit: i64) -> AppResult<Vec<WaitlistMember>>;
}

#[async_trait]
impl MemberRepositoryTrait for Database {
    async fn create_member(&self, member: WaitlistMember) -> AppResult<WaitlistMember> {
        let existing_member = self
            .members
            .find_one(doc! { "twitter_id": &member.twitter_id }, None)
            .await?;

        if existing_member.is_some() {
            return Err(AppError::Conflict(format!(
                "Member with twitter_id: {} already exists.",
                member.twitter_id
            )));
        }

        self.members.insert_one(&member, None).await?;

        Ok(member)
    }

    async fn find_by_twitter_id(&self, twitter_id: &str) -> AppResult<Option<WaitlistMember>> {
        let filter = doc! { "twitter_id": twitter_id };
        let member = self.members.find_one(filter, None).await?;

        Ok(member)
    }

    async fn find_by_referral_code(&self, code: &str) -> AppResult<Option<WaitlistMember>> {
        let filter = doc! { "referral_code": code };
        let member = self.members.find_one(filter, None).await?;

        Ok(member)
    }

    async fn refresh_profile(&self, twitter_id: &str, profile: &MemberProfile) -> AppResult<Option<WaitlistMember>> {
        let filter = doc! { "twitter_id": twitter_id };
        // follower_count与created_at一样按f64落库，避免NumberLong包装
        let update = doc! {
            "$set": {
                "handle": &profile.handle,
                "display_name": &profile.display_name,
                "avatar_url": &profile.avatar_url,
                "follower_count": profile.follower_count as f64,
                "is_verified": profile.is_verified,
            }
        };

        let result = self.members.update_one(filter.clone(), update, None).await?;
        if result.matched_count == 0 {
            return Ok(None);
        }

        Ok(self.members.find_one(filter, None).await?)
    }

    async fn set_wallet_address(&self, twitter_id: &str, wallet_address: &str) -> AppResult<Option<WaitlistMember>> {
        let filter = doc! { "twitter_id": twitter_id };
        let update = doc! { "$set": { "wallet_address": wallet_address } };

        let result = self.members.update_one(filter.clone(), update, None).await?;
        if result.matched_count == 0 {
            return Ok(None);
        }

        Ok(self.members.find_one(filter, None).await?)
    }

    async fn attribute_referral(&self, twitter_id: &str, referrer_twitter_id: &str) -> AppResult<bool> {
        // referred_by只允许从未设置变为已设置，条件更新保证并发下也不会覆盖
        let filter = doc! { "twitter_id": twitter_id, "referred_by": null };
        let update = doc! { "$set": { "referred_by": referrer_twitter_id } };

        let result = self.members.update_one(filter, update, None).await?;

        Ok(result.modified_count > 0)
    }

    async fn count_members(&self) -> AppResult<u64> {
        let count = self.members.count_documents(doc! {}, None).await?;

        Ok(count)
    }

    async fn count_members_since(&self, cutoff: u64) -> AppResult<u64> {
        let filter = doc! { "created_at": { "$gte": cutoff as f64 } };
        let count = self.members.count_documents(filter, None).await?;

        Ok(count)
    }

    async fn top_by_follower_count(&self, limit: i64) -> AppResult<Vec<WaitlistMember>> {
        let options = FindOptions::builder()
            .sort(doc! { "follower_count": -1 })
            .limit(limit)
            .build();

        let mut cursor = self.members.find(doc! {}, options).await?;
        let mut members = Vec::new();

        while cursor.advance().await? {
            members.push(cursor.deserialize_current()?);
        }

        Ok(members)
    }
}

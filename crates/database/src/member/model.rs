use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 候补名单成员模型
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct WaitlistMember {
    /// MongoDB文档ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub id: Option<ObjectId>,
    /// Twitter用户ID（唯一身份键，所有查询和更新都以它为准）
    pub twitter_id: String,
    /// Twitter用户名（展示用，不作为查询键）
    pub handle: String,
    /// 显示名称
    pub display_name: String,
    /// 头像地址
    pub avatar_url: String,
    /// 粉丝数
    #[serde(with = "mongodb::bson::serde_helpers::u64_as_f64")]
    pub follower_count: u64,
    /// 是否为认证账号
    pub is_verified: bool,
    /// 绑定的钱包地址（未填写时为空）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    /// 邀请码（4-8位小写字母数字，唯一）
    #[validate(length(min = 4, max = 8))]
    pub referral_code: String,
    /// 邀请人的twitter_id，写入后不再变更
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referred_by: Option<String>,
    /// 注册时间戳
    #[serde(with = "mongodb::bson::serde_helpers::u64_as_f64")]
    pub created_at: u64,
}

/// 归一化后的身份快照，每次登录时从身份提供方拉取
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProfile {
    pub twitter_id: String,
    pub handle: String,
    pub display_name: String,
    pub avatar_url: String,
    pub follower_count: u64,
    pub is_verified: bool,
}

impl WaitlistMember {
    /// 由身份快照和已生成的邀请码构建新成员
    pub fn from_profile(profile: &MemberProfile, referral_code: &str) -> Self {
        Self {
            id: None,
            twitter_id: profile.twitter_id.clone(),
            handle: profile.handle.clone(),
            display_name: profile.display_name.clone(),
            avatar_url: profile.avatar_url.clone(),
            follower_count: profile.follower_count,
            is_verified: profile.is_verified,
            wallet_address: None,
            referral_code: referral_code.to_string(),
            referred_by: None,
            created_at: Utc::now().timestamp() as u64,
        }
    }

    pub fn has_wallet(&self) -> bool {
        self.wallet_address.as_deref().map(|w| !w.is_empty()).unwrap_or(false)
    }
}

//! Twitter用户资料归一化模块
//!
//! 负责将Twitter API返回的用户JSON归一化为内部的MemberProfile

use database::member::model::MemberProfile;
use serde::{Deserialize, Serialize};
use utils::{AppError, AppResult};

/// Twitter用户公开指标
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct PublicMetrics {
    pub followers_count: Option<u64>,
    pub following_count: Option<u64>,
    pub tweet_count: Option<u64>,
    pub listed_count: Option<u64>,
}

/// Twitter用户字段（/2/users/me的data对象，或旧格式的顶层对象）
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct TwitterUserFields {
    pub id: Option<String>,
    pub username: Option<String>,
    pub name: Option<String>,
    pub profile_image_url: Option<String>,
    pub public_metrics: Option<PublicMetrics>,
    pub verified: Option<bool>,
}

/// Twitter用户资料响应
///
/// v2 API把用户字段包在data对象里，部分代理/旧格式直接平铺在顶层，
/// 两种形态都要兼容。
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct TwitterProfilePayload {
    pub data: Option<TwitterUserFields>,
    #[serde(flatten)]
    pub flat: TwitterUserFields,
}

/// OAuth会话中已知的用户信息，字段缺失时的兜底来源
#[derive(Clone, Debug, Default)]
pub struct ProfileHint {
    pub id: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
}

/// 取第一个非空字符串，空字符串视为缺失继续向后兜底
fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|s| !s.is_empty()).cloned()
}

/// 将Twitter资料归一化为MemberProfile
///
/// 每个字段按固定优先级取第一个非空值（空字符串视为缺失）：
/// 1. data.* （v2标准形态）
/// 2. 顶层平铺字段
/// 3. hint（OAuth会话兜底）
/// 4. 默认值：handle="unknown"，display_name="Unknown User"，
///    avatar_url=""，follower_count=0，is_verified=false
///
/// twitter_id是唯一身份键，三层都取不到时拒绝登录。
pub fn resolve_profile(payload: &TwitterProfilePayload, hint: &ProfileHint) -> AppResult<MemberProfile> {
    let data = payload.data.as_ref();
    let flat = &payload.flat;

    let twitter_id = non_empty(data.and_then(|d| d.id.as_ref()))
        .or_else(|| non_empty(flat.id.as_ref()))
        .or_else(|| non_empty(hint.id.as_ref()))
        .ok_or_else(|| AppError::BadRequest("Twitter profile has no user id".to_string()))?;

    let handle = non_empty(data.and_then(|d| d.username.as_ref()))
        .or_else(|| non_empty(flat.username.as_ref()))
        .or_else(|| non_empty(hint.name.as_ref()))
        .unwrap_or_else(|| "unknown".to_string());

    let display_name = non_empty(data.and_then(|d| d.name.as_ref()))
        .or_else(|| non_empty(flat.name.as_ref()))
        .or_else(|| non_empty(hint.name.as_ref()))
        .unwrap_or_else(|| "Unknown User".to_string());

    let avatar_url = non_empty(data.and_then(|d| d.profile_image_url.as_ref()))
        .or_else(|| non_empty(flat.profile_image_url.as_ref()))
        .or_else(|| non_empty(hint.image.as_ref()))
        .unwrap_or_default();

    let follower_count = data
        .and_then(|d| d.public_metrics.as_ref())
        .and_then(|m| m.followers_count)
        .or_else(|| flat.public_metrics.as_ref().and_then(|m| m.followers_count))
        .unwrap_or(0);

    let is_verified = data
        .and_then(|d| d.verified)
        .or(flat.verified)
        .unwrap_or(false);

    Ok(MemberProfile {
        twitter_id,
        // 统一存储形式：去掉@前缀并小写
        handle: handle.trim_start_matches('@').to_ascii_lowercase(),
        display_name,
        avatar_url,
        follower_count,
        is_verified,
    })
}

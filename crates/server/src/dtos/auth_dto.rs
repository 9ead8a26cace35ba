use crate::dtos::member_dto::MemberDto;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 发起登录的查询参数
#[derive(Clone, Serialize, Deserialize, Debug, Default, ToSchema)]
pub struct LoginParams {
    /// 邀请码（优先级高于pending_ref Cookie）
    #[serde(rename = "ref")]
    pub ref_code: Option<String>,
}

/// OAuth回调的查询参数
#[derive(Clone, Serialize, Deserialize, Debug, Default, ToSchema)]
pub struct CallbackParams {
    /// 授权码
    pub code: Option<String>,
    /// 续接令牌（发起登录时作为state带出）
    pub state: Option<String>,
    /// 用户拒绝授权等场景下Twitter回传的错误码
    pub error: Option<String>,
}

/// 会话探测响应体
///
/// 未登录时返回200而非401，status为unknown，前端凭此展示登录入口。
#[derive(Clone, Serialize, Deserialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub authenticated: bool,
    /// unknown | new | existing
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<MemberDto>,
    /// 本人的邀请链接，形如 {app_url}/ref/{referral_code}
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_link: Option<String>,
}

/// 登出响应体
#[derive(Clone, Serialize, Deserialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub success: bool,
}

use crate::dtos::member_dto::MemberDto;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 绑定邀请关系的请求体
#[derive(Clone, Serialize, Deserialize, Debug, Validate, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttributeReferralDto {
    /// 邀请码
    #[validate(required, length(min = 1))]
    pub referral_code: Option<String>,
}

/// 绑定邀请关系的响应体
#[derive(Clone, Serialize, Deserialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttributionResponse {
    pub success: bool,
    /// 邀请人的Twitter用户名
    pub referrer: String,
    /// 本次请求是否实际写入了邀请关系（已绑定过的成员为false）
    pub applied: bool,
    pub member: MemberDto,
}

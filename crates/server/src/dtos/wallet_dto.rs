use crate::dtos::member_dto::MemberDto;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 提交钱包地址的请求体
#[derive(Clone, Serialize, Deserialize, Debug, Validate, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWalletDto {
    /// 钱包地址
    #[validate(required, length(min = 1))]
    pub wallet_address: Option<String>,
}

/// 提交钱包地址的响应体
#[derive(Clone, Serialize, Deserialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalletUpdateResponse {
    pub success: bool,
    pub member: MemberDto,
}

use crate::auth::AuthSession;
use crate::dtos::wallet_dto::{UpdateWalletDto, WalletUpdateResponse};
use crate::extractors::validation_extractor::ValidationExtractor;
use crate::services::Services;
use axum::{routing::post, Extension, Json, Router};
use utils::AppResult;

pub struct WalletController;

impl WalletController {
    pub fn app() -> Router {
        Router::new().route("/wallet/update", post(update_wallet))
    }
}

/// 提交钱包地址
///
/// 写入当前登录成员的钱包地址；完成后该成员的状态变为existing。
/// 跳过钱包这一步的用户不会调用本接口。
#[utoipa::path(
    post,
    path = "/api/v1/wallet/update",
    tag = "wallet",
    request_body = UpdateWalletDto,
    responses(
        (status = 200, description = "钱包地址已更新", body = WalletUpdateResponse),
        (status = 400, description = "钱包地址缺失"),
        (status = 401, description = "未登录"),
        (status = 404, description = "当前会话对应的成员记录不存在"),
        (status = 500, description = "存储层失败")
    )
)]
pub async fn update_wallet(
    Extension(services): Extension<Services>,
    session: AuthSession,
    ValidationExtractor(req): ValidationExtractor<UpdateWalletDto>,
) -> AppResult<Json<WalletUpdateResponse>> {
    // required校验已保证Some
    let wallet_address = req.wallet_address.unwrap_or_default();

    let member = services.member.update_wallet(&session.twitter_id, &wallet_address).await?;

    Ok(Json(WalletUpdateResponse {
        success: true,
        member: member.into(),
    }))
}

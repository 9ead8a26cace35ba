pub mod auth_controller;
pub mod landing_controller;
pub mod referral_controller;
pub mod waitlist_controller;
pub mod wallet_controller;


use axum::routing::{get, Router};

/// 系统健康检查
///
/// 返回服务器运行状态
#[utoipa::path(
    get,
    path = "/api/v1/",
    responses(
        (status = 200, description = "服务器运行正常", body = String)
    ),
    tag = "系统状态"
)]
pub async fn health() -> &'static str {
    "Server is running! 🚀"
}

/// /api/v1下的全部业务路由；邀请着陆页挂在根路径，见router.rs
pub fn app() -> Router {
    Router::new()
        .route("/", get(health))
        .merge(auth_controller::AuthController::app())
        .merge(referral_controller::ReferralController::app())
        .merge(wallet_controller::WalletController::app())
        .merge(waitlist_controller::WaitlistController::app())
}

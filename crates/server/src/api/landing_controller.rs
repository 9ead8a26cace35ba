use crate::auth::PENDING_REF_COOKIE;
use crate::services::Services;
use axum::{extract::Path, response::Redirect, routing::get, Extension, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::info;

/// 邀请着陆控制器
///
/// 挂在根路径而非/api/v1下，用户拿到的邀请链接就是 {app_url}/ref/{code}。
pub struct LandingController;

impl LandingController {
    pub fn app() -> Router {
        Router::new().route("/ref/:code", get(referral_landing))
    }
}

/// 邀请链接着陆
///
/// 把路径里的邀请码种进pending_ref Cookie后跳回首页，
/// 后续发起登录时由认证流程带走并在回调中完成归因。
#[utoipa::path(
    get,
    path = "/ref/{code}",
    tag = "landing",
    params(
        ("code" = String, Path, description = "邀请码")
    ),
    responses(
        (status = 307, description = "种下pending_ref Cookie后跳回首页")
    )
)]
pub async fn referral_landing(
    Extension(services): Extension<Services>,
    Path(code): Path<String>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    info!("🔗 邀请着陆: code={}", code);

    // 会话级Cookie，浏览器关闭即失效，贴近来源页面的sessionStorage语义
    let pending_cookie = Cookie::build((PENDING_REF_COOKIE, code))
        .path("/")
        .same_site(SameSite::Lax)
        .build();

    (jar.add(pending_cookie), Redirect::temporary(&services.config.app_url))
}

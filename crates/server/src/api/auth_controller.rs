use crate::auth::{AuthSession, PENDING_REF_COOKIE, SESSION_COOKIE};
use crate::dtos::auth_dto::{CallbackParams, LoginParams, LogoutResponse, SessionResponse};
use crate::dtos::member_dto::MemberDto;
use crate::services::member::MembershipStatus;
use crate::services::Services;
use axum::{
    extract::Query,
    response::Redirect,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;
use tracing::warn;
use utils::AppResult;

/// 认证控制器
///
/// 覆盖完整的OAuth往返：发起登录跳转、回调续接、会话探测、登出。
/// 登录中间态全部压进state参数里的续接令牌，服务端无状态。
pub struct AuthController;

impl AuthController {
    pub fn app() -> Router {
        Router::new()
            .route("/auth/login", get(login))
            .route("/auth/callback", get(callback))
            .route("/auth/session", get(session))
            .route("/auth/logout", post(logout))
    }
}

/// 发起Twitter登录
///
/// 生成PKCE验证对与续接令牌后跳转到Twitter授权页。
/// 待归因邀请码优先取查询参数ref，其次取着陆页种下的pending_ref Cookie。
#[utoipa::path(
    get,
    path = "/api/v1/auth/login",
    tag = "auth",
    params(
        ("ref" = Option<String>, Query, description = "邀请码，优先级高于pending_ref Cookie")
    ),
    responses(
        (status = 307, description = "跳转到Twitter授权页")
    )
)]
pub async fn login(
    Extension(services): Extension<Services>,
    Query(params): Query<LoginParams>,
    jar: CookieJar,
) -> AppResult<Redirect> {
    let pending_ref = params
        .ref_code
        .clone()
        .filter(|c| !c.is_empty())
        .or_else(|| jar.get(PENDING_REF_COOKIE).map(|c| c.value().to_string()))
        .filter(|c| !c.is_empty());

    let authorize_url = services.signup.begin_login(pending_ref.as_deref())?;

    Ok(Redirect::temporary(&authorize_url))
}

/// Twitter回调续接
///
/// 凭state里的续接令牌恢复登录上下文：换token、拉取资料、落库、
/// 归因（如有待处理邀请码）、签发会话Cookie，最后跳回前端。
/// 浏览器侧任何失败都降级为 {app_url}/?login=failed 跳转，绝不渲染5xx。
#[utoipa::path(
    get,
    path = "/api/v1/auth/callback",
    tag = "auth",
    params(
        ("code" = Option<String>, Query, description = "Twitter授权码"),
        ("state" = Option<String>, Query, description = "发起登录时带出的续接令牌"),
        ("error" = Option<String>, Query, description = "用户拒绝授权等场景的错误码")
    ),
    responses(
        (status = 307, description = "跳回前端，query携带login=success&status=…或login=failed")
    )
)]
pub async fn callback(
    Extension(services): Extension<Services>,
    Query(params): Query<CallbackParams>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let app_url = services.config.app_url.clone();

    // 用户在授权页点了拒绝等情况，Twitter带error参数回跳
    if let Some(error) = params.error.as_deref() {
        warn!("⚠️ Twitter回调携带错误参数: {}", error);
        return (jar, failed_redirect(&app_url));
    }

    let (Some(code), Some(state)) = (params.code.as_deref(), params.state.as_deref()) else {
        warn!("⚠️ Twitter回调缺少code或state参数");
        return (jar, failed_redirect(&app_url));
    };

    match services.signup.complete_login(code, state).await {
        Ok(login) => {
            let session_cookie = Cookie::build((SESSION_COOKIE, login.session_token.clone()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .max_age(Duration::hours(
                    services.jwt_manager.config().session_expires_in_hours as i64,
                ))
                .build();

            // 邀请码已随续接令牌消费过一次，清除着陆页Cookie
            let jar = jar
                .add(session_cookie)
                .remove(Cookie::build(PENDING_REF_COOKIE).path("/").build());

            let target = format!("{}/?login=success&status={}", app_url, login.status.as_str());
            (jar, Redirect::temporary(&target))
        }
        Err(e) => {
            warn!("🔴 登录回调处理失败: {}", e);
            (jar, failed_redirect(&app_url))
        }
    }
}

/// 会话探测
///
/// 前端据此渲染join按钮的三种形态。未登录返回200而非401，
/// status=unknown本身就是"未登录"的业务答案。
#[utoipa::path(
    get,
    path = "/api/v1/auth/session",
    tag = "auth",
    responses(
        (status = 200, description = "当前会话状态", body = SessionResponse)
    )
)]
pub async fn session(
    Extension(services): Extension<Services>,
    session: Option<AuthSession>,
) -> AppResult<Json<SessionResponse>> {
    let Some(session) = session else {
        return Ok(Json(SessionResponse {
            authenticated: false,
            status: MembershipStatus::Unknown.as_str().to_string(),
            member: None,
            referral_link: None,
        }));
    };

    let member = services.member.get_member(&session.twitter_id).await?;
    // 成员记录缺失时按new处理，走一遍正常注册即可恢复
    let status = MembershipStatus::of(member.as_ref());
    let referral_link = member
        .as_ref()
        .map(|m| format!("{}/ref/{}", services.config.app_url, m.referral_code));

    Ok(Json(SessionResponse {
        authenticated: true,
        status: status.as_str().to_string(),
        member: member.map(MemberDto::from),
        referral_link,
    }))
}

/// 登出
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "会话Cookie已清除", body = LogoutResponse)
    )
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/").build());

    (jar, Json(LogoutResponse { success: true }))
}

fn failed_redirect(app_url: &str) -> Redirect {
    Redirect::temporary(&format!("{}/?login=failed", app_url))
}

use crate::auth::{AuthSession, JwtManager, TokenExtractor};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts, Extension};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use utils::AppError;

/// 会话Cookie名称
pub const SESSION_COOKIE: &str = "waitlist_session";
/// 着陆页邀请码Cookie名称（登录成功后清除）
pub const PENDING_REF_COOKIE: &str = "pending_ref";

/// 会话提取器
///
/// 受保护的接口直接以参数形式声明`session: AuthSession`即可，
/// 未认证请求统一返回401。探测类接口用`Option<AuthSession>`。
///
/// 令牌来源按顺序尝试：
/// 1. Authorization头部的Bearer令牌
/// 2. 会话Cookie
#[async_trait]
impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(jwt_manager) = Extension::<Arc<JwtManager>>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::InternalServerError)?;

        // 检查认证开关
        if jwt_manager.config().auth_disabled {
            tracing::info!("🔓 认证已禁用，创建匿名会话直接通过");
            return Ok(AuthSession {
                twitter_id: "anonymous".to_string(),
                handle: "anonymous".to_string(),
            });
        }

        // 尝试从Authorization头部提取Bearer令牌
        let bearer_token =
            TokenExtractor::extract_bearer_token(parts.headers.get("authorization").and_then(|v| v.to_str().ok()));

        // 如果没有Bearer令牌，尝试从会话Cookie提取
        let cookie_token = if bearer_token.is_none() {
            let jar = CookieJar::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::InternalServerError)?;
            jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string())
        } else {
            None
        };

        let token = bearer_token.or(cookie_token).ok_or(AppError::Unauthorized)?;

        match jwt_manager.verify_session_token(&token) {
            Ok(claims) => Ok(AuthSession::from(claims)),
            Err(e) => {
                tracing::warn!("Session token verification failed: {}", e);
                Err(AppError::Unauthorized)
            }
        }
    }
}

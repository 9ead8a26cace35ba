use serde::{Deserialize, Serialize};

/// 会话令牌Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// 成员的twitter_id（唯一身份键）
    pub sub: String,
    /// Twitter用户名（展示用）
    pub handle: String,
    /// 过期时间
    pub exp: u64,
    /// 签发时间
    pub iat: u64,
    /// 签发者
    pub iss: String,
}

/// OAuth往返续接令牌Claims
///
/// 登录跳转时作为state参数带出，回调时凭它恢复登录上下文，
/// 浏览器端不需要保存任何中间状态。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupStateClaims {
    /// 随机nonce，防止state被跨流程复用
    pub sub: String,
    /// 待绑定的邀请码（可选）
    pub pending_ref: Option<String>,
    /// PKCE code_verifier，回调换token时使用
    pub verifier: String,
    /// 过期时间
    pub exp: u64,
    /// 签发时间
    pub iat: u64,
    /// 签发者
    pub iss: String,
}

/// 已认证的会话信息，由提取器写入请求处理流程
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub twitter_id: String,
    pub handle: String,
}

impl From<SessionClaims> for AuthSession {
    fn from(claims: SessionClaims) -> Self {
        Self {
            twitter_id: claims.sub,
            handle: claims.handle,
        }
    }
}

/// 认证配置
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub session_secret: String,
    pub session_expires_in_hours: u64,
    /// OAuth往返续接令牌的有效期（分钟）
    pub signup_state_ttl_minutes: u64,
    /// 认证开关：true时禁用认证，false时启用认证
    pub auth_disabled: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_secret: std::env::var("SESSION_SECRET").expect("SESSION_SECRET environment variable is required"),
            session_expires_in_hours: std::env::var("SESSION_EXPIRES_IN_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .unwrap_or(24),
            signup_state_ttl_minutes: std::env::var("SIGNUP_STATE_TTL_MINUTES")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            auth_disabled: std::env::var("AUTH_DISABLED")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        }
    }
}

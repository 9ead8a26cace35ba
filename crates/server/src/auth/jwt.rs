use crate::auth::models::{AuthConfig, SessionClaims, SignupStateClaims};
use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

/// 会话令牌签发者
const SESSION_ISSUER: &str = "waitlist-api";
/// OAuth续接令牌签发者，与会话令牌隔离使用
const SIGNUP_STATE_ISSUER: &str = "waitlist-signup";

/// JWT令牌管理器
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: AuthConfig,
}

impl JwtManager {
    /// 创建新的JWT管理器
    pub fn new(config: AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.session_secret.as_ref());
        let decoding_key = DecodingKey::from_secret(config.session_secret.as_ref());

        Self {
            encoding_key,
            decoding_key,
            config,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// 生成会话令牌（登录成功后写入Cookie）
    pub fn generate_session_token(&self, twitter_id: &str, handle: &str) -> Result<String> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.config.session_expires_in_hours as i64);

        let claims = SessionClaims {
            sub: twitter_id.to_string(),
            handle: handle.to_string(),
            exp: expires_at.timestamp() as u64,
            iat: now.timestamp() as u64,
            iss: SESSION_ISSUER.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| anyhow!("Failed to generate session token: {}", e))
    }

    /// 验证会话令牌
    pub fn verify_session_token(&self, token: &str) -> Result<SessionClaims> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| anyhow!("Invalid session token: {}", e))?;

        // 检查令牌是否过期
        let now = Utc::now().timestamp() as u64;
        if token_data.claims.exp < now {
            return Err(anyhow!("Session token has expired"));
        }

        // 续接令牌不能当作会话令牌使用
        if token_data.claims.iss != SESSION_ISSUER {
            return Err(anyhow!("Invalid session token issuer"));
        }

        Ok(token_data.claims)
    }

    /// 生成OAuth续接令牌
    ///
    /// 发起登录时生成，作为OAuth的state参数携带完整的登录上下文：
    /// 1. pending_ref - 着陆页带来的邀请码，回调时完成归因
    /// 2. verifier - PKCE code_verifier，回调换token时使用
    /// 3. sub - 每次登录独立的随机nonce
    ///
    /// 服务端不保存任何中间状态，回调凭此令牌恢复现场。
    pub fn generate_signup_state_token(&self, pending_ref: Option<&str>, verifier: &str) -> Result<String> {
        let now = Utc::now();
        let expires_at = now + Duration::minutes(self.config.signup_state_ttl_minutes as i64);

        let claims = SignupStateClaims {
            sub: Uuid::new_v4().to_string(),
            pending_ref: pending_ref.map(|c| c.to_string()),
            verifier: verifier.to_string(),
            exp: expires_at.timestamp() as u64,
            iat: now.timestamp() as u64,
            iss: SIGNUP_STATE_ISSUER.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| anyhow!("Failed to generate signup state token: {}", e))
    }

    /// 验证OAuth续接令牌（回调时恢复登录上下文）
    pub fn verify_signup_state_token(&self, token: &str) -> Result<SignupStateClaims> {
        let token_data = decode::<SignupStateClaims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| anyhow!("Invalid signup state token: {}", e))?;

        let now = Utc::now().timestamp() as u64;
        if token_data.claims.exp < now {
            return Err(anyhow!("Signup state token has expired"));
        }

        if token_data.claims.iss != SIGNUP_STATE_ISSUER {
            return Err(anyhow!("Invalid signup state token issuer"));
        }

        Ok(token_data.claims)
    }
}

/// JWT令牌提取器
pub struct TokenExtractor;

impl TokenExtractor {
    /// 从Authorization头部提取Bearer令牌
    pub fn extract_bearer_token(auth_header: Option<&str>) -> Option<String> {
        auth_header
            .and_then(|header| header.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
    }
}

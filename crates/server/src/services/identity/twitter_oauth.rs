//! Twitter OAuth2客户端
//!
//! 授权码+PKCE(S256)流程：authorize跳转 → code换token → 拉取用户资料

use crate::services::identity::profile::TwitterProfilePayload;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use utils::{AppConfig, AppError, AppResult};

/// Twitter授权页地址
const AUTHORIZE_URL: &str = "https://twitter.com/i/oauth2/authorize";
/// token交换端点
const TOKEN_URL: &str = "https://api.twitter.com/2/oauth2/token";
/// 当前用户资料端点
const USERS_ME_URL: &str = "https://api.twitter.com/2/users/me";
/// 申请的授权范围
const OAUTH_SCOPE: &str = "tweet.read users.read";

pub type DynIdentityProvider = Arc<dyn IdentityProviderTrait + Send + Sync>;

/// 身份提供方抽象，测试中用内存实现替换
#[async_trait]
pub trait IdentityProviderTrait {
    /// 构造授权跳转地址
    fn authorize_url(&self, state: &str, code_challenge: &str) -> String;

    /// 用授权码换取access token
    async fn exchange_code(&self, code: &str, verifier: &str) -> AppResult<TwitterTokenResponse>;

    /// 拉取当前用户资料
    async fn fetch_profile(&self, access_token: &str) -> AppResult<TwitterProfilePayload>;
}

/// token交换响应
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct TwitterTokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
    pub scope: Option<String>,
}

/// Twitter OAuth2客户端
pub struct TwitterOAuthProvider {
    client: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl TwitterOAuthProvider {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            client_id: config.twitter_client_id.clone(),
            client_secret: config.twitter_client_secret.clone(),
            redirect_uri: config.twitter_redirect_uri.clone(),
        })
    }
}

#[async_trait]
impl IdentityProviderTrait for TwitterOAuthProvider {
    fn authorize_url(&self, state: &str, code_challenge: &str) -> String {
        format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&scope={}&state={}&code_challenge={}&code_challenge_method=S256",
            AUTHORIZE_URL,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(OAUTH_SCOPE),
            urlencoding::encode(state),
            urlencoding::encode(code_challenge),
        )
    }

    async fn exchange_code(&self, code: &str, verifier: &str) -> AppResult<TwitterTokenResponse> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("code_verifier", verifier),
            ("client_id", self.client_id.as_str()),
        ];

        let response = self
            .client
            .post(TOKEN_URL)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::InternalServerErrorWithContext(format!("Token exchange request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("🔴 Twitter token交换失败: status={} body={}", status, body);
            return Err(AppError::InternalServerErrorWithContext(format!(
                "Token exchange failed with status {}",
                status
            )));
        }

        let token = response
            .json::<TwitterTokenResponse>()
            .await
            .map_err(|e| AppError::InternalServerErrorWithContext(format!("Invalid token response: {}", e)))?;

        Ok(token)
    }

    async fn fetch_profile(&self, access_token: &str) -> AppResult<TwitterProfilePayload> {
        let response = self
            .client
            .get(USERS_ME_URL)
            .query(&[("user.fields", "public_metrics,verified,profile_image_url")])
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::InternalServerErrorWithContext(format!("Profile request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!("🔴 Twitter用户资料拉取失败: status={}", status);
            return Err(AppError::InternalServerErrorWithContext(format!(
                "Profile fetch failed with status {}",
                status
            )));
        }

        let payload = response
            .json::<TwitterProfilePayload>()
            .await
            .map_err(|e| AppError::InternalServerErrorWithContext(format!("Invalid profile response: {}", e)))?;

        debug!("📥 已拉取Twitter用户资料");
        Ok(payload)
    }
}

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// PKCE验证对（OAuth授权码流程防拦截）
///
/// verifier随续接令牌带出，challenge随授权跳转带出，
/// 回调换token时Twitter校验两者匹配。
#[derive(Debug, Clone)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

impl PkcePair {
    /// 生成新的PKCE验证对（S256方式）
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let verifier = URL_SAFE_NO_PAD.encode(bytes);

        let challenge = Self::challenge_for(&verifier);

        Self { verifier, challenge }
    }

    /// 计算verifier对应的S256 challenge
    pub fn challenge_for(verifier: &str) -> String {
        let digest = Sha256::digest(verifier.as_bytes());
        URL_SAFE_NO_PAD.encode(digest)
    }
}

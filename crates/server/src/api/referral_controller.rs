use crate::auth::AuthSession;
use crate::dtos::referral_dto::{AttributeReferralDto, AttributionResponse};
use crate::extractors::validation_extractor::ValidationExtractor;
use crate::services::Services;
use axum::{routing::post, Extension, Json, Router};
use utils::AppResult;

pub struct ReferralController;

impl ReferralController {
    pub fn app() -> Router {
        Router::new().route("/referral/attribute", post(attribute_referral))
    }
}

/// 绑定邀请关系
///
/// 把请求体里的邀请码归因到当前登录成员。已绑定过的成员返回200
/// 但applied=false，存量归因永不覆盖。
#[utoipa::path(
    post,
    path = "/api/v1/referral/attribute",
    tag = "referral",
    request_body = AttributeReferralDto,
    responses(
        (status = 200, description = "归因成功或已绑定（applied区分）", body = AttributionResponse),
        (status = 400, description = "邀请码缺失、无效或为本人邀请码"),
        (status = 401, description = "未登录"),
        (status = 404, description = "当前会话对应的成员记录不存在"),
        (status = 500, description = "存储层失败")
    )
)]
pub async fn attribute_referral(
    Extension(services): Extension<Services>,
    session: AuthSession,
    ValidationExtractor(req): ValidationExtractor<AttributeReferralDto>,
) -> AppResult<Json<AttributionResponse>> {
    // required校验已保证Some
    let code = req.referral_code.unwrap_or_default();

    let outcome = services.referral.attribute(&session.twitter_id, code.trim()).await?;

    Ok(Json(AttributionResponse {
        success: true,
        referrer: outcome.referrer_handle,
        applied: outcome.applied,
        member: outcome.member.into(),
    }))
}

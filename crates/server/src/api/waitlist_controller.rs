use crate::dtos::waitlist_dto::{LeaderboardEntry, LeaderboardResponse, WaitlistStatsResponse};
use crate::services::Services;
use axum::{routing::get, Extension, Json, Router};
use utils::AppResult;

pub struct WaitlistController;

impl WaitlistController {
    pub fn app() -> Router {
        Router::new()
            .route("/waitlist/stats", get(get_stats))
            .route("/waitlist/members", get(get_members))
    }
}

/// 候补名单统计
///
/// 成员总数与最近24小时新增数，着陆页计数器轮询本接口。
#[utoipa::path(
    get,
    path = "/api/v1/waitlist/stats",
    tag = "waitlist",
    responses(
        (status = 200, description = "统计数据", body = WaitlistStatsResponse)
    )
)]
pub async fn get_stats(Extension(services): Extension<Services>) -> AppResult<Json<WaitlistStatsResponse>> {
    let stats = services.member.get_stats().await?;

    Ok(Json(WaitlistStatsResponse {
        total_members: stats.total_members,
        recent_signups: stats.recent_signups,
    }))
}

/// 排行榜
///
/// 按粉丝数降序的前N名成员，只含公开展示字段。
#[utoipa::path(
    get,
    path = "/api/v1/waitlist/members",
    tag = "waitlist",
    responses(
        (status = 200, description = "排行榜成员列表", body = LeaderboardResponse)
    )
)]
pub async fn get_members(Extension(services): Extension<Services>) -> AppResult<Json<LeaderboardResponse>> {
    let members = services.member.get_leaderboard(services.config.leaderboard_limit).await?;

    Ok(Json(LeaderboardResponse {
        members: members.into_iter().map(LeaderboardEntry::from).collect(),
    }))
}

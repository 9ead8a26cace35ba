use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Waitlist Backend API",
        description = "基于 Rust 和 Axum 的候补名单注册系统 API 文档：Twitter登录、邀请归因、钱包采集与排行榜",
        version = "1.0.0",
        contact(
            name = "API Support"
        )
    ),
    paths(
        // System health check
        crate::api::health,
        // Auth endpoints
        crate::api::auth_controller::login,
        crate::api::auth_controller::callback,
        crate::api::auth_controller::session,
        crate::api::auth_controller::logout,
        // Referral endpoints
        crate::api::referral_controller::attribute_referral,
        // Wallet endpoints
        crate::api::wallet_controller::update_wallet,
        // Waitlist endpoints
        crate::api::waitlist_controller::get_stats,
        crate::api::waitlist_controller::get_members,
        // Landing redirect
        crate::api::landing_controller::referral_landing,
    ),
    components(
        schemas(
            // Database models
            database::member::model::WaitlistMember,
            // DTOs
            crate::dtos::auth_dto::SessionResponse,
            crate::dtos::auth_dto::LogoutResponse,
            crate::dtos::member_dto::MemberDto,
            crate::dtos::referral_dto::AttributeReferralDto,
            crate::dtos::referral_dto::AttributionResponse,
            crate::dtos::wallet_dto::UpdateWalletDto,
            crate::dtos::wallet_dto::WalletUpdateResponse,
            crate::dtos::waitlist_dto::WaitlistStatsResponse,
            crate::dtos::waitlist_dto::LeaderboardEntry,
            crate::dtos::waitlist_dto::LeaderboardResponse,
        )
    ),
    tags(
        (name = "系统状态", description = "系统健康检查和状态监控"),
        (name = "auth", description = "Twitter OAuth登录与会话管理"),
        (name = "referral", description = "邀请归因"),
        (name = "wallet", description = "钱包地址采集"),
        (name = "waitlist", description = "候补名单统计与排行榜"),
        (name = "landing", description = "邀请链接着陆页")
    )
)]
pub struct ApiDoc;

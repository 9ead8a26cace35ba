////////////////////////////////////////////////////////////////////////
//
// 1. 每个业务域单独一个文件夹
// 2. Service只依赖Dyn*抽象，测试中可整体替换为内存实现
//
//////////////////////////////////////////////////////////////////////

pub mod identity;
pub mod member;
pub mod referral;
pub mod signup;

#[cfg(test)]
pub mod test_support;

use crate::auth::{AuthConfig, JwtManager};
use anyhow::Result;
use database::Database;
use identity::twitter_oauth::{DynIdentityProvider, TwitterOAuthProvider};
use identity::{DynIdentityService, IdentityService};
use member::{DynMemberService, MemberService};
use referral::{DynReferralService, ReferralService};
use signup::{DynSignupService, SignupService};
use std::sync::Arc;
use tracing::{error, info, warn};
use utils::AppConfig;

#[derive(Clone)]
pub struct Services {
    pub member: DynMemberService,
    pub referral: DynReferralService,
    pub signup: DynSignupService,
    pub jwt_manager: Arc<JwtManager>,
    pub config: Arc<AppConfig>,
    pub database: Arc<Database>,
}

impl Services {
    pub fn new(db: Database, config: Arc<AppConfig>) -> Result<Self> {
        let database = Arc::new(db);
        let jwt_manager = Arc::new(JwtManager::new(AuthConfig::default()));

        let identity = Arc::new(IdentityService::new(database.clone())) as DynIdentityService;
        let referral = Arc::new(ReferralService::new(database.clone())) as DynReferralService;
        let member = Arc::new(MemberService::new(database.clone())) as DynMemberService;

        let provider = Arc::new(TwitterOAuthProvider::new(&config)?) as DynIdentityProvider;
        let signup = Arc::new(SignupService::new(
            provider,
            identity,
            referral.clone(),
            jwt_manager.clone(),
        )) as DynSignupService;

        let services = Self {
            member,
            referral,
            signup,
            jwt_manager,
            config,
            database,
        };

        // 启动时初始化成员集合索引，失败不阻塞启动
        if let Err(e) = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(services.database.init_member_indexes())
        }) {
            error!("❌ 成员索引初始化失败: {}", e);
            warn!("⚠️ 继续启动服务，唯一性约束可能缺失");
        }

        info!("🧠 Services initialized");
        Ok(services)
    }
}

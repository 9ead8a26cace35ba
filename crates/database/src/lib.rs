////////////////////////////////////////////////////////////////////////
//
// 1. 每个Domain(Entity)单独一个文件夹
// 2. 每个Domain由两部分组成:
//    - model: 定义Schema
//    - repository: 实际的数据库底层操作
//
//////////////////////////////////////////////////////////////////////

use mongodb::{bson::doc, options::IndexOptions, Client, Collection, IndexModel};
use std::sync::Arc;
use tracing::info;
use utils::{AppConfig, AppResult};

pub mod member;

pub use member::model::{MemberProfile, WaitlistMember};
pub use member::repository::{DynMemberRepository, MemberRepositoryTrait};

#[derive(Clone, Debug)]
pub struct Database {
    pub members: Collection<member::model::WaitlistMember>,
}

impl Database {
    pub async fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let client = Client::with_uri_str(&config.mongo_uri).await?;
        let db: mongodb::Database = client.database(&config.mongo_db);

        let members = db.collection("WaitlistMember");

        info!("🧱 database({:#}) connected.", &config.mongo_db);

        Ok(Database { members })
    }

    /// 初始化成员集合索引
    pub async fn init_member_indexes(&self) -> AppResult<()> {
        info!("🔧 初始化WaitlistMember数据库索引...");

        let indexes = vec![
            // twitter_id唯一索引 (身份主键)
            IndexModel::builder()
                .keys(doc! { "twitter_id": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
            // 邀请码唯一索引
            IndexModel::builder()
                .keys(doc! { "referral_code": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
            // 注册时间索引 (近24小时统计用)
            IndexModel::builder().keys(doc! { "created_at": -1 }).build(),
            // 粉丝数索引 (排行榜排序用)
            IndexModel::builder().keys(doc! { "follower_count": -1 }).build(),
        ];

        self.members.create_indexes(indexes, None).await?;

        info!("✅ WaitlistMember数据库索引初始化完成");
        Ok(())
    }
}

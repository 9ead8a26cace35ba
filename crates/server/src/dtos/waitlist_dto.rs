use database::member::model::WaitlistMember;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 候补名单统计响应体
#[derive(Clone, Serialize, Deserialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistStatsResponse {
    /// 成员总数
    pub total_members: u64,
    /// 最近24小时新增人数
    pub recent_signups: u64,
}

/// 排行榜条目（仅公开字段，钱包地址本身不对外暴露）
#[derive(Clone, Serialize, Deserialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub handle: String,
    pub display_name: String,
    pub avatar_url: String,
    pub follower_count: u64,
    /// 粉丝数的紧凑展示形式，如1.2M、3.4K
    pub followers_label: String,
    pub is_verified: bool,
    /// 是否已提交钱包地址
    pub has_wallet: bool,
}

impl From<WaitlistMember> for LeaderboardEntry {
    fn from(member: WaitlistMember) -> Self {
        let has_wallet = member.has_wallet();
        Self {
            followers_label: format_followers(member.follower_count),
            handle: member.handle,
            display_name: member.display_name,
            avatar_url: member.avatar_url,
            follower_count: member.follower_count,
            is_verified: member.is_verified,
            has_wallet,
        }
    }
}

/// 排行榜响应体
#[derive(Clone, Serialize, Deserialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub members: Vec<LeaderboardEntry>,
}

/// 粉丝数紧凑格式化：百万级"1.2M"，千级"3.4K"，其余原样
pub fn format_followers(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

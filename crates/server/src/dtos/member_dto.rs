use database::member::model::WaitlistMember;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 成员信息响应体
#[derive(Clone, Serialize, Deserialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberDto {
    pub twitter_id: String,
    pub handle: String,
    pub display_name: String,
    pub avatar_url: String,
    pub follower_count: u64,
    pub is_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    pub referral_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referred_by: Option<String>,
    pub created_at: u64,
}

impl From<WaitlistMember> for MemberDto {
    fn from(member: WaitlistMember) -> Self {
        Self {
            twitter_id: member.twitter_id,
            handle: member.handle,
            display_name: member.display_name,
            avatar_url: member.avatar_url,
            follower_count: member.follower_count,
            is_verified: member.is_verified,
            wallet_address: member.wallet_address,
            referral_code: member.referral_code,
            referred_by: member.referred_by,
            created_at: member.created_at,
        }
    }
}

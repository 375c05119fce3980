use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 获奖条目（开奖结果与结果页共用）
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WinnerResponse {
    pub entry_id: i64,
    pub rank: i32,
    /// "1st" / "2nd" / "3rd"
    pub rank_display: String,
    pub pet_name: String,
    pub owner_username: String,
    pub photo: String,
}

/// 一次成功开奖的结果
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DrawOutcome {
    pub round_id: i64,
    pub drawn_at: DateTime<Utc>,
    pub winner_count: u32,
    /// 按名次升序
    pub winners: Vec<WinnerResponse>,
}

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 审核状态; 只有 APPROVED 的参赛记录才参与开奖
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryStatus::Pending => write!(f, "PENDING"),
            EntryStatus::Approved => write!(f, "APPROVED"),
            EntryStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// 参赛记录实体
/// - (pet_id, round_id) 唯一
/// - winner_rank 仅在 is_winner=true 时有值，同一轮内取值 1..N 无空洞无重复
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub pet_id: i64,
    pub round_id: i64,
    /// 照片存储引用（上传与格式校验由外围负责）
    pub photo: String,
    pub status: EntryStatus,
    pub is_winner: bool,
    pub winner_rank: Option<i32>,
    pub submitted_at: DateTime<Utc>,
}

impl Model {
    /// 名次的序数展示: 1st / 2nd / 3rd / Nth
    pub fn rank_display(&self) -> String {
        match self.winner_rank {
            None => String::new(),
            Some(1) => "1st".to_string(),
            Some(2) => "2nd".to_string(),
            Some(3) => "3rd".to_string(),
            Some(n) => format!("{n}th"),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

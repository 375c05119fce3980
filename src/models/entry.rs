use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{EntryStatus, entry_entity, pet_entity, round_entity};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitEntryRequest {
    #[schema(example = "Bella")]
    pub pet_name: String,
    #[schema(example = "Golden Retriever")]
    pub pet_breed: Option<String>,
    #[schema(example = 2)]
    pub pet_age_number: i32,
    #[schema(example = "year(s)")]
    pub pet_age_unit: String,
    /// 照片存储引用（上传/校验由外围完成后传入）
    #[schema(example = "pet_entries/bella.png")]
    pub photo: String,
}

/// 审核动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ModerationDecision {
    Approve,
    Reject,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EntryResponse {
    pub id: i64,
    pub round_id: i64,
    pub round_title: String,
    pub pet_name: String,
    pub photo: String,
    pub status: EntryStatus,
    pub is_winner: bool,
    pub winner_rank: Option<i32>,
    pub submitted_at: DateTime<Utc>,
}

impl EntryResponse {
    pub fn from_parts(
        entry: entry_entity::Model,
        pet: &pet_entity::Model,
        round: &round_entity::Model,
    ) -> Self {
        EntryResponse {
            id: entry.id,
            round_id: entry.round_id,
            round_title: round.title.clone(),
            pet_name: pet.name.clone(),
            photo: entry.photo,
            status: entry.status,
            is_winner: entry.is_winner,
            winner_rank: entry.winner_rank,
            submitted_at: entry.submitted_at,
        }
    }
}

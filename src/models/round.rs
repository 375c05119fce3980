use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{RoundStatus, round_entity};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateRoundRequest {
    #[schema(example = "Spring Pet Photo Lottery")]
    pub title: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoundResponse {
    pub id: i64,
    pub title: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: RoundStatus,
    pub drawn_at: Option<DateTime<Utc>>,
}

impl From<round_entity::Model> for RoundResponse {
    fn from(m: round_entity::Model) -> Self {
        RoundResponse {
            id: m.id,
            title: m.title,
            start_date: m.start_date,
            end_date: m.end_date,
            status: m.status,
            drawn_at: m.drawn_at,
        }
    }
}

/// 已完成轮次及其按名次排序的获奖名单
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoundResultsResponse {
    pub round: RoundResponse,
    pub winners: Vec<super::WinnerResponse>,
}

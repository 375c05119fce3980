use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::notification_entity;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificationResponse {
    pub id: i64,
    pub round_id: Option<i64>,
    pub message: String,
    pub dismissed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<notification_entity::Model> for NotificationResponse {
    fn from(m: notification_entity::Model) -> Self {
        NotificationResponse {
            id: m.id,
            round_id: m.round_id,
            message: m.message,
            dismissed: m.dismissed,
            created_at: m.created_at,
        }
    }
}

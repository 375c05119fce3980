use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateCommentRequest {
    #[schema(example = "What a good boy!")]
    pub text: String,
}

/// 评论分页查询参数（结果页每个获奖作品默认每页 3 条）
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CommentListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CommentResponse {
    pub id: i64,
    pub entry_id: i64,
    pub author_username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 错误响应里 error 字段的形状（成功响应为 {"success": true, "data": ...}）
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

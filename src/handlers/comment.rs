use super::get_user_id_from_request;
use crate::error::AppError;
use crate::models::*;
use crate::services::CommentService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/entries/{entry_id}/comments",
    tag = "comments",
    params(
        ("entry_id" = i64, Path, description = "参赛记录ID"),
        ("page" = Option<u32>, Query, description = "页码 (默认1)"),
        ("per_page" = Option<u32>, Query, description = "每页数量 (默认3)")
    ),
    responses(
        (status = 200, description = "评论分页，最新在前", body = PaginatedResponse<CommentResponse>),
        (status = 404, description = "条目不存在")
    )
)]
/// 游客可见：获奖作品的评论区
pub async fn list_comments(
    service: web::Data<CommentService>,
    path: web::Path<i64>,
    query: web::Query<CommentListQuery>,
) -> Result<HttpResponse> {
    match service
        .list_comments(path.into_inner(), &query.into_inner())
        .await
    {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": page }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/entries/{entry_id}/comments",
    tag = "comments",
    params(("entry_id" = i64, Path, description = "参赛记录ID")),
    request_body = CreateCommentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "评论成功", body = CommentResponse),
        (status = 400, description = "评论内容为空"),
        (status = 404, description = "条目不存在"),
        (status = 409, description = "仅已完成轮次的获奖作品可评论")
    )
)]
pub async fn post_comment(
    service: web::Data<CommentService>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    let Some(user_id) = get_user_id_from_request(&req) else {
        return Ok(AppError::AuthError("Missing access token".to_string()).error_response());
    };
    match service
        .post_comment(path.into_inner(), user_id, body.into_inner())
        .await
    {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn comment_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/entries/{entry_id}/comments", web::get().to(list_comments))
        .route("/entries/{entry_id}/comments", web::post().to(post_comment));
}

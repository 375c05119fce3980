use super::get_user_id_from_request;
use crate::error::AppError;
use crate::models::*;
use crate::services::NotificationService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/notifications",
    tag = "notifications",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "当前用户的通知，最新在前", body = [NotificationResponse]),
        (status = 401, description = "未授权")
    )
)]
pub async fn list_notifications(
    service: web::Data<NotificationService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let Some(user_id) = get_user_id_from_request(&req) else {
        return Ok(AppError::AuthError("Missing access token".to_string()).error_response());
    };
    match service.list_notifications(user_id).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/notifications/{notification_id}/dismiss",
    tag = "notifications",
    params(("notification_id" = i64, Path, description = "通知ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "已标记为已读", body = NotificationResponse),
        (status = 403, description = "不能操作他人的通知"),
        (status = 404, description = "通知不存在")
    )
)]
pub async fn dismiss_notification(
    service: web::Data<NotificationService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let Some(user_id) = get_user_id_from_request(&req) else {
        return Ok(AppError::AuthError("Missing access token".to_string()).error_response());
    };
    match service.dismiss_notification(user_id, path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn notification_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/notifications", web::get().to(list_notifications))
        .route(
            "/notifications/{notification_id}/dismiss",
            web::post().to(dismiss_notification),
        );
}

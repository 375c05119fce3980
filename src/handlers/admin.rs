use super::get_user_id_from_request;
use crate::error::AppError;
use crate::models::*;
use crate::services::{AuthService, DrawService, EntryService, RoundService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

/// 后台接口统一的员工身份校验
async fn require_staff(auth: &AuthService, req: &HttpRequest) -> Result<i64, AppError> {
    let user_id = get_user_id_from_request(req)
        .ok_or_else(|| AppError::AuthError("Missing access token".to_string()))?;
    auth.ensure_staff(user_id).await?;
    Ok(user_id)
}

#[utoipa::path(
    post,
    path = "/admin/rounds",
    tag = "admin",
    request_body = CreateRoundRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "创建轮次成功", body = RoundResponse),
        (status = 400, description = "日期校验失败"),
        (status = 403, description = "非员工")
    )
)]
pub async fn create_round(
    auth: web::Data<AuthService>,
    service: web::Data<RoundService>,
    req: HttpRequest,
    body: web::Json<CreateRoundRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = require_staff(&auth, &req).await {
        return Ok(e.error_response());
    }
    match service.create_round(body.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/moderation",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "待审条目，最早提交在前", body = [EntryResponse]),
        (status = 403, description = "非员工")
    )
)]
pub async fn moderation_queue(
    auth: web::Data<AuthService>,
    service: web::Data<EntryService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    if let Err(e) = require_staff(&auth, &req).await {
        return Ok(e.error_response());
    }
    match service.moderation_queue().await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/moderation/{entry_id}/approve",
    tag = "admin",
    params(("entry_id" = i64, Path, description = "参赛记录ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "审核通过", body = EntryResponse),
        (status = 404, description = "条目不存在"),
        (status = 403, description = "非员工")
    )
)]
pub async fn approve_entry(
    auth: web::Data<AuthService>,
    service: web::Data<EntryService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    if let Err(e) = require_staff(&auth, &req).await {
        return Ok(e.error_response());
    }
    match service
        .moderate_entry(path.into_inner(), ModerationDecision::Approve)
        .await
    {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/moderation/{entry_id}/reject",
    tag = "admin",
    params(("entry_id" = i64, Path, description = "参赛记录ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "审核拒绝", body = EntryResponse),
        (status = 404, description = "条目不存在"),
        (status = 403, description = "非员工")
    )
)]
pub async fn reject_entry(
    auth: web::Data<AuthService>,
    service: web::Data<EntryService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    if let Err(e) = require_staff(&auth, &req).await {
        return Ok(e.error_response());
    }
    match service
        .moderate_entry(path.into_inner(), ModerationDecision::Reject)
        .await
    {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/rounds/{round_id}/draw",
    tag = "admin",
    params(("round_id" = i64, Path, description = "轮次ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "开奖成功", body = DrawOutcome),
        (status = 404, description = "轮次不存在"),
        (status = 409, description = "已开过奖或没有可抽取条目"),
        (status = 403, description = "非员工")
    )
)]
/// 对一个 ACTIVE 轮次开奖；重复调用报 "already drawn" 且不会改动首次结果
pub async fn run_draw(
    auth: web::Data<AuthService>,
    service: web::Data<DrawService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    if let Err(e) = require_staff(&auth, &req).await {
        return Ok(e.error_response());
    }
    match service.run_draw(path.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/rounds", web::post().to(create_round))
            .route("/moderation", web::get().to(moderation_queue))
            .route("/moderation/{entry_id}/approve", web::post().to(approve_entry))
            .route("/moderation/{entry_id}/reject", web::post().to(reject_entry))
            .route("/rounds/{round_id}/draw", web::post().to(run_draw)),
    );
}

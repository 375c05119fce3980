use super::get_user_id_from_request;
use crate::error::AppError;
use crate::models::*;
use crate::services::EntryService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/rounds/{round_id}/entries",
    tag = "entries",
    params(("round_id" = i64, Path, description = "轮次ID")),
    request_body = SubmitEntryRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "报名成功", body = EntryResponse),
        (status = 404, description = "轮次不存在"),
        (status = 409, description = "轮次未开放或该宠物已报名本轮")
    )
)]
/// 报名参赛：同名宠物复用已有记录；每只宠物每轮只能报一次
pub async fn submit_entry(
    service: web::Data<EntryService>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<SubmitEntryRequest>,
) -> Result<HttpResponse> {
    let Some(user_id) = get_user_id_from_request(&req) else {
        return Ok(AppError::AuthError("Missing access token".to_string()).error_response());
    };
    let round_id = path.into_inner();
    match service.submit_entry(user_id, round_id, body.into_inner()).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/my-entries",
    tag = "entries",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "当前用户的参赛记录", body = [EntryResponse]),
        (status = 401, description = "未授权")
    )
)]
pub async fn my_entries(service: web::Data<EntryService>, req: HttpRequest) -> Result<HttpResponse> {
    let Some(user_id) = get_user_id_from_request(&req) else {
        return Ok(AppError::AuthError("Missing access token".to_string()).error_response());
    };
    match service.my_entries(user_id).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn entry_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/rounds/{round_id}/entries", web::post().to(submit_entry))
        .route("/my-entries", web::get().to(my_entries));
}

use crate::models::*;
use crate::services::RoundService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use chrono::Utc;
use serde_json::json;

#[utoipa::path(
    get,
    path = "/rounds",
    tag = "rounds",
    responses(
        (status = 200, description = "当前开放报名的轮次", body = [RoundResponse])
    )
)]
/// 游客可见：当前时间窗口内开放的轮次列表
pub async fn list_active_rounds(service: web::Data<RoundService>) -> Result<HttpResponse> {
    match service.list_active_rounds(Utc::now()).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/results",
    tag = "rounds",
    responses(
        (status = 200, description = "已完成轮次与获奖名单", body = [RoundResultsResponse])
    )
)]
/// 游客可见：往期结果，每轮附带按名次排序的获奖作品
pub async fn list_results(service: web::Data<RoundService>) -> Result<HttpResponse> {
    match service.list_results().await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn round_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/rounds", web::get().to(list_active_rounds))
        .route("/results", web::get().to(list_results));
}

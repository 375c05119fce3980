// 各个测试二进制只用到部分辅助函数
#![allow(dead_code)]

use chrono::{Duration, Utc};
use pawlotto_backend::config::DatabaseConfig;
use pawlotto_backend::database::{create_pool, run_migrations};
use pawlotto_backend::entities::user_entity as users;
use pawlotto_backend::models::{CreateRoundRequest, ModerationDecision, SubmitEntryRequest};
use pawlotto_backend::services::{EntryService, RoundService};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// 每个测试用独立的内存库; 单连接保证所有操作看到同一个库
pub async fn setup_db() -> DatabaseConnection {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    };
    let pool = create_pool(&config).await.expect("failed to open sqlite");
    run_migrations(&pool).await.expect("failed to run migrations");
    pool
}

pub async fn create_user(pool: &DatabaseConnection, username: &str, is_staff: bool) -> i64 {
    let user = users::ActiveModel {
        username: Set(username.to_string()),
        // 这些测试不走登录，哈希无需真实
        password_hash: Set("unused-hash".to_string()),
        is_staff: Set(is_staff),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(pool)
    .await
    .expect("failed to insert user");
    user.id
}

/// 创建一个窗口覆盖当前时间的 ACTIVE 轮次
pub async fn create_open_round(pool: &DatabaseConnection, title: &str) -> i64 {
    let service = RoundService::new(pool.clone());
    let round = service
        .create_round(CreateRoundRequest {
            title: title.to_string(),
            start_date: Utc::now() - Duration::days(1),
            end_date: Utc::now() + Duration::days(1),
        })
        .await
        .expect("failed to create round");
    round.id
}

pub fn entry_request(pet_name: &str) -> SubmitEntryRequest {
    SubmitEntryRequest {
        pet_name: pet_name.to_string(),
        pet_breed: Some("Mixed".to_string()),
        pet_age_number: 2,
        pet_age_unit: "year(s)".to_string(),
        photo: format!("pet_entries/{pet_name}.png"),
    }
}

/// 提交并直接审核通过，返回 entry id
pub async fn submit_approved_entry(
    pool: &DatabaseConnection,
    owner_id: i64,
    round_id: i64,
    pet_name: &str,
) -> i64 {
    let service = EntryService::new(pool.clone());
    let entry = service
        .submit_entry(owner_id, round_id, entry_request(pet_name))
        .await
        .expect("failed to submit entry");
    let approved = service
        .moderate_entry(entry.id, ModerationDecision::Approve)
        .await
        .expect("failed to approve entry");
    approved.id
}

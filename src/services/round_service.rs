use std::collections::HashMap;

use crate::entities::{
    RoundStatus, entry_entity as entries, pet_entity as pets, round_entity as rounds,
    user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::{CreateRoundRequest, RoundResponse, RoundResultsResponse, WinnerResponse};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

#[derive(Clone)]
pub struct RoundService {
    pool: DatabaseConnection,
}

impl RoundService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 创建轮次（员工操作）; 创建即 ACTIVE
    pub async fn create_round(&self, request: CreateRoundRequest) -> AppResult<RoundResponse> {
        let title = request.title.trim().to_string();
        if title.is_empty() || title.len() > 100 {
            return Err(AppError::ValidationError(
                "Title must be between 1 and 100 characters".to_string(),
            ));
        }
        if request.start_date >= request.end_date {
            return Err(AppError::ValidationError(
                "Start date must be before end date".to_string(),
            ));
        }

        let round = rounds::ActiveModel {
            title: Set(title),
            start_date: Set(request.start_date),
            end_date: Set(request.end_date),
            status: Set(RoundStatus::Active),
            drawn_at: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Created round {} ({})", round.id, round.title);
        Ok(round.into())
    }

    /// 当前开放报名的轮次（窗口包含 now），新开的在前
    pub async fn list_active_rounds(&self, now: DateTime<Utc>) -> AppResult<Vec<RoundResponse>> {
        let list = rounds::Entity::find()
            .filter(rounds::Column::Status.eq(RoundStatus::Active))
            .filter(rounds::Column::StartDate.lte(now))
            .filter(rounds::Column::EndDate.gte(now))
            .order_by_desc(rounds::Column::StartDate)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    /// 已完成轮次及按名次排序的获奖名单，最近开奖的在前
    pub async fn list_results(&self) -> AppResult<Vec<RoundResultsResponse>> {
        let completed = rounds::Entity::find()
            .filter(rounds::Column::Status.eq(RoundStatus::Completed))
            .order_by_desc(rounds::Column::DrawnAt)
            .all(&self.pool)
            .await?;

        let mut results = Vec::with_capacity(completed.len());
        for round in completed {
            let winners = self.load_winners(round.id).await?;
            results.push(RoundResultsResponse {
                round: round.into(),
                winners,
            });
        }
        Ok(results)
    }

    /// 某一轮的获奖条目，名次升序，带宠物与主人信息
    pub async fn load_winners(&self, round_id: i64) -> AppResult<Vec<WinnerResponse>> {
        let winner_entries = entries::Entity::find()
            .filter(entries::Column::RoundId.eq(round_id))
            .filter(entries::Column::IsWinner.eq(true))
            .order_by_asc(entries::Column::WinnerRank)
            .all(&self.pool)
            .await?;

        if winner_entries.is_empty() {
            return Ok(vec![]);
        }

        let pet_ids: Vec<i64> = winner_entries.iter().map(|e| e.pet_id).collect();
        let pet_list = pets::Entity::find()
            .filter(pets::Column::Id.is_in(pet_ids))
            .all(&self.pool)
            .await?;
        let owner_ids: Vec<i64> = pet_list.iter().map(|p| p.owner_id).collect();
        let owner_list = users::Entity::find()
            .filter(users::Column::Id.is_in(owner_ids))
            .all(&self.pool)
            .await?;

        let pet_map: HashMap<i64, &pets::Model> = pet_list.iter().map(|p| (p.id, p)).collect();
        let owner_map: HashMap<i64, &users::Model> =
            owner_list.iter().map(|u| (u.id, u)).collect();

        let mut winners = Vec::with_capacity(winner_entries.len());
        for entry in &winner_entries {
            let pet = pet_map.get(&entry.pet_id).ok_or_else(|| {
                AppError::InternalError(format!("Pet {} missing for entry {}", entry.pet_id, entry.id))
            })?;
            let owner = owner_map.get(&pet.owner_id).ok_or_else(|| {
                AppError::InternalError(format!("Owner {} missing for pet {}", pet.owner_id, pet.id))
            })?;
            winners.push(WinnerResponse {
                entry_id: entry.id,
                rank: entry.winner_rank.unwrap_or_default(),
                rank_display: entry.rank_display(),
                pet_name: pet.name.clone(),
                owner_username: owner.username.clone(),
                photo: entry.photo.clone(),
            });
        }
        Ok(winners)
    }
}

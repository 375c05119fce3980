use std::collections::HashMap;

use crate::entities::{
    EntryStatus, entry_entity as entries, pet_entity as pets, round_entity as rounds,
};
use crate::error::{AppError, AppResult};
use crate::models::{EntryResponse, ModerationDecision, SubmitEntryRequest};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};

#[derive(Clone)]
pub struct EntryService {
    pool: DatabaseConnection,
}

impl EntryService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 报名参赛。
    ///
    /// 资格规则（按顺序）:
    /// 1. 轮次必须 ACTIVE 且当前时间在 [start_date, end_date] 内
    /// 2. 按 (owner, name) 复用或创建宠物；带了 breed/age 则顺带更新
    /// 3. 同一宠物同一轮已有记录则拒绝 "already entered"
    ///
    /// 预检查和插入之间存在并发窗口，(pet_id, round_id) 唯一索引是最终仲裁；
    /// 冲突被翻译回同样的 "already entered"，绝不向调用方抛原始存储错误。
    pub async fn submit_entry(
        &self,
        user_id: i64,
        round_id: i64,
        request: SubmitEntryRequest,
    ) -> AppResult<EntryResponse> {
        let pet_name = request.pet_name.trim().to_string();
        if pet_name.is_empty() || pet_name.len() > 50 {
            return Err(AppError::ValidationError(
                "Pet name must be between 1 and 50 characters".to_string(),
            ));
        }
        if request.pet_age_number < 0 {
            return Err(AppError::ValidationError(
                "Age must be 0 or higher".to_string(),
            ));
        }
        if request.pet_age_unit.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Age unit must not be empty".to_string(),
            ));
        }
        if request.photo.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Photo reference must not be empty".to_string(),
            ));
        }

        let round = rounds::Entity::find_by_id(round_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Round {round_id} not found")))?;

        if !round.is_open_at(Utc::now()) {
            return Err(AppError::EligibilityError(
                "Round is not open for entries".to_string(),
            ));
        }

        let pet = self.upsert_pet(user_id, &pet_name, &request).await?;

        // 预检查，让大多数重复提交拿到友好错误
        let existing = entries::Entity::find()
            .filter(entries::Column::PetId.eq(pet.id))
            .filter(entries::Column::RoundId.eq(round_id))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::EligibilityError(
                "This pet has already been entered in this round".to_string(),
            ));
        }

        let insert_result = entries::ActiveModel {
            pet_id: Set(pet.id),
            round_id: Set(round_id),
            photo: Set(request.photo.trim().to_string()),
            status: Set(EntryStatus::Pending),
            is_winner: Set(false),
            winner_rank: Set(None),
            submitted_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await;

        let entry = match insert_result {
            Ok(entry) => entry,
            Err(e) if AppError::is_unique_violation(&e) => {
                return Err(AppError::EligibilityError(
                    "This pet has already been entered in this round".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        log::info!(
            "Entry {} submitted for pet {} in round {}",
            entry.id,
            pet.id,
            round_id
        );
        Ok(EntryResponse::from_parts(entry, &pet, &round))
    }

    /// 当前用户的全部参赛记录，最新提交在前
    pub async fn my_entries(&self, user_id: i64) -> AppResult<Vec<EntryResponse>> {
        let pet_list = pets::Entity::find()
            .filter(pets::Column::OwnerId.eq(user_id))
            .all(&self.pool)
            .await?;
        if pet_list.is_empty() {
            return Ok(vec![]);
        }

        let pet_ids: Vec<i64> = pet_list.iter().map(|p| p.id).collect();
        let entry_list = entries::Entity::find()
            .filter(entries::Column::PetId.is_in(pet_ids))
            .order_by_desc(entries::Column::SubmittedAt)
            .all(&self.pool)
            .await?;

        self.build_responses(entry_list, &pet_list).await
    }

    /// 审核队列: 待审条目，最早提交在前（员工操作）
    pub async fn moderation_queue(&self) -> AppResult<Vec<EntryResponse>> {
        let entry_list = entries::Entity::find()
            .filter(entries::Column::Status.eq(EntryStatus::Pending))
            .order_by_asc(entries::Column::SubmittedAt)
            .all(&self.pool)
            .await?;

        let pet_ids: Vec<i64> = entry_list.iter().map(|e| e.pet_id).collect();
        let pet_list = pets::Entity::find()
            .filter(pets::Column::Id.is_in(pet_ids))
            .all(&self.pool)
            .await?;

        self.build_responses(entry_list, &pet_list).await
    }

    /// 审核参赛记录（员工操作）
    pub async fn moderate_entry(
        &self,
        entry_id: i64,
        decision: ModerationDecision,
    ) -> AppResult<EntryResponse> {
        let entry = entries::Entity::find_by_id(entry_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Entry {entry_id} not found")))?;

        let status = match decision {
            ModerationDecision::Approve => EntryStatus::Approved,
            ModerationDecision::Reject => EntryStatus::Rejected,
        };

        let mut am = entry.into_active_model();
        am.status = Set(status.clone());
        let entry = am.update(&self.pool).await?;

        log::info!("Entry {} moderated: {}", entry.id, status);

        let pet = pets::Entity::find_by_id(entry.pet_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::InternalError(format!("Pet {} missing", entry.pet_id)))?;
        let round = rounds::Entity::find_by_id(entry.round_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::InternalError(format!("Round {} missing", entry.round_id)))?;

        Ok(EntryResponse::from_parts(entry, &pet, &round))
    }

    /// 按 (owner, name) 复用宠物；不存在则创建。
    /// 并发下唯一索引可能先于我们插入成功，此时重读即可。
    async fn upsert_pet(
        &self,
        owner_id: i64,
        name: &str,
        request: &SubmitEntryRequest,
    ) -> AppResult<pets::Model> {
        let breed = request
            .pet_breed
            .as_ref()
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty());

        let existing = pets::Entity::find()
            .filter(pets::Column::OwnerId.eq(owner_id))
            .filter(pets::Column::Name.eq(name))
            .one(&self.pool)
            .await?;

        if let Some(pet) = existing {
            let mut am = pet.into_active_model();
            if breed.is_some() {
                am.breed = Set(breed);
            }
            am.age_number = Set(request.pet_age_number);
            am.age_unit = Set(request.pet_age_unit.trim().to_string());
            return Ok(am.update(&self.pool).await?);
        }

        let insert_result = pets::ActiveModel {
            owner_id: Set(owner_id),
            name: Set(name.to_string()),
            breed: Set(breed),
            age_number: Set(request.pet_age_number),
            age_unit: Set(request.pet_age_unit.trim().to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await;

        match insert_result {
            Ok(pet) => Ok(pet),
            Err(e) if AppError::is_unique_violation(&e) => {
                pets::Entity::find()
                    .filter(pets::Column::OwnerId.eq(owner_id))
                    .filter(pets::Column::Name.eq(name))
                    .one(&self.pool)
                    .await?
                    .ok_or_else(|| {
                        AppError::InternalError("Pet disappeared after conflicting insert".to_string())
                    })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn build_responses(
        &self,
        entry_list: Vec<entries::Model>,
        pet_list: &[pets::Model],
    ) -> AppResult<Vec<EntryResponse>> {
        let round_ids: Vec<i64> = entry_list.iter().map(|e| e.round_id).collect();
        let round_list = rounds::Entity::find()
            .filter(rounds::Column::Id.is_in(round_ids))
            .all(&self.pool)
            .await?;

        let pet_map: HashMap<i64, &pets::Model> = pet_list.iter().map(|p| (p.id, p)).collect();
        let round_map: HashMap<i64, &rounds::Model> =
            round_list.iter().map(|r| (r.id, r)).collect();

        let mut responses = Vec::with_capacity(entry_list.len());
        for entry in entry_list {
            let pet = pet_map.get(&entry.pet_id).ok_or_else(|| {
                AppError::InternalError(format!("Pet {} missing for entry {}", entry.pet_id, entry.id))
            })?;
            let round = round_map.get(&entry.round_id).ok_or_else(|| {
                AppError::InternalError(format!(
                    "Round {} missing for entry {}",
                    entry.round_id, entry.id
                ))
            })?;
            responses.push(EntryResponse::from_parts(entry, pet, round));
        }
        Ok(responses)
    }
}

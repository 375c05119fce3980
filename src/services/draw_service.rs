use std::collections::HashMap;

use crate::entities::{
    EntryStatus, RoundStatus, badge_award_entity as badge_awards, badge_entity as badges,
    entry_entity as entries, notification_entity as notifications, pet_entity as pets,
    round_entity as rounds, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::{DrawOutcome, WinnerResponse};
use chrono::Utc;
use rand::Rng;
use rand::seq::SliceRandom;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    IntoActiveModel, QueryFilter, Set, TransactionTrait,
};

/// 每轮最多产生的获奖名额
pub const MAX_WINNERS: usize = 3;

pub const WINNER_BADGE_NAME: &str = "Winner";
const WINNER_BADGE_DESCRIPTION: &str = "Awarded for winning a round of the pet photo lottery";

#[derive(Clone)]
pub struct DrawService {
    pool: DatabaseConnection,
}

impl DrawService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 开奖（员工操作），整个流程在一个事务内:
    ///
    /// 1. 校验轮次存在且未开奖（drawn_at 为 NULL）
    /// 2. 读取本轮全部 APPROVED 条目; 为空则报 "no eligible entries"，轮次保持 ACTIVE 可重试
    /// 3. winner_count = min(3, 条目数)，等概率不放回抽样（部分 Fisher–Yates），
    ///    按抽出顺序授予名次 1..winner_count
    /// 4. 条件更新 rounds SET status=COMPLETED, drawn_at=now WHERE drawn_at IS NULL
    ///    —— 对 drawn_at 的 CAS 是并发开奖的唯一裁决; 没抢到的事务整体回滚并报 "already drawn"
    /// 5. 写获奖标记与名次
    /// 6. 同事务内扩散: "Winner" 徽章 get-or-create + 获奖者授予记录，
    ///    每位参赛用户一条开奖通知（获奖/安慰两种文案），重复创建被幂等吸收
    ///
    /// 事务要么全部可见要么全部不可见，外部永远看不到 COMPLETED 但扩散残缺的轮次。
    pub async fn run_draw(&self, round_id: i64) -> AppResult<DrawOutcome> {
        let txn = self.pool.begin().await?;

        let round = rounds::Entity::find_by_id(round_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Round {round_id} not found")))?;

        if round.drawn_at.is_some() || round.status == RoundStatus::Completed {
            return Err(AppError::Conflict(
                "Round has already been drawn".to_string(),
            ));
        }

        let eligible = entries::Entity::find()
            .filter(entries::Column::RoundId.eq(round_id))
            .filter(entries::Column::Status.eq(EntryStatus::Approved))
            .all(&txn)
            .await?;

        if eligible.is_empty() {
            return Err(AppError::EligibilityError(
                "No eligible entries to draw from".to_string(),
            ));
        }

        // rng 不能跨 await 持有，抽样放在独立作用域里
        let winner_ids = {
            let mut rng = rand::thread_rng();
            select_winner_ids(eligible.iter().map(|e| e.id).collect(), MAX_WINNERS, &mut rng)
        };

        // drawn_at 的 CAS；0 行受影响说明别的事务先开了奖
        let drawn_at = Utc::now();
        let guard = rounds::Entity::update_many()
            .col_expr(rounds::Column::Status, Expr::value(RoundStatus::Completed))
            .col_expr(rounds::Column::DrawnAt, Expr::value(drawn_at))
            .filter(rounds::Column::Id.eq(round_id))
            .filter(rounds::Column::DrawnAt.is_null())
            .exec(&txn)
            .await?;
        if guard.rows_affected != 1 {
            return Err(AppError::Conflict(
                "Round has already been drawn".to_string(),
            ));
        }

        let entry_map: HashMap<i64, entries::Model> =
            eligible.iter().map(|e| (e.id, e.clone())).collect();

        for (idx, entry_id) in winner_ids.iter().enumerate() {
            let entry = entry_map
                .get(entry_id)
                .cloned()
                .ok_or_else(|| AppError::InternalError("Sampled unknown entry id".to_string()))?;
            let mut am = entry.into_active_model();
            am.is_winner = Set(true);
            am.winner_rank = Set(Some((idx + 1) as i32));
            am.update(&txn).await?;
        }

        // 宠物与主人信息（扩散与返回值共用）
        let pet_ids: Vec<i64> = eligible.iter().map(|e| e.pet_id).collect();
        let pet_list = pets::Entity::find()
            .filter(pets::Column::Id.is_in(pet_ids))
            .all(&txn)
            .await?;
        let pet_map: HashMap<i64, pets::Model> =
            pet_list.iter().map(|p| (p.id, p.clone())).collect();

        let owner_ids: Vec<i64> = pet_list.iter().map(|p| p.owner_id).collect();
        let owner_list = users::Entity::find()
            .filter(users::Column::Id.is_in(owner_ids))
            .all(&txn)
            .await?;
        let owner_map: HashMap<i64, users::Model> =
            owner_list.iter().map(|u| (u.id, u.clone())).collect();

        let badge = ensure_winner_badge(&txn).await?;

        // 先处理获奖者，保证多宠物用户收到的那一条是获奖文案
        let mut winners = Vec::with_capacity(winner_ids.len());
        for (idx, entry_id) in winner_ids.iter().enumerate() {
            let entry = &entry_map[entry_id];
            let rank = (idx + 1) as i32;
            let pet = pet_map.get(&entry.pet_id).ok_or_else(|| {
                AppError::InternalError(format!("Pet {} missing for entry {}", entry.pet_id, entry.id))
            })?;
            let owner = owner_map.get(&pet.owner_id).ok_or_else(|| {
                AppError::InternalError(format!("Owner {} missing for pet {}", pet.owner_id, pet.id))
            })?;

            let rank_display = rank_display(rank);
            ensure_badge_award(&txn, owner.id, badge.id, round_id).await?;
            ensure_notification(
                &txn,
                owner.id,
                round_id,
                &congratulation_message(&pet.name, &rank_display, &round.title),
            )
            .await?;

            winners.push(WinnerResponse {
                entry_id: entry.id,
                rank,
                rank_display,
                pet_name: pet.name.clone(),
                owner_username: owner.username.clone(),
                photo: entry.photo.clone(),
            });
        }

        // 其余参赛者的安慰通知; (user, round) 唯一键吸收同用户多条目的情况
        for entry in &eligible {
            if winner_ids.contains(&entry.id) {
                continue;
            }
            let pet = pet_map.get(&entry.pet_id).ok_or_else(|| {
                AppError::InternalError(format!("Pet {} missing for entry {}", entry.pet_id, entry.id))
            })?;
            ensure_notification(
                &txn,
                pet.owner_id,
                round_id,
                &consolation_message(&pet.name, &round.title),
            )
            .await?;
        }

        txn.commit().await?;

        log::info!(
            "Round {} drawn: {} winners from {} approved entries",
            round_id,
            winners.len(),
            eligible.len()
        );

        Ok(DrawOutcome {
            round_id,
            drawn_at,
            winner_count: winners.len() as u32,
            winners,
        })
    }
}

/// 等概率不放回抽样（部分 Fisher–Yates）。
/// 返回的顺序即名次顺序；不足 max_winners 时全员入选。
fn select_winner_ids<R: Rng + ?Sized>(
    mut pool: Vec<i64>,
    max_winners: usize,
    rng: &mut R,
) -> Vec<i64> {
    let count = max_winners.min(pool.len());
    let (picked, _) = pool.partial_shuffle(rng, count);
    picked.to_vec()
}

fn rank_display(rank: i32) -> String {
    match rank {
        1 => "1st".to_string(),
        2 => "2nd".to_string(),
        3 => "3rd".to_string(),
        n => format!("{n}th"),
    }
}

fn congratulation_message(pet_name: &str, rank_display: &str, round_title: &str) -> String {
    format!("Congratulations! {pet_name} won {rank_display} place in \"{round_title}\"!")
}

fn consolation_message(pet_name: &str, round_title: &str) -> String {
    format!("Thanks for entering \"{round_title}\" with {pet_name}. Better luck next time!")
}

/// "Winner" 徽章懒创建; badges.name 唯一索引兜底并发
async fn ensure_winner_badge(txn: &DatabaseTransaction) -> AppResult<badges::Model> {
    if let Some(badge) = badges::Entity::find()
        .filter(badges::Column::Name.eq(WINNER_BADGE_NAME))
        .one(txn)
        .await?
    {
        return Ok(badge);
    }

    let insert_result = badges::ActiveModel {
        name: Set(WINNER_BADGE_NAME.to_string()),
        description: Set(WINNER_BADGE_DESCRIPTION.to_string()),
        ..Default::default()
    }
    .insert(txn)
    .await;

    match insert_result {
        Ok(badge) => Ok(badge),
        Err(e) if AppError::is_unique_violation(&e) => badges::Entity::find()
            .filter(badges::Column::Name.eq(WINNER_BADGE_NAME))
            .one(txn)
            .await?
            .ok_or_else(|| {
                AppError::InternalError("Badge disappeared after conflicting insert".to_string())
            }),
        Err(e) => Err(e.into()),
    }
}

/// 按 (user, badge, round) get-or-create，重复授予幂等
async fn ensure_badge_award(
    txn: &DatabaseTransaction,
    user_id: i64,
    badge_id: i64,
    round_id: i64,
) -> AppResult<()> {
    let existing = badge_awards::Entity::find()
        .filter(badge_awards::Column::UserId.eq(user_id))
        .filter(badge_awards::Column::BadgeId.eq(badge_id))
        .filter(badge_awards::Column::RoundId.eq(round_id))
        .one(txn)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let insert_result = badge_awards::ActiveModel {
        user_id: Set(user_id),
        badge_id: Set(badge_id),
        round_id: Set(round_id),
        awarded_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(txn)
    .await;

    match insert_result {
        Ok(_) => Ok(()),
        Err(e) if AppError::is_unique_violation(&e) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// 按 (user, round) get-or-create，每轮每用户至多一条通知
async fn ensure_notification(
    txn: &DatabaseTransaction,
    user_id: i64,
    round_id: i64,
    message: &str,
) -> AppResult<()> {
    let existing = notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(user_id))
        .filter(notifications::Column::RoundId.eq(round_id))
        .one(txn)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let insert_result = notifications::ActiveModel {
        user_id: Set(user_id),
        round_id: Set(Some(round_id)),
        message: Set(message.to_string()),
        created_at: Set(Utc::now()),
        dismissed: Set(false),
        ..Default::default()
    }
    .insert(txn)
    .await;

    match insert_result {
        Ok(_) => Ok(()),
        Err(e) if AppError::is_unique_violation(&e) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_select_caps_at_max_winners() {
        let mut rng = StdRng::seed_from_u64(7);
        let picked = select_winner_ids(vec![1, 2, 3, 4, 5, 6], MAX_WINNERS, &mut rng);
        assert_eq!(picked.len(), 3);
    }

    #[test]
    fn test_select_takes_all_when_fewer_than_max() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut picked = select_winner_ids(vec![10, 20], MAX_WINNERS, &mut rng);
        picked.sort_unstable();
        assert_eq!(picked, vec![10, 20]);
    }

    #[test]
    fn test_select_yields_distinct_ids_from_pool() {
        let pool: Vec<i64> = (1..=50).collect();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = select_winner_ids(pool.clone(), MAX_WINNERS, &mut rng);
            assert_eq!(picked.len(), 3);
            let mut dedup = picked.clone();
            dedup.sort_unstable();
            dedup.dedup();
            assert_eq!(dedup.len(), 3, "duplicate winner in {picked:?}");
            assert!(picked.iter().all(|id| pool.contains(id)));
        }
    }

    #[test]
    fn test_select_empty_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(select_winner_ids(vec![], MAX_WINNERS, &mut rng).is_empty());
    }

    #[test]
    fn test_every_entry_can_win() {
        // 每个条目都应能被抽中（跨种子覆盖所有 id）
        let pool: Vec<i64> = (1..=4).collect();
        let mut seen = std::collections::HashSet::new();
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            for id in select_winner_ids(pool.clone(), MAX_WINNERS, &mut rng) {
                seen.insert(id);
            }
        }
        assert_eq!(seen.len(), pool.len());
    }

    #[test]
    fn test_notification_messages() {
        let congrats = congratulation_message("Bella", "1st", "Spring Round");
        assert!(congrats.contains("Congratulations"));
        assert!(congrats.contains("Bella"));
        assert!(congrats.contains("1st"));

        let consolation = consolation_message("Max", "Spring Round");
        assert!(consolation.contains("Max"));
        assert!(consolation.contains("Better luck next time"));
    }

    #[test]
    fn test_rank_display() {
        assert_eq!(rank_display(1), "1st");
        assert_eq!(rank_display(2), "2nd");
        assert_eq!(rank_display(3), "3rd");
        assert_eq!(rank_display(11), "11th");
    }
}

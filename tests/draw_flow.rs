mod common;

use common::{create_open_round, create_user, setup_db, submit_approved_entry};
use pawlotto_backend::entities::{
    RoundStatus, badge_award_entity as badge_awards, badge_entity as badges,
    entry_entity as entries, notification_entity as notifications, round_entity as rounds,
};
use pawlotto_backend::error::AppError;
use pawlotto_backend::services::{DrawService, EntryService, RoundService};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

#[tokio::test]
async fn test_draw_picks_three_ranked_winners_and_fans_out() {
    let pool = setup_db().await;
    let round_id = create_open_round(&pool, "Spring Round").await;

    for name in ["alice", "bob", "carol", "dave"] {
        let user_id = create_user(&pool, name, false).await;
        submit_approved_entry(&pool, user_id, round_id, &format!("pet-of-{name}")).await;
    }

    let outcome = DrawService::new(pool.clone())
        .run_draw(round_id)
        .await
        .expect("draw should succeed");

    assert_eq!(outcome.round_id, round_id);
    assert_eq!(outcome.winner_count, 3);
    let mut ranks: Vec<i32> = outcome.winners.iter().map(|w| w.rank).collect();
    ranks.sort_unstable();
    assert_eq!(ranks, vec![1, 2, 3]);

    // 轮次进入 COMPLETED 且 drawn_at 已落盘
    let round = rounds::Entity::find_by_id(round_id)
        .one(&pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(round.status, RoundStatus::Completed);
    assert!(round.drawn_at.is_some());

    // 库里恰好 3 条获奖记录，名次互不相同
    let winner_rows = entries::Entity::find()
        .filter(entries::Column::RoundId.eq(round_id))
        .filter(entries::Column::IsWinner.eq(true))
        .all(&pool)
        .await
        .unwrap();
    assert_eq!(winner_rows.len(), 3);
    let mut db_ranks: Vec<i32> = winner_rows.iter().filter_map(|e| e.winner_rank).collect();
    db_ranks.sort_unstable();
    assert_eq!(db_ranks, vec![1, 2, 3]);

    // 徽章扩散: Winner 徽章存在，3 位获奖者各一条授予记录
    let badge = badges::Entity::find()
        .filter(badges::Column::Name.eq("Winner"))
        .one(&pool)
        .await
        .unwrap()
        .expect("Winner badge should be created by the draw");
    let award_count = badge_awards::Entity::find()
        .filter(badge_awards::Column::BadgeId.eq(badge.id))
        .filter(badge_awards::Column::RoundId.eq(round_id))
        .count(&pool)
        .await
        .unwrap();
    assert_eq!(award_count, 3);

    // 每位参赛用户恰好一条通知: 3 条获奖 + 1 条安慰
    let notes = notifications::Entity::find()
        .filter(notifications::Column::RoundId.eq(round_id))
        .all(&pool)
        .await
        .unwrap();
    assert_eq!(notes.len(), 4);
    let congrats = notes
        .iter()
        .filter(|n| n.message.contains("Congratulations"))
        .count();
    let consolations = notes
        .iter()
        .filter(|n| n.message.contains("Better luck next time"))
        .count();
    assert_eq!(congrats, 3);
    assert_eq!(consolations, 1);
}

#[tokio::test]
async fn test_draw_takes_everyone_when_fewer_than_three() {
    let pool = setup_db().await;
    let round_id = create_open_round(&pool, "Tiny Round").await;

    for name in ["erin", "frank"] {
        let user_id = create_user(&pool, name, false).await;
        submit_approved_entry(&pool, user_id, round_id, &format!("pet-of-{name}")).await;
    }

    let outcome = DrawService::new(pool.clone())
        .run_draw(round_id)
        .await
        .expect("draw should succeed");

    assert_eq!(outcome.winner_count, 2);
    let mut ranks: Vec<i32> = outcome.winners.iter().map(|w| w.rank).collect();
    ranks.sort_unstable();
    assert_eq!(ranks, vec![1, 2]);

    let note_count = notifications::Entity::find()
        .filter(notifications::Column::RoundId.eq(round_id))
        .count(&pool)
        .await
        .unwrap();
    assert_eq!(note_count, 2);
}

#[tokio::test]
async fn test_draw_without_approved_entries_leaves_round_active() {
    let pool = setup_db().await;
    let round_id = create_open_round(&pool, "Empty Round").await;

    // 有提交但未过审的条目不参与抽奖
    let user_id = create_user(&pool, "grace", false).await;
    EntryService::new(pool.clone())
        .submit_entry(user_id, round_id, common::entry_request("pending-pet"))
        .await
        .unwrap();

    let err = DrawService::new(pool.clone())
        .run_draw(round_id)
        .await
        .expect_err("draw should fail without approved entries");
    assert!(matches!(err, AppError::EligibilityError(_)));

    // 失败的开奖不得留下任何痕迹
    let round = rounds::Entity::find_by_id(round_id)
        .one(&pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(round.status, RoundStatus::Active);
    assert!(round.drawn_at.is_none());
    let note_count = notifications::Entity::find()
        .count(&pool)
        .await
        .unwrap();
    assert_eq!(note_count, 0);
}

#[tokio::test]
async fn test_second_draw_is_rejected_and_changes_nothing() {
    let pool = setup_db().await;
    let round_id = create_open_round(&pool, "One Shot Round").await;

    for name in ["heidi", "ivan", "judy"] {
        let user_id = create_user(&pool, name, false).await;
        submit_approved_entry(&pool, user_id, round_id, &format!("pet-of-{name}")).await;
    }

    let service = DrawService::new(pool.clone());
    let first = service.run_draw(round_id).await.unwrap();
    let mut first_winner_ids: Vec<i64> = first.winners.iter().map(|w| w.entry_id).collect();
    first_winner_ids.sort_unstable();

    let err = service
        .run_draw(round_id)
        .await
        .expect_err("second draw should be rejected");
    assert!(matches!(err, AppError::Conflict(_)));

    // 获奖名单与通知保持首次开奖的结果
    let winner_rows = entries::Entity::find()
        .filter(entries::Column::RoundId.eq(round_id))
        .filter(entries::Column::IsWinner.eq(true))
        .all(&pool)
        .await
        .unwrap();
    let mut db_winner_ids: Vec<i64> = winner_rows.iter().map(|e| e.id).collect();
    db_winner_ids.sort_unstable();
    assert_eq!(db_winner_ids, first_winner_ids);

    let note_count = notifications::Entity::find()
        .filter(notifications::Column::RoundId.eq(round_id))
        .count(&pool)
        .await
        .unwrap();
    assert_eq!(note_count, 3);
}

#[tokio::test]
async fn test_draw_on_missing_round() {
    let pool = setup_db().await;
    let err = DrawService::new(pool.clone())
        .run_draw(9999)
        .await
        .expect_err("missing round should 404");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_results_list_completed_rounds_with_ranked_winners() {
    let pool = setup_db().await;
    let round_id = create_open_round(&pool, "Results Round").await;

    for name in ["kim", "leo", "mia", "nora"] {
        let user_id = create_user(&pool, name, false).await;
        submit_approved_entry(&pool, user_id, round_id, &format!("pet-of-{name}")).await;
    }
    DrawService::new(pool.clone()).run_draw(round_id).await.unwrap();

    let results = RoundService::new(pool.clone()).list_results().await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].round.id, round_id);
    let ranks: Vec<i32> = results[0].winners.iter().map(|w| w.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3], "winners must come back in rank order");
    assert_eq!(results[0].winners[0].rank_display, "1st");

    // 未开奖的轮次不进结果页
    let other = create_open_round(&pool, "Still Running").await;
    let results = RoundService::new(pool.clone()).list_results().await.unwrap();
    assert!(results.iter().all(|r| r.round.id != other));
}

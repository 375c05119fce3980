mod common;

use chrono::{Duration, Utc};
use common::{create_open_round, create_user, entry_request, setup_db, submit_approved_entry};
use pawlotto_backend::entities::{EntryStatus, entry_entity as entries};
use pawlotto_backend::error::AppError;
use pawlotto_backend::models::{
    CommentListQuery, CreateCommentRequest, CreateRoundRequest, ModerationDecision,
};
use pawlotto_backend::services::{
    CommentService, DrawService, EntryService, NotificationService, RoundService,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

#[tokio::test]
async fn test_same_pet_cannot_enter_round_twice() {
    let pool = setup_db().await;
    let round_id = create_open_round(&pool, "Dup Round").await;
    let user_id = create_user(&pool, "olive", false).await;

    let service = EntryService::new(pool.clone());
    service
        .submit_entry(user_id, round_id, entry_request("Bella"))
        .await
        .expect("first entry should succeed");

    let err = service
        .submit_entry(user_id, round_id, entry_request("Bella"))
        .await
        .expect_err("same pet twice must be rejected");
    assert!(matches!(err, AppError::EligibilityError(_)));

    let count = entries::Entity::find()
        .filter(entries::Column::RoundId.eq(round_id))
        .count(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_same_owner_may_enter_two_different_pets() {
    let pool = setup_db().await;
    let round_id = create_open_round(&pool, "Multi Pet Round").await;
    let user_id = create_user(&pool, "pete", false).await;

    let service = EntryService::new(pool.clone());
    service
        .submit_entry(user_id, round_id, entry_request("Bella"))
        .await
        .unwrap();
    service
        .submit_entry(user_id, round_id, entry_request("Max"))
        .await
        .unwrap();

    let mine = service.my_entries(user_id).await.unwrap();
    assert_eq!(mine.len(), 2);
}

#[tokio::test]
async fn test_entry_outside_round_window_is_rejected() {
    let pool = setup_db().await;
    // 状态仍是 ACTIVE，但窗口已整体落在过去
    let round = RoundService::new(pool.clone())
        .create_round(CreateRoundRequest {
            title: "Closed Round".to_string(),
            start_date: Utc::now() - Duration::days(10),
            end_date: Utc::now() - Duration::days(3),
        })
        .await
        .unwrap();
    let user_id = create_user(&pool, "quinn", false).await;

    let err = EntryService::new(pool.clone())
        .submit_entry(user_id, round.id, entry_request("Bella"))
        .await
        .expect_err("closed window must reject entries");
    assert!(matches!(err, AppError::EligibilityError(_)));
}

#[tokio::test]
async fn test_entry_validation_and_missing_round() {
    let pool = setup_db().await;
    let round_id = create_open_round(&pool, "Validation Round").await;
    let user_id = create_user(&pool, "rita", false).await;
    let service = EntryService::new(pool.clone());

    let mut bad = entry_request("  ");
    bad.pet_name = "   ".to_string();
    let err = service
        .submit_entry(user_id, round_id, bad)
        .await
        .expect_err("blank pet name must fail");
    assert!(matches!(err, AppError::ValidationError(_)));

    let err = service
        .submit_entry(user_id, 9999, entry_request("Bella"))
        .await
        .expect_err("missing round must 404");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_moderation_queue_orders_oldest_first_and_shrinks() {
    let pool = setup_db().await;
    let round_id = create_open_round(&pool, "Moderation Round").await;
    let user_id = create_user(&pool, "sam", false).await;

    let service = EntryService::new(pool.clone());
    let first = service
        .submit_entry(user_id, round_id, entry_request("Bella"))
        .await
        .unwrap();
    let second = service
        .submit_entry(user_id, round_id, entry_request("Max"))
        .await
        .unwrap();

    let queue = service.moderation_queue().await.unwrap();
    assert_eq!(queue.len(), 2);
    assert_eq!(queue[0].id, first.id, "oldest submission first");

    let approved = service
        .moderate_entry(first.id, ModerationDecision::Approve)
        .await
        .unwrap();
    assert_eq!(approved.status, EntryStatus::Approved);

    let rejected = service
        .moderate_entry(second.id, ModerationDecision::Reject)
        .await
        .unwrap();
    assert_eq!(rejected.status, EntryStatus::Rejected);

    assert!(service.moderation_queue().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_active_round_listing_only_shows_open_windows() {
    let pool = setup_db().await;
    let open_id = create_open_round(&pool, "Open Round").await;
    let service = RoundService::new(pool.clone());

    // 未来才开始的轮次不在报名列表里
    service
        .create_round(CreateRoundRequest {
            title: "Future Round".to_string(),
            start_date: Utc::now() + Duration::days(1),
            end_date: Utc::now() + Duration::days(8),
        })
        .await
        .unwrap();

    let active = service.list_active_rounds(Utc::now()).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, open_id);
}

#[tokio::test]
async fn test_create_round_validation() {
    let pool = setup_db().await;
    let service = RoundService::new(pool.clone());

    let err = service
        .create_round(CreateRoundRequest {
            title: "  ".to_string(),
            start_date: Utc::now(),
            end_date: Utc::now() + Duration::days(7),
        })
        .await
        .expect_err("blank title must fail");
    assert!(matches!(err, AppError::ValidationError(_)));

    let err = service
        .create_round(CreateRoundRequest {
            title: "Backwards".to_string(),
            start_date: Utc::now() + Duration::days(7),
            end_date: Utc::now(),
        })
        .await
        .expect_err("start after end must fail");
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn test_comments_only_on_winning_entries_of_completed_rounds() {
    let pool = setup_db().await;
    let round_id = create_open_round(&pool, "Comment Round").await;
    let owner_id = create_user(&pool, "tina", false).await;
    let visitor_id = create_user(&pool, "uma", false).await;

    let entry_id = submit_approved_entry(&pool, owner_id, round_id, "Bella").await;
    let comment_service = CommentService::new(pool.clone());

    // 开奖前不可评论
    let err = comment_service
        .post_comment(
            entry_id,
            visitor_id,
            CreateCommentRequest {
                text: "So cute!".to_string(),
            },
        )
        .await
        .expect_err("comments before the draw must be rejected");
    assert!(matches!(err, AppError::EligibilityError(_)));

    // 单条过审条目开奖后必然获奖
    DrawService::new(pool.clone()).run_draw(round_id).await.unwrap();

    let comment = comment_service
        .post_comment(
            entry_id,
            visitor_id,
            CreateCommentRequest {
                text: "So cute!".to_string(),
            },
        )
        .await
        .expect("winner of a completed round accepts comments");
    assert_eq!(comment.author_username, "uma");

    let err = comment_service
        .post_comment(
            entry_id,
            visitor_id,
            CreateCommentRequest {
                text: "   ".to_string(),
            },
        )
        .await
        .expect_err("blank comment must fail");
    assert!(matches!(err, AppError::ValidationError(_)));

    let err = comment_service
        .post_comment(
            9999,
            visitor_id,
            CreateCommentRequest {
                text: "Hello".to_string(),
            },
        )
        .await
        .expect_err("missing entry must 404");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_comment_listing_paginates_newest_first() {
    let pool = setup_db().await;
    let round_id = create_open_round(&pool, "Comment Page Round").await;
    let owner_id = create_user(&pool, "vera", false).await;
    let entry_id = submit_approved_entry(&pool, owner_id, round_id, "Bella").await;
    DrawService::new(pool.clone()).run_draw(round_id).await.unwrap();

    let comment_service = CommentService::new(pool.clone());
    for i in 1..=5 {
        comment_service
            .post_comment(
                entry_id,
                owner_id,
                CreateCommentRequest {
                    text: format!("comment {i}"),
                },
            )
            .await
            .unwrap();
        // created_at 用应用时钟，错开毫秒保证排序稳定
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let page = comment_service
        .list_comments(
            entry_id,
            &CommentListQuery {
                page: None,
                per_page: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(page.items.len(), 3, "default page size is 3");
    assert_eq!(page.pagination.total, 5);
    assert_eq!(page.items[0].text, "comment 5", "newest first");

    let second = comment_service
        .list_comments(
            entry_id,
            &CommentListQuery {
                page: Some(2),
                per_page: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(second.items.len(), 2);
    assert_eq!(second.items[0].text, "comment 2");
}

#[tokio::test]
async fn test_notifications_are_owner_scoped() {
    let pool = setup_db().await;
    let round_id = create_open_round(&pool, "Notify Round").await;
    let winner_id = create_user(&pool, "wendy", false).await;
    let other_id = create_user(&pool, "xavier", false).await;

    submit_approved_entry(&pool, winner_id, round_id, "Bella").await;
    DrawService::new(pool.clone()).run_draw(round_id).await.unwrap();

    let service = NotificationService::new(pool.clone());
    let mine = service.list_notifications(winner_id).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert!(mine[0].message.contains("Congratulations"));
    assert!(!mine[0].dismissed);

    assert!(service.list_notifications(other_id).await.unwrap().is_empty());

    // 别人的通知不可操作
    let err = service
        .dismiss_notification(other_id, mine[0].id)
        .await
        .expect_err("dismissing another user's notification must fail");
    assert!(matches!(err, AppError::PermissionDenied));

    let dismissed = service
        .dismiss_notification(winner_id, mine[0].id)
        .await
        .unwrap();
    assert!(dismissed.dismissed);

    // 重复 dismiss 幂等
    let again = service
        .dismiss_notification(winner_id, mine[0].id)
        .await
        .unwrap();
    assert!(again.dismissed);
}

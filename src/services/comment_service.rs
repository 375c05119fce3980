use std::collections::HashMap;

use crate::entities::{
    RoundStatus, comment_entity as comments, entry_entity as entries, round_entity as rounds,
    user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::{CommentListQuery, CommentResponse, CreateCommentRequest, PaginatedResponse};
use crate::utils::PaginationParams;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

/// 结果页评论区默认每页条数
const COMMENTS_PER_PAGE: u32 = 3;

#[derive(Clone)]
pub struct CommentService {
    pool: DatabaseConnection,
}

impl CommentService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 发表评论; 仅已完成轮次中的获奖作品可评论
    pub async fn post_comment(
        &self,
        entry_id: i64,
        author_id: i64,
        request: CreateCommentRequest,
    ) -> AppResult<CommentResponse> {
        let text = request.text.trim().to_string();
        if text.is_empty() {
            return Err(AppError::ValidationError(
                "Comment text must not be empty".to_string(),
            ));
        }
        if text.len() > 2000 {
            return Err(AppError::ValidationError(
                "Comment text must not exceed 2000 characters".to_string(),
            ));
        }

        let entry = entries::Entity::find_by_id(entry_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Entry {entry_id} not found")))?;

        let round = rounds::Entity::find_by_id(entry.round_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::InternalError(format!("Round {} missing", entry.round_id)))?;

        if !entry.is_winner || round.status != RoundStatus::Completed {
            return Err(AppError::EligibilityError(
                "Comments are only allowed on winning entries of completed rounds".to_string(),
            ));
        }

        let author = users::Entity::find_by_id(author_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Unknown comment author".to_string()))?;

        let comment = comments::ActiveModel {
            entry_id: Set(entry_id),
            author_id: Set(author_id),
            text: Set(text),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(CommentResponse {
            id: comment.id,
            entry_id: comment.entry_id,
            author_username: author.username,
            text: comment.text,
            created_at: comment.created_at,
        })
    }

    /// 某条参赛记录的评论，最新在前，分页
    pub async fn list_comments(
        &self,
        entry_id: i64,
        query: &CommentListQuery,
    ) -> AppResult<PaginatedResponse<CommentResponse>> {
        let entry = entries::Entity::find_by_id(entry_id)
            .one(&self.pool)
            .await?;
        if entry.is_none() {
            return Err(AppError::NotFound(format!("Entry {entry_id} not found")));
        }

        let params = PaginationParams::new(
            query.page,
            Some(query.per_page.unwrap_or(COMMENTS_PER_PAGE)),
        );

        let base_query = comments::Entity::find().filter(comments::Column::EntryId.eq(entry_id));

        let total = base_query.clone().count(&self.pool).await? as i64;

        let comment_list = base_query
            .order_by_desc(comments::Column::CreatedAt)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        let author_ids: Vec<i64> = comment_list.iter().map(|c| c.author_id).collect();
        let author_list = users::Entity::find()
            .filter(users::Column::Id.is_in(author_ids))
            .all(&self.pool)
            .await?;
        let author_map: HashMap<i64, &users::Model> =
            author_list.iter().map(|u| (u.id, u)).collect();

        let items = comment_list
            .into_iter()
            .map(|c| {
                let author_username = author_map
                    .get(&c.author_id)
                    .map(|u| u.username.clone())
                    .unwrap_or_else(|| "deleted user".to_string());
                CommentResponse {
                    id: c.id,
                    entry_id: c.entry_id,
                    author_username,
                    text: c.text,
                    created_at: c.created_at,
                }
            })
            .collect();

        Ok(PaginatedResponse::new(items, &params, total))
    }
}

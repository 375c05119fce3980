use crate::entities::notification_entity as notifications;
use crate::error::{AppError, AppResult};
use crate::models::NotificationResponse;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};

#[derive(Clone)]
pub struct NotificationService {
    pool: DatabaseConnection,
}

impl NotificationService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 当前用户的通知，最新在前
    pub async fn list_notifications(&self, user_id: i64) -> AppResult<Vec<NotificationResponse>> {
        let list = notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .order_by_desc(notifications::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    /// 标记已读; 只能操作自己的通知
    pub async fn dismiss_notification(
        &self,
        user_id: i64,
        notification_id: i64,
    ) -> AppResult<NotificationResponse> {
        let notification = notifications::Entity::find_by_id(notification_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Notification {notification_id} not found"))
            })?;

        if notification.user_id != user_id {
            return Err(AppError::PermissionDenied);
        }

        if notification.dismissed {
            return Ok(notification.into());
        }

        let mut am = notification.into_active_model();
        am.dismissed = Set(true);
        let updated = am.update(&self.pool).await?;
        Ok(updated.into())
    }
}

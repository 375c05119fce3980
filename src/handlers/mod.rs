use actix_web::{HttpMessage, HttpRequest};

pub mod admin;
pub mod auth;
pub mod comment;
pub mod entry;
pub mod notification;
pub mod round;

pub use admin::admin_config;
pub use auth::auth_config;
pub use comment::comment_config;
pub use entry::entry_config;
pub use notification::notification_config;
pub use round::round_config;

/// 从请求扩展中获取用户ID（鉴权中间件注入）
pub(crate) fn get_user_id_from_request(req: &HttpRequest) -> Option<i64> {
    req.extensions().get::<i64>().copied()
}

pub mod auth_service;
pub mod comment_service;
pub mod draw_service;
pub mod entry_service;
pub mod notification_service;
pub mod round_service;

pub use auth_service::*;
pub use comment_service::*;
pub use draw_service::*;
pub use entry_service::*;
pub use notification_service::*;
pub use round_service::*;

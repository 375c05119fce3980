pub mod comment;
pub mod common;
pub mod draw;
pub mod entry;
pub mod notification;
pub mod round;
pub mod user;

pub use comment::*;
pub use common::*;
pub use draw::*;
pub use entry::*;
pub use notification::*;
pub use round::*;
pub use user::*;

pub use crate::utils::pagination::{PaginatedResponse, PaginationInfo, PaginationParams};

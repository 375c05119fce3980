pub mod jwt;
pub mod pagination;
pub mod password;

pub use jwt::*;
pub use pagination::*;
pub use password::*;

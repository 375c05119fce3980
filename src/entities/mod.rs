pub mod badge_awards;
pub mod badges;
pub mod comments;
pub mod entries;
pub mod notifications;
pub mod pets;
pub mod rounds;
pub mod users;

pub use badge_awards as badge_award_entity;
pub use badges as badge_entity;
pub use comments as comment_entity;
pub use entries as entry_entity;
pub use notifications as notification_entity;
pub use pets as pet_entity;
pub use rounds as round_entity;
pub use users as user_entity;

pub use entries::EntryStatus;
pub use rounds::RoundStatus;

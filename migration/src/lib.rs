pub use sea_orm_migration::prelude::*;

mod m20260115_000001_initial;
mod m20260122_000002_add_badges_notifications;
mod m20260129_000003_add_comments;
mod m20260205_000004_add_notification_dismissed;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260115_000001_initial::Migration),
            Box::new(m20260122_000002_add_badges_notifications::Migration),
            Box::new(m20260129_000003_add_comments::Migration),
            Box::new(m20260205_000004_add_notification_dismissed::Migration),
        ]
    }
}

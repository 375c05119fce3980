use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Badges {
    Table,
    Id,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum BadgeAwards {
    Table,
    Id,
    UserId,
    BadgeId,
    RoundId,
    AwardedAt,
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    Id,
    UserId,
    RoundId,
    Message,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Rounds {
    Table,
    Id,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 开奖结果扩散所需的表: badges / badge_awards / notifications
///
/// 幂等键 (get-or-create 依赖这些唯一索引兜底):
/// - badges.name 唯一 ("Winner" 徽章懒创建)
/// - badge_awards (user_id, badge_id, round_id) 唯一
/// - notifications (user_id, round_id) 唯一 —— 每轮每用户至多一条通知
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 徽章定义表
        manager
            .create_table(
                Table::create()
                    .table(Badges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Badges::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Badges::Name).string_len(50).not_null())
                    .col(ColumnDef::new(Badges::Description).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_badges_name")
                    .table(Badges::Table)
                    .col(Badges::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 徽章授予记录表
        manager
            .create_table(
                Table::create()
                    .table(BadgeAwards::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BadgeAwards::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BadgeAwards::UserId).big_integer().not_null())
                    .col(ColumnDef::new(BadgeAwards::BadgeId).big_integer().not_null())
                    .col(ColumnDef::new(BadgeAwards::RoundId).big_integer().not_null())
                    .col(
                        ColumnDef::new(BadgeAwards::AwardedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_badge_awards_user")
                            .from(BadgeAwards::Table, BadgeAwards::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_badge_awards_badge")
                            .from(BadgeAwards::Table, BadgeAwards::BadgeId)
                            .to(Badges::Table, Badges::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_badge_awards_round")
                            .from(BadgeAwards::Table, BadgeAwards::RoundId)
                            .to(Rounds::Table, Rounds::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_badge_awards_user_badge_round")
                    .table(BadgeAwards::Table)
                    .col(BadgeAwards::UserId)
                    .col(BadgeAwards::BadgeId)
                    .col(BadgeAwards::RoundId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 通知表
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::UserId).big_integer().not_null())
                    // NULL 允许未来的非轮次类系统通知
                    .col(ColumnDef::new(Notifications::RoundId).big_integer().null())
                    .col(ColumnDef::new(Notifications::Message).text().not_null())
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notifications_user")
                            .from(Notifications::Table, Notifications::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notifications_round")
                            .from(Notifications::Table, Notifications::RoundId)
                            .to(Rounds::Table, Rounds::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_notifications_user_round")
                    .table(Notifications::Table)
                    .col(Notifications::UserId)
                    .col(Notifications::RoundId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BadgeAwards::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Badges::Table).to_owned())
            .await?;
        Ok(())
    }
}

use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    IsStaff,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Rounds {
    Table,
    Id,
    Title,
    StartDate,
    EndDate,
    Status,
    DrawnAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Pets {
    Table,
    Id,
    OwnerId,
    Name,
    Breed,
    AgeNumber,
    AgeUnit,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Entries {
    Table,
    Id,
    PetId,
    RoundId,
    Photo,
    Status,
    IsWinner,
    WinnerRank,
    SubmittedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 初始核心表: users / rounds / pets / entries
///
/// 约束:
/// - pets (owner_id, name) 唯一 —— 同一用户同名宠物复用同一条记录
/// - entries (pet_id, round_id) 唯一 —— 每只宠物每轮最多一条参赛记录
/// - 时间戳由应用层写入（不依赖数据库默认值，保证 Postgres / SQLite 行为一致）
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Username).string_len(150).not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Users::IsStaff)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_users_username")
                    .table(Users::Table)
                    .col(Users::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 抽奖轮次表
        manager
            .create_table(
                Table::create()
                    .table(Rounds::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rounds::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rounds::Title).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Rounds::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rounds::EndDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rounds::Status)
                            .string_len(20)
                            .not_null()
                            .default("ACTIVE"),
                    )
                    // 开奖时间; NULL 表示尚未开奖 (status=ACTIVE)
                    .col(
                        ColumnDef::new(Rounds::DrawnAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Rounds::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 宠物表
        manager
            .create_table(
                Table::create()
                    .table(Pets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Pets::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Pets::OwnerId).big_integer().not_null())
                    .col(ColumnDef::new(Pets::Name).string_len(50).not_null())
                    .col(ColumnDef::new(Pets::Breed).string_len(50).null())
                    .col(ColumnDef::new(Pets::AgeNumber).integer().not_null())
                    .col(ColumnDef::new(Pets::AgeUnit).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Pets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pets_owner")
                            .from(Pets::Table, Pets::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_pets_owner_name")
                    .table(Pets::Table)
                    .col(Pets::OwnerId)
                    .col(Pets::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 参赛记录表
        manager
            .create_table(
                Table::create()
                    .table(Entries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Entries::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Entries::PetId).big_integer().not_null())
                    .col(ColumnDef::new(Entries::RoundId).big_integer().not_null())
                    .col(ColumnDef::new(Entries::Photo).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Entries::Status)
                            .string_len(20)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(
                        ColumnDef::new(Entries::IsWinner)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    // 获奖名次 1..N; 仅 is_winner=true 时有值
                    .col(ColumnDef::new(Entries::WinnerRank).integer().null())
                    .col(
                        ColumnDef::new(Entries::SubmittedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_entries_pet")
                            .from(Entries::Table, Entries::PetId)
                            .to(Pets::Table, Pets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_entries_round")
                            .from(Entries::Table, Entries::RoundId)
                            .to(Rounds::Table, Rounds::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 每只宠物每轮唯一
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_entries_pet_round")
                    .table(Entries::Table)
                    .col(Entries::PetId)
                    .col(Entries::RoundId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Entries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Pets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rounds::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

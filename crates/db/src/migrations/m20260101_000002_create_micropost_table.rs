//! Create micropost table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Micropost::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Micropost::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Micropost::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Micropost::Content).text().not_null())
                    .col(
                        ColumnDef::new(Micropost::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_micropost_user")
                            .from(Micropost::Table, Micropost::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (user_id, created_at) - profile timelines read newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_micropost_user_id_created_at")
                    .table(Micropost::Table)
                    .col(Micropost::UserId)
                    .col(Micropost::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (for feed pagination)
        manager
            .create_index(
                Index::create()
                    .name("idx_micropost_created_at")
                    .table(Micropost::Table)
                    .col(Micropost::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Micropost::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Micropost {
    Table,
    Id,
    UserId,
    Content,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

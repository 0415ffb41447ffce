//! Creates the token store table.
//!
//! One row per completed delegated login. `access_token` is looked up by the
//! token endpoint and must be unique.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TokenRecord::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TokenRecord::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TokenRecord::UserId).string().not_null())
                    .col(
                        ColumnDef::new(TokenRecord::AccessToken)
                            .text()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(TokenRecord::RefreshToken).text().null())
                    .col(
                        ColumnDef::new(TokenRecord::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TokenRecord::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_token_record_user_id")
                    .table(TokenRecord::Table)
                    .col(TokenRecord::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TokenRecord::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TokenRecord {
    Table,
    Id,
    UserId,
    AccessToken,
    RefreshToken,
    ExpiresAt,
    CreatedAt,
}

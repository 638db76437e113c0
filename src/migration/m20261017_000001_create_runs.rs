//! Create runs table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Runs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Runs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Runs::Name).string().not_null())
                    .col(
                        ColumnDef::new(Runs::Status)
                            .string_len(16)
                            .not_null()
                            .default("running"),
                    )
                    .col(
                        ColumnDef::new(Runs::StartedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Runs::FinishedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Runs::DurationS).double())
                    .to_owned(),
            )
            .await?;

        // Latest-run lookups and newest-first listings
        manager
            .create_index(
                Index::create()
                    .name("idx_runs_started_at")
                    .table(Runs::Table)
                    .col(Runs::StartedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Runs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Runs {
    Table,
    Id,
    Name,
    Status,
    StartedAt,
    FinishedAt,
    #[sea_orm(iden = "duration_s")]
    DurationS,
}

//! Create test_cases table.
//!
//! Stores the per-test outcomes extracted from a run's JUnit report.

use sea_orm_migration::prelude::*;

use super::m20261017_000001_create_runs::Runs;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TestCases::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TestCases::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(TestCases::RunId).uuid().not_null())
                    .col(
                        ColumnDef::new(TestCases::Sequence)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(TestCases::Name).string().not_null())
                    .col(ColumnDef::new(TestCases::Classname).string())
                    .col(ColumnDef::new(TestCases::Status).string_len(16).not_null())
                    .col(ColumnDef::new(TestCases::TimeS).double())
                    .col(ColumnDef::new(TestCases::FailureMessage).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_test_cases_run_id")
                            .from(TestCases::Table, TestCases::RunId)
                            .to(Runs::Table, Runs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Ordered case listing per run
        manager
            .create_index(
                Index::create()
                    .name("idx_test_cases_run_sequence")
                    .table(TestCases::Table)
                    .col(TestCases::RunId)
                    .col(TestCases::Sequence)
                    .to_owned(),
            )
            .await?;

        // Status filtering
        manager
            .create_index(
                Index::create()
                    .name("idx_test_cases_run_status")
                    .table(TestCases::Table)
                    .col(TestCases::RunId)
                    .col(TestCases::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TestCases::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TestCases {
    Table,
    Id,
    RunId,
    Sequence,
    Name,
    Classname,
    Status,
    #[sea_orm(iden = "time_s")]
    TimeS,
    FailureMessage,
}

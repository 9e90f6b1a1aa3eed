//! Migration: Create the job_applications table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JobApplications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JobApplications::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JobApplications::UserId).uuid().not_null())
                    .col(ColumnDef::new(JobApplications::Company).string().not_null())
                    .col(ColumnDef::new(JobApplications::Title).string().not_null())
                    .col(
                        ColumnDef::new(JobApplications::Status)
                            .string()
                            .not_null()
                            .default("APPLIED"),
                    )
                    .col(ColumnDef::new(JobApplications::Location).string().null())
                    .col(ColumnDef::new(JobApplications::Notes).text().null())
                    .col(
                        ColumnDef::new(JobApplications::AppliedDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobApplications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobApplications::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_applications_user_id")
                            .from(JobApplications::Table, JobApplications::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Listing is always scoped to the owner
        manager
            .create_index(
                Index::create()
                    .name("idx_job_applications_user_id")
                    .table(JobApplications::Table)
                    .col(JobApplications::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JobApplications::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum JobApplications {
    Table,
    Id,
    UserId,
    Company,
    Title,
    Status,
    Location,
    Notes,
    AppliedDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

use sea_orm_migration::prelude::*;

use crate::m20260301_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
pub(crate) enum Campaigns {
    Table,
    Id,
    BrandId,
    Title,
    Description,
    Instructions,
    TotalBudget,
    PayoutPerCreator,
    PlatformFeePercent,
    TargetCity,
    TargetAgeGroups,
    Status,
    MaxCreators,
    CurrentSubmissions,
    ApprovedSubmissions,
    CreatedAt,
    Deadline,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Campaigns::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Campaigns::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Campaigns::BrandId).uuid().not_null())
                    .col(ColumnDef::new(Campaigns::Title).string().not_null())
                    .col(ColumnDef::new(Campaigns::Description).text().not_null())
                    .col(ColumnDef::new(Campaigns::Instructions).text().not_null())
                    .col(ColumnDef::new(Campaigns::TotalBudget).double().not_null())
                    .col(
                        ColumnDef::new(Campaigns::PayoutPerCreator)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Campaigns::PlatformFeePercent)
                            .double()
                            .not_null()
                            .default(20.0),
                    )
                    .col(ColumnDef::new(Campaigns::TargetCity).string().not_null())
                    .col(ColumnDef::new(Campaigns::TargetAgeGroups).json().null())
                    .col(
                        ColumnDef::new(Campaigns::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Campaigns::MaxCreators).integer().not_null())
                    .col(
                        ColumnDef::new(Campaigns::CurrentSubmissions)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Campaigns::ApprovedSubmissions)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Campaigns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Campaigns::Deadline)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Campaigns::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_campaigns_brand_id")
                            .from(Campaigns::Table, Campaigns::BrandId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Campaigns::Table).to_owned())
            .await
    }
}

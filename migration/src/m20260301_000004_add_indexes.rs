use sea_orm_migration::prelude::*;

use crate::m20260301_000002_create_campaigns_table::Campaigns;
use crate::m20260301_000003_create_submissions_table::Submissions;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Active listing: WHERE status = 'active' ORDER BY created_at DESC
        manager
            .create_index(
                Index::create()
                    .name("idx_campaigns_status_created_at")
                    .table(Campaigns::Table)
                    .col(Campaigns::Status)
                    .col(Campaigns::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Campaigns by owning brand
        manager
            .create_index(
                Index::create()
                    .name("idx_campaigns_brand_id")
                    .table(Campaigns::Table)
                    .col(Campaigns::BrandId)
                    .to_owned(),
            )
            .await?;

        // Duplicate lookup by (campaign, creator); claims serialize on the campaign row
        manager
            .create_index(
                Index::create()
                    .name("idx_submissions_campaign_creator")
                    .table(Submissions::Table)
                    .col(Submissions::CampaignId)
                    .col(Submissions::CreatorId)
                    .to_owned(),
            )
            .await?;

        // Review queue: WHERE status = 'submitted'
        manager
            .create_index(
                Index::create()
                    .name("idx_submissions_status")
                    .table(Submissions::Table)
                    .col(Submissions::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_campaigns_status_created_at").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_campaigns_brand_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_submissions_campaign_creator").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_submissions_status").to_owned())
            .await?;

        Ok(())
    }
}

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Campaign lifecycle status stored as a snake_case string in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "pending_approval")]
    PendingApproval,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "paused")]
    Paused,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "archived")]
    Archived,
}

impl CampaignStatus {
    /// Lifecycle edges. `Paused <-> Active` is the only cycle.
    pub fn can_transition_to(self, target: CampaignStatus) -> bool {
        use CampaignStatus::*;

        matches!(
            (self, target),
            (Draft, PendingApproval | Active | Archived)
                | (PendingApproval, Active | Draft | Archived)
                | (Active, Paused | Completed | Archived)
                | (Paused, Active | Completed | Archived)
                | (Completed, Archived)
        )
    }
}

/// Optional age-group targeting, stored as a JSON array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct AgeGroups(pub Vec<String>);

/// SeaORM entity for the `campaigns` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "campaigns")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub brand_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Text")]
    pub instructions: String,
    #[sea_orm(column_type = "Double")]
    pub total_budget: f64,
    #[sea_orm(column_type = "Double")]
    pub payout_per_creator: f64,
    #[sea_orm(column_type = "Double")]
    pub platform_fee_percent: f64,
    pub target_city: String,
    #[sea_orm(column_type = "Json", nullable)]
    pub target_age_groups: Option<AgeGroups>,
    pub status: CampaignStatus,
    pub max_creators: i32,
    pub current_submissions: i32,
    pub approved_submissions: i32,
    pub created_at: DateTimeUtc,
    pub deadline: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

impl Model {
    /// Active and not past the deadline, regardless of capacity.
    pub fn is_open(&self, now: DateTimeUtc) -> bool {
        self.status == CampaignStatus::Active && now < self.deadline
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::BrandId",
        to = "super::users::Column::Id"
    )]
    Brand,
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Brand.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCampaign {
    pub title: String,
    pub description: String,
    pub instructions: String,
    pub total_budget: f64,
    pub payout_per_creator: f64,
    /// Defaults to the configured platform fee.
    pub platform_fee_percent: Option<f64>,
    pub target_city: String,
    pub target_age_groups: Option<Vec<String>>,
    /// Defaults to the estimated reach of the budget.
    pub max_creators: Option<u32>,
    pub deadline: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub save_as_draft: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCampaignStatus {
    pub status: CampaignStatus,
}

/// Filter for the active campaign listing, with keyset pagination.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignListQuery {
    pub city: Option<String>,
    pub limit: Option<u64>,
    pub cursor_created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub cursor_id: Option<Uuid>,
}

impl CampaignListQuery {
    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}

/// One page of a campaign listing. Pass `next_cursor` back to continue.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignPage {
    pub items: Vec<Model>,
    pub next_cursor: Option<CampaignCursor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignCursor {
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub id: Uuid,
}

/// Brand dashboard figures across every campaign a brand owns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandStats {
    pub active_campaigns: u64,
    /// Sum of `approved_submissions * payout_per_creator`.
    pub total_spent: f64,
    /// Creators approved across all campaigns.
    pub reach_generated: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EstimateQuery {
    pub total_budget: f64,
    pub payout_per_creator: f64,
    pub platform_fee_percent: Option<f64>,
}

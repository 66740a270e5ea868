use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Submission status stored as a lowercase string in the database.
///
/// `Reserved -> Submitted -> {Approved, Rejected}`; the last two are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[sea_orm(string_value = "reserved")]
    Reserved,
    #[sea_orm(string_value = "submitted")]
    Submitted,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl SubmissionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SubmissionStatus::Approved | SubmissionStatus::Rejected)
    }

    /// Statuses that hold a slot on the campaign.
    pub fn open() -> [SubmissionStatus; 2] {
        [SubmissionStatus::Reserved, SubmissionStatus::Submitted]
    }
}

/// SeaORM entity for the `submissions` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub creator_id: Uuid,
    /// Absent only while the slot is `reserved`.
    pub proof_url: Option<String>,
    pub social_link: Option<String>,
    pub status: SubmissionStatus,
    pub reserved_at: Option<DateTimeUtc>,
    pub submitted_at: Option<DateTimeUtc>,
    pub reviewed_at: Option<DateTimeUtc>,
    pub reviewed_by: Option<Uuid>,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::campaigns::Entity",
        from = "Column::CampaignId",
        to = "super::campaigns::Column::Id"
    )]
    Campaign,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatorId",
        to = "super::users::Column::Id"
    )]
    Creator,
}

impl Related<super::campaigns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campaign.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubmission {
    pub campaign_id: Uuid,
    pub proof_url: String,
    pub social_link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReserveSlot {
    pub campaign_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitProof {
    pub proof_url: String,
    pub social_link: Option<String>,
}

/// The two outcomes of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approved,
    Rejected,
}

impl From<Decision> for SubmissionStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Approved => SubmissionStatus::Approved,
            Decision::Rejected => SubmissionStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecideSubmission {
    pub decision: Decision,
    pub feedback: Option<String>,
}

/// A submission awaiting review, with its campaign for display context.
#[derive(Debug, Clone, Serialize)]
pub struct PendingSubmission {
    #[serde(flatten)]
    pub submission: Model,
    pub campaign: super::campaigns::Model,
}

#[cfg(test)]
mod tests {
    use super::SubmissionStatus::*;

    #[test]
    fn test_terminal_and_open_statuses_do_not_overlap() {
        assert!(Approved.is_terminal());
        assert!(Rejected.is_terminal());
        assert!(!Reserved.is_terminal());
        assert!(!Submitted.is_terminal());

        for status in super::SubmissionStatus::open() {
            assert!(!status.is_terminal());
        }
    }
}

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::campaigns;
use crate::models::submissions::{self, SubmissionStatus};

/// A submission row ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub campaign_id: Uuid,
    pub creator_id: Uuid,
    pub proof_url: Option<String>,
    pub social_link: Option<String>,
    pub status: SubmissionStatus,
    pub now: DateTime<Utc>,
}

/// Insert a submission. `reserved` rows get `reserved_at`, `submitted` rows get `submitted_at`.
pub async fn insert_submission<C: ConnectionTrait>(
    db: &C,
    input: NewSubmission,
) -> Result<submissions::Model, DbErr> {
    let (reserved_at, submitted_at) = match input.status {
        SubmissionStatus::Reserved => (Some(input.now), None),
        _ => (None, Some(input.now)),
    };

    let new_submission = submissions::ActiveModel {
        id: Set(Uuid::new_v4()),
        campaign_id: Set(input.campaign_id),
        creator_id: Set(input.creator_id),
        proof_url: Set(input.proof_url),
        social_link: Set(input.social_link),
        status: Set(input.status),
        reserved_at: Set(reserved_at),
        submitted_at: Set(submitted_at),
        reviewed_at: Set(None),
        reviewed_by: Set(None),
        feedback: Set(None),
        created_at: Set(input.now),
    };

    new_submission.insert(db).await
}

/// Fetch a single submission by ID.
pub async fn get_submission_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<submissions::Model>, DbErr> {
    submissions::Entity::find_by_id(id).one(db).await
}

/// Whether the creator already holds a `reserved` or `submitted` claim on the campaign.
pub async fn open_submission_exists<C: ConnectionTrait>(
    db: &C,
    campaign_id: Uuid,
    creator_id: Uuid,
) -> Result<bool, DbErr> {
    let count = submissions::Entity::find()
        .filter(submissions::Column::CampaignId.eq(campaign_id))
        .filter(submissions::Column::CreatorId.eq(creator_id))
        .filter(submissions::Column::Status.is_in(SubmissionStatus::open()))
        .count(db)
        .await?;

    Ok(count > 0)
}

/// Submissions awaiting review joined with their campaign, oldest first.
pub async fn get_pending_with_campaigns<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<(submissions::Model, Option<campaigns::Model>)>, DbErr> {
    submissions::Entity::find()
        .filter(submissions::Column::Status.eq(SubmissionStatus::Submitted))
        .find_also_related(campaigns::Entity)
        .order_by_asc(submissions::Column::SubmittedAt)
        .order_by_asc(submissions::Column::Id)
        .all(db)
        .await
}

fn offset_for(page: u64, limit: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(limit)
}

/// Fetch a creator's submissions, newest first, with pagination.
pub async fn get_submissions_by_creator<C: ConnectionTrait>(
    db: &C,
    creator_id: Uuid,
    page: u64,
    limit: u64,
) -> Result<Vec<submissions::Model>, DbErr> {
    submissions::Entity::find()
        .filter(submissions::Column::CreatorId.eq(creator_id))
        .order_by_desc(submissions::Column::CreatedAt)
        .order_by_desc(submissions::Column::Id)
        .offset(offset_for(page, limit))
        .limit(limit)
        .all(db)
        .await
}

/// Compare-and-swap `submitted -> approved|rejected`. Returns `false` if
/// the submission was not in `submitted` state.
pub async fn mark_decided<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    status: SubmissionStatus,
    reviewer_id: Uuid,
    feedback: Option<String>,
    now: DateTime<Utc>,
) -> Result<bool, DbErr> {
    let result = submissions::Entity::update_many()
        .col_expr(submissions::Column::Status, Expr::value(status))
        .col_expr(submissions::Column::ReviewedAt, Expr::value(Some(now)))
        .col_expr(submissions::Column::ReviewedBy, Expr::value(Some(reviewer_id)))
        .col_expr(submissions::Column::Feedback, Expr::value(feedback))
        .filter(submissions::Column::Id.eq(id))
        .filter(submissions::Column::Status.eq(SubmissionStatus::Submitted))
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}

/// Compare-and-swap `reserved -> submitted` with the proof attached.
pub async fn attach_proof<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    proof_url: String,
    social_link: Option<String>,
    now: DateTime<Utc>,
) -> Result<bool, DbErr> {
    let result = submissions::Entity::update_many()
        .col_expr(
            submissions::Column::Status,
            Expr::value(SubmissionStatus::Submitted),
        )
        .col_expr(submissions::Column::ProofUrl, Expr::value(Some(proof_url)))
        .col_expr(submissions::Column::SocialLink, Expr::value(social_link))
        .col_expr(submissions::Column::SubmittedAt, Expr::value(Some(now)))
        .filter(submissions::Column::Id.eq(id))
        .filter(submissions::Column::Status.eq(SubmissionStatus::Reserved))
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}

/// Delete a submission only while it is still `reserved`.
pub async fn delete_reserved<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, DbErr> {
    let result = submissions::Entity::delete_many()
        .filter(submissions::Column::Id.eq(id))
        .filter(submissions::Column::Status.eq(SubmissionStatus::Reserved))
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}

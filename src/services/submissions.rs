use reqwest::Url;
use sea_orm::{DatabaseTransaction, TransactionTrait};
use uuid::Uuid;

use super::{ServiceContext, now};
use crate::auth::policy::{self, Actor};
use crate::db::campaigns as campaign_db;
use crate::db::submissions::{self as submission_db, NewSubmission};
use crate::error::{AppError, AppResult};
use crate::models::{MAX_PAGE, PaginationQuery};
use crate::models::campaigns;
use crate::models::submissions::{
    self, CreateSubmission, PendingSubmission, ReserveSlot, SubmissionStatus, SubmitProof,
};

/// Accept only absolute http(s) links.
pub fn validate_link(field: &str, raw: &str) -> AppResult<String> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed)
        .map_err(|e| AppError::Validation(format!("{field} is not a valid URL: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(AppError::Validation(format!(
            "{field} must be an http or https link"
        )));
    }

    Ok(trimmed.to_string())
}

fn validate_optional_link(field: &str, raw: Option<String>) -> AppResult<Option<String>> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(link) => validate_link(field, link).map(Some),
    }
}

fn closed(campaign: &campaigns::Model) -> AppError {
    AppError::CampaignClosed(format!(
        "Campaign {} is not accepting submissions",
        campaign.id
    ))
}

async fn load_campaign(txn: &DatabaseTransaction, id: Uuid) -> AppResult<campaigns::Model> {
    campaign_db::get_campaign_by_id(txn, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Campaign {id} not found")))
}

async fn load_submission(txn: &DatabaseTransaction, id: Uuid) -> AppResult<submissions::Model> {
    submission_db::get_submission_by_id(txn, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Submission {id} not found")))
}

/// Take a slot on an open campaign and insert the claim, all or nothing.
///
/// The guarded increment locks the campaign row, so claims on one campaign
/// queue behind each other and the duplicate check after it sees every
/// committed claim.
async fn claim_slot(
    ctx: &ServiceContext,
    campaign_id: Uuid,
    creator_id: Uuid,
    status: SubmissionStatus,
    proof_url: Option<String>,
    social_link: Option<String>,
) -> AppResult<submissions::Model> {
    let now = now();

    ctx.bounded(async {
        let txn = ctx.db.begin().await?;

        let campaign = load_campaign(&txn, campaign_id).await?;
        if !campaign.is_open(now) {
            return Err(closed(&campaign));
        }

        if !campaign_db::try_claim_slot(&txn, campaign_id, now).await? {
            // Guard failed: work out which rule the campaign now violates.
            let campaign = load_campaign(&txn, campaign_id).await?;
            if !campaign.is_open(now) {
                return Err(closed(&campaign));
            }
            if submission_db::open_submission_exists(&txn, campaign_id, creator_id).await? {
                return Err(duplicate(campaign_id));
            }
            return Err(AppError::CapacityExceeded(format!(
                "Campaign {campaign_id} has no free slots"
            )));
        }

        if submission_db::open_submission_exists(&txn, campaign_id, creator_id).await? {
            return Err(duplicate(campaign_id));
        }

        let submission = submission_db::insert_submission(
            &txn,
            NewSubmission {
                campaign_id,
                creator_id,
                proof_url,
                social_link,
                status,
                now,
            },
        )
        .await?;

        txn.commit().await?;
        Ok(submission)
    })
    .await
}

fn duplicate(campaign_id: Uuid) -> AppError {
    AppError::DuplicateSubmission(format!(
        "You already have an open submission for campaign {campaign_id}"
    ))
}

/// A creator submits proof for a campaign. The new submission enters `submitted`.
pub async fn create_submission(
    ctx: &ServiceContext,
    actor: &Actor,
    creator_id: Uuid,
    input: CreateSubmission,
) -> AppResult<submissions::Model> {
    policy::can_create_submission(actor, creator_id)?;

    let proof_url = validate_link("proof_url", &input.proof_url)?;
    let social_link = validate_optional_link("social_link", input.social_link)?;

    let result = claim_slot(
        ctx,
        input.campaign_id,
        creator_id,
        SubmissionStatus::Submitted,
        Some(proof_url),
        social_link,
    )
    .await;

    match &result {
        Ok(submission) => tracing::info!(
            submission_id = %submission.id,
            campaign_id = %submission.campaign_id,
            creator_id = %creator_id,
            "Submission created"
        ),
        Err(e) => tracing::warn!(
            campaign_id = %input.campaign_id,
            creator_id = %creator_id,
            error = %e,
            "Submission refused"
        ),
    }

    result
}

/// A creator holds a slot before uploading proof. The reservation counts
/// toward capacity until proof is attached or it is withdrawn.
pub async fn reserve_slot(
    ctx: &ServiceContext,
    actor: &Actor,
    creator_id: Uuid,
    input: ReserveSlot,
) -> AppResult<submissions::Model> {
    policy::can_create_submission(actor, creator_id)?;

    let submission = claim_slot(
        ctx,
        input.campaign_id,
        creator_id,
        SubmissionStatus::Reserved,
        None,
        None,
    )
    .await?;

    tracing::info!(
        submission_id = %submission.id,
        campaign_id = %submission.campaign_id,
        creator_id = %creator_id,
        "Slot reserved"
    );

    Ok(submission)
}

/// Attach proof to an own reservation: `reserved -> submitted`.
pub async fn submit_proof(
    ctx: &ServiceContext,
    actor: &Actor,
    submission_id: Uuid,
    input: SubmitProof,
) -> AppResult<submissions::Model> {
    let proof_url = validate_link("proof_url", &input.proof_url)?;
    let social_link = validate_optional_link("social_link", input.social_link)?;
    let now = now();

    let submission = ctx
        .bounded(async {
            let txn = ctx.db.begin().await?;

            let reservation = load_submission(&txn, submission_id).await?;
            policy::can_create_submission(actor, reservation.creator_id)?;

            if reservation.status != SubmissionStatus::Reserved {
                return Err(AppError::InvalidState(format!(
                    "Submission is already {:?}; only reservations take proof",
                    reservation.status
                )));
            }

            let campaign = load_campaign(&txn, reservation.campaign_id).await?;
            if !campaign.is_open(now) {
                return Err(closed(&campaign));
            }

            if !submission_db::attach_proof(&txn, submission_id, proof_url, social_link, now)
                .await?
            {
                return Err(AppError::InvalidState(
                    "Reservation changed concurrently".to_string(),
                ));
            }

            let submission = load_submission(&txn, submission_id).await?;
            txn.commit().await?;
            Ok(submission)
        })
        .await?;

    tracing::info!(
        submission_id = %submission.id,
        campaign_id = %submission.campaign_id,
        "Proof attached to reservation"
    );

    Ok(submission)
}

/// Withdraw an own reservation and give its slot back.
pub async fn withdraw_reservation(
    ctx: &ServiceContext,
    actor: &Actor,
    submission_id: Uuid,
) -> AppResult<()> {
    let campaign_id = ctx
        .bounded(async {
            let txn = ctx.db.begin().await?;

            let reservation = load_submission(&txn, submission_id).await?;
            policy::can_create_submission(actor, reservation.creator_id)?;

            if reservation.status != SubmissionStatus::Reserved {
                return Err(AppError::InvalidState(format!(
                    "Submission is already {:?}; only reservations can be withdrawn",
                    reservation.status
                )));
            }

            if !submission_db::delete_reserved(&txn, submission_id).await? {
                return Err(AppError::InvalidState(
                    "Reservation changed concurrently".to_string(),
                ));
            }
            campaign_db::release_slot(&txn, reservation.campaign_id).await?;

            txn.commit().await?;
            Ok(reservation.campaign_id)
        })
        .await?;

    tracing::info!(
        submission_id = %submission_id,
        campaign_id = %campaign_id,
        "Reservation withdrawn"
    );

    Ok(())
}

/// Every `submitted` submission with its campaign, oldest first. Admin only.
pub async fn list_pending_submissions(
    ctx: &ServiceContext,
    actor: &Actor,
) -> AppResult<Vec<PendingSubmission>> {
    policy::can_review_submissions(actor)?;

    let db = &ctx.db;
    let rows = ctx
        .read_with_retry(move || async move {
            submission_db::get_pending_with_campaigns(db)
                .await
                .map_err(AppError::from)
        })
        .await?;

    rows.into_iter()
        .map(|(submission, campaign)| match campaign {
            Some(campaign) => Ok(PendingSubmission {
                submission,
                campaign,
            }),
            None => Err(AppError::Database(format!(
                "Submission {} references missing campaign {}",
                submission.id, submission.campaign_id
            ))),
        })
        .collect()
}

/// The caller's own submissions, newest first.
pub async fn list_my_submissions(
    ctx: &ServiceContext,
    actor: &Actor,
    query: &PaginationQuery,
) -> AppResult<Vec<submissions::Model>> {
    let (page, limit) = (query.page(), query.limit());
    if page > MAX_PAGE {
        return Err(AppError::Validation(format!(
            "page must be at most {MAX_PAGE}"
        )));
    }

    let db = &ctx.db;
    let creator_id = actor.id;

    ctx.read_with_retry(move || async move {
        submission_db::get_submissions_by_creator(db, creator_id, page, limit)
            .await
            .map_err(AppError::from)
    })
    .await
}

use sea_orm::TransactionTrait;
use uuid::Uuid;

use super::{ServiceContext, now};
use crate::auth::policy::{self, Actor};
use crate::db::campaigns as campaign_db;
use crate::db::submissions as submission_db;
use crate::error::{AppError, AppResult};
use crate::ledger::PayoutAccrual;
use crate::models::submissions::{self, DecideSubmission, Decision, SubmissionStatus};

/// Review a `submitted` submission. The status swap, the approval counter and
/// (on the last slot) campaign completion commit together or not at all; the
/// payout accrual is reported only after the commit.
pub async fn decide(
    ctx: &ServiceContext,
    actor: &Actor,
    submission_id: Uuid,
    input: DecideSubmission,
) -> AppResult<submissions::Model> {
    policy::can_review_submissions(actor)?;

    let decision = input.decision;
    let feedback = match decision {
        Decision::Rejected => input
            .feedback
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty()),
        Decision::Approved => None,
    };
    let now = now();

    let result = ctx
        .bounded(async {
            let txn = ctx.db.begin().await?;

            let submission = submission_db::get_submission_by_id(&txn, submission_id)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Submission {submission_id} not found"))
                })?;

            if submission.status != SubmissionStatus::Submitted {
                let reason = if submission.status.is_terminal() {
                    "it has already been reviewed"
                } else {
                    "it is a reservation still waiting for proof"
                };
                return Err(AppError::InvalidState(format!(
                    "Submission {submission_id} cannot be reviewed: {reason}"
                )));
            }

            let swapped = submission_db::mark_decided(
                &txn,
                submission_id,
                decision.into(),
                actor.id,
                feedback,
                now,
            )
            .await?;
            if !swapped {
                return Err(AppError::InvalidState(
                    "Submission was reviewed concurrently".to_string(),
                ));
            }

            let campaign = campaign_db::get_campaign_by_id(&txn, submission.campaign_id)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Campaign {} not found", submission.campaign_id))
                })?;

            let accrual = match decision {
                Decision::Approved => {
                    if !campaign_db::try_record_approval(&txn, campaign.id).await? {
                        return Err(AppError::CapacityExceeded(format!(
                            "Campaign {} already has {} approved creators",
                            campaign.id, campaign.max_creators
                        )));
                    }
                    if campaign_db::complete_if_filled(&txn, campaign.id, now).await? {
                        tracing::info!(campaign_id = %campaign.id, "Campaign filled and completed");
                    }

                    Some(PayoutAccrual {
                        submission_id,
                        campaign_id: campaign.id,
                        creator_id: submission.creator_id,
                        amount: campaign.payout_per_creator,
                        accrued_at: now,
                    })
                }
                Decision::Rejected => {
                    campaign_db::release_slot(&txn, campaign.id).await?;
                    None
                }
            };

            let decided = submission_db::get_submission_by_id(&txn, submission_id)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Submission {submission_id} not found"))
                })?;

            txn.commit().await?;
            Ok((decided, accrual))
        })
        .await;

    let (decided, accrual) = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!(
                submission_id = %submission_id,
                decision = ?decision,
                error = %e,
                "Review refused"
            );
            return Err(e);
        }
    };

    if let Some(accrual) = accrual {
        ctx.ledger.record_accrual(&accrual);
    }

    tracing::info!(
        submission_id = %decided.id,
        campaign_id = %decided.campaign_id,
        decision = ?decision,
        reviewer_id = %actor.id,
        "Submission reviewed"
    );

    Ok(decided)
}

use chrono::{DateTime, SubsecRound, Utc};
use sea_orm::TransactionTrait;
use uuid::Uuid;

use super::{ServiceContext, estimator::estimate_reach, now};
use crate::auth::policy::{self, Actor};
use crate::db::campaigns::{self as campaign_db, NewCampaign};
use crate::error::{AppError, AppResult};
use crate::models::campaigns::{
    self, BrandStats, CampaignCursor, CampaignListQuery, CampaignPage, CampaignStatus,
    CreateCampaign,
};
use crate::models::users::Roles;

const MIN_TITLE_LEN: usize = 5;
const MIN_DESCRIPTION_LEN: usize = 20;
const MIN_INSTRUCTIONS_LEN: usize = 20;
const MIN_CITY_LEN: usize = 3;

fn invalid(message: impl Into<String>) -> AppError {
    AppError::Validation(message.into())
}

fn require_text(field: &str, value: &str, min_len: usize) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.chars().count() < min_len {
        return Err(invalid(format!(
            "{field} must be at least {min_len} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Check every field of a new campaign and derive its capacity and initial status.
pub fn validate_new_campaign(
    brand_id: Uuid,
    input: CreateCampaign,
    now: DateTime<Utc>,
    default_platform_fee_percent: f64,
    moderation: bool,
) -> AppResult<NewCampaign> {
    let title = require_text("title", &input.title, MIN_TITLE_LEN)?;
    let description = require_text("description", &input.description, MIN_DESCRIPTION_LEN)?;
    let instructions = require_text("instructions", &input.instructions, MIN_INSTRUCTIONS_LEN)?;
    let target_city = require_text("target_city", &input.target_city, MIN_CITY_LEN)?;

    if !input.total_budget.is_finite() || input.total_budget <= 0.0 {
        return Err(invalid("total_budget must be a positive amount"));
    }
    if !input.payout_per_creator.is_finite() || input.payout_per_creator <= 0.0 {
        return Err(invalid("payout_per_creator must be a positive amount"));
    }
    if input.payout_per_creator > input.total_budget {
        return Err(invalid("payout_per_creator cannot exceed total_budget"));
    }

    let platform_fee_percent = input
        .platform_fee_percent
        .unwrap_or(default_platform_fee_percent);
    if !(0.0..=100.0).contains(&platform_fee_percent) {
        return Err(invalid("platform_fee_percent must be between 0 and 100"));
    }

    let deadline = input.deadline.trunc_subsecs(6);
    if deadline <= now {
        return Err(invalid("deadline must be in the future"));
    }

    let reach = estimate_reach(
        input.total_budget,
        input.payout_per_creator,
        platform_fee_percent,
    );
    if reach == 0 {
        return Err(invalid(
            "total_budget cannot fund a single creator after the platform fee",
        ));
    }

    let max_creators = match input.max_creators {
        Some(declared) if declared == 0 || u64::from(declared) > reach => {
            return Err(invalid(format!(
                "max_creators must be between 1 and {reach} for this budget"
            )));
        }
        Some(declared) => u64::from(declared),
        None => reach,
    };
    let max_creators = i32::try_from(max_creators)
        .map_err(|_| invalid("max_creators is too large; declare a smaller value"))?;

    let target_age_groups = input
        .target_age_groups
        .map(|groups| {
            groups
                .into_iter()
                .map(|g| g.trim().to_string())
                .filter(|g| !g.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|groups| !groups.is_empty());

    let status = if input.save_as_draft {
        CampaignStatus::Draft
    } else if moderation {
        CampaignStatus::PendingApproval
    } else {
        CampaignStatus::Active
    };

    Ok(NewCampaign {
        brand_id,
        title,
        description,
        instructions,
        total_budget: input.total_budget,
        payout_per_creator: input.payout_per_creator,
        platform_fee_percent,
        target_city,
        target_age_groups,
        max_creators,
        status,
        created_at: now,
        deadline,
    })
}

/// Create a campaign owned by the calling brand.
pub async fn create_campaign(
    ctx: &ServiceContext,
    actor: &Actor,
    input: CreateCampaign,
) -> AppResult<campaigns::Model> {
    policy::can_create_campaign(actor)?;

    let new_campaign = validate_new_campaign(
        actor.id,
        input,
        now(),
        ctx.default_platform_fee_percent,
        ctx.campaign_moderation,
    )?;

    let campaign = ctx
        .bounded(async {
            campaign_db::insert_campaign(&ctx.db, new_campaign)
                .await
                .map_err(AppError::from)
        })
        .await?;

    tracing::info!(
        campaign_id = %campaign.id,
        brand_id = %campaign.brand_id,
        status = ?campaign.status,
        max_creators = campaign.max_creators,
        "Campaign created"
    );

    Ok(campaign)
}

fn cursor_of(query: &CampaignListQuery) -> AppResult<Option<CampaignCursor>> {
    match (query.cursor_created_at, query.cursor_id) {
        (Some(created_at), Some(id)) => Ok(Some(CampaignCursor { created_at, id })),
        (None, None) => Ok(None),
        _ => Err(invalid(
            "cursor_created_at and cursor_id must be given together",
        )),
    }
}

/// Fetch `limit + 1` rows to know whether another page exists.
fn into_page(mut items: Vec<campaigns::Model>, limit: u64) -> CampaignPage {
    let has_more = items.len() as u64 > limit;
    items.truncate(limit as usize);

    let next_cursor = if has_more {
        items.last().map(|c| CampaignCursor {
            created_at: c.created_at,
            id: c.id,
        })
    } else {
        None
    };

    CampaignPage { items, next_cursor }
}

/// Active campaigns whose deadline has not passed, newest first. Brands only
/// see their own. Every call reads current state.
pub async fn list_active_campaigns(
    ctx: &ServiceContext,
    actor: &Actor,
    query: &CampaignListQuery,
) -> AppResult<CampaignPage> {
    let cursor = cursor_of(query)?;
    let limit = query.limit();
    let city = query
        .city
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());
    let brand_scope = (actor.role == Roles::Brand).then_some(actor.id);
    let db = &ctx.db;
    let now = now();

    let items = ctx
        .read_with_retry(move || async move {
            campaign_db::list_active_campaigns(db, now, city, brand_scope, limit + 1, cursor)
                .await
                .map_err(AppError::from)
        })
        .await?;

    Ok(into_page(items, limit))
}

/// Every campaign of one brand, newest first, whatever its status.
pub async fn list_campaigns_by_owner(
    ctx: &ServiceContext,
    actor: &Actor,
    owner_id: Uuid,
    query: &CampaignListQuery,
) -> AppResult<CampaignPage> {
    policy::can_list_owner_campaigns(actor, owner_id)?;

    let cursor = cursor_of(query)?;
    let limit = query.limit();
    let db = &ctx.db;

    let items = ctx
        .read_with_retry(move || async move {
            campaign_db::list_campaigns_by_owner(db, owner_id, limit + 1, cursor)
                .await
                .map_err(AppError::from)
        })
        .await?;

    Ok(into_page(items, limit))
}

/// Active campaign count, total spent and approved reach for one brand.
pub async fn brand_stats(
    ctx: &ServiceContext,
    actor: &Actor,
    owner_id: Uuid,
) -> AppResult<BrandStats> {
    policy::can_list_owner_campaigns(actor, owner_id)?;

    let db = &ctx.db;
    ctx.read_with_retry(move || async move {
        campaign_db::brand_stats(db, owner_id)
            .await
            .map_err(AppError::from)
    })
    .await
}

pub async fn get_campaign(
    ctx: &ServiceContext,
    actor: &Actor,
    id: Uuid,
) -> AppResult<campaigns::Model> {
    let db = &ctx.db;
    let campaign = ctx
        .read_with_retry(move || async move {
            campaign_db::get_campaign_by_id(db, id)
                .await
                .map_err(AppError::from)
        })
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Campaign {id} not found")))?;

    policy::can_read_campaign(actor, &campaign)?;
    Ok(campaign)
}

/// Move a campaign along its lifecycle (pause, resume, complete, archive, ...).
pub async fn update_campaign_status(
    ctx: &ServiceContext,
    actor: &Actor,
    id: Uuid,
    target: CampaignStatus,
) -> AppResult<campaigns::Model> {
    let updated = ctx
        .bounded(async {
            let txn = ctx.db.begin().await?;

            let campaign = campaign_db::get_campaign_by_id(&txn, id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Campaign {id} not found")))?;

            policy::can_write_campaign(actor, &campaign)?;

            if !campaign.status.can_transition_to(target) {
                return Err(AppError::InvalidState(format!(
                    "Campaign cannot move from {:?} to {:?}",
                    campaign.status, target
                )));
            }

            match (campaign.status, target) {
                (CampaignStatus::PendingApproval, CampaignStatus::Active) if !actor.is_admin() => {
                    return Err(AppError::PermissionDenied(
                        "Only admins can approve a campaign for launch".to_string(),
                    ));
                }
                (CampaignStatus::Draft, CampaignStatus::Active)
                    if ctx.campaign_moderation && !actor.is_admin() =>
                {
                    return Err(AppError::PermissionDenied(
                        "Campaigns must be submitted for approval before launch".to_string(),
                    ));
                }
                (_, CampaignStatus::Active)
                    if campaign.approved_submissions >= campaign.max_creators =>
                {
                    return Err(AppError::InvalidState(
                        "Every slot of this campaign is already filled".to_string(),
                    ));
                }
                _ => {}
            }

            let swapped =
                campaign_db::transition_status(&txn, id, campaign.status, target, now()).await?;
            if !swapped {
                return Err(AppError::InvalidState(
                    "Campaign status changed concurrently; reload and retry".to_string(),
                ));
            }

            let updated = campaign_db::get_campaign_by_id(&txn, id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Campaign {id} not found")))?;

            txn.commit().await?;
            Ok(updated)
        })
        .await?;

    tracing::info!(
        campaign_id = %updated.id,
        status = ?updated.status,
        actor_id = %actor.id,
        "Campaign status changed"
    );

    Ok(updated)
}

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::*;
use uuid::Uuid;

use crate::models::campaigns::{self, AgeGroups, BrandStats, CampaignCursor, CampaignStatus};

/// A validated campaign ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewCampaign {
    pub brand_id: Uuid,
    pub title: String,
    pub description: String,
    pub instructions: String,
    pub total_budget: f64,
    pub payout_per_creator: f64,
    pub platform_fee_percent: f64,
    pub target_city: String,
    pub target_age_groups: Option<Vec<String>>,
    pub max_creators: i32,
    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
}

/// Insert a new campaign with zeroed counters.
pub async fn insert_campaign<C: ConnectionTrait>(
    db: &C,
    input: NewCampaign,
) -> Result<campaigns::Model, DbErr> {
    let new_campaign = campaigns::ActiveModel {
        id: Set(Uuid::new_v4()),
        brand_id: Set(input.brand_id),
        title: Set(input.title),
        description: Set(input.description),
        instructions: Set(input.instructions),
        total_budget: Set(input.total_budget),
        payout_per_creator: Set(input.payout_per_creator),
        platform_fee_percent: Set(input.platform_fee_percent),
        target_city: Set(input.target_city),
        target_age_groups: Set(input.target_age_groups.map(AgeGroups)),
        status: Set(input.status),
        max_creators: Set(input.max_creators),
        current_submissions: Set(0),
        approved_submissions: Set(0),
        created_at: Set(input.created_at),
        deadline: Set(input.deadline),
        updated_at: Set(None),
    };

    new_campaign.insert(db).await
}

/// Fetch a single campaign by ID.
pub async fn get_campaign_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<campaigns::Model>, DbErr> {
    campaigns::Entity::find_by_id(id).one(db).await
}

/// Active, not-yet-expired campaigns, newest first, keyset-paginated.
pub async fn list_active_campaigns<C: ConnectionTrait>(
    db: &C,
    now: DateTime<Utc>,
    city: Option<&str>,
    brand_id: Option<Uuid>,
    limit: u64,
    cursor: Option<CampaignCursor>,
) -> Result<Vec<campaigns::Model>, DbErr> {
    let mut query = campaigns::Entity::find()
        .filter(campaigns::Column::Status.eq(CampaignStatus::Active))
        .filter(campaigns::Column::Deadline.gt(now));

    if let Some(city) = city {
        query = query.filter(campaigns::Column::TargetCity.eq(city));
    }
    if let Some(brand_id) = brand_id {
        query = query.filter(campaigns::Column::BrandId.eq(brand_id));
    }

    paginate_newest_first(query, limit, cursor).all(db).await
}

/// All campaigns owned by one brand, newest first, keyset-paginated.
pub async fn list_campaigns_by_owner<C: ConnectionTrait>(
    db: &C,
    brand_id: Uuid,
    limit: u64,
    cursor: Option<CampaignCursor>,
) -> Result<Vec<campaigns::Model>, DbErr> {
    let query = campaigns::Entity::find().filter(campaigns::Column::BrandId.eq(brand_id));

    paginate_newest_first(query, limit, cursor).all(db).await
}

/// Dashboard totals over one brand's campaigns.
pub async fn brand_stats<C: ConnectionTrait>(db: &C, brand_id: Uuid) -> Result<BrandStats, DbErr> {
    let active_campaigns = campaigns::Entity::find()
        .filter(campaigns::Column::BrandId.eq(brand_id))
        .filter(campaigns::Column::Status.eq(CampaignStatus::Active))
        .count(db)
        .await?;

    let approvals: Vec<(i32, f64)> = campaigns::Entity::find()
        .select_only()
        .column(campaigns::Column::ApprovedSubmissions)
        .column(campaigns::Column::PayoutPerCreator)
        .filter(campaigns::Column::BrandId.eq(brand_id))
        .into_tuple()
        .all(db)
        .await?;

    let (total_spent, reach_generated) =
        approvals
            .into_iter()
            .fold((0.0, 0u64), |(spent, reach), (approved, payout)| {
                let approved = u64::try_from(approved).unwrap_or(0);
                (spent + approved as f64 * payout, reach + approved)
            });

    Ok(BrandStats {
        active_campaigns,
        total_spent,
        reach_generated,
    })
}

fn paginate_newest_first(
    mut query: Select<campaigns::Entity>,
    limit: u64,
    cursor: Option<CampaignCursor>,
) -> Select<campaigns::Entity> {
    if let Some(cursor) = cursor {
        query = query.filter(
            Condition::any()
                .add(campaigns::Column::CreatedAt.lt(cursor.created_at))
                .add(
                    Condition::all()
                        .add(campaigns::Column::CreatedAt.eq(cursor.created_at))
                        .add(campaigns::Column::Id.lt(cursor.id)),
                ),
        );
    }

    query
        .order_by_desc(campaigns::Column::CreatedAt)
        .order_by_desc(campaigns::Column::Id)
        .limit(limit)
}

/// Take one slot: `current_submissions += 1` only while the campaign is
/// open and below capacity. Returns `false` if the guard did not match.
pub async fn try_claim_slot<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    now: DateTime<Utc>,
) -> Result<bool, DbErr> {
    let result = campaigns::Entity::update_many()
        .col_expr(
            campaigns::Column::CurrentSubmissions,
            Expr::col(campaigns::Column::CurrentSubmissions).add(1),
        )
        .filter(campaigns::Column::Id.eq(id))
        .filter(campaigns::Column::Status.eq(CampaignStatus::Active))
        .filter(campaigns::Column::Deadline.gt(now))
        .filter(
            Expr::col(campaigns::Column::CurrentSubmissions)
                .lt(Expr::col(campaigns::Column::MaxCreators)),
        )
        .filter(
            Expr::col(campaigns::Column::ApprovedSubmissions)
                .lt(Expr::col(campaigns::Column::MaxCreators)),
        )
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}

/// Give a slot back (rejection or withdrawn reservation). Never drops
/// `current_submissions` below `approved_submissions`.
pub async fn release_slot<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, DbErr> {
    let result = campaigns::Entity::update_many()
        .col_expr(
            campaigns::Column::CurrentSubmissions,
            Expr::col(campaigns::Column::CurrentSubmissions).sub(1),
        )
        .filter(campaigns::Column::Id.eq(id))
        .filter(
            Expr::col(campaigns::Column::CurrentSubmissions)
                .gt(Expr::col(campaigns::Column::ApprovedSubmissions)),
        )
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}

/// `approved_submissions += 1` guarded by `approved < max_creators` and
/// `approved < current_submissions`. Returns `false` if the guard did not match.
pub async fn try_record_approval<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, DbErr> {
    let result = campaigns::Entity::update_many()
        .col_expr(
            campaigns::Column::ApprovedSubmissions,
            Expr::col(campaigns::Column::ApprovedSubmissions).add(1),
        )
        .filter(campaigns::Column::Id.eq(id))
        .filter(
            Expr::col(campaigns::Column::ApprovedSubmissions)
                .lt(Expr::col(campaigns::Column::MaxCreators)),
        )
        .filter(
            Expr::col(campaigns::Column::ApprovedSubmissions)
                .lt(Expr::col(campaigns::Column::CurrentSubmissions)),
        )
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}

/// Move an active or paused campaign to `completed` once every slot is approved.
pub async fn complete_if_filled<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    now: DateTime<Utc>,
) -> Result<bool, DbErr> {
    let result = campaigns::Entity::update_many()
        .col_expr(
            campaigns::Column::Status,
            Expr::value(CampaignStatus::Completed),
        )
        .col_expr(campaigns::Column::UpdatedAt, Expr::value(Some(now)))
        .filter(campaigns::Column::Id.eq(id))
        .filter(
            campaigns::Column::Status.is_in([CampaignStatus::Active, CampaignStatus::Paused]),
        )
        .filter(
            Expr::col(campaigns::Column::ApprovedSubmissions)
                .gte(Expr::col(campaigns::Column::MaxCreators)),
        )
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}

/// Compare-and-swap the campaign status. Returns `false` if the status
/// changed underneath the caller.
pub async fn transition_status<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    from: CampaignStatus,
    to: CampaignStatus,
    now: DateTime<Utc>,
) -> Result<bool, DbErr> {
    let result = campaigns::Entity::update_many()
        .col_expr(campaigns::Column::Status, Expr::value(to))
        .col_expr(campaigns::Column::UpdatedAt, Expr::value(Some(now)))
        .filter(campaigns::Column::Id.eq(id))
        .filter(campaigns::Column::Status.eq(from))
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}

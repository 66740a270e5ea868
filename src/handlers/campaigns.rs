use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::error::AppError;
use crate::models::campaigns::{
    CampaignListQuery, CreateCampaign, EstimateQuery, UpdateCampaignStatus,
};
use crate::services::{self, ServiceContext, estimator};

/// GET /api/campaigns: active campaigns, newest first.
/// Query params: ?city=&limit=&cursor_created_at=&cursor_id=
pub async fn list_active_campaigns(
    user: AuthenticatedUser,
    ctx: web::Data<ServiceContext>,
    query: web::Query<CampaignListQuery>,
) -> Result<HttpResponse, AppError> {
    let page = services::campaigns::list_active_campaigns(&ctx, &user.actor(), &query).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// POST /api/campaigns: a brand launches (or drafts) a campaign.
pub async fn create_campaign(
    user: AuthenticatedUser,
    ctx: web::Data<ServiceContext>,
    body: web::Json<CreateCampaign>,
) -> Result<HttpResponse, AppError> {
    let campaign =
        services::campaigns::create_campaign(&ctx, &user.actor(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(campaign))
}

/// GET /api/campaigns/estimate: how many creators a budget can pay.
pub async fn estimate(
    _user: AuthenticatedUser,
    ctx: web::Data<ServiceContext>,
    query: web::Query<EstimateQuery>,
) -> HttpResponse {
    let fee = query
        .platform_fee_percent
        .unwrap_or(ctx.default_platform_fee_percent);
    let estimated_creators =
        estimator::estimate_reach(query.total_budget, query.payout_per_creator, fee);

    HttpResponse::Ok().json(serde_json::json!({
        "estimated_creators": estimated_creators,
        "platform_fee_percent": fee,
    }))
}

/// GET /api/campaigns/mine: the calling brand's campaigns in every status.
pub async fn list_my_campaigns(
    user: AuthenticatedUser,
    ctx: web::Data<ServiceContext>,
    query: web::Query<CampaignListQuery>,
) -> Result<HttpResponse, AppError> {
    let actor = user.actor();
    let page = services::campaigns::list_campaigns_by_owner(&ctx, &actor, actor.id, &query).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/campaigns/mine/stats: dashboard totals for the calling brand.
pub async fn my_stats(
    user: AuthenticatedUser,
    ctx: web::Data<ServiceContext>,
) -> Result<HttpResponse, AppError> {
    let actor = user.actor();
    let stats = services::campaigns::brand_stats(&ctx, &actor, actor.id).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// GET /api/campaigns/owner/{owner_id}: one brand's campaigns (owner or admin).
pub async fn list_owner_campaigns(
    user: AuthenticatedUser,
    ctx: web::Data<ServiceContext>,
    path: web::Path<Uuid>,
    query: web::Query<CampaignListQuery>,
) -> Result<HttpResponse, AppError> {
    let page = services::campaigns::list_campaigns_by_owner(
        &ctx,
        &user.actor(),
        path.into_inner(),
        &query,
    )
    .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/campaigns/{id}
pub async fn get_campaign(
    user: AuthenticatedUser,
    ctx: web::Data<ServiceContext>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let campaign =
        services::campaigns::get_campaign(&ctx, &user.actor(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(campaign))
}

/// PUT /api/campaigns/{id}/status: pause, resume, complete, archive, launch.
pub async fn update_status(
    user: AuthenticatedUser,
    ctx: web::Data<ServiceContext>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCampaignStatus>,
) -> Result<HttpResponse, AppError> {
    let campaign = services::campaigns::update_campaign_status(
        &ctx,
        &user.actor(),
        path.into_inner(),
        body.status,
    )
    .await?;
    Ok(HttpResponse::Ok().json(campaign))
}

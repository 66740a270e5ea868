use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::error::AppError;
use crate::models::PaginationQuery;
use crate::models::submissions::{CreateSubmission, ReserveSlot, SubmitProof};
use crate::services::{self, ServiceContext};

/// POST /api/submissions: a creator submits proof for a campaign.
///
/// The creator is always the authenticated user; it is never read from the body.
pub async fn create_submission(
    user: AuthenticatedUser,
    ctx: web::Data<ServiceContext>,
    body: web::Json<CreateSubmission>,
) -> Result<HttpResponse, AppError> {
    let actor = user.actor();
    let submission =
        services::submissions::create_submission(&ctx, &actor, actor.id, body.into_inner())
            .await?;
    Ok(HttpResponse::Created().json(submission))
}

/// POST /api/submissions/reserve: hold a slot before uploading proof.
pub async fn reserve_slot(
    user: AuthenticatedUser,
    ctx: web::Data<ServiceContext>,
    body: web::Json<ReserveSlot>,
) -> Result<HttpResponse, AppError> {
    let actor = user.actor();
    let reservation =
        services::submissions::reserve_slot(&ctx, &actor, actor.id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(reservation))
}

/// PUT /api/submissions/{id}/proof: attach proof to an own reservation.
pub async fn submit_proof(
    user: AuthenticatedUser,
    ctx: web::Data<ServiceContext>,
    path: web::Path<Uuid>,
    body: web::Json<SubmitProof>,
) -> Result<HttpResponse, AppError> {
    let submission = services::submissions::submit_proof(
        &ctx,
        &user.actor(),
        path.into_inner(),
        body.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(submission))
}

/// DELETE /api/submissions/{id}: withdraw an own reservation.
pub async fn withdraw_reservation(
    user: AuthenticatedUser,
    ctx: web::Data<ServiceContext>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    services::submissions::withdraw_reservation(&ctx, &user.actor(), id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Reservation {id} withdrawn"),
    })))
}

/// GET /api/submissions/mine: the caller's submissions.
/// Query params: ?page=1&limit=20
pub async fn list_my_submissions(
    user: AuthenticatedUser,
    ctx: web::Data<ServiceContext>,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    let submissions =
        services::submissions::list_my_submissions(&ctx, &user.actor(), &query).await?;
    Ok(HttpResponse::Ok().json(submissions))
}

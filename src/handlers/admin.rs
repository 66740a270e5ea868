use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::error::AppError;
use crate::models::submissions::DecideSubmission;
use crate::services::{self, ServiceContext};

/// GET /api/admin/queue: submissions awaiting review, with their campaigns.
pub async fn review_queue(
    user: AuthenticatedUser,
    ctx: web::Data<ServiceContext>,
) -> Result<HttpResponse, AppError> {
    let pending = services::submissions::list_pending_submissions(&ctx, &user.actor()).await?;
    Ok(HttpResponse::Ok().json(pending))
}

/// POST /api/admin/submissions/{id}/decision: approve or reject.
pub async fn decide(
    user: AuthenticatedUser,
    ctx: web::Data<ServiceContext>,
    path: web::Path<Uuid>,
    body: web::Json<DecideSubmission>,
) -> Result<HttpResponse, AppError> {
    let submission = services::approval::decide(
        &ctx,
        &user.actor(),
        path.into_inner(),
        body.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(submission))
}

use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::middleware::AuthenticatedUser;
use crate::auth::policy;
use crate::db::users;
use crate::error::AppError;
use crate::models::users::{CompleteProfile, UserResponse};

/// GET /api/auth/me: return the currently authenticated user's profile.
pub async fn me(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(UserResponse::from(user.0))
}

/// POST /api/auth/complete-profile: set display name / role after first login.
///
/// Users may choose between `creator` and `brand`; `admin` is never self-assigned.
pub async fn complete_profile(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CompleteProfile>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner();
    if let Some(role) = input.role {
        policy::can_self_assign_role(role)?;
    }

    let updated = users::complete_profile(db.get_ref(), user.0.id, input).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

pub mod admin;
pub mod auth;
pub mod campaigns;
pub mod submissions;

use actix_web::web;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // Auth routes (protected by JWT via the AuthenticatedUser extractor)
    cfg.service(
        web::scope("/auth")
            .route("/me", web::get().to(auth::me))
            .route("/complete-profile", web::post().to(auth::complete_profile)),
    );

    // Campaign routes (literal paths before `/{id}`)
    cfg.service(
        web::scope("/campaigns")
            .route("", web::get().to(campaigns::list_active_campaigns))
            .route("", web::post().to(campaigns::create_campaign))
            .route("/estimate", web::get().to(campaigns::estimate))
            .route("/mine", web::get().to(campaigns::list_my_campaigns))
            .route("/mine/stats", web::get().to(campaigns::my_stats))
            .route("/owner/{owner_id}", web::get().to(campaigns::list_owner_campaigns))
            .route("/{id}", web::get().to(campaigns::get_campaign))
            .route("/{id}/status", web::put().to(campaigns::update_status)),
    );

    // Submission routes (creator-facing)
    cfg.service(
        web::scope("/submissions")
            .route("", web::post().to(submissions::create_submission))
            .route("/reserve", web::post().to(submissions::reserve_slot))
            .route("/mine", web::get().to(submissions::list_my_submissions))
            .route("/{id}/proof", web::put().to(submissions::submit_proof))
            .route("/{id}", web::delete().to(submissions::withdraw_reservation)),
    );

    // Review routes (admin only, enforced by the access policy)
    cfg.service(
        web::scope("/admin")
            .route("/queue", web::get().to(admin::review_queue))
            .route("/submissions/{id}/decision", web::post().to(admin::decide)),
    );
}

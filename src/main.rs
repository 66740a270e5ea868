use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use campaign_backend::auth::jwks::JwksCache;
use campaign_backend::auth::jwt::TokenVerifier;
use campaign_backend::config::AppConfig;
use campaign_backend::create_pool;
use campaign_backend::handlers;
use campaign_backend::services::ServiceContext;
use dotenv::dotenv;
use migration::{Migrator, MigratorTrait};
use std::io;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env().map_err(io::Error::other)?;

    let db = create_pool(&config).await.map_err(io::Error::other)?;
    tracing::info!(max_connections = config.db_max_connections, "Connected to database");

    if config.run_migrations {
        Migrator::up(&db, None).await.map_err(io::Error::other)?;
        tracing::info!("Migrations applied");
    }

    let verifier = match &config.supabase_jwt_secret {
        Some(secret) => {
            tracing::info!("Verifying tokens with the project JWT secret");
            TokenVerifier::Secret(secret.clone())
        }
        None => {
            tracing::info!(project_ref = %config.supabase_project_ref, "Verifying tokens via JWKS");
            let cache = JwksCache::new(&config.supabase_project_ref, &config.supabase_anon_key)
                .map_err(|e| {
                    tracing::error!(error = %e, "Failed to build the JWKS HTTP client");
                    io::Error::other(e)
                })?;
            TokenVerifier::Jwks(cache)
        }
    };
    let verifier_data = web::Data::new(verifier);

    let ctx_data = web::Data::new(ServiceContext::from_config(db.clone(), &config));
    let db_data = web::Data::new(db);

    let bind_addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(db_data.clone())
            .app_data(verifier_data.clone())
            .app_data(ctx_data.clone())
            .service(web::scope("/api").configure(handlers::init_routes))
    })
    .bind(&bind_addr)?
    .run()
    .await
}

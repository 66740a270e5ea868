//! Shared fixtures for the integration tests: an in-memory SQLite database
//! with the real migrations applied, plus users, campaigns and submissions
//! inserted straight through the db layer.
#![allow(dead_code)]

use campaign_backend::auth::policy::Actor;
use campaign_backend::db::campaigns::{self as campaign_db, NewCampaign};
use campaign_backend::db::submissions::{self as submission_db, NewSubmission};
use campaign_backend::db::users as user_db;
use campaign_backend::models::campaigns::{self, CampaignStatus, CreateCampaign};
use campaign_backend::models::submissions::{self, SubmissionStatus};
use campaign_backend::models::users::{CreateUserFromAuth, Roles};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection,
    IntoActiveModel, Set,
};
use uuid::Uuid;

/// A fresh database per test. One connection, so every query sees the same
/// in-memory database.
pub async fn setup_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .expect("Failed to open in-memory SQLite");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// A Postgres database with several pooled connections, so transactions
/// really overlap. Each call gets its own schema. `None` when
/// `TEST_DATABASE_URL` is not set.
pub async fn setup_postgres() -> Option<DatabaseConnection> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let schema = format!("test_{}", Uuid::new_v4().simple());

    let admin = Database::connect(url.as_str())
        .await
        .expect("Failed to connect to TEST_DATABASE_URL");
    admin
        .execute_unprepared(&format!("CREATE SCHEMA \"{schema}\""))
        .await
        .expect("Failed to create test schema");

    let mut opts = ConnectOptions::new(url);
    opts.max_connections(12)
        .set_schema_search_path(schema)
        .sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to test schema");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    Some(db)
}

pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub async fn create_user(db: &DatabaseConnection, role: Roles) -> Actor {
    let id = Uuid::new_v4();
    let user = user_db::find_or_create_from_auth(
        db,
        CreateUserFromAuth {
            id,
            email: format!("{id}@example.com"),
            display_name: Some("Test User".to_string()),
            avatar_url: None,
            auth_provider: "supabase".to_string(),
            role,
        },
    )
    .await
    .expect("Failed to create user");

    Actor::from(&user)
}

/// A valid request body: 5000 budget, 100 payout, default fee.
pub fn campaign_input() -> CreateCampaign {
    CreateCampaign {
        title: "Summer Coffee Launch".to_string(),
        description: "Launching our cold brew across the city parks".to_string(),
        instructions: "Take a selfie with the coffee cup in a park".to_string(),
        total_budget: 5000.0,
        payout_per_creator: 100.0,
        platform_fee_percent: None,
        target_city: "Bangalore".to_string(),
        target_age_groups: Some(vec!["18-24".to_string(), "25-34".to_string()]),
        max_creators: None,
        deadline: Utc::now() + Duration::days(14),
        save_as_draft: false,
    }
}

/// Tunable campaign row inserted without going through validation.
pub struct CampaignFixture {
    pub status: CampaignStatus,
    pub max_creators: i32,
    pub city: &'static str,
    pub created_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
}

impl Default for CampaignFixture {
    fn default() -> Self {
        let now = now();
        Self {
            status: CampaignStatus::Active,
            max_creators: 10,
            city: "Bangalore",
            created_at: now,
            deadline: now + Duration::days(7),
        }
    }
}

pub async fn seed_campaign(
    db: &DatabaseConnection,
    brand_id: Uuid,
    fixture: CampaignFixture,
) -> campaigns::Model {
    campaign_db::insert_campaign(
        db,
        NewCampaign {
            brand_id,
            title: "Seeded campaign".to_string(),
            description: "A campaign inserted for tests".to_string(),
            instructions: "Post a photo with the product".to_string(),
            total_budget: 1000.0,
            payout_per_creator: 100.0,
            platform_fee_percent: 0.0,
            target_city: fixture.city.to_string(),
            target_age_groups: None,
            max_creators: fixture.max_creators,
            status: fixture.status,
            created_at: fixture.created_at,
            deadline: fixture.deadline,
        },
    )
    .await
    .expect("Failed to seed campaign")
}

/// Overwrite a campaign's counters directly.
pub async fn set_counters(
    db: &DatabaseConnection,
    campaign: &campaigns::Model,
    current: i32,
    approved: i32,
) -> campaigns::Model {
    let mut active = campaign.clone().into_active_model();
    active.current_submissions = Set(current);
    active.approved_submissions = Set(approved);
    active.update(db).await.expect("Failed to set counters")
}

/// Insert a `submitted` row without touching the campaign counters.
pub async fn seed_submission(
    db: &DatabaseConnection,
    campaign_id: Uuid,
    creator_id: Uuid,
) -> submissions::Model {
    submission_db::insert_submission(
        db,
        NewSubmission {
            campaign_id,
            creator_id,
            proof_url: Some("https://drive.example.com/proof.jpg".to_string()),
            social_link: None,
            status: SubmissionStatus::Submitted,
            now: now(),
        },
    )
    .await
    .expect("Failed to seed submission")
}

pub async fn reload_campaign(db: &DatabaseConnection, id: Uuid) -> campaigns::Model {
    campaign_db::get_campaign_by_id(db, id)
        .await
        .expect("Query failed")
        .expect("Campaign missing")
}

pub async fn reload_submission(db: &DatabaseConnection, id: Uuid) -> Option<submissions::Model> {
    submission_db::get_submission_by_id(db, id)
        .await
        .expect("Query failed")
}

//! Submission Store integration tests: capacity, duplicates, closed
//! campaigns and the reservation flow.
//!
//! Run with: `cargo test --test submissions_test`
mod common;

use campaign_backend::error::AppError;
use campaign_backend::models::PaginationQuery;
use campaign_backend::models::campaigns::CampaignStatus;
use campaign_backend::models::submissions::{
    CreateSubmission, ReserveSlot, SubmissionStatus, SubmitProof,
};
use campaign_backend::models::users::Roles;
use campaign_backend::services::ServiceContext;
use campaign_backend::services::submissions::{
    create_submission, list_my_submissions, list_pending_submissions, reserve_slot, submit_proof,
    withdraw_reservation,
};
use chrono::Duration;
use common::{
    CampaignFixture, create_user, now, reload_campaign, reload_submission, seed_campaign,
    set_counters, setup_db,
};
use uuid::Uuid;

fn submission_for(campaign_id: Uuid) -> CreateSubmission {
    CreateSubmission {
        campaign_id,
        proof_url: "https://drive.example.com/proof.jpg".to_string(),
        social_link: Some("https://instagram.com/p/abc123".to_string()),
    }
}

#[tokio::test]
async fn test_submission_takes_a_slot() {
    let db = setup_db().await;
    let ctx = ServiceContext::new(db.clone());
    let brand = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;
    let campaign = seed_campaign(&db, brand.id, CampaignFixture::default()).await;

    let submission = create_submission(&ctx, &creator, creator.id, submission_for(campaign.id))
        .await
        .unwrap();
    assert_eq!(submission.status, SubmissionStatus::Submitted);
    assert_eq!(submission.creator_id, creator.id);
    assert!(submission.submitted_at.is_some());
    assert!(submission.reviewed_at.is_none());

    let campaign = reload_campaign(&db, campaign.id).await;
    assert_eq!(campaign.current_submissions, 1);
    assert_eq!(campaign.approved_submissions, 0);
}

#[tokio::test]
async fn test_duplicate_submission_is_refused() {
    let db = setup_db().await;
    let ctx = ServiceContext::new(db.clone());
    let brand = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;
    let campaign = seed_campaign(&db, brand.id, CampaignFixture::default()).await;

    create_submission(&ctx, &creator, creator.id, submission_for(campaign.id))
        .await
        .unwrap();
    let err = create_submission(&ctx, &creator, creator.id, submission_for(campaign.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateSubmission(_)));

    let campaign = reload_campaign(&db, campaign.id).await;
    assert_eq!(campaign.current_submissions, 1);
}

#[tokio::test]
async fn test_closed_campaign_refuses_regardless_of_capacity() {
    let db = setup_db().await;
    let ctx = ServiceContext::new(db.clone());
    let brand = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;

    let paused = seed_campaign(
        &db,
        brand.id,
        CampaignFixture {
            status: CampaignStatus::Paused,
            ..Default::default()
        },
    )
    .await;
    let err = create_submission(&ctx, &creator, creator.id, submission_for(paused.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::CampaignClosed(_)));

    let expired = seed_campaign(
        &db,
        brand.id,
        CampaignFixture {
            deadline: now() - Duration::minutes(1),
            ..Default::default()
        },
    )
    .await;
    let err = create_submission(&ctx, &creator, creator.id, submission_for(expired.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::CampaignClosed(_)));

    // Full and paused: closed wins over capacity.
    let full_paused = seed_campaign(
        &db,
        brand.id,
        CampaignFixture {
            status: CampaignStatus::Paused,
            max_creators: 1,
            ..Default::default()
        },
    )
    .await;
    set_counters(&db, &full_paused, 1, 0).await;
    let err = create_submission(&ctx, &creator, creator.id, submission_for(full_paused.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::CampaignClosed(_)));
}

#[tokio::test]
async fn test_full_campaign_refuses_new_creators() {
    let db = setup_db().await;
    let ctx = ServiceContext::new(db.clone());
    let brand = create_user(&db, Roles::Brand).await;
    let first = create_user(&db, Roles::Creator).await;
    let second = create_user(&db, Roles::Creator).await;
    let campaign = seed_campaign(
        &db,
        brand.id,
        CampaignFixture {
            max_creators: 1,
            ..Default::default()
        },
    )
    .await;

    create_submission(&ctx, &first, first.id, submission_for(campaign.id))
        .await
        .unwrap();
    let err = create_submission(&ctx, &second, second.id, submission_for(campaign.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::CapacityExceeded(_)));

    // The creator already holding the only slot is told it is a duplicate.
    let err = create_submission(&ctx, &first, first.id, submission_for(campaign.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateSubmission(_)));

    let campaign = reload_campaign(&db, campaign.id).await;
    assert_eq!(campaign.current_submissions, 1);
}

#[tokio::test]
async fn test_unknown_campaign_is_not_found() {
    let db = setup_db().await;
    let ctx = ServiceContext::new(db.clone());
    let creator = create_user(&db, Roles::Creator).await;

    let err = create_submission(&ctx, &creator, creator.id, submission_for(Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_submission_permissions_and_links() {
    let db = setup_db().await;
    let ctx = ServiceContext::new(db.clone());
    let brand = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;
    let other = create_user(&db, Roles::Creator).await;
    let campaign = seed_campaign(&db, brand.id, CampaignFixture::default()).await;

    let err = create_submission(&ctx, &creator, other.id, submission_for(campaign.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied(_)));

    let err = create_submission(&ctx, &brand, brand.id, submission_for(campaign.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied(_)));

    let mut bad_link = submission_for(campaign.id);
    bad_link.proof_url = "not a link".to_string();
    let err = create_submission(&ctx, &creator, creator.id, bad_link)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let campaign = reload_campaign(&db, campaign.id).await;
    assert_eq!(campaign.current_submissions, 0);
}

#[tokio::test]
async fn test_reservation_then_proof() {
    let db = setup_db().await;
    let ctx = ServiceContext::new(db.clone());
    let brand = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;
    let other = create_user(&db, Roles::Creator).await;
    let campaign = seed_campaign(
        &db,
        brand.id,
        CampaignFixture {
            max_creators: 1,
            ..Default::default()
        },
    )
    .await;

    let reservation = reserve_slot(
        &ctx,
        &creator,
        creator.id,
        ReserveSlot {
            campaign_id: campaign.id,
        },
    )
    .await
    .unwrap();
    assert_eq!(reservation.status, SubmissionStatus::Reserved);
    assert!(reservation.proof_url.is_none());
    assert!(reservation.reserved_at.is_some());

    // The reservation holds the only slot.
    let err = reserve_slot(
        &ctx,
        &other,
        other.id,
        ReserveSlot {
            campaign_id: campaign.id,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::CapacityExceeded(_)));

    let proof = SubmitProof {
        proof_url: "https://drive.example.com/proof.jpg".to_string(),
        social_link: None,
    };
    let err = submit_proof(&ctx, &other, reservation.id, proof.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied(_)));

    let submitted = submit_proof(&ctx, &creator, reservation.id, proof.clone())
        .await
        .unwrap();
    assert_eq!(submitted.status, SubmissionStatus::Submitted);
    assert_eq!(
        submitted.proof_url.as_deref(),
        Some("https://drive.example.com/proof.jpg")
    );
    assert!(submitted.submitted_at.is_some());

    let err = submit_proof(&ctx, &creator, reservation.id, proof)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    let campaign = reload_campaign(&db, campaign.id).await;
    assert_eq!(campaign.current_submissions, 1);
}

#[tokio::test]
async fn test_withdrawn_reservation_frees_the_slot() {
    let db = setup_db().await;
    let ctx = ServiceContext::new(db.clone());
    let brand = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;
    let other = create_user(&db, Roles::Creator).await;
    let campaign = seed_campaign(
        &db,
        brand.id,
        CampaignFixture {
            max_creators: 1,
            ..Default::default()
        },
    )
    .await;

    let reservation = reserve_slot(
        &ctx,
        &creator,
        creator.id,
        ReserveSlot {
            campaign_id: campaign.id,
        },
    )
    .await
    .unwrap();

    let err = withdraw_reservation(&ctx, &other, reservation.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied(_)));

    withdraw_reservation(&ctx, &creator, reservation.id)
        .await
        .unwrap();
    assert!(reload_submission(&db, reservation.id).await.is_none());
    assert_eq!(reload_campaign(&db, campaign.id).await.current_submissions, 0);

    // The slot is free again.
    create_submission(&ctx, &other, other.id, submission_for(campaign.id))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_submitted_work_cannot_be_withdrawn() {
    let db = setup_db().await;
    let ctx = ServiceContext::new(db.clone());
    let brand = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;
    let campaign = seed_campaign(&db, brand.id, CampaignFixture::default()).await;

    let submission = create_submission(&ctx, &creator, creator.id, submission_for(campaign.id))
        .await
        .unwrap();
    let err = withdraw_reservation(&ctx, &creator, submission.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
    assert_eq!(reload_campaign(&db, campaign.id).await.current_submissions, 1);
}

#[tokio::test]
async fn test_review_queue_is_admin_only_and_oldest_first() {
    let db = setup_db().await;
    let ctx = ServiceContext::new(db.clone());
    let brand = create_user(&db, Roles::Brand).await;
    let admin = create_user(&db, Roles::Admin).await;
    let first = create_user(&db, Roles::Creator).await;
    let second = create_user(&db, Roles::Creator).await;
    let campaign = seed_campaign(&db, brand.id, CampaignFixture::default()).await;

    let earlier = create_submission(&ctx, &first, first.id, submission_for(campaign.id))
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let later = create_submission(&ctx, &second, second.id, submission_for(campaign.id))
        .await
        .unwrap();
    // Reservations are not in the queue.
    let third = create_user(&db, Roles::Creator).await;
    reserve_slot(
        &ctx,
        &third,
        third.id,
        ReserveSlot {
            campaign_id: campaign.id,
        },
    )
    .await
    .unwrap();

    let err = list_pending_submissions(&ctx, &first).await.unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied(_)));

    let queue = list_pending_submissions(&ctx, &admin).await.unwrap();
    let ids: Vec<_> = queue.iter().map(|p| p.submission.id).collect();
    assert_eq!(ids, vec![earlier.id, later.id]);
    assert!(queue.iter().all(|p| p.campaign.id == campaign.id));
}

#[tokio::test]
async fn test_my_submissions_only_lists_own() {
    let db = setup_db().await;
    let ctx = ServiceContext::new(db.clone());
    let brand = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;
    let other = create_user(&db, Roles::Creator).await;
    let campaign = seed_campaign(&db, brand.id, CampaignFixture::default()).await;
    let second_campaign = seed_campaign(&db, brand.id, CampaignFixture::default()).await;

    create_submission(&ctx, &creator, creator.id, submission_for(campaign.id))
        .await
        .unwrap();
    create_submission(&ctx, &creator, creator.id, submission_for(second_campaign.id))
        .await
        .unwrap();
    create_submission(&ctx, &other, other.id, submission_for(campaign.id))
        .await
        .unwrap();

    let mine = list_my_submissions(&ctx, &creator, &PaginationQuery::default())
        .await
        .unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|s| s.creator_id == creator.id));
}

#[tokio::test]
async fn test_my_submissions_page_bounds() {
    let db = setup_db().await;
    let ctx = ServiceContext::new(db.clone());
    let brand = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;
    let campaign = seed_campaign(&db, brand.id, CampaignFixture::default()).await;
    create_submission(&ctx, &creator, creator.id, submission_for(campaign.id))
        .await
        .unwrap();

    let err = list_my_submissions(
        &ctx,
        &creator,
        &PaginationQuery {
            page: Some(u64::MAX),
            limit: Some(20),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let past_the_end = list_my_submissions(
        &ctx,
        &creator,
        &PaginationQuery {
            page: Some(campaign_backend::models::MAX_PAGE),
            limit: Some(100),
        },
    )
    .await
    .unwrap();
    assert!(past_the_end.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_duplicates_leave_one_submission() {
    let db = setup_db().await;
    let ctx = ServiceContext::new(db.clone());
    let brand = create_user(&db, Roles::Brand).await;
    let creator = create_user(&db, Roles::Creator).await;
    let campaign = seed_campaign(&db, brand.id, CampaignFixture::default()).await;

    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let ctx = ctx.clone();
            let campaign_id = campaign.id;
            tokio::spawn(async move {
                create_submission(&ctx, &creator, creator.id, submission_for(campaign_id)).await
            })
        })
        .collect();
    let results: Vec<_> = futures_util::future::join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(AppError::DuplicateSubmission(_))))
            .count(),
        3
    );
    assert_eq!(reload_campaign(&db, campaign.id).await.current_submissions, 1);
}

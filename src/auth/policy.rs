use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::campaigns::{self, CampaignStatus};
use crate::models::users::{self, Roles};

/// The authenticated caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Roles,
}

impl Actor {
    pub fn new(id: Uuid, role: Roles) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Roles::Admin
    }
}

impl From<&users::Model> for Actor {
    fn from(user: &users::Model) -> Self {
        Self::new(user.id, user.role)
    }
}

fn deny(reason: impl Into<String>) -> AppError {
    AppError::PermissionDenied(reason.into())
}

/// Admins read everything, brands read their own campaigns, creators read active ones.
pub fn can_read_campaign(actor: &Actor, campaign: &campaigns::Model) -> AppResult<()> {
    match actor.role {
        Roles::Admin => Ok(()),
        Roles::Brand if campaign.brand_id == actor.id => Ok(()),
        Roles::Brand => Err(deny("Brands can only view their own campaigns")),
        Roles::Creator if campaign.status == CampaignStatus::Active => Ok(()),
        Roles::Creator => Err(deny("This campaign is not open to creators")),
    }
}

/// Only the owning brand, or an admin.
pub fn can_write_campaign(actor: &Actor, campaign: &campaigns::Model) -> AppResult<()> {
    match actor.role {
        Roles::Admin => Ok(()),
        Roles::Brand if campaign.brand_id == actor.id => Ok(()),
        _ => Err(deny("You do not own this campaign")),
    }
}

pub fn can_create_campaign(actor: &Actor) -> AppResult<()> {
    match actor.role {
        Roles::Brand => Ok(()),
        _ => Err(deny("Only brands can create campaigns")),
    }
}

/// Listing a brand's campaigns: the brand itself, or an admin.
pub fn can_list_owner_campaigns(actor: &Actor, owner_id: Uuid) -> AppResult<()> {
    if actor.is_admin() || (actor.role == Roles::Brand && actor.id == owner_id) {
        Ok(())
    } else {
        Err(deny("You can only list your own campaigns"))
    }
}

/// Creators submit only for themselves.
pub fn can_create_submission(actor: &Actor, creator_id: Uuid) -> AppResult<()> {
    match actor.role {
        Roles::Creator if actor.id == creator_id => Ok(()),
        Roles::Creator => Err(deny("Creators can only submit for themselves")),
        _ => Err(deny("Only creators can submit to campaigns")),
    }
}

/// Reviewing (listing the queue and deciding) is admin only.
pub fn can_review_submissions(actor: &Actor) -> AppResult<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(deny("Only admins can review submissions"))
    }
}

/// Roles a user may pick for themself; admin is granted out of band.
pub fn can_self_assign_role(role: Roles) -> AppResult<()> {
    match role {
        Roles::Creator | Roles::Brand => Ok(()),
        Roles::Admin => Err(deny("The admin role cannot be self-assigned")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn campaign(brand_id: Uuid, status: CampaignStatus) -> campaigns::Model {
        let now = Utc::now();
        campaigns::Model {
            id: Uuid::new_v4(),
            brand_id,
            title: "Summer Coffee Launch".into(),
            description: "Describe the coffee launch in detail".into(),
            instructions: "Take a selfie with the coffee cup".into(),
            total_budget: 5000.0,
            payout_per_creator: 100.0,
            platform_fee_percent: 20.0,
            target_city: "Bangalore".into(),
            target_age_groups: None,
            status,
            max_creators: 40,
            current_submissions: 0,
            approved_submissions: 0,
            created_at: now,
            deadline: now + Duration::days(7),
            updated_at: None,
        }
    }

    #[test]
    fn test_campaign_read_rules() {
        let brand = Actor::new(Uuid::new_v4(), Roles::Brand);
        let other_brand = Actor::new(Uuid::new_v4(), Roles::Brand);
        let creator = Actor::new(Uuid::new_v4(), Roles::Creator);
        let admin = Actor::new(Uuid::new_v4(), Roles::Admin);

        let active = campaign(brand.id, CampaignStatus::Active);
        let paused = campaign(brand.id, CampaignStatus::Paused);

        assert!(can_read_campaign(&brand, &paused).is_ok());
        assert!(can_read_campaign(&other_brand, &active).is_err());
        assert!(can_read_campaign(&creator, &active).is_ok());
        assert!(matches!(
            can_read_campaign(&creator, &paused),
            Err(AppError::PermissionDenied(_))
        ));
        assert!(can_read_campaign(&admin, &paused).is_ok());
    }

    #[test]
    fn test_campaign_write_rules() {
        let brand = Actor::new(Uuid::new_v4(), Roles::Brand);
        let creator = Actor::new(Uuid::new_v4(), Roles::Creator);
        let admin = Actor::new(Uuid::new_v4(), Roles::Admin);
        let owned = campaign(brand.id, CampaignStatus::Active);
        let foreign = campaign(Uuid::new_v4(), CampaignStatus::Active);

        assert!(can_write_campaign(&brand, &owned).is_ok());
        assert!(can_write_campaign(&brand, &foreign).is_err());
        assert!(can_write_campaign(&creator, &owned).is_err());
        assert!(can_write_campaign(&admin, &foreign).is_ok());

        assert!(can_create_campaign(&brand).is_ok());
        assert!(can_create_campaign(&creator).is_err());
        assert!(can_create_campaign(&admin).is_err());
    }

    #[test]
    fn test_submission_rules() {
        let creator = Actor::new(Uuid::new_v4(), Roles::Creator);
        let brand = Actor::new(Uuid::new_v4(), Roles::Brand);
        let admin = Actor::new(Uuid::new_v4(), Roles::Admin);

        assert!(can_create_submission(&creator, creator.id).is_ok());
        assert!(can_create_submission(&creator, Uuid::new_v4()).is_err());
        assert!(can_create_submission(&brand, brand.id).is_err());

        assert!(can_review_submissions(&admin).is_ok());
        assert!(can_review_submissions(&creator).is_err());
        assert!(can_review_submissions(&brand).is_err());
    }

    #[test]
    fn test_owner_listing_and_roles() {
        let brand = Actor::new(Uuid::new_v4(), Roles::Brand);
        let admin = Actor::new(Uuid::new_v4(), Roles::Admin);

        assert!(can_list_owner_campaigns(&brand, brand.id).is_ok());
        assert!(can_list_owner_campaigns(&brand, Uuid::new_v4()).is_err());
        assert!(can_list_owner_campaigns(&admin, brand.id).is_ok());

        assert!(can_self_assign_role(Roles::Brand).is_ok());
        assert!(can_self_assign_role(Roles::Admin).is_err());
    }
}

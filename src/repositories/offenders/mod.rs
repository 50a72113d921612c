//! Offender records, including their embedded manager allocations.
//!
//! Lookups only see live (not soft deleted) offenders.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::doc;
use mongodb::Collection;

use crate::core::{AppError, AppResult};
use crate::db::{collections, Database};
use crate::domain::entities::{ManagementTier, Offender};

#[async_trait]
pub trait OffenderRepository: Send + Sync {
    async fn find_by_offender_id(&self, offender_id: i64) -> AppResult<Option<Offender>>;

    async fn find_by_crn(&self, crn: &str) -> AppResult<Option<Offender>>;

    async fn find_by_noms_number(&self, noms_number: &str) -> AppResult<Option<Offender>>;

    /// Offenders with a community or prison manager record for the staff member, current or not.
    async fn find_managed_by_staff(&self, staff_id: i64) -> AppResult<Vec<Offender>>;

    async fn save(&self, offender: &Offender) -> AppResult<()>;
}

#[async_trait]
pub trait TierRepository: Send + Sync {
    async fn save(&self, tier: &ManagementTier) -> AppResult<()>;
}

pub struct MongoOffenderRepository {
    db: Arc<Database>,
}

impl MongoOffenderRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn collection(&self) -> Collection<Offender> {
        self.db.collection::<Offender>(collections::OFFENDERS)
    }

    async fn find_live(&self, filter: mongodb::bson::Document) -> AppResult<Option<Offender>> {
        let mut filter = filter;
        filter.insert("soft_deleted", false);
        self.collection()
            .find_one(filter)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }
}

#[async_trait]
impl OffenderRepository for MongoOffenderRepository {
    async fn find_by_offender_id(&self, offender_id: i64) -> AppResult<Option<Offender>> {
        self.find_live(doc! { "_id": offender_id }).await
    }

    async fn find_by_crn(&self, crn: &str) -> AppResult<Option<Offender>> {
        self.find_live(doc! { "crn": crn }).await
    }

    async fn find_by_noms_number(&self, noms_number: &str) -> AppResult<Option<Offender>> {
        self.find_live(doc! { "noms_number": noms_number }).await
    }

    async fn find_managed_by_staff(&self, staff_id: i64) -> AppResult<Vec<Offender>> {
        let filter = doc! {
            "soft_deleted": false,
            "$or": [
                { "offender_managers.staff.staff_id": staff_id },
                { "prison_offender_managers.staff.staff_id": staff_id },
            ]
        };

        self.collection()
            .find(filter)
            .sort(doc! { "surname": 1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn save(&self, offender: &Offender) -> AppResult<()> {
        self.collection()
            .replace_one(doc! { "_id": offender.offender_id }, offender)
            .upsert(true)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

pub struct MongoTierRepository {
    db: Arc<Database>,
}

impl MongoTierRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TierRepository for MongoTierRepository {
    async fn save(&self, tier: &ManagementTier) -> AppResult<()> {
        self.db
            .collection::<ManagementTier>(collections::MANAGEMENT_TIERS)
            .insert_one(tier)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

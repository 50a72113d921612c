//! Data access layer.
//!
//! Every store is a trait object so services run unchanged against MongoDB
//! (with Redis in front of the reference data) or the in-memory store.
//!
//! ```rust,ignore
//! let repositories = Repositories::mongo(database, redis);
//! let offender = repositories.offenders.find_by_crn("X320741").await?;
//! ```

pub mod contacts;
pub mod events;
pub mod ids;
pub mod in_memory;
pub mod notifications;
pub mod offenders;
pub mod reference;
pub mod staff;

use std::sync::Arc;

use crate::caching::redis::RedisClient;
use crate::db::Database;

use contacts::{ContactRepository, MongoContactRepository};
use events::{EventRepository, MongoEventRepository};
use ids::{IdGenerator, MongoIdGenerator};
use in_memory::InMemoryStore;
use notifications::{MongoNotificationRepository, NotificationRepository};
use offenders::{MongoOffenderRepository, MongoTierRepository, OffenderRepository, TierRepository};
use reference::{MongoReferenceDataRepository, ReferenceDataRepository};
use staff::{MongoStaffRepository, MongoUserDirectory, StaffRepository, UserDirectory};

#[derive(Clone)]
pub struct Repositories {
    pub offenders: Arc<dyn OffenderRepository>,
    pub tiers: Arc<dyn TierRepository>,
    pub events: Arc<dyn EventRepository>,
    pub reference_data: Arc<dyn ReferenceDataRepository>,
    pub staff: Arc<dyn StaffRepository>,
    pub user_directory: Arc<dyn UserDirectory>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub contacts: Arc<dyn ContactRepository>,
    pub ids: Arc<dyn IdGenerator>,
}

impl Repositories {
    pub fn mongo(db: Arc<Database>, redis: Arc<RedisClient>) -> Self {
        Self {
            offenders: Arc::new(MongoOffenderRepository::new(db.clone())),
            tiers: Arc::new(MongoTierRepository::new(db.clone())),
            events: Arc::new(MongoEventRepository::new(db.clone())),
            reference_data: Arc::new(MongoReferenceDataRepository::new(db.clone(), redis)),
            staff: Arc::new(MongoStaffRepository::new(db.clone())),
            user_directory: Arc::new(MongoUserDirectory::new(db.clone())),
            notifications: Arc::new(MongoNotificationRepository::new(db.clone())),
            contacts: Arc::new(MongoContactRepository::new(db.clone())),
            ids: Arc::new(MongoIdGenerator::new(db)),
        }
    }

    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            offenders: store.clone(),
            tiers: store.clone(),
            events: store.clone(),
            reference_data: store.clone(),
            staff: store.clone(),
            user_directory: store.clone(),
            notifications: store.clone(),
            contacts: store.clone(),
            ids: store,
        }
    }
}

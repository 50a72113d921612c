//! Numeric id allocation. Delius keys are numbers, not ObjectIds.

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::options::ReturnDocument;

use crate::core::{AppError, AppResult};
use crate::db::{collections, Database};

pub mod sequences {
    pub const EVENT: &str = "event";
    pub const DISPOSAL: &str = "disposal";
    pub const KEY_DATE: &str = "key_date";
    pub const COURT_APPEARANCE: &str = "court_appearance";
    pub const CONTACT: &str = "contact";
    pub const CUSTODY_HISTORY: &str = "custody_history";
    pub const STAFF: &str = "staff";
    pub const PRISON_OFFENDER_MANAGER: &str = "prison_offender_manager";
    pub const SPG_CONTROL: &str = "spg_control_sequence";
}

#[async_trait]
pub trait IdGenerator: Send + Sync {
    /// Next value of the named sequence, starting at 1.
    async fn next_id(&self, sequence: &str) -> AppResult<i64>;
}

/// Sequences kept in the `counters` collection, one document per name.
pub struct MongoIdGenerator {
    db: Arc<Database>,
}

impl MongoIdGenerator {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IdGenerator for MongoIdGenerator {
    async fn next_id(&self, sequence: &str) -> AppResult<i64> {
        let counter = self
            .db
            .collection::<Document>(collections::COUNTERS)
            .find_one_and_update(doc! { "_id": sequence }, doc! { "$inc": { "seq": 1_i64 } })
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .ok_or_else(|| AppError::DatabaseError(format!("counter {} was not created", sequence)))?;

        counter
            .get_i64("seq")
            .map_err(|e| AppError::DatabaseError(format!("counter {}: {}", sequence, e)))
    }
}

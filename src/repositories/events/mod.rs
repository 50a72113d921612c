//! Event aggregates. Saving replaces the whole document, so a custody
//! change and everything nested under it is written in one operation.
//! Each save is conditional on the `version` the event was read with; a
//! concurrent writer that saved first makes the later save fail with
//! [`AppError::ConflictError`] instead of overwriting its change.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::Collection;

use crate::core::{AppError, AppResult};
use crate::db::{collections, Database};
use crate::domain::entities::Event;

const DUPLICATE_KEY: i32 = 11000;

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn find_by_id(&self, event_id: i64) -> AppResult<Option<Event>>;

    /// Every event of the offender, including soft deleted ones.
    async fn find_by_offender_id(&self, offender_id: i64) -> AppResult<Vec<Event>>;

    /// Live events whose custody record carries the booking number.
    async fn find_by_prison_booking_number(&self, booking_number: &str) -> AppResult<Vec<Event>>;

    async fn find_by_offender_id_and_prison_booking_number(
        &self,
        offender_id: i64,
        booking_number: &str,
    ) -> AppResult<Vec<Event>>;

    /// Live events of the offender that have a custody record.
    async fn find_by_offender_id_with_custody(&self, offender_id: i64) -> AppResult<Vec<Event>>;

    async fn count_by_offender_id(&self, offender_id: i64) -> AppResult<u64>;

    /// Stores the event and bumps its `version`.
    ///
    /// # Errors
    ///
    /// * `ConflictError` when the stored event has moved past `event.version`
    async fn save(&self, event: &mut Event) -> AppResult<()>;
}

pub(crate) fn stale_event(event_id: i64) -> AppError {
    AppError::ConflictError(format!("Event {} was changed by another request, retry the update", event_id))
}

pub struct MongoEventRepository {
    db: Arc<Database>,
}

impl MongoEventRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn collection(&self) -> Collection<Event> {
        self.db.collection::<Event>(collections::EVENTS)
    }

    async fn find_all(&self, filter: Document) -> AppResult<Vec<Event>> {
        self.collection()
            .find(filter)
            .sort(doc! { "referral_date": -1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    async fn find_by_id(&self, event_id: i64) -> AppResult<Option<Event>> {
        self.collection()
            .find_one(doc! { "_id": event_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn find_by_offender_id(&self, offender_id: i64) -> AppResult<Vec<Event>> {
        self.find_all(doc! { "offender_id": offender_id }).await
    }

    async fn find_by_prison_booking_number(&self, booking_number: &str) -> AppResult<Vec<Event>> {
        self.find_all(doc! {
            "soft_deleted": false,
            "disposal.custody.prisoner_number": booking_number,
        })
        .await
    }

    async fn find_by_offender_id_and_prison_booking_number(
        &self,
        offender_id: i64,
        booking_number: &str,
    ) -> AppResult<Vec<Event>> {
        self.find_all(doc! {
            "offender_id": offender_id,
            "soft_deleted": false,
            "disposal.custody.prisoner_number": booking_number,
        })
        .await
    }

    async fn find_by_offender_id_with_custody(&self, offender_id: i64) -> AppResult<Vec<Event>> {
        self.find_all(doc! {
            "offender_id": offender_id,
            "soft_deleted": false,
            "disposal.custody": { "$type": "object" },
        })
        .await
    }

    async fn count_by_offender_id(&self, offender_id: i64) -> AppResult<u64> {
        self.collection()
            .count_documents(doc! { "offender_id": offender_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn save(&self, event: &mut Event) -> AppResult<()> {
        let expected = event.version;
        let mut next = event.clone();
        next.version = expected + 1;

        // Documents written before versioning have no version field.
        let filter = if expected == 0 {
            doc! {
                "_id": event.event_id,
                "$or": [{ "version": 0_i64 }, { "version": { "$exists": false } }],
            }
        } else {
            doc! { "_id": event.event_id, "version": expected }
        };

        let result = self
            .collection()
            .replace_one(filter, &next)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if result.matched_count == 0 {
            if expected != 0 || self.find_by_id(event.event_id).await?.is_some() {
                return Err(stale_event(event.event_id));
            }
            self.collection().insert_one(&next).await.map_err(|e| match *e.kind {
                ErrorKind::Write(WriteFailure::WriteError(ref w)) if w.code == DUPLICATE_KEY => {
                    stale_event(event.event_id)
                }
                _ => AppError::DatabaseError(e.to_string()),
            })?;
        }

        event.version = next.version;
        Ok(())
    }
}

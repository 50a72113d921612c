//! Outbound change records for SPG and IAPS.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::doc;

use crate::core::{AppError, AppResult};
use crate::db::{collections, Database};
use crate::domain::entities::{IapsNotification, Offender, ProbationAreaRef, SpgNotification};
use crate::repositories::ids::{sequences, IdGenerator, MongoIdGenerator};

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Private sector probation areas holding an active manager record for the offender.
    async fn interested_crcs(&self, offender_id: i64) -> AppResult<Vec<ProbationAreaRef>>;

    async fn next_control_sequence(&self) -> AppResult<i64>;

    /// Saves a batch; an empty batch is accepted.
    async fn save_spg_notifications(&self, notifications: Vec<SpgNotification>) -> AppResult<()>;

    async fn save_iaps_notification(&self, notification: &IapsNotification) -> AppResult<()>;
}

/// CRCs among the offender's active community and prison manager areas, one per code.
pub fn crcs_interested_in(offender: &Offender) -> Vec<ProbationAreaRef> {
    let community = offender.active_offender_managers().map(|om| &om.probation_area);
    let prison = offender.active_prison_offender_managers().map(|pom| &pom.probation_area);

    community
        .chain(prison)
        .filter(|area| area.private_sector)
        .map(|area| (area.code.clone(), area.clone()))
        .collect::<BTreeMap<_, _>>()
        .into_values()
        .collect()
}

pub struct MongoNotificationRepository {
    db: Arc<Database>,
    ids: MongoIdGenerator,
}

impl MongoNotificationRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            ids: MongoIdGenerator::new(db.clone()),
            db,
        }
    }
}

#[async_trait]
impl NotificationRepository for MongoNotificationRepository {
    async fn interested_crcs(&self, offender_id: i64) -> AppResult<Vec<ProbationAreaRef>> {
        let offender = self
            .db
            .collection::<Offender>(collections::OFFENDERS)
            .find_one(doc! { "_id": offender_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(offender.as_ref().map(crcs_interested_in).unwrap_or_default())
    }

    async fn next_control_sequence(&self) -> AppResult<i64> {
        self.ids.next_id(sequences::SPG_CONTROL).await
    }

    async fn save_spg_notifications(&self, notifications: Vec<SpgNotification>) -> AppResult<()> {
        if notifications.is_empty() {
            return Ok(());
        }

        self.db
            .collection::<SpgNotification>(collections::SPG_NOTIFICATIONS)
            .insert_many(notifications)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    async fn save_iaps_notification(&self, notification: &IapsNotification) -> AppResult<()> {
        self.db
            .collection::<IapsNotification>(collections::IAPS_NOTIFICATIONS)
            .insert_one(notification)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::doc;

use crate::core::{AppError, AppResult};
use crate::db::{collections, Database};
use crate::domain::entities::{Contact, CustodyHistory};

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn find_by_offender_id(&self, offender_id: i64) -> AppResult<Vec<Contact>>;

    async fn save(&self, contact: &Contact) -> AppResult<()>;

    async fn save_custody_history(&self, history: &CustodyHistory) -> AppResult<()>;
}

pub struct MongoContactRepository {
    db: Arc<Database>,
}

impl MongoContactRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ContactRepository for MongoContactRepository {
    async fn find_by_offender_id(&self, offender_id: i64) -> AppResult<Vec<Contact>> {
        self.db
            .collection::<Contact>(collections::CONTACTS)
            .find(doc! { "offender_id": offender_id })
            .sort(doc! { "contact_date": -1, "contact_start_time": -1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn save(&self, contact: &Contact) -> AppResult<()> {
        self.db
            .collection::<Contact>(collections::CONTACTS)
            .replace_one(doc! { "_id": contact.contact_id }, contact)
            .upsert(true)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    async fn save_custody_history(&self, history: &CustodyHistory) -> AppResult<()> {
        self.db
            .collection::<CustodyHistory>(collections::CUSTODY_HISTORY)
            .insert_one(history)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

//! Staff records and the directory holding their e-mail addresses.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::Collection;
use serde::Deserialize;

use crate::core::{AppError, AppResult};
use crate::db::{collections, Database};
use crate::domain::entities::Staff;

#[async_trait]
pub trait StaffRepository: Send + Sync {
    async fn find_by_staff_id(&self, staff_id: i64) -> AppResult<Option<Staff>>;

    async fn find_by_officer_code(&self, officer_code: &str) -> AppResult<Option<Staff>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Staff>>;

    async fn find_by_usernames(&self, usernames: &[String]) -> AppResult<Vec<Staff>>;

    async fn find_by_surname_and_forename_in_area(
        &self,
        surname: &str,
        forename: &str,
        probation_area_code: &str,
    ) -> AppResult<Option<Staff>>;

    async fn officer_codes_starting_with(&self, prefix: &str) -> AppResult<Vec<String>>;

    async fn save(&self, staff: &Staff) -> AppResult<()>;

    /// Next free staff code of the area: `<area>A001`, `<area>A002`, ...
    async fn next_staff_code(&self, probation_area_code: &str) -> AppResult<String> {
        let prefix = format!("{}A", probation_area_code);
        let highest = self
            .officer_codes_starting_with(&prefix)
            .await?
            .iter()
            .filter_map(|code| code.strip_prefix(&prefix)?.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        Ok(format!("{}{:03}", prefix, highest + 1))
    }
}

/// Directory lookups that live outside Delius.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn email(&self, username: &str) -> AppResult<Option<String>>;
}

pub struct MongoStaffRepository {
    db: Arc<Database>,
}

impl MongoStaffRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn collection(&self) -> Collection<Staff> {
        self.db.collection::<Staff>(collections::STAFF)
    }

    async fn find_first(&self, filter: Document) -> AppResult<Option<Staff>> {
        self.collection()
            .find_one(filter)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }
}

#[async_trait]
impl StaffRepository for MongoStaffRepository {
    async fn find_by_staff_id(&self, staff_id: i64) -> AppResult<Option<Staff>> {
        self.find_first(doc! { "_id": staff_id }).await
    }

    async fn find_by_officer_code(&self, officer_code: &str) -> AppResult<Option<Staff>> {
        self.find_first(doc! { "officer_code": officer_code }).await
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Staff>> {
        self.find_first(doc! { "username": username }).await
    }

    async fn find_by_usernames(&self, usernames: &[String]) -> AppResult<Vec<Staff>> {
        self.collection()
            .find(doc! { "username": { "$in": usernames } })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn find_by_surname_and_forename_in_area(
        &self,
        surname: &str,
        forename: &str,
        probation_area_code: &str,
    ) -> AppResult<Option<Staff>> {
        self.find_first(doc! {
            "surname": surname,
            "forename": forename,
            "probation_area.code": probation_area_code,
        })
        .await
    }

    async fn officer_codes_starting_with(&self, prefix: &str) -> AppResult<Vec<String>> {
        let pattern = format!("^{}", prefix);
        let staff: Vec<Staff> = self
            .collection()
            .find(doc! { "officer_code": { "$regex": pattern } })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(staff.into_iter().map(|s| s.officer_code).collect())
    }

    async fn save(&self, staff: &Staff) -> AppResult<()> {
        self.collection()
            .replace_one(doc! { "_id": staff.staff_id }, staff)
            .upsert(true)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct DirectoryEntry {
    email: Option<String>,
}

/// Directory entries synchronised into the `user_directory` collection.
pub struct MongoUserDirectory {
    db: Arc<Database>,
}

impl MongoUserDirectory {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserDirectory for MongoUserDirectory {
    async fn email(&self, username: &str) -> AppResult<Option<String>> {
        let entry = self
            .db
            .collection::<DirectoryEntry>(collections::USER_DIRECTORY)
            .find_one(doc! { "username": username })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(entry.and_then(|e| e.email))
    }
}

//! Code lists, contact types, institutions, probation areas and users.
//!
//! Standard reference rows change rarely and are read on every key date
//! write, so the Mongo implementation keeps them in Redis for an hour.

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::doc;

use crate::caching::redis::RedisClient;
use crate::core::{AppError, AppResult};
use crate::db::{collections, Database};
use crate::domain::entities::{ContactType, Institution, ProbationArea, StandardReference, User};

const REFERENCE_CACHE_TTL_SECONDS: u64 = 3600;

#[async_trait]
pub trait ReferenceDataRepository: Send + Sync {
    async fn find_standard_reference(&self, code_set: &str, code: &str) -> AppResult<Option<StandardReference>>;

    async fn find_contact_type(&self, code: &str) -> AppResult<Option<ContactType>>;

    async fn find_institution_by_noms_code(&self, noms_code: &str) -> AppResult<Option<Institution>>;

    async fn find_probation_area_by_code(&self, code: &str) -> AppResult<Option<ProbationArea>>;

    /// Probation area representing the prison.
    async fn find_probation_area_by_institution(&self, institution_id: i64) -> AppResult<Option<ProbationArea>>;

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>>;
}

pub struct MongoReferenceDataRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl MongoReferenceDataRepository {
    pub fn new(db: Arc<Database>, redis: Arc<RedisClient>) -> Self {
        Self { db, redis }
    }

    fn cache_key(code_set: &str, code: &str) -> String {
        format!("ref:{}:{}", code_set.replace(' ', "_"), code)
    }
}

#[async_trait]
impl ReferenceDataRepository for MongoReferenceDataRepository {
    async fn find_standard_reference(&self, code_set: &str, code: &str) -> AppResult<Option<StandardReference>> {
        let cache_key = Self::cache_key(code_set, code);

        if let Ok(Some(cached)) = self.redis.get::<StandardReference>(&cache_key).await {
            return Ok(Some(cached));
        }

        let reference = self
            .db
            .collection::<StandardReference>(collections::STANDARD_REFERENCES)
            .find_one(doc! { "code_set_name": code_set, "code_value": code })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref reference) = reference {
            if let Err(e) = self
                .redis
                .set_with_expiry(&cache_key, reference, REFERENCE_CACHE_TTL_SECONDS)
                .await
            {
                log::warn!("Could not cache {}: {}", cache_key, e);
            }
        }

        Ok(reference)
    }

    async fn find_contact_type(&self, code: &str) -> AppResult<Option<ContactType>> {
        self.db
            .collection::<ContactType>(collections::CONTACT_TYPES)
            .find_one(doc! { "code": code })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn find_institution_by_noms_code(&self, noms_code: &str) -> AppResult<Option<Institution>> {
        self.db
            .collection::<Institution>(collections::INSTITUTIONS)
            .find_one(doc! { "noms_prison_institution_code": noms_code, "establishment": true })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn find_probation_area_by_code(&self, code: &str) -> AppResult<Option<ProbationArea>> {
        self.db
            .collection::<ProbationArea>(collections::PROBATION_AREAS)
            .find_one(doc! { "code": code })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn find_probation_area_by_institution(&self, institution_id: i64) -> AppResult<Option<ProbationArea>> {
        self.db
            .collection::<ProbationArea>(collections::PROBATION_AREAS)
            .find_one(doc! { "institution_id": institution_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.db
            .collection::<User>(collections::USERS)
            .find_one(doc! { "distinguished_name": username })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }
}

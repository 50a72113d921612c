//! Reference data lookups shared by the services.

use std::sync::Arc;

use log::debug;

use crate::config::FeatureConfig;
use crate::core::AppResult;
use crate::domain::entities::{
    ContactType, Institution, ProbationArea, StandardReference, CUSTODY_HISTORY_TYPE_CODE_SET,
    CUSTODY_KEY_DATE_CODE_SET, POM_ALLOCATION_REASON_CODE_SET, TIER_CHANGE_REASON_CODE_SET, TIER_CODE_SET,
};
use crate::repositories::reference::ReferenceDataRepository;

/// Tier change reason recorded for tiers calculated by the assessment service.
pub const ASSESSMENT_TIER_CHANGE_REASON: &str = "ATS";
/// POM allocation reason used when a prisoner moves establishment.
pub const AUTOMATIC_TRANSFER_ALLOCATION_REASON: &str = "AUT";

pub struct LookupService {
    reference_data: Arc<dyn ReferenceDataRepository>,
    system_user_id: i64,
}

impl LookupService {
    pub fn new(reference_data: Arc<dyn ReferenceDataRepository>, features: &FeatureConfig) -> Self {
        Self {
            reference_data,
            system_user_id: features.system_user_id,
        }
    }

    pub async fn custody_key_date_type(&self, code: &str) -> AppResult<Option<StandardReference>> {
        self.reference_data
            .find_standard_reference(CUSTODY_KEY_DATE_CODE_SET, code)
            .await
    }

    /// Audit user id of the acting user, falling back to the system user.
    pub async fn user_id_for(&self, username: &str) -> AppResult<i64> {
        match self.reference_data.find_user_by_username(username).await? {
            Some(user) => Ok(user.user_id),
            None => {
                debug!("No Delius user {}, auditing as system user", username);
                Ok(self.system_user_id)
            }
        }
    }

    pub async fn tier(&self, code: &str) -> AppResult<Option<StandardReference>> {
        self.reference_data.find_standard_reference(TIER_CODE_SET, code).await
    }

    pub async fn ats_tier_change_reason(&self) -> AppResult<Option<StandardReference>> {
        self.reference_data
            .find_standard_reference(TIER_CHANGE_REASON_CODE_SET, ASSESSMENT_TIER_CHANGE_REASON)
            .await
    }

    pub async fn custody_history_type(&self, code: &str) -> AppResult<Option<StandardReference>> {
        self.reference_data
            .find_standard_reference(CUSTODY_HISTORY_TYPE_CODE_SET, code)
            .await
    }

    pub async fn transfer_allocation_reason(&self) -> AppResult<Option<StandardReference>> {
        self.reference_data
            .find_standard_reference(POM_ALLOCATION_REASON_CODE_SET, AUTOMATIC_TRANSFER_ALLOCATION_REASON)
            .await
    }

    pub async fn contact_type(&self, code: &str) -> AppResult<Option<ContactType>> {
        self.reference_data.find_contact_type(code).await
    }

    pub async fn institution_by_noms_code(&self, noms_code: &str) -> AppResult<Option<Institution>> {
        self.reference_data.find_institution_by_noms_code(noms_code).await
    }

    pub async fn probation_area_for_institution(&self, institution: &Institution) -> AppResult<Option<ProbationArea>> {
        self.reference_data
            .find_probation_area_by_institution(institution.institution_id)
            .await
    }
}

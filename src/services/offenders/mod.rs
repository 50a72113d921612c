//! Offender lookups by any of their identifiers, and offender views.

use std::fmt;
use std::sync::Arc;

use crate::core::{AppError, AppResult};
use crate::domain::dto::offenders::{CommunityOrPrisonOffenderManager, OffenderLatestRecall, OffenderSummary};
use crate::domain::entities::Offender;
use crate::repositories::offenders::OffenderRepository;
use crate::services::convictions::ConvictionService;
use crate::services::custody::CustodyService;

/// The identifiers an offender can be addressed by in a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OffenderIdentifier {
    OffenderId(i64),
    Crn(String),
    NomsNumber(String),
}

impl fmt::Display for OffenderIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OffenderIdentifier::OffenderId(id) => write!(f, "id {}", id),
            OffenderIdentifier::Crn(crn) => write!(f, "CRN {}", crn),
            OffenderIdentifier::NomsNumber(noms) => write!(f, "NOMS number {}", noms),
        }
    }
}

pub struct OffenderService {
    offenders: Arc<dyn OffenderRepository>,
    convictions: Arc<ConvictionService>,
}

impl OffenderService {
    pub fn new(offenders: Arc<dyn OffenderRepository>, convictions: Arc<ConvictionService>) -> Self {
        Self {
            offenders,
            convictions,
        }
    }

    pub async fn offender_id_of_crn(&self, crn: &str) -> AppResult<Option<i64>> {
        Ok(self.offenders.find_by_crn(crn).await?.map(|o| o.offender_id))
    }

    pub async fn offender_id_of_noms_number(&self, noms_number: &str) -> AppResult<Option<i64>> {
        Ok(self
            .offenders
            .find_by_noms_number(noms_number)
            .await?
            .map(|o| o.offender_id))
    }

    pub async fn offender_id_of_offender_id(&self, offender_id: i64) -> AppResult<Option<i64>> {
        Ok(self
            .offenders
            .find_by_offender_id(offender_id)
            .await?
            .map(|o| o.offender_id))
    }

    pub async fn find(&self, identifier: &OffenderIdentifier) -> AppResult<Option<Offender>> {
        match identifier {
            OffenderIdentifier::OffenderId(id) => self.offenders.find_by_offender_id(*id).await,
            OffenderIdentifier::Crn(crn) => self.offenders.find_by_crn(crn).await,
            OffenderIdentifier::NomsNumber(noms) => self.offenders.find_by_noms_number(noms).await,
        }
    }

    /// # Errors
    ///
    /// * `AppError::NotFound` - `"Offender with <identifier> not found"`
    pub async fn require(&self, identifier: &OffenderIdentifier) -> AppResult<Offender> {
        self.find(identifier)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Offender with {} not found", identifier)))
    }

    pub async fn require_offender_id(&self, identifier: &OffenderIdentifier) -> AppResult<i64> {
        Ok(self.require(identifier).await?.offender_id)
    }

    pub async fn get_offender_summary(&self, offender_id: i64) -> AppResult<Option<OffenderSummary>> {
        Ok(self
            .offenders
            .find_by_offender_id(offender_id)
            .await?
            .as_ref()
            .map(OffenderSummary::from))
    }

    /// Latest release and recall of the single active custodial event.
    pub async fn get_offender_latest_recall(&self, offender_id: i64) -> AppResult<OffenderLatestRecall> {
        if self.offenders.find_by_offender_id(offender_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Offender with id {} not found", offender_id)));
        }

        let event = self.convictions.get_active_custodial_event(offender_id).await?;
        let custody = CustodyService::find_custody_from_custodial_event(&event)?;

        Ok(OffenderLatestRecall::from_releases(&custody.releases))
    }

    /// Active community and prison offender managers.
    pub async fn all_offender_managers(&self, offender_id: i64) -> AppResult<Vec<CommunityOrPrisonOffenderManager>> {
        let offender = self
            .offenders
            .find_by_offender_id(offender_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Offender with id {} not found", offender_id)))?;

        let community = offender
            .active_offender_managers()
            .map(CommunityOrPrisonOffenderManager::from);
        let prison = offender
            .active_prison_offender_managers()
            .map(CommunityOrPrisonOffenderManager::from);

        Ok(community.chain(prison).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::in_memory::seed;
    use crate::services::testing::TestServices;

    fn service() -> Arc<OffenderService> {
        TestServices::new().context.offenders.clone()
    }

    #[actix_web::test]
    async fn test_identifiers_resolve_to_the_same_offender() {
        let service = service();

        assert_eq!(service.offender_id_of_crn(seed::CRN).await.unwrap(), Some(seed::OFFENDER_ID));
        assert_eq!(
            service.offender_id_of_noms_number(seed::NOMS_NUMBER).await.unwrap(),
            Some(seed::OFFENDER_ID)
        );
        assert_eq!(
            service.offender_id_of_offender_id(seed::OFFENDER_ID).await.unwrap(),
            Some(seed::OFFENDER_ID)
        );
        assert_eq!(service.offender_id_of_crn(seed::DELETED_CRN).await.unwrap(), None);
    }

    #[actix_web::test]
    async fn test_require_reports_the_identifier() {
        let service = service();

        let error = service
            .require(&OffenderIdentifier::Crn("X999999".to_string()))
            .await
            .unwrap_err();

        assert_eq!(error.message(), "Offender with CRN X999999 not found");
    }

    #[actix_web::test]
    async fn test_summary() {
        let service = service();

        let summary = service.get_offender_summary(seed::OFFENDER_ID).await.unwrap().unwrap();

        assert_eq!(summary.other_ids.crn, seed::CRN);
        assert_eq!(summary.middle_names, vec!["Danger".to_string()]);
        assert_eq!(summary.gender.as_deref(), Some("Male"));
        assert_eq!(summary.current_tier.as_deref(), Some("UB2"));
    }

    #[actix_web::test]
    async fn test_latest_recall() {
        let service = service();

        let latest = service.get_offender_latest_recall(seed::OFFENDER_ID).await.unwrap();

        let recall = latest.last_recall.unwrap();
        assert_eq!(recall.reason.code, "CB");
        assert!(latest.last_release.is_some());
    }

    #[actix_web::test]
    async fn test_latest_recall_needs_single_custodial_event() {
        let service = service();

        let missing = service.get_offender_latest_recall(999).await.unwrap_err();
        assert!(matches!(missing, AppError::NotFound(_)));

        let none = service
            .get_offender_latest_recall(seed::OFFENDER_WITHOUT_EVENTS_ID)
            .await
            .unwrap_err();
        assert!(matches!(none, AppError::BadRequest(_)));
    }

    #[actix_web::test]
    async fn test_all_offender_managers() {
        let service = service();

        let managers = service.all_offender_managers(seed::OFFENDER_ID).await.unwrap();

        assert_eq!(managers.len(), 2);
        let pom = managers.iter().find(|m| m.is_prison_offender_manager).unwrap();
        assert!(pom.is_unallocated);
        assert_eq!(pom.staff_code, "WWIALLU");
        let om = managers.iter().find(|m| !m.is_prison_offender_manager).unwrap();
        assert!(om.is_responsible_officer);
    }
}

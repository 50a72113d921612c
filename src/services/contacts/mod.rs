use std::sync::Arc;

use crate::core::AppResult;
use crate::domain::dto::contacts::{ContactFilter, ContactSummary};
use crate::repositories::contacts::ContactRepository;

pub struct ContactService {
    contacts: Arc<dyn ContactRepository>,
}

impl ContactService {
    pub fn new(contacts: Arc<dyn ContactRepository>) -> Self {
        Self { contacts }
    }

    /// Contacts matching the filter, latest contact date first.
    pub async fn contacts_for(&self, offender_id: i64, filter: &ContactFilter) -> AppResult<Vec<ContactSummary>> {
        let mut contacts: Vec<_> = self
            .contacts
            .find_by_offender_id(offender_id)
            .await?
            .into_iter()
            .filter(|c| filter.matches(c))
            .collect();
        contacts.sort_by(|a, b| b.contact_date.cmp(&a.contact_date));

        Ok(contacts.iter().map(ContactSummary::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::repositories::in_memory::seed;

    fn service() -> ContactService {
        ContactService::new(Arc::new(seed::seeded_store().unwrap()))
    }

    #[actix_web::test]
    async fn test_all_contacts_latest_first() {
        let contacts = service()
            .contacts_for(seed::OFFENDER_ID, &ContactFilter::default())
            .await
            .unwrap();

        let types: Vec<&str> = contacts.iter().map(|c| c.contact_type.code.as_str()).collect();
        assert_eq!(types, vec!["CRSAPT", "COAI", "CMOB"]);
    }

    #[actix_web::test]
    async fn test_filter_by_type_and_date() {
        let service = service();

        let by_type = service
            .contacts_for(
                seed::OFFENDER_ID,
                &ContactFilter {
                    contact_types: vec!["CMOB".to_string(), "COAI".to_string()],
                    ..ContactFilter::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(by_type.len(), 2);

        let from = NaiveDate::from_ymd_opt(2020, 11, 25).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let to = NaiveDate::from_ymd_opt(2021, 1, 31).unwrap().and_hms_opt(23, 59, 59).unwrap();
        let by_date = service
            .contacts_for(
                seed::OFFENDER_ID,
                &ContactFilter {
                    contact_types: Vec::new(),
                    from: Some(from),
                    to: Some(to),
                },
            )
            .await
            .unwrap();
        assert_eq!(by_date.len(), 1);
        assert_eq!(by_date[0].contact_type.code, "COAI");
    }

    #[actix_web::test]
    async fn test_offender_without_contacts() {
        let contacts = service()
            .contacts_for(seed::OFFENDER_WITHOUT_EVENTS_ID, &ContactFilter::default())
            .await
            .unwrap();

        assert!(contacts.is_empty());
    }
}

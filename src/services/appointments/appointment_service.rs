use std::sync::Arc;

use log::info;

use crate::config::{IntegrationContext, IntegrationContextConfig};
use crate::core::{AppError, AppResult};
use crate::domain::dto::appointments::{
    Appointment, AppointmentCreateRequest, AppointmentCreateResponse, AppointmentFilter,
    ContextlessAppointmentCreateRequest, NewContact,
};
use crate::domain::entities::Requirement;
use crate::repositories::contacts::ContactRepository;
use crate::repositories::events::EventRepository;
use crate::repositories::offenders::OffenderRepository;
use crate::services::lookup::LookupService;
use crate::utils::date_utils::to_london_date_and_time;

use super::delius_api_client::DeliusApiClient;

/// Reads appointments from the contact log and books new ones through the Delius API.
pub struct AppointmentService {
    offenders: Arc<dyn OffenderRepository>,
    events: Arc<dyn EventRepository>,
    contacts: Arc<dyn ContactRepository>,
    lookup: Arc<LookupService>,
    delius_api: Arc<dyn DeliusApiClient>,
    integration_contexts: IntegrationContextConfig,
}

impl AppointmentService {
    pub fn new(
        offenders: Arc<dyn OffenderRepository>,
        events: Arc<dyn EventRepository>,
        contacts: Arc<dyn ContactRepository>,
        lookup: Arc<LookupService>,
        delius_api: Arc<dyn DeliusApiClient>,
        integration_contexts: IntegrationContextConfig,
    ) -> Self {
        Self {
            offenders,
            events,
            contacts,
            lookup,
            delius_api,
            integration_contexts,
        }
    }

    /// Attendance contacts with a start time, latest first.
    pub async fn appointments_for(&self, offender_id: i64, filter: &AppointmentFilter) -> AppResult<Vec<Appointment>> {
        let mut contacts: Vec<_> = self
            .contacts
            .find_by_offender_id(offender_id)
            .await?
            .into_iter()
            .filter(|c| c.is_appointment())
            .filter(|c| filter.from.is_none_or(|from| c.contact_date >= from))
            .filter(|c| filter.to.is_none_or(|to| c.contact_date <= to))
            .collect();
        contacts.sort_by(|a, b| b.contact_date.cmp(&a.contact_date));

        Ok(contacts.iter().map(Appointment::from).collect())
    }

    /// # Errors
    ///
    /// * `AppError::BadRequest` - the contact type is unknown or not an attendance type
    /// * `AppError::ExternalServiceError` - the Delius API rejected the contact
    pub async fn create_appointment(
        &self,
        crn: &str,
        sentence_id: i64,
        request: AppointmentCreateRequest,
    ) -> AppResult<AppointmentCreateResponse> {
        let contact_type = self
            .lookup
            .contact_type(&request.contact_type)
            .await?
            .ok_or_else(|| {
                AppError::BadRequest(format!("contact type '{}' does not exist", request.contact_type))
            })?;

        if !contact_type.attendance_contact {
            return Err(AppError::BadRequest(format!(
                "contact type '{}' is not an appointment type",
                contact_type.code
            )));
        }

        let contact = new_contact(crn, sentence_id, request);
        let created = self.delius_api.create_new_contact(&contact).await?;
        info!(
            "Created {} appointment {} for {} on {}",
            contact.contact_type, created.id, crn, contact.date
        );

        Ok(AppointmentCreateResponse {
            appointment_id: created.id,
        })
    }

    /// Books an appointment with the Delius codes of the named integration context.
    pub async fn create_appointment_with_context(
        &self,
        crn: &str,
        sentence_id: i64,
        context_name: &str,
        request: ContextlessAppointmentCreateRequest,
    ) -> AppResult<AppointmentCreateResponse> {
        let context = self.context(context_name)?.clone();
        let requirement = self
            .requirement(crn, sentence_id, &context.requirement_rehabilitation_activity_type)
            .await?;

        let request = appointment_of(request, requirement.requirement_id, &context);
        self.create_appointment(crn, sentence_id, request).await
    }

    fn context(&self, name: &str) -> AppResult<&IntegrationContext> {
        self.integration_contexts
            .get(name)
            .ok_or_else(|| AppError::BadRequest(format!("IntegrationContext does not exist for: {}", name)))
    }

    /// The active requirement of the given type category on the conviction.
    async fn requirement(&self, crn: &str, conviction_id: i64, type_category: &str) -> AppResult<Requirement> {
        let offender = self
            .offenders
            .find_by_crn(crn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Offender with CRN {} not found", crn)))?;

        let event = self
            .events
            .find_by_id(conviction_id)
            .await?
            .filter(|e| e.offender_id == offender.offender_id && !e.soft_deleted)
            .ok_or_else(|| AppError::NotFound(format!("Conviction with id {} not found", conviction_id)))?;

        event
            .disposal
            .iter()
            .flat_map(|d| d.requirements.iter())
            .find(|r| r.active_flag && !r.soft_deleted && r.type_category_code == type_category)
            .cloned()
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Requirement of type {} not found for conviction {}",
                    type_category, conviction_id
                ))
            })
    }
}

fn new_contact(crn: &str, sentence_id: i64, request: AppointmentCreateRequest) -> NewContact {
    let (date, start_time) = to_london_date_and_time(&request.appointment_start);
    let (_, end_time) = to_london_date_and_time(&request.appointment_end);

    NewContact {
        offender_crn: crn.to_string(),
        contact_type: request.contact_type,
        provider: request.provider_code,
        team: request.team_code,
        staff: request.staff_code,
        office_location: request.office_location_code,
        date,
        start_time,
        end_time,
        alert: false,
        sensitive: request.sensitive,
        notes: request.notes,
        event_id: sentence_id,
        requirement_id: request.requirement_id,
    }
}

fn appointment_of(
    request: ContextlessAppointmentCreateRequest,
    requirement_id: i64,
    context: &IntegrationContext,
) -> AppointmentCreateRequest {
    AppointmentCreateRequest {
        requirement_id: Some(requirement_id),
        contact_type: context.appointment_contact_type.clone(),
        appointment_start: request.appointment_start,
        appointment_end: request.appointment_end,
        office_location_code: request.office_location_code,
        notes: request.notes,
        provider_code: context.provider_code.clone(),
        team_code: context.team_code.clone(),
        staff_code: context.staff_code.clone(),
        sensitive: request.sensitive,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate, NaiveTime};

    use super::*;
    use crate::config::COMMISSIONED_REHABILITATION_SERVICES;
    use crate::repositories::in_memory::seed;
    use crate::services::testing::{TestServices, FIRST_DELIUS_CONTACT_ID};

    fn request(contact_type: &str) -> AppointmentCreateRequest {
        AppointmentCreateRequest {
            requirement_id: None,
            contact_type: contact_type.to_string(),
            appointment_start: DateTime::parse_from_rfc3339("2021-06-10T09:00:00Z").unwrap(),
            appointment_end: DateTime::parse_from_rfc3339("2021-06-10T10:00:00Z").unwrap(),
            office_location_code: Some("CRSSHEF".to_string()),
            notes: Some("initial session".to_string()),
            provider_code: "CRS".to_string(),
            team_code: "CRSUAT".to_string(),
            staff_code: "CRSUATU".to_string(),
            sensitive: false,
        }
    }

    fn contextless() -> ContextlessAppointmentCreateRequest {
        ContextlessAppointmentCreateRequest {
            appointment_start: DateTime::parse_from_rfc3339("2021-01-10T13:30:00Z").unwrap(),
            appointment_end: DateTime::parse_from_rfc3339("2021-01-10T14:30:00Z").unwrap(),
            office_location_code: None,
            notes: None,
            sensitive: true,
        }
    }

    #[actix_web::test]
    async fn test_appointments_are_attendance_contacts_latest_first() {
        let t = TestServices::new();

        let appointments = t
            .context
            .appointments
            .appointments_for(seed::OFFENDER_ID, &AppointmentFilter::default())
            .await
            .unwrap();

        let types: Vec<&str> = appointments.iter().map(|a| a.appointment_type.code.as_str()).collect();
        assert_eq!(types, vec!["CRSAPT", "COAI"]);

        let filtered = t
            .context
            .appointments
            .appointments_for(
                seed::OFFENDER_ID,
                &AppointmentFilter {
                    from: NaiveDate::from_ymd_opt(2021, 1, 1),
                    to: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
    }

    #[actix_web::test]
    async fn test_create_appointment_posts_london_times() {
        let t = TestServices::new();

        let response = t
            .context
            .appointments
            .create_appointment(seed::CRN, seed::COMMUNITY_EVENT_ID, request("CRSAPT"))
            .await
            .unwrap();

        let posted = t.delius_api.contacts();
        assert_eq!(posted.len(), 1);
        assert_eq!(response.appointment_id, FIRST_DELIUS_CONTACT_ID);
        assert_eq!(posted[0].date, NaiveDate::from_ymd_opt(2021, 6, 10).unwrap());
        assert_eq!(posted[0].start_time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(posted[0].end_time, NaiveTime::from_hms_opt(11, 0, 0).unwrap());
        assert_eq!(posted[0].event_id, seed::COMMUNITY_EVENT_ID);
        assert_eq!(posted[0].office_location.as_deref(), Some("CRSSHEF"));
    }

    #[actix_web::test]
    async fn test_create_appointment_rejects_unknown_and_non_attendance_types() {
        let t = TestServices::new();
        let appointments = &t.context.appointments;

        let unknown = appointments
            .create_appointment(seed::CRN, seed::COMMUNITY_EVENT_ID, request("NOPE"))
            .await
            .unwrap_err();
        assert_eq!(unknown.message(), "contact type 'NOPE' does not exist");

        let not_attendance = appointments
            .create_appointment(seed::CRN, seed::COMMUNITY_EVENT_ID, request("CMOB"))
            .await
            .unwrap_err();
        assert_eq!(not_attendance.message(), "contact type 'CMOB' is not an appointment type");

        assert!(t.delius_api.contacts().is_empty());
    }

    #[actix_web::test]
    async fn test_create_appointment_with_context_uses_rar_requirement() {
        let t = TestServices::new();

        t.context
            .appointments
            .create_appointment_with_context(
                seed::CRN,
                seed::COMMUNITY_EVENT_ID,
                COMMISSIONED_REHABILITATION_SERVICES,
                contextless(),
            )
            .await
            .unwrap();

        let posted = t.delius_api.contacts();
        assert_eq!(posted[0].requirement_id, Some(seed::RAR_REQUIREMENT_ID));
        assert_eq!(posted[0].contact_type, "CRSAPT");
        assert_eq!(posted[0].provider, "CRS");
        assert_eq!(posted[0].staff, "CRSUATU");
        assert!(posted[0].sensitive);
    }

    #[actix_web::test]
    async fn test_create_appointment_with_context_failures() {
        let t = TestServices::new();
        let appointments = &t.context.appointments;

        let context = appointments
            .create_appointment_with_context(seed::CRN, seed::COMMUNITY_EVENT_ID, "unknown", contextless())
            .await
            .unwrap_err();
        assert_eq!(context.message(), "IntegrationContext does not exist for: unknown");

        let requirement = appointments
            .create_appointment_with_context(
                seed::CRN,
                seed::CUSTODIAL_EVENT_ID,
                COMMISSIONED_REHABILITATION_SERVICES,
                contextless(),
            )
            .await
            .unwrap_err();
        assert!(matches!(requirement, AppError::NotFound(_)));
    }
}

//! Appointment booking requests, appointment views and the Delius API contact payloads.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::dto::common::{Human, KeyValue};
use crate::domain::entities::Contact;
use crate::utils::string_utils::deserialize_optional_string;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_appointment_window"))]
pub struct AppointmentCreateRequest {
    pub requirement_id: Option<i64>,
    #[validate(length(min = 1, max = 10, message = "contactType must be 1-10 characters"))]
    pub contact_type: String,
    pub appointment_start: DateTime<FixedOffset>,
    pub appointment_end: DateTime<FixedOffset>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub office_location_code: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "providerCode is required"))]
    pub provider_code: String,
    #[validate(length(min = 1, message = "teamCode is required"))]
    pub team_code: String,
    #[validate(length(min = 1, message = "staffCode is required"))]
    pub staff_code: String,
    #[serde(default)]
    pub sensitive: bool,
}

fn validate_appointment_window(request: &AppointmentCreateRequest) -> Result<(), ValidationError> {
    check_window(request.appointment_start, request.appointment_end)
}

/// Appointment request from an integration that leaves the Delius codes to its context.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_contextless_window"))]
pub struct ContextlessAppointmentCreateRequest {
    pub appointment_start: DateTime<FixedOffset>,
    pub appointment_end: DateTime<FixedOffset>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub office_location_code: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub notes: Option<String>,
    #[serde(default)]
    pub sensitive: bool,
}

fn validate_contextless_window(request: &ContextlessAppointmentCreateRequest) -> Result<(), ValidationError> {
    check_window(request.appointment_start, request.appointment_end)
}

fn check_window(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Result<(), ValidationError> {
    if end <= start {
        return Err(ValidationError::new("appointment_window")
            .with_message("appointmentEnd must be after appointmentStart".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentCreateResponse {
    pub appointment_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub appointment_id: i64,
    pub appointment_start: NaiveDateTime,
    pub appointment_end: Option<NaiveDateTime>,
    #[serde(rename = "type")]
    pub appointment_type: KeyValue,
    pub notes: Option<String>,
    pub staff: Option<Human>,
}

impl From<&Contact> for Appointment {
    fn from(contact: &Contact) -> Self {
        Self {
            appointment_id: contact.contact_id,
            appointment_start: contact.contact_start(),
            appointment_end: contact.contact_end_time.map(|t| contact.contact_date.and_time(t)),
            appointment_type: KeyValue::new(&contact.contact_type.code, &contact.contact_type.description),
            notes: contact.notes.clone(),
            staff: contact
                .staff
                .as_ref()
                .map(|s| Human::new(&s.forename, s.forename2.as_deref(), &s.surname)),
        }
    }
}

/// Date range of `GET .../appointments`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppointmentFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Contact creation payload of the Delius API. Times are London local.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    pub offender_crn: String,
    #[serde(rename = "type")]
    pub contact_type: String,
    pub provider: String,
    pub team: String,
    pub staff: String,
    pub office_location: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub alert: bool,
    pub sensitive: bool,
    pub notes: Option<String>,
    pub event_id: i64,
    pub requirement_id: Option<i64>,
}

/// Contact as returned by the Delius API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDto {
    pub id: i64,
    pub offender_crn: Option<String>,
    #[serde(rename = "type")]
    pub contact_type: Option<String>,
}

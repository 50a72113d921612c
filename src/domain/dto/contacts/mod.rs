use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::dto::common::{Human, KeyValue};
use crate::domain::entities::Contact;
use crate::utils::string_utils::split_comma_separated;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSummary {
    pub contact_id: i64,
    pub contact_start: NaiveDateTime,
    pub contact_end: Option<NaiveDateTime>,
    #[serde(rename = "type")]
    pub contact_type: KeyValue,
    pub notes: Option<String>,
    pub staff: Option<Human>,
    pub event_id: Option<i64>,
}

impl From<&Contact> for ContactSummary {
    fn from(contact: &Contact) -> Self {
        Self {
            contact_id: contact.contact_id,
            contact_start: contact.contact_start(),
            contact_end: contact.contact_end_time.map(|t| contact.contact_date.and_time(t)),
            contact_type: KeyValue::new(&contact.contact_type.code, &contact.contact_type.description),
            notes: contact.notes.clone(),
            staff: contact
                .staff
                .as_ref()
                .map(|s| Human::new(&s.forename, s.forename2.as_deref(), &s.surname)),
            event_id: contact.event_id,
        }
    }
}

/// Filter of `GET .../contacts`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactFilter {
    pub contact_types: Vec<String>,
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

impl ContactFilter {
    pub fn matches(&self, contact: &Contact) -> bool {
        let start = contact.contact_start();
        (self.contact_types.is_empty() || self.contact_types.contains(&contact.contact_type.code))
            && self.from.is_none_or(|from| start >= from)
            && self.to.is_none_or(|to| start <= to)
    }
}

/// Raw query string of `GET .../contacts`. `contactTypes` is comma separated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFilterQuery {
    pub contact_types: Option<String>,
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

impl From<ContactFilterQuery> for ContactFilter {
    fn from(query: ContactFilterQuery) -> Self {
        Self {
            contact_types: query
                .contact_types
                .as_deref()
                .map(split_comma_separated)
                .unwrap_or_default(),
            from: query.from,
            to: query.to,
        }
    }
}

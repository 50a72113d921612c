use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::reference::StandardReference;
use super::staff::StaffRef;

/// Contact type recorded when a prisoner changes establishment.
pub const PRISON_LOCATION_CHANGE_CONTACT_TYPE: &str = "ETCP";
/// Custody history type recorded when a prisoner changes establishment.
pub const TRANSFER_TO_PRISON_HISTORY_TYPE: &str = "TPL";

/// A logged interaction with or about an offender. Appointments are
/// contacts of an attendance type with a start time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(rename = "_id")]
    pub contact_id: i64,
    pub offender_id: i64,
    pub event_id: Option<i64>,
    pub contact_type: ContactTypeSummary,
    pub contact_date: NaiveDate,
    pub contact_start_time: Option<NaiveTime>,
    pub contact_end_time: Option<NaiveTime>,
    pub notes: Option<String>,
    pub staff: Option<StaffRef>,
    pub created_datetime: NaiveDateTime,
    pub created_by_user_id: i64,
}

impl Contact {
    pub fn is_appointment(&self) -> bool {
        self.contact_type.attendance_contact && self.contact_start_time.is_some()
    }

    pub fn contact_start(&self) -> NaiveDateTime {
        self.contact_date
            .and_time(self.contact_start_time.unwrap_or(NaiveTime::MIN))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactTypeSummary {
    pub code: String,
    pub description: String,
    pub attendance_contact: bool,
}

/// Audit trail of custody changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustodyHistory {
    #[serde(rename = "_id")]
    pub custody_history_id: i64,
    pub offender_id: i64,
    pub custody_id: i64,
    pub historical_date: NaiveDate,
    pub history_type: StandardReference,
    pub detail: String,
    pub created_by_user_id: i64,
}

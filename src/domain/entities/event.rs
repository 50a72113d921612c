//! The event aggregate: a conviction with its sentence, custody record,
//! key dates, releases, court appearances and requirements. Stored as a
//! single document so every custody change is written atomically.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::reference::{Institution, StandardReference};

/// Code of the sentence expiry key date, which IAPS also tracks.
pub const SENTENCE_EXPIRY_DATE_CODE: &str = "SED";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "_id")]
    pub event_id: i64,
    pub offender_id: i64,
    pub event_number: String,
    pub active_flag: bool,
    pub soft_deleted: bool,
    pub in_breach: bool,
    /// Events flagged here are mirrored into IAPS.
    pub iaps_flag: bool,
    pub referral_date: NaiveDate,
    pub conviction_date: Option<NaiveDate>,
    pub disposal: Option<Disposal>,
    #[serde(default)]
    pub court_appearances: Vec<CourtAppearance>,
    pub created_datetime: NaiveDateTime,
    pub last_updated_datetime: NaiveDateTime,
    /// Bumped on every save. A save carrying an older version is refused.
    #[serde(default)]
    pub version: i64,
}

impl Event {
    pub fn custody(&self) -> Option<&Custody> {
        self.disposal.as_ref().and_then(|d| d.custody.as_ref())
    }

    pub fn custody_mut(&mut self) -> Option<&mut Custody> {
        self.disposal.as_mut().and_then(|d| d.custody.as_mut())
    }

    pub fn has_custody(&self) -> bool {
        self.custody().is_some()
    }

    /// Booking number of the custody record, if any.
    pub fn prison_booking_number(&self) -> Option<&str> {
        self.custody().and_then(|c| c.prisoner_number.as_deref())
    }

    /// Not deleted, active, with an unterminated custodial sentence that has a custody record.
    pub fn is_active_custodial(&self) -> bool {
        if self.soft_deleted || !self.active_flag {
            return false;
        }
        match &self.disposal {
            Some(disposal) => {
                disposal.termination_date.is_none()
                    && disposal.disposal_type.as_ref().is_some_and(|t| t.custodial)
                    && disposal.custody.is_some()
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disposal {
    pub disposal_id: i64,
    pub start_date: NaiveDate,
    pub termination_date: Option<NaiveDate>,
    pub disposal_type: Option<DisposalType>,
    pub length: Option<i64>,
    pub length_units: Option<String>,
    pub custody: Option<Custody>,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisposalType {
    pub code: String,
    pub description: String,
    pub sentence_type: String,
    pub custodial: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Custody {
    pub custody_id: i64,
    /// The prison booking number.
    pub prisoner_number: Option<String>,
    pub institution: Option<Institution>,
    pub status: Option<StandardReference>,
    pub location_change_date: Option<NaiveDate>,
    #[serde(default)]
    pub key_dates: Vec<KeyDate>,
    #[serde(default)]
    pub releases: Vec<Release>,
    pub last_updated_datetime: NaiveDateTime,
    pub last_updated_user_id: i64,
}

impl Custody {
    pub fn key_date(&self, type_code: &str) -> Option<&KeyDate> {
        self.key_dates.iter().find(|kd| kd.key_date_type.code_value == type_code)
    }

    pub fn key_date_mut(&mut self, type_code: &str) -> Option<&mut KeyDate> {
        self.key_dates.iter_mut().find(|kd| kd.key_date_type.code_value == type_code)
    }

    /// Removes and returns the key date of the given type.
    pub fn remove_key_date(&mut self, type_code: &str) -> Option<KeyDate> {
        let index = self
            .key_dates
            .iter()
            .position(|kd| kd.key_date_type.code_value == type_code)?;
        Some(self.key_dates.remove(index))
    }

    pub fn is_at(&self, institution: &Institution) -> bool {
        self.institution
            .as_ref()
            .is_some_and(|i| i.institution_id == institution.institution_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyDate {
    pub key_date_id: i64,
    pub key_date_type: StandardReference,
    pub key_date: NaiveDate,
    pub created_datetime: NaiveDateTime,
    pub created_by_user_id: i64,
    pub last_updated_datetime: NaiveDateTime,
    pub last_updated_user_id: i64,
}

impl KeyDate {
    pub fn is_sentence_expiry(&self) -> bool {
        self.key_date_type.code_value == SENTENCE_EXPIRY_DATE_CODE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub release_id: i64,
    pub actual_release_date: NaiveDateTime,
    pub release_type: Option<StandardReference>,
    pub institution: Option<Institution>,
    pub notes: Option<String>,
    pub soft_deleted: bool,
    pub recall: Option<Recall>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recall {
    pub recall_id: i64,
    pub recall_date: NaiveDateTime,
    pub reason: StandardReference,
    pub notes: Option<String>,
    pub soft_deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourtAppearance {
    pub court_appearance_id: i64,
    pub appearance_date: NaiveDateTime,
    pub court_code: String,
    pub appearance_type: Option<StandardReference>,
    pub soft_deleted: bool,
}

/// A requirement of a community sentence, e.g. rehabilitation activity days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub requirement_id: i64,
    /// Requirement type category code; `F` is a rehabilitation activity requirement.
    pub type_category_code: String,
    pub description: String,
    pub active_flag: bool,
    pub soft_deleted: bool,
}

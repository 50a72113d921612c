//! Reference data shared by the case entities.

use serde::{Deserialize, Serialize};

/// Code set of custody key date types.
pub const CUSTODY_KEY_DATE_CODE_SET: &str = "THROUGHCARE DATE TYPE";
/// Code set of management tiers.
pub const TIER_CODE_SET: &str = "TIER";
/// Code set of tier change reasons.
pub const TIER_CHANGE_REASON_CODE_SET: &str = "TIER CHANGE REASON";
/// Code set of custody history types.
pub const CUSTODY_HISTORY_TYPE_CODE_SET: &str = "CUSTODY EVENT TYPE";
/// Code set of prison offender manager allocation reasons.
pub const POM_ALLOCATION_REASON_CODE_SET: &str = "POM ALLOCATION REASON";

/// A row of a Delius code list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardReference {
    #[serde(rename = "_id")]
    pub standard_reference_list_id: i64,
    pub code_value: String,
    pub code_description: String,
    pub code_set_name: String,
}

impl StandardReference {
    pub fn new(id: i64, code_set: &str, code: &str, description: &str) -> Self {
        Self {
            standard_reference_list_id: id,
            code_value: code.to_string(),
            code_description: description.to_string(),
            code_set_name: code_set.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactType {
    #[serde(rename = "_id")]
    pub contact_type_id: i64,
    pub code: String,
    pub description: String,
    /// Only attendance contact types can be booked as appointments.
    pub attendance_contact: bool,
}

/// A prison or other custodial establishment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Institution {
    #[serde(rename = "_id")]
    pub institution_id: i64,
    pub code: String,
    pub description: String,
    pub institution_name: Option<String>,
    pub noms_prison_institution_code: Option<String>,
    pub establishment: bool,
    pub private_flag: bool,
}

/// A probation provider. Private sector areas are CRCs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbationArea {
    #[serde(rename = "_id")]
    pub probation_area_id: i64,
    pub code: String,
    pub description: String,
    pub private_sector: bool,
    /// Set for the areas that represent a prison.
    pub institution_id: Option<i64>,
}

impl ProbationArea {
    pub fn summary(&self) -> ProbationAreaRef {
        ProbationAreaRef {
            probation_area_id: self.probation_area_id,
            code: self.code.clone(),
            description: self.description.clone(),
            private_sector: self.private_sector,
        }
    }
}

/// Probation area as embedded in staff and manager records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbationAreaRef {
    pub probation_area_id: i64,
    pub code: String,
    pub description: String,
    pub private_sector: bool,
}

/// A Delius login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub user_id: i64,
    pub distinguished_name: String,
    pub forename: String,
    pub surname: String,
    pub staff_id: Option<i64>,
}

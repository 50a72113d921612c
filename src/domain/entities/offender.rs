use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::reference::{ProbationAreaRef, StandardReference};
use super::staff::{StaffRef, TeamRef};

/// A person under probation supervision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offender {
    #[serde(rename = "_id")]
    pub offender_id: i64,
    pub crn: String,
    pub noms_number: Option<String>,
    pub pnc_number: Option<String>,
    pub first_name: String,
    pub second_name: Option<String>,
    pub third_name: Option<String>,
    pub surname: String,
    pub previous_surname: Option<String>,
    pub date_of_birth: NaiveDate,
    pub gender: Option<StandardReference>,
    pub soft_deleted: bool,
    pub current_disposal: bool,
    pub current_exclusion: bool,
    pub current_restriction: bool,
    /// Code of the current management tier, e.g. `UB2`.
    pub current_tier: Option<String>,
    #[serde(default)]
    pub offender_managers: Vec<OffenderManager>,
    #[serde(default)]
    pub prison_offender_managers: Vec<PrisonOffenderManager>,
}

impl Offender {
    pub fn active_offender_managers(&self) -> impl Iterator<Item = &OffenderManager> {
        self.offender_managers.iter().filter(|om| om.is_active())
    }

    pub fn active_prison_offender_managers(&self) -> impl Iterator<Item = &PrisonOffenderManager> {
        self.prison_offender_managers.iter().filter(|pom| pom.is_active())
    }
}

/// Community offender manager allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffenderManager {
    pub offender_manager_id: i64,
    pub staff: StaffRef,
    pub team: Option<TeamRef>,
    pub probation_area: ProbationAreaRef,
    pub allocation_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub active_flag: bool,
    pub soft_deleted: bool,
    pub responsible_officer: bool,
}

impl OffenderManager {
    pub fn is_active(&self) -> bool {
        self.active_flag && !self.soft_deleted
    }
}

/// Prison offender manager allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrisonOffenderManager {
    pub prison_offender_manager_id: i64,
    pub staff: StaffRef,
    pub team: Option<TeamRef>,
    pub probation_area: ProbationAreaRef,
    pub allocation_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub active_flag: bool,
    pub soft_deleted: bool,
    pub responsible_officer: bool,
    pub allocation_reason: Option<StandardReference>,
    pub last_updated_datetime: NaiveDateTime,
}

impl PrisonOffenderManager {
    pub fn is_active(&self) -> bool {
        self.active_flag && !self.soft_deleted
    }
}

/// History of management tier changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagementTier {
    pub offender_id: i64,
    pub tier: StandardReference,
    pub tier_change_reason: StandardReference,
    pub date_changed: NaiveDateTime,
    pub created_by_user_id: i64,
}

use serde::{Deserialize, Serialize};

use super::reference::ProbationAreaRef;

/// A member of staff. Codes ending in `U` are unallocated placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    #[serde(rename = "_id")]
    pub staff_id: i64,
    pub officer_code: String,
    pub forename: String,
    pub forename2: Option<String>,
    pub surname: String,
    pub probation_area: ProbationAreaRef,
    pub private_sector: bool,
    #[serde(default)]
    pub teams: Vec<TeamRef>,
    /// Delius username, if the staff member can log in.
    pub username: Option<String>,
}

impl Staff {
    pub fn is_unallocated(&self) -> bool {
        self.officer_code.ends_with('U')
    }

    pub fn summary(&self) -> StaffRef {
        StaffRef {
            staff_id: self.staff_id,
            officer_code: self.officer_code.clone(),
            forename: self.forename.clone(),
            forename2: self.forename2.clone(),
            surname: self.surname.clone(),
        }
    }
}

/// Staff as embedded in manager records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffRef {
    pub staff_id: i64,
    pub officer_code: String,
    pub forename: String,
    pub forename2: Option<String>,
    pub surname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRef {
    pub team_id: i64,
    pub code: String,
    pub description: String,
    pub telephone: Option<String>,
}

use serde::{Deserialize, Serialize};

use crate::domain::dto::common::{Human, ProbationAreaDto, TeamDto};
use crate::domain::entities::Staff;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffDetails {
    pub staff_code: String,
    pub staff_identifier: i64,
    pub staff: Human,
    pub teams: Vec<TeamDto>,
    pub probation_area: ProbationAreaDto,
    pub username: Option<String>,
    pub email: Option<String>,
}

impl StaffDetails {
    pub fn of(staff: &Staff, email: Option<String>) -> Self {
        Self {
            staff_code: staff.officer_code.clone(),
            staff_identifier: staff.staff_id,
            staff: Human::new(&staff.forename, staff.forename2.as_deref(), &staff.surname),
            teams: staff.teams.iter().map(TeamDto::from).collect(),
            probation_area: ProbationAreaDto::from(&staff.probation_area),
            username: staff.username.clone(),
            email,
        }
    }
}

//! Offender views: summary, latest release and recall, managers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::dto::common::{Human, InstitutionDto, KeyValue, ProbationAreaDto, TeamDto};
use crate::domain::entities::{Offender, OffenderManager, PrisonOffenderManager, Recall, Release};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherIds {
    pub crn: String,
    pub noms_number: Option<String>,
    pub pnc_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffenderSummary {
    pub offender_id: i64,
    pub other_ids: OtherIds,
    pub first_name: String,
    pub middle_names: Vec<String>,
    pub surname: String,
    pub previous_surname: Option<String>,
    pub date_of_birth: NaiveDate,
    pub gender: Option<String>,
    pub current_disposal: bool,
    pub current_exclusion: bool,
    pub current_restriction: bool,
    pub current_tier: Option<String>,
}

impl From<&Offender> for OffenderSummary {
    fn from(offender: &Offender) -> Self {
        let middle_names = [&offender.second_name, &offender.third_name]
            .into_iter()
            .flatten()
            .filter(|name| !name.trim().is_empty())
            .cloned()
            .collect();

        Self {
            offender_id: offender.offender_id,
            other_ids: OtherIds {
                crn: offender.crn.clone(),
                noms_number: offender.noms_number.clone(),
                pnc_number: offender.pnc_number.clone(),
            },
            first_name: offender.first_name.clone(),
            middle_names,
            surname: offender.surname.clone(),
            previous_surname: offender.previous_surname.clone(),
            date_of_birth: offender.date_of_birth,
            gender: offender.gender.as_ref().map(|g| g.code_description.clone()),
            current_disposal: offender.current_disposal,
            current_exclusion: offender.current_exclusion,
            current_restriction: offender.current_restriction,
            current_tier: offender.current_tier.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffenderRecall {
    pub date: NaiveDate,
    pub reason: KeyValue,
    pub notes: Option<String>,
}

impl From<&Recall> for OffenderRecall {
    fn from(recall: &Recall) -> Self {
        Self {
            date: recall.recall_date.date(),
            reason: KeyValue::from(&recall.reason),
            notes: recall.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffenderRelease {
    pub date: NaiveDate,
    pub reason: Option<KeyValue>,
    pub notes: Option<String>,
    pub institution: Option<InstitutionDto>,
}

impl From<&Release> for OffenderRelease {
    fn from(release: &Release) -> Self {
        Self {
            date: release.actual_release_date.date(),
            reason: release.release_type.as_ref().map(KeyValue::from),
            notes: release.notes.clone(),
            institution: release.institution.as_ref().map(InstitutionDto::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffenderLatestRecall {
    pub last_recall: Option<OffenderRecall>,
    pub last_release: Option<OffenderRelease>,
}

impl OffenderLatestRecall {
    /// Picks the latest live release and the live recall attached to it.
    pub fn from_releases(releases: &[Release]) -> Self {
        let latest = releases
            .iter()
            .filter(|r| !r.soft_deleted)
            .max_by_key(|r| r.actual_release_date);

        Self {
            last_recall: latest
                .and_then(|r| r.recall.as_ref())
                .filter(|recall| !recall.soft_deleted)
                .map(OffenderRecall::from),
            last_release: latest.map(OffenderRelease::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityOrPrisonOffenderManager {
    pub staff_code: String,
    pub staff_id: i64,
    pub staff: Human,
    pub is_unallocated: bool,
    pub team: Option<TeamDto>,
    pub probation_area: ProbationAreaDto,
    pub is_responsible_officer: bool,
    pub is_prison_offender_manager: bool,
    pub from_date: NaiveDate,
}

impl From<&OffenderManager> for CommunityOrPrisonOffenderManager {
    fn from(manager: &OffenderManager) -> Self {
        Self {
            staff_code: manager.staff.officer_code.clone(),
            staff_id: manager.staff.staff_id,
            staff: Human::new(&manager.staff.forename, manager.staff.forename2.as_deref(), &manager.staff.surname),
            is_unallocated: manager.staff.officer_code.ends_with('U'),
            team: manager.team.as_ref().map(TeamDto::from),
            probation_area: ProbationAreaDto::from(&manager.probation_area),
            is_responsible_officer: manager.responsible_officer,
            is_prison_offender_manager: false,
            from_date: manager.allocation_date,
        }
    }
}

impl From<&PrisonOffenderManager> for CommunityOrPrisonOffenderManager {
    fn from(manager: &PrisonOffenderManager) -> Self {
        Self {
            staff_code: manager.staff.officer_code.clone(),
            staff_id: manager.staff.staff_id,
            staff: Human::new(&manager.staff.forename, manager.staff.forename2.as_deref(), &manager.staff.surname),
            is_unallocated: manager.staff.officer_code.ends_with('U'),
            team: manager.team.as_ref().map(TeamDto::from),
            probation_area: ProbationAreaDto::from(&manager.probation_area),
            is_responsible_officer: manager.responsible_officer,
            is_prison_offender_manager: true,
            from_date: manager.allocation_date,
        }
    }
}

/// Offender managed by a member of staff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedOffender {
    pub staff_code: String,
    pub staff_identifier: i64,
    pub offender_id: i64,
    pub noms_number: Option<String>,
    pub crn_number: String,
    pub offender_surname: String,
    pub is_current_ro: bool,
    pub is_current_om: bool,
    pub is_current_pom: bool,
    pub om_start_date: NaiveDate,
    pub om_end_date: Option<NaiveDate>,
}

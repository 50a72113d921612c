//! Response fragments shared across resources.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Institution, ProbationAreaRef, StandardReference, TeamRef};

/// A code and its description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValue {
    pub code: String,
    pub description: String,
}

impl KeyValue {
    pub fn new(code: &str, description: &str) -> Self {
        Self {
            code: code.to_string(),
            description: description.to_string(),
        }
    }
}

impl From<&StandardReference> for KeyValue {
    fn from(reference: &StandardReference) -> Self {
        Self::new(&reference.code_value, &reference.code_description)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionDto {
    pub institution_id: i64,
    pub code: String,
    pub description: String,
    pub institution_name: Option<String>,
    pub noms_prison_institution_code: Option<String>,
    pub is_establishment: bool,
    pub is_private: bool,
}

impl From<&Institution> for InstitutionDto {
    fn from(institution: &Institution) -> Self {
        Self {
            institution_id: institution.institution_id,
            code: institution.code.clone(),
            description: institution.description.clone(),
            institution_name: institution.institution_name.clone(),
            noms_prison_institution_code: institution.noms_prison_institution_code.clone(),
            is_establishment: institution.establishment,
            is_private: institution.private_flag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbationAreaDto {
    pub probation_area_id: i64,
    pub code: String,
    pub description: String,
    pub nps: bool,
}

impl From<&ProbationAreaRef> for ProbationAreaDto {
    fn from(area: &ProbationAreaRef) -> Self {
        Self {
            probation_area_id: area.probation_area_id,
            code: area.code.clone(),
            description: area.description.clone(),
            nps: !area.private_sector,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDto {
    pub code: String,
    pub description: String,
    pub telephone: Option<String>,
}

impl From<&TeamRef> for TeamDto {
    fn from(team: &TeamRef) -> Self {
        Self {
            code: team.code.clone(),
            description: team.description.clone(),
            telephone: team.telephone.clone(),
        }
    }
}

/// Name of a person as shown to API clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Human {
    pub forenames: String,
    pub surname: String,
}

impl Human {
    pub fn new(forename: &str, forename2: Option<&str>, surname: &str) -> Self {
        let forenames = match forename2 {
            Some(second) if !second.trim().is_empty() => format!("{} {}", forename, second),
            _ => forename.to_string(),
        };
        Self {
            forenames,
            surname: surname.to_string(),
        }
    }
}

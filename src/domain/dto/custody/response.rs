use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::dto::common::{InstitutionDto, KeyValue};
use crate::domain::entities::{Custody, KeyDate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustodyKeyDate {
    #[serde(rename = "type")]
    pub key_date_type: KeyValue,
    pub date: NaiveDate,
}

impl From<&KeyDate> for CustodyKeyDate {
    fn from(key_date: &KeyDate) -> Self {
        Self {
            key_date_type: KeyValue::from(&key_date.key_date_type),
            date: key_date.key_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustodyDto {
    pub booking_number: Option<String>,
    pub institution: Option<InstitutionDto>,
    pub status: Option<KeyValue>,
    pub key_dates: Vec<CustodyKeyDate>,
    pub sentence_start_date: Option<NaiveDate>,
}

impl CustodyDto {
    /// Builds the view of a custody record. `sentence_start_date` comes from the owning disposal.
    pub fn of(custody: &Custody, sentence_start_date: Option<NaiveDate>) -> Self {
        Self {
            booking_number: custody.prisoner_number.clone(),
            institution: custody.institution.as_ref().map(InstitutionDto::from),
            status: custody.status.as_ref().map(KeyValue::from),
            key_dates: custody.key_dates.iter().map(CustodyKeyDate::from).collect(),
            sentence_start_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::StandardReference;
    use chrono::NaiveDateTime;

    #[test]
    fn test_custody_key_date_serializes_type_field() {
        let now = NaiveDateTime::default();
        let key_date = KeyDate {
            key_date_id: 1,
            key_date_type: StandardReference::new(1, "THROUGHCARE DATE TYPE", "POM1", "POM Handover expected start date"),
            key_date: NaiveDate::from_ymd_opt(2020, 5, 1).unwrap(),
            created_datetime: now,
            created_by_user_id: 1,
            last_updated_datetime: now,
            last_updated_user_id: 1,
        };

        let json = serde_json::to_value(CustodyKeyDate::from(&key_date)).unwrap();

        assert_eq!(json["type"]["code"], "POM1");
        assert_eq!(json["type"]["description"], "POM Handover expected start date");
        assert_eq!(json["date"], "2020-05-01");
    }
}

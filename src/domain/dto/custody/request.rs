use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `PUT .../custody/keyDates/{typeCode}`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCustodyKeyDate {
    pub date: NaiveDate,
}

/// Full set of prison-managed key dates for a sentence. Dates left out are deleted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceCustodyKeyDates {
    #[validate(length(min = 1, max = 35, message = "bookingNumber must be 1-35 characters"))]
    pub booking_number: Option<String>,
    pub conditional_release_date: Option<NaiveDate>,
    pub licence_expiry_date: Option<NaiveDate>,
    pub hdc_eligibility_date: Option<NaiveDate>,
    pub parole_eligibility_date: Option<NaiveDate>,
    pub sentence_expiry_date: Option<NaiveDate>,
    pub expected_release_date: Option<NaiveDate>,
    pub post_sentence_supervision_end_date: Option<NaiveDate>,
}

/// Key date type codes maintained by the prison service, in the order they are applied.
pub const MANAGED_KEY_DATE_CODES: [&str; 7] = ["ACR", "LED", "HDE", "PED", "SED", "EXP", "PSSED"];

impl ReplaceCustodyKeyDates {
    /// Pairs each managed key date type code with the date supplied for it.
    pub fn dates_by_type_code(&self) -> Vec<(&'static str, Option<NaiveDate>)> {
        vec![
            ("ACR", self.conditional_release_date),
            ("LED", self.licence_expiry_date),
            ("HDE", self.hdc_eligibility_date),
            ("PED", self.parole_eligibility_date),
            ("SED", self.sentence_expiry_date),
            ("EXP", self.expected_release_date),
            ("PSSED", self.post_sentence_supervision_end_date),
        ]
    }
}

/// Body of the prison transfer endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustody {
    #[validate(length(min = 1, max = 6, message = "nomsPrisonInstitutionCode must be 1-6 characters"))]
    pub noms_prison_institution_code: String,
}

/// Body of the booking number endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustodyBookingNumber {
    pub sentence_start_date: NaiveDate,
    #[validate(length(min = 1, max = 35, message = "bookingNumber must be 1-35 characters"))]
    pub booking_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_managed_code_is_mapped() {
        let request = ReplaceCustodyKeyDates::default();
        let codes: Vec<&str> = request.dates_by_type_code().into_iter().map(|(code, _)| code).collect();
        assert_eq!(codes, MANAGED_KEY_DATE_CODES.to_vec());
    }

    #[test]
    fn test_replace_key_dates_reads_camel_case() {
        let json = r#"{"bookingNumber":"V74111","sentenceExpiryDate":"2030-01-02"}"#;
        let request: ReplaceCustodyKeyDates = serde_json::from_str(json).unwrap();

        assert_eq!(request.booking_number.as_deref(), Some("V74111"));
        assert_eq!(request.sentence_expiry_date, NaiveDate::from_ymd_opt(2030, 1, 2));
        assert!(request.licence_expiry_date.is_none());
    }

    #[test]
    fn test_update_custody_rejects_empty_code() {
        let request = UpdateCustody { noms_prison_institution_code: String::new() };
        assert!(request.validate().is_err());
    }
}

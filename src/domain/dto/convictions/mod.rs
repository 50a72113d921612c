//! Conviction (event) views and the court case request that creates one.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::dto::common::KeyValue;
use crate::domain::dto::custody::CustodyDto;
use crate::domain::entities::{CourtAppearance, Disposal, Event};

/// A new court case, recorded as a new event for the offender.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CourtCase {
    pub referral_date: NaiveDate,
    pub conviction_date: Option<NaiveDate>,
    #[validate(length(min = 1, message = "at least one court appearance is required"))]
    #[validate(nested)]
    pub court_appearances: Vec<CourtAppearanceRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CourtAppearanceRequest {
    pub appearance_date: NaiveDateTime,
    #[validate(length(min = 1, max = 6, message = "courtCode must be 1-6 characters"))]
    pub court_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sentence {
    pub sentence_id: i64,
    pub description: Option<String>,
    pub original_length: Option<i64>,
    pub original_length_units: Option<String>,
    pub start_date: NaiveDate,
    pub termination_date: Option<NaiveDate>,
    pub custodial: bool,
}

impl From<&Disposal> for Sentence {
    fn from(disposal: &Disposal) -> Self {
        Self {
            sentence_id: disposal.disposal_id,
            description: disposal.disposal_type.as_ref().map(|t| t.description.clone()),
            original_length: disposal.length,
            original_length_units: disposal.length_units.clone(),
            start_date: disposal.start_date,
            termination_date: disposal.termination_date,
            custodial: disposal.disposal_type.as_ref().is_some_and(|t| t.custodial),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtAppearanceBasic {
    pub court_appearance_id: i64,
    pub appearance_date: NaiveDateTime,
    pub court_code: String,
    pub appearance_type: Option<KeyValue>,
}

impl From<&CourtAppearance> for CourtAppearanceBasic {
    fn from(appearance: &CourtAppearance) -> Self {
        Self {
            court_appearance_id: appearance.court_appearance_id,
            appearance_date: appearance.appearance_date,
            court_code: appearance.court_code.clone(),
            appearance_type: appearance.appearance_type.as_ref().map(KeyValue::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conviction {
    pub conviction_id: i64,
    pub index: String,
    pub active: bool,
    pub in_breach: bool,
    pub conviction_date: Option<NaiveDate>,
    pub referral_date: NaiveDate,
    pub sentence: Option<Sentence>,
    pub custody: Option<CustodyDto>,
    /// Most recent court appearance.
    pub latest_court_appearance: Option<CourtAppearanceBasic>,
}

impl From<&Event> for Conviction {
    fn from(event: &Event) -> Self {
        let latest_court_appearance = event
            .court_appearances
            .iter()
            .filter(|ca| !ca.soft_deleted)
            .max_by_key(|ca| ca.appearance_date)
            .map(CourtAppearanceBasic::from);

        Self {
            conviction_id: event.event_id,
            index: event.event_number.clone(),
            active: event.active_flag,
            in_breach: event.in_breach,
            conviction_date: event.conviction_date,
            referral_date: event.referral_date,
            sentence: event.disposal.as_ref().map(Sentence::from),
            custody: event.disposal.as_ref().and_then(|d| {
                d.custody.as_ref().map(|c| CustodyDto::of(c, Some(d.start_date)))
            }),
            latest_court_appearance,
        }
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Change-data record picked up by the SPG integration and sent to one CRC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpgNotification {
    pub control_sequence: i64,
    pub business_interaction_code: String,
    pub data_update_mode: String,
    pub offender_id: i64,
    /// Id of the changed entity.
    pub unique_id: i64,
    /// Code of the probation area the record is addressed to.
    pub receiver_identity: String,
    pub date_created: NaiveDateTime,
    pub processed: bool,
}

/// Change record for the interim accredited programmes system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IapsNotification {
    pub event_id: i64,
    pub offender_id: i64,
    pub table_name: String,
    pub date_created: NaiveDateTime,
}

//! Change records for the CRCs connected through SPG.
//!
//! Every change is written once per interested CRC, each record with its
//! own control sequence. An offender update (`OFFU`) always travels with
//! the specific change so the receiving system refreshes the offender too.

use std::sync::Arc;

use chrono::Utc;
use log::debug;

use crate::core::AppResult;
use crate::domain::entities::{Event, KeyDate, SpgNotification};
use crate::repositories::notifications::NotificationRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationEvent {
    UpdateOffender,
    InsertEvent,
    InsertCourtAppearance,
    InsertCustodyKeyDate,
    UpdateCustodyKeyDate,
    DeleteCustodyKeyDate,
    UpdateCustody,
}

impl NotificationEvent {
    /// Business interaction code.
    pub fn code(&self) -> &'static str {
        match self {
            NotificationEvent::UpdateOffender => "OFFU",
            NotificationEvent::InsertEvent => "EVTI",
            NotificationEvent::InsertCourtAppearance => "CAPI",
            NotificationEvent::InsertCustodyKeyDate => "CKDI",
            NotificationEvent::UpdateCustodyKeyDate => "CKDU",
            NotificationEvent::DeleteCustodyKeyDate => "CKDD",
            NotificationEvent::UpdateCustody => "CUSU",
        }
    }

    /// Data update mode: `I`nsert, `U`pdate or `D`elete.
    pub fn data_update_mode(&self) -> &'static str {
        match self {
            NotificationEvent::InsertEvent
            | NotificationEvent::InsertCourtAppearance
            | NotificationEvent::InsertCustodyKeyDate => "I",
            NotificationEvent::DeleteCustodyKeyDate => "D",
            NotificationEvent::UpdateOffender
            | NotificationEvent::UpdateCustodyKeyDate
            | NotificationEvent::UpdateCustody => "U",
        }
    }
}

pub struct SpgNotificationService {
    notifications: Arc<dyn NotificationRepository>,
}

impl SpgNotificationService {
    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }

    pub async fn notify_new_court_case_created(&self, event: &Event) -> AppResult<()> {
        let mut changes = vec![
            (NotificationEvent::UpdateOffender, event.offender_id),
            (NotificationEvent::InsertEvent, event.event_id),
        ];
        changes.extend(
            event
                .court_appearances
                .iter()
                .map(|appearance| (NotificationEvent::InsertCourtAppearance, appearance.court_appearance_id)),
        );

        self.notify(event.offender_id, &changes).await
    }

    pub async fn notify_new_custody_key_date(&self, key_date: &KeyDate, event: &Event) -> AppResult<()> {
        self.notify_key_date(NotificationEvent::InsertCustodyKeyDate, key_date, event)
            .await
    }

    pub async fn notify_update_of_custody_key_date(&self, key_date: &KeyDate, event: &Event) -> AppResult<()> {
        self.notify_key_date(NotificationEvent::UpdateCustodyKeyDate, key_date, event)
            .await
    }

    pub async fn notify_deleted_custody_key_date(&self, key_date: &KeyDate, event: &Event) -> AppResult<()> {
        self.notify_key_date(NotificationEvent::DeleteCustodyKeyDate, key_date, event)
            .await
    }

    pub async fn notify_update_of_custody(&self, offender_id: i64, event: &Event) -> AppResult<()> {
        let custody_id = event.custody().map(|c| c.custody_id).unwrap_or(event.event_id);
        self.notify(
            offender_id,
            &[
                (NotificationEvent::UpdateOffender, offender_id),
                (NotificationEvent::UpdateCustody, custody_id),
            ],
        )
        .await
    }

    async fn notify_key_date(&self, change: NotificationEvent, key_date: &KeyDate, event: &Event) -> AppResult<()> {
        self.notify(
            event.offender_id,
            &[
                (NotificationEvent::UpdateOffender, event.offender_id),
                (change, key_date.key_date_id),
            ],
        )
        .await
    }

    async fn notify(&self, offender_id: i64, changes: &[(NotificationEvent, i64)]) -> AppResult<()> {
        let crcs = self.notifications.interested_crcs(offender_id).await?;
        let now = Utc::now().naive_utc();

        let mut batch = Vec::with_capacity(changes.len() * crcs.len());
        for (change, unique_id) in changes {
            for crc in &crcs {
                batch.push(SpgNotification {
                    control_sequence: self.notifications.next_control_sequence().await?,
                    business_interaction_code: change.code().to_string(),
                    data_update_mode: change.data_update_mode().to_string(),
                    offender_id,
                    unique_id: *unique_id,
                    receiver_identity: crc.code.clone(),
                    date_created: now,
                    processed: false,
                });
            }
        }

        debug!("Writing {} SPG notifications for offender {}", batch.len(), offender_id);
        self.notifications.save_spg_notifications(batch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::events::EventRepository;
    use crate::repositories::in_memory::{seed, InMemoryStore};

    async fn fixture() -> (Arc<InMemoryStore>, SpgNotificationService, Event) {
        let store = Arc::new(seed::seeded_store().unwrap());
        let service = SpgNotificationService::new(store.clone());
        let event = store.find_by_id(seed::CUSTODIAL_EVENT_ID).await.unwrap().unwrap();
        (store, service, event)
    }

    fn codes(notifications: &[SpgNotification]) -> Vec<&str> {
        notifications
            .iter()
            .map(|n| n.business_interaction_code.as_str())
            .collect()
    }

    #[actix_web::test]
    async fn test_court_case_notifies_offender_event_and_appearances() {
        let (store, service, event) = fixture().await;

        service.notify_new_court_case_created(&event).await.unwrap();

        let written = store.spg_notifications().unwrap();
        assert_eq!(codes(&written), vec!["OFFU", "EVTI", "CAPI"]);
        assert!(written.iter().all(|n| n.receiver_identity == seed::CRC_CODE));
        assert_eq!(written[2].unique_id, event.court_appearances[0].court_appearance_id);
    }

    #[actix_web::test]
    async fn test_key_date_changes_carry_their_mode() {
        let (store, service, event) = fixture().await;
        let key_date = event.custody().unwrap().key_dates[0].clone();

        service.notify_new_custody_key_date(&key_date, &event).await.unwrap();
        service.notify_update_of_custody_key_date(&key_date, &event).await.unwrap();
        service.notify_deleted_custody_key_date(&key_date, &event).await.unwrap();

        let written = store.spg_notifications().unwrap();
        assert_eq!(codes(&written), vec!["OFFU", "CKDI", "OFFU", "CKDU", "OFFU", "CKDD"]);
        let modes: Vec<&str> = written.iter().map(|n| n.data_update_mode.as_str()).collect();
        assert_eq!(modes, vec!["U", "I", "U", "U", "U", "D"]);

        let sequences: Vec<i64> = written.iter().map(|n| n.control_sequence).collect();
        let mut unique = sequences.clone();
        unique.dedup();
        assert_eq!(sequences, unique);
    }

    #[actix_web::test]
    async fn test_no_interested_crcs_writes_nothing() {
        let store = Arc::new(seed::seeded_store().unwrap());
        let service = SpgNotificationService::new(store.clone());
        let event = store
            .find_by_offender_id(seed::DUPLICATE_CUSTODY_OFFENDER_ID)
            .await
            .unwrap()
            .remove(0);

        service.notify_update_of_custody(event.offender_id, &event).await.unwrap();

        assert!(store.spg_notifications().unwrap().is_empty());
    }
}

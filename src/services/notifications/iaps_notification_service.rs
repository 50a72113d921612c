use std::sync::Arc;

use chrono::Utc;
use log::debug;

use crate::core::AppResult;
use crate::domain::entities::{Event, IapsNotification};
use crate::repositories::notifications::NotificationRepository;

const EVENT_TABLE: &str = "EVENT";

/// Tells IAPS about changes to events it tracks.
pub struct IapsNotificationService {
    notifications: Arc<dyn NotificationRepository>,
}

impl IapsNotificationService {
    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }

    /// No-op unless the event is flagged for IAPS.
    pub async fn notify_event_updated(&self, event: &Event) -> AppResult<()> {
        if !event.iaps_flag {
            debug!("Event {} is not tracked by IAPS", event.event_id);
            return Ok(());
        }

        self.notifications
            .save_iaps_notification(&IapsNotification {
                event_id: event.event_id,
                offender_id: event.offender_id,
                table_name: EVENT_TABLE.to_string(),
                date_created: Utc::now().naive_utc(),
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::events::EventRepository;
    use crate::repositories::in_memory::seed;

    #[actix_web::test]
    async fn test_only_flagged_events_are_sent() {
        let store = Arc::new(seed::seeded_store().unwrap());
        let service = IapsNotificationService::new(store.clone());
        let flagged = store.find_by_id(seed::CUSTODIAL_EVENT_ID).await.unwrap().unwrap();
        let unflagged = store.find_by_id(seed::COMMUNITY_EVENT_ID).await.unwrap().unwrap();

        service.notify_event_updated(&flagged).await.unwrap();
        service.notify_event_updated(&unflagged).await.unwrap();

        let written = store.iaps_notifications().unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].event_id, seed::CUSTODIAL_EVENT_ID);
        assert_eq!(written[0].table_name, "EVENT");
    }
}

//! # Conviction Service
//!
//! Events (convictions) of an offender and the key dates on their custody
//! records.
//!
//! A key date write resolves the event in one of two ways:
//!
//! - by offender: the offender must have exactly one active custodial event
//! - by conviction id: the event must have a custody record
//!
//! Every key date insert, update or delete is followed by SPG notifications
//! for the interested CRCs, and by an IAPS notification when the sentence
//! expiry date changed.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use log::{info, warn};

use crate::config::FeatureConfig;
use crate::core::{AppError, AppResult};
use crate::domain::dto::convictions::{Conviction, CourtCase};
use crate::domain::dto::custody::{CreateCustodyKeyDate, CustodyDto, CustodyKeyDate, ReplaceCustodyKeyDates};
use crate::domain::entities::{CourtAppearance, Event, KeyDate, StandardReference};
use crate::repositories::events::EventRepository;
use crate::repositories::ids::{sequences, IdGenerator};
use crate::services::lookup::LookupService;
use crate::services::notifications::{IapsNotificationService, SpgNotificationService};

use super::errors::{ConvictionError, ConvictionResult};

/// How far a requested sentence start date may be from the recorded one.
pub const SENTENCE_START_DATE_LENIENT_DAYS: i64 = 7;

pub struct ConvictionService {
    events: Arc<dyn EventRepository>,
    ids: Arc<dyn IdGenerator>,
    lookup: Arc<LookupService>,
    spg: Arc<SpgNotificationService>,
    iaps: Arc<IapsNotificationService>,
    features: FeatureConfig,
}

impl ConvictionService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        ids: Arc<dyn IdGenerator>,
        lookup: Arc<LookupService>,
        spg: Arc<SpgNotificationService>,
        iaps: Arc<IapsNotificationService>,
        features: FeatureConfig,
    ) -> Self {
        Self {
            events,
            ids,
            lookup,
            spg,
            iaps,
            features,
        }
    }

    /// Live convictions, most recently referred first.
    pub async fn convictions_for(&self, offender_id: i64) -> AppResult<Vec<Conviction>> {
        Ok(self
            .events
            .find_by_offender_id(offender_id)
            .await?
            .iter()
            .filter(|e| !e.soft_deleted)
            .map(Conviction::from)
            .collect())
    }

    pub async fn add_court_case_for(
        &self,
        offender_id: i64,
        court_case: CourtCase,
        acting_user: &str,
    ) -> AppResult<Conviction> {
        let user_id = self.lookup.user_id_for(acting_user).await?;
        let event_count = self.events.count_by_offender_id(offender_id).await?;
        let now = Utc::now().naive_utc();

        let mut court_appearances = Vec::with_capacity(court_case.court_appearances.len());
        for appearance in &court_case.court_appearances {
            court_appearances.push(CourtAppearance {
                court_appearance_id: self.ids.next_id(sequences::COURT_APPEARANCE).await?,
                appearance_date: appearance.appearance_date,
                court_code: appearance.court_code.clone(),
                appearance_type: None,
                soft_deleted: false,
            });
        }

        let mut event = Event {
            event_id: self.ids.next_id(sequences::EVENT).await?,
            offender_id,
            event_number: (event_count + 1).to_string(),
            active_flag: true,
            soft_deleted: false,
            in_breach: false,
            iaps_flag: false,
            referral_date: court_case.referral_date,
            conviction_date: court_case.conviction_date,
            disposal: None,
            court_appearances,
            created_datetime: now,
            last_updated_datetime: now,
            version: 0,
        };

        self.events.save(&mut event).await?;
        info!(
            "Court case added for offender {} as event {} by user {}",
            offender_id, event.event_id, user_id
        );
        self.spg.notify_new_court_case_created(&event).await?;

        Ok(Conviction::from(&event))
    }

    /// The event holding the booking number. A single match is returned even
    /// when inactive; otherwise only active events count.
    pub async fn get_conviction_id_by_prison_booking_number(
        &self,
        booking_number: &str,
    ) -> ConvictionResult<Option<i64>> {
        let events = self.events.find_by_prison_booking_number(booking_number).await?;

        if let [only] = events.as_slice() {
            return Ok(Some(only.event_id));
        }

        let active: Vec<&Event> = events.iter().filter(|e| e.active_flag).collect();
        match active.as_slice() {
            [] => Ok(None),
            [event] => Ok(Some(event.event_id)),
            many => Err(ConvictionError::DuplicateConvictionsForBookingNumber(many.len())),
        }
    }

    pub async fn get_single_active_conviction_by_offender_id_and_prison_booking_number(
        &self,
        offender_id: i64,
        booking_number: &str,
    ) -> ConvictionResult<Option<Event>> {
        let mut active: Vec<Event> = self
            .events
            .find_by_offender_id_and_prison_booking_number(offender_id, booking_number)
            .await?
            .into_iter()
            .filter(|e| e.active_flag)
            .collect();

        match active.len() {
            0 => Ok(None),
            1 => Ok(active.pop()),
            count => Err(ConvictionError::DuplicateConvictionsForBookingNumber(count)),
        }
    }

    pub async fn get_single_active_conviction_id_by_offender_id_and_prison_booking_number(
        &self,
        offender_id: i64,
        booking_number: &str,
    ) -> ConvictionResult<Option<i64>> {
        Ok(self
            .get_single_active_conviction_by_offender_id_and_prison_booking_number(offender_id, booking_number)
            .await?
            .map(|e| e.event_id))
    }

    /// The active custodial event whose sentence started within a week of `sentence_start_date`.
    pub async fn get_single_active_conviction_by_offender_id_and_close_to_sentence_date(
        &self,
        offender_id: i64,
        sentence_start_date: NaiveDate,
    ) -> ConvictionResult<Option<Event>> {
        let lenience = Duration::days(SENTENCE_START_DATE_LENIENT_DAYS);
        let earliest = sentence_start_date - lenience;
        let latest = sentence_start_date + lenience;

        let mut matching: Vec<Event> = self
            .events
            .find_by_offender_id_with_custody(offender_id)
            .await?
            .into_iter()
            .filter(|e| e.active_flag)
            .filter(|e| {
                e.disposal
                    .as_ref()
                    .is_some_and(|d| d.start_date >= earliest && d.start_date <= latest)
            })
            .collect();

        match matching.len() {
            0 => Ok(None),
            1 => Ok(matching.pop()),
            count => Err(ConvictionError::DuplicateConvictionsForSentenceDate(count)),
        }
    }

    pub async fn get_active_custodial_event(&self, offender_id: i64) -> ConvictionResult<Event> {
        let mut custodial: Vec<Event> = self
            .events
            .find_by_offender_id(offender_id)
            .await?
            .into_iter()
            .filter(Event::is_active_custodial)
            .collect();

        if custodial.len() != 1 {
            return Err(ConvictionError::SingleActiveCustodyConvictionNotFound {
                offender_id,
                count: custodial.len(),
            });
        }
        custodial
            .pop()
            .ok_or(ConvictionError::SingleActiveCustodyConvictionNotFound { offender_id, count: 0 })
    }

    pub async fn add_or_replace_custody_key_date_by_offender_id(
        &self,
        offender_id: i64,
        type_code: &str,
        request: CreateCustodyKeyDate,
        acting_user: &str,
    ) -> ConvictionResult<CustodyKeyDate> {
        let mut event = self.get_active_custodial_event(offender_id).await?;
        self.add_or_replace_custody_key_date(&mut event, type_code, request.date, acting_user)
            .await
    }

    pub async fn add_or_replace_custody_key_date_by_conviction_id(
        &self,
        conviction_id: i64,
        type_code: &str,
        request: CreateCustodyKeyDate,
        acting_user: &str,
    ) -> ConvictionResult<CustodyKeyDate> {
        let mut event = self.event_with_custody(conviction_id).await?;
        self.add_or_replace_custody_key_date(&mut event, type_code, request.date, acting_user)
            .await
    }

    pub async fn get_custody_key_date_by_offender_id(
        &self,
        offender_id: i64,
        type_code: &str,
    ) -> ConvictionResult<Option<CustodyKeyDate>> {
        let event = self.get_active_custodial_event(offender_id).await?;
        Self::custody_key_date_of(&event, type_code)
    }

    pub async fn get_custody_key_date_by_conviction_id(
        &self,
        conviction_id: i64,
        type_code: &str,
    ) -> ConvictionResult<Option<CustodyKeyDate>> {
        let event = self.event_with_custody(conviction_id).await?;
        Self::custody_key_date_of(&event, type_code)
    }

    pub async fn get_custody_key_dates_by_offender_id(&self, offender_id: i64) -> ConvictionResult<Vec<CustodyKeyDate>> {
        let event = self.get_active_custodial_event(offender_id).await?;
        Self::custody_key_dates_of(&event)
    }

    pub async fn get_custody_key_dates_by_conviction_id(
        &self,
        conviction_id: i64,
    ) -> ConvictionResult<Vec<CustodyKeyDate>> {
        let event = self.event_with_custody(conviction_id).await?;
        Self::custody_key_dates_of(&event)
    }

    pub async fn delete_custody_key_date_by_offender_id(&self, offender_id: i64, type_code: &str) -> ConvictionResult<()> {
        let mut event = self.get_active_custodial_event(offender_id).await?;
        self.delete_custody_key_date(&mut event, type_code).await
    }

    pub async fn delete_custody_key_date_by_conviction_id(
        &self,
        conviction_id: i64,
        type_code: &str,
    ) -> ConvictionResult<()> {
        let mut event = self.event_with_custody(conviction_id).await?;
        self.delete_custody_key_date(&mut event, type_code).await
    }

    /// Makes the prison-managed key dates of the conviction match the request.
    /// Every supplied date is written, and notified, even when it matches the
    /// stored one. Managed dates missing from the request are deleted.
    pub async fn add_or_replace_or_delete_custody_key_dates(
        &self,
        offender_id: i64,
        conviction_id: i64,
        request: ReplaceCustodyKeyDates,
        acting_user: &str,
    ) -> ConvictionResult<CustodyDto> {
        let mut event = self.event_with_custody(conviction_id).await?;
        if event.offender_id != offender_id {
            return Err(AppError::NotFound(format!(
                "Conviction {} not found for offender {}",
                conviction_id, offender_id
            ))
            .into());
        }

        if !self.features.update_custody_key_dates {
            warn!(
                "Update of custody key dates is switched off, ignoring key dates for conviction {}",
                conviction_id
            );
            return Self::custody_dto_of(&event);
        }

        for (type_code, requested) in request.dates_by_type_code() {
            let current = event
                .custody()
                .and_then(|c| c.key_date(type_code))
                .map(|kd| kd.key_date);

            match (requested, current) {
                (Some(date), _) => {
                    self.add_or_replace_custody_key_date(&mut event, type_code, date, acting_user)
                        .await?;
                }
                (None, Some(_)) => self.delete_custody_key_date(&mut event, type_code).await?,
                (None, None) => {}
            }
        }

        Self::custody_dto_of(&event)
    }

    async fn event_with_custody(&self, conviction_id: i64) -> ConvictionResult<Event> {
        let event = self
            .events
            .find_by_id(conviction_id)
            .await?
            .filter(|e| !e.soft_deleted)
            .ok_or_else(|| AppError::NotFound(format!("Conviction with id {} not found", conviction_id)))?;

        if !event.has_custody() {
            return Err(ConvictionError::CustodyNotFound(conviction_id));
        }
        Ok(event)
    }

    async fn key_date_type(&self, type_code: &str) -> ConvictionResult<StandardReference> {
        self.lookup
            .custody_key_date_type(type_code)
            .await?
            .ok_or_else(|| ConvictionError::CustodyTypeCodeIsNotValid(type_code.to_string()))
    }

    async fn add_or_replace_custody_key_date(
        &self,
        event: &mut Event,
        type_code: &str,
        date: NaiveDate,
        acting_user: &str,
    ) -> ConvictionResult<CustodyKeyDate> {
        let key_date_type = self.key_date_type(type_code).await?;
        let user_id = self.lookup.user_id_for(acting_user).await?;
        let now = Utc::now().naive_utc();
        let event_id = event.event_id;

        let custody = event
            .custody_mut()
            .ok_or(ConvictionError::CustodyNotFound(event_id))?;

        let (key_date, inserted) = match custody.key_date_mut(type_code) {
            Some(existing) => {
                existing.key_date = date;
                existing.last_updated_datetime = now;
                existing.last_updated_user_id = user_id;
                (existing.clone(), false)
            }
            None => {
                let key_date = KeyDate {
                    key_date_id: self.ids.next_id(sequences::KEY_DATE).await?,
                    key_date_type,
                    key_date: date,
                    created_datetime: now,
                    created_by_user_id: user_id,
                    last_updated_datetime: now,
                    last_updated_user_id: user_id,
                };
                custody.key_dates.push(key_date.clone());
                (key_date, true)
            }
        };
        custody.last_updated_datetime = now;
        custody.last_updated_user_id = user_id;
        event.last_updated_datetime = now;

        self.events.save(event).await?;

        if inserted {
            info!("Added {} key date {} to event {}", type_code, date, event_id);
            self.spg.notify_new_custody_key_date(&key_date, event).await?;
        } else {
            info!("Updated {} key date to {} on event {}", type_code, date, event_id);
            self.spg.notify_update_of_custody_key_date(&key_date, event).await?;
        }
        if key_date.is_sentence_expiry() {
            self.iaps.notify_event_updated(event).await?;
        }

        Ok(CustodyKeyDate::from(&key_date))
    }

    async fn delete_custody_key_date(&self, event: &mut Event, type_code: &str) -> ConvictionResult<()> {
        let event_id = event.event_id;
        let custody = event
            .custody_mut()
            .ok_or(ConvictionError::CustodyNotFound(event_id))?;

        let Some(removed) = custody.remove_key_date(type_code) else {
            return Ok(());
        };
        event.last_updated_datetime = Utc::now().naive_utc();

        self.events.save(event).await?;
        info!("Deleted {} key date from event {}", type_code, event_id);

        self.spg.notify_deleted_custody_key_date(&removed, event).await?;
        if removed.is_sentence_expiry() {
            self.iaps.notify_event_updated(event).await?;
        }
        Ok(())
    }

    fn custody_key_date_of(event: &Event, type_code: &str) -> ConvictionResult<Option<CustodyKeyDate>> {
        let custody = event
            .custody()
            .ok_or(ConvictionError::CustodyNotFound(event.event_id))?;
        Ok(custody.key_date(type_code).map(CustodyKeyDate::from))
    }

    fn custody_key_dates_of(event: &Event) -> ConvictionResult<Vec<CustodyKeyDate>> {
        let custody = event
            .custody()
            .ok_or(ConvictionError::CustodyNotFound(event.event_id))?;
        Ok(custody.key_dates.iter().map(CustodyKeyDate::from).collect())
    }

    fn custody_dto_of(event: &Event) -> ConvictionResult<CustodyDto> {
        let custody = event
            .custody()
            .ok_or(ConvictionError::CustodyNotFound(event.event_id))?;
        Ok(CustodyDto::of(custody, event.disposal.as_ref().map(|d| d.start_date)))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::domain::dto::convictions::CourtAppearanceRequest;
    use crate::repositories::in_memory::{seed, InMemoryStore};

    struct Fixture {
        store: Arc<InMemoryStore>,
        service: ConvictionService,
    }

    fn fixture_with(features: FeatureConfig) -> Fixture {
        let store = Arc::new(seed::seeded_store().unwrap());
        let lookup = Arc::new(LookupService::new(store.clone(), &features));
        let service = ConvictionService::new(
            store.clone(),
            store.clone(),
            lookup,
            Arc::new(SpgNotificationService::new(store.clone())),
            Arc::new(IapsNotificationService::new(store.clone())),
            features,
        );
        Fixture { store, service }
    }

    fn fixture() -> Fixture {
        fixture_with(FeatureConfig::default())
    }

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    fn key_date_request(value: &str) -> CreateCustodyKeyDate {
        CreateCustodyKeyDate { date: date(value) }
    }

    async fn stored_event(store: &InMemoryStore, event_id: i64) -> Event {
        EventRepository::find_by_id(store, event_id).await.unwrap().unwrap()
    }

    #[actix_web::test]
    async fn test_adds_key_date_and_notifies_crcs() {
        let f = fixture();

        let created = f
            .service
            .add_or_replace_custody_key_date_by_offender_id(
                seed::OFFENDER_ID,
                "POM1",
                key_date_request("2030-01-01"),
                seed::ACTING_USERNAME,
            )
            .await
            .unwrap();

        assert_eq!(created.key_date_type.code, "POM1");
        assert_eq!(created.key_date_type.description, "POM Handover expected start date");
        assert_eq!(created.date, date("2030-01-01"));

        let event = stored_event(&f.store, seed::CUSTODIAL_EVENT_ID).await;
        let key_date = event.custody().unwrap().key_date("POM1").unwrap();
        assert_eq!(key_date.created_by_user_id, seed::ACTING_USER_ID);

        let codes: Vec<String> = f
            .store
            .spg_notifications()
            .unwrap()
            .into_iter()
            .map(|n| n.business_interaction_code)
            .collect();
        assert_eq!(codes, vec!["OFFU", "CKDI"]);
        assert!(f.store.iaps_notifications().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_replaces_existing_key_date() {
        let f = fixture();

        f.service
            .add_or_replace_custody_key_date_by_conviction_id(
                seed::CUSTODIAL_EVENT_ID,
                "LED",
                key_date_request("2031-03-03"),
                "unknown.user",
            )
            .await
            .unwrap();

        let event = stored_event(&f.store, seed::CUSTODIAL_EVENT_ID).await;
        let custody = event.custody().unwrap();
        assert_eq!(custody.key_dates.len(), 1);
        let led = custody.key_date("LED").unwrap();
        assert_eq!(led.key_date, date("2031-03-03"));
        assert_eq!(led.last_updated_user_id, FeatureConfig::default().system_user_id);
        assert_eq!(f.store.spg_notifications().unwrap()[1].business_interaction_code, "CKDU");
    }

    #[actix_web::test]
    async fn test_sentence_expiry_notifies_iaps() {
        let f = fixture();

        f.service
            .add_or_replace_custody_key_date_by_offender_id(
                seed::OFFENDER_ID,
                "SED",
                key_date_request("2029-06-30"),
                seed::ACTING_USERNAME,
            )
            .await
            .unwrap();
        f.service
            .delete_custody_key_date_by_offender_id(seed::OFFENDER_ID, "SED")
            .await
            .unwrap();

        assert_eq!(f.store.iaps_notifications().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_unknown_key_date_type_is_rejected() {
        let f = fixture();

        let result = f
            .service
            .add_or_replace_custody_key_date_by_offender_id(
                seed::OFFENDER_ID,
                "XXX",
                key_date_request("2030-01-01"),
                seed::ACTING_USERNAME,
            )
            .await;

        assert!(matches!(result, Err(ConvictionError::CustodyTypeCodeIsNotValid(code)) if code == "XXX"));
    }

    #[actix_web::test]
    async fn test_offender_without_single_custodial_event_is_rejected() {
        let f = fixture();

        let none = f
            .service
            .get_custody_key_dates_by_offender_id(seed::OFFENDER_WITHOUT_EVENTS_ID)
            .await;
        assert!(matches!(
            none,
            Err(ConvictionError::SingleActiveCustodyConvictionNotFound { count: 0, .. })
        ));

        let two = f
            .service
            .get_custody_key_dates_by_offender_id(seed::DUPLICATE_CUSTODY_OFFENDER_ID)
            .await;
        assert!(matches!(
            two,
            Err(ConvictionError::SingleActiveCustodyConvictionNotFound { count: 2, .. })
        ));
    }

    #[actix_web::test]
    async fn test_deleting_missing_key_date_is_a_no_op() {
        let f = fixture();

        f.service
            .delete_custody_key_date_by_conviction_id(seed::CUSTODIAL_EVENT_ID, "POM2")
            .await
            .unwrap();

        assert!(f.store.spg_notifications().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_conviction_without_custody_is_not_found() {
        let f = fixture();

        let result = f
            .service
            .get_custody_key_dates_by_conviction_id(seed::COMMUNITY_EVENT_ID)
            .await;

        assert!(matches!(result, Err(ConvictionError::CustodyNotFound(id)) if id == seed::COMMUNITY_EVENT_ID));
    }

    #[actix_web::test]
    async fn test_booking_number_lookup_ignores_deleted_events() {
        let f = fixture();

        let id = f
            .service
            .get_conviction_id_by_prison_booking_number(seed::PRISON_BOOKING_NUMBER)
            .await
            .unwrap();
        assert_eq!(id, Some(seed::CUSTODIAL_EVENT_ID));

        let duplicate = f
            .service
            .get_conviction_id_by_prison_booking_number(seed::DUPLICATE_BOOKING_NUMBER)
            .await;
        assert!(matches!(duplicate, Err(ConvictionError::DuplicateConvictionsForBookingNumber(2))));

        assert_eq!(
            f.service.get_conviction_id_by_prison_booking_number("NOPE").await.unwrap(),
            None
        );
    }

    #[actix_web::test]
    async fn test_sentence_date_match_is_lenient() {
        let f = fixture();

        let within = f
            .service
            .get_single_active_conviction_by_offender_id_and_close_to_sentence_date(seed::OFFENDER_ID, date("2019-09-11"))
            .await
            .unwrap();
        assert_eq!(within.map(|e| e.event_id), Some(seed::CUSTODIAL_EVENT_ID));

        let outside = f
            .service
            .get_single_active_conviction_by_offender_id_and_close_to_sentence_date(seed::OFFENDER_ID, date("2019-09-12"))
            .await
            .unwrap();
        assert!(outside.is_none());

        let duplicates = f
            .service
            .get_single_active_conviction_by_offender_id_and_close_to_sentence_date(
                seed::DUPLICATE_CUSTODY_OFFENDER_ID,
                date("2020-03-03"),
            )
            .await;
        assert!(matches!(duplicates, Err(ConvictionError::DuplicateConvictionsForSentenceDate(2))));
    }

    #[actix_web::test]
    async fn test_replace_key_dates_adds_updates_and_deletes() {
        let f = fixture();
        let request = ReplaceCustodyKeyDates {
            booking_number: Some(seed::PRISON_BOOKING_NUMBER.to_string()),
            sentence_expiry_date: Some(date("2030-12-31")),
            conditional_release_date: Some(date("2025-06-01")),
            ..Default::default()
        };

        let custody = f
            .service
            .add_or_replace_or_delete_custody_key_dates(
                seed::OFFENDER_ID,
                seed::CUSTODIAL_EVENT_ID,
                request,
                seed::ACTING_USERNAME,
            )
            .await
            .unwrap();

        let mut codes: Vec<&str> = custody.key_dates.iter().map(|kd| kd.key_date_type.code.as_str()).collect();
        codes.sort();
        assert_eq!(codes, vec!["ACR", "SED"]);
        assert_eq!(custody.sentence_start_date, Some(date(seed::CUSTODIAL_SENTENCE_START)));
        assert_eq!(f.store.iaps_notifications().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_replace_key_dates_rewrites_unchanged_dates_and_leaves_unmanaged() {
        let f = fixture();
        f.service
            .add_or_replace_custody_key_date_by_conviction_id(
                seed::CUSTODIAL_EVENT_ID,
                "POM1",
                key_date_request("2030-01-01"),
                seed::ACTING_USERNAME,
            )
            .await
            .unwrap();
        let before = f.store.spg_notifications().unwrap().len();
        let seeded_led = stored_event(&f.store, seed::CUSTODIAL_EVENT_ID)
            .await
            .custody()
            .and_then(|c| c.key_date("LED"))
            .cloned()
            .unwrap();

        let request = ReplaceCustodyKeyDates {
            licence_expiry_date: Some(seeded_led.key_date),
            ..Default::default()
        };
        let custody = f
            .service
            .add_or_replace_or_delete_custody_key_dates(
                seed::OFFENDER_ID,
                seed::CUSTODIAL_EVENT_ID,
                request,
                seed::ACTING_USERNAME,
            )
            .await
            .unwrap();

        assert_eq!(custody.key_dates.len(), 2);

        let codes: Vec<String> = f.store.spg_notifications().unwrap()[before..]
            .iter()
            .map(|n| n.business_interaction_code.clone())
            .collect();
        assert_eq!(codes, vec!["OFFU", "CKDU"]);

        let event = stored_event(&f.store, seed::CUSTODIAL_EVENT_ID).await;
        let led = event.custody().and_then(|c| c.key_date("LED")).unwrap();
        assert_eq!(led.key_date_id, seeded_led.key_date_id);
        assert_eq!(led.key_date, seeded_led.key_date);
        assert!(led.last_updated_datetime > seeded_led.last_updated_datetime);
        assert!(event.custody().and_then(|c| c.key_date("POM1")).is_some());
    }

    #[actix_web::test]
    async fn test_replace_key_dates_with_unchanged_expiry_still_updates_iaps() {
        let f = fixture();
        let request = || ReplaceCustodyKeyDates {
            licence_expiry_date: Some(date("2020-09-03")),
            sentence_expiry_date: Some(date("2030-12-31")),
            ..Default::default()
        };

        for _ in 0..2 {
            f.service
                .add_or_replace_or_delete_custody_key_dates(
                    seed::OFFENDER_ID,
                    seed::CUSTODIAL_EVENT_ID,
                    request(),
                    seed::ACTING_USERNAME,
                )
                .await
                .unwrap();
        }

        assert_eq!(f.store.iaps_notifications().unwrap().len(), 2);
        let codes: Vec<String> = f
            .store
            .spg_notifications()
            .unwrap()
            .into_iter()
            .map(|n| n.business_interaction_code)
            .filter(|c| c != "OFFU")
            .collect();
        assert_eq!(codes, vec!["CKDU", "CKDI", "CKDU", "CKDU"]);
    }

    #[actix_web::test]
    async fn test_replace_key_dates_switched_off_changes_nothing() {
        let f = fixture_with(FeatureConfig {
            update_custody_key_dates: false,
            ..FeatureConfig::default()
        });

        let custody = f
            .service
            .add_or_replace_or_delete_custody_key_dates(
                seed::OFFENDER_ID,
                seed::CUSTODIAL_EVENT_ID,
                ReplaceCustodyKeyDates::default(),
                seed::ACTING_USERNAME,
            )
            .await
            .unwrap();

        assert_eq!(custody.key_dates.len(), 1);
        assert!(f.store.spg_notifications().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_add_court_case_numbers_the_new_event() {
        let f = fixture();
        let court_case = CourtCase {
            referral_date: date("2021-04-01"),
            conviction_date: None,
            court_appearances: vec![CourtAppearanceRequest {
                appearance_date: NaiveDateTime::parse_from_str("2021-04-02 10:00", "%Y-%m-%d %H:%M").unwrap(),
                court_code: "SHEFMC".to_string(),
            }],
        };

        let conviction = f
            .service
            .add_court_case_for(seed::OFFENDER_ID, court_case, seed::ACTING_USERNAME)
            .await
            .unwrap();

        assert_eq!(conviction.index, "4");
        assert!(conviction.active);
        assert_eq!(conviction.latest_court_appearance.unwrap().court_code, "SHEFMC");

        let codes: Vec<String> = f
            .store
            .spg_notifications()
            .unwrap()
            .into_iter()
            .map(|n| n.business_interaction_code)
            .collect();
        assert_eq!(codes, vec!["OFFU", "EVTI", "CAPI"]);

        let convictions = f.service.convictions_for(seed::OFFENDER_ID).await.unwrap();
        assert_eq!(convictions.len(), 3);
        assert_eq!(convictions[0].conviction_id, conviction.conviction_id);
    }
}

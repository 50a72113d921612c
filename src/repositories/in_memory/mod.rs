//! Process-local implementations of every repository, used by the tests
//! and by `DATA_STORE=memory`. All collections sit behind one `RwLock`;
//! no guard is held across an await point.

pub mod seed;

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::core::{AppError, AppResult};
use crate::domain::entities::{
    Contact, ContactType, CustodyHistory, Event, IapsNotification, Institution, ManagementTier,
    Offender, ProbationArea, ProbationAreaRef, SpgNotification, Staff, StandardReference, User,
};
use crate::repositories::contacts::ContactRepository;
use crate::repositories::events::{stale_event, EventRepository};
use crate::repositories::ids::{sequences, IdGenerator};
use crate::repositories::notifications::{crcs_interested_in, NotificationRepository};
use crate::repositories::offenders::{OffenderRepository, TierRepository};
use crate::repositories::reference::ReferenceDataRepository;
use crate::repositories::staff::{StaffRepository, UserDirectory};

/// Generated ids start above this value so they never collide with seeded ones.
const GENERATED_ID_FLOOR: i64 = 3_000_000_000;

#[derive(Default)]
struct State {
    offenders: BTreeMap<i64, Offender>,
    events: BTreeMap<i64, Event>,
    standard_references: Vec<StandardReference>,
    contact_types: Vec<ContactType>,
    institutions: Vec<Institution>,
    probation_areas: Vec<ProbationArea>,
    users: Vec<User>,
    staff: BTreeMap<i64, Staff>,
    emails: HashMap<String, String>,
    spg_notifications: Vec<SpgNotification>,
    iaps_notifications: Vec<IapsNotification>,
    contacts: BTreeMap<i64, Contact>,
    custody_history: Vec<CustodyHistory>,
    management_tiers: Vec<ManagementTier>,
    counters: HashMap<String, i64>,
}

#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|e| AppError::InternalError(format!("in-memory store poisoned: {}", e)))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|e| AppError::InternalError(format!("in-memory store poisoned: {}", e)))
    }

    pub fn insert_offender(&self, offender: Offender) -> AppResult<()> {
        self.write()?.offenders.insert(offender.offender_id, offender);
        Ok(())
    }

    pub fn insert_event(&self, event: Event) -> AppResult<()> {
        self.write()?.events.insert(event.event_id, event);
        Ok(())
    }

    pub fn insert_standard_reference(&self, reference: StandardReference) -> AppResult<()> {
        self.write()?.standard_references.push(reference);
        Ok(())
    }

    pub fn insert_contact_type(&self, contact_type: ContactType) -> AppResult<()> {
        self.write()?.contact_types.push(contact_type);
        Ok(())
    }

    pub fn insert_institution(&self, institution: Institution) -> AppResult<()> {
        self.write()?.institutions.push(institution);
        Ok(())
    }

    pub fn insert_probation_area(&self, area: ProbationArea) -> AppResult<()> {
        self.write()?.probation_areas.push(area);
        Ok(())
    }

    pub fn insert_user(&self, user: User) -> AppResult<()> {
        self.write()?.users.push(user);
        Ok(())
    }

    pub fn insert_staff(&self, staff: Staff) -> AppResult<()> {
        self.write()?.staff.insert(staff.staff_id, staff);
        Ok(())
    }

    pub fn insert_email(&self, username: &str, email: &str) -> AppResult<()> {
        self.write()?.emails.insert(username.to_string(), email.to_string());
        Ok(())
    }

    pub fn insert_contact(&self, contact: Contact) -> AppResult<()> {
        self.write()?.contacts.insert(contact.contact_id, contact);
        Ok(())
    }

    pub fn spg_notifications(&self) -> AppResult<Vec<SpgNotification>> {
        Ok(self.read()?.spg_notifications.clone())
    }

    pub fn iaps_notifications(&self) -> AppResult<Vec<IapsNotification>> {
        Ok(self.read()?.iaps_notifications.clone())
    }

    pub fn custody_history(&self) -> AppResult<Vec<CustodyHistory>> {
        Ok(self.read()?.custody_history.clone())
    }

    pub fn management_tiers(&self) -> AppResult<Vec<ManagementTier>> {
        Ok(self.read()?.management_tiers.clone())
    }
}

fn newest_referral_first(mut events: Vec<Event>) -> Vec<Event> {
    events.sort_by(|a, b| b.referral_date.cmp(&a.referral_date));
    events
}

#[async_trait]
impl IdGenerator for InMemoryStore {
    async fn next_id(&self, sequence: &str) -> AppResult<i64> {
        let mut state = self.write()?;
        let counter = state
            .counters
            .entry(sequence.to_string())
            .or_insert(GENERATED_ID_FLOOR);
        *counter += 1;
        Ok(*counter)
    }
}

#[async_trait]
impl OffenderRepository for InMemoryStore {
    async fn find_by_offender_id(&self, offender_id: i64) -> AppResult<Option<Offender>> {
        Ok(self
            .read()?
            .offenders
            .get(&offender_id)
            .filter(|o| !o.soft_deleted)
            .cloned())
    }

    async fn find_by_crn(&self, crn: &str) -> AppResult<Option<Offender>> {
        Ok(self
            .read()?
            .offenders
            .values()
            .find(|o| !o.soft_deleted && o.crn == crn)
            .cloned())
    }

    async fn find_by_noms_number(&self, noms_number: &str) -> AppResult<Option<Offender>> {
        Ok(self
            .read()?
            .offenders
            .values()
            .find(|o| !o.soft_deleted && o.noms_number.as_deref() == Some(noms_number))
            .cloned())
    }

    async fn find_managed_by_staff(&self, staff_id: i64) -> AppResult<Vec<Offender>> {
        let mut managed: Vec<Offender> = self
            .read()?
            .offenders
            .values()
            .filter(|o| !o.soft_deleted)
            .filter(|o| {
                o.offender_managers.iter().any(|om| om.staff.staff_id == staff_id)
                    || o.prison_offender_managers.iter().any(|pom| pom.staff.staff_id == staff_id)
            })
            .cloned()
            .collect();
        managed.sort_by(|a, b| a.surname.cmp(&b.surname));
        Ok(managed)
    }

    async fn save(&self, offender: &Offender) -> AppResult<()> {
        self.insert_offender(offender.clone())
    }
}

#[async_trait]
impl TierRepository for InMemoryStore {
    async fn save(&self, tier: &ManagementTier) -> AppResult<()> {
        self.write()?.management_tiers.push(tier.clone());
        Ok(())
    }
}

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn find_by_id(&self, event_id: i64) -> AppResult<Option<Event>> {
        Ok(self.read()?.events.get(&event_id).cloned())
    }

    async fn find_by_offender_id(&self, offender_id: i64) -> AppResult<Vec<Event>> {
        let events = self
            .read()?
            .events
            .values()
            .filter(|e| e.offender_id == offender_id)
            .cloned()
            .collect();
        Ok(newest_referral_first(events))
    }

    async fn find_by_prison_booking_number(&self, booking_number: &str) -> AppResult<Vec<Event>> {
        let events = self
            .read()?
            .events
            .values()
            .filter(|e| !e.soft_deleted && e.prison_booking_number() == Some(booking_number))
            .cloned()
            .collect();
        Ok(newest_referral_first(events))
    }

    async fn find_by_offender_id_and_prison_booking_number(
        &self,
        offender_id: i64,
        booking_number: &str,
    ) -> AppResult<Vec<Event>> {
        let events = self
            .read()?
            .events
            .values()
            .filter(|e| {
                e.offender_id == offender_id
                    && !e.soft_deleted
                    && e.prison_booking_number() == Some(booking_number)
            })
            .cloned()
            .collect();
        Ok(newest_referral_first(events))
    }

    async fn find_by_offender_id_with_custody(&self, offender_id: i64) -> AppResult<Vec<Event>> {
        let events = self
            .read()?
            .events
            .values()
            .filter(|e| e.offender_id == offender_id && !e.soft_deleted && e.has_custody())
            .cloned()
            .collect();
        Ok(newest_referral_first(events))
    }

    async fn count_by_offender_id(&self, offender_id: i64) -> AppResult<u64> {
        Ok(self
            .read()?
            .events
            .values()
            .filter(|e| e.offender_id == offender_id)
            .count() as u64)
    }

    async fn save(&self, event: &mut Event) -> AppResult<()> {
        let mut state = self.write()?;
        let stored_version = state.events.get(&event.event_id).map_or(0, |e| e.version);
        if stored_version != event.version {
            return Err(stale_event(event.event_id));
        }

        event.version += 1;
        state.events.insert(event.event_id, event.clone());
        Ok(())
    }
}

#[async_trait]
impl ReferenceDataRepository for InMemoryStore {
    async fn find_standard_reference(&self, code_set: &str, code: &str) -> AppResult<Option<StandardReference>> {
        Ok(self
            .read()?
            .standard_references
            .iter()
            .find(|r| r.code_set_name == code_set && r.code_value == code)
            .cloned())
    }

    async fn find_contact_type(&self, code: &str) -> AppResult<Option<ContactType>> {
        Ok(self.read()?.contact_types.iter().find(|t| t.code == code).cloned())
    }

    async fn find_institution_by_noms_code(&self, noms_code: &str) -> AppResult<Option<Institution>> {
        Ok(self
            .read()?
            .institutions
            .iter()
            .find(|i| i.establishment && i.noms_prison_institution_code.as_deref() == Some(noms_code))
            .cloned())
    }

    async fn find_probation_area_by_code(&self, code: &str) -> AppResult<Option<ProbationArea>> {
        Ok(self.read()?.probation_areas.iter().find(|a| a.code == code).cloned())
    }

    async fn find_probation_area_by_institution(&self, institution_id: i64) -> AppResult<Option<ProbationArea>> {
        Ok(self
            .read()?
            .probation_areas
            .iter()
            .find(|a| a.institution_id == Some(institution_id))
            .cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .read()?
            .users
            .iter()
            .find(|u| u.distinguished_name == username)
            .cloned())
    }
}

#[async_trait]
impl StaffRepository for InMemoryStore {
    async fn find_by_staff_id(&self, staff_id: i64) -> AppResult<Option<Staff>> {
        Ok(self.read()?.staff.get(&staff_id).cloned())
    }

    async fn find_by_officer_code(&self, officer_code: &str) -> AppResult<Option<Staff>> {
        Ok(self.read()?.staff.values().find(|s| s.officer_code == officer_code).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Staff>> {
        Ok(self
            .read()?
            .staff
            .values()
            .find(|s| s.username.as_deref() == Some(username))
            .cloned())
    }

    async fn find_by_usernames(&self, usernames: &[String]) -> AppResult<Vec<Staff>> {
        Ok(self
            .read()?
            .staff
            .values()
            .filter(|s| s.username.as_ref().is_some_and(|u| usernames.contains(u)))
            .cloned()
            .collect())
    }

    async fn find_by_surname_and_forename_in_area(
        &self,
        surname: &str,
        forename: &str,
        probation_area_code: &str,
    ) -> AppResult<Option<Staff>> {
        Ok(self
            .read()?
            .staff
            .values()
            .find(|s| {
                s.surname == surname && s.forename == forename && s.probation_area.code == probation_area_code
            })
            .cloned())
    }

    async fn officer_codes_starting_with(&self, prefix: &str) -> AppResult<Vec<String>> {
        Ok(self
            .read()?
            .staff
            .values()
            .filter(|s| s.officer_code.starts_with(prefix))
            .map(|s| s.officer_code.clone())
            .collect())
    }

    async fn save(&self, staff: &Staff) -> AppResult<()> {
        self.insert_staff(staff.clone())
    }
}

#[async_trait]
impl UserDirectory for InMemoryStore {
    async fn email(&self, username: &str) -> AppResult<Option<String>> {
        Ok(self.read()?.emails.get(username).cloned())
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn interested_crcs(&self, offender_id: i64) -> AppResult<Vec<ProbationAreaRef>> {
        Ok(self
            .read()?
            .offenders
            .get(&offender_id)
            .map(crcs_interested_in)
            .unwrap_or_default())
    }

    async fn next_control_sequence(&self) -> AppResult<i64> {
        self.next_id(sequences::SPG_CONTROL).await
    }

    async fn save_spg_notifications(&self, notifications: Vec<SpgNotification>) -> AppResult<()> {
        self.write()?.spg_notifications.extend(notifications);
        Ok(())
    }

    async fn save_iaps_notification(&self, notification: &IapsNotification) -> AppResult<()> {
        self.write()?.iaps_notifications.push(notification.clone());
        Ok(())
    }
}

#[async_trait]
impl ContactRepository for InMemoryStore {
    async fn find_by_offender_id(&self, offender_id: i64) -> AppResult<Vec<Contact>> {
        let mut contacts: Vec<Contact> = self
            .read()?
            .contacts
            .values()
            .filter(|c| c.offender_id == offender_id)
            .cloned()
            .collect();
        contacts.sort_by(|a, b| b.contact_start().cmp(&a.contact_start()));
        Ok(contacts)
    }

    async fn save(&self, contact: &Contact) -> AppResult<()> {
        self.insert_contact(contact.clone())
    }

    async fn save_custody_history(&self, history: &CustodyHistory) -> AppResult<()> {
        self.write()?.custody_history.push(history.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::staff::StaffRepository;

    #[actix_web::test]
    async fn test_ids_are_sequential_per_sequence() {
        let store = InMemoryStore::new();

        assert_eq!(store.next_id("event").await.unwrap(), GENERATED_ID_FLOOR + 1);
        assert_eq!(store.next_id("event").await.unwrap(), GENERATED_ID_FLOOR + 2);
        assert_eq!(store.next_id("contact").await.unwrap(), GENERATED_ID_FLOOR + 1);
    }

    #[actix_web::test]
    async fn test_next_staff_code_increments_highest_suffix() {
        let store = seed::seeded_store().unwrap();

        assert_eq!(store.next_staff_code("N02").await.unwrap(), "N02A002");
        assert_eq!(store.next_staff_code("ZZZ").await.unwrap(), "ZZZA001");
    }

    #[actix_web::test]
    async fn test_soft_deleted_offenders_are_invisible() {
        let store = seed::seeded_store().unwrap();

        assert!(store.find_by_crn(seed::DELETED_CRN).await.unwrap().is_none());
        assert!(store.find_by_crn(seed::CRN).await.unwrap().is_some());
    }

    #[actix_web::test]
    async fn test_saving_a_stale_event_is_a_conflict() {
        let store = seed::seeded_store().unwrap();
        let mut first = store.find_by_id(seed::CUSTODIAL_EVENT_ID).await.unwrap().unwrap();
        let mut second = first.clone();

        first.in_breach = true;
        EventRepository::save(&store, &mut first).await.unwrap();
        assert_eq!(first.version, 1);

        second.event_number = "99".to_string();
        let result = EventRepository::save(&store, &mut second).await;
        assert!(matches!(result, Err(AppError::ConflictError(_))));
        assert_eq!(second.version, 0);

        let stored = store.find_by_id(seed::CUSTODIAL_EVENT_ID).await.unwrap().unwrap();
        assert!(stored.in_breach);
        assert_ne!(stored.event_number, "99");
        assert_eq!(stored.version, 1);
    }

    #[actix_web::test]
    async fn test_saving_a_reloaded_event_succeeds() {
        let store = seed::seeded_store().unwrap();
        let mut event = store.find_by_id(seed::CUSTODIAL_EVENT_ID).await.unwrap().unwrap();
        EventRepository::save(&store, &mut event).await.unwrap();

        let mut reloaded = store.find_by_id(seed::CUSTODIAL_EVENT_ID).await.unwrap().unwrap();
        reloaded.in_breach = true;
        EventRepository::save(&store, &mut reloaded).await.unwrap();
        EventRepository::save(&store, &mut reloaded).await.unwrap();

        assert_eq!(reloaded.version, 3);
    }
}

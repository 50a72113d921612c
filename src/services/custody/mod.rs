//! # Custody Service
//!
//! Prison driven custody changes.
//!
//! ## Prison to prison transfer
//!
//! ```text
//! offender by NOMS number ─► active conviction by booking number ─► prison by NOMS code
//!                                                                       │
//!               already there? ── yes ──► P2PTransferPrisonUpdateIgnored
//!                                  no
//!                                  ▼
//!   custody moved, custody history (TPL), POM reallocated, contact (ETCP),
//!   SPG notifications, P2PTransferPrisonUpdated
//! ```
//!
//! ## Booking number
//!
//! The conviction is matched on a sentence start date within a week of the
//! one supplied, and its custody takes the new booking number.

use std::sync::Arc;

use chrono::Utc;
use log::{info, warn};

use crate::core::{AppError, AppResult};
use crate::domain::dto::custody::{CustodyDto, UpdateCustody, UpdateCustodyBookingNumber};
use crate::domain::entities::{
    Contact, ContactTypeSummary, Custody, CustodyHistory, Event, Institution, Offender, PrisonOffenderManager,
    PRISON_LOCATION_CHANGE_CONTACT_TYPE, TRANSFER_TO_PRISON_HISTORY_TYPE,
};
use crate::repositories::contacts::ContactRepository;
use crate::repositories::events::EventRepository;
use crate::repositories::ids::{sequences, IdGenerator};
use crate::repositories::offenders::OffenderRepository;
use crate::services::convictions::{ConvictionError, ConvictionResult, ConvictionService};
use crate::services::lookup::LookupService;
use crate::services::notifications::SpgNotificationService;
use crate::services::staff::StaffService;
use crate::services::telemetry::{properties, TelemetryClient};
use crate::utils::date_utils::london_today;

pub struct CustodyService {
    offenders: Arc<dyn OffenderRepository>,
    events: Arc<dyn EventRepository>,
    contacts: Arc<dyn ContactRepository>,
    ids: Arc<dyn IdGenerator>,
    lookup: Arc<LookupService>,
    convictions: Arc<ConvictionService>,
    staff: Arc<StaffService>,
    spg: Arc<SpgNotificationService>,
    telemetry: Arc<dyn TelemetryClient>,
}

impl CustodyService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        offenders: Arc<dyn OffenderRepository>,
        events: Arc<dyn EventRepository>,
        contacts: Arc<dyn ContactRepository>,
        ids: Arc<dyn IdGenerator>,
        lookup: Arc<LookupService>,
        convictions: Arc<ConvictionService>,
        staff: Arc<StaffService>,
        spg: Arc<SpgNotificationService>,
        telemetry: Arc<dyn TelemetryClient>,
    ) -> Self {
        Self {
            offenders,
            events,
            contacts,
            ids,
            lookup,
            convictions,
            staff,
            spg,
            telemetry,
        }
    }

    pub fn find_custody_from_custodial_event(event: &Event) -> ConvictionResult<&Custody> {
        event
            .custody()
            .ok_or(ConvictionError::CustodyNotFound(event.event_id))
    }

    /// Moves the custody of the booking to another prison.
    pub async fn update_custody(
        &self,
        noms_number: &str,
        booking_number: &str,
        request: UpdateCustody,
        acting_user: &str,
    ) -> AppResult<CustodyDto> {
        let prison_code = request.noms_prison_institution_code.as_str();
        let track = |name: &str| {
            self.telemetry.track_event(
                name,
                properties([
                    ("offenderNo", noms_number),
                    ("bookingNumber", booking_number),
                    ("toAgency", prison_code),
                ]),
            )
        };

        let Some(mut offender) = self.offenders.find_by_noms_number(noms_number).await? else {
            track("P2PTransferOffenderNotFound");
            return Err(AppError::NotFound(format!(
                "Offender with NOMS number {} not found",
                noms_number
            )));
        };

        let found = self
            .convictions
            .get_single_active_conviction_by_offender_id_and_prison_booking_number(offender.offender_id, booking_number)
            .await;
        let mut event = match found {
            Ok(Some(event)) => event,
            Ok(None) => {
                track("P2PTransferBookingNumberNotFound");
                return Err(AppError::NotFound(format!(
                    "Conviction with bookingNumber {} not found",
                    booking_number
                )));
            }
            Err(error @ ConvictionError::DuplicateConvictionsForBookingNumber(_)) => {
                track("P2PTransferBookingNumberHasDuplicates");
                return Err(error.into());
            }
            Err(error) => return Err(error.into()),
        };

        let Some(institution) = self.lookup.institution_by_noms_code(prison_code).await? else {
            track("P2PTransferPrisonNotFound");
            return Err(AppError::NotFound(format!(
                "Prison institution with code {} not found",
                prison_code
            )));
        };

        if Self::find_custody_from_custodial_event(&event)?.is_at(&institution) {
            warn!(
                "Custody of booking {} is already at {}, ignoring transfer",
                booking_number, prison_code
            );
            track("P2PTransferPrisonUpdateIgnored");
            return Ok(Self::custody_dto_of(&event)?);
        }

        let user_id = self.lookup.user_id_for(acting_user).await?;
        let today = london_today();
        let now = Utc::now().naive_utc();

        let custody_id = {
            let event_id = event.event_id;
            let custody = event
                .custody_mut()
                .ok_or(ConvictionError::CustodyNotFound(event_id))?;
            custody.institution = Some(institution.clone());
            custody.location_change_date = Some(today);
            custody.last_updated_datetime = now;
            custody.last_updated_user_id = user_id;
            custody.custody_id
        };
        event.last_updated_datetime = now;
        self.events.save(&mut event).await?;

        self.record_custody_history(&offender, custody_id, &institution, user_id).await?;
        let pom = self.reallocate_prison_offender_manager(&mut offender, &institution).await?;
        self.record_prison_location_change(&offender, &event, &institution, &pom, user_id)
            .await?;

        self.spg.notify_update_of_custody(offender.offender_id, &event).await?;
        info!(
            "Moved custody of booking {} for {} to {}",
            booking_number, noms_number, prison_code
        );
        track("P2PTransferPrisonUpdated");

        Ok(Self::custody_dto_of(&event)?)
    }

    /// Sets the booking number on the custody whose sentence started close to the given date.
    pub async fn update_custody_booking_number(
        &self,
        noms_number: &str,
        request: UpdateCustodyBookingNumber,
        acting_user: &str,
    ) -> AppResult<CustodyDto> {
        let sentence_start_date = request.sentence_start_date.to_string();
        let track = |name: &str| {
            self.telemetry.track_event(
                name,
                properties([
                    ("offenderNo", noms_number),
                    ("bookingNumber", request.booking_number.as_str()),
                    ("sentenceStartDate", sentence_start_date.as_str()),
                ]),
            )
        };

        let Some(offender) = self.offenders.find_by_noms_number(noms_number).await? else {
            track("P2PImprisonmentStatusOffenderNotFound");
            return Err(AppError::NotFound(format!(
                "Offender with NOMS number {} not found",
                noms_number
            )));
        };

        let found = self
            .convictions
            .get_single_active_conviction_by_offender_id_and_close_to_sentence_date(
                offender.offender_id,
                request.sentence_start_date,
            )
            .await;
        let mut event = match found {
            Ok(Some(event)) => event,
            Ok(None) => {
                track("P2PImprisonmentStatusCustodialSentenceNotFound");
                return Err(AppError::NotFound(format!(
                    "Conviction with sentence start date close to {} not found",
                    request.sentence_start_date
                )));
            }
            Err(error @ ConvictionError::DuplicateConvictionsForSentenceDate(_)) => {
                track("P2PImprisonmentStatusCustodialSentenceHasDuplicates");
                return Err(error.into());
            }
            Err(error) => return Err(error.into()),
        };

        let current = Self::find_custody_from_custodial_event(&event)?
            .prisoner_number
            .clone();
        if current.as_deref() == Some(request.booking_number.as_str()) {
            track("P2PImprisonmentStatusBookingNumberAlreadySet");
            return Ok(Self::custody_dto_of(&event)?);
        }

        let user_id = self.lookup.user_id_for(acting_user).await?;
        let now = Utc::now().naive_utc();
        {
            let event_id = event.event_id;
            let custody = event
                .custody_mut()
                .ok_or(ConvictionError::CustodyNotFound(event_id))?;
            custody.prisoner_number = Some(request.booking_number.clone());
            custody.last_updated_datetime = now;
            custody.last_updated_user_id = user_id;
        }
        event.last_updated_datetime = now;
        self.events.save(&mut event).await?;

        self.spg.notify_update_of_custody(offender.offender_id, &event).await?;
        info!(
            "Booking number of event {} for {} set to {}",
            event.event_id, noms_number, request.booking_number
        );
        track("P2PImprisonmentStatusBookingNumberUpdated");

        Ok(Self::custody_dto_of(&event)?)
    }

    async fn record_custody_history(
        &self,
        offender: &Offender,
        custody_id: i64,
        institution: &Institution,
        user_id: i64,
    ) -> AppResult<()> {
        let history_type = self
            .lookup
            .custody_history_type(TRANSFER_TO_PRISON_HISTORY_TYPE)
            .await?
            .ok_or_else(|| missing_reference("custody history type", TRANSFER_TO_PRISON_HISTORY_TYPE))?;

        self.contacts
            .save_custody_history(&CustodyHistory {
                custody_history_id: self.ids.next_id(sequences::CUSTODY_HISTORY).await?,
                offender_id: offender.offender_id,
                custody_id,
                historical_date: london_today(),
                history_type,
                detail: institution.description.clone(),
                created_by_user_id: user_id,
            })
            .await
    }

    /// Ends the active POM allocations and hands the offender to the new prison's unallocated staff.
    async fn reallocate_prison_offender_manager(
        &self,
        offender: &mut Offender,
        institution: &Institution,
    ) -> AppResult<PrisonOffenderManager> {
        let area = self
            .lookup
            .probation_area_for_institution(institution)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Probation area for institution {} not found", institution.code))
            })?;
        let staff = self.staff.find_or_create_unallocated_staff(&area).await?;
        let allocation_reason = self.lookup.transfer_allocation_reason().await?;
        let today = london_today();
        let now = Utc::now().naive_utc();

        let mut responsible_officer = false;
        for pom in offender
            .prison_offender_managers
            .iter_mut()
            .filter(|pom| pom.is_active())
        {
            responsible_officer |= pom.responsible_officer;
            pom.active_flag = false;
            pom.responsible_officer = false;
            pom.end_date = Some(today);
            pom.last_updated_datetime = now;
        }

        let pom = PrisonOffenderManager {
            prison_offender_manager_id: self.ids.next_id(sequences::PRISON_OFFENDER_MANAGER).await?,
            staff: staff.summary(),
            team: staff.teams.first().cloned(),
            probation_area: area.summary(),
            allocation_date: today,
            end_date: None,
            active_flag: true,
            soft_deleted: false,
            responsible_officer,
            allocation_reason,
            last_updated_datetime: now,
        };
        offender.prison_offender_managers.push(pom.clone());
        self.offenders.save(offender).await?;

        Ok(pom)
    }

    async fn record_prison_location_change(
        &self,
        offender: &Offender,
        event: &Event,
        institution: &Institution,
        pom: &PrisonOffenderManager,
        user_id: i64,
    ) -> AppResult<()> {
        let contact_type = self
            .lookup
            .contact_type(PRISON_LOCATION_CHANGE_CONTACT_TYPE)
            .await?
            .ok_or_else(|| missing_reference("contact type", PRISON_LOCATION_CHANGE_CONTACT_TYPE))?;

        self.contacts
            .save(&Contact {
                contact_id: self.ids.next_id(sequences::CONTACT).await?,
                offender_id: offender.offender_id,
                event_id: Some(event.event_id),
                contact_type: ContactTypeSummary {
                    code: contact_type.code,
                    description: contact_type.description,
                    attendance_contact: contact_type.attendance_contact,
                },
                contact_date: london_today(),
                contact_start_time: None,
                contact_end_time: None,
                notes: Some(format!("Custodial Establishment: {}", institution.description)),
                staff: Some(pom.staff.clone()),
                created_datetime: Utc::now().naive_utc(),
                created_by_user_id: user_id,
            })
            .await
    }

    fn custody_dto_of(event: &Event) -> ConvictionResult<CustodyDto> {
        let custody = Self::find_custody_from_custodial_event(event)?;
        Ok(CustodyDto::of(custody, event.disposal.as_ref().map(|d| d.start_date)))
    }
}

fn missing_reference(kind: &str, code: &str) -> AppError {
    AppError::InternalError(format!("{} {} is not configured", kind, code))
}

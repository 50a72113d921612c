//! Fixture data for the in-memory store.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::core::{AppError, AppResult};
use crate::domain::entities::*;

use super::InMemoryStore;

pub const OFFENDER_ID: i64 = 2_500_343_964;
pub const CRN: &str = "X320741";
pub const NOMS_NUMBER: &str = "G9542VP";
pub const PRISON_BOOKING_NUMBER: &str = "V74111";
pub const CUSTODIAL_EVENT_ID: i64 = 2_500_295_343;
pub const CUSTODIAL_SENTENCE_START: &str = "2019-09-04";
pub const COMMUNITY_EVENT_ID: i64 = 2_500_295_344;
pub const COMMUNITY_SENTENCE_ID: i64 = 2_500_291_600;
pub const RAR_REQUIREMENT_ID: i64 = 2_500_199_144;
pub const CRC_CODE: &str = "C17";

pub const OFFENDER_WITHOUT_EVENTS_ID: i64 = 31;
pub const OFFENDER_WITHOUT_EVENTS_CRN: &str = "CRN31";
pub const OFFENDER_WITHOUT_EVENTS_NOMS_NUMBER: &str = "A1234AA";

pub const DUPLICATE_CUSTODY_OFFENDER_ID: i64 = 2_500_343_965;
pub const DUPLICATE_CUSTODY_CRN: &str = "X320742";
pub const DUPLICATE_CUSTODY_NOMS_NUMBER: &str = "G3636DD";
pub const DUPLICATE_BOOKING_NUMBER: &str = "V74999";

pub const DELETED_CRN: &str = "X320743";

pub const STAFF_CODE: &str = "SH0001";
pub const STAFF_USERNAME: &str = "SheilaHancockNPS";
pub const STAFF_EMAIL: &str = "sheila.hancock@justice.gov.uk";
pub const ACTING_USERNAME: &str = "bobby.davro";
pub const ACTING_USER_ID: i64 = 2_500_000_101;

pub const CURRENT_PRISON: &str = "WWI";
pub const TRANSFER_PRISON: &str = "MDI";

/// Builds an in-memory store holding the full fixture set.
pub fn seeded_store() -> AppResult<InMemoryStore> {
    let store = InMemoryStore::new();
    seed(&store)?;
    Ok(store)
}

pub fn seed(store: &InMemoryStore) -> AppResult<()> {
    for reference in standard_references() {
        store.insert_standard_reference(reference)?;
    }
    for contact_type in contact_types() {
        store.insert_contact_type(contact_type)?;
    }
    for institution in [wandsworth(), moorland()] {
        store.insert_institution(institution)?;
    }
    for area in probation_areas() {
        store.insert_probation_area(area)?;
    }
    for staff in staff() {
        store.insert_staff(staff)?;
    }

    store.insert_user(User {
        user_id: ACTING_USER_ID,
        distinguished_name: ACTING_USERNAME.to_string(),
        forename: "Bobby".to_string(),
        surname: "Davro".to_string(),
        staff_id: None,
    })?;
    store.insert_email(STAFF_USERNAME, STAFF_EMAIL)?;

    for offender in offenders()? {
        store.insert_offender(offender)?;
    }
    for event in events()? {
        store.insert_event(event)?;
    }
    for contact in contacts()? {
        store.insert_contact(contact)?;
    }

    log::debug!("In-memory store seeded");
    Ok(())
}

fn date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| AppError::InternalError(format!("bad seed date {}: {}", value, e)))
}

fn datetime(value: &str) -> AppResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M")
        .map_err(|e| AppError::InternalError(format!("bad seed timestamp {}: {}", value, e)))
}

fn time(value: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|e| AppError::InternalError(format!("bad seed time {}: {}", value, e)))
}

fn standard_references() -> Vec<StandardReference> {
    let mut id = 2_500_010_000;
    let mut next = |code_set: &str, code: &str, description: &str| {
        id += 1;
        StandardReference::new(id, code_set, code, description)
    };

    let mut references = vec![
        next(CUSTODY_KEY_DATE_CODE_SET, "POM1", "POM Handover expected start date"),
        next(
            CUSTODY_KEY_DATE_CODE_SET,
            "POM2",
            "RO responsibility handover from POM to OM expected date",
        ),
        next(CUSTODY_KEY_DATE_CODE_SET, "LED", "Licence Expiry Date"),
        next(CUSTODY_KEY_DATE_CODE_SET, "SED", "Sentence Expiry Date"),
        next(CUSTODY_KEY_DATE_CODE_SET, "HDE", "HDC Eligibility Date"),
        next(CUSTODY_KEY_DATE_CODE_SET, "PED", "Parole Eligibility Date"),
        next(CUSTODY_KEY_DATE_CODE_SET, "EXP", "Expected Release Date"),
        next(CUSTODY_KEY_DATE_CODE_SET, "ACR", "Automatic Conditional Release Date"),
        next(CUSTODY_KEY_DATE_CODE_SET, "PSSED", "Post Sentence Supervision End Date"),
        next(TIER_CHANGE_REASON_CODE_SET, "ATS", "Assessment - Tier"),
        next(CUSTODY_HISTORY_TYPE_CODE_SET, "TPL", "Transfer to/within Prison"),
        next(POM_ALLOCATION_REASON_CODE_SET, "AUT", "Automatic Transfer"),
        next("CUSTODY STATUS", "D", "In Custody"),
        next("GENDER", "M", "Male"),
        next("RELEASE TYPE", "ADL", "Adult Licence"),
        next("RECALL REASON", "CB", "Breach of licence conditions"),
        next("COURT APPEARANCE TYPE", "S", "Sentence"),
    ];

    for letter in ['A', 'B', 'C', 'D'] {
        for level in 0..=3 {
            let code = format!("U{}{}", letter, level);
            let description = format!("{}{}", letter, level);
            references.push(next(TIER_CODE_SET, &code, &description));
        }
    }

    references
}

fn reference(code_set: &str, code: &str) -> Option<StandardReference> {
    standard_references()
        .into_iter()
        .find(|r| r.code_set_name == code_set && r.code_value == code)
}

fn contact_types() -> Vec<ContactType> {
    vec![
        ContactType {
            contact_type_id: 2_500_020_001,
            code: PRISON_LOCATION_CHANGE_CONTACT_TYPE.to_string(),
            description: "Prison Location Change".to_string(),
            attendance_contact: false,
        },
        ContactType {
            contact_type_id: 2_500_020_002,
            code: "CRSAPT".to_string(),
            description: "Appointment with CRS Provider (NS)".to_string(),
            attendance_contact: true,
        },
        ContactType {
            contact_type_id: 2_500_020_003,
            code: "COAI".to_string(),
            description: "Initial Appointment - In office (NS)".to_string(),
            attendance_contact: true,
        },
        ContactType {
            contact_type_id: 2_500_020_004,
            code: "CMOB".to_string(),
            description: "eMail/Text to Offender".to_string(),
            attendance_contact: false,
        },
    ]
}

fn contact_type_summary(code: &str) -> Option<ContactTypeSummary> {
    contact_types()
        .into_iter()
        .find(|t| t.code == code)
        .map(|t| ContactTypeSummary {
            code: t.code,
            description: t.description,
            attendance_contact: t.attendance_contact,
        })
}

fn wandsworth() -> Institution {
    Institution {
        institution_id: 2_500_004_550,
        code: "WWIHMP".to_string(),
        description: "Wandsworth (HMP)".to_string(),
        institution_name: Some("HMP Wandsworth".to_string()),
        noms_prison_institution_code: Some(CURRENT_PRISON.to_string()),
        establishment: true,
        private_flag: false,
    }
}

fn moorland() -> Institution {
    Institution {
        institution_id: 2_500_004_521,
        code: "MDIHMP".to_string(),
        description: "Moorland (HMP & YOI)".to_string(),
        institution_name: Some("HMP & YOI Moorland".to_string()),
        noms_prison_institution_code: Some(TRANSFER_PRISON.to_string()),
        establishment: true,
        private_flag: false,
    }
}

fn probation_areas() -> Vec<ProbationArea> {
    vec![
        ProbationArea {
            probation_area_id: 1_500_001_001,
            code: "N02".to_string(),
            description: "NPS North East".to_string(),
            private_sector: false,
            institution_id: None,
        },
        ProbationArea {
            probation_area_id: 1_500_001_017,
            code: CRC_CODE.to_string(),
            description: "CPA South Yorkshire".to_string(),
            private_sector: true,
            institution_id: None,
        },
        ProbationArea {
            probation_area_id: 1_500_001_050,
            code: "CRS".to_string(),
            description: "Commissioned Rehabilitative Services".to_string(),
            private_sector: true,
            institution_id: None,
        },
        ProbationArea {
            probation_area_id: 2_500_001_002,
            code: CURRENT_PRISON.to_string(),
            description: "Wandsworth (HMP)".to_string(),
            private_sector: false,
            institution_id: Some(wandsworth().institution_id),
        },
        ProbationArea {
            probation_area_id: 2_500_001_003,
            code: TRANSFER_PRISON.to_string(),
            description: "Moorland (HMP & YOI)".to_string(),
            private_sector: false,
            institution_id: Some(moorland().institution_id),
        },
    ]
}

fn area(code: &str) -> Option<ProbationAreaRef> {
    probation_areas()
        .into_iter()
        .find(|a| a.code == code)
        .map(|a| a.summary())
}

fn team(code: &str, description: &str, team_id: i64) -> TeamRef {
    TeamRef {
        team_id,
        code: code.to_string(),
        description: description.to_string(),
        telephone: None,
    }
}

fn staff() -> Vec<Staff> {
    let member = |staff_id: i64,
                  officer_code: &str,
                  (forename, forename2, surname): (&str, Option<&str>, &str),
                  area_code: &str,
                  teams: Vec<TeamRef>,
                  username: Option<&str>| {
        area(area_code).map(|probation_area| Staff {
            staff_id,
            officer_code: officer_code.to_string(),
            forename: forename.to_string(),
            forename2: forename2.map(str::to_string),
            surname: surname.to_string(),
            private_sector: probation_area.private_sector,
            probation_area,
            teams,
            username: username.map(str::to_string),
        })
    };

    [
        member(
            2_500_057_541,
            STAFF_CODE,
            ("Sheila", Some("Linda"), "Hancock"),
            "N02",
            vec![team("N02T01", "OMU A", 2_500_003_001)],
            Some(STAFF_USERNAME),
        ),
        member(
            2_500_057_542,
            "N02A001",
            ("John", None, "Smith"),
            "N02",
            vec![team("N02T01", "OMU A", 2_500_003_001)],
            Some("JohnSmithNPS"),
        ),
        member(
            2_500_057_543,
            "N02ALLU",
            ("Unallocated", None, "Staff"),
            "N02",
            Vec::new(),
            None,
        ),
        member(
            2_500_057_544,
            "C17A001",
            ("Jane", None, "Doe"),
            CRC_CODE,
            vec![team("C17T01", "CRC Team", 2_500_003_017)],
            Some("JaneDoeCRC"),
        ),
        member(
            2_500_057_545,
            "WWIALLU",
            ("Unallocated", None, "Staff"),
            CURRENT_PRISON,
            Vec::new(),
            None,
        ),
        member(
            2_500_057_546,
            "CRSUATU",
            ("Unallocated", None, "Staff"),
            "CRS",
            vec![team("CRSUAT", "Unallocated", 2_500_003_050)],
            None,
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn staff_ref(officer_code: &str) -> Option<StaffRef> {
    staff()
        .into_iter()
        .find(|s| s.officer_code == officer_code)
        .map(|s| s.summary())
}

fn seed_error(what: &str) -> AppError {
    AppError::InternalError(format!("seed data is missing {}", what))
}

fn offender_manager(id: i64, officer_code: &str, allocated: &str) -> AppResult<OffenderManager> {
    let staff = staff()
        .into_iter()
        .find(|s| s.officer_code == officer_code)
        .ok_or_else(|| seed_error(officer_code))?;
    Ok(OffenderManager {
        offender_manager_id: id,
        staff: staff.summary(),
        team: staff.teams.first().cloned(),
        probation_area: staff.probation_area.clone(),
        allocation_date: date(allocated)?,
        end_date: None,
        active_flag: true,
        soft_deleted: false,
        responsible_officer: true,
    })
}

fn offender(offender_id: i64, crn: &str, noms_number: Option<&str>, names: (&str, &str), born: &str) -> AppResult<Offender> {
    Ok(Offender {
        offender_id,
        crn: crn.to_string(),
        noms_number: noms_number.map(str::to_string),
        pnc_number: None,
        first_name: names.0.to_string(),
        second_name: None,
        third_name: None,
        surname: names.1.to_string(),
        previous_surname: None,
        date_of_birth: date(born)?,
        gender: reference("GENDER", "M"),
        soft_deleted: false,
        current_disposal: false,
        current_exclusion: false,
        current_restriction: false,
        current_tier: None,
        offender_managers: Vec::new(),
        prison_offender_managers: Vec::new(),
    })
}

fn offenders() -> AppResult<Vec<Offender>> {
    let mut main = offender(OFFENDER_ID, CRN, Some(NOMS_NUMBER), ("Aadland", "Bertrand"), "1978-01-06")?;
    main.pnc_number = Some("2004/0712343H".to_string());
    main.second_name = Some("Danger".to_string());
    main.current_disposal = true;
    main.current_tier = Some("UB2".to_string());
    main.offender_managers = vec![offender_manager(2_500_100_001, "C17A001", "2019-09-04")?];
    main.prison_offender_managers = vec![PrisonOffenderManager {
        prison_offender_manager_id: 2_500_200_001,
        staff: staff_ref("WWIALLU").ok_or_else(|| seed_error("WWIALLU"))?,
        team: None,
        probation_area: area(CURRENT_PRISON).ok_or_else(|| seed_error(CURRENT_PRISON))?,
        allocation_date: date("2019-09-10")?,
        end_date: None,
        active_flag: true,
        soft_deleted: false,
        responsible_officer: false,
        allocation_reason: reference(POM_ALLOCATION_REASON_CODE_SET, "AUT"),
        last_updated_datetime: datetime("2019-09-10 09:00")?,
    }];

    let mut without_events = offender(
        OFFENDER_WITHOUT_EVENTS_ID,
        OFFENDER_WITHOUT_EVENTS_CRN,
        Some(OFFENDER_WITHOUT_EVENTS_NOMS_NUMBER),
        ("Nic", "Chapman"),
        "1985-04-17",
    )?;
    without_events.offender_managers = vec![offender_manager(2_500_100_002, STAFF_CODE, "2020-02-01")?];

    let mut duplicates = offender(
        DUPLICATE_CUSTODY_OFFENDER_ID,
        DUPLICATE_CUSTODY_CRN,
        Some(DUPLICATE_CUSTODY_NOMS_NUMBER),
        ("Ella", "Pepper"),
        "1990-11-30",
    )?;
    duplicates.current_disposal = true;
    duplicates.offender_managers = vec![offender_manager(2_500_100_003, STAFF_CODE, "2020-03-01")?];

    let mut deleted = offender(2_500_343_966, DELETED_CRN, None, ("Gone", "Away"), "1970-01-01")?;
    deleted.soft_deleted = true;

    Ok(vec![main, without_events, duplicates, deleted])
}

fn custodial_disposal_type() -> DisposalType {
    DisposalType {
        code: "SC".to_string(),
        description: "CJA - Std Determinate Custody".to_string(),
        sentence_type: "SC".to_string(),
        custodial: true,
    }
}

fn custody(custody_id: i64, booking_number: &str, updated: NaiveDateTime) -> Custody {
    Custody {
        custody_id,
        prisoner_number: Some(booking_number.to_string()),
        institution: Some(wandsworth()),
        status: reference("CUSTODY STATUS", "D"),
        location_change_date: None,
        key_dates: Vec::new(),
        releases: Vec::new(),
        last_updated_datetime: updated,
        last_updated_user_id: ACTING_USER_ID,
    }
}

fn custodial_event(
    event_id: i64,
    offender_id: i64,
    event_number: &str,
    disposal_id: i64,
    sentence_start: &str,
    custody: Custody,
) -> AppResult<Event> {
    let created = datetime("2019-09-04 12:00")?;
    Ok(Event {
        event_id,
        offender_id,
        event_number: event_number.to_string(),
        active_flag: true,
        soft_deleted: false,
        in_breach: false,
        iaps_flag: false,
        referral_date: date(sentence_start)?,
        conviction_date: Some(date(sentence_start)?),
        disposal: Some(Disposal {
            disposal_id,
            start_date: date(sentence_start)?,
            termination_date: None,
            disposal_type: Some(custodial_disposal_type()),
            length: Some(12),
            length_units: Some("Months".to_string()),
            custody: Some(custody),
            requirements: Vec::new(),
        }),
        court_appearances: Vec::new(),
        created_datetime: created,
        last_updated_datetime: created,
        version: 0,
    })
}

fn events() -> AppResult<Vec<Event>> {
    let updated = datetime("2019-09-04 12:00")?;

    let mut main_custody = custody(2_500_269_012, PRISON_BOOKING_NUMBER, updated);
    main_custody.key_dates.push(KeyDate {
        key_date_id: 2_500_400_001,
        key_date_type: reference(CUSTODY_KEY_DATE_CODE_SET, "LED").ok_or_else(|| seed_error("LED"))?,
        key_date: date("2020-09-03")?,
        created_datetime: updated,
        created_by_user_id: ACTING_USER_ID,
        last_updated_datetime: updated,
        last_updated_user_id: ACTING_USER_ID,
    });
    main_custody.releases.push(Release {
        release_id: 2_500_500_001,
        actual_release_date: datetime("2019-12-02 00:00")?,
        release_type: reference("RELEASE TYPE", "ADL"),
        institution: Some(wandsworth()),
        notes: None,
        soft_deleted: false,
        recall: Some(Recall {
            recall_id: 2_500_600_001,
            recall_date: datetime("2020-01-15 00:00")?,
            reason: reference("RECALL REASON", "CB").ok_or_else(|| seed_error("CB"))?,
            notes: Some("Failed to report".to_string()),
            soft_deleted: false,
        }),
    });

    let mut main = custodial_event(
        CUSTODIAL_EVENT_ID,
        OFFENDER_ID,
        "1",
        2_500_291_512,
        CUSTODIAL_SENTENCE_START,
        main_custody,
    )?;
    main.iaps_flag = true;
    main.court_appearances.push(CourtAppearance {
        court_appearance_id: 2_500_700_001,
        appearance_date: datetime("2019-09-04 00:00")?,
        court_code: "SHEFMC".to_string(),
        appearance_type: reference("COURT APPEARANCE TYPE", "S"),
        soft_deleted: false,
    });

    let community = Event {
        event_id: COMMUNITY_EVENT_ID,
        offender_id: OFFENDER_ID,
        event_number: "2".to_string(),
        active_flag: true,
        soft_deleted: false,
        in_breach: false,
        iaps_flag: false,
        referral_date: date("2018-05-01")?,
        conviction_date: Some(date("2018-05-20")?),
        disposal: Some(Disposal {
            disposal_id: COMMUNITY_SENTENCE_ID,
            start_date: date("2018-05-20")?,
            termination_date: None,
            disposal_type: Some(DisposalType {
                code: "SP".to_string(),
                description: "ORA Community Order".to_string(),
                sentence_type: "SP".to_string(),
                custodial: false,
            }),
            length: Some(24),
            length_units: Some("Months".to_string()),
            custody: None,
            requirements: vec![Requirement {
                requirement_id: RAR_REQUIREMENT_ID,
                type_category_code: "F".to_string(),
                description: "Rehabilitation Activity Requirement (RAR)".to_string(),
                active_flag: true,
                soft_deleted: false,
            }],
        }),
        court_appearances: Vec::new(),
        created_datetime: datetime("2018-05-01 09:00")?,
        last_updated_datetime: datetime("2018-05-20 09:00")?,
        version: 0,
    };

    let mut deleted = custodial_event(
        2_500_295_345,
        OFFENDER_ID,
        "3",
        2_500_291_513,
        "2017-01-10",
        custody(2_500_269_013, PRISON_BOOKING_NUMBER, updated),
    )?;
    deleted.soft_deleted = true;

    let first_duplicate = custodial_event(
        2_500_295_350,
        DUPLICATE_CUSTODY_OFFENDER_ID,
        "1",
        2_500_291_520,
        "2020-03-01",
        custody(2_500_269_020, DUPLICATE_BOOKING_NUMBER, updated),
    )?;
    let second_duplicate = custodial_event(
        2_500_295_351,
        DUPLICATE_CUSTODY_OFFENDER_ID,
        "2",
        2_500_291_521,
        "2020-03-05",
        custody(2_500_269_021, DUPLICATE_BOOKING_NUMBER, updated),
    )?;

    Ok(vec![main, community, deleted, first_duplicate, second_duplicate])
}

fn contacts() -> AppResult<Vec<Contact>> {
    let contact = |contact_id: i64,
                   event_id: Option<i64>,
                   type_code: &str,
                   on: &str,
                   times: Option<(&str, &str)>|
     -> AppResult<Contact> {
        let (start, end) = match times {
            Some((start, end)) => (Some(time(start)?), Some(time(end)?)),
            None => (None, None),
        };
        Ok(Contact {
            contact_id,
            offender_id: OFFENDER_ID,
            event_id,
            contact_type: contact_type_summary(type_code).ok_or_else(|| seed_error(type_code))?,
            contact_date: date(on)?,
            contact_start_time: start,
            contact_end_time: end,
            notes: None,
            staff: staff_ref("C17A001"),
            created_datetime: datetime("2020-11-01 09:00")?,
            created_by_user_id: ACTING_USER_ID,
        })
    };

    Ok(vec![
        contact(
            2_500_800_001,
            Some(COMMUNITY_EVENT_ID),
            "CRSAPT",
            "2021-02-01",
            Some(("10:00", "11:00")),
        )?,
        contact(2_500_800_002, None, "COAI", "2020-12-01", Some(("14:00", "15:00")))?,
        contact(2_500_800_003, None, "CMOB", "2020-11-20", None)?,
    ])
}

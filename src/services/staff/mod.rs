//! Staff lookups, managed caseloads and creation of staff records on demand.

use std::sync::Arc;

use log::info;

use crate::core::AppResult;
use crate::domain::dto::common::Human;
use crate::domain::dto::offenders::ManagedOffender;
use crate::domain::dto::staff::StaffDetails;
use crate::domain::entities::{Offender, ProbationArea, Staff};
use crate::repositories::ids::{sequences, IdGenerator};
use crate::repositories::offenders::OffenderRepository;
use crate::repositories::staff::{StaffRepository, UserDirectory};
use crate::utils::string_utils::{first_forename, other_forenames};

/// Suffix of the placeholder staff every area uses for unallocated cases.
const UNALLOCATED_STAFF_SUFFIX: &str = "ALLU";

pub struct StaffService {
    staff: Arc<dyn StaffRepository>,
    offenders: Arc<dyn OffenderRepository>,
    directory: Arc<dyn UserDirectory>,
    ids: Arc<dyn IdGenerator>,
}

impl StaffService {
    pub fn new(
        staff: Arc<dyn StaffRepository>,
        offenders: Arc<dyn OffenderRepository>,
        directory: Arc<dyn UserDirectory>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            staff,
            offenders,
            directory,
            ids,
        }
    }

    pub async fn get_staff_details(&self, staff_code: &str) -> AppResult<Option<StaffDetails>> {
        let staff = self.staff.find_by_officer_code(staff_code).await?;
        self.details_of(staff).await
    }

    pub async fn get_staff_details_by_username(&self, username: &str) -> AppResult<Option<StaffDetails>> {
        let staff = self.staff.find_by_username(username).await?;
        self.details_of(staff).await
    }

    pub async fn get_staff_details_by_staff_identifier(&self, staff_id: i64) -> AppResult<Option<StaffDetails>> {
        let staff = self.staff.find_by_staff_id(staff_id).await?;
        self.details_of(staff).await
    }

    /// Details of every staff member whose username is in the set. Unknown usernames are skipped.
    pub async fn get_staff_details_by_usernames(&self, usernames: &[String]) -> AppResult<Vec<StaffDetails>> {
        let staff = self.staff.find_by_usernames(usernames).await?;

        let mut details = Vec::with_capacity(staff.len());
        for member in &staff {
            details.push(StaffDetails::of(member, self.email_of(member).await?));
        }
        Ok(details)
    }

    /// `None` when the staff code is unknown. With `current` only active allocations are listed.
    pub async fn get_managed_offenders_by_staff_code(
        &self,
        staff_code: &str,
        current: bool,
    ) -> AppResult<Option<Vec<ManagedOffender>>> {
        let Some(staff) = self.staff.find_by_officer_code(staff_code).await? else {
            return Ok(None);
        };

        let offenders = self.offenders.find_managed_by_staff(staff.staff_id).await?;
        Ok(Some(
            offenders
                .iter()
                .flat_map(|offender| managed_by(&staff, offender, current))
                .collect(),
        ))
    }

    /// Staff of the area with the given name, created with the area's next free code if missing.
    pub async fn find_or_create_staff_in_area(&self, name: &Human, area: &ProbationArea) -> AppResult<Staff> {
        let forename = first_forename(&name.forenames);

        if let Some(existing) = self
            .staff
            .find_by_surname_and_forename_in_area(&name.surname, forename, &area.code)
            .await?
        {
            return Ok(existing);
        }

        let officer_code = self.staff.next_staff_code(&area.code).await?;
        let staff = Staff {
            staff_id: self.ids.next_id(sequences::STAFF).await?,
            officer_code,
            forename: forename.to_string(),
            forename2: other_forenames(&name.forenames),
            surname: name.surname.clone(),
            probation_area: area.summary(),
            private_sector: area.private_sector,
            teams: Vec::new(),
            username: None,
        };
        self.staff.save(&staff).await?;
        info!("Created staff {} in area {}", staff.officer_code, area.code);

        Ok(staff)
    }

    /// The area's `<code>ALLU` placeholder, created if missing.
    pub async fn find_or_create_unallocated_staff(&self, area: &ProbationArea) -> AppResult<Staff> {
        let officer_code = format!("{}{}", area.code, UNALLOCATED_STAFF_SUFFIX);

        if let Some(existing) = self.staff.find_by_officer_code(&officer_code).await? {
            return Ok(existing);
        }

        let staff = Staff {
            staff_id: self.ids.next_id(sequences::STAFF).await?,
            officer_code,
            forename: "Unallocated".to_string(),
            forename2: None,
            surname: "Staff".to_string(),
            probation_area: area.summary(),
            private_sector: area.private_sector,
            teams: Vec::new(),
            username: None,
        };
        self.staff.save(&staff).await?;
        info!("Created unallocated staff {}", staff.officer_code);

        Ok(staff)
    }

    async fn details_of(&self, staff: Option<Staff>) -> AppResult<Option<StaffDetails>> {
        match staff {
            Some(staff) => {
                let email = self.email_of(&staff).await?;
                Ok(Some(StaffDetails::of(&staff, email)))
            }
            None => Ok(None),
        }
    }

    async fn email_of(&self, staff: &Staff) -> AppResult<Option<String>> {
        match &staff.username {
            Some(username) => self.directory.email(username).await,
            None => Ok(None),
        }
    }
}

fn managed_by(staff: &Staff, offender: &Offender, current: bool) -> Vec<ManagedOffender> {
    let managed = |is_current_ro: bool, is_current_om: bool, is_current_pom: bool, start, end| ManagedOffender {
        staff_code: staff.officer_code.clone(),
        staff_identifier: staff.staff_id,
        offender_id: offender.offender_id,
        noms_number: offender.noms_number.clone(),
        crn_number: offender.crn.clone(),
        offender_surname: offender.surname.clone(),
        is_current_ro,
        is_current_om,
        is_current_pom,
        om_start_date: start,
        om_end_date: end,
    };

    let community = offender
        .offender_managers
        .iter()
        .filter(|om| om.staff.staff_id == staff.staff_id && !om.soft_deleted)
        .filter(|om| !current || om.is_active())
        .map(|om| {
            managed(
                om.is_active() && om.responsible_officer,
                om.is_active(),
                false,
                om.allocation_date,
                om.end_date,
            )
        });

    let prison = offender
        .prison_offender_managers
        .iter()
        .filter(|pom| pom.staff.staff_id == staff.staff_id && !pom.soft_deleted)
        .filter(|pom| !current || pom.is_active())
        .map(|pom| {
            managed(
                pom.is_active() && pom.responsible_officer,
                false,
                pom.is_active(),
                pom.allocation_date,
                pom.end_date,
            )
        });

    community.chain(prison).collect()
}

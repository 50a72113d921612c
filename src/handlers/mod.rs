//! # HTTP Handlers
//!
//! Thin adapters between actix and the services: extract the path, query
//! and body, validate, call the service from [`AppContext`] and shape the
//! response. Role checks are attached to each route with `wrap`.
//!
//! | Module | Resources |
//! |--------|-----------|
//! | [`offenders`] | summary, latest recall, offender managers |
//! | [`convictions`] | convictions and new court cases |
//! | [`key_dates`] | custody key dates by offender or booking number |
//! | [`custody`] | prison transfers, booking numbers, bulk key dates |
//! | [`appointments`] | appointments and appointment booking |
//! | [`contacts`] | contact log |
//! | [`tiers`] | management tier updates |
//! | [`staff`] | staff details and caseloads |

use serde::Deserialize;

use crate::core::{AppContext, AppError, AppResult};
use crate::services::offenders::OffenderIdentifier;

#[cfg(test)]
macro_rules! test_app {
    ($services:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($services.context.clone()))
                .configure(crate::routes::configure_all_routes),
        )
        .await
    };
}

pub mod appointments;
pub mod contacts;
pub mod convictions;
pub mod custody;
pub mod key_dates;
pub mod offenders;
pub mod staff;
pub mod tiers;

/// Path segments `{id_type}/{id}` naming an offender.
#[derive(Debug, Deserialize)]
pub struct OffenderPath {
    pub id_type: String,
    pub id: String,
}

impl OffenderPath {
    pub fn identifier(&self) -> AppResult<OffenderIdentifier> {
        offender_identifier(&self.id_type, &self.id)
    }
}

/// Maps `offenderId`, `crn` or `nomsNumber` and its value to an identifier.
pub fn offender_identifier(id_type: &str, id: &str) -> AppResult<OffenderIdentifier> {
    match id_type {
        "offenderId" => id
            .parse()
            .map(OffenderIdentifier::OffenderId)
            .map_err(|_| AppError::BadRequest(format!("{} is not a valid offenderId", id))),
        "crn" => Ok(OffenderIdentifier::Crn(id.to_string())),
        "nomsNumber" => Ok(OffenderIdentifier::NomsNumber(id.to_string())),
        other => Err(AppError::NotFound(format!("Unknown offender identifier type {}", other))),
    }
}

/// Offender id of the path, 404 when no live offender matches.
pub async fn resolve_offender_id(context: &AppContext, id_type: &str, id: &str) -> AppResult<i64> {
    let identifier = offender_identifier(id_type, id)?;
    context.offenders.require_offender_id(&identifier).await
}

#[cfg(test)]
pub mod testing {
    use actix_web::test::TestRequest;

    use crate::services::auth::token_service::testing::issue_token;

    /// Adds a bearer token for `bobby.davro` holding `roles`.
    pub fn with_roles(request: TestRequest, roles: &[&str]) -> TestRequest {
        request.insert_header(("Authorization", format!("Bearer {}", issue_token("bobby.davro", roles))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offender_identifier() {
        assert_eq!(
            offender_identifier("offenderId", "31").unwrap(),
            OffenderIdentifier::OffenderId(31)
        );
        assert_eq!(
            offender_identifier("crn", "X320741").unwrap(),
            OffenderIdentifier::Crn("X320741".to_string())
        );
        assert!(matches!(
            offender_identifier("offenderId", "abc"),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(offender_identifier("pnc", "1"), Err(AppError::NotFound(_))));
    }
}

//! Updates pushed by the prison side: transfers, booking numbers and the
//! key dates calculated for a booking.

use actix_web::{post, put, web, HttpResponse};
use serde::Deserialize;
use validator::Validate;

use crate::config::ROLE_COMMUNITY_CUSTODY_UPDATE;
use crate::core::{AppContext, AppError};
use crate::domain::dto::custody::{ReplaceCustodyKeyDates, UpdateCustody, UpdateCustodyBookingNumber};
use crate::domain::models::auth::AuthenticatedUser;
use crate::middlewares::AuthMiddleware;
use crate::services::offenders::OffenderIdentifier;

#[derive(Debug, Deserialize)]
pub struct NomsNumberPath {
    pub noms_number: String,
}

#[derive(Debug, Deserialize)]
pub struct NomsBookingPath {
    pub noms_number: String,
    pub booking_number: String,
}

#[put(
    "/offenders/nomsNumber/{noms_number}/custody/bookingNumber/{booking_number}",
    wrap = "AuthMiddleware::required_with_role(ROLE_COMMUNITY_CUSTODY_UPDATE)"
)]
pub async fn update_custody(
    context: web::Data<AppContext>,
    user: AuthenticatedUser,
    path: web::Path<NomsBookingPath>,
    payload: web::Json<UpdateCustody>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let custody = context
        .custody
        .update_custody(&path.noms_number, &path.booking_number, payload.into_inner(), &user.username)
        .await?;

    Ok(HttpResponse::Ok().json(custody))
}

#[put(
    "/offenders/nomsNumber/{noms_number}/custody/bookingNumber",
    wrap = "AuthMiddleware::required_with_role(ROLE_COMMUNITY_CUSTODY_UPDATE)"
)]
pub async fn update_custody_booking_number(
    context: web::Data<AppContext>,
    user: AuthenticatedUser,
    path: web::Path<NomsNumberPath>,
    payload: web::Json<UpdateCustodyBookingNumber>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let custody = context
        .custody
        .update_custody_booking_number(&path.noms_number, payload.into_inner(), &user.username)
        .await?;

    Ok(HttpResponse::Ok().json(custody))
}

/// Replaces the prison managed key dates of the booking. Dates missing from
/// the body are deleted.
#[post(
    "/offenders/nomsNumber/{noms_number}/bookingNumber/{booking_number}/custody/keyDates",
    wrap = "AuthMiddleware::required_with_role(ROLE_COMMUNITY_CUSTODY_UPDATE)"
)]
pub async fn replace_custody_key_dates(
    context: web::Data<AppContext>,
    user: AuthenticatedUser,
    path: web::Path<NomsBookingPath>,
    payload: web::Json<ReplaceCustodyKeyDates>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let offender_id = context
        .offenders
        .require_offender_id(&OffenderIdentifier::NomsNumber(path.noms_number.clone()))
        .await?;
    let conviction_id = context
        .convictions
        .get_single_active_conviction_id_by_offender_id_and_prison_booking_number(offender_id, &path.booking_number)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Conviction with bookingNumber {} not found for offender with nomsNumber {}",
                path.booking_number, path.noms_number
            ))
        })?;

    let custody = context
        .convictions
        .add_or_replace_or_delete_custody_key_dates(offender_id, conviction_id, payload.into_inner(), &user.username)
        .await?;

    Ok(HttpResponse::Ok().json(custody))
}

#[cfg(test)]
mod tests {
    use actix_web::test;
    use serde_json::{json, Value};

    use crate::config::{ROLE_COMMUNITY, ROLE_COMMUNITY_CUSTODY_UPDATE};
    use crate::handlers::testing::with_roles;
    use crate::repositories::in_memory::seed::{
        CUSTODIAL_SENTENCE_START, NOMS_NUMBER, PRISON_BOOKING_NUMBER, TRANSFER_PRISON,
    };
    use crate::services::testing::TestServices;

    fn put(uri: &str) -> test::TestRequest {
        with_roles(test::TestRequest::put().uri(uri), &[ROLE_COMMUNITY_CUSTODY_UPDATE])
    }

    fn key_date_codes(custody: &Value) -> Vec<String> {
        custody["keyDates"]
            .as_array()
            .unwrap()
            .iter()
            .map(|k| k["type"]["code"].as_str().unwrap().to_string())
            .collect()
    }

    #[actix_web::test]
    async fn test_prison_transfer_moves_custody() {
        let services = TestServices::new();
        let app = test_app!(services);

        let response = test::call_service(
            &app,
            put(&format!(
                "/secure/offenders/nomsNumber/{}/custody/bookingNumber/{}",
                NOMS_NUMBER, PRISON_BOOKING_NUMBER
            ))
            .set_json(json!({"nomsPrisonInstitutionCode": TRANSFER_PRISON}))
            .to_request(),
        )
        .await;

        assert_eq!(response.status(), 200);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["institution"]["nomsPrisonInstitutionCode"], TRANSFER_PRISON);
        assert!(services
            .telemetry
            .event_names()
            .contains(&"P2PTransferPrisonUpdated".to_string()));
    }

    #[actix_web::test]
    async fn test_prison_transfer_for_unknown_booking_is_not_found() {
        let services = TestServices::new();
        let app = test_app!(services);

        let response = test::call_service(
            &app,
            put(&format!("/secure/offenders/nomsNumber/{}/custody/bookingNumber/Z99999", NOMS_NUMBER))
                .set_json(json!({"nomsPrisonInstitutionCode": TRANSFER_PRISON}))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), 404);
    }

    #[actix_web::test]
    async fn test_custody_updates_need_custody_update_role() {
        let services = TestServices::new();
        let app = test_app!(services);

        let response = test::call_service(
            &app,
            with_roles(
                test::TestRequest::put().uri(&format!(
                    "/secure/offenders/nomsNumber/{}/custody/bookingNumber/{}",
                    NOMS_NUMBER, PRISON_BOOKING_NUMBER
                )),
                &[ROLE_COMMUNITY],
            )
            .set_json(json!({"nomsPrisonInstitutionCode": TRANSFER_PRISON}))
            .to_request(),
        )
        .await;

        assert_eq!(response.status(), 403);
    }

    #[actix_web::test]
    async fn test_booking_number_update() {
        let services = TestServices::new();
        let app = test_app!(services);

        let response = test::call_service(
            &app,
            put(&format!("/secure/offenders/nomsNumber/{}/custody/bookingNumber", NOMS_NUMBER))
                .set_json(json!({"sentenceStartDate": CUSTODIAL_SENTENCE_START, "bookingNumber": "44463B"}))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), 200);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["bookingNumber"], "44463B");
    }

    #[actix_web::test]
    async fn test_blank_booking_number_is_rejected() {
        let services = TestServices::new();
        let app = test_app!(services);

        let response = test::call_service(
            &app,
            put(&format!("/secure/offenders/nomsNumber/{}/custody/bookingNumber", NOMS_NUMBER))
                .set_json(json!({"sentenceStartDate": CUSTODIAL_SENTENCE_START, "bookingNumber": ""}))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), 400);
    }

    #[actix_web::test]
    async fn test_replace_key_dates_adds_and_deletes() {
        let services = TestServices::new();
        let app = test_app!(services);

        let response = test::call_service(
            &app,
            with_roles(
                test::TestRequest::post().uri(&format!(
                    "/secure/offenders/nomsNumber/{}/bookingNumber/{}/custody/keyDates",
                    NOMS_NUMBER, PRISON_BOOKING_NUMBER
                )),
                &[ROLE_COMMUNITY_CUSTODY_UPDATE],
            )
            .set_json(json!({"conditionalReleaseDate": "2030-01-01", "sentenceExpiryDate": "2031-01-01"}))
            .to_request(),
        )
        .await;

        assert_eq!(response.status(), 200);
        let body: Value = test::read_body_json(response).await;
        let codes = key_date_codes(&body);
        assert!(codes.contains(&"ACR".to_string()));
        assert!(codes.contains(&"SED".to_string()));
        assert!(!codes.contains(&"LED".to_string()));
    }

    #[actix_web::test]
    async fn test_replace_key_dates_for_unknown_booking_is_not_found() {
        let services = TestServices::new();
        let app = test_app!(services);

        let response = test::call_service(
            &app,
            with_roles(
                test::TestRequest::post().uri(&format!(
                    "/secure/offenders/nomsNumber/{}/bookingNumber/Z99999/custody/keyDates",
                    NOMS_NUMBER
                )),
                &[ROLE_COMMUNITY_CUSTODY_UPDATE],
            )
            .set_json(json!({"conditionalReleaseDate": "2030-01-01"}))
            .to_request(),
        )
        .await;

        assert_eq!(response.status(), 404);
    }
}

//! Custody key dates of the single active custodial event of an offender, or
//! of the event holding a prison booking number.

use actix_web::{delete, get, put, web, HttpResponse};
use serde::Deserialize;
use validator::Validate;

use crate::config::ROLE_COMMUNITY;
use crate::core::{AppContext, AppError};
use crate::domain::dto::custody::CreateCustodyKeyDate;
use crate::domain::models::auth::AuthenticatedUser;
use crate::handlers::{resolve_offender_id, OffenderPath};
use crate::middlewares::AuthMiddleware;
use crate::services::convictions::ConvictionError;

#[derive(Debug, Deserialize)]
pub struct OffenderKeyDatePath {
    pub id_type: String,
    pub id: String,
    pub type_code: String,
}

#[derive(Debug, Deserialize)]
pub struct BookingNumberPath {
    pub booking_number: String,
}

#[derive(Debug, Deserialize)]
pub struct BookingNumberKeyDatePath {
    pub booking_number: String,
    pub type_code: String,
}

fn key_date_not_found(type_code: &str) -> AppError {
    AppError::NotFound(format!("Key date {} not found", type_code))
}

/// Writes need exactly one active custodial event to attach the date to.
fn single_custody_event_required(error: ConvictionError) -> AppError {
    match error {
        ConvictionError::SingleActiveCustodyConvictionNotFound { offender_id, count } => AppError::BadRequest(format!(
            "Can only add a key date where offender has one active custody related event. {} has {}",
            offender_id, count
        )),
        other => other.into(),
    }
}

async fn conviction_id_of_booking_number(context: &AppContext, booking_number: &str) -> Result<i64, AppError> {
    context
        .convictions
        .get_conviction_id_by_prison_booking_number(booking_number)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Conviction with bookingNumber {} not found", booking_number)))
}

#[get(
    "/offenders/{id_type:offenderId|crn|nomsNumber}/{id}/custody/keyDates",
    wrap = "AuthMiddleware::required_with_role(ROLE_COMMUNITY)"
)]
pub async fn get_key_dates(
    context: web::Data<AppContext>,
    path: web::Path<OffenderPath>,
) -> Result<HttpResponse, AppError> {
    let offender_id = resolve_offender_id(&context, &path.id_type, &path.id).await?;
    let key_dates = context.convictions.get_custody_key_dates_by_offender_id(offender_id).await?;

    Ok(HttpResponse::Ok().json(key_dates))
}

#[get(
    "/offenders/{id_type:offenderId|crn|nomsNumber}/{id}/custody/keyDates/{type_code}",
    wrap = "AuthMiddleware::required_with_role(ROLE_COMMUNITY)"
)]
pub async fn get_key_date(
    context: web::Data<AppContext>,
    path: web::Path<OffenderKeyDatePath>,
) -> Result<HttpResponse, AppError> {
    let offender_id = resolve_offender_id(&context, &path.id_type, &path.id).await?;
    let key_date = context
        .convictions
        .get_custody_key_date_by_offender_id(offender_id, &path.type_code)
        .await?
        .ok_or_else(|| key_date_not_found(&path.type_code))?;

    Ok(HttpResponse::Ok().json(key_date))
}

#[put(
    "/offenders/{id_type:offenderId|crn|nomsNumber}/{id}/custody/keyDates/{type_code}",
    wrap = "AuthMiddleware::required_with_role(ROLE_COMMUNITY)"
)]
pub async fn put_key_date(
    context: web::Data<AppContext>,
    user: AuthenticatedUser,
    path: web::Path<OffenderKeyDatePath>,
    payload: web::Json<CreateCustodyKeyDate>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let offender_id = resolve_offender_id(&context, &path.id_type, &path.id).await?;
    let key_date = context
        .convictions
        .add_or_replace_custody_key_date_by_offender_id(offender_id, &path.type_code, payload.into_inner(), &user.username)
        .await
        .map_err(single_custody_event_required)?;

    Ok(HttpResponse::Ok().json(key_date))
}

#[delete(
    "/offenders/{id_type:offenderId|crn|nomsNumber}/{id}/custody/keyDates/{type_code}",
    wrap = "AuthMiddleware::required_with_role(ROLE_COMMUNITY)"
)]
pub async fn delete_key_date(
    context: web::Data<AppContext>,
    path: web::Path<OffenderKeyDatePath>,
) -> Result<HttpResponse, AppError> {
    let offender_id = resolve_offender_id(&context, &path.id_type, &path.id).await?;
    context
        .convictions
        .delete_custody_key_date_by_offender_id(offender_id, &path.type_code)
        .await?;

    Ok(HttpResponse::Ok().finish())
}

#[get(
    "/offenders/prisonBookingNumber/{booking_number}/custody/keyDates",
    wrap = "AuthMiddleware::required_with_role(ROLE_COMMUNITY)"
)]
pub async fn get_key_dates_by_booking_number(
    context: web::Data<AppContext>,
    path: web::Path<BookingNumberPath>,
) -> Result<HttpResponse, AppError> {
    let conviction_id = conviction_id_of_booking_number(&context, &path.booking_number).await?;
    let key_dates = context
        .convictions
        .get_custody_key_dates_by_conviction_id(conviction_id)
        .await?;

    Ok(HttpResponse::Ok().json(key_dates))
}

#[get(
    "/offenders/prisonBookingNumber/{booking_number}/custody/keyDates/{type_code}",
    wrap = "AuthMiddleware::required_with_role(ROLE_COMMUNITY)"
)]
pub async fn get_key_date_by_booking_number(
    context: web::Data<AppContext>,
    path: web::Path<BookingNumberKeyDatePath>,
) -> Result<HttpResponse, AppError> {
    let conviction_id = conviction_id_of_booking_number(&context, &path.booking_number).await?;
    let key_date = context
        .convictions
        .get_custody_key_date_by_conviction_id(conviction_id, &path.type_code)
        .await?
        .ok_or_else(|| key_date_not_found(&path.type_code))?;

    Ok(HttpResponse::Ok().json(key_date))
}

#[put(
    "/offenders/prisonBookingNumber/{booking_number}/custody/keyDates/{type_code}",
    wrap = "AuthMiddleware::required_with_role(ROLE_COMMUNITY)"
)]
pub async fn put_key_date_by_booking_number(
    context: web::Data<AppContext>,
    user: AuthenticatedUser,
    path: web::Path<BookingNumberKeyDatePath>,
    payload: web::Json<CreateCustodyKeyDate>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let conviction_id = conviction_id_of_booking_number(&context, &path.booking_number).await?;
    let key_date = context
        .convictions
        .add_or_replace_custody_key_date_by_conviction_id(
            conviction_id,
            &path.type_code,
            payload.into_inner(),
            &user.username,
        )
        .await?;

    Ok(HttpResponse::Ok().json(key_date))
}

#[delete(
    "/offenders/prisonBookingNumber/{booking_number}/custody/keyDates/{type_code}",
    wrap = "AuthMiddleware::required_with_role(ROLE_COMMUNITY)"
)]
pub async fn delete_key_date_by_booking_number(
    context: web::Data<AppContext>,
    path: web::Path<BookingNumberKeyDatePath>,
) -> Result<HttpResponse, AppError> {
    let conviction_id = conviction_id_of_booking_number(&context, &path.booking_number).await?;
    context
        .convictions
        .delete_custody_key_date_by_conviction_id(conviction_id, &path.type_code)
        .await?;

    Ok(HttpResponse::Ok().finish())
}

#[cfg(test)]
mod tests {
    use actix_web::test;
    use serde_json::{json, Value};

    use crate::config::ROLE_COMMUNITY;
    use crate::handlers::testing::with_roles;
    use crate::repositories::in_memory::seed::{
        CRN, NOMS_NUMBER, OFFENDER_ID, OFFENDER_WITHOUT_EVENTS_CRN, PRISON_BOOKING_NUMBER,
    };
    use crate::services::testing::TestServices;

    fn request(method: test::TestRequest, uri: &str) -> test::TestRequest {
        with_roles(method.uri(uri), &[ROLE_COMMUNITY])
    }

    #[actix_web::test]
    async fn test_put_get_delete_key_date_by_each_identifier() {
        let services = TestServices::new();
        let app = test_app!(services);

        for path in [
            format!("/secure/offenders/offenderId/{}", OFFENDER_ID),
            format!("/secure/offenders/crn/{}", CRN),
            format!("/secure/offenders/nomsNumber/{}", NOMS_NUMBER),
        ] {
            let uri = format!("{}/custody/keyDates/POM1", path);

            let response = test::call_service(
                &app,
                request(test::TestRequest::put(), &uri)
                    .set_json(json!({"date": "2030-01-31"}))
                    .to_request(),
            )
            .await;
            assert_eq!(response.status(), 200, "PUT {}", uri);
            let body: Value = test::read_body_json(response).await;
            assert_eq!(body["type"]["code"], "POM1");
            assert_eq!(body["date"], "2030-01-31");

            let response = test::call_service(&app, request(test::TestRequest::get(), &uri).to_request()).await;
            assert_eq!(response.status(), 200, "GET {}", uri);

            let response = test::call_service(&app, request(test::TestRequest::delete(), &uri).to_request()).await;
            assert_eq!(response.status(), 200, "DELETE {}", uri);

            let response = test::call_service(&app, request(test::TestRequest::get(), &uri).to_request()).await;
            assert_eq!(response.status(), 404, "GET after DELETE {}", uri);
        }
    }

    #[actix_web::test]
    async fn test_key_date_lists_agree_across_identifiers() {
        let services = TestServices::new();
        let app = test_app!(services);

        let response = test::call_service(
            &app,
            request(test::TestRequest::put(), &format!("/secure/offenders/crn/{}/custody/keyDates/POM1", CRN))
                .set_json(json!({"date": "2030-01-31"}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), 200);

        let mut views = Vec::new();
        for uri in [
            format!("/secure/offenders/offenderId/{}/custody/keyDates", OFFENDER_ID),
            format!("/secure/offenders/crn/{}/custody/keyDates", CRN),
            format!("/secure/offenders/nomsNumber/{}/custody/keyDates", NOMS_NUMBER),
            format!("/secure/offenders/prisonBookingNumber/{}/custody/keyDates", PRISON_BOOKING_NUMBER),
        ] {
            let response = test::call_service(&app, request(test::TestRequest::get(), &uri).to_request()).await;
            assert_eq!(response.status(), 200, "GET {}", uri);
            let body: Value = test::read_body_json(response).await;
            views.push(body);
        }

        let codes: Vec<&str> = views[0]
            .as_array()
            .unwrap()
            .iter()
            .map(|k| k["type"]["code"].as_str().unwrap())
            .collect();
        assert_eq!(codes, vec!["LED", "POM1"]);
        for view in &views[1..] {
            assert_eq!(view, &views[0]);
        }
    }

    #[actix_web::test]
    async fn test_key_dates_by_prison_booking_number() {
        let services = TestServices::new();
        let app = test_app!(services);
        let uri = format!("/secure/offenders/prisonBookingNumber/{}/custody/keyDates", PRISON_BOOKING_NUMBER);

        let response = test::call_service(
            &app,
            request(test::TestRequest::put(), &format!("{}/SED", uri))
                .set_json(json!({"date": "2031-06-30"}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), 200);

        let response = test::call_service(&app, request(test::TestRequest::get(), &uri).to_request()).await;
        assert_eq!(response.status(), 200);
        let body: Value = test::read_body_json(response).await;
        let codes: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|k| k["type"]["code"].as_str().unwrap())
            .collect();
        assert!(codes.contains(&"LED"));
        assert!(codes.contains(&"SED"));

        let response =
            test::call_service(&app, request(test::TestRequest::delete(), &format!("{}/SED", uri)).to_request()).await;
        assert_eq!(response.status(), 200);

        let response =
            test::call_service(&app, request(test::TestRequest::get(), &format!("{}/SED", uri)).to_request()).await;
        assert_eq!(response.status(), 404);
    }

    #[actix_web::test]
    async fn test_unknown_offender_or_booking_number_is_not_found() {
        let services = TestServices::new();
        let app = test_app!(services);

        for uri in [
            "/secure/offenders/offenderId/99999/custody/keyDates/POM1",
            "/secure/offenders/crn/X999999/custody/keyDates/POM1",
            "/secure/offenders/nomsNumber/Z9999ZZ/custody/keyDates/POM1",
            "/secure/offenders/prisonBookingNumber/Z99999/custody/keyDates/POM1",
        ] {
            let response = test::call_service(
                &app,
                request(test::TestRequest::put(), uri)
                    .set_json(json!({"date": "2030-01-31"}))
                    .to_request(),
            )
            .await;
            assert_eq!(response.status(), 404, "PUT {}", uri);

            let response = test::call_service(&app, request(test::TestRequest::get(), uri).to_request()).await;
            assert_eq!(response.status(), 404, "GET {}", uri);

            let response = test::call_service(&app, request(test::TestRequest::delete(), uri).to_request()).await;
            assert_eq!(response.status(), 404, "DELETE {}", uri);
        }
    }

    #[actix_web::test]
    async fn test_unknown_key_date_type_is_bad_request() {
        let services = TestServices::new();
        let app = test_app!(services);

        let response = test::call_service(
            &app,
            request(
                test::TestRequest::put(),
                &format!("/secure/offenders/crn/{}/custody/keyDates/DOESNOTEXIST", CRN),
            )
            .set_json(json!({"date": "2030-01-31"}))
            .to_request(),
        )
        .await;

        assert_eq!(response.status(), 400);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["message"], "DOESNOTEXIST is not a valid custody key date");
    }

    #[actix_web::test]
    async fn test_put_for_offender_without_custody_event_is_bad_request() {
        let services = TestServices::new();
        let app = test_app!(services);

        let response = test::call_service(
            &app,
            request(
                test::TestRequest::put(),
                &format!("/secure/offenders/crn/{}/custody/keyDates/POM1", OFFENDER_WITHOUT_EVENTS_CRN),
            )
            .set_json(json!({"date": "2030-01-31"}))
            .to_request(),
        )
        .await;

        assert_eq!(response.status(), 400);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(
            body["message"],
            "Can only add a key date where offender has one active custody related event. 31 has 0"
        );
    }

    #[actix_web::test]
    async fn test_key_dates_need_community_role() {
        let services = TestServices::new();
        let app = test_app!(services);

        let response = test::call_service(
            &app,
            with_roles(
                test::TestRequest::get().uri(&format!("/secure/offenders/crn/{}/custody/keyDates", CRN)),
                &["ROLE_SOMETHING_ELSE"],
            )
            .to_request(),
        )
        .await;

        assert_eq!(response.status(), 403);
    }
}

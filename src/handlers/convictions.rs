//! Convictions (events) of an offender.

use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use validator::Validate;

use crate::config::ROLE_COMMUNITY;
use crate::core::{AppContext, AppError};
use crate::domain::dto::convictions::CourtCase;
use crate::domain::models::auth::AuthenticatedUser;
use crate::handlers::{resolve_offender_id, OffenderPath};
use crate::middlewares::AuthMiddleware;
use crate::services::offenders::OffenderIdentifier;

#[derive(Debug, Deserialize)]
pub struct OffenderIdPath {
    pub offender_id: i64,
}

#[get(
    "/offenders/{id_type:offenderId|crn|nomsNumber}/{id}/convictions",
    wrap = "AuthMiddleware::required_with_role(ROLE_COMMUNITY)"
)]
pub async fn get_convictions(
    context: web::Data<AppContext>,
    path: web::Path<OffenderPath>,
) -> Result<HttpResponse, AppError> {
    let offender_id = resolve_offender_id(&context, &path.id_type, &path.id).await?;
    let convictions = context.convictions.convictions_for(offender_id).await?;

    Ok(HttpResponse::Ok().json(convictions))
}

/// Records a new court case as a conviction of the offender.
#[post(
    "/offenders/offenderId/{offender_id}/convictions",
    wrap = "AuthMiddleware::required_with_role(ROLE_COMMUNITY)"
)]
pub async fn add_court_case(
    context: web::Data<AppContext>,
    user: AuthenticatedUser,
    path: web::Path<OffenderIdPath>,
    payload: web::Json<CourtCase>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let offender_id = context
        .offenders
        .require_offender_id(&OffenderIdentifier::OffenderId(path.offender_id))
        .await?;
    let conviction = context
        .convictions
        .add_court_case_for(offender_id, payload.into_inner(), &user.username)
        .await?;

    Ok(HttpResponse::Created().json(conviction))
}

#[cfg(test)]
mod tests {
    use actix_web::test;
    use serde_json::{json, Value};

    use crate::config::ROLE_COMMUNITY;
    use crate::handlers::testing::with_roles;
    use crate::repositories::in_memory::seed::OFFENDER_ID;
    use crate::services::testing::TestServices;

    fn get(uri: &str) -> test::TestRequest {
        with_roles(test::TestRequest::get().uri(uri), &[ROLE_COMMUNITY])
    }

    #[actix_web::test]
    async fn test_convictions_and_new_court_case() {
        let services = TestServices::new();
        let app = test_app!(services);
        let uri = format!("/secure/offenders/offenderId/{}/convictions", OFFENDER_ID);

        let response = test::call_service(&app, get(&uri).to_request()).await;
        assert_eq!(response.status(), 200);
        let before: Value = test::read_body_json(response).await;
        let before = before.as_array().unwrap().len();

        let response = test::call_service(
            &app,
            with_roles(test::TestRequest::post().uri(&uri), &[ROLE_COMMUNITY])
                .set_json(json!({
                    "referralDate": "2021-02-01",
                    "courtAppearances": [
                        {"appearanceDate": "2021-02-10T10:00:00", "courtCode": "SHEFMC"}
                    ]
                }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), 201);

        let response = test::call_service(&app, get(&uri).to_request()).await;
        let after: Value = test::read_body_json(response).await;
        assert_eq!(after.as_array().unwrap().len(), before + 1);
    }

    #[actix_web::test]
    async fn test_court_case_without_appearances_is_rejected() {
        let services = TestServices::new();
        let app = test_app!(services);

        let response = test::call_service(
            &app,
            with_roles(
                test::TestRequest::post().uri(&format!("/secure/offenders/offenderId/{}/convictions", OFFENDER_ID)),
                &[ROLE_COMMUNITY],
            )
            .set_json(json!({"referralDate": "2021-02-01", "courtAppearances": []}))
            .to_request(),
        )
        .await;

        assert_eq!(response.status(), 400);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["error"], "validation_error");
    }
}

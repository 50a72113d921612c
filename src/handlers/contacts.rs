use actix_web::{get, web, HttpResponse};

use crate::config::ROLE_COMMUNITY;
use crate::core::{AppContext, AppError};
use crate::domain::dto::contacts::{ContactFilter, ContactFilterQuery};
use crate::handlers::{resolve_offender_id, OffenderPath};
use crate::middlewares::AuthMiddleware;

/// Contact log of the offender, filtered by `contactTypes`, `from` and `to`.
#[get(
    "/offenders/{id_type:offenderId|crn|nomsNumber}/{id}/contacts",
    wrap = "AuthMiddleware::required_with_role(ROLE_COMMUNITY)"
)]
pub async fn get_contacts(
    context: web::Data<AppContext>,
    path: web::Path<OffenderPath>,
    query: web::Query<ContactFilterQuery>,
) -> Result<HttpResponse, AppError> {
    let offender_id = resolve_offender_id(&context, &path.id_type, &path.id).await?;
    let filter = ContactFilter::from(query.into_inner());
    let contacts = context.contacts.contacts_for(offender_id, &filter).await?;

    Ok(HttpResponse::Ok().json(contacts))
}

#[cfg(test)]
mod tests {
    use actix_web::test;
    use serde_json::Value;

    use crate::config::ROLE_COMMUNITY;
    use crate::handlers::testing::with_roles;
    use crate::repositories::in_memory::seed::{CRN, OFFENDER_ID};
    use crate::services::testing::TestServices;

    async fn contact_types(uri: &str) -> Vec<String> {
        let services = TestServices::new();
        let app = test_app!(services);

        let response = test::call_service(
            &app,
            with_roles(test::TestRequest::get().uri(uri), &[ROLE_COMMUNITY]).to_request(),
        )
        .await;
        assert_eq!(response.status(), 200);

        let body: Value = test::read_body_json(response).await;
        body.as_array()
            .unwrap()
            .iter()
            .map(|c| c["type"]["code"].as_str().unwrap().to_string())
            .collect()
    }

    #[actix_web::test]
    async fn test_contacts_latest_first() {
        let types = contact_types(&format!("/secure/offenders/crn/{}/contacts", CRN)).await;

        assert_eq!(types, vec!["CRSAPT", "COAI", "CMOB"]);
    }

    #[actix_web::test]
    async fn test_contacts_filtered_by_type_and_date() {
        let types = contact_types(&format!(
            "/secure/offenders/offenderId/{}/contacts?contactTypes=COAI,CMOB&from=2020-11-25T00:00:00",
            OFFENDER_ID
        ))
        .await;

        assert_eq!(types, vec!["COAI"]);
    }
}

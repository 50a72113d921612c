//! Staff details and caseloads.

use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;

use crate::config::ROLE_COMMUNITY;
use crate::core::{AppContext, AppError};
use crate::middlewares::AuthMiddleware;

#[derive(Debug, Deserialize)]
pub struct StaffCodePath {
    pub staff_code: String,
}

#[derive(Debug, Deserialize)]
pub struct UsernamePath {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct StaffIdentifierPath {
    pub staff_identifier: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ManagedOffendersQuery {
    #[serde(default)]
    pub current: bool,
}

fn staff_code_not_found(staff_code: &str) -> AppError {
    AppError::NotFound(format!("Staff member with code {}", staff_code))
}

#[get("/staff/staffCode/{staff_code}", wrap = "AuthMiddleware::required_with_role(ROLE_COMMUNITY)")]
pub async fn get_staff_details(
    context: web::Data<AppContext>,
    path: web::Path<StaffCodePath>,
) -> Result<HttpResponse, AppError> {
    let details = context
        .staff
        .get_staff_details(&path.staff_code)
        .await?
        .ok_or_else(|| staff_code_not_found(&path.staff_code))?;

    Ok(HttpResponse::Ok().json(details))
}

/// Offenders the staff member manages. `current=true` lists only active allocations.
#[get(
    "/staff/staffCode/{staff_code}/managedOffenders",
    wrap = "AuthMiddleware::required_with_role(ROLE_COMMUNITY)"
)]
pub async fn get_managed_offenders(
    context: web::Data<AppContext>,
    path: web::Path<StaffCodePath>,
    query: web::Query<ManagedOffendersQuery>,
) -> Result<HttpResponse, AppError> {
    let managed = context
        .staff
        .get_managed_offenders_by_staff_code(&path.staff_code, query.current)
        .await?
        .ok_or_else(|| staff_code_not_found(&path.staff_code))?;

    Ok(HttpResponse::Ok().json(managed))
}

#[get("/staff/username/{username}", wrap = "AuthMiddleware::required_with_role(ROLE_COMMUNITY)")]
pub async fn get_staff_details_by_username(
    context: web::Data<AppContext>,
    path: web::Path<UsernamePath>,
) -> Result<HttpResponse, AppError> {
    let details = context
        .staff
        .get_staff_details_by_username(&path.username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Staff member with username {}", path.username)))?;

    Ok(HttpResponse::Ok().json(details))
}

#[get(
    "/staff/staffIdentifier/{staff_identifier}",
    wrap = "AuthMiddleware::required_with_role(ROLE_COMMUNITY)"
)]
pub async fn get_staff_details_by_staff_identifier(
    context: web::Data<AppContext>,
    path: web::Path<StaffIdentifierPath>,
) -> Result<HttpResponse, AppError> {
    let details = context
        .staff
        .get_staff_details_by_staff_identifier(path.staff_identifier)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Staff member with identifier {}", path.staff_identifier)))?;

    Ok(HttpResponse::Ok().json(details))
}

/// Details of each known username in the body; unknown names are left out.
#[post("/staff/list", wrap = "AuthMiddleware::required_with_role(ROLE_COMMUNITY)")]
pub async fn get_staff_details_list(
    context: web::Data<AppContext>,
    payload: web::Json<Vec<String>>,
) -> Result<HttpResponse, AppError> {
    let mut usernames = payload.into_inner();
    usernames.sort();
    usernames.dedup();

    let details = context.staff.get_staff_details_by_usernames(&usernames).await?;

    Ok(HttpResponse::Ok().json(details))
}

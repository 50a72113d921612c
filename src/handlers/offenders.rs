//! Offender summary, latest recall and offender managers.

use actix_web::{get, web, HttpResponse};

use crate::config::ROLE_COMMUNITY;
use crate::core::{AppContext, AppError};
use crate::handlers::{resolve_offender_id, OffenderPath};
use crate::middlewares::AuthMiddleware;

#[get(
    "/offenders/{id_type:offenderId|crn|nomsNumber}/{id}",
    wrap = "AuthMiddleware::required_with_role(ROLE_COMMUNITY)"
)]
pub async fn get_offender_summary(
    context: web::Data<AppContext>,
    path: web::Path<OffenderPath>,
) -> Result<HttpResponse, AppError> {
    let identifier = path.identifier()?;
    let offender = context.offenders.require(&identifier).await?;
    let summary = context
        .offenders
        .get_offender_summary(offender.offender_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Offender with {} not found", identifier)))?;

    Ok(HttpResponse::Ok().json(summary))
}

#[get(
    "/offenders/{id_type:crn|nomsNumber}/{id}/release",
    wrap = "AuthMiddleware::required_with_role(ROLE_COMMUNITY)"
)]
pub async fn get_latest_recall(
    context: web::Data<AppContext>,
    path: web::Path<OffenderPath>,
) -> Result<HttpResponse, AppError> {
    let offender_id = resolve_offender_id(&context, &path.id_type, &path.id).await?;
    let recall = context.offenders.get_offender_latest_recall(offender_id).await?;

    Ok(HttpResponse::Ok().json(recall))
}

#[get(
    "/offenders/{id_type:crn|nomsNumber}/{id}/allOffenderManagers",
    wrap = "AuthMiddleware::required_with_role(ROLE_COMMUNITY)"
)]
pub async fn get_all_offender_managers(
    context: web::Data<AppContext>,
    path: web::Path<OffenderPath>,
) -> Result<HttpResponse, AppError> {
    let offender_id = resolve_offender_id(&context, &path.id_type, &path.id).await?;
    let managers = context.offenders.all_offender_managers(offender_id).await?;

    Ok(HttpResponse::Ok().json(managers))
}

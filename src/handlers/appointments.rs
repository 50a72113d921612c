//! Appointments of an offender, and booking new ones through the Delius API.

use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use validator::Validate;

use crate::config::{ROLE_COMMUNITY, ROLE_COMMUNITY_INTERVENTIONS_UPDATE};
use crate::core::{AppContext, AppError};
use crate::domain::dto::appointments::{
    AppointmentCreateRequest, AppointmentFilter, ContextlessAppointmentCreateRequest,
};
use crate::middlewares::AuthMiddleware;
use crate::services::offenders::OffenderIdentifier;

#[derive(Debug, Deserialize)]
pub struct CrnPath {
    pub crn: String,
}

#[derive(Debug, Deserialize)]
pub struct SentencePath {
    pub crn: String,
    pub sentence_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ContextPath {
    pub crn: String,
    pub sentence_id: i64,
    pub context: String,
}

#[get(
    "/offenders/crn/{crn}/appointments",
    wrap = "AuthMiddleware::required_with_role(ROLE_COMMUNITY)"
)]
pub async fn get_appointments(
    context: web::Data<AppContext>,
    path: web::Path<CrnPath>,
    filter: web::Query<AppointmentFilter>,
) -> Result<HttpResponse, AppError> {
    let offender_id = context
        .offenders
        .require_offender_id(&OffenderIdentifier::Crn(path.crn.clone()))
        .await?;
    let appointments = context.appointments.appointments_for(offender_id, &filter).await?;

    Ok(HttpResponse::Ok().json(appointments))
}

#[post(
    "/offenders/crn/{crn}/sentence/{sentence_id}/appointments",
    wrap = "AuthMiddleware::required_with_role(ROLE_COMMUNITY_INTERVENTIONS_UPDATE)"
)]
pub async fn create_appointment(
    context: web::Data<AppContext>,
    path: web::Path<SentencePath>,
    payload: web::Json<AppointmentCreateRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let created = context
        .appointments
        .create_appointment(&path.crn, path.sentence_id, payload.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(created))
}

/// Books an appointment whose provider, team, staff and type come from the
/// named integration context.
#[post(
    "/offenders/crn/{crn}/sentence/{sentence_id}/appointments/context/{context}",
    wrap = "AuthMiddleware::required_with_role(ROLE_COMMUNITY_INTERVENTIONS_UPDATE)"
)]
pub async fn create_appointment_with_context(
    context: web::Data<AppContext>,
    path: web::Path<ContextPath>,
    payload: web::Json<ContextlessAppointmentCreateRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let created = context
        .appointments
        .create_appointment_with_context(&path.crn, path.sentence_id, &path.context, payload.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(created))
}

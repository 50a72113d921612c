use actix_web::{post, web, HttpResponse};
use serde::Deserialize;

use crate::config::ROLE_MANAGEMENT_TIER_UPDATE;
use crate::core::{AppContext, AppError};
use crate::domain::models::auth::AuthenticatedUser;
use crate::middlewares::AuthMiddleware;

#[derive(Debug, Deserialize)]
pub struct TierPath {
    pub crn: String,
    pub tier: String,
}

/// Records a new management tier calculated for the offender.
#[post(
    "/offenders/crn/{crn}/tier/{tier}",
    wrap = "AuthMiddleware::required_with_role(ROLE_MANAGEMENT_TIER_UPDATE)"
)]
pub async fn update_tier(
    context: web::Data<AppContext>,
    user: AuthenticatedUser,
    path: web::Path<TierPath>,
) -> Result<HttpResponse, AppError> {
    context.tiers.update_tier(&path.crn, &path.tier, &user.username).await?;

    Ok(HttpResponse::Ok().finish())
}

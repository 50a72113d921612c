//! Route table.
//!
//! Everything except `/health` lives under `/secure`. Each handler carries its
//! own role check (`wrap = "AuthMiddleware::required_with_role(...)"`) because
//! resources sharing the `/secure/offenders` prefix need different roles.
//!
//! ```rust,ignore
//! use actix_web::{web, App};
//!
//! let app = App::new()
//!     .app_data(web::Data::new(context))
//!     .configure(configure_all_routes);
//! ```

use actix_web::web;
use serde_json::json;

use crate::handlers;

pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check);

    cfg.service(
        web::scope("/secure")
            .configure(configure_offender_routes)
            .configure(configure_custody_routes)
            .configure(configure_appointment_routes)
            .configure(configure_staff_routes),
    );
}

/// Offender views, convictions, contacts and tiers.
fn configure_offender_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::offenders::get_offender_summary)
        .service(handlers::offenders::get_latest_recall)
        .service(handlers::offenders::get_all_offender_managers)
        .service(handlers::convictions::get_convictions)
        .service(handlers::convictions::add_court_case)
        .service(handlers::contacts::get_contacts)
        .service(handlers::tiers::update_tier);
}

/// Custody key dates and prison updates.
///
/// - `/offenders/{offenderId|crn|nomsNumber}/{id}/custody/keyDates[/{typeCode}]`
/// - `/offenders/prisonBookingNumber/{bookingNumber}/custody/keyDates[/{typeCode}]`
/// - `/offenders/nomsNumber/{nomsNumber}/custody/bookingNumber[/{bookingNumber}]`
/// - `/offenders/nomsNumber/{nomsNumber}/bookingNumber/{bookingNumber}/custody/keyDates`
fn configure_custody_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::key_dates::get_key_dates)
        .service(handlers::key_dates::get_key_date)
        .service(handlers::key_dates::put_key_date)
        .service(handlers::key_dates::delete_key_date)
        .service(handlers::key_dates::get_key_dates_by_booking_number)
        .service(handlers::key_dates::get_key_date_by_booking_number)
        .service(handlers::key_dates::put_key_date_by_booking_number)
        .service(handlers::key_dates::delete_key_date_by_booking_number)
        .service(handlers::custody::update_custody)
        .service(handlers::custody::update_custody_booking_number)
        .service(handlers::custody::replace_custody_key_dates);
}

fn configure_appointment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::appointments::get_appointments)
        .service(handlers::appointments::create_appointment)
        .service(handlers::appointments::create_appointment_with_context);
}

fn configure_staff_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::staff::get_staff_details)
        .service(handlers::staff::get_managed_offenders)
        .service(handlers::staff::get_staff_details_by_username)
        .service(handlers::staff::get_staff_details_by_staff_identifier)
        .service(handlers::staff::get_staff_details_list);
}

/// Liveness probe, no authentication.
///
/// ```bash
/// curl http://localhost:8080/health
/// ```
#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "UP",
        "service": "delius_community_api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

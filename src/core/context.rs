//! # Application Context
//!
//! Every service is built once at startup and shared through `Arc`. The
//! context is handed to actix as `web::Data<AppContext>`.
//!
//! ```text
//! Repositories ──► LookupService ──► SPG / IAPS notifications
//!                        │                    │
//!                        ▼                    ▼
//!                  ConvictionService ◄────────┘
//!                        │
//!        ┌───────────────┼───────────────┐
//!        ▼               ▼               ▼
//!  OffenderService  CustodyService  StaffService ...
//! ```
//!
//! ```rust,ignore
//! let context = AppContext::build(&repositories, Integrations { telemetry, delius_api }, settings, token_service);
//! App::new().app_data(web::Data::new(context))
//! ```

use std::sync::Arc;

use crate::config::{FeatureConfig, IntegrationContextConfig};
use crate::repositories::Repositories;
use crate::services::appointments::{AppointmentService, DeliusApiClient};
use crate::services::auth::TokenService;
use crate::services::contacts::ContactService;
use crate::services::convictions::ConvictionService;
use crate::services::custody::CustodyService;
use crate::services::lookup::LookupService;
use crate::services::notifications::{IapsNotificationService, SpgNotificationService};
use crate::services::offenders::OffenderService;
use crate::services::staff::StaffService;
use crate::services::telemetry::TelemetryClient;
use crate::services::tiers::TierService;

/// Outbound collaborators of the services.
#[derive(Clone)]
pub struct Integrations {
    pub telemetry: Arc<dyn TelemetryClient>,
    pub delius_api: Arc<dyn DeliusApiClient>,
}

/// Settings the services read.
#[derive(Debug, Clone, Default)]
pub struct ServiceSettings {
    pub features: FeatureConfig,
    pub integration_contexts: IntegrationContextConfig,
}

#[derive(Clone)]
pub struct AppContext {
    pub offenders: Arc<OffenderService>,
    pub convictions: Arc<ConvictionService>,
    pub custody: Arc<CustodyService>,
    pub staff: Arc<StaffService>,
    pub appointments: Arc<AppointmentService>,
    pub contacts: Arc<ContactService>,
    pub tiers: Arc<TierService>,
    pub token_service: Arc<TokenService>,
}

impl AppContext {
    pub fn build(
        repositories: &Repositories,
        integrations: Integrations,
        settings: ServiceSettings,
        token_service: Arc<TokenService>,
    ) -> Self {
        let r = repositories;
        let lookup = Arc::new(LookupService::new(r.reference_data.clone(), &settings.features));
        let spg = Arc::new(SpgNotificationService::new(r.notifications.clone()));
        let iaps = Arc::new(IapsNotificationService::new(r.notifications.clone()));

        let convictions = Arc::new(ConvictionService::new(
            r.events.clone(),
            r.ids.clone(),
            lookup.clone(),
            spg.clone(),
            iaps,
            settings.features.clone(),
        ));
        let staff = Arc::new(StaffService::new(
            r.staff.clone(),
            r.offenders.clone(),
            r.user_directory.clone(),
            r.ids.clone(),
        ));
        let custody = Arc::new(CustodyService::new(
            r.offenders.clone(),
            r.events.clone(),
            r.contacts.clone(),
            r.ids.clone(),
            lookup.clone(),
            convictions.clone(),
            staff.clone(),
            spg,
            integrations.telemetry.clone(),
        ));
        let offenders = Arc::new(OffenderService::new(r.offenders.clone(), convictions.clone()));
        let appointments = Arc::new(AppointmentService::new(
            r.offenders.clone(),
            r.events.clone(),
            r.contacts.clone(),
            lookup.clone(),
            integrations.delius_api,
            settings.integration_contexts,
        ));
        let contacts = Arc::new(ContactService::new(r.contacts.clone()));
        let tiers = Arc::new(TierService::new(
            r.offenders.clone(),
            r.tiers.clone(),
            lookup,
            integrations.telemetry,
        ));

        Self {
            offenders,
            convictions,
            custody,
            staff,
            appointments,
            contacts,
            tiers,
            token_service,
        }
    }
}

//! Settings for the downstream Delius API and the integration contexts
//! used when an external system books appointments without knowing
//! Delius codes.

use std::collections::HashMap;
use std::env;

use serde::{Deserialize, Serialize};

/// Connection details of the internal Delius API.
#[derive(Debug, Clone)]
pub struct DeliusApiConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
}

impl DeliusApiConfig {
    /// Reads `DELIUS_BASEURL`, `DELIUS_USERNAME` and `DELIUS_PASSWORD`.
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("DELIUS_BASEURL")
                .unwrap_or_else(|_| "http://localhost:8090".to_string())
                .trim_end_matches('/')
                .to_string(),
            username: env::var("DELIUS_USERNAME").unwrap_or_else(|_| "NationalUser".to_string()),
            password: env::var("DELIUS_PASSWORD").unwrap_or_default(),
        }
    }
}

/// Delius codes an integration uses when its own requests carry none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationContext {
    pub provider_code: String,
    pub staff_code: String,
    pub team_code: String,
    pub requirement_rehabilitation_activity_type: String,
    pub appointment_contact_type: String,
}

pub const COMMISSIONED_REHABILITATION_SERVICES: &str = "commissioned-rehabilitation-services";

/// Named integration contexts.
#[derive(Debug, Clone, Default)]
pub struct IntegrationContextConfig {
    contexts: HashMap<String, IntegrationContext>,
}

impl IntegrationContextConfig {
    pub fn new(contexts: HashMap<String, IntegrationContext>) -> Self {
        Self { contexts }
    }

    /// Loads `DELIUS_INTEGRATION_CONTEXTS`, a JSON object keyed by context name.
    ///
    /// Falls back to [`IntegrationContextConfig::builtin`] when unset or malformed.
    pub fn from_env() -> Self {
        match env::var("DELIUS_INTEGRATION_CONTEXTS") {
            Ok(json) => match serde_json::from_str::<HashMap<String, IntegrationContext>>(&json) {
                Ok(contexts) => Self::new(contexts),
                Err(e) => {
                    log::error!("Invalid DELIUS_INTEGRATION_CONTEXTS: {}. Using built-in contexts", e);
                    Self::builtin()
                }
            },
            Err(_) => Self::builtin(),
        }
    }

    /// The commissioned rehabilitation services context.
    pub fn builtin() -> Self {
        let mut contexts = HashMap::new();
        contexts.insert(
            COMMISSIONED_REHABILITATION_SERVICES.to_string(),
            IntegrationContext {
                provider_code: "CRS".to_string(),
                staff_code: "CRSUATU".to_string(),
                team_code: "CRSUAT".to_string(),
                requirement_rehabilitation_activity_type: "F".to_string(),
                appointment_contact_type: "CRSAPT".to_string(),
            },
        );
        Self::new(contexts)
    }

    pub fn get(&self, name: &str) -> Option<&IntegrationContext> {
        self.contexts.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_context_is_present() {
        let config = IntegrationContextConfig::builtin();
        let context = config.get(COMMISSIONED_REHABILITATION_SERVICES).unwrap();

        assert_eq!(context.provider_code, "CRS");
        assert_eq!(context.requirement_rehabilitation_activity_type, "F");
        assert!(config.get("unknown").is_none());
    }

    #[test]
    fn test_context_deserializes_from_camel_case() {
        let json = r#"{"acme":{"providerCode":"ACM","staffCode":"ACMU","teamCode":"ACMT",
            "requirementRehabilitationActivityType":"F","appointmentContactType":"ACAPT"}}"#;
        let contexts: HashMap<String, IntegrationContext> = serde_json::from_str(json).unwrap();

        assert_eq!(contexts["acme"].team_code, "ACMT");
    }
}

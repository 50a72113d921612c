//! Client of the internal Delius API, which owns contact creation.

use async_trait::async_trait;
use log::debug;

use crate::config::DeliusApiConfig;
use crate::core::{AppError, AppResult};
use crate::domain::dto::appointments::{ContactDto, NewContact};

#[async_trait]
pub trait DeliusApiClient: Send + Sync {
    async fn create_new_contact(&self, contact: &NewContact) -> AppResult<ContactDto>;
}

/// `reqwest` client authenticating with basic auth.
pub struct HttpDeliusApiClient {
    client: reqwest::Client,
    config: DeliusApiConfig,
}

impl HttpDeliusApiClient {
    pub fn new(config: DeliusApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl DeliusApiClient for HttpDeliusApiClient {
    async fn create_new_contact(&self, contact: &NewContact) -> AppResult<ContactDto> {
        let url = format!("{}/v1/contact", self.config.base_url);
        debug!("POST {} for offender {}", url, contact.offender_crn);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .json(contact)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Delius API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "Delius API returned {}: {}",
                status, error_text
            )));
        }

        response
            .json::<ContactDto>()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Delius API response could not be read: {}", e)))
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Records every contact it is asked to create and answers with sequential ids.
    pub struct RecordingDeliusApiClient {
        contacts: Mutex<Vec<NewContact>>,
        first_id: i64,
    }

    impl RecordingDeliusApiClient {
        pub fn new(first_id: i64) -> Self {
            Self {
                contacts: Mutex::new(Vec::new()),
                first_id,
            }
        }

        pub fn contacts(&self) -> Vec<NewContact> {
            self.contacts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DeliusApiClient for RecordingDeliusApiClient {
        async fn create_new_contact(&self, contact: &NewContact) -> AppResult<ContactDto> {
            let mut contacts = self.contacts.lock().unwrap();
            contacts.push(contact.clone());
            Ok(ContactDto {
                id: self.first_id + contacts.len() as i64 - 1,
                offender_crn: Some(contact.offender_crn.clone()),
                contact_type: Some(contact.contact_type.clone()),
            })
        }
    }
}

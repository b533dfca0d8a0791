//! Application repository

use common::{
    error::ClientResult,
    http::{HttpClient, endpoint},
};
use tracing::info;

use crate::models::{Application, DeleteAck, InsertAck, NewApplication};

const APPLICATIONS_ENDPOINT: &str = "/applications";

/// Visa application repository
#[derive(Clone)]
pub struct ApplicationRepository {
    http: HttpClient,
}

impl ApplicationRepository {
    /// Create a new application repository
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Get the applications submitted by user `uid`
    pub async fn list_for_user(&self, uid: &str) -> ClientResult<Vec<Application>> {
        self.http
            .get(&endpoint(APPLICATIONS_ENDPOINT, &[uid]))
            .await
    }

    /// Submit an application; returns the new ID if the API stored it
    pub async fn create(&self, application: &NewApplication) -> ClientResult<Option<String>> {
        let ack: Option<InsertAck> = self.http.post(APPLICATIONS_ENDPOINT, application).await?;
        let id = ack.and_then(|ack| ack.id());
        if let Some(id) = &id {
            info!("Submitted application {} for visa {}", id, application.visa_id);
        }
        Ok(id)
    }

    /// Cancel an application by ID
    pub async fn cancel(&self, id: &str) -> ClientResult<bool> {
        let ack: Option<DeleteAck> = self
            .http
            .delete(&endpoint(APPLICATIONS_ENDPOINT, &[id]))
            .await?;
        Ok(ack.is_some_and(|ack| ack.deleted_count > 0))
    }
}

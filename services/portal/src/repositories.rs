//! Repositories for the remote visa API

use common::{
    error::ClientResult,
    http::{HttpClient, endpoint},
};
use tracing::{debug, info};

use crate::models::{DeleteAck, InsertAck, NewVisa, UpdateAck, Visa, VisaFields};

pub mod application;

const VISAS_ENDPOINT: &str = "/visas";
const USER_VISAS_ENDPOINT: &str = "/visas/user";
const LATEST_VISAS_ENDPOINT: &str = "/visas?limit=6&sort=createdAt";

/// Visa listing repository
#[derive(Clone)]
pub struct VisaRepository {
    http: HttpClient,
}

impl VisaRepository {
    /// Create a new visa repository
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Get all listings
    pub async fn list_all(&self) -> ClientResult<Vec<Visa>> {
        let visas: Vec<Visa> = self.http.get(VISAS_ENDPOINT).await?;
        debug!("Fetched {} visas", visas.len());
        Ok(visas)
    }

    /// Get the six most recently added listings
    pub async fn latest(&self) -> ClientResult<Vec<Visa>> {
        self.http.get(LATEST_VISAS_ENDPOINT).await
    }

    /// Find a listing by ID
    pub async fn get_by_id(&self, id: &str) -> ClientResult<Visa> {
        self.http.get(&endpoint(VISAS_ENDPOINT, &[id])).await
    }

    /// Get the listings added by `email`
    pub async fn list_by_user(&self, email: &str) -> ClientResult<Vec<Visa>> {
        self.http
            .get(&endpoint(USER_VISAS_ENDPOINT, &[email]))
            .await
    }

    /// Create a listing
    ///
    /// Returns the new ID, or `None` when the API did not acknowledge an insert.
    pub async fn create(&self, visa: &NewVisa) -> ClientResult<Option<String>> {
        let ack: Option<InsertAck> = self.http.post(VISAS_ENDPOINT, visa).await?;
        let id = ack.and_then(|ack| ack.id());
        if let Some(id) = &id {
            info!("Created visa {} for {}", id, visa.fields.country);
        }
        Ok(id)
    }

    /// Replace the editable content of a listing
    ///
    /// Returns whether the API modified anything.
    pub async fn update(&self, id: &str, fields: &VisaFields) -> ClientResult<bool> {
        let ack: Option<UpdateAck> = self
            .http
            .put(&endpoint(VISAS_ENDPOINT, &[id]), fields)
            .await?;
        Ok(ack.is_some_and(|ack| ack.modified_count > 0))
    }

    /// Delete a listing by ID
    pub async fn delete(&self, id: &str) -> ClientResult<bool> {
        let ack: Option<DeleteAck> = self
            .http
            .delete(&endpoint(VISAS_ENDPOINT, &[id]))
            .await?;
        Ok(ack.is_some_and(|ack| ack.deleted_count > 0))
    }
}

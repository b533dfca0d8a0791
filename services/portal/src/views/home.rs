//! Home view: the latest listings

use common::error::ClientResult;
use tracing::info;

use super::ListState;
use crate::{models::Visa, repositories::VisaRepository, state::AppState};

pub struct HomeView {
    visas: VisaRepository,
    latest: ListState<Visa>,
}

impl HomeView {
    pub fn new(state: &AppState) -> Self {
        Self {
            visas: state.visa_repository.clone(),
            latest: ListState::new(),
        }
    }

    /// Load the six most recent listings
    pub async fn load(&self) -> ClientResult<Vec<Visa>> {
        let visas = self.latest.load(self.visas.latest()).await?;
        info!("Home shows {} latest visas", visas.len());
        Ok(visas)
    }

    pub fn latest(&self) -> Vec<Visa> {
        self.latest.items()
    }

    pub fn is_loading(&self) -> bool {
        self.latest.is_loading()
    }
}

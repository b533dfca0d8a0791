//! All visas view with a local visa-type filter

use std::{
    fmt,
    sync::{Mutex, PoisonError},
};

use common::error::ClientResult;

use super::ListState;
use crate::{
    models::{Visa, VisaType},
    repositories::VisaRepository,
    state::AppState,
};

/// Visa-type filter applied to the loaded list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VisaTypeFilter {
    #[default]
    All,
    Only(VisaType),
}

impl VisaTypeFilter {
    /// `all` (any case) or a visa type label or keyword
    pub fn parse(input: &str) -> Self {
        if input.trim().is_empty() || input.trim().eq_ignore_ascii_case("all") {
            VisaTypeFilter::All
        } else {
            VisaTypeFilter::Only(VisaType::parse(input))
        }
    }

    pub fn matches(&self, visa: &Visa) -> bool {
        match self {
            VisaTypeFilter::All => true,
            VisaTypeFilter::Only(visa_type) => &visa.visa_type == visa_type,
        }
    }
}

impl fmt::Display for VisaTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisaTypeFilter::All => f.write_str("all"),
            VisaTypeFilter::Only(visa_type) => write!(f, "{}", visa_type),
        }
    }
}

pub struct AllVisasView {
    visas: VisaRepository,
    list: ListState<Visa>,
    filter: Mutex<VisaTypeFilter>,
}

impl AllVisasView {
    pub fn new(state: &AppState) -> Self {
        Self {
            visas: state.visa_repository.clone(),
            list: ListState::new(),
            filter: Mutex::new(VisaTypeFilter::All),
        }
    }

    pub async fn load(&self) -> ClientResult<Vec<Visa>> {
        self.list.load(self.visas.list_all()).await
    }

    pub fn set_filter(&self, filter: VisaTypeFilter) {
        *self.filter.lock().unwrap_or_else(PoisonError::into_inner) = filter;
    }

    pub fn filter(&self) -> VisaTypeFilter {
        self.filter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Loaded listings that pass the current filter
    pub fn visible(&self) -> Vec<Visa> {
        let filter = self.filter();
        self.list
            .items()
            .into_iter()
            .filter(|visa| filter.matches(visa))
            .collect()
    }

    pub fn is_loading(&self) -> bool {
        self.list.is_loading()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_parse() {
        assert_eq!(VisaTypeFilter::parse("ALL"), VisaTypeFilter::All);
        assert_eq!(VisaTypeFilter::parse(""), VisaTypeFilter::All);
        assert_eq!(
            VisaTypeFilter::parse("student"),
            VisaTypeFilter::Only(VisaType::Student)
        );
        assert_eq!(VisaTypeFilter::parse("Work visa").to_string(), "Work visa");
    }
}

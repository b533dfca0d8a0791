//! Portal routes

use std::fmt;

/// Every route the portal renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    AllVisas,
    AddVisa,
    MyAddedVisas,
    MyVisaApplications,
    VisaDetails { id: String },
}

impl Route {
    /// Match a location path; `None` renders the not-found page
    ///
    /// Query strings and a trailing slash are ignored.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        let route = match path {
            "/" => Route::Home,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/all-visas" => Route::AllVisas,
            "/add-visa" => Route::AddVisa,
            "/my-added-visas" => Route::MyAddedVisas,
            "/my-visa-applications" => Route::MyVisaApplications,
            other => {
                let id = other.strip_prefix("/visa/")?;
                if id.is_empty() || id.contains('/') {
                    return None;
                }
                Route::VisaDetails { id: id.to_string() }
            }
        };

        Some(route)
    }

    /// Canonical path of this route
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::AllVisas => "/all-visas".to_string(),
            Route::AddVisa => "/add-visa".to_string(),
            Route::MyAddedVisas => "/my-added-visas".to_string(),
            Route::MyVisaApplications => "/my-visa-applications".to_string(),
            Route::VisaDetails { id } => format!("/visa/{}", id),
        }
    }

    /// Whether the route requires a signed-in user
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::AddVisa
                | Route::MyAddedVisas
                | Route::MyVisaApplications
                | Route::VisaDetails { .. }
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

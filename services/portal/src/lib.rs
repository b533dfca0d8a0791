//! Visa Portal client
//!
//! View controllers for the visa directory, the route guard that protects
//! them, and the repositories they use to reach the remote API.

pub mod guard;
pub mod models;
pub mod navigation;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod views;

pub use navigation::{Navigator, Screen};
pub use routes::Route;
pub use state::AppState;

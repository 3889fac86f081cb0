//! Headless presentation layer for FamHub.
//!
//! `AppServices` holds the shared runtime and data client; `models` has one
//! page model per screen. Rendering is left to the front end.

pub mod app_services;
pub mod models;

pub use app_services::AppServices;
pub use models::*;

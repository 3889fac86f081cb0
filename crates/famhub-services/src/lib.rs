//! Data access for FamHub: row types, the repository trait, and its SQLite
//! and hosted REST implementations.

pub mod backend;
pub mod client;
pub mod rest_client;
pub mod sqlite_store;
pub mod types;

pub use backend::{FamilyBackend, RepoError, RepoResult};
pub use client::FamilyClient;
pub use rest_client::RestClient;
pub use sqlite_store::SqliteFamilyStore;
pub use types::*;

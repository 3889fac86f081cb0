//! How repository results reach a page.
//!
//! Reads degrade to an empty value and a warning. Writes surface an
//! `AppError` whose `user_message()` is shown in the blocking alert.

use famhub_core::{AppError, ValidationError};
use famhub_services::RepoResult;

pub(crate) fn or_empty<T: Default>(what: &str, result: RepoResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Failed to load {}: {}", what, e);
            T::default()
        }
    }
}

pub(crate) fn surfaced<T>(what: &str, result: RepoResult<T>) -> Result<T, AppError> {
    result.map_err(|e| {
        let err = e.into_app_error();
        if err.is_validation() {
            tracing::debug!("{} rejected: {}", what, err);
        } else {
            tracing::error!("Failed to {}: {}", what, err);
        }
        err
    })
}

/// Reject a form before any request is issued.
pub(crate) fn checked(what: &str, result: Result<(), ValidationError>) -> Result<(), AppError> {
    result.map_err(|e| {
        tracing::debug!("{} rejected: {}", what, e);
        AppError::Validation(e)
    })
}

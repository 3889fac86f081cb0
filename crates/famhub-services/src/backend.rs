//! Repository trait for the family tables and its error type.
//!
//! `FamilyBackend` has one method per entity operation the pages need. The
//! SQLite store implements it directly; `FamilyClient` wraps it (or the REST
//! client) behind an async facade.

use std::collections::HashMap;

use famhub_calendar::{DateKey, ScheduleEntry};
use famhub_core::error::{DatabaseError, NetworkError, ReqwestErrorExt, RusqliteErrorExt};
use famhub_core::{AppError, ValidationError};
use thiserror::Error;

use crate::types::{
    Attachment, Card, CardBenefit, CardInput, CategoryBenefit, Comment, Company, CompanyBenefit,
    Member, NewAttachment, NewComment, NewPost, NewSchedule, Notice, Post, PostUpdate,
    ScheduleUpdate,
};

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepoError {
    /// Row was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Required input was missing.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Local database failure.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Other storage failure (worker task, bucket bookkeeping).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Non-success response from the hosted API.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport or decode failure talking to the hosted API.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl RepoError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_)) || matches!(self, Self::Api { status: 404, .. })
    }

    /// Map into the application error shown to the user.
    pub fn into_app_error(self) -> AppError {
        match self {
            Self::NotFound(what) => AppError::Service(format!("not found: {}", what)),
            Self::Validation(e) => AppError::Validation(e),
            Self::Database(e) => AppError::Database(e),
            Self::Storage(message) => AppError::Service(message),
            Self::Api { status, message } => {
                AppError::Network(NetworkError::ServerError { status, message })
            }
            Self::Network(e) => AppError::Network(e.into_network_error()),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Database(e.into_database_error())
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        e.into_app_error()
    }
}

/// Result type for repository operations.
pub type RepoResult<T> = Result<T, RepoError>;

/// Storage for the family tables and the attachment bucket.
///
/// Implementations don't need to be Sync; `FamilyClient` serializes access
/// through a mutex.
pub trait FamilyBackend: Send {
    fn list_members(&self) -> RepoResult<Vec<Member>>;

    /// All posts, newest first.
    fn list_posts(&self) -> RepoResult<Vec<Post>>;

    /// The `limit` newest posts.
    fn recent_posts(&self, limit: usize) -> RepoResult<Vec<Post>>;

    fn get_post(&self, id: &str) -> RepoResult<Option<Post>>;

    fn create_post(&self, post: &NewPost) -> RepoResult<Post>;

    /// # Errors
    /// Returns `RepoError::NotFound` if the post doesn't exist.
    fn update_post(&self, id: &str, update: &PostUpdate) -> RepoResult<Post>;

    /// Delete a post together with its comments and attachment rows.
    fn delete_post(&self, id: &str) -> RepoResult<()>;

    /// Number of comments per post id. Posts without comments are absent.
    fn comment_counts(&self) -> RepoResult<HashMap<String, usize>>;

    /// Comments on a post, oldest first.
    fn list_comments(&self, post_id: &str) -> RepoResult<Vec<Comment>>;

    fn create_comment(&self, comment: &NewComment) -> RepoResult<Comment>;

    fn delete_comment(&self, id: &str) -> RepoResult<()>;

    fn list_attachments(&self, post_id: &str) -> RepoResult<Vec<Attachment>>;

    fn add_attachment(&self, attachment: &NewAttachment) -> RepoResult<Attachment>;

    /// Entries with `start <= schedule_date <= end`, ordered by date.
    /// Same-date entries come back in storage order; callers apply
    /// `famhub_calendar::schedule::sort` for display.
    fn list_schedules(&self, start: DateKey, end: DateKey) -> RepoResult<Vec<ScheduleEntry>>;

    fn create_schedule(&self, schedule: &NewSchedule) -> RepoResult<ScheduleEntry>;

    fn update_schedule(&self, id: &str, update: &ScheduleUpdate) -> RepoResult<ScheduleEntry>;

    fn delete_schedule(&self, id: &str) -> RepoResult<()>;

    fn list_notices(&self) -> RepoResult<Vec<Notice>>;

    /// Insert or replace the notice of `notice.author_id`.
    fn upsert_notice(&self, notice: &Notice) -> RepoResult<Notice>;

    fn list_cards(&self) -> RepoResult<Vec<Card>>;

    fn create_card(&self, card: &CardInput) -> RepoResult<Card>;

    fn update_card(&self, id: &str, card: &CardInput) -> RepoResult<Card>;

    /// Delete the card row only. Remove its benefits first.
    fn delete_card(&self, id: &str) -> RepoResult<()>;

    fn card_benefits(&self, card_id: &str) -> RepoResult<Vec<CardBenefit>>;

    /// Benefits in `category`, each joined with its card.
    fn benefits_by_category(&self, category: &str) -> RepoResult<Vec<CategoryBenefit>>;

    fn delete_card_benefits(&self, card_id: &str) -> RepoResult<()>;

    fn insert_card_benefits(&self, rows: &[CardBenefit]) -> RepoResult<()>;

    fn list_companies(&self) -> RepoResult<Vec<Company>>;

    /// Benefit rows of every company.
    fn list_company_benefits(&self) -> RepoResult<Vec<CompanyBenefit>>;

    fn company_benefits(&self, company_id: &str) -> RepoResult<Vec<CompanyBenefit>>;

    fn delete_company_benefits(&self, company_id: &str) -> RepoResult<()>;

    fn insert_company_benefits(&self, rows: &[CompanyBenefit]) -> RepoResult<()>;

    /// Store `data` at `path` in the attachment bucket.
    fn upload_blob(&self, path: &str, data: &[u8], content_type: &str) -> RepoResult<()>;

    /// Remove objects from the attachment bucket. Missing paths are ignored.
    fn remove_blobs(&self, paths: &[String]) -> RepoResult<()>;

    /// URL under which an uploaded object can be fetched.
    fn public_url(&self, path: &str) -> String;
}

//! Unified family data client supporting both backends.
//!
//! `FamilyClient` gives the view models one async interface whether rows
//! live in the local SQLite file or in the hosted database.

use std::collections::HashMap;
use std::sync::Arc;

use famhub_calendar::{DateKey, ScheduleEntry};
use famhub_core::{BackendKind, Config};
use parking_lot::Mutex;

use crate::backend::{FamilyBackend, RepoError, RepoResult};
use crate::rest_client::RestClient;
use crate::sqlite_store::SqliteFamilyStore;
use crate::types::{
    Attachment, Card, CardBenefit, CardInput, CategoryBenefit, Comment, Company, CompanyBenefit,
    Member, NewAttachment, NewComment, NewPost, NewSchedule, Notice, Post, PostUpdate,
    ScheduleUpdate,
};

/// Family data client over either storage backend.
#[derive(Clone)]
pub enum FamilyClient {
    /// Local SQLite storage (default).
    Sqlite(Arc<Mutex<SqliteFamilyStore>>),

    /// Hosted PostgREST API and storage bucket.
    Rest(Arc<RestClient>),
}

/// Run a store operation on the blocking pool.
async fn blocking<T, F>(store: &Arc<Mutex<SqliteFamilyStore>>, op: F) -> RepoResult<T>
where
    T: Send + 'static,
    F: FnOnce(&SqliteFamilyStore) -> RepoResult<T> + Send + 'static,
{
    let store = store.clone();
    tokio::task::spawn_blocking(move || {
        let guard = store.lock();
        op(&guard)
    })
    .await
    .map_err(|e| RepoError::storage(format!("Store task failed: {}", e)))?
}

impl FamilyClient {
    pub fn sqlite(store: SqliteFamilyStore) -> Self {
        Self::Sqlite(Arc::new(Mutex::new(store)))
    }

    pub fn rest(client: RestClient) -> Self {
        Self::Rest(Arc::new(client))
    }

    /// Build the client selected by `config.backend`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let backend = &config.backend;
        match backend.kind {
            BackendKind::Sqlite => {
                tracing::info!("Using local store at {}", backend.database_path.display());
                Ok(Self::sqlite(SqliteFamilyStore::open(&backend.database_path)?))
            }
            BackendKind::Rest => {
                let key = backend.resolved_anon_key().unwrap_or_else(|| {
                    tracing::warn!("No API key configured; requests will be anonymous");
                    String::new()
                });
                tracing::info!("Using hosted backend at {}", backend.rest_url);
                Ok(Self::rest(RestClient::new(
                    &backend.rest_url,
                    &key,
                    &backend.storage_bucket,
                )?))
            }
        }
    }

    pub fn is_sqlite(&self) -> bool {
        matches!(self, Self::Sqlite(_))
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, Self::Rest(_))
    }

    /// The local store, if this client uses one.
    pub fn sqlite_store(&self) -> Option<Arc<Mutex<SqliteFamilyStore>>> {
        match self {
            Self::Sqlite(store) => Some(store.clone()),
            Self::Rest(_) => None,
        }
    }

    pub async fn list_members(&self) -> RepoResult<Vec<Member>> {
        match self {
            Self::Sqlite(store) => blocking(store, |s| s.list_members()).await,
            Self::Rest(client) => client.list_members().await,
        }
    }

    pub async fn list_posts(&self) -> RepoResult<Vec<Post>> {
        match self {
            Self::Sqlite(store) => blocking(store, |s| s.list_posts()).await,
            Self::Rest(client) => client.list_posts().await,
        }
    }

    pub async fn recent_posts(&self, limit: usize) -> RepoResult<Vec<Post>> {
        match self {
            Self::Sqlite(store) => blocking(store, move |s| s.recent_posts(limit)).await,
            Self::Rest(client) => client.recent_posts(limit).await,
        }
    }

    pub async fn get_post(&self, id: &str) -> RepoResult<Option<Post>> {
        match self {
            Self::Sqlite(store) => {
                let id = id.to_string();
                blocking(store, move |s| s.get_post(&id)).await
            }
            Self::Rest(client) => client.get_post(id).await,
        }
    }

    pub async fn create_post(&self, post: NewPost) -> RepoResult<Post> {
        match self {
            Self::Sqlite(store) => blocking(store, move |s| s.create_post(&post)).await,
            Self::Rest(client) => client.create_post(&post).await,
        }
    }

    pub async fn update_post(&self, id: &str, update: PostUpdate) -> RepoResult<Post> {
        match self {
            Self::Sqlite(store) => {
                let id = id.to_string();
                blocking(store, move |s| s.update_post(&id, &update)).await
            }
            Self::Rest(client) => client.update_post(id, &update).await,
        }
    }

    pub async fn delete_post(&self, id: &str) -> RepoResult<()> {
        match self {
            Self::Sqlite(store) => {
                let id = id.to_string();
                blocking(store, move |s| s.delete_post(&id)).await
            }
            Self::Rest(client) => client.delete_post(id).await,
        }
    }

    pub async fn comment_counts(&self) -> RepoResult<HashMap<String, usize>> {
        match self {
            Self::Sqlite(store) => blocking(store, |s| s.comment_counts()).await,
            Self::Rest(client) => client.comment_counts().await,
        }
    }

    pub async fn list_comments(&self, post_id: &str) -> RepoResult<Vec<Comment>> {
        match self {
            Self::Sqlite(store) => {
                let post_id = post_id.to_string();
                blocking(store, move |s| s.list_comments(&post_id)).await
            }
            Self::Rest(client) => client.list_comments(post_id).await,
        }
    }

    pub async fn create_comment(&self, comment: NewComment) -> RepoResult<Comment> {
        match self {
            Self::Sqlite(store) => blocking(store, move |s| s.create_comment(&comment)).await,
            Self::Rest(client) => client.create_comment(&comment).await,
        }
    }

    pub async fn delete_comment(&self, id: &str) -> RepoResult<()> {
        match self {
            Self::Sqlite(store) => {
                let id = id.to_string();
                blocking(store, move |s| s.delete_comment(&id)).await
            }
            Self::Rest(client) => client.delete_comment(id).await,
        }
    }

    pub async fn list_attachments(&self, post_id: &str) -> RepoResult<Vec<Attachment>> {
        match self {
            Self::Sqlite(store) => {
                let post_id = post_id.to_string();
                blocking(store, move |s| s.list_attachments(&post_id)).await
            }
            Self::Rest(client) => client.list_attachments(post_id).await,
        }
    }

    pub async fn add_attachment(&self, attachment: NewAttachment) -> RepoResult<Attachment> {
        match self {
            Self::Sqlite(store) => blocking(store, move |s| s.add_attachment(&attachment)).await,
            Self::Rest(client) => client.add_attachment(&attachment).await,
        }
    }

    pub async fn list_schedules(&self, start: DateKey, end: DateKey) -> RepoResult<Vec<ScheduleEntry>> {
        match self {
            Self::Sqlite(store) => blocking(store, move |s| s.list_schedules(start, end)).await,
            Self::Rest(client) => client.list_schedules(start, end).await,
        }
    }

    pub async fn create_schedule(&self, schedule: NewSchedule) -> RepoResult<ScheduleEntry> {
        match self {
            Self::Sqlite(store) => blocking(store, move |s| s.create_schedule(&schedule)).await,
            Self::Rest(client) => client.create_schedule(&schedule).await,
        }
    }

    pub async fn update_schedule(&self, id: &str, update: ScheduleUpdate) -> RepoResult<ScheduleEntry> {
        match self {
            Self::Sqlite(store) => {
                let id = id.to_string();
                blocking(store, move |s| s.update_schedule(&id, &update)).await
            }
            Self::Rest(client) => client.update_schedule(id, &update).await,
        }
    }

    pub async fn delete_schedule(&self, id: &str) -> RepoResult<()> {
        match self {
            Self::Sqlite(store) => {
                let id = id.to_string();
                blocking(store, move |s| s.delete_schedule(&id)).await
            }
            Self::Rest(client) => client.delete_schedule(id).await,
        }
    }

    pub async fn list_notices(&self) -> RepoResult<Vec<Notice>> {
        match self {
            Self::Sqlite(store) => blocking(store, |s| s.list_notices()).await,
            Self::Rest(client) => client.list_notices().await,
        }
    }

    pub async fn upsert_notice(&self, notice: Notice) -> RepoResult<Notice> {
        match self {
            Self::Sqlite(store) => blocking(store, move |s| s.upsert_notice(&notice)).await,
            Self::Rest(client) => client.upsert_notice(&notice).await,
        }
    }

    pub async fn list_cards(&self) -> RepoResult<Vec<Card>> {
        match self {
            Self::Sqlite(store) => blocking(store, |s| s.list_cards()).await,
            Self::Rest(client) => client.list_cards().await,
        }
    }

    pub async fn create_card(&self, card: CardInput) -> RepoResult<Card> {
        match self {
            Self::Sqlite(store) => blocking(store, move |s| s.create_card(&card)).await,
            Self::Rest(client) => client.create_card(&card).await,
        }
    }

    pub async fn update_card(&self, id: &str, card: CardInput) -> RepoResult<Card> {
        match self {
            Self::Sqlite(store) => {
                let id = id.to_string();
                blocking(store, move |s| s.update_card(&id, &card)).await
            }
            Self::Rest(client) => client.update_card(id, &card).await,
        }
    }

    pub async fn delete_card(&self, id: &str) -> RepoResult<()> {
        match self {
            Self::Sqlite(store) => {
                let id = id.to_string();
                blocking(store, move |s| s.delete_card(&id)).await
            }
            Self::Rest(client) => client.delete_card(id).await,
        }
    }

    pub async fn card_benefits(&self, card_id: &str) -> RepoResult<Vec<CardBenefit>> {
        match self {
            Self::Sqlite(store) => {
                let card_id = card_id.to_string();
                blocking(store, move |s| s.card_benefits(&card_id)).await
            }
            Self::Rest(client) => client.card_benefits(card_id).await,
        }
    }

    pub async fn benefits_by_category(&self, category: &str) -> RepoResult<Vec<CategoryBenefit>> {
        match self {
            Self::Sqlite(store) => {
                let category = category.to_string();
                blocking(store, move |s| s.benefits_by_category(&category)).await
            }
            Self::Rest(client) => client.benefits_by_category(category).await,
        }
    }

    pub async fn delete_card_benefits(&self, card_id: &str) -> RepoResult<()> {
        match self {
            Self::Sqlite(store) => {
                let card_id = card_id.to_string();
                blocking(store, move |s| s.delete_card_benefits(&card_id)).await
            }
            Self::Rest(client) => client.delete_card_benefits(card_id).await,
        }
    }

    pub async fn insert_card_benefits(&self, rows: Vec<CardBenefit>) -> RepoResult<()> {
        match self {
            Self::Sqlite(store) => blocking(store, move |s| s.insert_card_benefits(&rows)).await,
            Self::Rest(client) => client.insert_card_benefits(&rows).await,
        }
    }

    pub async fn list_companies(&self) -> RepoResult<Vec<Company>> {
        match self {
            Self::Sqlite(store) => blocking(store, |s| s.list_companies()).await,
            Self::Rest(client) => client.list_companies().await,
        }
    }

    pub async fn list_company_benefits(&self) -> RepoResult<Vec<CompanyBenefit>> {
        match self {
            Self::Sqlite(store) => blocking(store, |s| s.list_company_benefits()).await,
            Self::Rest(client) => client.list_company_benefits().await,
        }
    }

    pub async fn company_benefits(&self, company_id: &str) -> RepoResult<Vec<CompanyBenefit>> {
        match self {
            Self::Sqlite(store) => {
                let company_id = company_id.to_string();
                blocking(store, move |s| s.company_benefits(&company_id)).await
            }
            Self::Rest(client) => client.company_benefits(company_id).await,
        }
    }

    pub async fn delete_company_benefits(&self, company_id: &str) -> RepoResult<()> {
        match self {
            Self::Sqlite(store) => {
                let company_id = company_id.to_string();
                blocking(store, move |s| s.delete_company_benefits(&company_id)).await
            }
            Self::Rest(client) => client.delete_company_benefits(company_id).await,
        }
    }

    pub async fn insert_company_benefits(&self, rows: Vec<CompanyBenefit>) -> RepoResult<()> {
        match self {
            Self::Sqlite(store) => {
                blocking(store, move |s| s.insert_company_benefits(&rows)).await
            }
            Self::Rest(client) => client.insert_company_benefits(&rows).await,
        }
    }

    pub async fn upload_blob(&self, path: &str, data: Vec<u8>, content_type: &str) -> RepoResult<()> {
        match self {
            Self::Sqlite(store) => {
                let path = path.to_string();
                let content_type = content_type.to_string();
                blocking(store, move |s| s.upload_blob(&path, &data, &content_type)).await
            }
            Self::Rest(client) => client.upload_blob(path, data, content_type).await,
        }
    }

    pub async fn remove_blobs(&self, paths: Vec<String>) -> RepoResult<()> {
        match self {
            Self::Sqlite(store) => blocking(store, move |s| s.remove_blobs(&paths)).await,
            Self::Rest(client) => client.remove_blobs(&paths).await,
        }
    }

    pub fn public_url(&self, path: &str) -> String {
        match self {
            Self::Sqlite(store) => store.lock().public_url(path),
            Self::Rest(client) => client.public_url(path),
        }
    }
}

impl std::fmt::Debug for FamilyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(_) => f.debug_tuple("FamilyClient::Sqlite").finish(),
            Self::Rest(client) => f
                .debug_tuple("FamilyClient::Rest")
                .field(&client.base_url().as_str())
                .finish(),
        }
    }
}

//! Client for the hosted backend: PostgREST tables under `/rest/v1` and the
//! attachment bucket under `/storage/v1`.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::Context;
use famhub_calendar::{DateKey, ScheduleEntry};
use reqwest::{header, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use crate::backend::{RepoError, RepoResult};
use crate::types::{
    Attachment, Card, CardBenefit, CardInput, CategoryBenefit, Comment, Company, CompanyBenefit,
    Member, NewAttachment, NewComment, NewPost, NewSchedule, Notice, Post, PostUpdate,
    ScheduleUpdate,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const RETURN_REPRESENTATION: &str = "return=representation";
const MERGE_DUPLICATES: &str = "resolution=merge-duplicates,return=representation";

const CATEGORY_BENEFIT_SELECT: &str =
    "card_id,category,benefit_description,cards(card_name,owner_id,monthly_requirement)";

type Query<'a> = [(&'a str, String)];

fn eq(value: &str) -> String {
    format!("eq.{}", value)
}

#[derive(Debug, Deserialize)]
struct PostIdRow {
    post_id: String,
}

#[derive(Debug, Serialize)]
struct RemovePrefixes<'a> {
    prefixes: &'a [String],
}

/// REST client for the hosted family tables.
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: Url,
    client: Client,
    api_key: String,
    bucket: String,
}

impl RestClient {
    /// Create a client for `base_url` (the project URL, without `/rest/v1`).
    pub fn new(base_url: &str, api_key: &str, bucket: &str) -> anyhow::Result<Self> {
        let mut base_url = Url::parse(base_url).context("Invalid backend URL")?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Backend URL cannot be used as a base: {}", base_url);
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url,
            client,
            api_key: api_key.to_string(),
            bucket: bucket.to_string(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn table_url(&self, table: &str) -> RepoResult<Url> {
        self.base_url
            .join(&format!("rest/v1/{}", table))
            .map_err(|e| RepoError::storage(format!("Invalid table URL: {}", e)))
    }

    /// `{base}/storage/v1/object/{prefix..}/{path}` with each segment escaped.
    fn object_url(&self, prefix: &[&str], path: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["storage", "v1", "object"])
                .extend(prefix)
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        url
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Turn non-2xx responses into `RepoError::Api`.
    async fn check_response(response: Response) -> RepoResult<Response> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RepoError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn select<T: DeserializeOwned>(&self, table: &str, query: &Query<'_>) -> RepoResult<Vec<T>> {
        let url = self.table_url(table)?;
        let response = self
            .authed(self.client.get(url).query(query))
            .send()
            .await?;
        let rows = Self::check_response(response).await?.json().await?;
        Ok(rows)
    }

    async fn insert<B, T>(&self, table: &str, query: &Query<'_>, body: &B, prefer: &str) -> RepoResult<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.table_url(table)?;
        let response = self
            .authed(self.client.post(url).query(query).json(body))
            .header("Prefer", prefer)
            .send()
            .await?;
        let rows = Self::check_response(response).await?.json().await?;
        Ok(rows)
    }

    async fn insert_minimal<B: Serialize + ?Sized>(&self, table: &str, body: &B) -> RepoResult<()> {
        let url = self.table_url(table)?;
        let response = self
            .authed(self.client.post(url).json(body))
            .send()
            .await?;
        Self::check_response(response).await?;
        Ok(())
    }

    async fn update<B, T>(&self, table: &str, filter: &Query<'_>, body: &B) -> RepoResult<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.table_url(table)?;
        let response = self
            .authed(self.client.patch(url).query(filter).json(body))
            .header("Prefer", RETURN_REPRESENTATION)
            .send()
            .await?;
        let rows = Self::check_response(response).await?.json().await?;
        Ok(rows)
    }

    async fn delete(&self, table: &str, filter: &Query<'_>) -> RepoResult<()> {
        let url = self.table_url(table)?;
        let response = self
            .authed(self.client.delete(url).query(filter))
            .send()
            .await?;
        Self::check_response(response).await?;
        Ok(())
    }

    /// First row of a `return=representation` response.
    fn single<T>(rows: Vec<T>, what: impl Into<String>) -> RepoResult<T> {
        rows.into_iter()
            .next()
            .ok_or_else(|| RepoError::not_found(what))
    }

    #[instrument(skip(self))]
    pub async fn list_members(&self) -> RepoResult<Vec<Member>> {
        self.select("family_members", &[("select", "id,name".into())])
            .await
    }

    #[instrument(skip(self))]
    pub async fn list_posts(&self) -> RepoResult<Vec<Post>> {
        let posts: Vec<Post> = self
            .select(
                "board_posts",
                &[("select", "*".into()), ("order", "created_at.desc".into())],
            )
            .await?;
        tracing::debug!("Fetched {} posts", posts.len());
        Ok(posts)
    }

    #[instrument(skip(self))]
    pub async fn recent_posts(&self, limit: usize) -> RepoResult<Vec<Post>> {
        self.select(
            "board_posts",
            &[
                ("select", "*".into()),
                ("order", "created_at.desc".into()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_post(&self, id: &str) -> RepoResult<Option<Post>> {
        let rows: Vec<Post> = self
            .select("board_posts", &[("select", "*".into()), ("id", eq(id))])
            .await?;
        Ok(rows.into_iter().next())
    }

    #[instrument(skip(self, post), fields(author = %post.author_id))]
    pub async fn create_post(&self, post: &NewPost) -> RepoResult<Post> {
        post.validate()?;
        let rows = self
            .insert("board_posts", &[], post, RETURN_REPRESENTATION)
            .await?;
        let created: Post = Self::single(rows, "inserted post")?;
        tracing::info!("Created post {}", created.id);
        Ok(created)
    }

    #[instrument(skip(self, update))]
    pub async fn update_post(&self, id: &str, update: &PostUpdate) -> RepoResult<Post> {
        update.validate()?;
        let rows = self.update("board_posts", &[("id", eq(id))], update).await?;
        Self::single(rows, format!("post {}", id))
    }

    /// Comments and attachment rows go with the post through the table's
    /// foreign keys.
    #[instrument(skip(self))]
    pub async fn delete_post(&self, id: &str) -> RepoResult<()> {
        self.delete("board_posts", &[("id", eq(id))]).await
    }

    #[instrument(skip(self))]
    pub async fn comment_counts(&self) -> RepoResult<HashMap<String, usize>> {
        let rows: Vec<PostIdRow> = self
            .select("board_comments", &[("select", "post_id".into())])
            .await?;
        let mut counts = HashMap::new();
        for row in rows {
            *counts.entry(row.post_id).or_insert(0) += 1;
        }
        Ok(counts)
    }

    #[instrument(skip(self))]
    pub async fn list_comments(&self, post_id: &str) -> RepoResult<Vec<Comment>> {
        self.select(
            "board_comments",
            &[
                ("select", "*".into()),
                ("post_id", eq(post_id)),
                ("order", "created_at.asc".into()),
            ],
        )
        .await
    }

    #[instrument(skip(self, comment), fields(post = %comment.post_id))]
    pub async fn create_comment(&self, comment: &NewComment) -> RepoResult<Comment> {
        comment.validate()?;
        let rows = self
            .insert("board_comments", &[], comment, RETURN_REPRESENTATION)
            .await?;
        Self::single(rows, "inserted comment")
    }

    #[instrument(skip(self))]
    pub async fn delete_comment(&self, id: &str) -> RepoResult<()> {
        self.delete("board_comments", &[("id", eq(id))]).await
    }

    #[instrument(skip(self))]
    pub async fn list_attachments(&self, post_id: &str) -> RepoResult<Vec<Attachment>> {
        self.select(
            "board_attachments",
            &[("select", "*".into()), ("post_id", eq(post_id))],
        )
        .await
    }

    #[instrument(skip(self, attachment), fields(file = %attachment.file_name))]
    pub async fn add_attachment(&self, attachment: &NewAttachment) -> RepoResult<Attachment> {
        let rows = self
            .insert("board_attachments", &[], attachment, RETURN_REPRESENTATION)
            .await?;
        Self::single(rows, "inserted attachment")
    }

    #[instrument(skip(self))]
    pub async fn list_schedules(&self, start: DateKey, end: DateKey) -> RepoResult<Vec<ScheduleEntry>> {
        self.select(
            "family_schedules",
            &[
                ("select", "*".into()),
                ("schedule_date", format!("gte.{}", start)),
                ("schedule_date", format!("lte.{}", end)),
                ("order", "schedule_date".into()),
            ],
        )
        .await
    }

    #[instrument(skip(self, schedule), fields(date = %schedule.schedule_date))]
    pub async fn create_schedule(&self, schedule: &NewSchedule) -> RepoResult<ScheduleEntry> {
        let rows = self
            .insert("family_schedules", &[], schedule, RETURN_REPRESENTATION)
            .await?;
        Self::single(rows, "inserted schedule")
    }

    #[instrument(skip(self, update))]
    pub async fn update_schedule(&self, id: &str, update: &ScheduleUpdate) -> RepoResult<ScheduleEntry> {
        let rows = self
            .update("family_schedules", &[("id", eq(id))], update)
            .await?;
        Self::single(rows, format!("schedule {}", id))
    }

    #[instrument(skip(self))]
    pub async fn delete_schedule(&self, id: &str) -> RepoResult<()> {
        self.delete("family_schedules", &[("id", eq(id))]).await
    }

    #[instrument(skip(self))]
    pub async fn list_notices(&self) -> RepoResult<Vec<Notice>> {
        self.select("home_notices", &[("select", "author_id,content".into())])
            .await
    }

    #[instrument(skip(self, notice), fields(author = %notice.author_id))]
    pub async fn upsert_notice(&self, notice: &Notice) -> RepoResult<Notice> {
        let rows = self
            .insert(
                "home_notices",
                &[("on_conflict", "author_id".into())],
                notice,
                MERGE_DUPLICATES,
            )
            .await?;
        Self::single(rows, "upserted notice")
    }

    #[instrument(skip(self))]
    pub async fn list_cards(&self) -> RepoResult<Vec<Card>> {
        self.select(
            "cards",
            &[("select", "*".into()), ("order", "card_name".into())],
        )
        .await
    }

    #[instrument(skip(self, card))]
    pub async fn create_card(&self, card: &CardInput) -> RepoResult<Card> {
        card.validate()?;
        let rows = self
            .insert("cards", &[], card, RETURN_REPRESENTATION)
            .await?;
        Self::single(rows, "inserted card")
    }

    #[instrument(skip(self, card))]
    pub async fn update_card(&self, id: &str, card: &CardInput) -> RepoResult<Card> {
        card.validate()?;
        let rows = self.update("cards", &[("id", eq(id))], card).await?;
        Self::single(rows, format!("card {}", id))
    }

    #[instrument(skip(self))]
    pub async fn delete_card(&self, id: &str) -> RepoResult<()> {
        self.delete("cards", &[("id", eq(id))]).await
    }

    #[instrument(skip(self))]
    pub async fn card_benefits(&self, card_id: &str) -> RepoResult<Vec<CardBenefit>> {
        self.select(
            "card_benefits",
            &[
                ("select", "card_id,category,benefit_description".into()),
                ("card_id", eq(card_id)),
            ],
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn benefits_by_category(&self, category: &str) -> RepoResult<Vec<CategoryBenefit>> {
        self.select(
            "card_benefits",
            &[
                ("select", CATEGORY_BENEFIT_SELECT.into()),
                ("category", eq(category)),
            ],
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_card_benefits(&self, card_id: &str) -> RepoResult<()> {
        self.delete("card_benefits", &[("card_id", eq(card_id))])
            .await
    }

    #[instrument(skip(self, rows), fields(count = rows.len()))]
    pub async fn insert_card_benefits(&self, rows: &[CardBenefit]) -> RepoResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        self.insert_minimal("card_benefits", rows).await
    }

    #[instrument(skip(self))]
    pub async fn list_companies(&self) -> RepoResult<Vec<Company>> {
        self.select("companies", &[("select", "id,company_name".into())])
            .await
    }

    #[instrument(skip(self))]
    pub async fn list_company_benefits(&self) -> RepoResult<Vec<CompanyBenefit>> {
        self.select(
            "company_benefits",
            &[("select", "company_id,category,content".into())],
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn company_benefits(&self, company_id: &str) -> RepoResult<Vec<CompanyBenefit>> {
        self.select(
            "company_benefits",
            &[
                ("select", "company_id,category,content".into()),
                ("company_id", eq(company_id)),
            ],
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_company_benefits(&self, company_id: &str) -> RepoResult<()> {
        self.delete("company_benefits", &[("company_id", eq(company_id))])
            .await
    }

    #[instrument(skip(self, rows), fields(count = rows.len()))]
    pub async fn insert_company_benefits(&self, rows: &[CompanyBenefit]) -> RepoResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        self.insert_minimal("company_benefits", rows).await
    }

    #[instrument(skip(self, data), fields(bytes = data.len()))]
    pub async fn upload_blob(&self, path: &str, data: Vec<u8>, content_type: &str) -> RepoResult<()> {
        let url = self.object_url(&[self.bucket.as_str()], path);
        let response = self
            .authed(self.client.post(url).body(data))
            .header(header::CONTENT_TYPE, content_type)
            .send()
            .await?;
        Self::check_response(response).await?;
        tracing::debug!("Uploaded {}", path);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn remove_blobs(&self, paths: &[String]) -> RepoResult<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let url = self.object_url(&[self.bucket.as_str()], "");
        let response = self
            .authed(self.client.delete(url).json(&RemovePrefixes { prefixes: paths }))
            .send()
            .await?;
        Self::check_response(response).await?;
        Ok(())
    }

    pub fn public_url(&self, path: &str) -> String {
        self.object_url(&["public", self.bucket.as_str()], path)
            .to_string()
    }
}

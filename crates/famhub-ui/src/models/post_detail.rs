//! Single post page: view/edit toggle, delete, comments and attachments.

use famhub_calendar::Freshness;
use famhub_core::AppError;
use famhub_services::{
    member_name, Attachment, Comment, FamilyClient, Member, NewComment, Post, PostUpdate,
};

use super::edit_state::EditState;
use super::outcome::{checked, or_empty, surfaced};
use super::scope::ViewScope;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentRow<'a> {
    pub comment: &'a Comment,
    pub author: &'a str,
    pub is_new: bool,
}

pub struct PostDetailModel {
    client: FamilyClient,
    scope: ViewScope,
    post_id: String,
    window_hours: i64,
    members: Vec<Member>,
    post: Option<Post>,
    comments: Vec<Comment>,
    attachments: Vec<Attachment>,
    edit: EditState<PostDraft>,
    comment_author: String,
    comment_text: String,
}

impl PostDetailModel {
    pub fn new(client: FamilyClient, scope: ViewScope, post_id: &str, window_hours: i64) -> Self {
        Self {
            client,
            scope,
            post_id: post_id.to_string(),
            window_hours,
            members: Vec::new(),
            post: None,
            comments: Vec::new(),
            attachments: Vec::new(),
            edit: EditState::Viewing,
            comment_author: String::new(),
            comment_text: String::new(),
        }
    }

    pub async fn load(&mut self) {
        let client = &self.client;
        let id = self.post_id.as_str();
        let fetched = self
            .scope
            .run(async {
                tokio::join!(
                    client.list_members(),
                    client.get_post(id),
                    client.list_comments(id),
                    client.list_attachments(id),
                )
            })
            .await;
        let Some((members, post, comments, attachments)) = fetched else {
            return;
        };
        self.members = or_empty("members", members);
        self.post = or_empty("post", post);
        self.comments = or_empty("comments", comments);
        self.attachments = or_empty("attachments", attachments);
        if self.post.is_none() {
            tracing::warn!("Post {} not found", self.post_id);
        }
    }

    async fn reload_comments(&mut self) {
        let fetched = self.scope.run(self.client.list_comments(&self.post_id)).await;
        if let Some(result) = fetched {
            self.comments = or_empty("comments", result);
        }
    }

    /// `None` until loaded, and after the post was deleted or not found.
    pub fn post(&self) -> Option<&Post> {
        self.post.as_ref()
    }

    pub fn author_name(&self) -> &str {
        self.post
            .as_ref()
            .map(|p| member_name(&self.members, &p.author_id))
            .unwrap_or("")
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.edit, EditState::Editing(_))
    }

    /// Switch to edit mode with the saved title and content.
    pub fn begin_edit(&mut self) {
        if let Some(post) = &self.post {
            self.edit = EditState::Editing(PostDraft {
                title: post.title.clone(),
                content: post.content.clone(),
            });
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut PostDraft> {
        match &mut self.edit {
            EditState::Editing(draft) => Some(draft),
            EditState::Viewing => None,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit = EditState::Viewing;
    }

    /// Save the open draft. Title and content are both required; on any
    /// failure the page stays in edit mode.
    pub async fn save_edit(&mut self) -> Result<(), AppError> {
        let EditState::Editing(draft) = &self.edit else {
            return Ok(());
        };
        let update = PostUpdate {
            title: draft.title.clone(),
            content: draft.content.clone(),
        };
        checked("post update", update.validate())?;
        let updated = surfaced(
            "update post",
            self.client.update_post(&self.post_id, update).await,
        )?;
        self.post = Some(updated);
        self.edit = EditState::Viewing;
        Ok(())
    }

    /// Delete the post. Attachment files are removed first on a best-effort
    /// basis; a storage failure does not stop the row deletion. Returns the
    /// file paths left behind in storage, empty when every file went.
    pub async fn delete(&mut self) -> Result<Vec<String>, AppError> {
        let paths: Vec<String> = self
            .attachments
            .iter()
            .map(|a| a.file_path.clone())
            .filter(|p| !p.is_empty())
            .collect();
        let orphaned = if paths.is_empty() {
            Vec::new()
        } else {
            match self.client.remove_blobs(paths.clone()).await {
                Ok(()) => Vec::new(),
                Err(e) => {
                    tracing::warn!("Could not remove attachment files for {}: {}", self.post_id, e);
                    paths
                }
            }
        };
        surfaced("delete post", self.client.delete_post(&self.post_id).await)?;
        tracing::info!("Deleted post {}", self.post_id);
        self.post = None;
        self.comments.clear();
        self.attachments.clear();
        self.edit = EditState::Viewing;
        Ok(orphaned)
    }

    pub fn comment_rows_at(&self, freshness: &Freshness) -> Vec<CommentRow<'_>> {
        self.comments
            .iter()
            .map(|comment| CommentRow {
                comment,
                author: member_name(&self.members, &comment.author_id),
                is_new: freshness.is_fresh(comment.created_at),
            })
            .collect()
    }

    pub fn comment_rows(&self) -> Vec<CommentRow<'_>> {
        self.comment_rows_at(&Freshness::snapshot(self.window_hours))
    }

    pub fn set_comment_author(&mut self, member_id: &str) {
        self.comment_author = member_id.to_string();
    }

    pub fn comment_text_mut(&mut self) -> &mut String {
        &mut self.comment_text
    }

    /// Post the comment draft, then refetch. The text box is cleared on
    /// success; the chosen author is kept.
    pub async fn add_comment(&mut self) -> Result<(), AppError> {
        let comment = NewComment {
            post_id: self.post_id.clone(),
            author_id: self.comment_author.clone(),
            content: self.comment_text.clone(),
        };
        checked("comment", comment.validate())?;
        surfaced("add comment", self.client.create_comment(comment).await)?;
        self.comment_text.clear();
        self.reload_comments().await;
        Ok(())
    }

    pub async fn delete_comment(&mut self, comment_id: &str) -> Result<(), AppError> {
        surfaced("delete comment", self.client.delete_comment(comment_id).await)?;
        self.comments.retain(|c| c.id != comment_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::models::fixtures::client_with_members;
    use famhub_services::{NewAttachment, NewPost, RestClient};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn seeded() -> (FamilyClient, String, Post) {
        let (client, members) = client_with_members(&["Mom"]);
        let mom = members[0].id.clone();
        let post = client
            .create_post(NewPost {
                title: "Trip".into(),
                content: "Plans".into(),
                author_id: mom.clone(),
                is_notice: false,
            })
            .await
            .unwrap();
        (client, mom, post)
    }

    #[tokio::test]
    async fn load_and_edit() {
        let (client, _, post) = seeded().await;
        let mut page = PostDetailModel::new(client, ViewScope::new(), &post.id, 24);
        page.load().await;
        assert_eq!(page.post().unwrap().title, "Trip");
        assert_eq!(page.author_name(), "Mom");

        page.begin_edit();
        assert!(page.is_editing());
        page.draft_mut().unwrap().title = "Trip v2".into();
        page.save_edit().await.unwrap();
        assert!(!page.is_editing());
        assert_eq!(page.post().unwrap().title, "Trip v2");
    }

    #[tokio::test]
    async fn blank_edit_is_rejected_and_stays_open() {
        let (client, _, post) = seeded().await;
        let mut page = PostDetailModel::new(client, ViewScope::new(), &post.id, 24);
        page.load().await;
        page.begin_edit();
        page.draft_mut().unwrap().content = "   ".into();
        let err = page.save_edit().await.unwrap_err();
        assert!(err.is_validation());
        assert!(page.is_editing());
        assert_eq!(page.post().unwrap().content, "Plans");
    }

    #[tokio::test]
    async fn comments_add_and_delete() {
        let (client, mom, post) = seeded().await;
        let mut page = PostDetailModel::new(client, ViewScope::new(), &post.id, 24);
        page.load().await;

        assert!(page.add_comment().await.unwrap_err().is_validation());

        page.set_comment_author(&mom);
        page.comment_text_mut().push_str("Sounds good");
        page.add_comment().await.unwrap();
        assert!(page.comment_text_mut().is_empty());

        let rows = page.comment_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].author, "Mom");
        assert!(rows[0].is_new);

        let id = rows[0].comment.id.clone();
        page.delete_comment(&id).await.unwrap();
        assert!(page.comment_rows().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_files_then_row() {
        let (client, _, post) = seeded().await;
        let path = format!("{}/1_a.txt", post.id);
        client.upload_blob(&path, b"hello".to_vec(), "text/plain").await.unwrap();
        client
            .add_attachment(NewAttachment {
                post_id: post.id.clone(),
                file_name: "a.txt".into(),
                file_url: client.public_url(&path),
                file_path: path.clone(),
            })
            .await
            .unwrap();

        let mut page = PostDetailModel::new(client.clone(), ViewScope::new(), &post.id, 24);
        page.load().await;
        assert_eq!(page.attachments().len(), 1);

        let orphaned = page.delete().await.unwrap();
        assert!(orphaned.is_empty());
        assert!(page.post().is_none());
        assert!(client.get_post(&post.id).await.unwrap().is_none());
        let store = client.sqlite_store().unwrap();
        assert!(store.lock().read_blob(&path).unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_post_loads_as_none() {
        let (client, _) = client_with_members(&[]);
        let mut page = PostDetailModel::new(client, ViewScope::new(), "nope", 24);
        page.load().await;
        assert!(page.post().is_none());
        assert_eq!(page.author_name(), "");
    }

    #[tokio::test]
    async fn storage_failure_still_deletes_post() {
        let server = MockServer::start().await;
        let rows = [
            ("family_members", serde_json::json!([{"id": "m1", "name": "Mom"}])),
            (
                "board_posts",
                serde_json::json!([{
                    "id": "p1",
                    "title": "Trip",
                    "content": "Plans",
                    "author_id": "m1",
                    "is_notice": false,
                    "created_at": "2026-10-19T00:00:00Z"
                }]),
            ),
            ("board_comments", serde_json::json!([])),
            (
                "board_attachments",
                serde_json::json!([{
                    "id": "att1",
                    "post_id": "p1",
                    "file_name": "a.txt",
                    "file_url": "http://files/a.txt",
                    "file_path": "p1/1_a.txt"
                }]),
            ),
        ];
        for (table, body) in rows {
            Mock::given(method("GET"))
                .and(path(format!("/rest/v1/{}", table)))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .mount(&server)
                .await;
        }
        Mock::given(method("DELETE"))
            .and(path("/storage/v1/object/board-files"))
            .respond_with(ResponseTemplate::new(500).set_body_string("storage offline"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/board_posts"))
            .and(query_param("id", "eq.p1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = FamilyClient::rest(RestClient::new(&server.uri(), "anon-key", "board-files").unwrap());
        let mut page = PostDetailModel::new(client, ViewScope::new(), "p1", 24);
        page.load().await;
        assert_eq!(page.attachments().len(), 1);

        let orphaned = page.delete().await.unwrap();
        assert_eq!(orphaned, vec!["p1/1_a.txt".to_string()]);
        assert!(page.post().is_none());
        assert!(page.attachments().is_empty());
    }
}

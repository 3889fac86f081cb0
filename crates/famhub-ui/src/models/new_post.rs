//! New post form with multi-file attachments.

use chrono::Utc;
use famhub_core::{AppError, SubmitState};
use famhub_services::{attachment_path, FamilyClient, Member, NewAttachment, NewPost, Post};

use super::outcome::{checked, or_empty, surfaced};
use super::scope::ViewScope;

/// A file picked in the form, already read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// What happened to the picked files. Uploads are best-effort: a failed
/// file is listed here and the rest continue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub uploaded: usize,
    pub failed: Vec<String>,
}

impl UploadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    pub post: Post,
    pub uploads: UploadReport,
}

pub struct NewPostModel {
    client: FamilyClient,
    scope: ViewScope,
    members: Vec<Member>,
    form: NewPost,
    files: Vec<UploadFile>,
    state: SubmitState,
}

impl NewPostModel {
    pub fn new(client: FamilyClient, scope: ViewScope) -> Self {
        Self {
            client,
            scope,
            members: Vec::new(),
            form: NewPost::default(),
            files: Vec::new(),
            state: SubmitState::Idle,
        }
    }

    /// Fetch the author choices.
    pub async fn load(&mut self) {
        if let Some(result) = self.scope.run(self.client.list_members()).await {
            self.members = or_empty("members", result);
        }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn form(&self) -> &NewPost {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut NewPost {
        &mut self.form
    }

    pub fn add_file(&mut self, file: UploadFile) {
        self.files.push(file);
    }

    pub fn remove_file(&mut self, index: usize) -> Option<UploadFile> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    pub fn files(&self) -> &[UploadFile] {
        &self.files
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    pub fn button_label(&self) -> &'static str {
        self.state.button_label()
    }

    /// Create the post, then upload each picked file and record it as an
    /// attachment. The form is reset after the post row exists, even when
    /// some files failed.
    ///
    /// The form returns to `Idle` however the call ends, including when the
    /// future is dropped before it completes.
    pub async fn submit(&mut self) -> Result<Submitted, AppError> {
        if !self.state.can_submit() {
            return Err(AppError::Service("A post is already being saved".into()));
        }
        checked("new post", self.form.validate())?;

        let _busy = Submitting::enter(&mut self.state);
        let post = surfaced("create post", self.client.create_post(self.form.clone()).await)?;
        tracing::info!("Created post {}", post.id);

        let files = std::mem::take(&mut self.files);
        let uploads = upload_all(&self.client, &post.id, files).await;
        if !uploads.is_complete() {
            tracing::warn!(
                "{} of {} attachments failed for post {}",
                uploads.failed.len(),
                uploads.failed.len() + uploads.uploaded,
                post.id
            );
        }

        self.form = NewPost::default();
        Ok(Submitted { post, uploads })
    }
}

/// Holds the form in `Submitting` until dropped.
struct Submitting<'a> {
    state: &'a mut SubmitState,
}

impl<'a> Submitting<'a> {
    fn enter(state: &'a mut SubmitState) -> Self {
        *state = state.on_submit();
        Self { state }
    }
}

impl Drop for Submitting<'_> {
    fn drop(&mut self) {
        *self.state = self.state.on_done();
    }
}

async fn upload_all(client: &FamilyClient, post_id: &str, files: Vec<UploadFile>) -> UploadReport {
    let mut report = UploadReport::default();
    for file in files {
        let path = attachment_path(post_id, Utc::now(), &file.file_name);
        if let Err(e) = client
            .upload_blob(&path, file.data, &file.content_type)
            .await
        {
            tracing::warn!("Upload of {} failed: {}", file.file_name, e);
            report.failed.push(file.file_name);
            continue;
        }
        let attachment = NewAttachment {
            post_id: post_id.to_string(),
            file_name: file.file_name.clone(),
            file_url: client.public_url(&path),
            file_path: path,
        };
        match client.add_attachment(attachment).await {
            Ok(_) => report.uploaded += 1,
            Err(e) => {
                tracing::warn!("Recording attachment {} failed: {}", file.file_name, e);
                report.failed.push(file.file_name);
            }
        }
    }
    report
}

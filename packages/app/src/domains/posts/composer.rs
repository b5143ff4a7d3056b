//! Post composer: the draft being written and its submission.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::orchestrator::{validate_title, PublishError, PublishRequest, UploadOrchestrator};
use super::previews::{PreviewHandle, PreviewRegistry};
use super::{CreatedPost, UploadFile};
use crate::common::{BaseNotifier, InFlightGuard, Notification};
use crate::domains::session::Session;
use crate::kernel::AppKernel;

pub const PUBLISH_FAILED_MESSAGE: &str = "Failed to create post";
pub const PUBLISHED_MESSAGE: &str = "Post created";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposerError {
    #[error("Title is required")]
    EmptyTitle,

    #[error("Sign in to post")]
    NotSignedIn,

    #[error("No selected file at index {index} ({len} selected)")]
    NoSuchFile { index: usize, len: usize },
}

/// Result of `Composer::submit`.
#[derive(Debug)]
pub enum SubmitOutcome {
    Published(CreatedPost),
    /// Another submission of this composer is still in flight; nothing was sent.
    AlreadySubmitting,
    /// Draft rejected locally; nothing was sent.
    Invalid(ComposerError),
    /// A remote step failed. The draft is preserved.
    Failed(PublishError),
}

impl SubmitOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, SubmitOutcome::Published(_))
    }
}

/// A file in the draft together with its preview.
#[derive(Debug)]
struct SelectedFile {
    file: UploadFile,
    preview: PreviewHandle,
}

#[derive(Debug, Default)]
struct DraftPost {
    title: String,
    content: String,
    files: Vec<SelectedFile>,
}

/// What a front end needs to render one selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFileView {
    pub name: String,
    pub content_type: String,
    pub preview_url: String,
}

/// Collects a new post and submits it through the upload orchestrator.
///
/// Shareable across tasks (`Arc<Composer>`). At most one submission is in
/// flight per composer; the draft survives failed submissions.
pub struct Composer {
    orchestrator: UploadOrchestrator,
    notifier: Arc<dyn BaseNotifier>,
    session: Session,
    previews: PreviewRegistry,
    draft: Mutex<DraftPost>,
    submitting: AtomicBool,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl Composer {
    pub fn new(kernel: &AppKernel, session: Session) -> Self {
        Self {
            orchestrator: UploadOrchestrator::new(kernel.posts.clone(), kernel.step_timeout),
            notifier: kernel.notifier.clone(),
            session,
            previews: PreviewRegistry::new(),
            draft: Mutex::new(DraftPost::default()),
            submitting: AtomicBool::new(false),
            in_flight: Mutex::new(None),
        }
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.draft().title = title.into();
    }

    pub fn set_content(&self, content: impl Into<String>) {
        self.draft().content = content.into();
    }

    pub fn title(&self) -> String {
        self.draft().title.clone()
    }

    pub fn content(&self) -> String {
        self.draft().content.clone()
    }

    /// Append files to the draft. Returns their preview URLs.
    pub fn select_files(&self, files: impl IntoIterator<Item = UploadFile>) -> Vec<String> {
        let mut draft = self.draft();
        files
            .into_iter()
            .map(|file| {
                let preview = self.previews.create();
                let url = preview.url().to_string();
                draft.files.push(SelectedFile { file, preview });
                url
            })
            .collect()
    }

    /// Remove the file at `index` and release its preview.
    pub fn remove_file(&self, index: usize) -> Result<UploadFile, ComposerError> {
        let mut draft = self.draft();
        let len = draft.files.len();
        if index >= len {
            return Err(ComposerError::NoSuchFile { index, len });
        }
        let SelectedFile { file, preview } = draft.files.remove(index);
        drop(preview);
        Ok(file)
    }

    pub fn selected_files(&self) -> Vec<SelectedFileView> {
        self.draft()
            .files
            .iter()
            .map(|selected| SelectedFileView {
                name: selected.file.name.clone(),
                content_type: selected.file.content_type.clone(),
                preview_url: selected.preview.url().to_string(),
            })
            .collect()
    }

    pub fn file_count(&self) -> usize {
        self.draft().files.len()
    }

    /// Clear the draft and release every preview.
    pub fn reset(&self) {
        let mut draft = self.draft();
        *draft = DraftPost::default();
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Registry of this composer's previews.
    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    /// Best-effort cancellation of the in-flight submission. Returns whether
    /// there was one.
    pub fn cancel_submit(&self) -> bool {
        match self.in_flight_token().as_ref() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Validate and publish the draft.
    pub async fn submit(&self) -> SubmitOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.submitting) else {
            debug!("Submit ignored, another submission is in flight");
            return SubmitOutcome::AlreadySubmitting;
        };

        let (request, submitted) = match self.publish_request() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                debug!(reason = %e, "Draft rejected");
                return SubmitOutcome::Invalid(e);
            }
        };

        let cancel = CancellationToken::new();
        *self.in_flight_token() = Some(cancel.clone());
        let result = self.orchestrator.publish(&request, &cancel).await;
        *self.in_flight_token() = None;

        match result {
            Ok(post) => {
                info!(post_id = %post.id, "Draft published");
                self.clear_submitted(&request, &submitted);
                self.notifier.notify(Notification::success(PUBLISHED_MESSAGE));
                SubmitOutcome::Published(post)
            }
            Err(e) => {
                error!(
                    error = %e,
                    orphaned_post = ?e.orphaned_post(),
                    "Failed to publish draft"
                );
                self.notifier.notify(Notification::error(PUBLISH_FAILED_MESSAGE));
                SubmitOutcome::Failed(e)
            }
        }
    }

    /// Snapshot the draft into a publish request, along with the preview URLs
    /// of the files it carries. The draft itself is left untouched until the
    /// publish succeeds.
    fn publish_request(&self) -> Result<(PublishRequest, Vec<String>), ComposerError> {
        let author = self.session.user_id().ok_or(ComposerError::NotSignedIn)?;

        let draft = self.draft();
        validate_title(&draft.title).map_err(|_| ComposerError::EmptyTitle)?;

        let request = PublishRequest {
            author,
            title: draft.title.clone(),
            content: draft.content.clone(),
            files: draft.files.iter().map(|selected| selected.file.clone()).collect(),
        };
        let submitted = draft
            .files
            .iter()
            .map(|selected| selected.preview.url().to_string())
            .collect();
        Ok((request, submitted))
    }

    /// Clear what a successful publish sent. Edits and files made while the
    /// submission was in flight stay in the draft.
    fn clear_submitted(&self, request: &PublishRequest, submitted: &[String]) {
        let mut draft = self.draft();
        if draft.title == request.title {
            draft.title.clear();
        }
        if draft.content == request.content {
            draft.content.clear();
        }
        draft
            .files
            .retain(|selected| !submitted.iter().any(|url| url == selected.preview.url()));
    }

    fn draft(&self) -> MutexGuard<'_, DraftPost> {
        self.draft.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn in_flight_token(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

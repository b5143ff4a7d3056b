//! Publishing a post with images.
//!
//! Three ordered steps:
//!
//! 1. create the post shell (no images)
//! 2. for every file, request an upload grant and PUT the bytes to it;
//!    files run concurrently and all must finish before step 3
//! 3. patch the post with the image URLs in selection order
//!
//! The post's image list is only written in step 3 and only with the full
//! list. A failure after step 1 leaves the shell behind on the backend; the
//! error names it (`PublishError::orphaned_post`) but nothing is rolled back.

use futures::future::try_join_all;
use hike_api::HikeApiError;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{CreatedPost, NewPost, UploadFile, UploadGrantRequest};
use crate::common::{PostId, UserId};
use crate::kernel::BasePostsBackend;

/// Everything needed to publish one post.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub author: UserId,
    pub title: String,
    pub content: String,
    pub files: Vec<UploadFile>,
}

/// The remote step a timeout happened in. Positions are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStep {
    CreatePost,
    UploadGrant { position: usize },
    Upload { position: usize },
    Finalize,
}

impl fmt::Display for PublishStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishStep::CreatePost => f.write_str("create post"),
            PublishStep::UploadGrant { position } => write!(f, "upload grant for image {}", position),
            PublishStep::Upload { position } => write!(f, "upload of image {}", position),
            PublishStep::Finalize => f.write_str("finalize post"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Invalid post: {0}")]
    Validation(String),

    #[error("Failed to create post: {0}")]
    CreateFailed(#[source] HikeApiError),

    #[error("Failed to upload image {position} of post {post_id}: {source}")]
    UploadFailed {
        post_id: PostId,
        position: usize,
        #[source]
        source: HikeApiError,
    },

    #[error("Failed to attach images to post {post_id}: {source}")]
    FinalizeFailed {
        post_id: PostId,
        #[source]
        source: HikeApiError,
    },

    #[error("Timed out during {step}")]
    Timeout {
        step: PublishStep,
        post_id: Option<PostId>,
    },

    #[error("Publishing cancelled")]
    Cancelled { post_id: Option<PostId> },
}

impl PublishError {
    /// The post shell left on the backend without its images, if the
    /// failure happened after creation.
    pub fn orphaned_post(&self) -> Option<&PostId> {
        match self {
            PublishError::UploadFailed { post_id, .. } | PublishError::FinalizeFailed { post_id, .. } => {
                Some(post_id)
            }
            PublishError::Timeout { post_id, .. } | PublishError::Cancelled { post_id } => {
                post_id.as_ref()
            }
            PublishError::Validation(_) | PublishError::CreateFailed(_) => None,
        }
    }
}

/// Title must be non-empty after trimming. Content and images are optional.
pub fn validate_title(title: &str) -> Result<(), PublishError> {
    if title.trim().is_empty() {
        return Err(PublishError::Validation("Title is required".to_string()));
    }
    Ok(())
}

/// Name under which image `position` (1-based) of a post is stored.
pub fn upload_filename(post_id: &PostId, position: usize, file: &UploadFile) -> String {
    match file.extension() {
        Some(ext) => format!("{}-{}.{}", post_id, position, ext),
        None => format!("{}-{}", post_id, position),
    }
}

#[derive(Clone)]
pub struct UploadOrchestrator {
    backend: Arc<dyn BasePostsBackend>,
    step_timeout: Duration,
}

impl UploadOrchestrator {
    pub fn new(backend: Arc<dyn BasePostsBackend>, step_timeout: Duration) -> Self {
        Self {
            backend,
            step_timeout,
        }
    }

    /// Publish a post and its images. Not idempotent: every call that gets
    /// past validation creates a new post shell.
    pub async fn publish(
        &self,
        request: &PublishRequest,
        cancel: &CancellationToken,
    ) -> Result<CreatedPost, PublishError> {
        validate_title(&request.title)?;

        info!(
            author = %request.author,
            image_count = request.files.len(),
            "Publishing post"
        );

        let new_post = NewPost {
            author: request.author.clone(),
            title: request.title.trim().to_string(),
            content: request.content.clone(),
        };
        let shell = self
            .step(PublishStep::CreatePost, None, cancel, self.backend.create_post(&new_post))
            .await?
            .map_err(PublishError::CreateFailed)?;
        debug!(post_id = %shell.id, "Post shell created");

        match self.attach_images(&shell.id, request, cancel).await {
            Ok(images) => {
                info!(post_id = %shell.id, image_count = images.len(), "Post published");
                Ok(CreatedPost { images, ..shell })
            }
            Err(e) => {
                if let Some(post_id) = e.orphaned_post() {
                    warn!(
                        post_id = %post_id,
                        error = %e,
                        "Post shell left on backend without images"
                    );
                }
                Err(e)
            }
        }
    }

    /// Steps 2 and 3. Returns the image URLs in selection order.
    async fn attach_images(
        &self,
        post_id: &PostId,
        request: &PublishRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, PublishError> {
        if request.files.is_empty() {
            return Ok(Vec::new());
        }

        // try_join_all yields results in input order and drops the
        // remaining uploads on the first error.
        let uploads = request
            .files
            .iter()
            .enumerate()
            .map(|(idx, file)| self.upload_one(&request.author, post_id, idx + 1, file, cancel));
        let images = try_join_all(uploads).await?;

        self.step(
            PublishStep::Finalize,
            Some(post_id),
            cancel,
            self.backend.finalize_post(post_id, &images),
        )
        .await?
        .map_err(|source| PublishError::FinalizeFailed {
            post_id: post_id.clone(),
            source,
        })?;

        Ok(images)
    }

    async fn upload_one(
        &self,
        author: &UserId,
        post_id: &PostId,
        position: usize,
        file: &UploadFile,
        cancel: &CancellationToken,
    ) -> Result<String, PublishError> {
        let upload_failed = |source| PublishError::UploadFailed {
            post_id: post_id.clone(),
            position,
            source,
        };

        let grant_request = UploadGrantRequest {
            author: author.clone(),
            post_id: post_id.clone(),
            filename: upload_filename(post_id, position, file),
            filetype: file.content_type.clone(),
        };
        let grant = self
            .step(
                PublishStep::UploadGrant { position },
                Some(post_id),
                cancel,
                self.backend.request_upload_grant(&grant_request),
            )
            .await?
            .map_err(upload_failed)?;

        self.step(
            PublishStep::Upload { position },
            Some(post_id),
            cancel,
            self.backend.upload_file(&grant, file),
        )
        .await?
        .map_err(upload_failed)?;

        debug!(
            post_id = %post_id,
            position,
            filename = %grant_request.filename,
            bytes = file.bytes.len(),
            "Image uploaded"
        );
        Ok(grant.public_url())
    }

    /// Run one remote call under the step timeout and the cancellation
    /// token. The outer error is timeout/cancellation, the inner one is
    /// the call's own failure.
    async fn step<T, F>(
        &self,
        step: PublishStep,
        post_id: Option<&PostId>,
        cancel: &CancellationToken,
        call: F,
    ) -> Result<hike_api::Result<T>, PublishError>
    where
        F: Future<Output = hike_api::Result<T>>,
    {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(PublishError::Cancelled {
                post_id: post_id.cloned(),
            }),
            result = tokio::time::timeout(self.step_timeout, call) => {
                result.map_err(|_| PublishError::Timeout {
                    step,
                    post_id: post_id.cloned(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_title_is_rejected() {
        assert!(matches!(validate_title("   "), Err(PublishError::Validation(_))));
        assert!(validate_title(" Trip ").is_ok());
    }

    #[test]
    fn upload_filename_carries_post_id_and_position() {
        let post_id = PostId::from("p1");
        let jpg = UploadFile::new("Beach.JPG", "image/jpeg", vec![1u8]);
        let bare = UploadFile::new("scan", "image/png", vec![1u8]);

        assert_eq!(upload_filename(&post_id, 1, &jpg), "p1-1.jpg");
        assert_eq!(upload_filename(&post_id, 2, &bare), "p1-2");
    }

    #[test]
    fn orphaned_post_only_after_creation() {
        let post_id = PostId::from("p1");
        let api_error = || HikeApiError::Api {
            status: 500,
            message: "boom".into(),
        };

        assert_eq!(PublishError::CreateFailed(api_error()).orphaned_post(), None);
        assert_eq!(
            PublishError::UploadFailed {
                post_id: post_id.clone(),
                position: 1,
                source: api_error(),
            }
            .orphaned_post(),
            Some(&post_id)
        );
        assert_eq!(
            PublishError::Timeout {
                step: PublishStep::CreatePost,
                post_id: None,
            }
            .orphaned_post(),
            None
        );
    }
}

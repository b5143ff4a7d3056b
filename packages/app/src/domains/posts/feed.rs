//! Post feed: the read side.

use hike_api::HikeApiError;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

use super::PublishedPost;
use crate::common::{BaseNotifier, Notification, PostId, UserId};
use crate::kernel::{AppKernel, BasePostsBackend};

#[derive(Debug, Default)]
struct FeedState {
    posts: Vec<PublishedPost>,
    loading: bool,
    error: Option<String>,
    liked: HashSet<PostId>,
}

/// Published posts for one viewer, as last fetched.
pub struct PostFeed {
    backend: Arc<dyn BasePostsBackend>,
    notifier: Arc<dyn BaseNotifier>,
    state: Mutex<FeedState>,
}

impl PostFeed {
    pub fn new(kernel: &AppKernel) -> Self {
        Self {
            backend: kernel.posts.clone(),
            notifier: kernel.notifier.clone(),
            state: Mutex::new(FeedState::default()),
        }
    }

    /// Replace the held posts with a fresh fetch. On failure the previous
    /// posts stay and `error()` carries the message.
    pub async fn refresh(&self, viewer: &UserId) -> Result<usize, HikeApiError> {
        self.state().loading = true;

        let result = self.backend.fetch_posts(viewer).await;

        let mut state = self.state();
        state.loading = false;
        match result {
            Ok(posts) => {
                debug!(viewer = %viewer, count = posts.len(), "Feed refreshed");
                let count = posts.len();
                state.posts = posts;
                state.error = None;
                Ok(count)
            }
            Err(e) => {
                warn!(viewer = %viewer, error = %e, "Failed to fetch posts");
                state.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Delete a post remotely, then drop it from the held posts.
    ///
    /// Nothing is removed before the backend confirms, so a failed delete
    /// leaves the feed as it was.
    pub async fn delete(&self, post_id: &PostId) -> Result<(), HikeApiError> {
        match self.backend.delete_post(post_id).await {
            Ok(()) => {
                {
                    let mut state = self.state();
                    state.posts.retain(|post| &post.id != post_id);
                    state.liked.remove(post_id);
                }
                debug!(post_id = %post_id, "Post deleted");
                self.notifier.notify(Notification::success("Post deleted"));
                Ok(())
            }
            Err(e) => {
                warn!(post_id = %post_id, error = %e, "Failed to delete post");
                self.notifier.notify(
                    Notification::error("Failed to delete post").with_description(e.user_message()),
                );
                Err(e)
            }
        }
    }

    /// Flip the local like mark of a post. Returns the new state.
    pub fn toggle_like(&self, post_id: &PostId) -> bool {
        let mut state = self.state();
        if state.liked.remove(post_id) {
            false
        } else {
            state.liked.insert(post_id.clone());
            true
        }
    }

    pub fn is_liked(&self, post_id: &PostId) -> bool {
        self.state().liked.contains(post_id)
    }

    pub fn posts(&self) -> Vec<PublishedPost> {
        self.state().posts.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    fn state(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

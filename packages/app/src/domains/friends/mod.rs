//! Friends page: friends, incoming requests, recommendations.

mod models;

pub use models::{FriendRequest, FriendRequestStatus, FriendsOverview};

use hike_api::HikeApiError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::{debug, warn};

use crate::common::{BaseNotifier, FriendRequestId, Notification, UserId, UserProfile};
use crate::domains::session::Session;
use crate::kernel::{AppKernel, BaseFriendsBackend};

#[derive(Debug, Error)]
pub enum FriendsError {
    #[error("Not signed in")]
    NotSignedIn,

    #[error(transparent)]
    Api(#[from] HikeApiError),
}

#[derive(Debug, Default)]
struct FriendsState {
    overview: FriendsOverview,
    loading: bool,
}

pub struct FriendsPage {
    backend: Arc<dyn BaseFriendsBackend>,
    notifier: Arc<dyn BaseNotifier>,
    session: Session,
    state: Mutex<FriendsState>,
}

impl FriendsPage {
    pub fn new(kernel: &AppKernel, session: Session) -> Self {
        Self {
            backend: kernel.friends.clone(),
            notifier: kernel.notifier.clone(),
            session,
            state: Mutex::new(FriendsState {
                overview: FriendsOverview::default(),
                loading: true,
            }),
        }
    }

    /// Fetch everything again. Only requests addressed to the signed-in
    /// user are kept.
    pub async fn refresh(&self) -> Result<(), FriendsError> {
        let user_id = self.user_id()?;

        let result = self.backend.overview(&user_id).await;

        let mut state = self.state();
        state.loading = false;
        match result {
            Ok(mut overview) => {
                overview.requests.retain(|request| request.receiver.id == user_id);
                debug!(
                    friends = overview.friends.len(),
                    requests = overview.requests.len(),
                    recommended = overview.recommended.len(),
                    "Friends refreshed"
                );
                state.overview = overview;
                Ok(())
            }
            Err(e) => {
                drop(state);
                warn!(error = %e, "Failed to load friends");
                self.notifier.notify(
                    Notification::error("Error")
                        .with_description("Failed to load friends data. Please try again."),
                );
                Err(e.into())
            }
        }
    }

    pub async fn send_request(&self, receiver: &UserId) -> Result<(), FriendsError> {
        let sender = self.user_id()?;

        if let Err(e) = self.backend.send_request(&sender, receiver).await {
            return Err(self.failed("Failed to send friend request.", e));
        }

        self.state()
            .overview
            .recommended
            .retain(|user| &user.id != receiver);
        self.succeeded("Friend request sent successfully!").await;
        Ok(())
    }

    pub async fn accept(&self, request_id: &FriendRequestId) -> Result<(), FriendsError> {
        self.user_id()?;

        if let Err(e) = self.backend.accept_request(request_id).await {
            return Err(self.failed("Failed to accept friend request.", e));
        }

        self.state()
            .overview
            .requests
            .retain(|request| &request.id != request_id);
        self.succeeded("Friend request accepted!").await;
        Ok(())
    }

    pub async fn reject(&self, request_id: &FriendRequestId) -> Result<(), FriendsError> {
        self.user_id()?;

        if let Err(e) = self.backend.reject_request(request_id).await {
            return Err(self.failed("Failed to reject friend request.", e));
        }

        self.state()
            .overview
            .requests
            .retain(|request| &request.id != request_id);
        self.succeeded("Friend request rejected.").await;
        Ok(())
    }

    pub async fn remove_friend(&self, friend_id: &UserId) -> Result<(), FriendsError> {
        let user_id = self.user_id()?;

        if let Err(e) = self.backend.remove_friend(&user_id, friend_id).await {
            return Err(self.failed("Failed to remove friend.", e));
        }

        self.state()
            .overview
            .friends
            .retain(|friend| &friend.id != friend_id);
        self.succeeded("Friend removed successfully.").await;
        Ok(())
    }

    pub fn friends(&self) -> Vec<UserProfile> {
        self.state().overview.friends.clone()
    }

    pub fn requests(&self) -> Vec<FriendRequest> {
        self.state().overview.requests.clone()
    }

    pub fn recommended(&self) -> Vec<UserProfile> {
        self.state().overview.recommended.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    /// Notify, then refresh. A failed refresh has already notified on its own.
    async fn succeeded(&self, message: &str) {
        self.notifier
            .notify(Notification::success("Success").with_description(message));
        let _ = self.refresh().await;
    }

    fn failed(&self, message: &str, e: HikeApiError) -> FriendsError {
        warn!(error = %e, "{}", message);
        let description = e.backend_message().unwrap_or_else(|| message.to_string());
        self.notifier
            .notify(Notification::error("Error").with_description(description));
        e.into()
    }

    fn user_id(&self) -> Result<UserId, FriendsError> {
        self.session.user_id().ok_or(FriendsError::NotSignedIn)
    }

    fn state(&self) -> MutexGuard<'_, FriendsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only: one method per backend call, no
// sequencing. Workflows (publishing a post, uploading a profile picture)
// are domain code that uses these traits.
//
// Naming convention: Base* for trait names (e.g., BasePostsBackend)

use async_trait::async_trait;
use hike_api::Result;

use crate::common::{FriendRequestId, PostId, UserId, UserProfile};
use crate::domains::friends::FriendsOverview;
use crate::domains::posts::{
    CreatedPost, NewPost, PublishedPost, UploadFile, UploadGrant, UploadGrantRequest,
};

// =============================================================================
// Posts
// =============================================================================

#[async_trait]
pub trait BasePostsBackend: Send + Sync {
    /// Create a post shell with an empty image list
    async fn create_post(&self, post: &NewPost) -> Result<CreatedPost>;

    /// Request a single-use upload target for one image
    async fn request_upload_grant(&self, request: &UploadGrantRequest) -> Result<UploadGrant>;

    /// Transfer file bytes directly to a granted target
    async fn upload_file(&self, grant: &UploadGrant, file: &UploadFile) -> Result<()>;

    /// Attach the ordered image URLs to a post
    async fn finalize_post(&self, post_id: &PostId, images: &[String]) -> Result<()>;

    async fn delete_post(&self, post_id: &PostId) -> Result<()>;

    /// Posts visible to a viewer
    async fn fetch_posts(&self, viewer: &UserId) -> Result<Vec<PublishedPost>>;
}

// =============================================================================
// Auth
// =============================================================================

#[async_trait]
pub trait BaseAuthBackend: Send + Sync {
    async fn register(&self, name: &str, email: &str, password: &str) -> Result<UserProfile>;

    async fn login(&self, email: &str, password: &str) -> Result<UserProfile>;

    async fn logout(&self, user_id: &UserId) -> Result<()>;
}

// =============================================================================
// Friends
// =============================================================================

#[async_trait]
pub trait BaseFriendsBackend: Send + Sync {
    /// Friends, all friend requests involving the user, recommendations
    async fn overview(&self, user_id: &UserId) -> Result<FriendsOverview>;

    async fn send_request(&self, sender: &UserId, receiver: &UserId) -> Result<()>;

    async fn accept_request(&self, request_id: &FriendRequestId) -> Result<()>;

    async fn reject_request(&self, request_id: &FriendRequestId) -> Result<()>;

    async fn remove_friend(&self, user_id: &UserId, friend_id: &UserId) -> Result<()>;
}

// =============================================================================
// Profile
// =============================================================================

#[async_trait]
pub trait BaseProfileBackend: Send + Sync {
    /// Update name and email, returning the backend's confirmation message
    async fn update_details(&self, user_id: &UserId, name: &str, email: &str) -> Result<Option<String>>;

    async fn request_upload_grant(&self, user_id: &UserId, filename: &str, filetype: &str) -> Result<UploadGrant>;

    async fn upload_file(&self, grant: &UploadGrant, file: &UploadFile) -> Result<()>;

    /// Point the profile picture at an uploaded object, returning the updated user
    async fn confirm_picture(&self, user_id: &UserId, picture_url: &str) -> Result<UserProfile>;
}

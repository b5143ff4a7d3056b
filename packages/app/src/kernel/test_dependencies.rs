// TestDependencies - mock implementations for testing
//
// In-memory backends that can be injected into AppKernel for tests. Each
// mock records its calls and can be told to fail or stall specific steps.
// Locks are never held across an await.

use async_trait::async_trait;
use hike_api::{HikeApiError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{AppKernel, BaseAuthBackend, BaseFriendsBackend, BasePostsBackend, BaseProfileBackend};
use crate::common::{BaseNotifier, FriendRequestId, Notification, PostId, UserId, UserProfile};
use crate::domains::friends::FriendsOverview;
use crate::domains::posts::{
    CreatedPost, NewPost, PublishedPost, UploadFile, UploadGrant, UploadGrantRequest,
};

/// Base of every storage URL the mocks hand out.
pub const MOCK_STORAGE_URL: &str = "https://storage.test";

fn backend_error(status: u16, message: &str) -> HikeApiError {
    HikeApiError::Api {
        status,
        message: serde_json::json!({ "message": message }).to_string(),
    }
}

async fn stall(delay: Option<Duration>) {
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
}

// =============================================================================
// Mock Posts Backend
// =============================================================================

/// A call the posts backend received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostsCall {
    CreatePost { title: String, content: String },
    UploadGrant { filename: String, filetype: String },
    Upload { name: String, upload_url: String },
    Finalize { post_id: PostId, images: Vec<String> },
    Delete(PostId),
    Fetch(UserId),
}

#[derive(Default)]
pub struct MockPostsBackend {
    posts: Arc<Mutex<Vec<PublishedPost>>>,
    calls: Arc<Mutex<Vec<PostsCall>>>,
    stored_objects: Arc<Mutex<Vec<String>>>,
    next_id: AtomicU64,
    create_delay: Option<Duration>,
    upload_delays: HashMap<String, Duration>,
    fail_create: bool,
    fail_grant_for: Option<String>,
    fail_upload_of: Option<String>,
    fail_finalize: bool,
    fail_delete: bool,
    fail_fetch: bool,
}

impl MockPostsBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a post that fetches will return
    pub fn with_post(self, post: PublishedPost) -> Self {
        self.posts.lock().unwrap().push(post);
        self
    }

    /// Delay post creation
    pub fn with_create_delay(mut self, delay: Duration) -> Self {
        self.create_delay = Some(delay);
        self
    }

    /// Delay the PUT of the file with this display name
    pub fn with_upload_delay(mut self, file_name: &str, delay: Duration) -> Self {
        self.upload_delays.insert(file_name.to_string(), delay);
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    /// Refuse the upload grant for this generated filename (e.g. "post-1-2.jpg")
    pub fn failing_grant_for(mut self, filename: &str) -> Self {
        self.fail_grant_for = Some(filename.to_string());
        self
    }

    /// Reject the PUT of the file with this display name
    pub fn failing_upload_of(mut self, file_name: &str) -> Self {
        self.fail_upload_of = Some(file_name.to_string());
        self
    }

    pub fn failing_finalize(mut self) -> Self {
        self.fail_finalize = true;
        self
    }

    pub fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub fn failing_fetch(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    /// Every call received, in order
    pub fn calls(&self) -> Vec<PostsCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of posts created so far
    pub fn create_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, PostsCall::CreatePost { .. }))
            .count()
    }

    /// Finalize calls received, as (post, images)
    pub fn finalize_calls(&self) -> Vec<(PostId, Vec<String>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PostsCall::Finalize { post_id, images } => Some((post_id, images)),
                _ => None,
            })
            .collect()
    }

    /// Public URLs of objects whose upload completed, in completion order
    pub fn stored_objects(&self) -> Vec<String> {
        self.stored_objects.lock().unwrap().clone()
    }

    /// Current state of a stored post
    pub fn post(&self, post_id: &PostId) -> Option<PublishedPost> {
        self.posts
            .lock()
            .unwrap()
            .iter()
            .find(|post| &post.id == post_id)
            .cloned()
    }

    fn record(&self, call: PostsCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl BasePostsBackend for MockPostsBackend {
    async fn create_post(&self, post: &NewPost) -> Result<CreatedPost> {
        self.record(PostsCall::CreatePost {
            title: post.title.clone(),
            content: post.content.clone(),
        });
        stall(self.create_delay).await;

        if self.fail_create {
            return Err(backend_error(500, "Failed to create post"));
        }

        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let id = PostId::new(format!("post-{}", n));
        self.posts.lock().unwrap().push(PublishedPost {
            id: id.clone(),
            author: Some(UserProfile::new(post.author.clone())),
            title: post.title.clone(),
            content: post.content.clone(),
            images: Vec::new(),
            created_at: None,
            like_count: 0,
            comment_count: 0,
            comments: Vec::new(),
        });

        Ok(CreatedPost {
            id,
            title: post.title.clone(),
            content: post.content.clone(),
            images: Vec::new(),
        })
    }

    async fn request_upload_grant(&self, request: &UploadGrantRequest) -> Result<UploadGrant> {
        self.record(PostsCall::UploadGrant {
            filename: request.filename.clone(),
            filetype: request.filetype.clone(),
        });

        if self.fail_grant_for.as_deref() == Some(request.filename.as_str()) {
            return Err(backend_error(500, "Could not sign upload"));
        }

        Ok(UploadGrant::new(format!(
            "{}/{}?signature=abc",
            MOCK_STORAGE_URL, request.filename
        )))
    }

    async fn upload_file(&self, grant: &UploadGrant, file: &UploadFile) -> Result<()> {
        self.record(PostsCall::Upload {
            name: file.name.clone(),
            upload_url: grant.upload_url.clone(),
        });
        stall(self.upload_delays.get(&file.name).copied()).await;

        if self.fail_upload_of.as_deref() == Some(file.name.as_str()) {
            return Err(HikeApiError::Api {
                status: 403,
                message: "SignatureDoesNotMatch".to_string(),
            });
        }

        self.stored_objects.lock().unwrap().push(grant.public_url());
        Ok(())
    }

    async fn finalize_post(&self, post_id: &PostId, images: &[String]) -> Result<()> {
        self.record(PostsCall::Finalize {
            post_id: post_id.clone(),
            images: images.to_vec(),
        });

        if self.fail_finalize {
            return Err(backend_error(500, "Failed to update post"));
        }

        let mut posts = self.posts.lock().unwrap();
        match posts.iter_mut().find(|post| &post.id == post_id) {
            Some(post) => {
                post.images = images.to_vec();
                Ok(())
            }
            None => Err(backend_error(404, "Post not found")),
        }
    }

    async fn delete_post(&self, post_id: &PostId) -> Result<()> {
        self.record(PostsCall::Delete(post_id.clone()));

        if self.fail_delete {
            return Err(backend_error(500, "Failed to delete post"));
        }

        self.posts.lock().unwrap().retain(|post| &post.id != post_id);
        Ok(())
    }

    async fn fetch_posts(&self, viewer: &UserId) -> Result<Vec<PublishedPost>> {
        self.record(PostsCall::Fetch(viewer.clone()));

        if self.fail_fetch {
            return Err(backend_error(500, "Failed to fetch posts"));
        }

        Ok(self.posts.lock().unwrap().clone())
    }
}

// =============================================================================
// Mock Auth Backend
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthCall {
    Register { name: String, email: String },
    Login { email: String },
    Logout(UserId),
}

struct Account {
    password: String,
    user: UserProfile,
}

#[derive(Default)]
pub struct MockAuthBackend {
    accounts: Arc<Mutex<HashMap<String, Account>>>,
    calls: Arc<Mutex<Vec<AuthCall>>>,
    next_id: AtomicU64,
    fail_logout: bool,
}

impl MockAuthBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an existing account
    pub fn with_account(self, email: &str, password: &str, user: UserProfile) -> Self {
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                user,
            },
        );
        self
    }

    pub fn failing_logout(mut self) -> Self {
        self.fail_logout = true;
        self
    }

    pub fn calls(&self) -> Vec<AuthCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: AuthCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl BaseAuthBackend for MockAuthBackend {
    async fn register(&self, name: &str, email: &str, password: &str) -> Result<UserProfile> {
        self.record(AuthCall::Register {
            name: name.to_string(),
            email: email.to_string(),
        });

        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(email) {
            return Err(backend_error(400, "User already exists"));
        }

        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let user = UserProfile::new(format!("user-{}", n))
            .with_name(name)
            .with_email(email);
        accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                user: user.clone(),
            },
        );
        Ok(user)
    }

    async fn login(&self, email: &str, password: &str) -> Result<UserProfile> {
        self.record(AuthCall::Login {
            email: email.to_string(),
        });

        let accounts = self.accounts.lock().unwrap();
        match accounts.get(email) {
            Some(account) if account.password == password => Ok(account.user.clone()),
            _ => Err(HikeApiError::Rejected("Invalid credentials".to_string())),
        }
    }

    async fn logout(&self, user_id: &UserId) -> Result<()> {
        self.record(AuthCall::Logout(user_id.clone()));

        if self.fail_logout {
            return Err(backend_error(500, "Logout failed"));
        }
        Ok(())
    }
}

// =============================================================================
// Mock Friends Backend
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FriendsCall {
    Overview(UserId),
    Send { sender: UserId, receiver: UserId },
    Accept(FriendRequestId),
    Reject(FriendRequestId),
    Remove { user_id: UserId, friend_id: UserId },
}

/// Keeps one overview and applies mutations to it the way the backend would.
#[derive(Default)]
pub struct MockFriendsBackend {
    overview: Arc<Mutex<FriendsOverview>>,
    calls: Arc<Mutex<Vec<FriendsCall>>>,
    fail_overview: bool,
    fail_mutations_with: Option<String>,
}

impl MockFriendsBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overview(self, overview: FriendsOverview) -> Self {
        *self.overview.lock().unwrap() = overview;
        self
    }

    pub fn failing_overview(mut self) -> Self {
        self.fail_overview = true;
        self
    }

    /// Every send/accept/reject/remove fails with this backend message
    pub fn failing_mutations_with(mut self, message: &str) -> Self {
        self.fail_mutations_with = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<FriendsCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: FriendsCall) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match &self.fail_mutations_with {
            Some(message) => Err(backend_error(400, message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BaseFriendsBackend for MockFriendsBackend {
    async fn overview(&self, user_id: &UserId) -> Result<FriendsOverview> {
        self.calls
            .lock()
            .unwrap()
            .push(FriendsCall::Overview(user_id.clone()));

        if self.fail_overview {
            return Err(backend_error(500, "Failed to load friends"));
        }
        Ok(self.overview.lock().unwrap().clone())
    }

    async fn send_request(&self, sender: &UserId, receiver: &UserId) -> Result<()> {
        self.record(FriendsCall::Send {
            sender: sender.clone(),
            receiver: receiver.clone(),
        })?;

        self.overview
            .lock()
            .unwrap()
            .recommended
            .retain(|user| &user.id != receiver);
        Ok(())
    }

    async fn accept_request(&self, request_id: &FriendRequestId) -> Result<()> {
        self.record(FriendsCall::Accept(request_id.clone()))?;

        let mut overview = self.overview.lock().unwrap();
        if let Some(pos) = overview.requests.iter().position(|r| &r.id == request_id) {
            let request = overview.requests.remove(pos);
            overview.friends.push(request.sender);
        }
        Ok(())
    }

    async fn reject_request(&self, request_id: &FriendRequestId) -> Result<()> {
        self.record(FriendsCall::Reject(request_id.clone()))?;

        self.overview
            .lock()
            .unwrap()
            .requests
            .retain(|request| &request.id != request_id);
        Ok(())
    }

    async fn remove_friend(&self, user_id: &UserId, friend_id: &UserId) -> Result<()> {
        self.record(FriendsCall::Remove {
            user_id: user_id.clone(),
            friend_id: friend_id.clone(),
        })?;

        self.overview
            .lock()
            .unwrap()
            .friends
            .retain(|friend| &friend.id != friend_id);
        Ok(())
    }
}

// =============================================================================
// Mock Profile Backend
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileCall {
    UpdateDetails { name: String, email: String },
    UploadGrant { filename: String, filetype: String },
    Upload { upload_url: String },
    Confirm { picture_url: String },
}

#[derive(Default)]
pub struct MockProfileBackend {
    users: Arc<Mutex<HashMap<UserId, UserProfile>>>,
    calls: Arc<Mutex<Vec<ProfileCall>>>,
    upload_delay: Option<Duration>,
    fail_update: bool,
    fail_upload: bool,
}

impl MockProfileBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user: UserProfile) -> Self {
        self.users.lock().unwrap().insert(user.id.clone(), user);
        self
    }

    pub fn with_upload_delay(mut self, delay: Duration) -> Self {
        self.upload_delay = Some(delay);
        self
    }

    pub fn failing_update(mut self) -> Self {
        self.fail_update = true;
        self
    }

    pub fn failing_upload(mut self) -> Self {
        self.fail_upload = true;
        self
    }

    pub fn calls(&self) -> Vec<ProfileCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn user(&self, user_id: &UserId) -> Option<UserProfile> {
        self.users.lock().unwrap().get(user_id).cloned()
    }

    fn record(&self, call: ProfileCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl BaseProfileBackend for MockProfileBackend {
    async fn update_details(&self, user_id: &UserId, name: &str, email: &str) -> Result<Option<String>> {
        self.record(ProfileCall::UpdateDetails {
            name: name.to_string(),
            email: email.to_string(),
        });

        if self.fail_update {
            return Err(HikeApiError::Rejected("Email already in use".to_string()));
        }

        let mut users = self.users.lock().unwrap();
        let user = users
            .entry(user_id.clone())
            .or_insert_with(|| UserProfile::new(user_id.clone()));
        user.name = Some(name.to_string());
        user.email = Some(email.to_string());
        Ok(Some("User updated successfully".to_string()))
    }

    async fn request_upload_grant(&self, user_id: &UserId, filename: &str, filetype: &str) -> Result<UploadGrant> {
        self.record(ProfileCall::UploadGrant {
            filename: filename.to_string(),
            filetype: filetype.to_string(),
        });

        Ok(UploadGrant::new(format!(
            "{}/profile/{}/{}?signature=abc",
            MOCK_STORAGE_URL, user_id, filename
        )))
    }

    async fn upload_file(&self, grant: &UploadGrant, _file: &UploadFile) -> Result<()> {
        self.record(ProfileCall::Upload {
            upload_url: grant.upload_url.clone(),
        });
        stall(self.upload_delay).await;

        if self.fail_upload {
            return Err(HikeApiError::Api {
                status: 403,
                message: "SignatureDoesNotMatch".to_string(),
            });
        }
        Ok(())
    }

    async fn confirm_picture(&self, user_id: &UserId, picture_url: &str) -> Result<UserProfile> {
        self.record(ProfileCall::Confirm {
            picture_url: picture_url.to_string(),
        });

        let mut users = self.users.lock().unwrap();
        let user = users
            .entry(user_id.clone())
            .or_insert_with(|| UserProfile::new(user_id.clone()));
        user.profile_pic = Some(picture_url.to_string());
        Ok(user.clone())
    }
}

// =============================================================================
// Recording Notifier
// =============================================================================

#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered, in order
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<Notification> {
        self.notifications()
            .into_iter()
            .filter(Notification::is_error)
            .collect()
    }

    pub fn successes(&self) -> Vec<Notification> {
        self.notifications()
            .into_iter()
            .filter(|n| !n.is_error())
            .collect()
    }

    pub fn clear(&self) {
        self.notifications.lock().unwrap().clear();
    }
}

impl BaseNotifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub posts: Arc<MockPostsBackend>,
    pub auth: Arc<MockAuthBackend>,
    pub friends: Arc<MockFriendsBackend>,
    pub profile: Arc<MockProfileBackend>,
    pub notifier: Arc<RecordingNotifier>,
    pub step_timeout: Duration,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            posts: Arc::new(MockPostsBackend::new()),
            auth: Arc::new(MockAuthBackend::new()),
            friends: Arc::new(MockFriendsBackend::new()),
            profile: Arc::new(MockProfileBackend::new()),
            notifier: Arc::new(RecordingNotifier::new()),
            step_timeout: Duration::from_secs(30),
        }
    }

    /// Set a mock posts backend
    pub fn mock_posts(mut self, posts: MockPostsBackend) -> Self {
        self.posts = Arc::new(posts);
        self
    }

    /// Set a mock auth backend
    pub fn mock_auth(mut self, auth: MockAuthBackend) -> Self {
        self.auth = Arc::new(auth);
        self
    }

    /// Set a mock friends backend
    pub fn mock_friends(mut self, friends: MockFriendsBackend) -> Self {
        self.friends = Arc::new(friends);
        self
    }

    /// Set a mock profile backend
    pub fn mock_profile(mut self, profile: MockProfileBackend) -> Self {
        self.profile = Arc::new(profile);
        self
    }

    /// Bound for each remote step of a workflow
    pub fn step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout = timeout;
        self
    }

    /// Convert into an AppKernel for testing. The mocks stay reachable
    /// through `self` for assertions.
    pub fn into_kernel(&self) -> Arc<AppKernel> {
        Arc::new(AppKernel::new(
            self.posts.clone(),
            self.auth.clone(),
            self.friends.clone(),
            self.profile.clone(),
            self.notifier.clone(),
            self.step_timeout,
        ))
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}

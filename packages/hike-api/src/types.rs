use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

// =============================================================================
// Users
// =============================================================================

/// A user as the backend returns it, either standalone or populated into a
/// post or friend request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "profilePic", default)]
    pub profile_pic: Option<String>,
}

/// A reference to a user that may or may not be populated.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Populated(UserRecord),
    Id(String),
}

impl UserRef {
    pub fn id(&self) -> &str {
        match self {
            UserRef::Populated(user) => &user.id,
            UserRef::Id(id) => id,
        }
    }
}

// =============================================================================
// Posts
// =============================================================================

/// Body of `POST /post`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub images: Vec<String>,
}

/// A post record as returned by create and fetch.
#[derive(Debug, Clone, Deserialize)]
pub struct PostRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "userId", default)]
    pub author: Option<UserRef>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "likesCount", default)]
    pub likes_count: Option<u64>,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub comments: Vec<CommentRef>,
}

impl PostRecord {
    /// Like count, derived from the `likes` array when the backend omits
    /// `likesCount`.
    pub fn like_count(&self) -> u64 {
        self.likes_count.unwrap_or(self.likes.len() as u64)
    }
}

/// A comment that may be populated or only referenced by id. Shapes this
/// client does not know decode as `Unknown` so they never fail the post.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CommentRef {
    Populated(CommentRecord),
    Id(String),
    Unknown(IgnoredAny),
}

/// A comment body. The author arrives as a populated `userId`, or as an
/// `author` that is either a display name or a populated user.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentRecord {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    #[serde(rename = "userId", default)]
    pub user: Option<UserRef>,
    #[serde(default)]
    pub author: Option<CommentAuthor>,
    #[serde(alias = "text")]
    pub content: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl CommentRecord {
    /// The populated author, from either field.
    pub fn author_user(&self) -> Option<&UserRecord> {
        match (&self.author, &self.user) {
            (Some(CommentAuthor::Populated(user)), _) => Some(user),
            (_, Some(UserRef::Populated(user))) => Some(user),
            _ => None,
        }
    }

    /// Name to show for the author, if one is known.
    pub fn author_name(&self) -> Option<&str> {
        match &self.author {
            Some(CommentAuthor::Name(name)) => Some(name),
            _ => self.author_user().and_then(|user| user.name.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CommentAuthor {
    Populated(UserRecord),
    Name(String),
}

/// `POST /post` answers with either the bare post or `{ post: {...} }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum CreatePostResponse {
    Wrapped { post: PostRecord },
    Bare(PostRecord),
}

impl CreatePostResponse {
    pub(crate) fn into_post(self) -> PostRecord {
        match self {
            CreatePostResponse::Wrapped { post } => post,
            CreatePostResponse::Bare(post) => post,
        }
    }
}

/// `GET /post/{userId}` answers with a bare array, `{ posts }` or `{ data }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum PostListResponse {
    List(Vec<PostRecord>),
    Posts { posts: Vec<PostRecord> },
    Data { data: Vec<PostRecord> },
}

impl PostListResponse {
    pub(crate) fn into_posts(self) -> Vec<PostRecord> {
        match self {
            PostListResponse::List(posts) => posts,
            PostListResponse::Posts { posts } => posts,
            PostListResponse::Data { data } => data,
        }
    }
}

/// Body of `POST /post/getURL`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostUploadUrlRequest {
    pub user_id: String,
    pub post_id: String,
    pub filename: String,
    pub filetype: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PostUploadUrlResponse {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

/// Body of `PATCH /post/{postId}`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct FinalizePostRequest<'a> {
    pub images: &'a [String],
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Shape shared by register and login responses.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<UserRecord>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LogoutRequest<'a> {
    pub user_id: &'a str,
}

// =============================================================================
// Friends
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendRequestStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FriendRequestRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "senderId")]
    pub sender: UserRef,
    #[serde(rename = "receiverId")]
    pub receiver: UserRef,
    pub status: FriendRequestStatus,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendsOverviewResponse {
    #[serde(default)]
    pub friends: Vec<UserRecord>,
    #[serde(default)]
    pub friend_requests: Vec<FriendRequestRecord>,
    #[serde(default)]
    pub recommended_friends: Vec<UserRecord>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SendFriendRequest<'a> {
    pub sender_id: &'a str,
    pub receiver_id: &'a str,
}

// =============================================================================
// Profile
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct UserDetails {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateUserRequest<'a> {
    pub updated_data: &'a UserDetails,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUploadUrlRequest {
    pub user_id: String,
    pub filename: String,
    pub filetype: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ProfileUploadUrlResponse {
    #[serde(rename = "profilePicUrl")]
    pub profile_pic_url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConfirmProfilePicRequest<'a> {
    pub user_id: &'a str,
    pub profile_pic_url: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ConfirmProfilePicResponse {
    pub user: UserRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn post_list_accepts_all_envelopes() {
        let post = json!({ "_id": "p1", "title": "Trip", "images": ["u1"] });

        for body in [
            json!([post.clone()]),
            json!({ "posts": [post.clone()] }),
            json!({ "data": [post.clone()] }),
        ] {
            let parsed: PostListResponse = serde_json::from_value(body).unwrap();
            let posts = parsed.into_posts();
            assert_eq!(posts.len(), 1);
            assert_eq!(posts[0].id, "p1");
            assert_eq!(posts[0].images, vec!["u1".to_string()]);
        }
    }

    #[test]
    fn post_author_may_be_populated_or_bare_id() {
        let populated: PostRecord = serde_json::from_value(json!({
            "_id": "p1",
            "userId": { "_id": "u1", "name": "Ada", "profilePic": "https://cdn/ada.png" }
        }))
        .unwrap();
        match populated.author {
            Some(UserRef::Populated(ref user)) => assert_eq!(user.name.as_deref(), Some("Ada")),
            other => panic!("expected populated author, got {:?}", other),
        }

        let bare: PostRecord =
            serde_json::from_value(json!({ "_id": "p2", "userId": "u1" })).unwrap();
        assert_eq!(bare.author.unwrap().id(), "u1");
    }

    #[test]
    fn comment_author_may_be_a_plain_name() {
        let post: PostRecord = serde_json::from_value(json!({
            "_id": "p1",
            "title": "Trip",
            "comments": [{ "author": "Ada", "content": "nice" }]
        }))
        .unwrap();

        match &post.comments[..] {
            [CommentRef::Populated(comment)] => {
                assert_eq!(comment.id, None);
                assert_eq!(comment.author_name(), Some("Ada"));
                assert!(comment.author_user().is_none());
                assert_eq!(comment.content, "nice");
            }
            other => panic!("expected one populated comment, got {:?}", other),
        }
    }

    #[test]
    fn comment_author_may_be_populated() {
        let post: PostRecord = serde_json::from_value(json!({
            "_id": "p1",
            "comments": [
                { "_id": "c1", "userId": { "_id": "u1", "name": "Bo" }, "text": "hi" },
                { "author": { "_id": "u2", "name": "Cy" }, "content": "yo" }
            ]
        }))
        .unwrap();

        let names: Vec<_> = post
            .comments
            .iter()
            .map(|comment| match comment {
                CommentRef::Populated(c) => c.author_name().map(String::from),
                other => panic!("expected populated comment, got {:?}", other),
            })
            .collect();
        assert_eq!(names, vec![Some("Bo".to_string()), Some("Cy".to_string())]);
    }

    #[test]
    fn unknown_comment_shapes_do_not_fail_the_post() {
        let list: PostListResponse = serde_json::from_value(json!([
            {
                "_id": "p1",
                "title": "Trip",
                "comments": ["c1", { "body": 42 }, 7, { "author": "Ada", "content": "nice" }]
            }
        ]))
        .unwrap();

        let posts = list.into_posts();
        assert_eq!(posts.len(), 1);
        assert!(matches!(posts[0].comments[0], CommentRef::Id(_)));
        assert!(matches!(posts[0].comments[1], CommentRef::Unknown(_)));
        assert!(matches!(posts[0].comments[2], CommentRef::Unknown(_)));
        assert!(matches!(posts[0].comments[3], CommentRef::Populated(_)));
    }

    #[test]
    fn like_count_falls_back_to_likes_array() {
        let post: PostRecord =
            serde_json::from_value(json!({ "_id": "p1", "likes": ["a", "b"] })).unwrap();
        assert_eq!(post.like_count(), 2);

        let post: PostRecord =
            serde_json::from_value(json!({ "_id": "p1", "likesCount": 7, "likes": [] })).unwrap();
        assert_eq!(post.like_count(), 7);
    }

    #[test]
    fn create_post_response_unwraps_envelope() {
        let wrapped: CreatePostResponse =
            serde_json::from_value(json!({ "post": { "_id": "p9" } })).unwrap();
        assert_eq!(wrapped.into_post().id, "p9");

        let bare: CreatePostResponse = serde_json::from_value(json!({ "_id": "p8" })).unwrap();
        assert_eq!(bare.into_post().id, "p8");
    }

    #[test]
    fn create_post_request_uses_camel_case() {
        let body = serde_json::to_value(CreatePostRequest {
            user_id: "u1".into(),
            title: "Trip".into(),
            content: "Fun".into(),
            images: vec![],
        })
        .unwrap();
        assert_eq!(
            body,
            json!({ "userId": "u1", "title": "Trip", "content": "Fun", "images": [] })
        );
    }

    #[test]
    fn friend_request_status_is_lowercase() {
        let request: FriendRequestRecord = serde_json::from_value(json!({
            "_id": "r1",
            "senderId": { "_id": "u2", "name": "Bo" },
            "receiverId": "u1",
            "status": "pending"
        }))
        .unwrap();
        assert_eq!(request.status, FriendRequestStatus::Pending);
        assert_eq!(request.receiver.id(), "u1");
    }
}

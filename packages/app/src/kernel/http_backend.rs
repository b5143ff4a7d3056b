// HttpBackend - backend traits over the Hike REST client

use async_trait::async_trait;
use hike_api::{
    CommentRecord, CommentRef, CreatePostRequest, FriendRequestRecord, FriendsOverviewResponse,
    HikeClient, LoginRequest, PostRecord, PostUploadUrlRequest, ProfileUploadUrlRequest,
    RegisterRequest, Result, UserDetails,
};

use super::{BaseAuthBackend, BaseFriendsBackend, BasePostsBackend, BaseProfileBackend};
use crate::common::{FriendRequestId, PostId, UserId, UserProfile};
use crate::domains::friends::{FriendRequest, FriendsOverview};
use crate::domains::posts::{
    Comment, CreatedPost, NewPost, PublishedPost, UploadFile, UploadGrant, UploadGrantRequest,
};

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: HikeClient,
}

impl HttpBackend {
    pub fn new(client: HikeClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BasePostsBackend for HttpBackend {
    async fn create_post(&self, post: &NewPost) -> Result<CreatedPost> {
        let record = self
            .client
            .create_post(&CreatePostRequest {
                user_id: post.author.to_string(),
                title: post.title.clone(),
                content: post.content.clone(),
                images: Vec::new(),
            })
            .await?;

        Ok(CreatedPost {
            id: PostId::new(record.id),
            title: record.title.unwrap_or_else(|| post.title.clone()),
            content: record.content.unwrap_or_else(|| post.content.clone()),
            images: record.images,
        })
    }

    async fn request_upload_grant(&self, request: &UploadGrantRequest) -> Result<UploadGrant> {
        let upload_url = self
            .client
            .request_post_upload_url(&PostUploadUrlRequest {
                user_id: request.author.to_string(),
                post_id: request.post_id.to_string(),
                filename: request.filename.clone(),
                filetype: request.filetype.clone(),
            })
            .await?;
        Ok(UploadGrant::new(upload_url))
    }

    async fn upload_file(&self, grant: &UploadGrant, file: &UploadFile) -> Result<()> {
        self.client
            .put_object(&grant.upload_url, file.bytes.clone(), &file.content_type)
            .await
    }

    async fn finalize_post(&self, post_id: &PostId, images: &[String]) -> Result<()> {
        self.client.finalize_post(post_id.as_str(), images).await
    }

    async fn delete_post(&self, post_id: &PostId) -> Result<()> {
        self.client.delete_post(post_id.as_str()).await
    }

    async fn fetch_posts(&self, viewer: &UserId) -> Result<Vec<PublishedPost>> {
        let records = self.client.fetch_posts(viewer.as_str()).await?;
        Ok(records.into_iter().map(published_post).collect())
    }
}

#[async_trait]
impl BaseAuthBackend for HttpBackend {
    async fn register(&self, name: &str, email: &str, password: &str) -> Result<UserProfile> {
        let user = self
            .client
            .register(&RegisterRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        Ok(user.into())
    }

    async fn login(&self, email: &str, password: &str) -> Result<UserProfile> {
        let user = self
            .client
            .login(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        Ok(user.into())
    }

    async fn logout(&self, user_id: &UserId) -> Result<()> {
        self.client.logout(user_id.as_str()).await
    }
}

#[async_trait]
impl BaseFriendsBackend for HttpBackend {
    async fn overview(&self, user_id: &UserId) -> Result<FriendsOverview> {
        let FriendsOverviewResponse {
            friends,
            friend_requests,
            recommended_friends,
        } = self.client.friends_overview(user_id.as_str()).await?;

        Ok(FriendsOverview {
            friends: friends.into_iter().map(UserProfile::from).collect(),
            requests: friend_requests.into_iter().map(friend_request).collect(),
            recommended: recommended_friends.into_iter().map(UserProfile::from).collect(),
        })
    }

    async fn send_request(&self, sender: &UserId, receiver: &UserId) -> Result<()> {
        self.client
            .send_friend_request(sender.as_str(), receiver.as_str())
            .await
    }

    async fn accept_request(&self, request_id: &FriendRequestId) -> Result<()> {
        self.client.accept_friend_request(request_id.as_str()).await
    }

    async fn reject_request(&self, request_id: &FriendRequestId) -> Result<()> {
        self.client.reject_friend_request(request_id.as_str()).await
    }

    async fn remove_friend(&self, user_id: &UserId, friend_id: &UserId) -> Result<()> {
        self.client
            .remove_friend(user_id.as_str(), friend_id.as_str())
            .await
    }
}

#[async_trait]
impl BaseProfileBackend for HttpBackend {
    async fn update_details(&self, user_id: &UserId, name: &str, email: &str) -> Result<Option<String>> {
        self.client
            .update_user(
                user_id.as_str(),
                &UserDetails {
                    name: name.to_string(),
                    email: email.to_string(),
                },
            )
            .await
    }

    async fn request_upload_grant(&self, user_id: &UserId, filename: &str, filetype: &str) -> Result<UploadGrant> {
        let upload_url = self
            .client
            .request_profile_upload_url(&ProfileUploadUrlRequest {
                user_id: user_id.to_string(),
                filename: filename.to_string(),
                filetype: filetype.to_string(),
            })
            .await?;
        Ok(UploadGrant::new(upload_url))
    }

    async fn upload_file(&self, grant: &UploadGrant, file: &UploadFile) -> Result<()> {
        self.client
            .put_object(&grant.upload_url, file.bytes.clone(), &file.content_type)
            .await
    }

    async fn confirm_picture(&self, user_id: &UserId, picture_url: &str) -> Result<UserProfile> {
        let user = self
            .client
            .confirm_profile_picture(user_id.as_str(), picture_url)
            .await?;
        Ok(user.into())
    }
}

fn published_post(record: PostRecord) -> PublishedPost {
    let like_count = record.like_count();
    let comment_count = record.comments.len();
    PublishedPost {
        id: PostId::new(record.id),
        author: record.author.map(UserProfile::from),
        title: record.title.unwrap_or_default(),
        content: record.content.unwrap_or_default(),
        images: record.images,
        created_at: record.created_at,
        like_count,
        comment_count,
        comments: record
            .comments
            .into_iter()
            .filter_map(|comment| match comment {
                CommentRef::Populated(c) => Some(comment_from(c)),
                // Nothing to render
                CommentRef::Id(_) | CommentRef::Unknown(_) => None,
            })
            .collect(),
    }
}

fn comment_from(record: CommentRecord) -> Comment {
    let author = record
        .author_user()
        .cloned()
        .map(UserProfile::from)
        .or_else(|| record.user.clone().map(UserProfile::from));
    let author_name = record.author_name().map(String::from);
    Comment {
        id: record.id,
        author,
        author_name,
        content: record.content,
        created_at: record.created_at,
    }
}

fn friend_request(record: FriendRequestRecord) -> FriendRequest {
    FriendRequest {
        id: FriendRequestId::new(record.id),
        sender: record.sender.into(),
        receiver: record.receiver.into(),
        status: record.status,
        created_at: record.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn feed_post_keeps_name_only_comments() {
        let record: PostRecord = serde_json::from_value(json!({
            "_id": "p1",
            "title": "Trip",
            "userId": { "_id": "u1", "name": "Ada" },
            "comments": [
                { "author": "Bo", "content": "nice" },
                { "_id": "c2", "userId": { "_id": "u3", "name": "Cy" }, "content": "wow" },
                "c3"
            ]
        }))
        .unwrap();

        let post = published_post(record);

        assert_eq!(post.comment_count, 3);
        assert_eq!(post.comments.len(), 2);
        assert_eq!(post.comments[0].display_author(), "Bo");
        assert_eq!(post.comments[0].content, "nice");
        assert_eq!(post.comments[1].display_author(), "Cy");
        assert_eq!(post.comments[1].id.as_deref(), Some("c2"));
        assert_eq!(
            post.comments[1].author.as_ref().map(|a| a.id.as_str()),
            Some("u3")
        );
    }
}

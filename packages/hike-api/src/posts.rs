//! Post endpoints.

use reqwest::StatusCode;
use tracing::debug;

use crate::types::{
    CreatePostResponse, FinalizePostRequest, PostListResponse, PostUploadUrlRequest,
    PostUploadUrlResponse,
};
use crate::{decode, ensure_success, CreatePostRequest, HikeApiError, HikeClient, PostRecord, Result};

impl HikeClient {
    /// Create a post record.
    ///
    /// The backend acknowledges creation with `201 Created`; `200 OK` is
    /// accepted as well. Any other 2xx is treated as unacknowledged.
    pub async fn create_post(&self, request: &CreatePostRequest) -> Result<PostRecord> {
        let resp = self
            .http()
            .post(self.endpoint(&["post"]))
            .json(request)
            .send()
            .await?;
        let resp = ensure_success(resp).await?;

        let status = resp.status();
        if status != StatusCode::CREATED && status != StatusCode::OK {
            return Err(HikeApiError::UnexpectedStatus(status.as_u16()));
        }

        let created: CreatePostResponse = decode(resp).await?;
        let post = created.into_post();
        debug!(post_id = %post.id, "Post created");
        Ok(post)
    }

    /// Request a single-use upload URL for one image of a post.
    pub async fn request_post_upload_url(&self, request: &PostUploadUrlRequest) -> Result<String> {
        let resp = self
            .http()
            .post(self.endpoint(&["post", "getURL"]))
            .json(request)
            .send()
            .await?;
        let resp = ensure_success(resp).await?;

        let grant: PostUploadUrlResponse = decode(resp).await?;
        Ok(grant.image_url)
    }

    /// Attach the ordered image URLs to a post.
    pub async fn finalize_post(&self, post_id: &str, images: &[String]) -> Result<()> {
        let resp = self
            .http()
            .patch(self.endpoint(&["post", post_id]))
            .json(&FinalizePostRequest { images })
            .send()
            .await?;
        ensure_success(resp).await?;
        Ok(())
    }

    /// Delete a post.
    pub async fn delete_post(&self, post_id: &str) -> Result<()> {
        let resp = self
            .http()
            .delete(self.endpoint(&["post", post_id]))
            .send()
            .await?;
        ensure_success(resp).await?;
        Ok(())
    }

    /// Fetch the posts visible to a user.
    pub async fn fetch_posts(&self, user_id: &str) -> Result<Vec<PostRecord>> {
        let resp = self
            .http()
            .get(self.endpoint(&["post", user_id]))
            .send()
            .await?;
        let resp = ensure_success(resp).await?;

        let list: PostListResponse = decode(resp).await?;
        Ok(list.into_posts())
    }
}

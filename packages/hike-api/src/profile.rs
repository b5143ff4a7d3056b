//! User profile endpoints.

use crate::types::{
    ConfirmProfilePicRequest, ConfirmProfilePicResponse, ProfileUploadUrlResponse,
    UpdateUserRequest,
};
use crate::{
    decode, ensure_success, HikeApiError, HikeClient, ProfileUploadUrlRequest, Result,
    UpdateUserResponse, UserDetails, UserRecord,
};

impl HikeClient {
    /// Update name and email. Returns the backend's confirmation message.
    pub async fn update_user(&self, user_id: &str, details: &UserDetails) -> Result<Option<String>> {
        let resp = self
            .http()
            .put(self.endpoint(&["user", user_id]))
            .json(&UpdateUserRequest {
                updated_data: details,
            })
            .send()
            .await?;
        let resp = ensure_success(resp).await?;

        let body: UpdateUserResponse = decode(resp).await?;
        if !body.success {
            return Err(HikeApiError::Rejected(
                body.message.unwrap_or_else(|| "Update failed".to_string()),
            ));
        }
        Ok(body.message)
    }

    /// Request a single-use upload URL for a profile picture.
    pub async fn request_profile_upload_url(&self, request: &ProfileUploadUrlRequest) -> Result<String> {
        let resp = self
            .http()
            .post(self.endpoint(&["user", "getUploadUrl"]))
            .json(request)
            .send()
            .await?;
        let resp = ensure_success(resp).await?;

        let grant: ProfileUploadUrlResponse = decode(resp).await?;
        Ok(grant.profile_pic_url)
    }

    /// Point the user's profile picture at an uploaded object.
    pub async fn confirm_profile_picture(&self, user_id: &str, profile_pic_url: &str) -> Result<UserRecord> {
        let resp = self
            .http()
            .post(self.endpoint(&["user", "updateProfilePic"]))
            .json(&ConfirmProfilePicRequest {
                user_id,
                profile_pic_url,
            })
            .send()
            .await?;
        let resp = ensure_success(resp).await?;

        let body: ConfirmProfilePicResponse = decode(resp).await?;
        Ok(body.user)
    }
}

//! Friend endpoints.

use crate::types::SendFriendRequest;
use crate::{decode, ensure_success, FriendsOverviewResponse, HikeClient, Result};

impl HikeClient {
    /// Friends, friend requests and recommendations for a user.
    pub async fn friends_overview(&self, user_id: &str) -> Result<FriendsOverviewResponse> {
        let resp = self
            .http()
            .get(self.endpoint(&["friend", user_id]))
            .send()
            .await?;
        let resp = ensure_success(resp).await?;
        decode(resp).await
    }

    pub async fn send_friend_request(&self, sender_id: &str, receiver_id: &str) -> Result<()> {
        let resp = self
            .http()
            .post(self.endpoint(&["friend", "sendFR"]))
            .json(&SendFriendRequest {
                sender_id,
                receiver_id,
            })
            .send()
            .await?;
        ensure_success(resp).await?;
        Ok(())
    }

    // The backend exposes accept as a GET.
    pub async fn accept_friend_request(&self, request_id: &str) -> Result<()> {
        let resp = self
            .http()
            .get(self.endpoint(&["friend", "accept", request_id]))
            .send()
            .await?;
        ensure_success(resp).await?;
        Ok(())
    }

    pub async fn reject_friend_request(&self, request_id: &str) -> Result<()> {
        let resp = self
            .http()
            .put(self.endpoint(&["friend", "reject", request_id]))
            .send()
            .await?;
        ensure_success(resp).await?;
        Ok(())
    }

    pub async fn remove_friend(&self, user_id: &str, friend_id: &str) -> Result<()> {
        let resp = self
            .http()
            .delete(self.endpoint(&["friend", "remove", user_id, friend_id]))
            .send()
            .await?;
        ensure_success(resp).await?;
        Ok(())
    }
}

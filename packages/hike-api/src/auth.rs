//! Auth endpoints.

use crate::types::LogoutRequest;
use crate::{
    decode, ensure_success, AuthResponse, HikeApiError, HikeClient, LoginRequest, RegisterRequest,
    Result, UserRecord,
};

impl HikeClient {
    /// Register a new account.
    ///
    /// The backend may answer 2xx with `error: true`; that is surfaced as
    /// `HikeApiError::Rejected` carrying the server message.
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserRecord> {
        let resp = self
            .http()
            .post(self.endpoint(&["auth", "register"]))
            .json(request)
            .send()
            .await?;
        let resp = ensure_success(resp).await?;

        accepted_user(decode(resp).await?)
    }

    /// Log in with email and password.
    pub async fn login(&self, request: &LoginRequest) -> Result<UserRecord> {
        let resp = self
            .http()
            .post(self.endpoint(&["auth", "login"]))
            .json(request)
            .send()
            .await?;
        let resp = ensure_success(resp).await?;

        accepted_user(decode(resp).await?)
    }

    /// End the server-side session of a user.
    pub async fn logout(&self, user_id: &str) -> Result<()> {
        let resp = self
            .http()
            .post(self.endpoint(&["auth", "logout"]))
            .json(&LogoutRequest { user_id })
            .send()
            .await?;
        ensure_success(resp).await?;
        Ok(())
    }
}

fn accepted_user(body: AuthResponse) -> Result<UserRecord> {
    if body.error {
        return Err(HikeApiError::Rejected(
            body.message.unwrap_or_else(|| "Request rejected".to_string()),
        ));
    }
    body.user
        .ok_or_else(|| HikeApiError::Parse("Response did not include a user".to_string()))
}

//! Registration, login and logout.

use hike_api::HikeApiError;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::common::{BaseNotifier, Notification, UserProfile};
use crate::domains::session::{Session, SessionError};
use crate::kernel::{AppKernel, BaseAuthBackend};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] HikeApiError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Not signed in")]
    NotSignedIn,
}

pub struct AuthService {
    backend: Arc<dyn BaseAuthBackend>,
    notifier: Arc<dyn BaseNotifier>,
    session: Session,
}

impl AuthService {
    pub fn new(kernel: &AppKernel, session: Session) -> Self {
        Self {
            backend: kernel.auth.clone(),
            notifier: kernel.notifier.clone(),
            session,
        }
    }

    /// Create an account. Does not sign in.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        match self.backend.register(name, email, password).await {
            Ok(user) => {
                info!(user_id = %user.id, "Account registered");
                self.notifier.notify(
                    Notification::success("Registration Successful")
                        .with_description(format!("Welcome to Hike {}", user.display_name())),
                );
                Ok(user)
            }
            Err(e) => {
                warn!(error = %e, "Registration failed");
                self.notifier.notify(
                    Notification::error("Registration Failed")
                        .with_description(format!("Error: {}", e.user_message())),
                );
                Err(e.into())
            }
        }
    }

    /// Sign in and persist the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let user = match self.backend.login(email, password).await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.notifier.notify(
                    Notification::error("Login Failed").with_description(e.user_message()),
                );
                return Err(e.into());
            }
        };

        self.session.set_user(user.clone())?;
        Ok(user)
    }

    /// Sign out. The local session is cleared even if the backend call fails.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let user_id = self.session.user_id().ok_or(AuthError::NotSignedIn)?;

        if let Err(e) = self.backend.logout(&user_id).await {
            warn!(user_id = %user_id, error = %e, "Backend logout failed, clearing local session anyway");
        }

        self.session.clear()?;
        info!(user_id = %user_id, "Signed out");
        Ok(())
    }
}

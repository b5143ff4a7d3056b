//! Profile settings: account details and profile picture.

use hike_api::HikeApiError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::common::{BaseNotifier, InFlightGuard, Notification, UserId, UserProfile};
use crate::domains::posts::UploadFile;
use crate::domains::session::{Session, SessionError};
use crate::kernel::{AppKernel, BaseProfileBackend};

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Not signed in")]
    NotSignedIn,

    #[error("A profile picture upload is already in progress")]
    UploadInProgress,

    #[error(transparent)]
    Api(#[from] HikeApiError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

pub struct ProfileSettings {
    backend: Arc<dyn BaseProfileBackend>,
    notifier: Arc<dyn BaseNotifier>,
    session: Session,
    uploading: AtomicBool,
}

impl ProfileSettings {
    pub fn new(kernel: &AppKernel, session: Session) -> Self {
        Self {
            backend: kernel.profile.clone(),
            notifier: kernel.notifier.clone(),
            session,
            uploading: AtomicBool::new(false),
        }
    }

    /// Update name and email. The session user is updated to match.
    pub async fn update_details(&self, name: &str, email: &str) -> Result<(), ProfileError> {
        let user = self.session.current().ok_or(ProfileError::NotSignedIn)?;

        match self.backend.update_details(&user.id, name, email).await {
            Ok(message) => {
                info!(user_id = %user.id, "Profile details updated");
                let mut notification = Notification::success("Settings Updated");
                if let Some(message) = message {
                    notification = notification.with_description(message);
                }
                self.notifier.notify(notification);

                self.session.set_user(UserProfile {
                    name: Some(name.to_string()),
                    email: Some(email.to_string()),
                    ..user
                })?;
                Ok(())
            }
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "Failed to update profile details");
                self.notifier.notify(
                    Notification::error("Update Failed").with_description(e.user_message()),
                );
                Err(e.into())
            }
        }
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::Acquire)
    }

    /// Upload a new profile picture: grant, direct PUT, confirm. The session
    /// user is replaced with the user the backend returns.
    pub async fn upload_picture(&self, file: &UploadFile) -> Result<UserProfile, ProfileError> {
        let user_id = self.session.user_id().ok_or(ProfileError::NotSignedIn)?;

        let result = {
            let Some(_guard) = InFlightGuard::acquire(&self.uploading) else {
                return Err(ProfileError::UploadInProgress);
            };
            self.upload_picture_inner(&user_id, file).await
        };

        match result {
            Ok(user) => {
                self.notifier.notify(
                    Notification::success("Profile picture updated successfully")
                        .with_description("Your profile picture has been updated."),
                );
                self.session.set_user(user.clone())?;
                Ok(user)
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to update profile picture");
                self.notifier.notify(
                    Notification::error("Error").with_description("Failed to update profile picture."),
                );
                Err(e.into())
            }
        }
    }

    async fn upload_picture_inner(
        &self,
        user_id: &UserId,
        file: &UploadFile,
    ) -> Result<UserProfile, HikeApiError> {
        let grant = self
            .backend
            .request_upload_grant(user_id, &file.name, &file.content_type)
            .await?;
        self.backend.upload_file(&grant, file).await?;
        debug!(user_id = %user_id, "Profile picture uploaded");

        self.backend
            .confirm_picture(user_id, &grant.public_url())
            .await
    }
}

//! Registration, login, logout and profile settings.

mod common;

use common::{author, image, signed_in_session, AUTHOR_ID};
use hike_core::common::UserId;
use hike_core::domains::auth::{AuthError, AuthService};
use hike_core::domains::profile::{ProfileError, ProfileSettings};
use hike_core::domains::session::{Session, SessionStore};
use hike_core::kernel::test_dependencies::{AuthCall, MockAuthBackend, MockProfileBackend, ProfileCall};
use hike_core::kernel::TestDependencies;
use std::time::Duration;

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn register_welcomes_without_signing_in() {
    let deps = TestDependencies::new();
    let session = Session::in_memory();
    let auth = AuthService::new(&deps.into_kernel(), session.clone());

    let user = auth
        .register("Ada", "ada@example.com", "secret")
        .await
        .expect("register succeeds");

    assert_eq!(user.display_name(), "Ada");
    assert!(!session.is_signed_in());
    let successes = deps.notifier.successes();
    assert_eq!(successes[0].title, "Registration Successful");
    assert_eq!(successes[0].description.as_deref(), Some("Welcome to Hike Ada"));
}

#[tokio::test]
async fn duplicate_registration_fails() {
    let deps = TestDependencies::new()
        .mock_auth(MockAuthBackend::new().with_account("ada@example.com", "secret", author()));
    let auth = AuthService::new(&deps.into_kernel(), Session::in_memory());

    let result = auth.register("Ada", "ada@example.com", "other").await;

    assert!(matches!(result, Err(AuthError::Api(_))));
    let errors = deps.notifier.errors();
    assert_eq!(errors[0].title, "Registration Failed");
    assert_eq!(errors[0].description.as_deref(), Some("Error: User already exists"));
}

#[tokio::test]
async fn login_persists_session() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("session.json");
    let deps = TestDependencies::new()
        .mock_auth(MockAuthBackend::new().with_account("ada@example.com", "secret", author()));
    let session = Session::new(SessionStore::new(&path));
    let auth = AuthService::new(&deps.into_kernel(), session.clone());

    auth.login("ada@example.com", "secret")
        .await
        .expect("login succeeds");

    assert_eq!(session.user_id(), Some(UserId::from(AUTHOR_ID)));

    // a fresh session over the same file picks the user up
    let reloaded = Session::new(SessionStore::new(&path));
    assert_eq!(reloaded.load().expect("load"), Some(author()));
}

#[tokio::test]
async fn wrong_password_leaves_session_empty() {
    let deps = TestDependencies::new()
        .mock_auth(MockAuthBackend::new().with_account("ada@example.com", "secret", author()));
    let session = Session::in_memory();
    let auth = AuthService::new(&deps.into_kernel(), session.clone());

    assert!(auth.login("ada@example.com", "wrong").await.is_err());

    assert!(!session.is_signed_in());
    let errors = deps.notifier.errors();
    assert_eq!(errors[0].title, "Login Failed");
    assert_eq!(errors[0].description.as_deref(), Some("Invalid credentials"));
}

#[tokio::test]
async fn logout_clears_session_even_if_backend_fails() {
    let deps = TestDependencies::new().mock_auth(MockAuthBackend::new().failing_logout());
    let session = signed_in_session();
    let auth = AuthService::new(&deps.into_kernel(), session.clone());

    auth.logout().await.expect("logout succeeds locally");

    assert!(!session.is_signed_in());
    assert_eq!(
        deps.auth.calls(),
        vec![AuthCall::Logout(UserId::from(AUTHOR_ID))]
    );
}

// ============================================================================
// Profile
// ============================================================================

#[tokio::test]
async fn update_details_refreshes_session_user() {
    let deps = TestDependencies::new();
    let session = signed_in_session();
    let settings = ProfileSettings::new(&deps.into_kernel(), session.clone());

    settings
        .update_details("Ada L.", "ada@hike.test")
        .await
        .expect("update succeeds");

    let user = session.current().expect("still signed in");
    assert_eq!(user.name.as_deref(), Some("Ada L."));
    assert_eq!(user.email.as_deref(), Some("ada@hike.test"));

    let successes = deps.notifier.successes();
    assert_eq!(successes[0].title, "Settings Updated");
    assert_eq!(
        successes[0].description.as_deref(),
        Some("User updated successfully")
    );
}

#[tokio::test]
async fn rejected_update_keeps_session_user() {
    let deps = TestDependencies::new().mock_profile(MockProfileBackend::new().failing_update());
    let session = signed_in_session();
    let settings = ProfileSettings::new(&deps.into_kernel(), session.clone());

    assert!(settings.update_details("Ada L.", "taken@hike.test").await.is_err());

    assert_eq!(session.current(), Some(author()));
    let errors = deps.notifier.errors();
    assert_eq!(errors[0].title, "Update Failed");
    assert_eq!(errors[0].description.as_deref(), Some("Email already in use"));
}

#[tokio::test]
async fn picture_upload_confirms_public_url() {
    let deps = TestDependencies::new();
    let session = signed_in_session();
    let settings = ProfileSettings::new(&deps.into_kernel(), session.clone());

    let user = settings
        .upload_picture(&image("me.png"))
        .await
        .expect("upload succeeds");

    let expected = "https://storage.test/profile/user-1/me.png";
    assert_eq!(user.profile_pic.as_deref(), Some(expected));
    assert_eq!(
        session.current().and_then(|u| u.profile_pic).as_deref(),
        Some(expected)
    );
    assert_eq!(
        deps.profile.calls().last(),
        Some(&ProfileCall::Confirm {
            picture_url: expected.to_string(),
        })
    );
    assert!(!settings.is_uploading());
}

#[tokio::test]
async fn failed_picture_upload_is_not_confirmed() {
    let deps = TestDependencies::new().mock_profile(MockProfileBackend::new().failing_upload());
    let session = signed_in_session();
    let settings = ProfileSettings::new(&deps.into_kernel(), session.clone());

    assert!(settings.upload_picture(&image("me.png")).await.is_err());

    assert_eq!(session.current().and_then(|u| u.profile_pic), None);
    assert!(!deps
        .profile
        .calls()
        .iter()
        .any(|call| matches!(call, ProfileCall::Confirm { .. })));
    assert_eq!(
        deps.notifier.errors()[0].description.as_deref(),
        Some("Failed to update profile picture.")
    );
    assert!(!settings.is_uploading());
}

#[tokio::test(start_paused = true)]
async fn second_picture_upload_waits_its_turn() {
    let deps = TestDependencies::new()
        .mock_profile(MockProfileBackend::new().with_upload_delay(Duration::from_secs(1)));
    let settings = ProfileSettings::new(&deps.into_kernel(), signed_in_session());
    let file = image("me.png");

    let (first, second) = tokio::join!(settings.upload_picture(&file), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        settings.upload_picture(&file).await
    });

    assert!(first.is_ok());
    assert!(matches!(second, Err(ProfileError::UploadInProgress)));
}

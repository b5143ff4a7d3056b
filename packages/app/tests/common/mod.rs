// Common test utilities

#![allow(dead_code)]

use hike_core::common::UserProfile;
use hike_core::domains::posts::{PublishRequest, UploadFile};
use hike_core::domains::session::Session;

pub const AUTHOR_ID: &str = "user-1";

/// Respect RUST_LOG when running tests with --nocapture.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn author() -> UserProfile {
    UserProfile::new(AUTHOR_ID)
        .with_name("Ada")
        .with_email("ada@example.com")
}

/// An in-memory session signed in as `author()`.
pub fn signed_in_session() -> Session {
    let session = Session::in_memory();
    session
        .set_user(author())
        .expect("in-memory session never fails");
    session
}

pub fn image(name: &str) -> UploadFile {
    UploadFile::guessed(name, name.as_bytes().to_vec())
}

pub fn publish_request(title: &str, content: &str, files: &[&str]) -> PublishRequest {
    PublishRequest {
        author: AUTHOR_ID.into(),
        title: title.to_string(),
        content: content.to_string(),
        files: files.iter().map(|name| image(name)).collect(),
    }
}

pub fn storage_url(filename: &str) -> String {
    format!("https://storage.test/{}", filename)
}

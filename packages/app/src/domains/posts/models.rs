use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::path::Path;

use crate::common::{PostId, UserId, UserProfile};

/// One file chosen for upload: bytes, display name and declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Build from a file name, guessing the content type from its extension.
    pub fn guessed(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let name = name.into();
        let content_type = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self::new(name, content_type, bytes)
    }

    /// Lowercased extension of the display name, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
            .map(|ext| ext.to_ascii_lowercase())
    }
}

/// Body of the create-post call. Images are always empty at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub author: UserId,
    pub title: String,
    pub content: String,
}

/// A post shell as returned by the backend, or a finalized post once the
/// orchestrator has attached its images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPost {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub images: Vec<String>,
}

/// Scope of a single-use upload grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadGrantRequest {
    pub author: UserId,
    pub post_id: PostId,
    pub filename: String,
    pub filetype: String,
}

/// Single-use pre-signed upload target for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadGrant {
    pub upload_url: String,
}

impl UploadGrant {
    pub fn new(upload_url: impl Into<String>) -> Self {
        Self {
            upload_url: upload_url.into(),
        }
    }

    /// Where the object is readable once uploaded.
    pub fn public_url(&self) -> String {
        hike_api::object_url(&self.upload_url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Option<String>,
    pub author: Option<UserProfile>,
    /// Set when the backend names the author without populating them.
    pub author_name: Option<String>,
    pub content: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// Name to show next to the comment, falling back to "User".
    pub fn display_author(&self) -> &str {
        self.author_name
            .as_deref()
            .or_else(|| self.author.as_ref().and_then(|author| author.name.as_deref()))
            .unwrap_or("User")
    }
}

/// A post as the feed shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPost {
    pub id: PostId,
    pub author: Option<UserProfile>,
    pub title: String,
    pub content: String,
    pub images: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub like_count: u64,
    /// Every comment the backend listed, including ones without a body.
    pub comment_count: usize,
    /// Comments that can be rendered.
    pub comments: Vec<Comment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guessed_content_type_follows_extension() {
        assert_eq!(UploadFile::guessed("a.jpg", vec![1u8]).content_type, "image/jpeg");
        assert_eq!(UploadFile::guessed("b.PNG", vec![1u8]).content_type, "image/png");
        assert_eq!(
            UploadFile::guessed("notes", vec![1u8]).content_type,
            "application/octet-stream"
        );
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(UploadFile::guessed("IMG_01.JPG", Vec::<u8>::new()).extension().as_deref(), Some("jpg"));
        assert_eq!(UploadFile::guessed("README", Vec::<u8>::new()).extension(), None);
    }

    #[test]
    fn public_url_drops_signature() {
        let grant = UploadGrant::new("https://storage.test/p1-1.jpg?signature=abc");
        assert_eq!(grant.public_url(), "https://storage.test/p1-1.jpg");
    }
}

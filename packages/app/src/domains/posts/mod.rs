//! Posts: composing, publishing with images, and the feed.

pub mod composer;
pub mod feed;
pub mod models;
pub mod orchestrator;
pub mod previews;

pub use composer::{Composer, ComposerError, SelectedFileView, SubmitOutcome};
pub use feed::PostFeed;
pub use models::*;
pub use orchestrator::{PublishError, PublishRequest, PublishStep, UploadOrchestrator};
pub use previews::{PreviewHandle, PreviewRegistry};

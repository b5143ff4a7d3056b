use hike_api::{UserRecord, UserRef};
use serde::{Deserialize, Serialize};

use super::UserId;

/// A user as the client knows it: the signed-in user, a post author, a
/// friend or a recommendation. Populated fields vary by endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_pic: Option<String>,
}

impl UserProfile {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
            profile_pic: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Name to show, falling back to "User" like the feed cards do.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("User")
    }
}

impl From<UserRecord> for UserProfile {
    fn from(record: UserRecord) -> Self {
        Self {
            id: UserId::new(record.id),
            name: record.name,
            email: record.email,
            profile_pic: record.profile_pic,
        }
    }
}

impl From<UserRef> for UserProfile {
    fn from(user: UserRef) -> Self {
        match user {
            UserRef::Populated(record) => record.into(),
            UserRef::Id(id) => UserProfile::new(id),
        }
    }
}

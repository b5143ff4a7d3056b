use chrono::{DateTime, Utc};

pub use hike_api::FriendRequestStatus;

use crate::common::{FriendRequestId, UserProfile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendRequest {
    pub id: FriendRequestId,
    pub sender: UserProfile,
    pub receiver: UserProfile,
    pub status: FriendRequestStatus,
    pub created_at: Option<DateTime<Utc>>,
}

/// Everything the friends page shows, as one backend answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FriendsOverview {
    pub friends: Vec<UserProfile>,
    pub requests: Vec<FriendRequest>,
    pub recommended: Vec<UserProfile>,
}

pub mod id;
pub mod in_flight;
pub mod notifications;
pub mod types;

pub use id::{FriendRequestId, Id, PostId, UserId};
pub use in_flight::InFlightGuard;
pub use notifications::{BaseNotifier, Notification, NotificationLevel, TracingNotifier};
pub use types::UserProfile;

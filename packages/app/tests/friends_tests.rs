//! Friends page: overview filtering, request handling, notifications.

mod common;

use common::{signed_in_session, AUTHOR_ID};
use hike_core::common::{FriendRequestId, UserId, UserProfile};
use hike_core::domains::friends::{FriendRequest, FriendRequestStatus, FriendsError, FriendsOverview, FriendsPage};
use hike_core::domains::session::Session;
use hike_core::kernel::test_dependencies::{FriendsCall, MockFriendsBackend};
use hike_core::kernel::TestDependencies;

fn user(id: &str, name: &str) -> UserProfile {
    UserProfile::new(id).with_name(name)
}

fn request(id: &str, sender: UserProfile, receiver: UserProfile) -> FriendRequest {
    FriendRequest {
        id: FriendRequestId::from(id),
        sender,
        receiver,
        status: FriendRequestStatus::Pending,
        created_at: None,
    }
}

/// Bob is a friend, Cleo asked to be one, Ada asked Dan, Eve is recommended.
fn overview() -> FriendsOverview {
    let me = common::author();
    FriendsOverview {
        friends: vec![user("user-bob", "Bob")],
        requests: vec![
            request("fr-1", user("user-cleo", "Cleo"), me.clone()),
            request("fr-2", me, user("user-dan", "Dan")),
        ],
        recommended: vec![user("user-eve", "Eve")],
    }
}

fn page(deps: &TestDependencies) -> FriendsPage {
    FriendsPage::new(&deps.into_kernel(), signed_in_session())
}

#[tokio::test]
async fn refresh_keeps_only_incoming_requests() {
    let deps = TestDependencies::new().mock_friends(MockFriendsBackend::new().with_overview(overview()));
    let page = page(&deps);
    assert!(page.is_loading());

    page.refresh().await.expect("refresh succeeds");

    assert!(!page.is_loading());
    assert_eq!(page.friends().len(), 1);
    assert_eq!(page.recommended()[0].id, UserId::from("user-eve"));

    let requests = page.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].id, FriendRequestId::from("fr-1"));
    assert_eq!(requests[0].sender.display_name(), "Cleo");
}

#[tokio::test]
async fn failed_refresh_notifies() {
    let deps = TestDependencies::new().mock_friends(MockFriendsBackend::new().failing_overview());
    let page = page(&deps);

    assert!(page.refresh().await.is_err());

    assert!(!page.is_loading());
    let errors = deps.notifier.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].description.as_deref(),
        Some("Failed to load friends data. Please try again.")
    );
}

#[tokio::test]
async fn accepting_moves_sender_to_friends() {
    let deps = TestDependencies::new().mock_friends(MockFriendsBackend::new().with_overview(overview()));
    let page = page(&deps);
    page.refresh().await.expect("refresh");

    page.accept(&FriendRequestId::from("fr-1")).await.expect("accept succeeds");

    assert!(page.requests().is_empty());
    let friends: Vec<_> = page.friends().into_iter().map(|f| f.id).collect();
    assert!(friends.contains(&UserId::from("user-cleo")));

    let successes = deps.notifier.successes();
    assert_eq!(successes.len(), 1);
    assert_eq!(successes[0].description.as_deref(), Some("Friend request accepted!"));

    // accept is followed by a fresh overview
    assert_eq!(
        deps.friends.calls().last(),
        Some(&FriendsCall::Overview(UserId::from(AUTHOR_ID)))
    );
}

#[tokio::test]
async fn rejecting_drops_request() {
    let deps = TestDependencies::new().mock_friends(MockFriendsBackend::new().with_overview(overview()));
    let page = page(&deps);
    page.refresh().await.expect("refresh");

    page.reject(&FriendRequestId::from("fr-1")).await.expect("reject succeeds");

    assert!(page.requests().is_empty());
    assert_eq!(page.friends().len(), 1);
}

#[tokio::test]
async fn sending_request_removes_recommendation() {
    let deps = TestDependencies::new().mock_friends(MockFriendsBackend::new().with_overview(overview()));
    let page = page(&deps);
    page.refresh().await.expect("refresh");

    page.send_request(&UserId::from("user-eve"))
        .await
        .expect("send succeeds");

    assert!(page.recommended().is_empty());
    assert!(deps.friends.calls().contains(&FriendsCall::Send {
        sender: UserId::from(AUTHOR_ID),
        receiver: UserId::from("user-eve"),
    }));
}

#[tokio::test]
async fn removing_friend() {
    let deps = TestDependencies::new().mock_friends(MockFriendsBackend::new().with_overview(overview()));
    let page = page(&deps);
    page.refresh().await.expect("refresh");

    page.remove_friend(&UserId::from("user-bob"))
        .await
        .expect("remove succeeds");

    assert!(page.friends().is_empty());
}

#[tokio::test]
async fn failure_shows_backend_message() {
    let deps = TestDependencies::new().mock_friends(
        MockFriendsBackend::new()
            .with_overview(overview())
            .failing_mutations_with("Friend request already sent"),
    );
    let page = page(&deps);
    page.refresh().await.expect("refresh");

    let result = page.send_request(&UserId::from("user-eve")).await;

    assert!(matches!(result, Err(FriendsError::Api(_))));
    assert_eq!(page.recommended().len(), 1);
    let errors = deps.notifier.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].description.as_deref(),
        Some("Friend request already sent")
    );
}

#[tokio::test]
async fn signed_out_user_is_refused() {
    let deps = TestDependencies::new();
    let page = FriendsPage::new(&deps.into_kernel(), Session::in_memory());

    assert!(matches!(page.refresh().await, Err(FriendsError::NotSignedIn)));
    assert!(deps.friends.calls().is_empty());
}

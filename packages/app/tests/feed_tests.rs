//! Post feed: refresh, delete, likes.

mod common;

use common::AUTHOR_ID;
use hike_core::common::{PostId, UserId};
use hike_core::domains::posts::{PostFeed, PublishedPost};
use hike_core::kernel::test_dependencies::{MockPostsBackend, PostsCall};
use hike_core::kernel::TestDependencies;

fn post(id: &str, title: &str) -> PublishedPost {
    PublishedPost {
        id: PostId::from(id),
        author: Some(common::author()),
        title: title.to_string(),
        content: String::new(),
        images: vec![format!("https://storage.test/{}-1.jpg", id)],
        created_at: None,
        like_count: 0,
        comment_count: 0,
        comments: Vec::new(),
    }
}

fn seeded() -> MockPostsBackend {
    MockPostsBackend::new()
        .with_post(post("p1", "Trip"))
        .with_post(post("p2", "Summit"))
}

#[tokio::test]
async fn refresh_loads_posts_for_viewer() {
    let deps = TestDependencies::new().mock_posts(seeded());
    let feed = PostFeed::new(&deps.into_kernel());
    let viewer = UserId::from(AUTHOR_ID);

    let count = feed.refresh(&viewer).await.expect("refresh succeeds");

    assert_eq!(count, 2);
    assert_eq!(feed.posts()[1].title, "Summit");
    assert!(!feed.is_loading());
    assert_eq!(feed.error(), None);
    assert_eq!(deps.posts.calls(), vec![PostsCall::Fetch(viewer)]);
}

#[tokio::test]
async fn failed_refresh_records_error() {
    let deps = TestDependencies::new().mock_posts(seeded().failing_fetch());
    let feed = PostFeed::new(&deps.into_kernel());

    assert!(feed.refresh(&UserId::from(AUTHOR_ID)).await.is_err());

    assert!(feed.posts().is_empty());
    assert_eq!(feed.error().as_deref(), Some("Failed to fetch posts"));
    assert!(!feed.is_loading());
}

#[tokio::test]
async fn delete_removes_post_after_backend_confirms() {
    let deps = TestDependencies::new().mock_posts(seeded());
    let feed = PostFeed::new(&deps.into_kernel());
    feed.refresh(&UserId::from(AUTHOR_ID)).await.expect("refresh");

    feed.delete(&PostId::from("p1")).await.expect("delete succeeds");

    let ids: Vec<_> = feed.posts().into_iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![PostId::from("p2")]);
    assert!(deps.posts.post(&PostId::from("p1")).is_none());

    let successes = deps.notifier.successes();
    assert_eq!(successes.len(), 1);
    assert_eq!(successes[0].title, "Post deleted");
}

#[tokio::test]
async fn failed_delete_keeps_post() {
    let deps = TestDependencies::new().mock_posts(seeded().failing_delete());
    let feed = PostFeed::new(&deps.into_kernel());
    feed.refresh(&UserId::from(AUTHOR_ID)).await.expect("refresh");

    assert!(feed.delete(&PostId::from("p1")).await.is_err());

    assert_eq!(feed.posts().len(), 2);
    let errors = deps.notifier.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].title, "Failed to delete post");
    assert_eq!(errors[0].description.as_deref(), Some("Failed to delete post"));
}

#[tokio::test]
async fn like_toggles_locally() {
    let deps = TestDependencies::new().mock_posts(seeded());
    let feed = PostFeed::new(&deps.into_kernel());
    let p1 = PostId::from("p1");

    assert!(feed.toggle_like(&p1));
    assert!(feed.is_liked(&p1));
    assert!(!feed.toggle_like(&p1));
    assert!(!feed.is_liked(&p1));

    // likes never reach the backend
    assert!(deps.posts.calls().is_empty());
}

// AppKernel - client infrastructure with all dependencies
//
// The AppKernel holds the backend adapters and the notifier, and hands
// them to domain objects through traits so tests can swap in mocks.

use anyhow::{Context, Result};
use hike_api::HikeClient;
use std::sync::Arc;
use std::time::Duration;

use super::{BaseAuthBackend, BaseFriendsBackend, BasePostsBackend, BaseProfileBackend, HttpBackend};
use crate::common::BaseNotifier;
use crate::Config;

/// AppKernel holds all client dependencies
pub struct AppKernel {
    pub posts: Arc<dyn BasePostsBackend>,
    pub auth: Arc<dyn BaseAuthBackend>,
    pub friends: Arc<dyn BaseFriendsBackend>,
    pub profile: Arc<dyn BaseProfileBackend>,
    pub notifier: Arc<dyn BaseNotifier>,
    /// Upper bound for each remote step of a multi-step workflow
    pub step_timeout: Duration,
}

impl AppKernel {
    /// Creates a new AppKernel with the given dependencies
    pub fn new(
        posts: Arc<dyn BasePostsBackend>,
        auth: Arc<dyn BaseAuthBackend>,
        friends: Arc<dyn BaseFriendsBackend>,
        profile: Arc<dyn BaseProfileBackend>,
        notifier: Arc<dyn BaseNotifier>,
        step_timeout: Duration,
    ) -> Self {
        Self {
            posts,
            auth,
            friends,
            profile,
            notifier,
            step_timeout,
        }
    }

    /// Creates an AppKernel talking to the configured backend over HTTP
    pub fn http(config: &Config, notifier: Arc<dyn BaseNotifier>) -> Result<Self> {
        let client = HikeClient::with_timeout(&config.base_url, config.request_timeout)
            .context("Failed to build Hike API client")?;
        let backend = Arc::new(HttpBackend::new(client));

        Ok(Self::new(
            backend.clone(),
            backend.clone(),
            backend.clone(),
            backend,
            notifier,
            config.request_timeout,
        ))
    }
}

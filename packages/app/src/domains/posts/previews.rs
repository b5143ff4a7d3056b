//! Local preview handles for selected files.
//!
//! A preview is the client-side stand-in for a browser object URL
//! (`blob:<uuid>`). Handles are owned and not `Clone`: dropping one
//! releases it from its registry, so every handle is released exactly once
//! however the file leaves the composer (removed, reset, or submitted).

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{trace, warn};
use uuid::Uuid;

#[derive(Debug, Default)]
struct RegistryState {
    live: HashSet<String>,
    created: u64,
    released: u64,
}

/// Tracks the preview handles of one composer.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    state: Arc<Mutex<RegistryState>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new preview handle.
    pub fn create(&self) -> PreviewHandle {
        let url = format!("blob:{}", Uuid::new_v4());
        {
            let mut state = self.lock();
            state.live.insert(url.clone());
            state.created += 1;
        }
        trace!(preview = %url, "Preview created");
        PreviewHandle {
            url,
            registry: self.clone(),
        }
    }

    /// Number of handles currently alive.
    pub fn live_count(&self) -> usize {
        self.lock().live.len()
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.lock().live.contains(url)
    }

    pub fn created_count(&self) -> u64 {
        self.lock().created
    }

    pub fn released_count(&self) -> u64 {
        self.lock().released
    }

    fn release(&self, url: &str) {
        let mut state = self.lock();
        if state.live.remove(url) {
            state.released += 1;
            trace!(preview = %url, "Preview released");
        } else {
            warn!(preview = %url, "Preview released twice");
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// An allocated preview. Released on drop.
#[derive(Debug)]
pub struct PreviewHandle {
    url: String,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.release(&self.url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_unique_and_live() {
        let registry = PreviewRegistry::new();
        let a = registry.create();
        let b = registry.create();

        assert_ne!(a.url(), b.url());
        assert!(a.url().starts_with("blob:"));
        assert!(registry.is_live(a.url()));
        assert_eq!(registry.live_count(), 2);
    }

    #[test]
    fn drop_releases_exactly_once() {
        let registry = PreviewRegistry::new();
        let handle = registry.create();
        let url = handle.url().to_string();

        drop(handle);

        assert!(!registry.is_live(&url));
        assert_eq!(registry.created_count(), 1);
        assert_eq!(registry.released_count(), 1);
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn repeated_add_remove_does_not_grow() {
        let registry = PreviewRegistry::new();
        for _ in 0..100 {
            let handle = registry.create();
            drop(handle);
        }
        assert_eq!(registry.live_count(), 0);
        assert_eq!(registry.created_count(), 100);
        assert_eq!(registry.released_count(), 100);
    }
}

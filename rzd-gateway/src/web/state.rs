//! Application state for the web layer.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::cache::CachedRzdClient;
use crate::rzd::HttpTransport;

/// Shared application state.
///
/// Every handler shares the one client, and with it the one session token
/// cache.
pub struct AppState<T = HttpTransport> {
    /// Cached timetable client
    pub rzd: Arc<CachedRzdClient<T>>,

    /// Cancelled on server shutdown; each request runs under a child token
    pub shutdown: CancellationToken,
}

impl<T> AppState<T> {
    /// Create a new app state.
    pub fn new(rzd: CachedRzdClient<T>, shutdown: CancellationToken) -> Self {
        Self {
            rzd: Arc::new(rzd),
            shutdown,
        }
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            rzd: Arc::clone(&self.rzd),
            shutdown: self.shutdown.clone(),
        }
    }
}

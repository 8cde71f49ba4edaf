//! Decorators for remote ports.
//!
//! The discovery flow has no cancellation contract of its own. A
//! [`TimeoutLayer`] adds an optional per-call deadline to the favorite and
//! label ports; an elapsed deadline surfaces as [`ApiError::Timeout`] and is
//! handled like any other remote failure (the favorite toggle rolls back).

use std::{future::Future, sync::Arc, time::Duration};

use paws_core::{
    error::ApiError,
    ports::{FavoritePort, LabelSourcePort},
    types::{ImagePayload, LabelAnalysis, Pet, PetId, UserId},
};

/// Applies a deadline to remote calls.
///
/// An elapsed deadline drops the in-flight request; it does not cancel it on
/// the server. A favorite write that reached the backend before the deadline
/// may still be applied there while the local toggle has been rolled back.
/// Call `DiscoveryRuntime::refresh_favorites` (`/favs` in the CLI) to resync.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutLayer {
    timeout_ms: u64,
}

impl TimeoutLayer {
    #[must_use]
    pub fn new(timeout_ms: u64) -> Self {
        Self { timeout_ms }
    }

    #[must_use]
    pub fn wrap_favorites(&self, inner: Arc<dyn FavoritePort>) -> Arc<dyn FavoritePort> {
        Arc::new(TimeoutFavoritePort { inner, timeout_ms: self.timeout_ms })
    }

    #[must_use]
    pub fn wrap_labels(&self, inner: Arc<dyn LabelSourcePort>) -> Arc<dyn LabelSourcePort> {
        Arc::new(TimeoutLabelSource { inner, timeout_ms: self.timeout_ms })
    }
}

async fn with_deadline<T>(
    timeout_ms: u64,
    call: impl Future<Output = Result<T, ApiError>>,
) -> Result<T, ApiError> {
    match tokio::time::timeout(Duration::from_millis(timeout_ms), call).await {
        Ok(result) => result,
        Err(_) => Err(ApiError::Timeout),
    }
}

struct TimeoutFavoritePort {
    inner: Arc<dyn FavoritePort>,
    timeout_ms: u64,
}

impl std::fmt::Debug for TimeoutFavoritePort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeoutFavoritePort")
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl FavoritePort for TimeoutFavoritePort {
    async fn toggle_favorite(&self, user: &UserId, pet: &PetId) -> Result<(), ApiError> {
        with_deadline(self.timeout_ms, self.inner.toggle_favorite(user, pet)).await
    }

    async fn list_favorites(&self, user: &UserId) -> Result<Vec<Pet>, ApiError> {
        with_deadline(self.timeout_ms, self.inner.list_favorites(user)).await
    }
}

struct TimeoutLabelSource {
    inner: Arc<dyn LabelSourcePort>,
    timeout_ms: u64,
}

impl std::fmt::Debug for TimeoutLabelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeoutLabelSource")
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl LabelSourcePort for TimeoutLabelSource {
    async fn analyze(&self, image: &ImagePayload) -> Result<LabelAnalysis, ApiError> {
        with_deadline(self.timeout_ms, self.inner.analyze(image)).await
    }
}

//! Durable client identifier seam.

use anyhow::Result;
use async_trait::async_trait;

/// Source of the durable per-installation client identifier.
///
/// Implementations usually wrap a telemetry service and may suspend or fail.
/// Returning `Ok(None)` means no identifier exists yet. Timeouts are the
/// implementation's responsibility.
#[async_trait]
pub trait ClientIdProvider: Send + Sync {
    /// Fetch the client identifier.
    async fn client_id(&self) -> Result<Option<String>>;
}

/// Provider that always returns a fixed identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticClientIdProvider {
    id: String,
}

impl StaticClientIdProvider {
    /// Create a provider for `id`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl ClientIdProvider for StaticClientIdProvider {
    async fn client_id(&self) -> Result<Option<String>> {
        Ok(Some(self.id.clone()))
    }
}

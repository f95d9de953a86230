//! Variation assignment: override policy over hash-based sampling.

use std::sync::Arc;

use crate::config::StudyConfig;
use crate::error::StudyError;
use crate::hasher::fraction;
use crate::identity::ClientIdProvider;
use crate::selector::choose_from;
use crate::types::{AssignmentResult, AssignmentSource, Identity};

/// Assigns a client to one variation of a study.
///
/// Holds no mutable state; the same configuration and client id always
/// produce the same result.
#[derive(Clone)]
pub struct AssignmentService {
    config: Arc<StudyConfig>,
    client_ids: Arc<dyn ClientIdProvider>,
}

impl AssignmentService {
    /// Create a service for `config`, fetching client ids from `client_ids`.
    #[must_use]
    pub fn new(config: StudyConfig, client_ids: Arc<dyn ClientIdProvider>) -> Self {
        Self {
            config: Arc::new(config),
            client_ids,
        }
    }

    /// Study configuration in use.
    #[must_use]
    pub fn config(&self) -> &StudyConfig {
        &self.config
    }

    /// Decide the variation for this client.
    ///
    /// A configured override is returned without touching the client id
    /// provider. Otherwise the client id is awaited, prefixed with the study
    /// name, hashed to a fraction, and bucketed over the weighted table.
    ///
    /// Dropping the returned future before it completes leaves no state
    /// behind.
    ///
    /// # Errors
    /// Returns [`StudyError::IdentityUnavailable`] if the provider fails or
    /// yields no identifier, and [`StudyError::InvalidArgument`] if hashing or
    /// selection rejects its inputs.
    pub async fn assign(&self) -> Result<AssignmentResult, StudyError> {
        if let Some(forced) = self.forced() {
            return Ok(forced);
        }
        let client_id = self.fetch_client_id().await?;
        self.assign_client(&client_id)
    }

    /// The configured override as an assignment, if one is set.
    #[must_use]
    pub fn forced(&self) -> Option<AssignmentResult> {
        let forced = self.config.variation_override()?;
        tracing::debug!(
            study = self.config.study_name(),
            variation = forced,
            source = "override",
            "variation chosen"
        );
        Some(AssignmentResult {
            variation: forced.to_string(),
            source: AssignmentSource::Override,
        })
    }

    /// Sample the variation for a known `client_id`, ignoring any override.
    ///
    /// # Errors
    /// Returns [`StudyError::InvalidArgument`] if `client_id` is empty or
    /// selection rejects its inputs.
    pub fn assign_client(&self, client_id: &str) -> Result<AssignmentResult, StudyError> {
        let study = self.config.study_name();
        if client_id.is_empty() {
            return Err(StudyError::invalid("client id is empty"));
        }
        let identity = Identity::new(study, client_id);
        let sample = fraction(identity.as_str(), self.config.precision_bits())?;
        let chosen = choose_from(self.config.table(), sample)?;

        tracing::debug!(
            study,
            variation = %chosen.name,
            source = "computed",
            fraction = sample,
            "variation chosen"
        );
        Ok(AssignmentResult {
            variation: chosen.name.clone(),
            source: AssignmentSource::Computed,
        })
    }

    /// Await the durable client identifier.
    ///
    /// # Errors
    /// Returns [`StudyError::IdentityUnavailable`] if the provider fails or
    /// yields no (or an empty) identifier.
    pub async fn fetch_client_id(&self) -> Result<String, StudyError> {
        let study = self.config.study_name();
        match self.client_ids.client_id().await {
            Ok(Some(id)) if !id.is_empty() => Ok(id),
            Ok(_) => {
                tracing::warn!(study, "client id provider returned no identifier");
                Err(StudyError::identity_unavailable(
                    "client id provider returned no identifier",
                ))
            }
            Err(error) => {
                tracing::warn!(study, "client id provider failed: {error:#}");
                Err(StudyError::identity_unavailable(format!("{error:#}")))
            }
        }
    }
}

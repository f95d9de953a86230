//! One-time enrollment on top of [`AssignmentService`].

use std::sync::Arc;

use crate::assignment::AssignmentService;
use crate::error::EnrollmentError;
use crate::state_store::{EnrollmentRecord, StudyStateStore};
use crate::types::AssignmentResult;

/// Enrolls each client at most once per study.
///
/// Computed assignments are persisted per (study, client) and a persisted one
/// is always returned as-is. A configured override is returned without
/// fetching the client id or touching the store, so it never depends on
/// telemetry and never overwrites an earlier computed enrollment.
#[derive(Clone)]
pub struct StudyEnroller {
    service: AssignmentService,
    store: Arc<dyn StudyStateStore>,
}

impl StudyEnroller {
    /// Create an enroller persisting through `store`.
    #[must_use]
    pub fn new(service: AssignmentService, store: Arc<dyn StudyStateStore>) -> Self {
        Self { service, store }
    }

    /// Return this client's enrollment, assigning and persisting it if needed.
    ///
    /// The client id is awaited before the store is consulted; dropping the
    /// future at that point leaves the store untouched.
    ///
    /// # Errors
    /// Returns [`EnrollmentError::State`] if the store fails and
    /// [`EnrollmentError::Assignment`] if the client id is unavailable or
    /// assignment fails. Nothing is saved on error.
    pub async fn enroll(&self) -> Result<AssignmentResult, EnrollmentError> {
        if let Some(forced) = self.service.forced() {
            return Ok(forced);
        }

        let study = self.service.config().study_name();
        let backend = self.store.backend_name();
        let client_id = self.service.fetch_client_id().await?;

        let existing = self.store.load(study, &client_id).map_err(EnrollmentError::State)?;
        if let Some(existing) = existing {
            tracing::debug!(
                study,
                backend,
                variation = %existing.assignment.variation,
                "reusing persisted enrollment"
            );
            return Ok(existing.assignment);
        }

        let assignment = self.service.assign_client(&client_id)?;
        let record = EnrollmentRecord::new(study, client_id, assignment);
        self.store.save(&record).map_err(EnrollmentError::State)?;

        tracing::info!(
            study,
            backend,
            variation = %record.assignment.variation,
            "client enrolled"
        );
        Ok(record.assignment)
    }
}

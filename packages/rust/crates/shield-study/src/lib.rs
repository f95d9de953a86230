//! shield-study - Deterministic experiment variation assignment
//!
//! Assigns each client of a study to one weighted variation (treatment arm),
//! reproducibly across restarts:
//! - SHA-256 of study name + client id, truncated to a fixed number of bits
//! - Cumulative-weight bucketing of the resulting fraction
//! - Configuration override that bypasses sampling entirely
//! - One-time enrollment persisted through a pluggable state store
//!
//! # Architecture
//!
//! ```text
//! shield-study/src/
//! ├── lib.rs          # Re-exports (this file)
//! ├── error.rs        # StudyError, ConfigError, EnrollmentError
//! ├── types.rs        # VariationSpec, WeightedVariationTable, Identity, AssignmentResult
//! ├── hasher.rs       # fraction()
//! ├── selector.rs     # choose_from()
//! ├── identity.rs     # ClientIdProvider seam
//! ├── config.rs       # YAML StudySettings -> StudyConfig
//! ├── assignment.rs   # AssignmentService
//! ├── state_store.rs  # StudyStateStore backends
//! ├── persistence.rs  # Atomic JSON writes
//! └── enrollment.rs   # StudyEnroller
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shield_study::{AssignmentService, StaticClientIdProvider, load_study_config};
//!
//! let config = load_study_config("study.yaml")?;
//! let service = AssignmentService::new(config, Arc::new(StaticClientIdProvider::new("client-1")));
//! let result = service.assign().await?;
//! println!("{} ({})", result.variation, result.source);
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod assignment;
mod config;
mod enrollment;
mod error;
mod hasher;
mod identity;
mod persistence;
mod selector;
mod state_store;
mod types;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use assignment::AssignmentService;
pub use config::{StudyConfig, StudySettings, VariationSettings, load_study_config};
pub use enrollment::StudyEnroller;
pub use error::{ConfigError, EnrollmentError, StudyError};
pub use hasher::{DEFAULT_PRECISION_BITS, MAX_PRECISION_BITS, fraction};
pub use identity::{ClientIdProvider, StaticClientIdProvider};
pub use selector::choose_from;
pub use state_store::{
    EnrollmentRecord, InMemoryStudyStateStore, LocalStudyStateStore, StudyStateStore,
};
pub use types::{
    AssignmentResult, AssignmentSource, Identity, VariationSpec, WeightedVariationTable,
};

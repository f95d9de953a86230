//! Enrollment state backends.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::persistence::atomic_write_text;
use crate::types::AssignmentResult;

/// A persisted enrollment: one client's computed assignment in one study.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    /// Study the client is enrolled in.
    pub study_name: String,
    /// Client the assignment belongs to.
    pub client_id: String,
    /// Assignment decided at enrollment.
    #[serde(flatten)]
    pub assignment: AssignmentResult,
    /// When the enrollment was first persisted.
    pub enrolled_at: DateTime<Utc>,
}

impl EnrollmentRecord {
    /// Stamp `assignment` for `client_id` in `study_name` with the current time.
    #[must_use]
    pub fn new(
        study_name: impl Into<String>,
        client_id: impl Into<String>,
        assignment: AssignmentResult,
    ) -> Self {
        Self {
            study_name: study_name.into(),
            client_id: client_id.into(),
            assignment,
            enrolled_at: Utc::now(),
        }
    }
}

/// Persistence abstraction for enrollment state, keyed by study and client.
pub trait StudyStateStore: Send + Sync {
    /// Backend identifier for logs.
    fn backend_name(&self) -> &'static str;

    /// Load the enrollment of `client_id` in `study_name`, if one was saved.
    fn load(&self, study_name: &str, client_id: &str) -> Result<Option<EnrollmentRecord>>;

    /// Persist `record`, replacing any earlier record for the same study and client.
    fn save(&self, record: &EnrollmentRecord) -> Result<()>;
}

/// Process-local enrollment state; lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryStudyStateStore {
    records: DashMap<(String, String), EnrollmentRecord>,
}

impl InMemoryStudyStateStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of saved enrollments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no enrollment has been saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl StudyStateStore for InMemoryStudyStateStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn load(&self, study_name: &str, client_id: &str) -> Result<Option<EnrollmentRecord>> {
        let key = (study_name.to_string(), client_id.to_string());
        Ok(self.records.get(&key).map(|entry| entry.value().clone()))
    }

    fn save(&self, record: &EnrollmentRecord) -> Result<()> {
        let key = (record.study_name.clone(), record.client_id.clone());
        self.records.insert(key, record.clone());
        Ok(())
    }
}

/// JSON-file enrollment state, one file per study and client under a root
/// directory.
#[derive(Debug, Clone)]
pub struct LocalStudyStateStore {
    root: PathBuf,
}

impl LocalStudyStateStore {
    /// Create a store rooted at `root`. The directory is created on first save.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding the enrollment of `client_id` in `study_name`.
    ///
    /// The stem is the study name with characters outside `[A-Za-z0-9._-]`
    /// replaced by `_`, then the first 16 hex digits of
    /// `sha256(study_name \0 client_id)`. The digest keeps studies whose
    /// sanitized names coincide, and different clients, in separate files.
    #[must_use]
    pub fn record_path(&self, study_name: &str, client_id: &str) -> PathBuf {
        let readable: String = study_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let mut hasher = Sha256::new();
        hasher.update(study_name.as_bytes());
        hasher.update([0u8]);
        hasher.update(client_id.as_bytes());
        let digest = hex::encode(hasher.finalize());
        self.root.join(format!("{readable}-{}.enrollment.json", &digest[..16]))
    }
}

impl StudyStateStore for LocalStudyStateStore {
    fn backend_name(&self) -> &'static str {
        "local"
    }

    fn load(&self, study_name: &str, client_id: &str) -> Result<Option<EnrollmentRecord>> {
        let path = self.record_path(study_name, client_id);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(error)
                    .with_context(|| format!("failed to read enrollment {}", path.display()));
            }
        };
        let record: EnrollmentRecord = serde_json::from_str(&text)
            .with_context(|| format!("failed to decode enrollment {}", path.display()))?;
        if record.study_name != study_name || record.client_id != client_id {
            bail!(
                "enrollment {} belongs to client '{}' in study '{}'",
                path.display(),
                record.client_id,
                record.study_name
            );
        }
        Ok(Some(record))
    }

    fn save(&self, record: &EnrollmentRecord) -> Result<()> {
        let path = self.record_path(&record.study_name, &record.client_id);
        let payload =
            serde_json::to_string_pretty(record).context("failed to encode enrollment record")?;
        atomic_write_text(&path, &payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AssignmentSource;

    #[test]
    fn test_record_path_readable_prefix() {
        let store = LocalStudyStateStore::new("/state");
        let path = store.record_path("button/study v2", "client-1");
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("button_study_v2-"), "{name}");
        assert!(name.ends_with(".enrollment.json"), "{name}");
        assert_eq!(path.parent().unwrap(), Path::new("/state"));
    }

    #[test]
    fn test_record_path_separates_colliding_names_and_clients() {
        let store = LocalStudyStateStore::new("/state");
        assert_ne!(store.record_path("a/b", "c"), store.record_path("a_b", "c"));
        assert_ne!(store.record_path("s", "c1"), store.record_path("s", "c2"));
        assert_ne!(store.record_path("ab", "c"), store.record_path("a", "bc"));
        assert_eq!(store.record_path("s", "c1"), store.record_path("s", "c1"));
    }

    #[test]
    fn test_record_json_shape() {
        let record = EnrollmentRecord::new(
            "button-study",
            "client-1",
            AssignmentResult {
                variation: "kittens".to_string(),
                source: AssignmentSource::Computed,
            },
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["study_name"], "button-study");
        assert_eq!(value["client_id"], "client-1");
        assert_eq!(value["variation"], "kittens");
        assert_eq!(value["source"], "computed");
        assert!(value["enrolled_at"].is_string());
    }
}

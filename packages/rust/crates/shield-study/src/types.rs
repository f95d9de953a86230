//! Core data types: variations, weighted tables, identities, and results.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::error::StudyError;

/// A named treatment arm with a relative sampling weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariationSpec {
    /// Variation name reported in the assignment.
    pub name: String,
    /// Relative weight; bucket width is proportional to it.
    pub weight: f64,
}

impl VariationSpec {
    /// Create a variation spec.
    #[must_use]
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// Ordered, validated list of variations for one study session.
///
/// Construction guarantees a non-empty table whose weights are all finite and
/// strictly positive. The table is immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WeightedVariationTable {
    variations: Vec<VariationSpec>,
}

impl WeightedVariationTable {
    /// Validate and wrap a list of variations.
    ///
    /// # Errors
    /// Returns [`StudyError::InvalidArgument`] for an empty list, an empty or
    /// duplicated name, a weight that is not finite and positive, or weights
    /// whose sum overflows.
    pub fn new(variations: Vec<VariationSpec>) -> Result<Self, StudyError> {
        if variations.is_empty() {
            return Err(StudyError::invalid("variation table is empty"));
        }
        for (index, variation) in variations.iter().enumerate() {
            if variation.name.is_empty() {
                return Err(StudyError::invalid(format!(
                    "variation at position {index} has an empty name"
                )));
            }
            if !variation.weight.is_finite() || variation.weight <= 0.0 {
                return Err(StudyError::invalid(format!(
                    "variation '{}' has non-positive weight {}",
                    variation.name, variation.weight
                )));
            }
            if variations[..index].iter().any(|v| v.name == variation.name) {
                return Err(StudyError::invalid(format!(
                    "variation '{}' is listed more than once",
                    variation.name
                )));
            }
        }
        let total: f64 = variations.iter().map(|v| v.weight).sum();
        if !total.is_finite() {
            return Err(StudyError::invalid("sum of variation weights overflows"));
        }
        Ok(Self { variations })
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.variations.iter().map(|v| v.weight).sum()
    }

    /// Whether a variation with `name` exists in the table.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.variations.iter().any(|v| v.name == name)
    }
}

impl Deref for WeightedVariationTable {
    type Target = [VariationSpec];

    fn deref(&self) -> &Self::Target {
        &self.variations
    }
}

/// Hash key for one client in one study: study name followed by client id.
///
/// The two parts are concatenated with no separator, so `("ab", "c")` and
/// `("a", "bc")` collide. Existing enrollments depend on this exact form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    /// Build the identity for `client_id` in `study_name`.
    #[must_use]
    pub fn new(study_name: &str, client_id: &str) -> Self {
        let mut key = String::with_capacity(study_name.len() + client_id.len());
        key.push_str(study_name);
        key.push_str(client_id);
        Self(key)
    }

    /// Borrow the identity string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a variation was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentSource {
    /// Forced by configuration.
    Override,
    /// Sampled from the client identity.
    Computed,
}

impl AssignmentSource {
    /// Wire name of the source.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Override => "override",
            Self::Computed => "computed",
        }
    }
}

impl fmt::Display for AssignmentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The variation a client was enrolled into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentResult {
    /// Chosen variation name.
    pub variation: String,
    /// Whether the variation was forced or computed.
    pub source: AssignmentSource,
}

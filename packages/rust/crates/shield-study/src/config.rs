//! Study settings loader.
//!
//! Settings are a single YAML document:
//!
//! ```yaml
//! study_name: shield-button-study
//! precision_bits: 12
//! variation: kittens
//! weighted_variations:
//!   - name: kittens
//!     weight: 1.5
//!   - name: puppers
//! ```
//!
//! `variation` forces every client into that arm. A missing `weight`
//! counts as 1.

use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, StudyError};
use crate::hasher::{DEFAULT_PRECISION_BITS, MAX_PRECISION_BITS};
use crate::types::{VariationSpec, WeightedVariationTable};

/// Raw study settings as written in YAML.
#[derive(Debug, Clone, Deserialize)]
pub struct StudySettings {
    /// Study name; prefixed to the client id when hashing.
    pub study_name: String,
    /// Hash precision in bits.
    #[serde(default = "default_precision_bits")]
    pub precision_bits: u32,
    /// Forced variation, bypassing sampling.
    #[serde(default)]
    pub variation: Option<String>,
    /// Ordered weighted arms.
    #[serde(default)]
    pub weighted_variations: Vec<VariationSettings>,
}

/// One arm as written in YAML.
#[derive(Debug, Clone, Deserialize)]
pub struct VariationSettings {
    /// Arm name.
    pub name: String,
    /// Relative weight, 1 when omitted.
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_precision_bits() -> u32 {
    DEFAULT_PRECISION_BITS
}

fn default_weight() -> f64 {
    1.0
}

impl StudySettings {
    /// Parse settings from YAML text.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] if the text is not a valid settings document.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Validate settings into an immutable [`StudyConfig`].
    ///
    /// # Errors
    /// Returns [`StudyError::InvalidArgument`] for an empty study name, an
    /// invalid variation table, or a precision outside `1..=52`.
    pub fn into_config(self) -> Result<StudyConfig, StudyError> {
        let variations = self
            .weighted_variations
            .into_iter()
            .map(|v| VariationSpec::new(v.name, v.weight))
            .collect();
        StudyConfig::new(
            self.study_name,
            self.precision_bits,
            self.variation,
            WeightedVariationTable::new(variations)?,
        )
    }
}

/// Validated configuration for one study session.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyConfig {
    study_name: String,
    precision_bits: u32,
    variation_override: Option<String>,
    table: WeightedVariationTable,
}

impl StudyConfig {
    /// Build a study configuration.
    ///
    /// An override need not name an arm in `table`; it is only logged.
    ///
    /// # Errors
    /// Returns [`StudyError::InvalidArgument`] for an empty study name, an empty
    /// override, or a precision outside `1..=52`.
    pub fn new(
        study_name: impl Into<String>,
        precision_bits: u32,
        variation_override: Option<String>,
        table: WeightedVariationTable,
    ) -> Result<Self, StudyError> {
        let study_name = study_name.into();
        if study_name.is_empty() {
            return Err(StudyError::invalid("study name is empty"));
        }
        if precision_bits == 0 || precision_bits > MAX_PRECISION_BITS {
            return Err(StudyError::invalid(format!(
                "precision must be between 1 and {MAX_PRECISION_BITS} bits, got {precision_bits}"
            )));
        }
        if variation_override.as_deref() == Some("") {
            return Err(StudyError::invalid("variation override is empty"));
        }
        if let Some(forced) = variation_override.as_deref()
            && !table.contains(forced)
        {
            tracing::warn!(
                study = %study_name,
                variation = forced,
                "variation override names no weighted arm"
            );
        }
        Ok(Self {
            study_name,
            precision_bits,
            variation_override,
            table,
        })
    }

    /// Study name.
    #[must_use]
    pub fn study_name(&self) -> &str {
        &self.study_name
    }

    /// Hash precision in bits.
    #[must_use]
    pub fn precision_bits(&self) -> u32 {
        self.precision_bits
    }

    /// Forced variation, if any.
    #[must_use]
    pub fn variation_override(&self) -> Option<&str> {
        self.variation_override.as_deref()
    }

    /// Weighted arms.
    #[must_use]
    pub fn table(&self) -> &WeightedVariationTable {
        &self.table
    }
}

/// Read and validate study settings from a YAML file.
///
/// # Errors
/// Returns [`ConfigError`] if the file cannot be read, parsed, or validated.
pub fn load_study_config(path: impl AsRef<Path>) -> Result<StudyConfig, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config = StudySettings::from_yaml_str(&text)?.into_config()?;
    tracing::debug!(
        path = %path.display(),
        study = config.study_name(),
        arms = config.table().len(),
        "loaded study settings"
    );
    Ok(config)
}

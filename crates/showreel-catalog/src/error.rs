//! Catalog construction errors.

use std::path::PathBuf;

use showreel_core::error::PlaybackError;
use thiserror::Error;

/// Errors raised while building a catalog. All of them abort engine startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog contains no units at all.
    #[error("catalog contains no units")]
    EmptyCatalog,

    /// A unit was declared without steps.
    #[error("unit {unit_id} has no steps")]
    EmptySteps {
        /// The offending unit.
        unit_id: String,
    },

    /// A step declared an explicit zero duration.
    #[error("step {step_index} of unit {unit_id} has a zero duration")]
    ZeroDuration {
        /// The unit owning the step.
        unit_id: String,
        /// Position of the step within the unit.
        step_index: usize,
    },

    /// Two units share an identifier.
    #[error("duplicate unit id: {0}")]
    DuplicateUnit(String),

    /// A group was declared (for ordering) but no unit belongs to it.
    #[error("group {0} has no units")]
    EmptyGroup(String),

    /// A pinned ordering named a unit that is not in the group.
    #[error("group {group} pins unit {unit_id}, which is not a member")]
    UnknownPinnedUnit {
        /// The group carrying the override.
        group: String,
        /// The unit that could not be found.
        unit_id: String,
    },

    /// The catalog document is not valid YAML for the expected shape.
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl From<CatalogError> for PlaybackError {
    fn from(err: CatalogError) -> Self {
        PlaybackError::Configuration(err.to_string())
    }
}

//! Serialized catalog records, as authored in a catalog document.

use serde::{Deserialize, Serialize};

use super::ordering::GroupKeyOrder;

/// Duration applied to a step record that omits `duration_ms`.
pub const DEFAULT_STEP_DURATION_MS: u64 = 3000;

/// A whole catalog document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    /// How groups are ordered relative to each other.
    #[serde(default)]
    pub group_order: GroupKeyOrder,
    /// Optional per-group settings (currently the pinned unit order).
    #[serde(default)]
    pub groups: Vec<GroupRecord>,
    /// Every unit, in catalog order.
    pub units: Vec<UnitRecord>,
}

/// Per-group settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRecord {
    /// The group key these settings apply to.
    pub key: String,
    /// Unit ids that play first, in this order; the rest keep catalog order.
    #[serde(default)]
    pub pinned: Vec<String>,
}

/// One playable project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitRecord {
    /// Stable identifier, unique across the catalog.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Key of the group (year) the unit belongs to.
    pub group: String,
    /// How long the final frame is held after the last step, in milliseconds.
    #[serde(default)]
    pub outro_ms: u64,
    /// Ordered narrative steps.
    pub steps: Vec<StepRecord>,
}

/// One narrative beat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    /// Display label, opaque to the engine.
    pub label: String,
    /// Step duration in milliseconds; [`DEFAULT_STEP_DURATION_MS`] if absent.
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

impl StepRecord {
    /// Creates a step record with an explicit duration.
    #[must_use]
    pub fn new(label: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            label: label.into(),
            duration_ms: Some(duration_ms),
        }
    }

    /// The duration to play, falling back to the default.
    #[must_use]
    pub fn effective_duration_ms(&self) -> u64 {
        self.duration_ms.unwrap_or(DEFAULT_STEP_DURATION_MS)
    }
}

impl UnitRecord {
    /// Creates a unit record with no outro hold.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        group: impl Into<String>,
        steps: Vec<StepRecord>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            group: group.into(),
            outro_ms: 0,
            steps,
        }
    }

    /// Sets the outro hold in milliseconds.
    #[must_use]
    pub fn with_outro_ms(mut self, outro_ms: u64) -> Self {
        self.outro_ms = outro_ms;
        self
    }
}

//! Immutable catalog model: groups of units made of timed steps.

use std::sync::Arc;
use std::time::Duration;

/// One timed narrative beat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    label: String,
    duration: Duration,
}

impl Step {
    /// Creates a step. Catalog ingestion rejects zero durations; steps built
    /// directly are not checked here.
    #[must_use]
    pub fn new(label: impl Into<String>, duration: Duration) -> Self {
        Self {
            label: label.into(),
            duration,
        }
    }

    /// Display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// How long the step stays active.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// One playable project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    id: String,
    title: String,
    steps: Arc<[Step]>,
    outro: Duration,
}

impl Unit {
    pub(crate) fn new(
        id: String,
        title: String,
        steps: Vec<Step>,
        outro: Duration,
    ) -> Self {
        Self {
            id,
            title,
            steps: steps.into(),
            outro,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Ordered steps. Never empty for units built by the catalog.
    #[must_use]
    pub fn steps(&self) -> &Arc<[Step]> {
        &self.steps
    }

    /// Hold applied to the final frame before the unit completes.
    #[must_use]
    pub fn outro(&self) -> Duration {
        self.outro
    }

    /// Sum of every step duration plus the outro hold.
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(Step::duration).sum::<Duration>() + self.outro
    }
}

/// A named collection of units sharing a key (the "year").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    key: String,
    units: Vec<Arc<Unit>>,
}

impl Group {
    pub(crate) fn new(key: String, units: Vec<Arc<Unit>>) -> Self {
        Self { key, units }
    }

    /// Group key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Members in playback order.
    #[must_use]
    pub fn units(&self) -> &[Arc<Unit>] {
        &self.units
    }

    /// Member at `index`, if any.
    #[must_use]
    pub fn unit(&self, index: usize) -> Option<&Arc<Unit>> {
        self.units.get(index)
    }

    /// Number of members (at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Always `false` for groups built by the catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Member identifiers in playback order.
    pub fn unit_ids(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(|unit| unit.id())
    }
}

/// The validated, immutable catalog.
///
/// Invariants: at least one group; every group has at least one unit; every
/// unit has at least one step; unit ids are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    groups: Vec<Group>,
}

impl Catalog {
    pub(crate) fn new(groups: Vec<Group>) -> Self {
        Self { groups }
    }

    /// Groups in playback order.
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Group at `index`, if any.
    #[must_use]
    pub fn group(&self, index: usize) -> Option<&Group> {
        self.groups.get(index)
    }

    /// Number of groups (at least one).
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of units across all groups.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }
}

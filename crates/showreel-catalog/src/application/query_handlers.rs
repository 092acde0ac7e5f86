//! Read-only catalog views.

use std::time::Duration;

use serde::Serialize;

use crate::domain::model::{Catalog, Group, Step, Unit};

/// Read-only view of the whole catalog.
#[derive(Debug, Serialize)]
pub struct CatalogView {
    /// Groups in playback order.
    pub groups: Vec<GroupView>,
    /// Number of units across all groups.
    pub unit_count: usize,
}

/// Read-only view of one group.
#[derive(Debug, Serialize)]
pub struct GroupView {
    /// Group key.
    pub key: String,
    /// Members in playback order.
    pub units: Vec<UnitView>,
}

/// Read-only view of one unit.
#[derive(Debug, Serialize)]
pub struct UnitView {
    /// Unit identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Steps in playback order.
    pub steps: Vec<StepView>,
    /// Final-frame hold in milliseconds.
    pub outro_ms: u64,
    /// Total playback time in milliseconds.
    pub total_ms: u64,
}

/// Read-only view of one step.
#[derive(Debug, Serialize)]
pub struct StepView {
    /// Display label.
    pub label: String,
    /// Duration in milliseconds.
    pub duration_ms: u64,
}

/// Builds the catalog view.
#[must_use]
pub fn catalog_view(catalog: &Catalog) -> CatalogView {
    CatalogView {
        groups: catalog.groups().iter().map(group_view).collect(),
        unit_count: catalog.unit_count(),
    }
}

fn group_view(group: &Group) -> GroupView {
    GroupView {
        key: group.key().to_owned(),
        units: group.units().iter().map(|unit| unit_view(unit)).collect(),
    }
}

fn unit_view(unit: &Unit) -> UnitView {
    UnitView {
        id: unit.id().to_owned(),
        title: unit.title().to_owned(),
        steps: unit.steps().iter().map(step_view).collect(),
        outro_ms: millis(unit.outro()),
        total_ms: millis(unit.total_duration()),
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn step_view(step: &Step) -> StepView {
    StepView {
        label: step.label().to_owned(),
        duration_ms: millis(step.duration()),
    }
}

//! Read-only playback views.

use serde::Serialize;

use crate::domain::orchestrator::{NarrativeOrchestrator, OrchestratorState};

/// Point-in-time view of the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaybackView {
    /// Lifecycle state.
    pub state: OrchestratorState,
    /// Active group index.
    pub group_index: usize,
    /// Active group key.
    pub group_key: String,
    /// Active unit index within the group.
    pub unit_index: usize,
    /// Active unit identifier.
    pub unit_id: String,
    /// Active unit title.
    pub unit_title: String,
    /// Active step index; equals `step_count` on the unit's final frame.
    pub step_index: usize,
    /// Number of steps in the active unit.
    pub step_count: usize,
    /// Label of the active step; absent on the final frame.
    pub step_label: Option<String>,
    /// Circular offset of every group from the active one.
    pub group_offsets: Vec<isize>,
    /// Circular offset of every unit in the active group from the active one.
    pub unit_offsets: Vec<isize>,
}

/// Builds the playback view.
#[must_use]
pub fn playback_view(orchestrator: &NarrativeOrchestrator) -> PlaybackView {
    let group_key = orchestrator
        .current_group()
        .map(|group| group.key().to_owned())
        .unwrap_or_default();
    let unit = orchestrator.current_unit();
    PlaybackView {
        state: orchestrator.state(),
        group_index: orchestrator.group_index(),
        group_key,
        unit_index: orchestrator.unit_index(),
        unit_id: unit.map(|unit| unit.id().to_owned()).unwrap_or_default(),
        unit_title: unit.map(|unit| unit.title().to_owned()).unwrap_or_default(),
        step_index: orchestrator.step_index().unwrap_or(0),
        step_count: unit.map_or(0, |unit| unit.steps().len()),
        step_label: orchestrator
            .current_step()
            .map(|step| step.label().to_owned()),
        group_offsets: orchestrator.group_offsets(),
        unit_offsets: orchestrator.unit_offsets(),
    }
}

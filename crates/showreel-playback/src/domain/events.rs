//! Events published by the playback engine.

use serde::{Deserialize, Serialize};
use showreel_core::event::{DomainEvent, EventMetadata};

/// Why a unit started playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartCause {
    /// First unit after the orchestrator started.
    Initial,
    /// The previous unit completed.
    AutoAdvance,
    /// The user selected a group.
    GroupSelected,
    /// The user selected a unit in the active group.
    UnitSelected,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlaybackEventKind {
    /// A unit started at step 0.
    UnitStarted {
        group_index: usize,
        group_key: String,
        unit_index: usize,
        unit_id: String,
        step_count: usize,
        cause: StartCause,
    },
    /// The active unit moved to `step_index`. Equals the step count on the
    /// unit's final frame.
    StepAdvanced {
        group_index: usize,
        unit_index: usize,
        unit_id: String,
        step_index: usize,
    },
    /// The active unit finished its steps and outro hold.
    UnitCompleted {
        group_index: usize,
        unit_index: usize,
        unit_id: String,
    },
    /// Playback stopped; no further events follow.
    PlaybackStopped {
        group_index: usize,
        unit_index: usize,
    },
}

/// Event envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: PlaybackEventKind,
}

impl PlaybackEventKind {
    /// Routing name of the variant.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::UnitStarted { .. } => "playback.unit_started",
            Self::StepAdvanced { .. } => "playback.step_advanced",
            Self::UnitCompleted { .. } => "playback.unit_completed",
            Self::PlaybackStopped { .. } => "playback.stopped",
        }
    }
}

impl DomainEvent for PlaybackEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_payload_is_tagged_with_snake_case_kind() {
        // Arrange
        let event = PlaybackEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: "playback.unit_started".to_owned(),
                sequence_number: 1,
                occurred_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
            },
            kind: PlaybackEventKind::UnitStarted {
                group_index: 5,
                group_key: "2025".to_owned(),
                unit_index: 2,
                unit_id: "arc".to_owned(),
                step_count: 5,
                cause: StartCause::AutoAdvance,
            },
        };

        // Act
        let payload = serde_json::to_value(&event).unwrap();

        // Assert
        assert_eq!(event.event_type(), "playback.unit_started");
        assert_eq!(payload["metadata"]["sequence_number"], 1);
        assert_eq!(payload["kind"]["kind"], "unit_started");
        assert_eq!(payload["kind"]["group_key"], "2025");
        assert_eq!(payload["kind"]["cause"], "auto_advance");
    }

    #[test]
    fn test_stopped_event_type() {
        let kind = PlaybackEventKind::PlaybackStopped {
            group_index: 0,
            unit_index: 0,
        };

        assert_eq!(kind.event_type(), "playback.stopped");
    }
}

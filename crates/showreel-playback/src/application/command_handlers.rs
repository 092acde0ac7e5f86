//! Command handlers for playback.
//!
//! Each handler applies one user command to the orchestrator and returns the
//! events it produced. The orchestrator publishes the same events to its
//! subscribers.

use showreel_core::command::Command;
use showreel_core::error::PlaybackError;
use tracing::{info, instrument, warn};

use crate::domain::commands::{SelectGroup, SelectUnitInGroup, StopPlayback};
use crate::domain::events::PlaybackEvent;
use crate::domain::orchestrator::NarrativeOrchestrator;

/// Handles the `SelectGroup` command: cancels the live unit and starts the
/// first unit of the requested group.
///
/// # Errors
///
/// Returns `PlaybackError::IndexOutOfRange` for an unknown group and
/// `PlaybackError::InvalidState` if playback is not running.
#[instrument(
    skip_all,
    fields(
        command_type = command.command_type(),
        correlation_id = %command.correlation_id(),
        group_index = command.group_index
    )
)]
pub fn handle_select_group(
    command: &SelectGroup,
    orchestrator: &mut NarrativeOrchestrator,
) -> Result<Vec<PlaybackEvent>, PlaybackError> {
    let events = orchestrator
        .select_group(command.group_index)
        .inspect_err(|err| warn!(error = %err, "group selection rejected"))?;
    info!("group selected");
    Ok(events)
}

/// Handles the `SelectUnitInGroup` command: cancels the live unit and starts
/// the requested unit of the active group.
///
/// # Errors
///
/// Returns `PlaybackError::IndexOutOfRange` for an index outside the active
/// group and `PlaybackError::InvalidState` if playback is not running.
#[instrument(
    skip_all,
    fields(
        command_type = command.command_type(),
        correlation_id = %command.correlation_id(),
        unit_index = command.unit_index
    )
)]
pub fn handle_select_unit(
    command: &SelectUnitInGroup,
    orchestrator: &mut NarrativeOrchestrator,
) -> Result<Vec<PlaybackEvent>, PlaybackError> {
    let events = orchestrator
        .select_unit_in_group(command.unit_index)
        .inspect_err(|err| warn!(error = %err, "unit selection rejected"))?;
    info!("unit selected");
    Ok(events)
}

/// Handles the `StopPlayback` command. Stopping twice is not an error; the
/// second call returns no events.
#[instrument(
    skip_all,
    fields(
        command_type = command.command_type(),
        correlation_id = %command.correlation_id()
    )
)]
pub fn handle_stop(
    command: &StopPlayback,
    orchestrator: &mut NarrativeOrchestrator,
) -> Vec<PlaybackEvent> {
    orchestrator.stop()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use showreel_test_support::{fixed_clock, two_group_catalog};
    use uuid::Uuid;

    use super::*;
    use crate::domain::events::{PlaybackEventKind, StartCause};

    fn playing() -> NarrativeOrchestrator {
        let mut orchestrator =
            NarrativeOrchestrator::new(two_group_catalog(), Arc::new(fixed_clock())).unwrap();
        orchestrator.start().unwrap();
        orchestrator
    }

    #[tokio::test(start_paused = true)]
    async fn test_handle_select_group_starts_group_and_returns_event() {
        // Arrange
        let mut orchestrator = playing();
        let command = SelectGroup {
            correlation_id: Uuid::new_v4(),
            group_index: 1,
        };

        // Act
        let events = handle_select_group(&command, &mut orchestrator).unwrap();

        // Assert
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0].kind,
            PlaybackEventKind::UnitStarted { group_key, cause: StartCause::GroupSelected, .. }
                if group_key == "2025"
        ));
        assert_eq!(orchestrator.group_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_handle_select_unit_rejects_out_of_range_index() {
        // Arrange
        let mut orchestrator = playing();
        let command = SelectUnitInGroup {
            correlation_id: Uuid::new_v4(),
            unit_index: 9,
        };

        // Act
        let result = handle_select_unit(&command, &mut orchestrator);

        // Assert
        assert_eq!(
            result,
            Err(PlaybackError::IndexOutOfRange {
                what: "unit",
                index: 9,
                len: 2
            })
        );
        assert_eq!(orchestrator.unit_index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_handle_stop_twice_emits_one_stopped_event() {
        // Arrange
        let mut orchestrator = playing();
        let command = StopPlayback {
            correlation_id: Uuid::new_v4(),
        };

        // Act
        let first = handle_stop(&command, &mut orchestrator);
        let second = handle_stop(&command, &mut orchestrator);

        // Assert
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].metadata.event_type, "playback.stopped");
        assert!(second.is_empty());
    }
}

//! Two-level carousel: groups, units within the active group, and the one
//! live step sequencer.

use std::sync::Arc;

use showreel_catalog::{Catalog, Group, Step, Unit};
use showreel_core::clock::Clock;
use showreel_core::error::PlaybackError;
use showreel_core::event::EventMetadata;
use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;

use super::events::{PlaybackEvent, PlaybackEventKind, StartCause};
use super::selector::CarouselSelector;
use super::sequencer::{SequencerSignal, StepSequencer};

/// Default capacity of the event broadcast channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Orchestrator lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrchestratorState {
    /// Built, not started.
    Idle,
    /// A unit is playing.
    Playing,
    /// Between a unit completing and the next one starting.
    Transitioning,
    /// Stopped for good.
    Stopped,
}

/// Composes the group selector, the unit selector for the active group and
/// exactly one live [`StepSequencer`].
///
/// All methods take `&mut self`; the owner serializes commands and timer
/// elapses (see the player task).
pub struct NarrativeOrchestrator {
    catalog: Arc<Catalog>,
    clock: Arc<dyn Clock>,
    state: OrchestratorState,
    groups: CarouselSelector,
    units: CarouselSelector,
    sequencer: Option<StepSequencer>,
    sequence_number: u64,
    events: broadcast::Sender<PlaybackEvent>,
}

impl std::fmt::Debug for NarrativeOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrativeOrchestrator")
            .field("state", &self.state)
            .field("groups", &self.groups)
            .field("units", &self.units)
            .field("sequencer", &self.sequencer)
            .field("sequence_number", &self.sequence_number)
            .finish_non_exhaustive()
    }
}

impl NarrativeOrchestrator {
    /// Creates an idle orchestrator with the default event capacity.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::Configuration` if the catalog has no groups or
    /// its first group has no units.
    pub fn new(catalog: Arc<Catalog>, clock: Arc<dyn Clock>) -> Result<Self, PlaybackError> {
        Self::with_event_capacity(catalog, clock, DEFAULT_EVENT_CAPACITY)
    }

    /// Creates an idle orchestrator whose event channel buffers `capacity`
    /// events per subscriber.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::Configuration` if `capacity` is zero, the
    /// catalog has no groups, or its first group has no units.
    pub fn with_event_capacity(
        catalog: Arc<Catalog>,
        clock: Arc<dyn Clock>,
        capacity: usize,
    ) -> Result<Self, PlaybackError> {
        if capacity == 0 {
            return Err(PlaybackError::Configuration(
                "event capacity must be at least 1".to_owned(),
            ));
        }
        let groups = CarouselSelector::new(catalog.group_count())?;
        let first_group_len = catalog.group(0).map_or(0, Group::len);
        let units = CarouselSelector::new(first_group_len)?;
        let (events, _) = broadcast::channel(capacity);
        Ok(Self {
            catalog,
            clock,
            state: OrchestratorState::Idle,
            groups,
            units,
            sequencer: None,
            sequence_number: 0,
            events,
        })
    }

    /// Starts the first unit of the first group.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::InvalidState` unless the orchestrator is idle.
    pub fn start(&mut self) -> Result<Vec<PlaybackEvent>, PlaybackError> {
        if self.state != OrchestratorState::Idle {
            return Err(self.invalid_state("start"));
        }
        self.groups.reset();
        self.units = CarouselSelector::new(self.group_len(0))?;
        let started = self.start_unit(StartCause::Initial)?;
        Ok(vec![started])
    }

    /// Waits for the live sequencer's next signal and applies it.
    ///
    /// Returns no events, without waiting, unless playing. Cancel-safe: the
    /// orchestrator changes only after a timer has fired, and the changes
    /// happen without further awaiting.
    ///
    /// # Errors
    ///
    /// Returns an error if the next unit cannot be started after a
    /// completion. The orchestrator is left `Transitioning`.
    pub async fn next_events(&mut self) -> Result<Vec<PlaybackEvent>, PlaybackError> {
        if self.state != OrchestratorState::Playing {
            return Ok(Vec::new());
        }
        let Some(sequencer) = self.sequencer.as_mut() else {
            return Ok(Vec::new());
        };
        let signal = sequencer.next_signal().await;
        match signal {
            SequencerSignal::Advanced { step } => {
                let event = self.emit(PlaybackEventKind::StepAdvanced {
                    group_index: self.groups.current_index(),
                    unit_index: self.units.current_index(),
                    unit_id: self.unit_id(),
                    step_index: step,
                });
                Ok(vec![event])
            }
            SequencerSignal::Complete => self.on_unit_complete(),
        }
    }

    /// Jumps to the first unit of group `index`.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::InvalidState` unless playing, and
    /// `PlaybackError::IndexOutOfRange` for an unknown group. Nothing changes
    /// on error.
    pub fn select_group(&mut self, index: usize) -> Result<Vec<PlaybackEvent>, PlaybackError> {
        self.ensure_selectable("select a group")?;
        let len = self.catalog.group_count();
        if index >= len {
            return Err(PlaybackError::IndexOutOfRange {
                what: "group",
                index,
                len,
            });
        }
        let units = CarouselSelector::new(self.group_len(index))?;
        self.groups.jump_to(index)?;
        self.units = units;
        Ok(vec![self.start_unit(StartCause::GroupSelected)?])
    }

    /// Jumps to unit `index` of the active group.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::InvalidState` unless playing, and
    /// `PlaybackError::IndexOutOfRange` for an index outside the active group.
    /// Nothing changes on error.
    pub fn select_unit_in_group(
        &mut self,
        index: usize,
    ) -> Result<Vec<PlaybackEvent>, PlaybackError> {
        self.ensure_selectable("select a unit")?;
        let len = self.units.len();
        if index >= len {
            return Err(PlaybackError::IndexOutOfRange {
                what: "unit",
                index,
                len,
            });
        }
        self.units.jump_to(index)?;
        Ok(vec![self.start_unit(StartCause::UnitSelected)?])
    }

    /// Cancels the live sequencer and freezes the selectors. Idempotent: only
    /// the first call emits `PlaybackStopped`.
    pub fn stop(&mut self) -> Vec<PlaybackEvent> {
        if self.state == OrchestratorState::Stopped {
            return Vec::new();
        }
        if let Some(sequencer) = self.sequencer.as_mut() {
            sequencer.cancel();
        }
        self.state = OrchestratorState::Stopped;
        info!(
            group_index = self.groups.current_index(),
            unit_index = self.units.current_index(),
            "playback stopped"
        );
        vec![self.emit(PlaybackEventKind::PlaybackStopped {
            group_index: self.groups.current_index(),
            unit_index: self.units.current_index(),
        })]
    }

    #[must_use]
    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    /// Whether a unit is playing, i.e. [`next_events`](Self::next_events) is
    /// worth awaiting.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state == OrchestratorState::Playing
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    #[must_use]
    pub fn group_index(&self) -> usize {
        self.groups.current_index()
    }

    #[must_use]
    pub fn unit_index(&self) -> usize {
        self.units.current_index()
    }

    /// Active step index of the live sequencer; `None` before the first
    /// start.
    #[must_use]
    pub fn step_index(&self) -> Option<usize> {
        self.sequencer.as_ref().map(StepSequencer::current)
    }

    /// The active step, or `None` before start and on a unit's final frame.
    #[must_use]
    pub fn current_step(&self) -> Option<&Step> {
        self.sequencer
            .as_ref()
            .and_then(StepSequencer::current_step)
    }

    #[must_use]
    pub fn current_group(&self) -> Option<&Group> {
        self.catalog.group(self.groups.current_index())
    }

    #[must_use]
    pub fn current_unit(&self) -> Option<&Arc<Unit>> {
        self.current_group()
            .and_then(|group| group.unit(self.units.current_index()))
    }

    /// Shortest circular offset of every group from the active one.
    #[must_use]
    pub fn group_offsets(&self) -> Vec<isize> {
        self.groups.offsets()
    }

    /// Shortest circular offset of every unit in the active group from the
    /// active unit.
    #[must_use]
    pub fn unit_offsets(&self) -> Vec<isize> {
        self.units.offsets()
    }

    /// Subscribes to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    pub(crate) fn event_sender(&self) -> broadcast::Sender<PlaybackEvent> {
        self.events.clone()
    }

    fn on_unit_complete(&mut self) -> Result<Vec<PlaybackEvent>, PlaybackError> {
        self.state = OrchestratorState::Transitioning;
        let completed = self.emit(PlaybackEventKind::UnitCompleted {
            group_index: self.groups.current_index(),
            unit_index: self.units.current_index(),
            unit_id: self.unit_id(),
        });

        if self.units.len() > 1 && !self.units.is_last() {
            self.units.advance();
        } else {
            let next_group = self.groups.advance();
            self.units = CarouselSelector::new(self.group_len(next_group))?;
        }

        let started = self.start_unit(StartCause::AutoAdvance)?;
        Ok(vec![completed, started])
    }

    /// Replaces the live sequencer with a fresh one for the selected unit.
    fn start_unit(&mut self, cause: StartCause) -> Result<PlaybackEvent, PlaybackError> {
        if let Some(mut previous) = self.sequencer.take() {
            previous.cancel();
        }

        let group_index = self.groups.current_index();
        let unit_index = self.units.current_index();
        let group = self
            .catalog
            .group(group_index)
            .ok_or_else(|| PlaybackError::InvalidState(format!("no group at {group_index}")))?;
        let unit = group.unit(unit_index).ok_or_else(|| {
            PlaybackError::InvalidState(format!("no unit at {unit_index} in {}", group.key()))
        })?;

        let mut sequencer = StepSequencer::new(Arc::clone(unit.steps()), unit.outro())?;
        sequencer.start()?;

        let kind = PlaybackEventKind::UnitStarted {
            group_index,
            group_key: group.key().to_owned(),
            unit_index,
            unit_id: unit.id().to_owned(),
            step_count: sequencer.len(),
            cause,
        };
        info!(
            group = group.key(),
            unit = unit.id(),
            ?cause,
            "unit started"
        );

        self.sequencer = Some(sequencer);
        self.state = OrchestratorState::Playing;
        Ok(self.emit(kind))
    }

    fn emit(&mut self, kind: PlaybackEventKind) -> PlaybackEvent {
        self.sequence_number += 1;
        let event = PlaybackEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                sequence_number: self.sequence_number,
                occurred_at: self.clock.now(),
            },
            kind,
        };
        debug!(
            event_type = event.metadata.event_type.as_str(),
            sequence_number = event.metadata.sequence_number,
            "publishing playback event"
        );
        // Sending only fails when nobody is subscribed.
        let _ = self.events.send(event.clone());
        event
    }

    fn ensure_selectable(&self, action: &str) -> Result<(), PlaybackError> {
        match self.state {
            OrchestratorState::Playing | OrchestratorState::Transitioning => Ok(()),
            OrchestratorState::Idle | OrchestratorState::Stopped => Err(self.invalid_state(action)),
        }
    }

    fn invalid_state(&self, action: &str) -> PlaybackError {
        PlaybackError::InvalidState(format!("cannot {action} while {:?}", self.state))
    }

    fn group_len(&self, index: usize) -> usize {
        self.catalog.group(index).map_or(0, Group::len)
    }

    fn unit_id(&self) -> String {
        self.current_unit()
            .map(|unit| unit.id().to_owned())
            .unwrap_or_default()
    }
}

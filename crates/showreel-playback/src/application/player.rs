//! The player task: the single owner of the orchestrator.
//!
//! Timer elapses and user commands are serialized through one `select!` loop,
//! so nothing in the engine is shared or locked. Callers talk to the task
//! through a cloneable [`PlayerHandle`].

use std::sync::Arc;

use showreel_catalog::Catalog;
use showreel_core::clock::Clock;
use showreel_core::error::PlaybackError;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use super::command_handlers::{handle_select_group, handle_select_unit, handle_stop};
use super::query_handlers::{PlaybackView, playback_view};
use crate::domain::commands::{SelectGroup, SelectUnitInGroup, StopPlayback};
use crate::domain::events::PlaybackEvent;
use crate::domain::orchestrator::{DEFAULT_EVENT_CAPACITY, NarrativeOrchestrator};

/// Default depth of the command queue.
pub const DEFAULT_COMMAND_QUEUE: usize = 32;

/// Player tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerConfig {
    /// Commands buffered before senders wait.
    pub command_queue: usize,
    /// Events buffered per subscriber before slow subscribers lag.
    pub event_capacity: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            command_queue: DEFAULT_COMMAND_QUEUE,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

type Reply = oneshot::Sender<Result<PlaybackView, PlaybackError>>;

/// Messages handled by the player task.
#[derive(Debug)]
enum PlayerCommand {
    SelectGroup { command: SelectGroup, reply: Reply },
    SelectUnit { command: SelectUnitInGroup, reply: Reply },
    Stop { command: StopPlayback, reply: Reply },
}

/// Cloneable handle to a running player.
///
/// The player stops once every handle has been dropped.
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    commands: mpsc::Sender<PlayerCommand>,
    snapshot: watch::Receiver<PlaybackView>,
    events: broadcast::Sender<PlaybackEvent>,
}

impl PlayerHandle {
    /// Jumps to the first unit of group `index`.
    ///
    /// # Errors
    ///
    /// Returns the orchestrator's rejection, or `PlaybackError::Unavailable`
    /// if the player task is gone.
    pub async fn select_group(&self, index: usize) -> Result<PlaybackView, PlaybackError> {
        let command = SelectGroup {
            correlation_id: Uuid::new_v4(),
            group_index: index,
        };
        self.request(|reply| PlayerCommand::SelectGroup { command, reply })
            .await
    }

    /// Jumps to unit `index` of the active group.
    ///
    /// # Errors
    ///
    /// Returns the orchestrator's rejection, or `PlaybackError::Unavailable`
    /// if the player task is gone.
    pub async fn select_unit_in_group(&self, index: usize) -> Result<PlaybackView, PlaybackError> {
        let command = SelectUnitInGroup {
            correlation_id: Uuid::new_v4(),
            unit_index: index,
        };
        self.request(|reply| PlayerCommand::SelectUnit { command, reply })
            .await
    }

    /// Stops playback. Stopping a stopped player is not an error.
    ///
    /// # Errors
    ///
    /// Never fails today; a player whose task has already ended answers with
    /// its last snapshot.
    pub async fn stop(&self) -> Result<PlaybackView, PlaybackError> {
        let command = StopPlayback {
            correlation_id: Uuid::new_v4(),
        };
        match self
            .request(|reply| PlayerCommand::Stop { command, reply })
            .await
        {
            Err(PlaybackError::Unavailable(_)) => Ok(self.snapshot()),
            other => other,
        }
    }

    /// The latest published view of playback.
    #[must_use]
    pub fn snapshot(&self) -> PlaybackView {
        self.snapshot.borrow().clone()
    }

    /// A receiver that is notified whenever the snapshot is republished.
    #[must_use]
    pub fn snapshot_updates(&self) -> watch::Receiver<PlaybackView> {
        self.snapshot.clone()
    }

    /// Subscribes to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    async fn request(
        &self,
        message: impl FnOnce(Reply) -> PlayerCommand,
    ) -> Result<PlaybackView, PlaybackError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(message(reply))
            .await
            .map_err(|_| unavailable())?;
        response.await.map_err(|_| unavailable())?
    }
}

fn unavailable() -> PlaybackError {
    PlaybackError::Unavailable("player task has stopped".to_owned())
}

/// Builds an orchestrator over `catalog`, starts it, and spawns the player
/// task. Must be called from within a tokio runtime.
///
/// # Errors
///
/// Returns `PlaybackError::Configuration` for a zero queue depth or event
/// capacity, or a catalog the orchestrator cannot play.
pub fn spawn_player(
    catalog: Arc<Catalog>,
    clock: Arc<dyn Clock>,
    config: PlayerConfig,
) -> Result<PlayerHandle, PlaybackError> {
    if config.command_queue == 0 {
        return Err(PlaybackError::Configuration(
            "command queue depth must be at least 1".to_owned(),
        ));
    }
    let mut orchestrator =
        NarrativeOrchestrator::with_event_capacity(catalog, clock, config.event_capacity)?;
    let events = orchestrator.event_sender();
    orchestrator.start()?;

    let (commands, receiver) = mpsc::channel(config.command_queue);
    let (snapshot, snapshot_receiver) = watch::channel(playback_view(&orchestrator));

    let player = Player {
        orchestrator,
        commands: receiver,
        snapshot,
    };
    tokio::spawn(player.run());
    info!(
        command_queue = config.command_queue,
        event_capacity = config.event_capacity,
        "player started"
    );

    Ok(PlayerHandle {
        commands,
        snapshot: snapshot_receiver,
        events,
    })
}

struct Player {
    orchestrator: NarrativeOrchestrator,
    commands: mpsc::Receiver<PlayerCommand>,
    snapshot: watch::Sender<PlaybackView>,
}

impl Player {
    #[instrument(skip(self))]
    async fn run(mut self) {
        loop {
            tokio::select! {
                biased;

                message = self.commands.recv() => {
                    let Some(message) = message else {
                        self.orchestrator.stop();
                        debug!("every player handle dropped");
                        break;
                    };
                    self.dispatch(message);
                    continue;
                }
                events = self.orchestrator.next_events(), if self.orchestrator.is_playing() => {
                    if let Err(err) = events {
                        error!(error = %err, "failed to start the next unit");
                        self.orchestrator.stop();
                    }
                }
            }
            self.snapshot.send_replace(playback_view(&self.orchestrator));
        }
        self.snapshot.send_replace(playback_view(&self.orchestrator));
        info!("player stopped");
    }

    fn dispatch(&mut self, message: PlayerCommand) {
        let (result, reply) = match message {
            PlayerCommand::SelectGroup { command, reply } => (
                handle_select_group(&command, &mut self.orchestrator).map(drop),
                reply,
            ),
            PlayerCommand::SelectUnit { command, reply } => (
                handle_select_unit(&command, &mut self.orchestrator).map(drop),
                reply,
            ),
            PlayerCommand::Stop { command, reply } => {
                handle_stop(&command, &mut self.orchestrator);
                (Ok(()), reply)
            }
        };
        let view = playback_view(&self.orchestrator);
        self.snapshot.send_replace(view.clone());
        // The caller may have given up waiting.
        let _ = reply.send(result.map(|()| view));
    }
}

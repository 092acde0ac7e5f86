//! Drives one unit's ordered step list on a timer.

use std::sync::Arc;
use std::time::Duration;

use showreel_catalog::Step;
use showreel_core::error::PlaybackError;
use tracing::trace;

use super::timer::StepTimer;

/// Signals emitted by a [`StepSequencer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerSignal {
    /// The active step elapsed and the index moved to `step`. After the last
    /// step elapses `step` equals the step count: the unit's final frame.
    Advanced {
        /// The new step index.
        step: usize,
    },
    /// Every step and the outro hold have elapsed. Emitted exactly once.
    Complete,
}

/// Lifecycle phase of a sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerPhase {
    /// Constructed, not started.
    Idle,
    /// Timing one of the steps.
    Running,
    /// All steps elapsed; holding the final frame before completing.
    Finale,
    /// "Complete" has been signalled.
    Complete,
    /// Cancelled by the owner.
    Cancelled,
}

/// Plays a unit's steps in order, one [`StepTimer`] at a time.
#[derive(Debug)]
pub struct StepSequencer {
    steps: Arc<[Step]>,
    outro: Duration,
    index: usize,
    phase: SequencerPhase,
    timer: StepTimer,
}

impl StepSequencer {
    /// Creates a sequencer positioned on step 0.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::Configuration` if `steps` is empty.
    pub fn new(steps: Arc<[Step]>, outro: Duration) -> Result<Self, PlaybackError> {
        if steps.is_empty() {
            return Err(PlaybackError::Configuration(
                "a step sequencer needs at least one step".to_owned(),
            ));
        }
        Ok(Self {
            steps,
            outro,
            index: 0,
            phase: SequencerPhase::Idle,
            timer: StepTimer::new(),
        })
    }

    /// The active step index; equals [`len`](Self::len) on the final frame.
    #[must_use]
    pub fn current(&self) -> usize {
        self.index
    }

    /// The active step, or `None` on the final frame.
    #[must_use]
    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.index)
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false`: construction rejects empty step lists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> SequencerPhase {
        self.phase
    }

    /// Whether a timer is armed.
    #[must_use]
    pub fn is_timing(&self) -> bool {
        self.timer.is_running()
    }

    /// Starts timing the active step.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::InvalidState` unless the sequencer is idle.
    pub fn start(&mut self) -> Result<(), PlaybackError> {
        if self.phase != SequencerPhase::Idle {
            return Err(PlaybackError::InvalidState(format!(
                "cannot start a sequencer that is {:?}",
                self.phase
            )));
        }
        self.timer.start(self.steps[self.index].duration())?;
        self.phase = SequencerPhase::Running;
        Ok(())
    }

    /// Stops any in-flight timer. Idempotent; a cancelled sequencer emits no
    /// further signals.
    pub fn cancel(&mut self) {
        self.timer.cancel();
        if self.phase != SequencerPhase::Complete {
            self.phase = SequencerPhase::Cancelled;
        }
    }

    /// Moves straight to `index` and re-arms the timer for that step. Earlier
    /// steps are not replayed and no "complete" is signalled.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::InvalidState` once the sequencer is complete or
    /// cancelled, and `PlaybackError::IndexOutOfRange` for an index past the
    /// last step.
    pub fn jump_to(&mut self, index: usize) -> Result<(), PlaybackError> {
        if matches!(
            self.phase,
            SequencerPhase::Complete | SequencerPhase::Cancelled
        ) {
            return Err(PlaybackError::InvalidState(format!(
                "cannot jump a sequencer that is {:?}",
                self.phase
            )));
        }
        if index >= self.steps.len() {
            return Err(PlaybackError::IndexOutOfRange {
                what: "step",
                index,
                len: self.steps.len(),
            });
        }
        self.timer.cancel();
        self.index = index;
        self.timer.start(self.steps[index].duration())?;
        self.phase = SequencerPhase::Running;
        Ok(())
    }

    /// Waits for the next signal and applies it.
    ///
    /// Never resolves unless the sequencer is running or holding its final
    /// frame. Cancel-safe: nothing changes until the armed timer has fired.
    pub async fn next_signal(&mut self) -> SequencerSignal {
        match self.phase {
            SequencerPhase::Running => {
                self.timer.elapsed().await;
                self.on_step_elapsed()
            }
            SequencerPhase::Finale => {
                self.timer.elapsed().await;
                self.phase = SequencerPhase::Complete;
                SequencerSignal::Complete
            }
            SequencerPhase::Idle | SequencerPhase::Complete | SequencerPhase::Cancelled => {
                std::future::pending().await
            }
        }
    }

    fn on_step_elapsed(&mut self) -> SequencerSignal {
        self.index += 1;
        trace!(step = self.index, of = self.steps.len(), "step elapsed");
        if let Some(step) = self.steps.get(self.index) {
            self.arm(step.duration());
        } else {
            self.phase = SequencerPhase::Finale;
            self.arm(self.outro);
        }
        SequencerSignal::Advanced { step: self.index }
    }

    fn arm(&mut self, duration: Duration) {
        // The timer has just fired, so it is unarmed and `start` cannot fail.
        if let Err(err) = self.timer.start(duration) {
            tracing::error!(error = %err, "step timer refused to re-arm");
        }
    }
}

#[cfg(test)]
mod tests {
    use showreel_test_support::assert_near;
    use tokio::time::Instant;

    use super::*;

    fn steps(durations_ms: &[u64]) -> Arc<[Step]> {
        durations_ms
            .iter()
            .enumerate()
            .map(|(i, ms)| Step::new(format!("step {i}"), Duration::from_millis(*ms)))
            .collect()
    }

    #[test]
    fn test_new_rejects_empty_step_list() {
        let result = StepSequencer::new(steps(&[]), Duration::ZERO);

        assert!(matches!(result, Err(PlaybackError::Configuration(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_k_steps_emit_k_advances_then_one_complete() {
        // Arrange
        let mut sequencer = StepSequencer::new(steps(&[300, 200, 100]), Duration::ZERO).unwrap();
        sequencer.start().unwrap();

        // Act
        let mut signals = Vec::new();
        loop {
            let signal = sequencer.next_signal().await;
            signals.push(signal);
            if signal == SequencerSignal::Complete {
                break;
            }
        }

        // Assert
        assert_eq!(
            signals,
            vec![
                SequencerSignal::Advanced { step: 1 },
                SequencerSignal::Advanced { step: 2 },
                SequencerSignal::Advanced { step: 3 },
                SequencerSignal::Complete,
            ]
        );
        assert_eq!(sequencer.phase(), SequencerPhase::Complete);
        assert!(!sequencer.is_timing());

        let after = tokio::time::timeout(Duration::from_secs(30), sequencer.next_signal()).await;
        assert!(after.is_err(), "a completed sequencer must stay silent");
    }

    #[tokio::test(start_paused = true)]
    async fn test_steps_advance_on_their_own_durations() {
        // Arrange
        let started = Instant::now();
        let mut sequencer = StepSequencer::new(steps(&[1000, 2000]), Duration::ZERO).unwrap();
        sequencer.start().unwrap();
        assert_eq!(sequencer.current(), 0);

        // Act / Assert
        assert_eq!(sequencer.next_signal().await, SequencerSignal::Advanced { step: 1 });
        assert_near(started.elapsed(), 1000);
        assert_eq!(sequencer.current(), 1);

        assert_eq!(sequencer.next_signal().await, SequencerSignal::Advanced { step: 2 });
        assert_near(started.elapsed(), 3000);
        assert!(sequencer.current_step().is_none());

        assert_eq!(sequencer.next_signal().await, SequencerSignal::Complete);
        assert_near(started.elapsed(), 3000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_outro_holds_final_frame_before_completing() {
        let started = Instant::now();
        let mut sequencer =
            StepSequencer::new(steps(&[500]), Duration::from_millis(1000)).unwrap();
        sequencer.start().unwrap();

        assert_eq!(sequencer.next_signal().await, SequencerSignal::Advanced { step: 1 });
        assert_eq!(sequencer.phase(), SequencerPhase::Finale);
        assert_eq!(sequencer.next_signal().await, SequencerSignal::Complete);

        assert_near(started.elapsed(), 1500);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_step_unit_completes_after_its_duration() {
        let started = Instant::now();
        let mut sequencer = StepSequencer::new(steps(&[750]), Duration::ZERO).unwrap();
        sequencer.start().unwrap();

        assert_eq!(sequencer.next_signal().await, SequencerSignal::Advanced { step: 1 });
        assert_eq!(sequencer.next_signal().await, SequencerSignal::Complete);
        assert_near(started.elapsed(), 750);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_twice_is_rejected() {
        let mut sequencer = StepSequencer::new(steps(&[100]), Duration::ZERO).unwrap();
        sequencer.start().unwrap();

        assert!(matches!(sequencer.start(), Err(PlaybackError::InvalidState(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_silences_sequencer_and_is_idempotent() {
        // Arrange
        let mut sequencer = StepSequencer::new(steps(&[100, 100]), Duration::ZERO).unwrap();
        sequencer.start().unwrap();

        // Act
        sequencer.cancel();
        sequencer.cancel();
        let signal = tokio::time::timeout(Duration::from_secs(10), sequencer.next_signal()).await;

        // Assert
        assert!(signal.is_err());
        assert_eq!(sequencer.phase(), SequencerPhase::Cancelled);
        assert_eq!(sequencer.current(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_jump_to_rearms_for_target_step_without_replaying() {
        // Arrange
        let started = Instant::now();
        let mut sequencer =
            StepSequencer::new(steps(&[1000, 1000, 1000, 400]), Duration::ZERO).unwrap();
        sequencer.start().unwrap();
        tokio::time::advance(Duration::from_millis(120)).await;

        // Act
        sequencer.jump_to(3).unwrap();

        // Assert
        assert_eq!(sequencer.current(), 3);
        assert_eq!(sequencer.next_signal().await, SequencerSignal::Advanced { step: 4 });
        assert_near(started.elapsed(), 520);
        assert_eq!(sequencer.next_signal().await, SequencerSignal::Complete);
    }

    #[tokio::test(start_paused = true)]
    async fn test_jump_to_is_rejected_after_cancel_and_out_of_range() {
        let mut sequencer = StepSequencer::new(steps(&[100, 100]), Duration::ZERO).unwrap();
        sequencer.start().unwrap();

        assert_eq!(
            sequencer.jump_to(2),
            Err(PlaybackError::IndexOutOfRange {
                what: "step",
                index: 2,
                len: 2
            })
        );

        sequencer.cancel();
        assert!(matches!(sequencer.jump_to(0), Err(PlaybackError::InvalidState(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_jump_to_from_idle_starts_timing() {
        let mut sequencer = StepSequencer::new(steps(&[100, 100]), Duration::ZERO).unwrap();

        sequencer.jump_to(1).unwrap();

        assert_eq!(sequencer.phase(), SequencerPhase::Running);
        assert_eq!(sequencer.next_signal().await, SequencerSignal::Advanced { step: 2 });
    }
}

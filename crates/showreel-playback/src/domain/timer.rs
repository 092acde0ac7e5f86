//! Single-shot step timer.

use std::pin::Pin;
use std::time::Duration;

use showreel_core::error::PlaybackError;
use tokio::time::{Instant, Sleep};

/// A countdown that fires exactly one elapsed signal unless cancelled first.
///
/// The armed deadline lives in a [`Sleep`] owned by the timer. [`elapsed`]
/// borrows the timer mutably while it waits, so `cancel` cannot run while an
/// elapse is in flight, and once `cancel` has dropped the sleep there is
/// nothing left that could fire.
///
/// A zero duration is accepted and fires at the next scheduling opportunity.
///
/// [`elapsed`]: StepTimer::elapsed
#[derive(Debug, Default)]
pub struct StepTimer {
    sleep: Option<Pin<Box<Sleep>>>,
}

impl StepTimer {
    /// Creates an unarmed timer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the timer for `duration`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::InvalidState` if the timer is already armed;
    /// callers must cancel first.
    pub fn start(&mut self, duration: Duration) -> Result<(), PlaybackError> {
        if self.sleep.is_some() {
            return Err(PlaybackError::InvalidState(
                "step timer is already running".to_owned(),
            ));
        }
        self.sleep = Some(Box::pin(tokio::time::sleep(duration)));
        Ok(())
    }

    /// Disarms the timer. Idempotent.
    pub fn cancel(&mut self) {
        self.sleep = None;
    }

    /// Whether a signal is pending.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.sleep.is_some()
    }

    /// When the pending signal is due, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.sleep.as_ref().map(|sleep| sleep.deadline())
    }

    /// Resolves once the armed duration has passed, then disarms the timer.
    /// Never resolves while the timer is unarmed.
    ///
    /// Cancel-safe: dropping the future before it resolves leaves the timer
    /// armed with the same deadline.
    pub async fn elapsed(&mut self) {
        let Some(sleep) = self.sleep.as_mut() else {
            return std::future::pending().await;
        };
        sleep.as_mut().await;
        self.sleep = None;
    }
}

//! Playback domain: timers, sequencers, selectors and their orchestration.

pub mod commands;
pub mod events;
pub mod orchestrator;
pub mod selector;
pub mod sequencer;
pub mod timer;

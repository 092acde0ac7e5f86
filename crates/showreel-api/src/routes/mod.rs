//! Route modules.

pub mod catalog;
pub mod health;
pub mod playback;

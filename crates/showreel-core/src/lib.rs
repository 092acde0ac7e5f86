//! Showreel Core — shared playback abstractions.
//!
//! This crate defines the traits and types that the catalog, the playback
//! engine and the HTTP host all depend on. It contains no timer or I/O code.

pub mod clock;
pub mod command;
pub mod error;
pub mod event;

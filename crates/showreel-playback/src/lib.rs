//! Showreel — timed narrative sequencing engine.
//!
//! Plays each catalog unit as a sequence of timed steps, chains completed
//! units into a two-level carousel (group → unit within group), and lets user
//! jumps cancel and restart the pending timer.

pub mod application;
pub mod domain;

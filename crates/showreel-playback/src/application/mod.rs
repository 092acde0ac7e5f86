//! Application layer: command handling, read views and the player task.

pub mod command_handlers;
pub mod player;
pub mod query_handlers;

//! Playback error types.

use thiserror::Error;

/// Top-level error type for the playback engine.
///
/// None of these are transient: the engine performs no I/O, so every error is
/// deterministic and reported synchronously at the call site.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// The engine was built from an unusable catalog or step list.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A jump targeted an index outside the collection.
    #[error("{what} index {index} out of range for {len} item(s)")]
    IndexOutOfRange {
        /// What kind of item the index addressed (`group`, `unit`, `step`, ...).
        what: &'static str,
        /// The rejected index.
        index: usize,
        /// The size of the collection.
        len: usize,
    },

    /// An operation was issued in a state that does not allow it.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The player task has shut down and can no longer take commands.
    #[error("player unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_out_of_range_message_names_target() {
        let err = PlaybackError::IndexOutOfRange {
            what: "group",
            index: 7,
            len: 5,
        };

        assert_eq!(err.to_string(), "group index 7 out of range for 5 item(s)");
    }
}

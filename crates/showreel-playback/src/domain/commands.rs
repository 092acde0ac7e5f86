//! User-issued playback commands.

use showreel_core::command::Command;
use uuid::Uuid;

/// Command to jump to a group, starting its first unit.
#[derive(Debug, Clone)]
pub struct SelectGroup {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Target group index.
    pub group_index: usize,
}

/// Command to jump to a unit in the active group.
#[derive(Debug, Clone)]
pub struct SelectUnitInGroup {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Target unit index within the active group.
    pub unit_index: usize,
}

/// Command to stop playback for good.
#[derive(Debug, Clone)]
pub struct StopPlayback {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for SelectGroup {
    fn command_type(&self) -> &'static str {
        "playback.select_group"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

impl Command for SelectUnitInGroup {
    fn command_type(&self) -> &'static str {
        "playback.select_unit_in_group"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

impl Command for StopPlayback {
    fn command_type(&self) -> &'static str {
        "playback.stop"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

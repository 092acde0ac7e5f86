//! Shared test clocks and catalog fixtures for the showreel workspace.

mod catalog;
mod clock;
mod timing;

pub use catalog::{
    long_running_catalog, single_unit_catalog, three_unit_catalog, two_group_catalog,
};
pub use clock::{FixedClock, fixed_clock};
pub use timing::assert_near;

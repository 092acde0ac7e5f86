//! Catalog fixtures.

use std::sync::Arc;

use showreel_catalog::Catalog;
use showreel_catalog::application::ingest::CatalogBuilder;
use showreel_catalog::domain::records::{StepRecord, UnitRecord};

fn build(builder: CatalogBuilder) -> Arc<Catalog> {
    match builder.build() {
        Ok(catalog) => Arc::new(catalog),
        Err(err) => panic!("fixture catalog is invalid: {err}"),
    }
}

fn unit(id: &str, group: &str, durations_ms: &[u64]) -> UnitRecord {
    let steps = durations_ms
        .iter()
        .enumerate()
        .map(|(i, ms)| StepRecord::new(format!("{id} step {i}"), *ms))
        .collect();
    UnitRecord::new(id, id.to_uppercase(), group, steps)
}

/// Group `Y1` holding unit `u1` with steps of 1000 ms and 2000 ms.
#[must_use]
pub fn single_unit_catalog() -> Arc<Catalog> {
    build(CatalogBuilder::new().unit(unit("u1", "Y1", &[1000, 2000])))
}

/// Group `Y2` holding units `a`, `b` and `c`, each one 500 ms step.
#[must_use]
pub fn three_unit_catalog() -> Arc<Catalog> {
    build(
        CatalogBuilder::new()
            .unit(unit("a", "Y2", &[500]))
            .unit(unit("b", "Y2", &[500]))
            .unit(unit("c", "Y2", &[500])),
    )
}

/// Group `2024` with `x` (1000 ms, 1000 ms) and `y` (1000 ms), then group
/// `2025` with `z` (1000 ms, 1000 ms, 1000 ms).
#[must_use]
pub fn two_group_catalog() -> Arc<Catalog> {
    build(
        CatalogBuilder::new()
            .unit(unit("x", "2024", &[1000, 1000]))
            .unit(unit("y", "2024", &[1000]))
            .unit(unit("z", "2025", &[1000, 1000, 1000])),
    )
}

/// Two groups whose steps last an hour, so playback state stays put for the
/// length of a test running on the real clock.
#[must_use]
pub fn long_running_catalog() -> Arc<Catalog> {
    const HOUR_MS: u64 = 3_600_000;
    build(
        CatalogBuilder::new()
            .unit(unit("first", "2020", &[HOUR_MS, HOUR_MS]))
            .unit(unit("second", "2020", &[HOUR_MS]))
            .unit(unit("third", "2021", &[HOUR_MS])),
    )
}

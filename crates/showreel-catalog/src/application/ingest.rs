//! Catalog ingestion: records → validated [`Catalog`].
//!
//! Every check happens here, before any timer exists, so an engine is either
//! built from a complete catalog or not built at all.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::domain::model::{Catalog, Group, Step, Unit};
use crate::domain::ordering::{GroupKeyOrder, GroupOrder};
use crate::domain::records::{CatalogDocument, UnitRecord};
use crate::error::CatalogError;

/// The portfolio catalog shipped with the crate.
pub const BUNDLED_PORTFOLIO: &str = include_str!("../../data/portfolio.yaml");

/// Collects unit records and ordering rules, then validates them into a
/// [`Catalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    units: Vec<UnitRecord>,
    key_order: GroupKeyOrder,
    group_orders: Vec<(String, GroupOrder)>,
}

impl CatalogBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder pre-loaded from a parsed document.
    #[must_use]
    pub fn from_document(document: CatalogDocument) -> Self {
        let group_orders = document
            .groups
            .into_iter()
            .filter(|group| !group.pinned.is_empty())
            .map(|group| (group.key, GroupOrder::Pinned(group.pinned)))
            .collect();
        Self {
            units: document.units,
            key_order: document.group_order,
            group_orders,
        }
    }

    /// Appends a unit in catalog order.
    #[must_use]
    pub fn unit(mut self, record: UnitRecord) -> Self {
        self.units.push(record);
        self
    }

    /// Sets how groups are ordered relative to each other.
    #[must_use]
    pub fn group_key_order(mut self, order: GroupKeyOrder) -> Self {
        self.key_order = order;
        self
    }

    /// Overrides the member order of one group. A later override for the same
    /// key replaces the earlier one.
    #[must_use]
    pub fn group_order(mut self, key: impl Into<String>, order: GroupOrder) -> Self {
        let key = key.into();
        self.group_orders.retain(|(existing, _)| *existing != key);
        self.group_orders.push((key, order));
        self
    }

    /// Validates the records and builds the catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if there are no units, a unit has no steps,
    /// a step has a zero duration, unit ids collide, or an ordering override
    /// names a group with no units or pins a unit outside its group.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        if self.units.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }

        let mut seen = HashSet::new();
        for unit in &self.units {
            if !seen.insert(unit.id.as_str()) {
                return Err(CatalogError::DuplicateUnit(unit.id.clone()));
            }
            if unit.steps.is_empty() {
                return Err(CatalogError::EmptySteps {
                    unit_id: unit.id.clone(),
                });
            }
            if let Some(step_index) = unit
                .steps
                .iter()
                .position(|step| step.effective_duration_ms() == 0)
            {
                return Err(CatalogError::ZeroDuration {
                    unit_id: unit.id.clone(),
                    step_index,
                });
            }
        }

        // Group by key, preserving first appearance of both keys and members.
        let mut keys: Vec<String> = Vec::new();
        let mut members: Vec<Vec<UnitRecord>> = Vec::new();
        for unit in self.units {
            match keys.iter().position(|key| *key == unit.group) {
                Some(index) => members[index].push(unit),
                None => {
                    keys.push(unit.group.clone());
                    members.push(vec![unit]);
                }
            }
        }

        for (key, order) in &self.group_orders {
            let index = keys
                .iter()
                .position(|existing| existing == key)
                .ok_or_else(|| CatalogError::EmptyGroup(key.clone()))?;
            order.apply(key, &mut members[index])?;
            debug!(group = %key, ?order, "applied group order override");
        }

        let mut grouped: Vec<(String, Vec<UnitRecord>)> = keys.into_iter().zip(members).collect();
        let mut ordered_keys: Vec<String> = grouped.iter().map(|(key, _)| key.clone()).collect();
        self.key_order.apply(&mut ordered_keys);

        let groups: Vec<Group> = ordered_keys
            .iter()
            .map(|key| {
                let position = grouped
                    .iter()
                    .position(|(existing, _)| existing == key)
                    .unwrap_or_default();
                let (key, records) = grouped.swap_remove(position);
                let units = records.into_iter().map(to_unit).map(Arc::new).collect();
                Group::new(key, units)
            })
            .collect();

        let catalog = Catalog::new(groups);
        for group in catalog.groups() {
            debug!(
                group = %group.key(),
                units = ?group.unit_ids().collect::<Vec<_>>(),
                "group ordered"
            );
        }
        info!(
            groups = catalog.group_count(),
            units = catalog.unit_count(),
            "catalog built"
        );
        Ok(catalog)
    }
}

fn to_unit(record: UnitRecord) -> Unit {
    let steps = record
        .steps
        .iter()
        .map(|step| {
            Step::new(
                step.label.clone(),
                Duration::from_millis(step.effective_duration_ms()),
            )
        })
        .collect();
    Unit::new(
        record.id,
        record.title,
        steps,
        Duration::from_millis(record.outro_ms),
    )
}

/// Parses and validates a YAML catalog document.
///
/// # Errors
///
/// Returns `CatalogError::Parse` for malformed YAML, or any validation error
/// from [`CatalogBuilder::build`].
pub fn ingest_yaml(source: &str) -> Result<Catalog, CatalogError> {
    let document: CatalogDocument = serde_yaml::from_str(source)?;
    CatalogBuilder::from_document(document).build()
}

/// Reads, parses and validates a YAML catalog file.
///
/// # Errors
///
/// Returns `CatalogError::Io` if the file cannot be read, otherwise the same
/// errors as [`ingest_yaml`].
pub fn ingest_file(path: &Path) -> Result<Catalog, CatalogError> {
    let source = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "loading catalog file");
    ingest_yaml(&source)
}

/// Builds the bundled portfolio catalog.
///
/// # Errors
///
/// Returns a [`CatalogError`] only if the bundled document is broken.
pub fn bundled_portfolio() -> Result<Catalog, CatalogError> {
    ingest_yaml(BUNDLED_PORTFOLIO)
}

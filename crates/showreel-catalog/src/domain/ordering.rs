//! Group ordering rules.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::records::UnitRecord;
use crate::error::CatalogError;

/// How groups are ordered relative to each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKeyOrder {
    /// Order of first appearance in the catalog.
    #[default]
    Catalog,
    /// Ascending integer value of the key. Keys that are not integers follow
    /// all numeric keys, in order of first appearance.
    Numeric,
}

impl GroupKeyOrder {
    pub(crate) fn apply(self, keys: &mut [String]) {
        if self == GroupKeyOrder::Numeric {
            keys.sort_by_key(|key| match key.trim().parse::<i64>() {
                Ok(value) => (0, value),
                Err(_) => (1, 0),
            });
        }
    }
}

/// Comparator used by [`GroupOrder::Custom`].
pub type UnitComparator = Arc<dyn Fn(&UnitRecord, &UnitRecord) -> Ordering + Send + Sync>;

/// Per-group override of member order.
#[derive(Clone, Default)]
pub enum GroupOrder {
    /// Catalog insertion order.
    #[default]
    Catalog,
    /// The listed unit ids first, in the listed order; the rest follow in
    /// catalog order.
    Pinned(Vec<String>),
    /// A comparator applied with a stable sort.
    Custom(UnitComparator),
}

impl fmt::Debug for GroupOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupOrder::Catalog => f.write_str("Catalog"),
            GroupOrder::Pinned(ids) => f.debug_tuple("Pinned").field(ids).finish(),
            GroupOrder::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl GroupOrder {
    /// Reorders `members` of `group` in place.
    pub(crate) fn apply(&self, group: &str, members: &mut [UnitRecord]) -> Result<(), CatalogError> {
        match self {
            GroupOrder::Catalog => {}
            GroupOrder::Pinned(pinned) => {
                if let Some(missing) = pinned
                    .iter()
                    .find(|id| !members.iter().any(|unit| &unit.id == *id))
                {
                    return Err(CatalogError::UnknownPinnedUnit {
                        group: group.to_owned(),
                        unit_id: missing.clone(),
                    });
                }
                members.sort_by_key(|unit| {
                    pinned
                        .iter()
                        .position(|id| *id == unit.id)
                        .unwrap_or(usize::MAX)
                });
            }
            GroupOrder::Custom(compare) => members.sort_by(|a, b| compare(a, b)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::records::StepRecord;

    fn unit(id: &str) -> UnitRecord {
        UnitRecord::new(id, id, "2025", vec![StepRecord::new("beat", 1000)])
    }

    fn ids(members: &[UnitRecord]) -> Vec<&str> {
        members.iter().map(|u| u.id.as_str()).collect()
    }

    #[test]
    fn test_pinned_order_moves_pinned_first_and_keeps_rest_stable() {
        let mut members = vec![unit("a"), unit("b"), unit("c"), unit("d")];

        GroupOrder::Pinned(vec!["c".into(), "a".into()])
            .apply("2025", &mut members)
            .unwrap();

        assert_eq!(ids(&members), vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_pinned_order_rejects_unknown_unit() {
        let mut members = vec![unit("a")];

        let result = GroupOrder::Pinned(vec!["zzz".into()]).apply("2025", &mut members);

        match result {
            Err(CatalogError::UnknownPinnedUnit { group, unit_id }) => {
                assert_eq!(group, "2025");
                assert_eq!(unit_id, "zzz");
            }
            other => panic!("expected UnknownPinnedUnit, got {other:?}"),
        }
    }

    #[test]
    fn test_custom_order_uses_comparator() {
        let mut members = vec![unit("b"), unit("c"), unit("a")];
        let order = GroupOrder::Custom(Arc::new(|x, y| x.id.cmp(&y.id)));

        order.apply("2025", &mut members).unwrap();

        assert_eq!(ids(&members), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_numeric_key_order_sorts_numbers_and_keeps_others_last() {
        let mut keys: Vec<String> = ["2021", "misc", "2017", "2019", "extra"]
            .iter()
            .map(ToString::to_string)
            .collect();

        GroupKeyOrder::Numeric.apply(&mut keys);

        assert_eq!(keys, vec!["2017", "2019", "2021", "misc", "extra"]);
    }

    #[test]
    fn test_catalog_key_order_is_untouched() {
        let mut keys: Vec<String> = vec!["2021".into(), "2017".into()];

        GroupKeyOrder::Catalog.apply(&mut keys);

        assert_eq!(keys, vec!["2021", "2017"]);
    }
}

//! Bottom-up stat aggregation for chart sizing.

use crate::domain::hierarchy::{HierarchyNode, NodeKind};

/// Weight of a leaf whose stat is missing, so it still renders.
pub const MISSING_STAT_WEIGHT: i64 = 1;

/// Leaf: its stat, or [`MISSING_STAT_WEIGHT`]. Group: sum over children,
/// saturating at the `i64` bounds.
pub fn aggregate(node: &HierarchyNode) -> i64 {
    match &node.kind {
        NodeKind::Leaf(value) => value.unwrap_or(MISSING_STAT_WEIGHT),
        NodeKind::Group(children) => children
            .iter()
            .map(aggregate)
            .fold(0, i64::saturating_add),
    }
}

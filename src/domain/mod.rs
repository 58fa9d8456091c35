//! Domain layer: entities and pipeline logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod aggregate;
pub mod entities;
pub mod error;
pub mod hierarchy;
pub mod locations;
pub mod normalizer;
pub mod selection;

pub use aggregate::{aggregate, MISSING_STAT_WEIGHT};
pub use entities::*;
pub use error::DomainError;
pub use hierarchy::{build_hierarchy, HierarchyNode, Level, NodeKind, ROOT_NAME};
pub use locations::{LocationCanonicalizer, Settlement, CLOUD_DISTRICT, EXCLUDED};
pub use normalizer::normalize;
pub use selection::{is_selectable, mark_duplicates, SelectionFilter, SelectionStats};

//! Census pipeline for Skyrim characters.
//!
//! Raw character records are normalized, deduplicated and mapped onto a fixed
//! set of settlements, then grouped into a four-level hierarchy whose subtree
//! aggregates size a zoomable circle-pack and a linked bar chart.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;

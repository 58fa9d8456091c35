//! Census service
//!
//! Runs load → normalize → select once and serves the selected characters
//! and on-demand hierarchies built from them.

use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use crate::application::view::ViewState;
use crate::application::ApplicationResult;
use crate::domain::{
    build_hierarchy, normalize, Character, GroupingAttribute, HierarchyNode, RawRecord,
    SelectionFilter, SelectionStats, StatAttribute,
};
use crate::infrastructure::traits::RecordSource;

/// Selected characters of one load, shared read-only.
#[derive(Debug, Clone)]
pub struct Census {
    characters: Arc<[Character]>,
    stats: SelectionStats,
}

impl Census {
    /// Normalize and select raw records.
    pub fn from_records(records: &[RawRecord], filter: &SelectionFilter) -> Self {
        let normalized: Vec<Character> = records.iter().map(normalize).collect();
        let (selected, stats) = filter.select_with_stats(normalized);
        Self {
            characters: selected.into(),
            stats,
        }
    }

    /// Census of a failed or empty load.
    pub fn empty() -> Self {
        Self {
            characters: Arc::from(Vec::new()),
            stats: SelectionStats::default(),
        }
    }

    pub fn selected_characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn shared_characters(&self) -> Arc<[Character]> {
        Arc::clone(&self.characters)
    }

    pub fn stats(&self) -> SelectionStats {
        self.stats
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Fresh tree on every call; never cached.
    pub fn build_hierarchy(&self, grouping: GroupingAttribute, stat: StatAttribute) -> HierarchyNode {
        build_hierarchy(&self.characters, grouping, stat)
    }

    /// View state focused on the root of a fresh tree.
    pub fn view(&self, grouping: GroupingAttribute, stat: StatAttribute) -> ViewState {
        ViewState::new(self.shared_characters(), grouping, stat)
    }
}

impl Default for Census {
    fn default() -> Self {
        Self::empty()
    }
}

/// Service loading a [`Census`] from a record source.
pub struct CensusService {
    source: Arc<dyn RecordSource>,
    filter: SelectionFilter,
}

impl CensusService {
    pub fn new(source: Arc<dyn RecordSource>, filter: SelectionFilter) -> Self {
        Self { source, filter }
    }

    pub fn filter(&self) -> &SelectionFilter {
        &self.filter
    }

    /// Load and select, propagating load failures.
    #[instrument(level = "debug", skip(self), fields(source = %self.source.describe()))]
    pub async fn try_load(&self) -> ApplicationResult<Census> {
        let records = self.source.load().await?;
        debug!("try_load: {} raw records", records.len());
        let census = Census::from_records(&records, &self.filter);
        info!(
            "loaded {} characters from {}",
            census.stats().selected,
            self.source.describe()
        );
        Ok(census)
    }

    /// Load and select. A failed load is logged and yields an empty census.
    pub async fn load(&self) -> Census {
        match self.try_load().await {
            Ok(census) => census,
            Err(e) => {
                error!("{}", e);
                Census::empty()
            }
        }
    }
}

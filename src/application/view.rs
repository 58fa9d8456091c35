//! Interactive view state for the linked circle-pack and bar chart.
//!
//! Holds the selected dimensions, the tree built from them and the node in
//! focus. Everything a renderer needs (bar series, titles, colors, element
//! ids) is derived from this state on demand.

use std::sync::{Arc, OnceLock};

use itertools::Itertools;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::{
    build_hierarchy, Character, DomainError, GroupingAttribute, HierarchyNode, StatAttribute,
    ROOT_NAME,
};

/// One bar of the bar chart: a child of the focus node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarDatum {
    pub name: String,
    /// Aggregate of the child's subtree.
    pub value: i64,
    /// Index of the child within the focus node, for zooming into it.
    pub child_index: usize,
    /// False for characters, which cannot be focused.
    pub drillable: bool,
}

impl BarDatum {
    pub fn bar_id(&self) -> String {
        bar_id(&self.name)
    }

    pub fn circle_id(&self) -> String {
        circle_id(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Titles {
    pub title: String,
    pub bar_title: String,
}

/// Low and high end of the color interpolation for a stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorRange {
    pub low: &'static str,
    pub high: &'static str,
}

impl ColorRange {
    pub fn for_stat(stat: StatAttribute) -> Self {
        let (low, high) = match stat {
            StatAttribute::Health => ("maroon", "red"),
            StatAttribute::Magicka => ("navy", "lightblue"),
            StatAttribute::Stamina => ("green", "lightgreen"),
        };
        Self { low, high }
    }
}

fn id_separator_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[' ]+").expect("id separator pattern"))
}

/// Name usable as a DOM id: apostrophes and spaces removed.
pub fn element_id(name: &str) -> String {
    id_separator_regex().replace_all(name, "").into_owned()
}

pub fn circle_id(name: &str) -> String {
    format!("circle-{}", element_id(name))
}

pub fn bar_id(name: &str) -> String {
    format!("bar-{}", element_id(name))
}

/// Application state replacing renderer-side globals.
///
/// Focus is a path of child indices from the root and always points at a
/// group node of the current tree.
#[derive(Debug, Clone)]
pub struct ViewState {
    characters: Arc<[Character]>,
    grouping: GroupingAttribute,
    stat: StatAttribute,
    tree: HierarchyNode,
    focus: Vec<usize>,
}

impl ViewState {
    pub fn new(
        characters: Arc<[Character]>,
        grouping: GroupingAttribute,
        stat: StatAttribute,
    ) -> Self {
        let tree = build_hierarchy(&characters, grouping, stat);
        Self {
            characters,
            grouping,
            stat,
            tree,
            focus: Vec::new(),
        }
    }

    pub fn grouping(&self) -> GroupingAttribute {
        self.grouping
    }

    pub fn stat(&self) -> StatAttribute {
        self.stat
    }

    pub fn tree(&self) -> &HierarchyNode {
        &self.tree
    }

    pub fn focus_path(&self) -> &[usize] {
        &self.focus
    }

    pub fn focus_node(&self) -> &HierarchyNode {
        self.tree.node_at(&self.focus).unwrap_or(&self.tree)
    }

    /// Names from the root's children down to the focus node.
    pub fn focus_names(&self) -> Vec<&str> {
        let mut node = &self.tree;
        let mut names = Vec::with_capacity(self.focus.len());
        for &idx in &self.focus {
            node = &node.children()[idx];
            names.push(node.name.as_str());
        }
        names
    }

    /// Rebuilds the tree and resets focus to the root.
    pub fn set_grouping(&mut self, grouping: GroupingAttribute) {
        self.grouping = grouping;
        self.rebuild();
    }

    /// Rebuilds the tree and resets focus to the root.
    pub fn set_stat(&mut self, stat: StatAttribute) {
        self.stat = stat;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.tree = build_hierarchy(&self.characters, self.grouping, self.stat);
        self.focus.clear();
        debug!("rebuild: grouping={} stat={}", self.grouping, self.stat);
    }

    /// Focus the node at `path`. Returns `Ok(false)` when it already has focus.
    #[instrument(level = "debug", skip(self))]
    pub fn zoom(&mut self, path: &[usize]) -> Result<bool, DomainError> {
        let node = self
            .tree
            .node_at(path)
            .ok_or_else(|| DomainError::UnknownNode(format!("{:?}", path)))?;
        if node.is_leaf() {
            return Err(DomainError::NotFocusable(node.name.clone()));
        }
        if self.focus == path {
            return Ok(false);
        }
        self.focus = path.to_vec();
        Ok(true)
    }

    /// Focus the node reached by `names`, one name per level below the root.
    pub fn zoom_to(&mut self, names: &[&str]) -> Result<bool, DomainError> {
        let path = self
            .tree
            .find_path(names)
            .ok_or_else(|| DomainError::UnknownNode(names.join("/")))?;
        self.zoom(&path)
    }

    /// Focus the child of the focus node at `child_index`, as a bar click does.
    pub fn zoom_into(&mut self, child_index: usize) -> Result<bool, DomainError> {
        let mut path = self.focus.clone();
        path.push(child_index);
        self.zoom(&path)
    }

    /// Move focus to the parent. Returns false at the root.
    pub fn zoom_out(&mut self) -> bool {
        self.focus.pop().is_some()
    }

    pub fn reset_focus(&mut self) {
        self.focus.clear();
    }

    /// Children of the focus node valued by their aggregate, largest first.
    pub fn bars(&self) -> Vec<BarDatum> {
        self.focus_node()
            .children()
            .iter()
            .enumerate()
            .map(|(child_index, child)| BarDatum {
                name: child.name.clone(),
                value: child.aggregate(),
                child_index,
                drillable: !child.is_leaf(),
            })
            .sorted_by(|a, b| b.value.cmp(&a.value))
            .collect()
    }

    /// Upper bound of the bar chart's value axis.
    pub fn bar_domain_max(&self) -> i64 {
        self.bars().first().map_or(0, |bar| bar.value)
    }

    pub fn titles(&self) -> Titles {
        let stat = self.stat.label();
        match self.focus_names().as_slice() {
            [] => Titles {
                title: ROOT_NAME.to_string(),
                bar_title: format!("Population {}", stat),
            },
            [location] => Titles {
                title: location.to_string(),
                bar_title: format!("Group {}", stat),
            },
            [.., parent, group] => Titles {
                title: format!("{}: {}", parent, group),
                bar_title: format!("Character {}", stat),
            },
        }
    }

    pub fn color_range(&self) -> ColorRange {
        ColorRange::for_stat(self.stat)
    }
}

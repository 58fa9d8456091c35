//! Four-level census hierarchy: root → location → attribute group → character.

use std::cmp::Reverse;
use std::collections::HashMap;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::{debug, instrument};

use crate::domain::aggregate::aggregate;
use crate::domain::entities::{Character, GroupingAttribute, StatAttribute};

/// Name of the single level-0 node.
pub const ROOT_NAME: &str = "Skyrim";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Root,
    Location,
    Group,
    Character,
}

impl Level {
    pub fn depth(self) -> u8 {
        match self {
            Level::Root => 0,
            Level::Location => 1,
            Level::Group => 2,
            Level::Character => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Group(Vec<HierarchyNode>),
    /// Stat value of a character; `None` when the record had none.
    Leaf(Option<i64>),
}

/// Node of a freshly built census tree. Trees are rebuilt, never edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyNode {
    pub name: String,
    pub level: Level,
    pub kind: NodeKind,
}

impl HierarchyNode {
    pub fn group(name: impl Into<String>, level: Level, children: Vec<HierarchyNode>) -> Self {
        Self {
            name: name.into(),
            level,
            kind: NodeKind::Group(children),
        }
    }

    pub fn leaf(name: impl Into<String>, value: Option<i64>) -> Self {
        Self {
            name: name.into(),
            level: Level::Character,
            kind: NodeKind::Leaf(value),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Children of a group; empty for leaves.
    pub fn children(&self) -> &[HierarchyNode] {
        match &self.kind {
            NodeKind::Group(children) => children,
            NodeKind::Leaf(_) => &[],
        }
    }

    /// Stored stat of a leaf; `None` for groups and for leaves without a stat.
    pub fn value(&self) -> Option<i64> {
        match self.kind {
            NodeKind::Leaf(value) => value,
            NodeKind::Group(_) => None,
        }
    }

    /// See [`aggregate`].
    pub fn aggregate(&self) -> i64 {
        aggregate(self)
    }

    /// Node reached by following child indices from `self`.
    pub fn node_at(&self, path: &[usize]) -> Option<&HierarchyNode> {
        path.iter()
            .try_fold(self, |node, &idx| node.children().get(idx))
    }

    /// Child indices of the first node matching `names` level by level.
    pub fn find_path(&self, names: &[&str]) -> Option<Vec<usize>> {
        let mut node = self;
        let mut path = Vec::with_capacity(names.len());
        for name in names {
            let idx = node.children().iter().position(|c| c.name == *name)?;
            path.push(idx);
            node = &node.children()[idx];
        }
        Some(path)
    }

    pub fn leaf_count(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf(_) => 1,
            NodeKind::Group(children) => children.iter().map(HierarchyNode::leaf_count).sum(),
        }
    }

    /// Copy with every child list ordered by descending aggregate, ties
    /// keeping build order. This is the order a circle-pack lays out.
    pub fn sorted_by_aggregate(&self) -> HierarchyNode {
        match &self.kind {
            NodeKind::Leaf(_) => self.clone(),
            NodeKind::Group(children) => {
                let mut sorted: Vec<HierarchyNode> =
                    children.iter().map(HierarchyNode::sorted_by_aggregate).collect();
                sorted.sort_by_key(|c| Reverse(c.aggregate()));
                HierarchyNode::group(self.name.clone(), self.level, sorted)
            }
        }
    }
}

/// Same shape the charting layer consumes:
/// `{name, level, isLeaf, children}` or `{name, level, isLeaf, value}`.
impl Serialize for HierarchyNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("HierarchyNode", 4)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("level", &self.level.depth())?;
        state.serialize_field("isLeaf", &self.is_leaf())?;
        match &self.kind {
            NodeKind::Group(children) => state.serialize_field("children", children)?,
            NodeKind::Leaf(value) => state.serialize_field("value", value)?,
        }
        state.end()
    }
}

/// Builds the census tree from selected characters.
///
/// Location and attribute groups appear in first-appearance order of their
/// keys, leaves in input order, so equal inputs give equal trees.
#[instrument(level = "debug", skip(characters), fields(characters = characters.len()))]
pub fn build_hierarchy(
    characters: &[Character],
    grouping: GroupingAttribute,
    stat: StatAttribute,
) -> HierarchyNode {
    let locations: Vec<HierarchyNode> = group_in_order(characters, |c| c.location.as_str())
        .into_iter()
        .map(|(location, residents)| {
            let groups = group_in_order(residents, |c| c.attribute(grouping))
                .into_iter()
                .map(|(group, members)| {
                    let leaves = members
                        .into_iter()
                        .map(|c| HierarchyNode::leaf(c.name.clone(), c.stat(stat)))
                        .collect();
                    HierarchyNode::group(group, Level::Group, leaves)
                })
                .collect();
            HierarchyNode::group(location, Level::Location, groups)
        })
        .collect();

    debug!("built hierarchy with {} locations", locations.len());
    HierarchyNode::group(ROOT_NAME, Level::Root, locations)
}

fn group_in_order<'a, I, F>(items: I, key: F) -> Vec<(&'a str, Vec<&'a Character>)>
where
    I: IntoIterator<Item = &'a Character>,
    F: Fn(&'a Character) -> &'a str,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(&'a str, Vec<&'a Character>)> = Vec::new();
    for item in items {
        let k = key(item);
        match index.get(k) {
            Some(&i) => groups[i].1.push(item),
            None => {
                index.insert(k, groups.len());
                groups.push((k, vec![item]));
            }
        }
    }
    groups
}

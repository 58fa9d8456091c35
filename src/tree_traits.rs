//! Conversion of census trees into printable `termtree` trees.

use termtree::Tree;
use tracing::instrument;

use crate::domain::HierarchyNode;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for HierarchyNode {
    #[instrument(level = "trace", skip(self), fields(name = %self.name))]
    fn to_tree_string(&self) -> Tree<String> {
        let label = if self.is_leaf() {
            match self.value() {
                Some(value) => format!("{}: {}", self.name, value),
                None => format!("{}: n/a", self.name),
            }
        } else {
            format!("{} ({})", self.name, self.aggregate())
        };

        let leaves: Vec<_> = self
            .children()
            .iter()
            .map(|c| c.to_tree_string())
            .collect();

        Tree::new(label).with_leaves(leaves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Level;

    #[test]
    fn given_group_when_rendering_then_labels_show_aggregates_and_values() {
        let node = HierarchyNode::group(
            "Nord",
            Level::Group,
            vec![
                HierarchyNode::leaf("Lydia", Some(304)),
                HierarchyNode::leaf("Elisif", None),
            ],
        );

        let rendered = node.to_tree_string().to_string();

        assert!(rendered.starts_with("Nord (305)"));
        assert!(rendered.contains("Lydia: 304"));
        assert!(rendered.contains("Elisif: n/a"));
    }
}

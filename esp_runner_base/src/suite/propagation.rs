//! Rule id propagation over compiled groups

use super::group::{CheckGroup, ExampleNode};

/// Set `id` on a group, every nested group and every example
///
/// Post-order: children first, then the node itself. Must run on the fully
/// expanded tree.
pub fn propagate_rule_id(group: &mut CheckGroup, id: &str) {
    for node in group.children.iter_mut() {
        match node {
            ExampleNode::Leaf(example) => example.metadata.id = Some(id.to_string()),
            ExampleNode::Group(child) => propagate_rule_id(child, id),
        }
    }
    group.metadata.id = Some(id.to_string());
}

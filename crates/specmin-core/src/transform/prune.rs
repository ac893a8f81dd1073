use indexmap::IndexMap;

use crate::config::CompactOptions;
use crate::node::Node;

/// Drop mapping entries whose value is `null` or an empty string, recursively.
pub fn prune_empty(node: Node) -> Node {
    match node {
        Node::Object(map) => Node::Object(
            map.into_iter()
                .filter(|(_, value)| !value.is_blank())
                .map(|(key, value)| (key, prune_empty(value)))
                .collect(),
        ),
        Node::Array(items) => Node::Array(items.into_iter().map(prune_empty).collect()),
        other => other,
    }
}

/// Drop `example`, `enum` and nested `description` entries unless the options keep them.
///
/// A top-level `description` (the endpoint's own) is left alone. Direct
/// children of a `properties` mapping are field names, not keywords, and are
/// never dropped.
pub fn prune_unwanted(node: Node, options: &CompactOptions) -> Node {
    prune_at(node, 0, false, options)
}

fn prune_at(node: Node, depth: usize, field_names: bool, options: &CompactOptions) -> Node {
    match node {
        Node::Object(map) => {
            let mut kept = IndexMap::with_capacity(map.len());
            for (key, value) in map {
                if !field_names && is_unwanted(&key, depth, options) {
                    continue;
                }
                let children_are_fields = !field_names && key == "properties";
                kept.insert(key, prune_at(value, depth + 1, children_are_fields, options));
            }
            Node::Object(kept)
        }
        Node::Array(items) => Node::Array(
            items
                .into_iter()
                .map(|item| prune_at(item, depth + 1, false, options))
                .collect(),
        ),
        other => other,
    }
}

fn is_unwanted(key: &str, depth: usize, options: &CompactOptions) -> bool {
    match key {
        "example" => !options.examples,
        "enum" => !options.enums,
        "description" => depth > 0 && !options.nested_descriptions,
        _ => false,
    }
}

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::node::Node;

/// Collapse chains of single-entry mappings, letting the innermost key stand
/// in for the outer one.
///
/// `{"schema": {"items": {"type": "string"}}}` becomes `{"type": "string"}`.
/// Keys in `keep` retain their nesting (their values are still flattened
/// inside), and an unwrap that would collide with a sibling key stops early.
///
/// The collision check sees keys already emitted, so the result depends on
/// sibling order: in `{"a": {"type": "x"}, "b": {"type": "y"}}` only `a`
/// is unwrapped and `b` keeps its wrapper.
pub fn flatten(node: Node, keep: &[String]) -> Node {
    match node {
        Node::Object(map) => {
            let siblings: HashSet<String> = map.keys().cloned().collect();
            let mut out = IndexMap::with_capacity(map.len());
            for (mut key, mut value) in map {
                while !keep.contains(&key) {
                    match value {
                        Node::Object(mut inner)
                            if inner.len() == 1
                                && inner.keys().all(|k| {
                                    *k == key || !(siblings.contains(k) || out.contains_key(k))
                                }) =>
                        {
                            match inner.pop() {
                                Some((inner_key, inner_value)) => {
                                    key = inner_key;
                                    value = inner_value;
                                }
                                None => {
                                    value = Node::Object(inner);
                                    break;
                                }
                            }
                        }
                        other => {
                            value = other;
                            break;
                        }
                    }
                }
                out.insert(key, flatten(value, keep));
            }
            Node::Object(out)
        }
        Node::Array(items) => Node::Array(items.into_iter().map(|item| flatten(item, keep)).collect()),
        other => other,
    }
}

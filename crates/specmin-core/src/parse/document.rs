use indexmap::IndexMap;

use crate::error::ParseError;
use crate::node::Node;

/// The root of a parsed OpenAPI document. Read-only for the rest of the crate.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecDocument {
    root: Node,
}

impl SpecDocument {
    pub fn new(root: Node) -> Result<Self, ParseError> {
        match root {
            Node::Object(_) => Ok(Self { root }),
            other => Err(ParseError::NotAnObject(other.kind())),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.root.get(key)
    }

    /// `servers[0].url`, when present and non-empty.
    pub fn server_url(&self) -> Option<&str> {
        self.get("servers")
            .and_then(Node::as_array)
            .and_then(|servers| servers.first())
            .and_then(|server| server.get("url"))
            .and_then(Node::as_str)
            .filter(|url| !url.is_empty())
    }

    pub fn paths(&self) -> Option<&IndexMap<String, Node>> {
        self.get("paths").and_then(Node::as_object)
    }

    /// Walk an internal reference such as `#/components/schemas/Pet`.
    ///
    /// Segments are JSON-pointer escaped (`~1` is `/`, `~0` is `~`); numeric
    /// segments index into sequences. Returns `None` for external references
    /// and for any missing segment.
    pub fn lookup(&self, reference: &str) -> Option<&Node> {
        let pointer = reference.strip_prefix('#')?;
        if pointer.is_empty() {
            return Some(&self.root);
        }
        let pointer = pointer.strip_prefix('/')?;
        pointer.split('/').try_fold(&self.root, |node, raw| {
            let segment = raw.replace("~1", "/").replace("~0", "~");
            match node {
                Node::Object(map) => map.get(&segment),
                Node::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            }
        })
    }
}

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use log::{debug, warn};

use crate::node::Node;
use crate::parse::SpecDocument;

/// Resolved type bodies keyed by type name (the last segment of their `$ref`).
pub type TypeTable = IndexMap<String, Node>;

/// A `$ref` whose target could not be found. Its type was recorded as `{}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveWarning {
    pub reference: String,
    pub type_name: String,
}

impl fmt::Display for ResolveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unresolvable reference {} (type `{}` left empty)",
            self.reference, self.type_name
        )
    }
}

/// Replaces `$ref` pointers with type names, collecting each referenced body
/// into a [`TypeTable`] exactly once.
///
/// One resolver spans one compaction pass, so a type shared by many endpoints
/// is resolved a single time. A name already in the table, or currently being
/// resolved further up the stack, short-circuits, which is what makes
/// self-referencing and mutually-referencing schemas terminate.
pub struct RefResolver<'a> {
    doc: &'a SpecDocument,
    strip_keys: Vec<String>,
    types: TypeTable,
    in_progress: HashSet<String>,
    warnings: Vec<ResolveWarning>,
}

impl<'a> RefResolver<'a> {
    pub fn new(doc: &'a SpecDocument) -> Self {
        Self {
            doc,
            strip_keys: Vec::new(),
            types: IndexMap::new(),
            in_progress: HashSet::new(),
            warnings: Vec::new(),
        }
    }

    /// Drop these keys from every mapping the resolver walks.
    pub fn with_strip_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strip_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Return `node` with every reference replaced by `Node::Ref(type_name)`.
    pub fn resolve(&mut self, node: &Node) -> Node {
        self.resolve_at(node, false)
    }

    /// Direct children of `properties` are field names, so strip keys do not apply to them.
    fn resolve_at(&mut self, node: &Node, field_names: bool) -> Node {
        match node {
            Node::Ref(target) => Node::Ref(self.resolve_ref(target)),
            Node::Object(map) => {
                let mut resolved = IndexMap::with_capacity(map.len());
                for (key, value) in map {
                    if !field_names && self.strip_keys.iter().any(|k| k == key) {
                        continue;
                    }
                    let children_are_fields = !field_names && key == "properties";
                    resolved.insert(key.clone(), self.resolve_at(value, children_are_fields));
                }
                Node::Object(resolved)
            }
            Node::Array(items) => Node::Array(items.iter().map(|item| self.resolve(item)).collect()),
            Node::Scalar(_) => node.clone(),
        }
    }

    fn resolve_ref(&mut self, target: &str) -> String {
        let name = Node::ref_name(target).to_string();
        if self.types.contains_key(&name) || self.in_progress.contains(&name) {
            return name;
        }

        self.in_progress.insert(name.clone());
        let doc = self.doc;
        let body = match doc.lookup(target) {
            Some(found) => {
                debug!("resolving type {name} from {target}");
                self.resolve(found)
            }
            None => {
                let warning = ResolveWarning {
                    reference: target.to_string(),
                    type_name: name.clone(),
                };
                warn!("{warning}");
                self.warnings.push(warning);
                Node::empty_object()
            }
        };
        self.types.insert(name.clone(), body);
        self.in_progress.remove(&name);
        name
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    pub fn warnings(&self) -> &[ResolveWarning] {
        &self.warnings
    }

    /// Consume the resolver, yielding the type table and any warnings.
    pub fn finish(self) -> (TypeTable, Vec<ResolveWarning>) {
        (self.types, self.warnings)
    }
}

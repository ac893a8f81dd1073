use indexmap::IndexMap;

use crate::config::CompactOptions;
use crate::node::{Node, Scalar};

/// The built-in abbreviation table, shared by endpoint bodies and type bodies.
pub const DEFAULT_ABBREVIATIONS: &[(&str, &str)] = &[
    ("operationId", "opid"),
    ("parameters", "params"),
    ("requestBody", "reqBody"),
    ("properties", "props"),
    ("schemaName", "schName"),
    ("description", "desc"),
    ("summary", "sum"),
    ("string", "str"),
    ("number", "num"),
    ("object", "obj"),
    ("boolean", "bool"),
    ("array", "arr"),
    ("integer", "int"),
    ("default", "def"),
    ("required", "req"),
    ("minLength", "minLen"),
    ("maxLength", "maxLen"),
    ("minimum", "min"),
    ("maximum", "max"),
];

/// A total token mapping: anything not in the table is returned unchanged.
#[derive(Debug, Clone)]
pub struct Abbreviations {
    table: IndexMap<String, String>,
}

impl Default for Abbreviations {
    fn default() -> Self {
        Self {
            table: DEFAULT_ABBREVIATIONS
                .iter()
                .map(|(long, short)| (long.to_string(), short.to_string()))
                .collect(),
        }
    }
}

impl Abbreviations {
    /// The built-in table with configured entries merged over it.
    pub fn from_options(options: &CompactOptions) -> Self {
        let mut abbreviations = Self::default();
        for (long, short) in &options.abbreviations {
            abbreviations.table.insert(long.clone(), short.clone());
        }
        abbreviations
    }

    pub fn token<'a>(&'a self, token: &'a str) -> &'a str {
        self.table.get(token).map(String::as_str).unwrap_or(token)
    }

    /// Abbreviate mapping keys and string values throughout `node`.
    /// Reference markers are left untouched so type links stay intact.
    pub fn apply(&self, node: Node) -> Node {
        match node {
            Node::Object(map) => Node::Object(
                map.into_iter()
                    .map(|(key, value)| (self.token(&key).to_string(), self.apply(value)))
                    .collect(),
            ),
            Node::Array(items) => Node::Array(items.into_iter().map(|item| self.apply(item)).collect()),
            Node::Scalar(Scalar::String(s)) => Node::string(self.token(&s)),
            other => other,
        }
    }
}

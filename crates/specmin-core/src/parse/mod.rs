pub mod document;
pub mod validate;

use crate::error::ParseError;
use crate::node::Node;
pub use document::SpecDocument;
pub use validate::validate;

/// Parse a spec document from YAML.
pub fn from_yaml(input: &str) -> Result<SpecDocument, ParseError> {
    let root: Node = serde_yaml_ng::from_str(input)?;
    SpecDocument::new(root)
}

/// Parse a spec document from JSON.
pub fn from_json(input: &str) -> Result<SpecDocument, ParseError> {
    let root: Node = serde_json::from_str(input)?;
    SpecDocument::new(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_root_must_be_mapping() {
        let err = from_yaml("- a\n- b\n").unwrap_err();
        assert!(matches!(err, ParseError::NotAnObject("sequence")));
    }

    #[test]
    fn json_syntax_error() {
        assert!(matches!(from_json("{"), Err(ParseError::Json(_))));
    }
}

use indexmap::IndexMap;

use crate::config::CompactOptions;
use crate::node::Node;
use crate::parse::SpecDocument;

use super::abbreviate::Abbreviations;
use super::flatten::flatten;

/// A security requirement: map of scheme name → required scopes.
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

const SCHEME_STRIP_KEYS: &[&str] = &["description", "example", "title", "pattern"];

/// Declared security schemes of a handled `type`, keyed by scheme name.
///
/// Narrative keys are dropped, then the attributes are abbreviated and
/// flattened the same way endpoint bodies are.
pub fn security_schemes(
    doc: &SpecDocument,
    options: &CompactOptions,
    abbreviations: &Abbreviations,
) -> IndexMap<String, Node> {
    let Some(schemes) = doc
        .get("components")
        .and_then(|c| c.get("securitySchemes"))
        .and_then(Node::as_object)
    else {
        return IndexMap::new();
    };

    let mut out = IndexMap::new();
    for (name, scheme) in schemes {
        let scheme = match scheme {
            Node::Ref(target) => doc.lookup(target).unwrap_or(scheme),
            _ => scheme,
        };
        let Some(attributes) = scheme.as_object() else {
            continue;
        };
        let handled = attributes
            .get("type")
            .and_then(Node::as_str)
            .is_some_and(|t| options.security_types.iter().any(|h| h == t));
        if !handled {
            continue;
        }
        let kept: IndexMap<String, Node> = attributes
            .iter()
            .filter(|(key, _)| !SCHEME_STRIP_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let compacted = flatten(abbreviations.apply(Node::Object(kept)), &options.flatten_keep);
        out.insert(name.clone(), compacted);
    }
    out
}

/// Scopes required by the document-wide `security` array. Later entries for
/// the same scheme replace earlier ones.
pub fn security_scopes(doc: &SpecDocument) -> SecurityRequirement {
    requirements(doc.get("security"))
        .into_iter()
        .flatten()
        .collect()
}

/// Parse a `security` array into requirement maps.
pub fn requirements(security: Option<&Node>) -> Vec<SecurityRequirement> {
    let Some(items) = security.and_then(Node::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Node::as_object)
        .map(|requirement| {
            requirement
                .iter()
                .map(|(scheme, scopes)| {
                    let scopes = scopes
                        .as_array()
                        .unwrap_or_default()
                        .iter()
                        .filter_map(Node::as_str)
                        .map(str::to_string)
                        .collect();
                    (scheme.clone(), scopes)
                })
                .collect()
        })
        .collect()
}

/// `[read, write]`
pub fn format_scopes(scopes: &[String]) -> String {
    format!("[{}]", scopes.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(yaml: &str) -> SpecDocument {
        crate::parse::from_yaml(yaml).unwrap()
    }

    #[test]
    fn handled_schemes_are_compacted() {
        let d = doc(r#"
components:
  securitySchemes:
    bearer:
      type: http
      scheme: bearer
      bearerFormat: JWT
      description: Use a token.
    key:
      type: apiKey
      in: header
      name: X-API-Key
    oauth:
      type: oauth2
      flows: {}
"#);
        let schemes = security_schemes(&d, &CompactOptions::default(), &Abbreviations::default());
        assert_eq!(schemes.keys().collect::<Vec<_>>(), ["bearer", "key"]);
        let bearer = schemes["bearer"].as_object().unwrap();
        assert!(!bearer.contains_key("description"));
        assert!(!bearer.contains_key("desc"));
        assert_eq!(bearer["scheme"].as_str(), Some("bearer"));
        assert_eq!(schemes["key"].get("in").and_then(Node::as_str), Some("header"));
    }

    #[test]
    fn global_scopes_last_entry_wins() {
        let d = doc(r#"
security:
  - oauth: [read]
  - key: []
  - oauth: [read, write]
"#);
        let scopes = security_scopes(&d);
        assert_eq!(scopes.len(), 2);
        assert_eq!(scopes["oauth"], ["read", "write"]);
        assert!(scopes["key"].is_empty());
    }

    #[test]
    fn no_security_sections() {
        let d = doc("openapi: 3.0.0\n");
        assert!(security_schemes(&d, &CompactOptions::default(), &Abbreviations::default()).is_empty());
        assert!(security_scopes(&d).is_empty());
    }

    #[test]
    fn scopes_format() {
        assert_eq!(format_scopes(&["read".into(), "write".into()]), "[read, write]");
        assert_eq!(format_scopes(&[]), "[]");
    }
}

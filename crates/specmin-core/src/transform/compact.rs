use indexmap::IndexMap;
use log::debug;

use crate::config::CompactOptions;
use crate::error::ValidationError;
use crate::node::Node;
use crate::parse::{SpecDocument, validate};
use crate::resolve::{RefResolver, ResolveWarning, TypeTable};

use super::abbreviate::Abbreviations;
use super::flatten::flatten;
use super::prune::{prune_empty, prune_unwanted};
use super::security::{SecurityRequirement, format_scopes, security_schemes, security_scopes};
use super::select::{EndpointRecord, select_endpoint};
use super::serialize::{render, sanitize};

const SEPARATOR: &str = "---";

/// The result of compacting one document.
#[derive(Debug, Clone)]
pub struct CompactOutput {
    /// The line-oriented description: header, security, then one block per endpoint.
    pub text: String,
    /// Abbreviated type bodies, sorted by type name.
    pub types: TypeTable,
    pub endpoints: Vec<EndpointRecord>,
    pub warnings: Vec<ResolveWarning>,
}

impl CompactOutput {
    pub fn types_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.types)
    }
}

/// Compact a document into text plus a type table.
///
/// Fails only on structural validation; unresolvable references are reported
/// through [`CompactOutput::warnings`].
pub fn compact(
    doc: &SpecDocument,
    options: &CompactOptions,
) -> Result<CompactOutput, ValidationError> {
    validate(doc, options)?;
    let base_url = doc.server_url().unwrap_or_default();

    let abbreviations = Abbreviations::from_options(options);
    let mut resolver = RefResolver::new(doc).with_strip_keys(options.resolved_strip_keys());
    let mut endpoints = Vec::new();

    for (path, item) in doc.paths().into_iter().flatten() {
        let Some(methods) = item.as_object() else {
            continue;
        };
        for (method, operation) in methods {
            if !options.handles_method(method) {
                continue;
            }
            let deprecated = operation
                .get("deprecated")
                .and_then(Node::as_bool)
                .unwrap_or(false);
            if deprecated && !options.deprecated {
                debug!("skipping deprecated {method} {path}");
                continue;
            }

            let mut record = select_endpoint(doc, path, method, item, operation, options);
            if options.schemas {
                // Only the type table is wanted here; the endpoint keeps its
                // own nodes so narrative keys are pruned by the endpoint rules.
                resolver.resolve(&record.body);
            }
            record.body = compact_node(record.body, options, &abbreviations);
            debug!("compacted {method} {path}");
            endpoints.push(record);
        }
    }

    let (types, warnings) = resolver.finish();
    let types = compact_types(types, &abbreviations);

    let schemes = security_schemes(doc, options, &abbreviations);
    let scopes = security_scopes(doc);
    let tags = if options.tag_descriptions {
        tag_descriptions(doc)
    } else {
        Vec::new()
    };

    let text = assemble(base_url, &schemes, &scopes, &tags, &endpoints);
    Ok(CompactOutput {
        text,
        types,
        endpoints,
        warnings,
    })
}

/// Prune, flatten and abbreviate one selected endpoint body.
pub fn compact_node(node: Node, options: &CompactOptions, abbreviations: &Abbreviations) -> Node {
    let node = prune_empty(node);
    let node = prune_unwanted(node, options);
    let node = flatten(node, &options.flatten_keep);
    abbreviations.apply(node)
}

fn compact_types(types: TypeTable, abbreviations: &Abbreviations) -> TypeTable {
    let mut types: TypeTable = types
        .into_iter()
        .map(|(name, body)| (name, abbreviations.apply(prune_empty(body))))
        .collect();
    types.sort_keys();
    types
}

fn tag_descriptions(doc: &SpecDocument) -> Vec<(String, String)> {
    doc.get("tags")
        .and_then(Node::as_array)
        .unwrap_or_default()
        .iter()
        .filter_map(|tag| {
            let name = tag.get("name").and_then(Node::as_str)?;
            let description = tag.get("description").and_then(Node::as_str)?;
            Some((name.to_string(), sanitize(description)))
        })
        .collect()
}

fn assemble(
    base_url: &str,
    schemes: &IndexMap<String, Node>,
    scopes: &SecurityRequirement,
    tags: &[(String, String)],
    endpoints: &[EndpointRecord],
) -> String {
    let mut lines = vec![format!("##IMPORTANT: base_url:{base_url}"), SEPARATOR.to_string()];

    if !schemes.is_empty() {
        lines.push("##SECURITY SCHEMES".to_string());
        for (name, scheme) in schemes {
            lines.push(format!("-{name}"));
            push_scheme(&mut lines, scheme);
        }
        lines.push(SEPARATOR.to_string());
    }

    if !scopes.is_empty() {
        lines.push("##SECURITY SCOPES".to_string());
        for (scheme, required) in scopes {
            lines.push(format!("{scheme}: {}", format_scopes(required)));
        }
        lines.push(SEPARATOR.to_string());
    }

    if !tags.is_empty() {
        lines.push("##TAGS".to_string());
        for (name, description) in tags {
            lines.push(format!("{name}: {description}"));
        }
        lines.push(SEPARATOR.to_string());
    }

    lines.push("##ENDPOINTS".to_string());
    lines.push(SEPARATOR.to_string());
    for endpoint in endpoints {
        lines.push(format!("-method:{}", endpoint.method));
        if !endpoint.security.is_empty() {
            lines.push("-security".to_string());
            for requirement in &endpoint.security {
                for (name, required) in requirement {
                    lines.push(format!("{name}: {}", format_scopes(required)));
                }
            }
        }
        let content = render(&endpoint.body);
        if !content.is_empty() {
            lines.push(content);
        }
        lines.push(SEPARATOR.to_string());
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Scheme attributes are identifiers and URLs, so scalars are written verbatim.
fn push_scheme(lines: &mut Vec<String>, scheme: &Node) {
    let Some(attributes) = scheme.as_object() else {
        return;
    };
    for (key, value) in attributes {
        match value {
            Node::Scalar(scalar) => lines.push(format!("{key}: {scalar}")),
            nested => {
                lines.push(key.clone());
                let rendered = render(nested);
                if !rendered.is_empty() {
                    lines.push(rendered);
                }
            }
        }
    }
}

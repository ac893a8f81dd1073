use indexmap::IndexMap;

use crate::config::CompactOptions;
use crate::node::{Node, Scalar};
use crate::parse::SpecDocument;

use super::security::{SecurityRequirement, requirements};

/// One HTTP operation reduced to the fields worth describing.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointRecord {
    pub method: String,
    pub path: String,
    pub operation_id: Option<String>,
    /// Operation tags, `["default"]` when the operation declares none.
    pub tags: Vec<String>,
    /// Operation-level security requirements.
    pub security: Vec<SecurityRequirement>,
    /// The selected content: path, operationId, parameters, summary,
    /// description, requestBody and responses, in that order.
    pub body: Node,
}

/// Build the record for `method path` from its path item and operation node.
pub fn select_endpoint(
    doc: &SpecDocument,
    path: &str,
    method: &str,
    path_item: &Node,
    operation: &Node,
    options: &CompactOptions,
) -> EndpointRecord {
    let operation_id = operation.get("operationId").and_then(Node::as_str).map(str::to_string);

    let mut body = IndexMap::new();
    body.insert("path".to_string(), Node::string(path));
    if let Some(id) = &operation_id {
        body.insert("operationId".to_string(), Node::string(id.as_str()));
    }

    if options.parameters {
        let params = select_parameters(doc, path_item.get("parameters"), operation.get("parameters"));
        if !params.is_empty() {
            body.insert("parameters".to_string(), Node::Array(params));
        }
    }
    if options.endpoint_summaries {
        if let Some(summary) = operation.get("summary") {
            body.insert("summary".to_string(), summary.clone());
        }
    }
    if options.endpoint_descriptions {
        if let Some(description) = operation.get("description") {
            body.insert("description".to_string(), description.clone());
        }
    }
    if options.request_bodies {
        if let Some(schema) = operation.get("requestBody").and_then(|rb| body_schema(doc, rb)) {
            body.insert("requestBody".to_string(), schema);
        }
    }
    if options.good_responses || options.bad_responses {
        let responses = select_responses(doc, operation.get("responses"), options);
        if !responses.is_empty() {
            body.insert("responses".to_string(), Node::Object(responses));
        }
    }

    let tags = match operation.get("tags").and_then(Node::as_array) {
        Some(tags) => tags.iter().filter_map(Node::as_str).map(str::to_string).collect(),
        None => vec!["default".to_string()],
    };

    EndpointRecord {
        method: method.to_string(),
        path: path.to_string(),
        operation_id,
        tags,
        security: requirements(operation.get("security")),
        body: Node::Object(body),
    }
}

/// Path-level then operation-level parameters; an operation parameter
/// replaces a path parameter with the same `name` and `in`. Each one carries
/// an explicit `required` of `"True"` or `"False"`.
fn select_parameters(doc: &SpecDocument, shared: Option<&Node>, own: Option<&Node>) -> Vec<Node> {
    let mut selected: Vec<Node> = Vec::new();
    for param in [shared, own].into_iter().flatten().filter_map(Node::as_array).flatten() {
        let param = annotate_required(deref(doc, param));
        let identity = param_identity(&param);
        match selected
            .iter()
            .position(|p| identity.is_some() && param_identity(p) == identity)
        {
            Some(i) => selected[i] = param,
            None => selected.push(param),
        }
    }
    selected
}

fn param_identity(param: &Node) -> Option<(&str, &str)> {
    let name = param.get("name").and_then(Node::as_str)?;
    let location = param.get("in").and_then(Node::as_str).unwrap_or("");
    Some((name, location))
}

fn annotate_required(param: Node) -> Node {
    let Node::Object(mut map) = param else {
        return param;
    };
    let required = match map.get("required") {
        Some(Node::Scalar(Scalar::Bool(true))) => "True".to_string(),
        Some(Node::Scalar(Scalar::Bool(false))) | None => "False".to_string(),
        Some(Node::Scalar(other)) => other.to_string(),
        Some(_) => "False".to_string(),
    };
    map.insert("required".to_string(), Node::string(required));
    Node::Object(map)
}

/// The request body schema, preferring `application/json` and then any other
/// JSON media type. A `$ref` body is followed one level.
fn body_schema(doc: &SpecDocument, request_body: &Node) -> Option<Node> {
    let content = deref(doc, request_body).get("content")?.as_object()?.clone();
    content
        .get("application/json")
        .or_else(|| {
            content
                .iter()
                .find(|(media_type, _)| media_type.contains("json"))
                .map(|(_, entry)| entry)
        })
        .and_then(|entry| entry.get("schema"))
        .cloned()
}

fn select_responses(
    doc: &SpecDocument,
    responses: Option<&Node>,
    options: &CompactOptions,
) -> IndexMap<String, Node> {
    let Some(responses) = responses.and_then(Node::as_object) else {
        return IndexMap::new();
    };
    responses
        .iter()
        .filter(|(status, _)| {
            (options.good_responses && status.as_str() == "200")
                || (options.bad_responses && is_error_status(status))
        })
        .map(|(status, response)| (status.clone(), deref(doc, response)))
        .collect()
}

fn is_error_status(status: &str) -> bool {
    status.starts_with('4') || status.starts_with('5') || status == "default"
}

/// Follow a reference one level. Unresolvable references are kept as-is so
/// the resolver can report them.
fn deref(doc: &SpecDocument, node: &Node) -> Node {
    match node {
        Node::Ref(target) => doc.lookup(target).cloned().unwrap_or_else(|| node.clone()),
        _ => node.clone(),
    }
}

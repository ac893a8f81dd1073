use crate::config::CompactOptions;
use crate::error::ValidationError;
use crate::node::Node;

use super::document::SpecDocument;

/// Check the structural minimum a document needs before compaction.
///
/// Runs before any other work so that a broken document produces no partial
/// output. Only operations under handled methods are inspected.
pub fn validate(doc: &SpecDocument, options: &CompactOptions) -> Result<(), ValidationError> {
    if doc.server_url().is_none() {
        return Err(ValidationError::MissingServerUrl);
    }

    let paths = doc
        .paths()
        .filter(|paths| !paths.is_empty())
        .ok_or(ValidationError::MissingPaths)?;

    for (path, item) in paths {
        let Some(methods) = item.as_object() else {
            continue;
        };
        let shared_params = item.get("parameters");
        for (method, operation) in methods {
            if !options.handles_method(method) {
                continue;
            }
            for params in [shared_params, operation.get("parameters")].into_iter().flatten() {
                check_parameters(params, method, path)?;
            }
            if let Some(body) = operation.get("requestBody") {
                check_request_body(body, method, path)?;
            }
        }
    }
    Ok(())
}

fn check_parameters(params: &Node, method: &str, path: &str) -> Result<(), ValidationError> {
    for param in params.as_array().unwrap_or_default() {
        let named = matches!(param, Node::Ref(_)) || param.get("name").is_some();
        if !named {
            return Err(ValidationError::ParameterMissingName {
                method: method.to_string(),
                path: path.to_string(),
            });
        }
    }
    Ok(())
}

fn check_request_body(body: &Node, method: &str, path: &str) -> Result<(), ValidationError> {
    if let Node::Ref(_) = body {
        return Ok(());
    }
    let content = body
        .get("content")
        .and_then(Node::as_object)
        .ok_or_else(|| ValidationError::RequestBodyMissingContent {
            method: method.to_string(),
            path: path.to_string(),
        })?;
    for (media_type, entry) in content {
        if entry.get("schema").is_none() {
            return Err(ValidationError::ContentMissingSchema {
                method: method.to_string(),
                path: path.to_string(),
                media_type: media_type.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(value: serde_json::Value) -> Result<(), ValidationError> {
        let doc = SpecDocument::new(Node::from(value)).unwrap();
        validate(&doc, &CompactOptions::default())
    }

    #[test]
    fn missing_servers() {
        let err = check(json!({"paths": {"/a": {"get": {}}}})).unwrap_err();
        assert_eq!(err, ValidationError::MissingServerUrl);
        assert!(err.to_string().contains("servers"));
    }

    #[test]
    fn empty_paths() {
        let err = check(json!({"servers": [{"url": "https://x"}], "paths": {}})).unwrap_err();
        assert_eq!(err, ValidationError::MissingPaths);
        assert!(err.to_string().contains("paths"));
    }

    #[test]
    fn unnamed_parameter_names_operation() {
        let err = check(json!({
            "servers": [{"url": "https://x"}],
            "paths": {"/items": {"get": {"parameters": [{"in": "query"}]}}}
        }))
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("get"), "{message}");
        assert!(message.contains("/items"), "{message}");
    }

    #[test]
    fn ref_parameter_is_accepted() {
        check(json!({
            "servers": [{"url": "https://x"}],
            "paths": {"/items": {"get": {"parameters": [{"$ref": "#/components/parameters/Limit"}]}}}
        }))
        .unwrap();
    }

    #[test]
    fn body_without_content() {
        let err = check(json!({
            "servers": [{"url": "https://x"}],
            "paths": {"/items": {"post": {"requestBody": {"required": true}}}}
        }))
        .unwrap_err();
        assert!(matches!(err, ValidationError::RequestBodyMissingContent { .. }));
    }

    #[test]
    fn content_without_schema() {
        let err = check(json!({
            "servers": [{"url": "https://x"}],
            "paths": {"/items": {"post": {"requestBody": {"content": {"application/json": {}}}}}}
        }))
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::ContentMissingSchema {
                method: "post".to_string(),
                path: "/items".to_string(),
                media_type: "application/json".to_string(),
            }
        );
    }

    #[test]
    fn unhandled_methods_are_not_inspected() {
        check(json!({
            "servers": [{"url": "https://x"}],
            "paths": {"/items": {"options": {"parameters": [{"in": "query"}]}}}
        }))
        .unwrap();
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document root must be a mapping, found {0}")]
    NotAnObject(&'static str),
}

/// A structural problem that makes a document unusable for compaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing server URL: `servers[0].url` must be a non-empty string")]
    MissingServerUrl,

    #[error("missing paths: `paths` must be a non-empty mapping")]
    MissingPaths,

    #[error("parameter without `name` or `$ref` in {method} {path}")]
    ParameterMissingName { method: String, path: String },

    #[error("request body without `content` or `$ref` in {method} {path}")]
    RequestBodyMissingContent { method: String, path: String },

    #[error("request body content `{media_type}` without `schema` in {method} {path}")]
    ContentMissingSchema {
        method: String,
        path: String,
        media_type: String,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml_ng::Error,
    },
}

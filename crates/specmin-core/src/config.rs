use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level project configuration loaded from `.specmin.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpecminConfig {
    pub input: String,
    pub output: String,
    pub options: CompactOptions,
}

impl Default for SpecminConfig {
    fn default() -> Self {
        Self {
            input: "specs".to_string(),
            output: "compact".to_string(),
            options: CompactOptions::default(),
        }
    }
}

/// Which parts of a document survive compaction.
///
/// Built once per run and passed by reference through every step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CompactOptions {
    pub parameters: bool,
    /// Keep the `200` response.
    pub good_responses: bool,
    /// Keep `4xx`, `5xx` and `default` responses.
    pub bad_responses: bool,
    pub request_bodies: bool,
    /// Resolve referenced schemas into the type table.
    pub schemas: bool,
    pub endpoint_descriptions: bool,
    pub endpoint_summaries: bool,
    pub enums: bool,
    pub nested_descriptions: bool,
    pub examples: bool,
    pub tag_descriptions: bool,
    pub deprecated: bool,
    /// Lowercase HTTP methods to compact; others are skipped.
    pub methods: Vec<String>,
    /// Security scheme `type` values to report.
    pub security_types: Vec<String>,
    /// Keys whose single-entry values are never flattened away.
    pub flatten_keep: Vec<String>,
    /// Keys dropped from resolved type bodies.
    pub type_strip_keys: Vec<String>,
    /// Extra abbreviations, merged over the built-in table.
    pub abbreviations: IndexMap<String, String>,
}

impl Default for CompactOptions {
    fn default() -> Self {
        Self {
            parameters: true,
            good_responses: false,
            bad_responses: false,
            request_bodies: true,
            schemas: true,
            endpoint_descriptions: false,
            endpoint_summaries: true,
            enums: true,
            nested_descriptions: false,
            examples: false,
            tag_descriptions: false,
            deprecated: false,
            methods: strings(&["get", "post", "put", "patch", "delete"]),
            security_types: strings(&["http", "apiKey", "openIdConnect"]),
            flatten_keep: strings(&["responses", "default", "200"]),
            type_strip_keys: strings(&["description", "example", "title", "pattern"]),
            abbreviations: IndexMap::new(),
        }
    }
}

impl CompactOptions {
    pub fn handles_method(&self, method: &str) -> bool {
        self.methods.iter().any(|m| m.eq_ignore_ascii_case(method))
    }

    /// Keys the resolver drops from type bodies, including `enum` when enums are off.
    pub fn resolved_strip_keys(&self) -> Vec<String> {
        let mut keys = self.type_strip_keys.clone();
        if !self.enums && !keys.iter().any(|k| k == "enum") {
            keys.push("enum".to_string());
        }
        if self.examples {
            keys.retain(|k| k != "example");
        }
        keys
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".specmin.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<SpecminConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config = serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# specmin configuration
input: specs          # directory (batch) or file (compact)
output: compact

options:
  parameters: true
  good_responses: false     # keep the 200 response
  bad_responses: false      # keep 4xx/5xx/default responses
  request_bodies: true
  schemas: true             # resolve $ref schemas into the type table
  endpoint_descriptions: false
  endpoint_summaries: true
  enums: true
  nested_descriptions: false
  examples: false
  tag_descriptions: false
  deprecated: false
  methods: [get, post, put, patch, delete]
  security_types: [http, apiKey, openIdConnect]
  flatten_keep: [responses, default, "200"]
  type_strip_keys: [description, example, title, pattern]
  abbreviations: {}
    # operationId: op
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SpecminConfig::default();
        assert_eq!(config.input, "specs");
        assert_eq!(config.output, "compact");
        let options = config.options;
        assert!(options.parameters);
        assert!(!options.good_responses);
        assert!(options.enums);
        assert!(!options.deprecated);
        assert_eq!(options.flatten_keep, ["responses", "default", "200"]);
        assert!(options.handles_method("GET"));
        assert!(!options.handles_method("options"));
    }

    #[test]
    fn test_default_content_matches_defaults() {
        let config: SpecminConfig = serde_yaml_ng::from_str(default_config_content()).unwrap();
        assert_eq!(config.options, CompactOptions::default());
        assert_eq!(config.input, "specs");
    }

    #[test]
    fn test_parse_partial_options() {
        let yaml = r#"
options:
  good_responses: true
  enums: false
  methods: [get]
  abbreviations:
    operationId: op
"#;
        let config: SpecminConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert!(config.options.good_responses);
        assert!(!config.options.enums);
        assert_eq!(config.options.methods, ["get"]);
        assert_eq!(config.options.abbreviations["operationId"], "op");
        // Defaults applied
        assert!(config.options.parameters);
        assert_eq!(config.output, "compact");
    }

    #[test]
    fn test_strip_keys_follow_flags() {
        let options = CompactOptions {
            enums: false,
            examples: true,
            ..CompactOptions::default()
        };
        let keys = options.resolved_strip_keys();
        assert!(keys.contains(&"enum".to_string()));
        assert!(!keys.contains(&"example".to_string()));
    }

    #[test]
    fn test_missing_config_file() {
        let loaded = load_config(Path::new("/nonexistent/.specmin.yaml")).unwrap();
        assert!(loaded.is_none());
    }
}

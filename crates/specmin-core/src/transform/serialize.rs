use std::sync::LazyLock;

use regex::Regex;

use crate::node::Node;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<.*?>").expect("HTML tag pattern should be valid"));

/// Strip HTML tags and punctuation noise from a key or value.
///
/// ASCII punctuation is removed except `/ # _ - |`. `.` and `,` survive only
/// between a character and a following letter or digit, so `v1.2` and
/// `api.example.com` keep their dots while sentence punctuation goes.
pub fn sanitize(input: &str) -> String {
    let text = HTML_TAG.replace_all(input, "");
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '/' | '#' | '_' | '-' | '|' => out.push(c),
            '.' | ',' => {
                if chars.peek().is_some_and(|next| next.is_alphanumeric()) {
                    out.push(c);
                }
            }
            c if c.is_ascii_punctuation() => {}
            c => out.push(c),
        }
    }
    out.trim().to_string()
}

/// Render a processed tree as newline-separated text.
///
/// A mapping entry with a scalar value becomes `key: value`; a nested value
/// puts `key` on its own line followed by the nested lines. References render
/// as `ref: #TypeName`. Blank lines are dropped.
pub fn render(node: &Node) -> String {
    let mut lines = Vec::new();
    render_into(node, &mut lines);
    lines.join("\n")
}

fn render_into(node: &Node, lines: &mut Vec<String>) {
    match node {
        Node::Object(map) => {
            for (key, value) in map {
                let key = sanitize(key);
                match value {
                    Node::Scalar(scalar) => {
                        push_line(lines, format!("{key}: {}", sanitize(&scalar.to_string())));
                    }
                    nested => {
                        push_line(lines, key);
                        render_into(nested, lines);
                    }
                }
            }
        }
        Node::Array(items) => {
            for item in items {
                render_into(item, lines);
            }
        }
        Node::Ref(target) => push_line(lines, ref_line(target)),
        Node::Scalar(scalar) => push_line(lines, sanitize(&scalar.to_string())),
    }
}

fn ref_line(target: &str) -> String {
    format!("ref: #{}", sanitize(Node::ref_name(target)))
}

fn push_line(lines: &mut Vec<String>, line: String) {
    if !line.trim().is_empty() {
        lines.push(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn html_and_punctuation_are_stripped() {
        assert_eq!(sanitize("<b>Returns a User.</b>"), "Returns a User");
        assert_eq!(sanitize("Use `limit` (max: 100)!"), "Use limit max 100");
    }

    #[test]
    fn allowed_punctuation_survives() {
        assert_eq!(sanitize("/pets/{petId}"), "/pets/petId");
        assert_eq!(sanitize("#Item"), "#Item");
        assert_eq!(sanitize("snake_case | kebab-case"), "snake_case | kebab-case");
        assert_eq!(sanitize("api.example.com v1.2, 1,000"), "api.example.com v1.2 1,000");
    }

    #[test]
    fn render_nested_mapping() {
        let node: Node = serde_json::from_str(
            r##"{
                "path": "/items",
                "params": [{"name": "limit", "type": "int"}],
                "reqBody": {"$ref": "#/components/schemas/Item"},
                "deprecated": false
            }"##,
        )
        .unwrap();
        assert_eq!(
            render(&node),
            "path: /items\nparams\nname: limit\ntype: int\nreqBody\nref: #Item\ndeprecated: false"
        );
    }

    #[test]
    fn blank_lines_are_dropped() {
        let node = Node::from(json!({"empty": {}, "list": ["", "x"], "note": "<br/>"}));
        assert_eq!(render(&node), "empty\nlist\nx\nnote: ");
    }
}

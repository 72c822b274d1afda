//! Strategy 5: structured JSON payload
//!
//! Backend generators often answer with an object such as
//! `{"server": "...", "routes": [{"name": "users", "content": "..."}]}`.
//! Known keys are mapped onto conventional paths in a fixed order.

use crate::fence::strip_fences;
use crate::strategy::{non_empty, ExtractionStrategy, StrategyKind};
use appforge_artifact::GeneratedFile;
use serde_json::{Map, Value};
use tracing::debug;

/// Single-file keys and their paths
const SINGLE_KEYS: &[(&str, &str)] = &[
    ("server", "src/server.js"),
    ("app", "src/app.js"),
    ("config", "src/config/index.js"),
];

/// Collection keys, each mapped to `src/<key>/<name>.js`
const COLLECTION_KEYS: &[&str] = &[
    "controllers",
    "services",
    "middleware",
    "models",
    "routes",
    "utils",
    "validators",
];

/// Content of a payload entry: a bare string or an object with code
fn entry_content(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s.as_str()),
        Value::Object(obj) => ["content", "code", "source"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(Value::as_str)),
        _ => None,
    }
}

/// Explicit path on an object entry
fn entry_path(value: &Value) -> Option<&str> {
    value
        .as_object()
        .and_then(|obj| obj.get("path").or_else(|| obj.get("filename")))
        .and_then(Value::as_str)
}

fn push_file(files: &mut Vec<GeneratedFile>, path: &str, name: Option<&str>, content: &str) {
    let content = content.trim();
    if content.is_empty() {
        return;
    }
    if let Ok(file) = GeneratedFile::new(path, format!("{content}\n")) {
        let file = match name {
            Some(n) => file.with_name(n),
            None => file,
        };
        files.push(file.with_generator(StrategyKind::JsonPayload.generator_label()));
    }
}

fn collection_entries<'a>(key: &str, value: &'a Value) -> Vec<(String, &'a Value)> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                let name = item
                    .get("name")
                    .and_then(Value::as_str)
                    .map_or_else(|| format!("{key}{}", idx + 1), str::to_string);
                (name, item)
            })
            .collect(),
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        _ => Vec::new(),
    }
}

/// Convert a structured payload object into files
///
/// Unknown keys are ignored; an object with none of the known keys yields
/// an empty list.
#[must_use]
pub fn files_from_json(value: &Value) -> Vec<GeneratedFile> {
    let Some(obj) = value.as_object() else {
        return Vec::new();
    };
    files_from_map(obj)
}

fn files_from_map(obj: &Map<String, Value>) -> Vec<GeneratedFile> {
    let mut files = Vec::new();

    for (key, default_path) in SINGLE_KEYS {
        if let Some(value) = obj.get(*key) {
            if let Some(content) = entry_content(value) {
                let path = entry_path(value).unwrap_or(default_path);
                push_file(&mut files, path, None, content);
            }
        }
    }

    for key in COLLECTION_KEYS {
        let Some(value) = obj.get(*key) else {
            continue;
        };
        for (name, entry) in collection_entries(key, value) {
            let Some(content) = entry_content(entry) else {
                continue;
            };
            let path = entry_path(entry)
                .map_or_else(|| format!("src/{key}/{name}.js"), str::to_string);
            push_file(&mut files, &path, Some(&name), content);
        }
    }
    files
}

/// Whether text is a payload this strategy would turn into files
pub(crate) fn is_payload(text: &str) -> bool {
    serde_json::from_str::<Value>(text.trim())
        .is_ok_and(|v| v.as_object().is_some_and(|obj| !files_from_map(obj).is_empty()))
}

/// JSON payload strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPayloadStrategy;

impl ExtractionStrategy for JsonPayloadStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::JsonPayload
    }

    fn extract(&self, text: &str) -> Option<Vec<GeneratedFile>> {
        let body = strip_fences(text);
        if !body.starts_with('{') {
            return None;
        }
        let value: Value = match serde_json::from_str(&body) {
            Ok(v) => v,
            Err(e) => {
                debug!(error = %e, "payload is not valid json");
                return None;
            }
        };
        non_empty(files_from_json(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn maps_known_keys_in_order() {
        let payload = json!({
            "routes": [{ "name": "users", "content": "module.exports = require('express').Router();" }],
            "server": "const app = require('./app');\napp.listen(3000);",
            "models": { "User": "module.exports = class User {};" },
            "ignored": "nothing"
        });
        let files = files_from_json(&payload);

        let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["src/server.js", "src/models/User.js", "src/routes/users.js"]);
        assert_eq!(files[2].name, "users");
        assert_eq!(files[2].metadata.dependencies, vec!["express".to_string()]);
    }

    #[test]
    fn explicit_paths_and_unnamed_entries() {
        let payload = json!({
            "config": { "path": "config/default.js", "code": "module.exports = { port: 3000 };" },
            "utils": [{ "content": "exports.id = (x) => x;" }]
        });
        let files = files_from_json(&payload);

        assert_eq!(files[0].path, "config/default.js");
        assert_eq!(files[1].path, "src/utils/utils1.js");
    }

    #[test]
    fn fenced_payload() {
        let text = "```json\n{\"app\": \"const express = require('express');\\nmodule.exports = express();\"}\n```";
        let files = JsonPayloadStrategy.extract(text).unwrap();
        assert_eq!(files[0].path, "src/app.js");
    }

    #[test]
    fn unusable_payloads() {
        assert!(JsonPayloadStrategy.extract("{}").is_none());
        assert!(JsonPayloadStrategy.extract("{\"title\": \"x\"}").is_none());
        assert!(JsonPayloadStrategy.extract("{ not json").is_none());
        assert!(JsonPayloadStrategy.extract("[1, 2]").is_none());
    }
}

//! JSON exploration toolkit.
//!
//! A [`JsonSpec`] holds a parsed JSON document and answers two questions
//! about it: which keys live at a path, and what value lives at a path.
//! Paths use the bracket syntax an orchestrator can write back verbatim,
//! e.g. `data["paths"]["/pets"][0]`.
//!
//! Lookup failures are reported as text rather than errors so that the
//! orchestrator can read the message and correct its path.

use std::path::Path;
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::{AdapterError, Result};
use crate::traits::{Tool, Toolkit};

/// Default cap on the rendered length of a returned value.
pub const DEFAULT_MAX_VALUE_LENGTH: usize = 200;

const LIST_KEYS_TOOL: &str = "json_spec_list_keys";
const GET_VALUE_TOOL: &str = "json_spec_get_value";

const LIST_KEYS_DESCRIPTION: &str = "Can be used to list all keys at a given path. \
    Before calling this you should be SURE that the path to this exists. \
    The input is a text representation of the path to the dict in Python syntax \
    (e.g. data[\"key1\"][0][\"key2\"]).";

const GET_VALUE_DESCRIPTION: &str = "Can be used to see value in string format at a given path. \
    Before calling this you should be SURE that the path to this exists. \
    The input is a text representation of the path to the dict in Python syntax \
    (e.g. data[\"key1\"][0][\"key2\"]).";

const LARGE_DICT_MESSAGE: &str = "Value is a large dictionary, should explore its keys directly";

static SEGMENT: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"\[.*?\]"));

// ---------------------------------------------------------------------------
// Path handling
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Split `data["a"][0]` into its bracketed segments.  Quotes are stripped;
/// all-digit segments become array indices.
fn parse_path(path: &str) -> Result<Vec<Segment>> {
    let pattern = SEGMENT
        .as_ref()
        .map_err(|e| AdapterError::Internal(format!("invalid path pattern: {e}")))?;
    Ok(pattern
        .find_iter(path)
        .map(|m| {
            let raw = m.as_str();
            let inner: String = raw[1..raw.len() - 1]
                .chars()
                .filter(|c| *c != '"' && *c != '\'')
                .collect();
            match inner.parse::<usize>() {
                Ok(index) if inner.bytes().all(|b| b.is_ascii_digit()) => Segment::Index(index),
                _ => Segment::Key(inner),
            }
        })
        .collect())
}

/// Render a value the way it is shown to the orchestrator: strings bare,
/// everything else as compact JSON.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

// ---------------------------------------------------------------------------
// JsonSpec
// ---------------------------------------------------------------------------

/// A JSON document that can be explored by path.
#[derive(Debug, Clone)]
pub struct JsonSpec {
    value: Value,
    max_value_length: usize,
}

impl JsonSpec {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            max_value_length: DEFAULT_MAX_VALUE_LENGTH,
        }
    }

    pub fn with_max_value_length(mut self, max_value_length: usize) -> Self {
        self.max_value_length = max_value_length;
        self
    }

    /// Read and parse a JSON file.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let value = serde_json::from_slice(&bytes)?;
        debug!(path = %path.display(), "loaded json spec");
        Ok(Self::new(value))
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn max_value_length(&self) -> usize {
        self.max_value_length
    }

    /// Resolve `path`; the inner `Err` is the message shown to the caller.
    fn lookup(&self, path: &str) -> Result<std::result::Result<&Value, String>> {
        let segments = parse_path(path)?;
        Ok(self.walk(&segments))
    }

    fn walk(&self, segments: &[Segment]) -> std::result::Result<&Value, String> {
        let mut current = &self.value;
        for segment in segments {
            current = match (segment, current) {
                (Segment::Key(key), Value::Object(map)) => {
                    map.get(key).ok_or_else(|| format!("KeyError('{key}')"))?
                }
                (Segment::Index(index), Value::Array(items)) => items
                    .get(*index)
                    .ok_or_else(|| "IndexError('list index out of range')".to_string())?,
                (Segment::Index(index), Value::Object(_)) => {
                    return Err(format!("KeyError({index})"));
                }
                (Segment::Key(_), Value::Array(_)) => {
                    return Err(
                        "TypeError('list indices must be integers or slices, not str')".into(),
                    );
                }
                (_, other) => {
                    return Err(format!("TypeError('{} is not subscriptable')", type_name(other)));
                }
            };
        }
        Ok(current)
    }

    /// List the keys of the object at `path`, in document order.
    pub fn keys(&self, path: &str) -> Result<String> {
        Ok(match self.lookup(path)? {
            Ok(Value::Object(map)) => {
                let quoted: Vec<String> = map.keys().map(|k| Value::from(k.as_str()).to_string()).collect();
                format!("[{}]", quoted.join(", "))
            }
            Ok(_) => format!("Value at path `{path}` is not a dict, get the value directly."),
            Err(message) => message,
        })
    }

    /// Render the value at `path`, truncated to the configured maximum.
    pub fn value_at(&self, path: &str) -> Result<String> {
        Ok(match self.lookup(path)? {
            Ok(value) => {
                let rendered = render(value);
                let length = rendered.chars().count();
                if value.is_object() && length > self.max_value_length {
                    LARGE_DICT_MESSAGE.to_string()
                } else {
                    truncate_chars(&rendered, self.max_value_length)
                }
            }
            Err(message) => message,
        })
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

// ---------------------------------------------------------------------------
// Tools
// ---------------------------------------------------------------------------

/// Lists the keys at a path of a [`JsonSpec`].
#[derive(Debug, Clone)]
pub struct JsonListKeysTool {
    spec: Arc<JsonSpec>,
}

impl JsonListKeysTool {
    pub fn new(spec: Arc<JsonSpec>) -> Self {
        Self { spec }
    }
}

#[async_trait]
impl Tool for JsonListKeysTool {
    fn name(&self) -> &str {
        LIST_KEYS_TOOL
    }

    fn description(&self) -> &str {
        LIST_KEYS_DESCRIPTION
    }

    async fn run(&self, input: &str) -> Result<String> {
        self.spec.keys(input.trim())
    }
}

/// Returns the value at a path of a [`JsonSpec`].
#[derive(Debug, Clone)]
pub struct JsonGetValueTool {
    spec: Arc<JsonSpec>,
}

impl JsonGetValueTool {
    pub fn new(spec: Arc<JsonSpec>) -> Self {
        Self { spec }
    }
}

#[async_trait]
impl Tool for JsonGetValueTool {
    fn name(&self) -> &str {
        GET_VALUE_TOOL
    }

    fn description(&self) -> &str {
        GET_VALUE_DESCRIPTION
    }

    async fn run(&self, input: &str) -> Result<String> {
        self.spec.value_at(input.trim())
    }
}

/// Both JSON tools over one shared [`JsonSpec`].
#[derive(Debug, Clone)]
pub struct JsonToolkit {
    spec: Arc<JsonSpec>,
}

impl JsonToolkit {
    pub fn new(spec: JsonSpec) -> Self {
        Self {
            spec: Arc::new(spec),
        }
    }

    pub fn spec(&self) -> &JsonSpec {
        &self.spec
    }
}

impl Toolkit for JsonToolkit {
    fn get_tools(&self) -> Vec<Arc<dyn Tool>> {
        vec![
            Arc::new(JsonListKeysTool::new(Arc::clone(&self.spec))),
            Arc::new(JsonGetValueTool::new(Arc::clone(&self.spec))),
        ]
    }
}

impl TryFrom<&str> for JsonSpec {
    type Error = AdapterError;

    fn try_from(text: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(text)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> JsonSpec {
        JsonSpec::new(json!({
            "info": {"title": "Pets", "version": "1.0"},
            "paths": ["/pets", "/owners"],
            "count": 2
        }))
    }

    #[test]
    fn parses_quoted_keys_and_indices() {
        assert_eq!(
            parse_path(r#"data["paths"][0]['x']"#).unwrap(),
            vec![
                Segment::Key("paths".into()),
                Segment::Index(0),
                Segment::Key("x".into()),
            ]
        );
        assert!(parse_path("data").unwrap().is_empty());
    }

    #[test]
    fn keys_of_root_and_nested_object() {
        let spec = sample();
        assert_eq!(spec.keys("data").unwrap(), r#"["info", "paths", "count"]"#);
        assert_eq!(spec.keys(r#"data["info"]"#).unwrap(), r#"["title", "version"]"#);
    }

    #[test]
    fn keys_follow_document_order() {
        let spec = JsonSpec::try_from(r#"{"openapi":"3","info":{},"paths":{}}"#).unwrap();
        assert_eq!(spec.keys("data").unwrap(), r#"["openapi", "info", "paths"]"#);
    }

    #[test]
    fn keys_of_non_object_explains() {
        let spec = sample();
        assert_eq!(
            spec.keys(r#"data["paths"]"#).unwrap(),
            r#"Value at path `data["paths"]` is not a dict, get the value directly."#
        );
    }

    #[test]
    fn missing_key_is_reported_as_text() {
        let spec = sample();
        assert_eq!(spec.keys(r#"data["nope"]"#).unwrap(), "KeyError('nope')");
        assert!(spec.value_at(r#"data["paths"][9]"#).unwrap().starts_with("IndexError"));
    }

    #[test]
    fn value_renders_strings_bare() {
        let spec = sample();
        assert_eq!(spec.value_at(r#"data["paths"][1]"#).unwrap(), "/owners");
        assert_eq!(spec.value_at(r#"data["count"]"#).unwrap(), "2");
    }

    #[test]
    fn long_values_are_truncated() {
        let spec = JsonSpec::new(json!({"text": "abcdefghij"})).with_max_value_length(4);
        assert_eq!(spec.value_at(r#"data["text"]"#).unwrap(), "abcd...");
    }

    #[test]
    fn large_objects_point_at_keys() {
        let spec = sample().with_max_value_length(10);
        assert_eq!(spec.value_at(r#"data["info"]"#).unwrap(), LARGE_DICT_MESSAGE);
    }

    #[tokio::test]
    async fn tools_delegate_to_spec() {
        let toolkit = JsonToolkit::new(sample());
        let tools = toolkit.get_tools();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].name(), LIST_KEYS_TOOL);
        assert_eq!(tools[1].name(), GET_VALUE_TOOL);
        assert_eq!(
            tools[0].run(" data[\"info\"] ").await.unwrap(),
            r#"["title", "version"]"#
        );
        assert_eq!(tools[1].run(r#"data["info"]["title"]"#).await.unwrap(), "Pets");
    }
}

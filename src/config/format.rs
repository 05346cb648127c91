// Config file formats.
// Detects JSON/YAML from the file extension and keeps each file in its native value model.

use std::path::Path;

use serde_json::{Map as JsonMap, Number as JsonNumber, Value};
use serde_yaml::{Mapping, Value as YamlValue};

use crate::error::{PcliError, Result};

/// Serialization format of a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Detect the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "json" => Ok(ConfigFormat::Json),
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            _ => Err(PcliError::UnsupportedFormat(if ext.is_empty() {
                path.display().to_string()
            } else {
                format!(".{}", ext)
            })),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            ConfigFormat::Yaml => "yaml",
        }
    }

    /// Decode file contents into a document.
    ///
    /// Blank input is an empty document. The top level must be a mapping.
    pub fn decode(&self, path: &Path, contents: &str) -> Result<Document> {
        if contents.trim().is_empty() {
            return Ok(Document::empty(*self));
        }

        let parse_error = |message: String| PcliError::ConfigParse {
            path: path.to_path_buf(),
            message,
        };
        let not_a_mapping = |kind: &str| {
            parse_error(format!(
                "expected a mapping at the top level, found {}",
                kind
            ))
        };

        match self {
            ConfigFormat::Json => {
                let value: Value =
                    serde_json::from_str(contents).map_err(|e| parse_error(e.to_string()))?;
                match value {
                    Value::Object(map) => Ok(Document::Json(map)),
                    Value::Null => Ok(Document::empty(*self)),
                    other => Err(not_a_mapping(value_kind(&other))),
                }
            }
            ConfigFormat::Yaml => {
                let value: YamlValue =
                    serde_yaml::from_str(contents).map_err(|e| parse_error(e.to_string()))?;
                match value {
                    YamlValue::Mapping(map) => Ok(Document::Yaml(map)),
                    YamlValue::Null => Ok(Document::empty(*self)),
                    other => Err(not_a_mapping(value_kind(&yaml_to_json(&other)))),
                }
            }
        }
    }
}

/// A config document: an open mapping of top-level keys to arbitrary values.
///
/// Each format keeps its own value model so a load/save cycle does not touch
/// values pcli never looked at: JSON numbers keep their exact digits, YAML keeps
/// `.inf`/`.nan`, tags, and non-string keys. Reads hand out a JSON view.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Json(JsonMap<String, Value>),
    Yaml(Mapping),
}

impl Document {
    pub fn empty(format: ConfigFormat) -> Self {
        match format {
            ConfigFormat::Json => Document::Json(JsonMap::new()),
            ConfigFormat::Yaml => Document::Yaml(Mapping::new()),
        }
    }

    pub fn format(&self) -> ConfigFormat {
        match self {
            Document::Json(_) => ConfigFormat::Json,
            Document::Yaml(_) => ConfigFormat::Yaml,
        }
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        match self {
            Document::Json(map) => map.len(),
            Document::Yaml(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read a dotted key path such as `cache.log_groups`.
    ///
    /// YAML keys match by their scalar text, so `ports.8080` finds an integer key.
    pub fn get(&self, path: &str) -> Option<Value> {
        match self {
            Document::Json(map) => json_get(map, path).cloned(),
            Document::Yaml(map) => yaml_get(map, path).map(yaml_to_json),
        }
    }

    /// Set a value at a dotted key path, creating intermediate mappings.
    ///
    /// Any non-mapping value found along the way is replaced by a mapping.
    pub fn set(&mut self, path: &str, value: Value) {
        match self {
            Document::Json(map) => json_set(map, path, value),
            Document::Yaml(map) => yaml_set(map, path, json_to_yaml(&value)),
        }
    }

    /// Remove a value at a dotted key path, returning it.
    pub fn remove(&mut self, path: &str) -> Option<Value> {
        match self {
            Document::Json(map) => json_remove(map, path),
            Document::Yaml(map) => yaml_remove(map, path).map(|value| yaml_to_json(&value)),
        }
    }

    /// Remove a single top-level key, dots included. Returns whether it existed.
    pub fn remove_key(&mut self, key: &str) -> bool {
        match self {
            Document::Json(map) => map.shift_remove(key).is_some(),
            Document::Yaml(map) => match find_yaml_key(map, key) {
                Some(found) => map.shift_remove(&found).is_some(),
                None => false,
            },
        }
    }

    /// The whole document as a JSON mapping.
    pub fn to_json(&self) -> Value {
        match self {
            Document::Json(map) => Value::Object(map.clone()),
            Document::Yaml(map) => yaml_to_json(&YamlValue::Mapping(map.clone())),
        }
    }

    /// Encode the document in its own format.
    pub fn encode(&self) -> Result<String> {
        match self {
            Document::Json(map) => {
                let mut json =
                    serde_json::to_string_pretty(map).map_err(|e| PcliError::ConfigIo(e.into()))?;
                json.push('\n');
                Ok(json)
            }
            Document::Yaml(map) => serde_yaml::to_string(map)
                .map_err(|e| PcliError::ConfigIo(std::io::Error::other(e))),
        }
    }
}

/// Human-readable kind name of a value.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

fn split_path(path: &str) -> (Vec<&str>, &str) {
    match path.rsplit_once('.') {
        Some((parents, last)) => (parents.split('.').collect(), last),
        None => (Vec::new(), path),
    }
}

fn json_get<'a>(map: &'a JsonMap<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = map.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn json_set(map: &mut JsonMap<String, Value>, path: &str, value: Value) {
    let (parents, last) = split_path(path);
    let mut current = map;
    for segment in parents {
        let entry = current
            .entry(segment)
            .or_insert_with(|| Value::Object(JsonMap::new()));
        if !entry.is_object() {
            *entry = Value::Object(JsonMap::new());
        }
        let Value::Object(next) = entry else {
            return;
        };
        current = next;
    }
    current.insert(last.to_string(), value);
}

fn json_remove(map: &mut JsonMap<String, Value>, path: &str) -> Option<Value> {
    let (parents, last) = split_path(path);
    let mut current = map;
    for segment in parents {
        current = current.get_mut(segment)?.as_object_mut()?;
    }
    current.shift_remove(last)
}

/// Text of a scalar YAML key as it appears in a dotted path.
fn yaml_key_text(key: &YamlValue) -> Option<String> {
    match key {
        YamlValue::String(text) => Some(text.clone()),
        YamlValue::Number(number) => Some(number.to_string()),
        YamlValue::Bool(flag) => Some(flag.to_string()),
        YamlValue::Null => Some("null".to_string()),
        _ => None,
    }
}

fn find_yaml_key(map: &Mapping, segment: &str) -> Option<YamlValue> {
    map.keys()
        .find(|key| yaml_key_text(key).as_deref() == Some(segment))
        .cloned()
}

fn yaml_child<'a>(map: &'a Mapping, segment: &str) -> Option<&'a YamlValue> {
    map.iter()
        .find(|(key, _)| yaml_key_text(key).as_deref() == Some(segment))
        .map(|(_, value)| value)
}

fn yaml_get<'a>(map: &'a Mapping, path: &str) -> Option<&'a YamlValue> {
    let (parents, last) = split_path(path);
    let mut current = map;
    for segment in parents {
        current = yaml_child(current, segment)?.as_mapping()?;
    }
    yaml_child(current, last)
}

fn yaml_set(map: &mut Mapping, path: &str, value: YamlValue) {
    let (parents, last) = split_path(path);
    let key_for = |map: &Mapping, segment: &str| {
        find_yaml_key(map, segment).unwrap_or_else(|| YamlValue::String(segment.to_string()))
    };

    let mut current = map;
    for segment in parents {
        let key = key_for(current, segment);
        let entry = current
            .entry(key)
            .or_insert_with(|| YamlValue::Mapping(Mapping::new()));
        if !entry.is_mapping() {
            *entry = YamlValue::Mapping(Mapping::new());
        }
        let YamlValue::Mapping(next) = entry else {
            return;
        };
        current = next;
    }
    let key = key_for(current, last);
    current.insert(key, value);
}

fn yaml_remove(map: &mut Mapping, path: &str) -> Option<YamlValue> {
    let (parents, last) = split_path(path);
    let mut current = map;
    for segment in parents {
        let key = find_yaml_key(current, segment)?;
        current = current.get_mut(&key)?.as_mapping_mut()?;
    }
    let key = find_yaml_key(current, last)?;
    current.shift_remove(&key)
}

/// JSON view of a YAML value. Tags are dropped, keys become their scalar text,
/// and non-finite floats become their YAML spelling (`.inf`, `.nan`).
fn yaml_to_json(value: &YamlValue) -> Value {
    match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(flag) => Value::Bool(*flag),
        YamlValue::Number(number) => {
            if let Some(int) = number.as_i64() {
                Value::from(int)
            } else if let Some(int) = number.as_u64() {
                Value::from(int)
            } else {
                number
                    .as_f64()
                    .and_then(JsonNumber::from_f64)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::String(number.to_string()))
            }
        }
        YamlValue::String(text) => Value::String(text.clone()),
        YamlValue::Sequence(items) => Value::Array(items.iter().map(yaml_to_json).collect()),
        YamlValue::Mapping(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    let key = yaml_key_text(key).unwrap_or_else(|| {
                        serde_yaml::to_string(key)
                            .map(|text| text.trim_end().to_string())
                            .unwrap_or_default()
                    });
                    (key, yaml_to_json(value))
                })
                .collect(),
        ),
        YamlValue::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

fn json_to_yaml(value: &Value) -> YamlValue {
    match value {
        Value::Null => YamlValue::Null,
        Value::Bool(flag) => YamlValue::Bool(*flag),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                YamlValue::Number(int.into())
            } else if let Some(int) = number.as_u64() {
                YamlValue::Number(int.into())
            } else {
                number
                    .as_f64()
                    .map(|float| YamlValue::Number(float.into()))
                    .unwrap_or_else(|| YamlValue::String(number.to_string()))
            }
        }
        Value::String(text) => YamlValue::String(text.clone()),
        Value::Array(items) => YamlValue::Sequence(items.iter().map(json_to_yaml).collect()),
        Value::Object(map) => YamlValue::Mapping(
            map.iter()
                .map(|(key, value)| (YamlValue::String(key.clone()), json_to_yaml(value)))
                .collect(),
        ),
    }
}

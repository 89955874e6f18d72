// ── Parameter-tree projection ──
//
// The data model is a nested tree whose leaves carry `_value` / `_writable` /
// `_type` bookkeeping fields. Interior nodes are marked `_object: true`.
// This module flattens the tree into display rows and resolves individual
// leaves into field values with the not-configured / not-supported
// distinction the parameter browser and WiFi views rely on.

use serde_json::Value;

/// One flattened parameter-browser row.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ParameterRow {
    /// Dotted path from the tree root, e.g. `Device.DeviceInfo.UpTime`.
    pub name: String,
    pub value: String,
    pub writable: bool,
    /// The reported xsd type; defaults to `xsd:string` when unreported.
    pub kind: String,
}

/// Resolution of a single parameter leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A non-empty reported value.
    Present(String),
    /// Writable leaf the device has not reported a value for yet.
    NotConfigured,
    /// Read-only leaf with no value; the device does not support it.
    NotSupported,
    /// The leaf is absent (or an interior node).
    Missing,
}

impl FieldValue {
    /// Render the resolution, falling back to `default` when the leaf is
    /// missing entirely.
    pub fn display_or(&self, default: &str) -> String {
        match self {
            Self::Present(value) => value.clone(),
            Self::NotConfigured => "Not configured".into(),
            Self::NotSupported => "Not supported".into(),
            Self::Missing => default.to_owned(),
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }
}

/// Resolve a parameter leaf node.
///
/// Resolution order: a non-empty `_value` wins; otherwise a writable leaf is
/// "not configured" and a read-only one "not supported"; anything else
/// (absent node, interior node, no writability info) is `Missing`.
pub fn resolve_field(node: Option<&Value>) -> FieldValue {
    let Some(obj) = node.and_then(Value::as_object) else {
        return FieldValue::Missing;
    };

    if let Some(value) = obj.get("_value") {
        if !value_is_empty(value) {
            return FieldValue::Present(display_value(value));
        }
    }

    // Interior nodes never resolve to a field value.
    if obj.get("_object").and_then(Value::as_bool) == Some(true) {
        return FieldValue::Missing;
    }

    match obj.get("_writable").and_then(Value::as_bool) {
        Some(true) => FieldValue::NotConfigured,
        Some(false) => FieldValue::NotSupported,
        None => FieldValue::Missing,
    }
}

/// Resolve a boolean-valued leaf.
///
/// A reported value is interpreted as a boolean; a writable leaf with no
/// value counts as `true` (configurable and typically enabled); everything
/// else falls back to `default`.
pub fn resolve_bool(node: Option<&Value>, default: bool) -> bool {
    let Some(obj) = node.and_then(Value::as_object) else {
        return default;
    };

    if let Some(value) = obj.get("_value") {
        if !value.is_null() {
            return value_as_bool(value);
        }
    }

    if obj.get("_object").and_then(Value::as_bool) != Some(true)
        && obj.get("_writable").and_then(Value::as_bool) == Some(true)
    {
        return true;
    }

    default
}

/// Walk a dotted parameter path through a tree.
pub fn lookup<'a>(tree: &'a serde_json::Map<String, Value>, dotted_path: &str) -> Option<&'a Value> {
    let mut segments = dotted_path.split('.');
    let mut current: &Value = tree.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Flatten a parameter tree into ordered rows.
///
/// Walks every non-underscore key depth-first; a node counts as a leaf when
/// it carries a `_value` or is explicitly marked `_object: false`.
pub fn flatten_parameters(tree: &serde_json::Map<String, Value>) -> Vec<ParameterRow> {
    let mut rows = Vec::new();
    for (key, value) in tree {
        if key.starts_with('_') {
            continue;
        }
        flatten_node(key, value, &mut rows);
    }
    rows
}

fn flatten_node(path: &str, node: &Value, rows: &mut Vec<ParameterRow>) {
    let Some(obj) = node.as_object() else {
        return;
    };

    let is_leaf =
        obj.contains_key("_value") || obj.get("_object").and_then(Value::as_bool) == Some(false);

    if is_leaf {
        rows.push(ParameterRow {
            name: path.to_owned(),
            value: obj.get("_value").map(display_value).unwrap_or_default(),
            writable: obj.get("_writable").and_then(Value::as_bool).unwrap_or(false),
            kind: obj
                .get("_type")
                .and_then(Value::as_str)
                .unwrap_or("xsd:string")
                .to_owned(),
        });
        return;
    }

    for (key, child) in obj {
        if key.starts_with('_') {
            continue;
        }
        flatten_node(&format!("{path}.{key}"), child, rows);
    }
}

// ── Value helpers ────────────────────────────────────────────────────

/// Render a raw JSON value for display, without JSON string quoting.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn value_is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn value_as_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.as_str(), "true" | "1"),
        Value::Number(n) => n.as_i64().is_some_and(|v| v != 0),
        _ => false,
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamType,
    pub description: String,
    pub required: bool,
}

/// Static description of a callable capability offered to a generation tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParamSpec>,
}

impl ToolSpec {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters: Vec::new(),
        }
    }

    pub fn param(mut self, name: &str, kind: ParamType, description: &str, required: bool) -> Self {
        self.parameters.push(ParamSpec {
            name: name.to_string(),
            kind,
            description: description.to_string(),
            required,
        });
        self
    }

    /// JSON-schema object in the shape function-calling APIs expect.
    pub fn json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| {
                let mut prop = json!({ "type": p.kind });
                if !p.description.is_empty() {
                    prop["description"] = Value::String(p.description.clone());
                }
                (p.name.clone(), prop)
            })
            .collect();

        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Required keys absent from `args`. Value types are never checked.
    pub fn missing_required(&self, args: &ToolArgs) -> Vec<String> {
        self.parameters
            .iter()
            .filter(|p| p.required && !args.has(&p.name))
            .map(|p| p.name.clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ToolCall {
    /// Non-object argument payloads are treated as empty.
    pub fn new(name: &str, arguments: Value) -> Self {
        let arguments = match arguments {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            name: name.to_string(),
            arguments,
        }
    }

    pub fn args(&self) -> ToolArgs {
        ToolArgs(self.arguments.clone())
    }
}

/// Permissive view over loosely-typed tool arguments.
///
/// Reads never fail: a missing key or a value of the wrong type falls back to the
/// caller's default, and numeric strings are coerced to numbers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArgs(Map<String, Value>);

impl ToolArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn has(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(|v| !v.is_null())
    }

    pub fn opt_str(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn str_or(&self, key: &str, default: &str) -> String {
        self.opt_str(key).unwrap_or_else(|| default.to_string())
    }

    pub fn f64_or(&self, key: &str, default: f64) -> f64 {
        let parsed = match self.0.get(key) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.filter(|v| v.is_finite()).unwrap_or(default)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_spec() -> ToolSpec {
        ToolSpec::new("lookup_contact", "Look up a contact by name")
            .param("name", ParamType::String, "Name of the contact", true)
            .param("company", ParamType::String, "", false)
    }

    #[test]
    fn test_json_schema_lists_required_params() {
        let schema = lookup_spec().json_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["name"]["type"], "string");
        assert_eq!(schema["required"], json!(["name"]));
        assert!(schema["properties"]["company"].get("description").is_none());
    }

    #[test]
    fn test_missing_required_checks_presence_only() {
        let spec = lookup_spec();
        assert_eq!(spec.missing_required(&ToolArgs::new()), vec!["name".to_string()]);
        assert_eq!(spec.missing_required(&ToolArgs::new().with("name", Value::Null)), vec!["name"]);
        // Wrong type still counts as present.
        assert!(spec.missing_required(&ToolArgs::new().with("name", 42)).is_empty());
    }

    #[test]
    fn test_f64_or_coerces_strings_and_defaults() {
        let args = ToolArgs::from_value(json!({
            "a": 0.75,
            "b": " 0.5 ",
            "c": "high",
            "d": [1, 2],
        }));
        assert_eq!(args.f64_or("a", 0.0), 0.75);
        assert_eq!(args.f64_or("b", 0.0), 0.5);
        assert_eq!(args.f64_or("c", 0.0), 0.0);
        assert_eq!(args.f64_or("d", 0.1), 0.1);
        assert_eq!(args.f64_or("missing", 0.2), 0.2);
    }

    #[test]
    fn test_str_or_ignores_blank_and_structured_values() {
        let args = ToolArgs::from_value(json!({"topic": "  ", "n": 3, "obj": {"x": 1}}));
        assert_eq!(args.str_or("topic", "our conversation"), "our conversation");
        assert_eq!(args.str_or("n", ""), "3");
        assert_eq!(args.str_or("obj", "fallback"), "fallback");
    }

    #[test]
    fn test_tool_call_non_object_arguments_are_empty() {
        let call = ToolCall::new("draft_followup", json!("not an object"));
        assert!(call.arguments.is_empty());
    }
}

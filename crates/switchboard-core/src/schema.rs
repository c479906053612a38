//! Tool parameter schema and the provider-facing tool declaration

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::message::CallType;

/// JSON type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    /// JSON string
    String,
    /// Any JSON number
    Number,
    /// Integral JSON number
    Integer,
    /// JSON boolean
    Boolean,
    /// JSON array
    Array,
    /// JSON object
    Object,
    /// JSON null
    Null,
}

impl ParameterType {
    /// Lowercase schema name of the type
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Null => "null",
        }
    }

    /// Whether a JSON value conforms to this type
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
            Self::Null => value.is_null(),
        }
    }
}

/// Name of the JSON kind of a value, for error messages
pub const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

const fn default_required() -> bool {
    true
}

/// One declared parameter of a tool
///
/// Parameters are required unless `required` is explicitly `false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name, unique within its tool
    pub name: String,
    /// Expected JSON type
    #[serde(rename = "type")]
    pub parameter_type: ParameterType,
    /// Human-readable description shown to the model
    pub description: String,
    /// Whether the caller must supply this parameter
    #[serde(default = "default_required")]
    pub required: bool,
    /// Allowed values, if restricted
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<Value>>,
    /// Value the tool applies when the parameter is omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ToolParameter {
    /// Declare a required parameter
    pub fn new(name: impl Into<String>, parameter_type: ParameterType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameter_type,
            description: description.into(),
            required: true,
            allowed: None,
            default: None,
        }
    }

    /// Mark the parameter optional
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Restrict the parameter to a fixed set of values
    #[must_use]
    pub fn with_enum<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Attach the default the tool applies when omitted
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Provider-facing declaration of a callable tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Always `function`
    #[serde(rename = "type", default)]
    pub tool_type: CallType,
    /// Function specification
    pub function: FunctionSchema,
}

/// Function specification within a tool declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSchema {
    /// Tool name
    pub name: String,
    /// What the tool does
    pub description: String,
    /// Object schema of the arguments, absent for zero-argument tools
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ParametersSchema>,
}

/// Object schema describing a tool's keyword arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParametersSchema {
    /// Always `object`
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Properties in declared order
    pub properties: IndexMap<String, PropertySchema>,
    /// Names of required properties
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

/// Schema of a single property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    /// JSON type
    #[serde(rename = "type")]
    pub property_type: ParameterType,
    /// Description
    pub description: String,
    /// Allowed values
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<Value>>,
}

impl ToolSchema {
    /// Build the declaration for a tool from its parameter list
    pub fn from_parameters(name: &str, description: &str, parameters: &[ToolParameter]) -> Self {
        let parameters = (!parameters.is_empty()).then(|| ParametersSchema {
            schema_type: "object".to_owned(),
            properties: parameters
                .iter()
                .map(|p| {
                    (
                        p.name.clone(),
                        PropertySchema {
                            property_type: p.parameter_type,
                            description: p.description.clone(),
                            allowed: p.allowed.clone(),
                        },
                    )
                })
                .collect(),
            required: parameters
                .iter()
                .filter(|p| p.required)
                .map(|p| p.name.clone())
                .collect(),
        });

        Self {
            tool_type: CallType::Function,
            function: FunctionSchema {
                name: name.to_owned(),
                description: description.to_owned(),
                parameters,
            },
        }
    }
}

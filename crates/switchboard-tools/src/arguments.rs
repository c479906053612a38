//! Reordering of keyword arguments into positional calls
//!
//! Providers do not guarantee that serialized argument objects follow the
//! declared parameter order, so the order is always re-derived from the tool's
//! parameter list.

use anyhow::Context as _;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use switchboard_core::ToolParameter;
use switchboard_core::schema::value_kind;

use crate::error::ToolError;

/// One positional slot
#[derive(Debug, Clone, PartialEq)]
struct Slot {
    name: String,
    value: Option<Value>,
    default: Option<Value>,
}

/// Arguments in declared parameter order
///
/// A slot is `None` when an optional parameter was omitted; applying the
/// declared default is up to the tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionalArgs {
    slots: Vec<Slot>,
}

impl PositionalArgs {
    /// Number of declared parameters
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the tool declares no parameters
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Value at `index`, `None` if omitted or out of range
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.slots.get(index).and_then(|s| s.value.as_ref())
    }

    /// All slots in order
    pub fn values(&self) -> impl Iterator<Item = Option<&Value>> {
        self.slots.iter().map(|s| s.value.as_ref())
    }

    /// Consume into the raw positional values
    pub fn into_values(self) -> Vec<Option<Value>> {
        self.slots.into_iter().map(|s| s.value).collect()
    }

    /// Decode a value the tool cannot do without
    pub fn required<T: DeserializeOwned>(&self, index: usize) -> anyhow::Result<T> {
        let slot = self
            .slots
            .get(index)
            .ok_or_else(|| anyhow::anyhow!("no parameter at position {index}"))?;
        let value = slot
            .value
            .clone()
            .ok_or_else(|| anyhow::anyhow!("parameter \"{}\" was not supplied", slot.name))?;

        serde_json::from_value(value).with_context(|| format!("failed to decode parameter \"{}\"", slot.name))
    }

    /// Decode an optional value, treating `null` as absent
    pub fn optional<T: DeserializeOwned>(&self, index: usize) -> anyhow::Result<Option<T>> {
        let Some(slot) = self.slots.get(index) else {
            return Ok(None);
        };

        match &slot.value {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .with_context(|| format!("failed to decode parameter \"{}\"", slot.name)),
        }
    }

    /// Decode an optional value, falling back to the declared default
    pub fn optional_or_default<T: DeserializeOwned>(&self, index: usize) -> anyhow::Result<Option<T>> {
        if let Some(value) = self.optional(index)? {
            return Ok(Some(value));
        }

        let Some(default) = self.slots.get(index).and_then(|s| s.default.clone()) else {
            return Ok(None);
        };

        serde_json::from_value(default)
            .map(Some)
            .with_context(|| format!("failed to decode default for parameter at position {index}"))
    }
}

/// Reorder keyword arguments into positional slots following `parameters`
///
/// Fails on the first required parameter that is missing and on values that
/// do not match their declared type or allowed set. Keys that are not
/// declared are ignored.
pub fn reorder_arguments(
    tool: &str,
    parameters: &[ToolParameter],
    mut args: Map<String, Value>,
) -> Result<PositionalArgs, ToolError> {
    let slots = parameters
        .iter()
        .map(|parameter| {
            let value = args.remove(&parameter.name);

            match &value {
                None if parameter.required => {
                    return Err(ToolError::MissingArgument {
                        tool: tool.to_owned(),
                        parameter: parameter.name.clone(),
                    });
                }
                Some(value) => validate(tool, parameter, value)?,
                None => {}
            }

            Ok(Slot {
                name: parameter.name.clone(),
                value,
                default: parameter.default.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PositionalArgs { slots })
}

/// Check a supplied value against its parameter declaration
fn validate(tool: &str, parameter: &ToolParameter, value: &Value) -> Result<(), ToolError> {
    let invalid = |reason: String| ToolError::InvalidArgument {
        tool: tool.to_owned(),
        parameter: parameter.name.clone(),
        reason,
    };

    // Explicit null stands in for "not supplied" on optional parameters only;
    // a required parameter given null fails the type check below
    if value.is_null() && !parameter.required {
        return Ok(());
    }

    if !parameter.parameter_type.accepts(value) {
        return Err(invalid(format!(
            "expected {}, got {}",
            parameter.parameter_type.as_str(),
            value_kind(value)
        )));
    }

    if let Some(allowed) = &parameter.allowed
        && !allowed.contains(value)
    {
        return Err(invalid(format!("{value} is not one of the allowed values")));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use switchboard_core::ParameterType;

    use super::*;

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn params() -> Vec<ToolParameter> {
        vec![
            ToolParameter::new("city", ParameterType::String, "city name"),
            ToolParameter::new("days", ParameterType::Integer, "forecast length"),
            ToolParameter::new("unit", ParameterType::String, "unit")
                .optional()
                .with_enum(["c", "f"])
                .with_default("c"),
        ]
    }

    #[test]
    fn follows_declared_order_not_key_order() {
        let positional = reorder_arguments(
            "forecast",
            &params(),
            args(json!({"unit": "f", "days": 3, "city": "Oslo"})),
        )
        .unwrap();

        assert_eq!(
            positional.into_values(),
            vec![Some(json!("Oslo")), Some(json!(3)), Some(json!("f"))]
        );
    }

    #[test]
    fn omitted_optional_is_none() {
        let positional =
            reorder_arguments("forecast", &params(), args(json!({"city": "Oslo", "days": 3}))).unwrap();

        assert_eq!(positional.len(), 3);
        assert_eq!(positional.get(2), None);
        assert_eq!(positional.optional::<String>(2).unwrap(), None);
        assert_eq!(positional.optional_or_default::<String>(2).unwrap(), Some("c".to_owned()));
    }

    #[test]
    fn missing_required_names_the_parameter() {
        let err = reorder_arguments("forecast", &params(), args(json!({"city": "Oslo"}))).unwrap_err();

        match err {
            ToolError::MissingArgument { tool, parameter } => {
                assert_eq!(tool, "forecast");
                assert_eq!(parameter, "days");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn null_for_required_is_a_type_mismatch() {
        let err = reorder_arguments("forecast", &params(), args(json!({"city": null, "days": 2}))).unwrap_err();

        assert!(matches!(err, ToolError::InvalidArgument { ref parameter, .. } if parameter == "city"));
        assert!(err.to_string().contains("expected string, got null"));
    }

    #[test]
    fn extra_keys_are_ignored() {
        let positional = reorder_arguments(
            "forecast",
            &params(),
            args(json!({"city": "Oslo", "days": 1, "verbose": true})),
        )
        .unwrap();

        assert_eq!(positional.len(), 3);
    }

    #[test]
    fn wrong_type_is_invalid() {
        let err = reorder_arguments("forecast", &params(), args(json!({"city": "Oslo", "days": "three"})))
            .unwrap_err();

        assert!(matches!(err, ToolError::InvalidArgument { ref parameter, .. } if parameter == "days"));
        assert!(err.to_string().contains("expected integer, got string"));
    }

    #[test]
    fn value_outside_enum_is_invalid() {
        let err = reorder_arguments(
            "forecast",
            &params(),
            args(json!({"city": "Oslo", "days": 1, "unit": "k"})),
        )
        .unwrap_err();

        assert!(matches!(err, ToolError::InvalidArgument { ref parameter, .. } if parameter == "unit"));
    }

    #[test]
    fn null_is_accepted_for_optional_parameters() {
        let positional = reorder_arguments(
            "forecast",
            &params(),
            args(json!({"city": "Oslo", "days": 1, "unit": null})),
        )
        .unwrap();

        assert_eq!(positional.get(2), Some(&Value::Null));
        assert_eq!(positional.optional::<String>(2).unwrap(), None);
    }

    #[test]
    fn required_decodes_typed_values() {
        let positional =
            reorder_arguments("forecast", &params(), args(json!({"city": "Oslo", "days": 5}))).unwrap();

        assert_eq!(positional.required::<String>(0).unwrap(), "Oslo");
        assert_eq!(positional.required::<u32>(1).unwrap(), 5);
        assert!(positional.required::<String>(2).is_err());
    }
}

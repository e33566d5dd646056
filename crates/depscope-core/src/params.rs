//! Typed extraction of tool arguments.
//!
//! A JSON `null` is treated the same as an absent argument.

use serde_json::Value;
use thiserror::Error;

use crate::tool::CallToolRequest;

/// Argument could not be extracted. Rendered into a structured error result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("missing required parameter: {name}")]
    Missing { name: String },

    #[error("parameter {name} is not of type {expected}")]
    WrongType { name: String, expected: &'static str },
}

/// A Rust type that a JSON argument can be extracted into.
pub trait ParamValue: Sized + Default {
    /// JSON Schema type name, used in schemas and error messages.
    const TYPE_NAME: &'static str;

    fn from_json(value: &Value) -> Option<Self>;

    /// Whether this is the type's zero value, which required parameters reject.
    fn is_zero(&self) -> bool;
}

impl ParamValue for String {
    const TYPE_NAME: &'static str = "string";

    fn from_json(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

fn present<'a>(request: &'a CallToolRequest, name: &str) -> Option<&'a Value> {
    request.argument(name).filter(|v| !v.is_null())
}

/// Extract a required argument.
///
/// Fails with [`ParamError::Missing`] when the argument is absent or holds
/// the type's zero value (e.g. an empty string), and with
/// [`ParamError::WrongType`] when it has a different JSON type.
pub fn required_param<T: ParamValue>(
    request: &CallToolRequest,
    name: &str,
) -> Result<T, ParamError> {
    let missing = || ParamError::Missing {
        name: name.to_string(),
    };

    let value = present(request, name).ok_or_else(missing)?;
    let parsed = T::from_json(value).ok_or_else(|| ParamError::WrongType {
        name: name.to_string(),
        expected: T::TYPE_NAME,
    })?;

    if parsed.is_zero() {
        return Err(missing());
    }
    Ok(parsed)
}

/// Extract an optional argument, yielding the type's default when absent.
pub fn optional_param<T: ParamValue>(
    request: &CallToolRequest,
    name: &str,
) -> Result<T, ParamError> {
    match present(request, name) {
        None => Ok(T::default()),
        Some(value) => T::from_json(value).ok_or_else(|| ParamError::WrongType {
            name: name.to_string(),
            expected: T::TYPE_NAME,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> CallToolRequest {
        CallToolRequest::new("test")
            .with_argument("owner", "octo")
            .with_argument("empty", "")
            .with_argument("count", 3)
            .with_argument("nothing", Value::Null)
    }

    #[test]
    fn test_required_string() {
        let owner: String = required_param(&request(), "owner").unwrap();
        assert_eq!(owner, "octo");
    }

    #[test]
    fn test_required_absent() {
        let err = required_param::<String>(&request(), "repo").unwrap_err();
        assert_eq!(err.to_string(), "missing required parameter: repo");
    }

    #[test]
    fn test_required_empty_string_is_missing() {
        let err = required_param::<String>(&request(), "empty").unwrap_err();
        assert_eq!(
            err,
            ParamError::Missing {
                name: "empty".to_string()
            }
        );
    }

    #[test]
    fn test_required_null_is_missing() {
        let err = required_param::<String>(&request(), "nothing").unwrap_err();
        assert!(matches!(err, ParamError::Missing { .. }));
    }

    #[test]
    fn test_required_wrong_type() {
        let err = required_param::<String>(&request(), "count").unwrap_err();
        assert_eq!(err.to_string(), "parameter count is not of type string");
    }

    #[test]
    fn test_optional_absent_defaults() {
        let name: String = optional_param(&request(), "name").unwrap();
        assert!(name.is_empty());
        let name: String = optional_param(&request(), "nothing").unwrap();
        assert!(name.is_empty());
    }

    #[test]
    fn test_optional_present_empty_is_accepted() {
        let name: String = optional_param(&request(), "empty").unwrap();
        assert_eq!(name, "");
    }

    #[test]
    fn test_optional_wrong_type() {
        let request = CallToolRequest::new("test").with_argument("name", json!(["a"]));
        let err = optional_param::<String>(&request, "name").unwrap_err();
        assert_eq!(
            err,
            ParamError::WrongType {
                name: "name".to_string(),
                expected: "string"
            }
        );
    }
}

//! LLM sampling parameters and their bound checks

use serde::Serialize;
use serde_json::Value;

use super::error::{FieldError, FieldErrors};
use super::path::FieldPath;
use super::reader::{checked, Fields};

pub const MIN_TEMPERATURE: f64 = 0.0;
pub const MAX_TEMPERATURE: f64 = 2.0;
pub const DEFAULT_TEMPERATURE: f64 = 0.5;
pub const MIN_MAX_TOKENS: i64 = 1;

/// Validate a temperature value (inclusive range, never clamped)
pub fn validate_temperature(value: f64, path: &FieldPath) -> Result<f64, FieldError> {
    if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&value) {
        return Err(FieldError::constraint(
            path,
            Value::from(value),
            format!(
                "temperature must be between {} and {}",
                MIN_TEMPERATURE, MAX_TEMPERATURE
            ),
        ));
    }

    Ok(value)
}

/// Validate a max_tokens value
pub fn validate_max_tokens(value: i64, path: &FieldPath) -> Result<u32, FieldError> {
    if value < MIN_MAX_TOKENS {
        return Err(FieldError::constraint(
            path,
            Value::from(value),
            format!("max_tokens must be at least {}", MIN_MAX_TOKENS),
        ));
    }

    u32::try_from(value).map_err(|_| {
        FieldError::constraint(path, Value::from(value), "max_tokens is out of range")
    })
}

/// Per-agent LLM parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LlmParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,

    temperature: f64,
}

impl Default for LlmParams {
    fn default() -> Self {
        Self {
            max_tokens: None,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl LlmParams {
    /// Build parameters, rejecting out-of-range values
    pub fn new(max_tokens: Option<u32>, temperature: Option<f64>) -> Result<Self, FieldError> {
        let root = FieldPath::root();
        if let Some(max_tokens) = max_tokens {
            validate_max_tokens(i64::from(max_tokens), &root.key("max_tokens"))?;
        }
        let temperature = match temperature {
            Some(t) => validate_temperature(t, &root.key("temperature"))?,
            None => DEFAULT_TEMPERATURE,
        };

        Ok(Self {
            max_tokens,
            temperature,
        })
    }

    pub fn from_value(raw: &Value) -> Result<Self, FieldErrors> {
        let mut errors = Vec::new();
        match Self::parse(raw, FieldPath::root(), &mut errors) {
            Some(params) if errors.is_empty() => Ok(params),
            _ => Err(FieldErrors(errors)),
        }
    }

    pub(crate) fn parse(
        raw: &Value,
        path: FieldPath,
        errors: &mut Vec<FieldError>,
    ) -> Option<Self> {
        checked(errors, |errors| {
            let fields = Fields::open(raw, path, errors)?;

            let max_tokens = fields.optional_int("max_tokens", errors).and_then(|n| {
                validate_max_tokens(n, &fields.child("max_tokens"))
                    .map_err(|e| errors.push(e))
                    .ok()
            });

            let temperature = match fields.optional_number("temperature", errors) {
                Some(t) => validate_temperature(t, &fields.child("temperature"))
                    .map_err(|e| errors.push(e))
                    .ok()?,
                None => DEFAULT_TEMPERATURE,
            };

            Some(Self {
                max_tokens,
                temperature,
            })
        })
    }

    pub fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::workflow_config::IssueKind;
    use serde_json::json;

    #[test]
    fn test_temperature_bounds() {
        let path = FieldPath::root().key("temperature");
        assert!(validate_temperature(0.0, &path).is_ok());
        assert!(validate_temperature(0.7, &path).is_ok());
        assert!(validate_temperature(2.0, &path).is_ok());

        assert!(validate_temperature(-0.1, &path).is_err());
        assert!(validate_temperature(2.01, &path).is_err());
    }

    #[test]
    fn test_max_tokens_bounds() {
        let path = FieldPath::root().key("max_tokens");
        assert_eq!(validate_max_tokens(1, &path), Ok(1));
        assert_eq!(validate_max_tokens(4096, &path), Ok(4096));

        assert!(validate_max_tokens(0, &path).is_err());
        assert!(validate_max_tokens(-5, &path).is_err());
        assert!(validate_max_tokens(i64::from(u32::MAX) + 1, &path).is_err());
    }

    #[test]
    fn test_temperature_defaults() {
        let params = LlmParams::from_value(&json!({})).unwrap();
        assert_eq!(params.temperature(), DEFAULT_TEMPERATURE);
        assert_eq!(params.max_tokens(), None);

        let params = LlmParams::from_value(&json!({"temperature": null})).unwrap();
        assert_eq!(params.temperature(), DEFAULT_TEMPERATURE);

        assert_eq!(LlmParams::default().temperature(), 0.5);
    }

    #[test]
    fn test_integer_temperature_accepted() {
        let params = LlmParams::from_value(&json!({"temperature": 2, "max_tokens": 256})).unwrap();
        assert_eq!(params.temperature(), 2.0);
        assert_eq!(params.max_tokens(), Some(256));
    }

    #[test]
    fn test_out_of_range_values_are_not_clamped() {
        let err = LlmParams::from_value(&json!({"temperature": 2.5, "max_tokens": 0})).unwrap_err();

        assert_eq!(err.len(), 2);
        let paths: Vec<_> = err.iter().map(|e| e.field_path.as_str()).collect();
        assert_eq!(paths, vec!["max_tokens", "temperature"]);
        assert!(err.iter().all(|e| e.kind == IssueKind::FieldConstraint));
        assert_eq!(err.first().unwrap().value, Some(json!(0)));
    }

    #[test]
    fn test_negative_temperature_rejected() {
        let err = LlmParams::from_value(&json!({"temperature": -0.5})).unwrap_err();
        assert_eq!(err.first().unwrap().reason, "temperature must be between 0 and 2");
    }

    #[test]
    fn test_wrong_types_are_structural() {
        let err = LlmParams::from_value(&json!({"temperature": "hot", "max_tokens": 1.5}))
            .unwrap_err();
        assert!(err.iter().all(|e| e.kind == IssueKind::Structural));
    }

    #[test]
    fn test_constructor_enforces_bounds() {
        assert!(LlmParams::new(Some(1), Some(0.0)).is_ok());
        assert!(LlmParams::new(Some(0), None).is_err());
        assert!(LlmParams::new(None, Some(3.0)).is_err());

        let params = LlmParams::new(None, None).unwrap();
        assert_eq!(params, LlmParams::default());
    }

    #[test]
    fn test_serialization_omits_missing_max_tokens() {
        let json = serde_json::to_value(LlmParams::default()).unwrap();
        assert_eq!(json, json!({"temperature": 0.5}));
    }
}

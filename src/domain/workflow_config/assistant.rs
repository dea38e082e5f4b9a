use serde::Serialize;
use serde_json::Value;

use super::error::FieldError;
use super::params::LlmParams;
use super::reader::Fields;

/// Fields shared by every agent variant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assistant {
    pub name: String,

    /// Model identifier, resolved against the model catalog
    pub llm: String,

    pub prompt: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<LlmParams>,

    /// Arbitrary structure describing the expected output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<Value>,
}

impl Assistant {
    pub fn new(name: impl Into<String>, llm: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            llm: llm.into(),
            prompt: prompt.into(),
            intro: None,
            params: None,
            output_schema: None,
        }
    }

    pub fn with_intro(mut self, intro: impl Into<String>) -> Self {
        self.intro = Some(intro.into());
        self
    }

    pub fn with_params(mut self, params: LlmParams) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_output_schema(mut self, schema: Value) -> Self {
        self.output_schema = Some(schema);
        self
    }

    /// Read the common fields of an agent mapping.
    ///
    /// Returns `None` when a required field is missing; bad optional fields
    /// are reported but do not stop the remaining fields from being read.
    pub(crate) fn parse(fields: &Fields<'_>, errors: &mut Vec<FieldError>) -> Option<Self> {
        let name = fields.required_str("name", errors);
        let llm = fields.required_str("llm", errors);
        let prompt = fields.required_str("prompt", errors);
        let intro = fields.optional_str("intro", errors);
        let params = fields
            .get("params")
            .and_then(|raw| LlmParams::parse(raw, fields.child("params"), errors));
        let output_schema = fields.get("output_schema").cloned();

        Some(Self {
            name: name?,
            llm: llm?,
            prompt: prompt?,
            intro,
            params,
            output_schema,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::workflow_config::FieldPath;
    use serde_json::json;

    #[test]
    fn test_parse_common_fields() {
        let raw = json!({
            "name": "writer",
            "llm": "GPT_4_0613",
            "prompt": "write",
            "intro": "hi",
            "params": {"temperature": 1.2},
            "output_schema": {"type": "object"}
        });
        let mut errors = Vec::new();
        let fields = Fields::open(&raw, FieldPath::root(), &mut errors).unwrap();
        let assistant = Assistant::parse(&fields, &mut errors).unwrap();

        assert!(errors.is_empty());
        assert_eq!(assistant.intro.as_deref(), Some("hi"));
        assert_eq!(assistant.params.unwrap().temperature(), 1.2);
        assert_eq!(assistant.output_schema, Some(json!({"type": "object"})));
    }

    #[test]
    fn test_parse_reports_missing_and_bad_fields_together() {
        let raw = json!({"name": "writer", "params": {"max_tokens": 0}});
        let mut errors = Vec::new();
        let fields = Fields::open(&raw, FieldPath::root().key("superagent"), &mut errors).unwrap();

        assert!(Assistant::parse(&fields, &mut errors).is_none());

        let paths: Vec<_> = errors.iter().map(|e| e.field_path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "superagent.llm",
                "superagent.prompt",
                "superagent.params.max_tokens"
            ]
        );
    }

    #[test]
    fn test_serialization_skips_absent_fields() {
        let assistant = Assistant::new("a", "GPT_4_0613", "p");
        assert_eq!(
            serde_json::to_value(&assistant).unwrap(),
            json!({"name": "a", "llm": "GPT_4_0613", "prompt": "p"})
        );
    }
}

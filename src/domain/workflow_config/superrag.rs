//! Retrieval index configuration: superrag indexes, encoders and the legacy `data` block

use std::fmt;

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use super::error::{FieldError, FieldErrors};
use super::path::FieldPath;
use super::reader::{checked, missing, Fields};

/// Maximum length for superrag index names
pub const MAX_INDEX_NAME_LENGTH: usize = 24;

/// Validated superrag index name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct IndexName(String);

impl IndexName {
    /// Create a new validated index name; longer names are rejected, not truncated
    pub fn new(name: impl Into<String>) -> Result<Self, FieldError> {
        Self::at(name.into(), &FieldPath::root().key("name"))
    }

    fn at(name: String, path: &FieldPath) -> Result<Self, FieldError> {
        let length = name.chars().count();
        if length > MAX_INDEX_NAME_LENGTH {
            return Err(FieldError::constraint(
                path,
                Value::String(name),
                format!(
                    "superrag index name must be at most {} characters (got {})",
                    MAX_INDEX_NAME_LENGTH, length
                ),
            ));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<IndexName> for String {
    fn from(name: IndexName) -> Self {
        name.0
    }
}

impl fmt::Display for IndexName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for IndexName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Embedding provider used to build an index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuperragEncoderType {
    Openai,
}

const ENCODER_TYPES: &[(&str, SuperragEncoderType)] = &[("openai", SuperragEncoderType::Openai)];

/// Vector database backing an index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuperragDatabaseProvider {
    Pinecone,
    Weaviate,
    Qdrant,
    Pgvector,
}

const DATABASE_PROVIDERS: &[(&str, SuperragDatabaseProvider)] = &[
    ("pinecone", SuperragDatabaseProvider::Pinecone),
    ("weaviate", SuperragDatabaseProvider::Weaviate),
    ("qdrant", SuperragDatabaseProvider::Qdrant),
    ("pgvector", SuperragDatabaseProvider::Pgvector),
];

/// Encoder settings for an index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuperragEncoder {
    #[serde(rename = "type")]
    pub encoder_type: SuperragEncoderType,

    /// Encoder model name (e.g. `text-embedding-3-small`)
    pub name: String,

    pub dimensions: u32,
}

impl SuperragEncoder {
    pub fn new(
        encoder_type: SuperragEncoderType,
        name: impl Into<String>,
        dimensions: u32,
    ) -> Self {
        Self {
            encoder_type,
            name: name.into(),
            dimensions,
        }
    }

    pub fn from_value(raw: &Value) -> Result<Self, FieldErrors> {
        let mut errors = Vec::new();
        match Self::parse(raw, FieldPath::root(), &mut errors) {
            Some(encoder) if errors.is_empty() => Ok(encoder),
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

            if !fields.contains("type") {
                errors.push(missing(&fields.child("type")));
            }
            let encoder_type = fields.optional_choice("type", ENCODER_TYPES, errors);
            let name = fields.required_str("name", errors);
            let dimensions = fields.required_int("dimensions", errors).and_then(|d| {
                u32::try_from(d)
                    .map_err(|_| {
                        errors.push(FieldError::constraint(
                            &fields.child("dimensions"),
                            Value::from(d),
                            "dimensions must be a non-negative 32-bit integer",
                        ))
                    })
                    .ok()
            });

            Some(Self {
                encoder_type: encoder_type?,
                name: name?,
                dimensions: dimensions?,
            })
        })
    }
}

/// A named reference to an external retrieval index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuperragIndex {
    pub name: IndexName,
    pub urls: Vec<String>,
    pub use_for: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoder: Option<SuperragEncoder>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_provider: Option<SuperragDatabaseProvider>,

    pub interpreter_mode: bool,
}

impl SuperragIndex {
    pub fn new(name: IndexName, urls: Vec<String>, use_for: impl Into<String>) -> Self {
        Self {
            name,
            urls,
            use_for: use_for.into(),
            encoder: None,
            database_provider: None,
            interpreter_mode: false,
        }
    }

    pub fn with_encoder(mut self, encoder: SuperragEncoder) -> Self {
        self.encoder = Some(encoder);
        self
    }

    pub fn with_database_provider(mut self, provider: SuperragDatabaseProvider) -> Self {
        self.database_provider = Some(provider);
        self
    }

    pub fn with_interpreter_mode(mut self, enabled: bool) -> Self {
        self.interpreter_mode = enabled;
        self
    }

    pub fn from_value(raw: &Value) -> Result<Self, FieldErrors> {
        let mut errors = Vec::new();
        match Self::parse(raw, FieldPath::root(), &mut errors) {
            Some(index) if errors.is_empty() => Ok(index),
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

            let name = fields.required_str("name", errors).and_then(|name| {
                IndexName::at(name, &fields.child("name"))
                    .map_err(|e| errors.push(e))
                    .ok()
            });
            let urls = fields.required_str_list("urls", errors);
            let use_for = fields.required_str("use_for", errors);
            let encoder = fields
                .get("encoder")
                .and_then(|raw| SuperragEncoder::parse(raw, fields.child("encoder"), errors));
            let database_provider =
                fields.optional_choice("database_provider", DATABASE_PROVIDERS, errors);
            let interpreter_mode = fields
                .optional_bool("interpreter_mode", errors)
                .unwrap_or(false);

            Some(Self {
                name: name?,
                urls: urls?,
                use_for: use_for?,
                encoder,
                database_provider,
                interpreter_mode,
            })
        })
    }
}

/// Ordered list of superrag indexes.
///
/// Serialized in the `[{"index": {...}}]` wire shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Superrag(pub Vec<SuperragIndex>);

impl Superrag {
    pub fn indexes(&self) -> &[SuperragIndex] {
        &self.0
    }

    /// Parse a superrag list; items may be `{"index": {...}}` or a bare index
    pub(crate) fn parse(
        items: &[Value],
        path: &FieldPath,
        errors: &mut Vec<FieldError>,
    ) -> Option<Self> {
        checked(errors, |errors| {
            let mut indexes = Vec::with_capacity(items.len());

            for (i, item) in items.iter().enumerate() {
                let item_path = path.index(i);
                let Some(fields) = Fields::open(item, item_path.clone(), errors) else {
                    continue;
                };

                if !fields.has_key("index") && !fields.is_empty() {
                    indexes.extend(SuperragIndex::parse(item, item_path, errors));
                    continue;
                }

                match fields.get("index") {
                    Some(raw) => {
                        indexes.extend(SuperragIndex::parse(raw, item_path.key("index"), errors))
                    }
                    None => debug!(path = %item_path, "skipping superrag entry without an index"),
                }
            }

            Some(Self(indexes))
        })
    }
}

impl Serialize for Superrag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Item<'a> {
            index: &'a SuperragIndex,
        }

        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for index in &self.0 {
            seq.serialize_element(&Item { index })?;
        }
        seq.end()
    }
}

/// Deprecated single-source knowledge block, superseded by `superrag`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Data {
    pub urls: Vec<String>,
    pub use_for: String,
}

impl Data {
    pub fn from_value(raw: &Value) -> Result<Self, FieldErrors> {
        let mut errors = Vec::new();
        match Self::parse(raw, FieldPath::root(), &mut errors) {
            Some(data) if errors.is_empty() => Ok(data),
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
            let urls = fields.required_str_list("urls", errors);
            let use_for = fields.required_str("use_for", errors);

            Some(Self {
                urls: urls?,
                use_for: use_for?,
            })
        })
    }
}

/// Knowledge attached to a superagent: one logical field with two spellings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Knowledge {
    Superrag(Superrag),

    /// Legacy `data` spelling, kept so re-validation reports the same advisory
    Data(Data),
}

impl Knowledge {
    /// Indexes of the canonical spelling; empty for legacy data
    pub fn indexes(&self) -> &[SuperragIndex] {
        match self {
            Self::Superrag(superrag) => superrag.indexes(),
            Self::Data(_) => &[],
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Data(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::workflow_config::IssueKind;
    use serde_json::json;

    #[test]
    fn test_index_name_limit() {
        assert!(IndexName::new("a").is_ok());
        assert!(IndexName::new("x".repeat(24)).is_ok());

        let err = IndexName::new("x".repeat(25)).unwrap_err();
        assert_eq!(err.field_path, "name");
        assert_eq!(err.kind, IssueKind::FieldConstraint);
    }

    #[test]
    fn test_index_name_counts_characters() {
        assert!(IndexName::new("é".repeat(24)).is_ok());
    }

    #[test]
    fn test_index_from_value_defaults() {
        let index = SuperragIndex::from_value(&json!({
            "name": "docs",
            "urls": ["https://example.com/a.pdf"],
            "use_for": "answering product questions"
        }))
        .unwrap();

        assert_eq!(index.name.as_str(), "docs");
        assert!(!index.interpreter_mode);
        assert!(index.encoder.is_none());
        assert!(index.database_provider.is_none());
    }

    #[test]
    fn test_index_with_encoder_and_database() {
        let index = SuperragIndex::from_value(&json!({
            "name": "docs",
            "urls": [],
            "use_for": "x",
            "encoder": {"type": "openai", "name": "text-embedding-3-small", "dimensions": 1536},
            "database_provider": "qdrant",
            "interpreter_mode": true
        }))
        .unwrap();

        assert_eq!(
            index.encoder,
            Some(SuperragEncoder::new(
                SuperragEncoderType::Openai,
                "text-embedding-3-small",
                1536
            ))
        );
        assert_eq!(index.database_provider, Some(SuperragDatabaseProvider::Qdrant));
        assert!(index.interpreter_mode);
    }

    #[test]
    fn test_index_name_too_long_is_rejected() {
        let err = SuperragIndex::from_value(&json!({
            "name": "this-name-is-definitely-too-long-for-the-limit",
            "urls": ["u"],
            "use_for": "x"
        }))
        .unwrap_err();

        assert_eq!(err.len(), 1);
        let first = err.first().unwrap();
        assert_eq!(first.field_path, "name");
        assert_eq!(first.kind, IssueKind::FieldConstraint);
    }

    #[test]
    fn test_index_reports_every_bad_field() {
        let err = SuperragIndex::from_value(&json!({
            "name": "x".repeat(30),
            "urls": "not-a-list",
            "database_provider": "mongo",
            "encoder": {"type": "cohere", "name": "e", "dimensions": -1}
        }))
        .unwrap_err();

        let paths: Vec<_> = err.iter().map(|e| e.field_path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "name",
                "urls",
                "use_for",
                "encoder.type",
                "encoder.dimensions",
                "database_provider"
            ]
        );
    }

    #[test]
    fn test_encoder_requires_type() {
        let err = SuperragEncoder::from_value(&json!({"name": "e", "dimensions": 8})).unwrap_err();
        assert_eq!(err.first().unwrap().reason, "type is required");
    }

    #[test]
    fn test_superrag_accepts_wrapped_and_bare_items() {
        let mut errors = Vec::new();
        let items = vec![
            json!({"index": {"name": "a", "urls": ["u"], "use_for": "x"}}),
            json!({"name": "b", "urls": ["u"], "use_for": "y"}),
            json!({"index": null}),
        ];

        let superrag =
            Superrag::parse(&items, &FieldPath::root().key("superrag"), &mut errors).unwrap();

        assert!(errors.is_empty());
        assert_eq!(superrag.indexes().len(), 2);
        assert_eq!(superrag.indexes()[1].name.as_str(), "b");
    }

    #[test]
    fn test_superrag_serializes_wrapped_items() {
        let superrag = Superrag(vec![SuperragIndex::new(
            IndexName::new("a").unwrap(),
            vec!["u".to_string()],
            "x",
        )]);

        assert_eq!(
            serde_json::to_value(&superrag).unwrap(),
            json!([{"index": {"name": "a", "urls": ["u"], "use_for": "x", "interpreter_mode": false}}])
        );
    }

    #[test]
    fn test_data_requires_fields() {
        assert!(Data::from_value(&json!({"urls": ["u"], "use_for": "x"})).is_ok());
        assert_eq!(Data::from_value(&json!({"urls": ["u"]})).unwrap_err().len(), 1);
    }

    #[test]
    fn test_knowledge_serializes_under_its_spelling() {
        let knowledge = Knowledge::Data(Data {
            urls: vec!["u".into()],
            use_for: "x".into(),
        });

        assert!(knowledge.is_legacy());
        assert_eq!(
            serde_json::to_value(&knowledge).unwrap(),
            json!({"data": {"urls": ["u"], "use_for": "x"}})
        );
    }
}

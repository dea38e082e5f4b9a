//! Model catalog configuration via TOML
//!
//! ```toml
//! [[providers]]
//! name = "OPENAI"
//!
//! [[providers.models]]
//! id = "GPT_4_0613"
//! api_name = "gpt-4-0613"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::catalog::{CatalogError, LlmProvider, ModelEntry, StaticModelCatalog};

/// Error type for catalog files
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("Failed to read catalog file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(#[from] CatalogError),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Root structure of a catalog file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogFileConfig {
    #[serde(default)]
    pub providers: Vec<ProviderFileEntry>,
}

/// One provider and the models it serves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderFileEntry {
    pub name: LlmProvider,

    #[serde(default)]
    pub models: Vec<ModelFileEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFileEntry {
    pub id: String,

    /// Defaults to `id` when omitted
    #[serde(default)]
    pub api_name: Option<String>,
}

impl From<ModelFileEntry> for ModelEntry {
    fn from(entry: ModelFileEntry) -> Self {
        let api_name = entry.api_name.unwrap_or_else(|| entry.id.clone());
        ModelEntry::new(entry.id, api_name)
    }
}

impl CatalogFileConfig {
    fn validate(&self) -> Result<(), CatalogLoadError> {
        if self.providers.is_empty() {
            return Err(CatalogLoadError::ValidationError(
                "catalog must list at least one provider".into(),
            ));
        }

        if let Some(entry) = self
            .providers
            .iter()
            .flat_map(|p| p.models.iter())
            .find(|m| m.id.trim().is_empty())
        {
            return Err(CatalogLoadError::ValidationError(format!(
                "model id cannot be empty (api_name: {:?})",
                entry.api_name
            )));
        }

        Ok(())
    }

    /// Build the catalog, rejecting models listed under two providers
    pub fn into_catalog(self) -> Result<StaticModelCatalog, CatalogLoadError> {
        self.validate()?;

        let catalog = self
            .providers
            .into_iter()
            .fold(StaticModelCatalog::builder(), |builder, entry| {
                builder.provider(entry.name, entry.models.into_iter().map(ModelEntry::from))
            })
            .build()?;

        Ok(catalog)
    }
}

/// Parse a catalog from TOML text
pub fn parse_catalog(content: &str) -> Result<StaticModelCatalog, CatalogLoadError> {
    let config: CatalogFileConfig = toml::from_str(content)?;
    config.into_catalog()
}

/// Load a catalog from a TOML file
pub fn load_catalog_file(path: impl AsRef<Path>) -> Result<StaticModelCatalog, CatalogLoadError> {
    let path = path.as_ref();
    info!(path = %path.display(), "Loading model catalog");

    let content = std::fs::read_to_string(path)?;
    let catalog = parse_catalog(&content)?;

    debug!(models = catalog.model_count(), "Model catalog loaded");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::ModelCatalog;

    #[test]
    fn test_parse_catalog() {
        let toml = r#"
[[providers]]
name = "OPENAI"

[[providers.models]]
id = "GPT_4_0613"
api_name = "gpt-4-0613"

[[providers.models]]
id = "GPT_4O"

[[providers]]
name = "GROQ"
models = [{ id = "LLAMA3_70B", api_name = "llama3-70b-8192" }]
"#;

        let catalog = parse_catalog(toml).unwrap();

        assert_eq!(
            catalog.providers(),
            vec![LlmProvider::OpenAi, LlmProvider::Groq]
        );
        assert!(catalog.is_valid_model(LlmProvider::OpenAi, "GPT_4O"));
        assert_eq!(catalog.api_model_name("GPT_4O").as_deref(), Some("GPT_4O"));
        assert_eq!(
            catalog.api_model_name("LLAMA3_70B").as_deref(),
            Some("llama3-70b-8192")
        );
    }

    #[test]
    fn test_unknown_provider_name() {
        let toml = r#"
[[providers]]
name = "openai"
"#;

        let result = parse_catalog(toml);
        assert!(matches!(result, Err(CatalogLoadError::TomlError(_))));
    }

    #[test]
    fn test_duplicate_model_rejected() {
        let toml = r#"
[[providers]]
name = "OPENAI"
models = [{ id = "shared" }]

[[providers]]
name = "OPENROUTER"
models = [{ id = "shared" }]
"#;

        let result = parse_catalog(toml);
        assert!(matches!(
            result,
            Err(CatalogLoadError::InvalidCatalog(CatalogError::DuplicateModel { .. }))
        ));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let result = parse_catalog("");
        assert!(matches!(result, Err(CatalogLoadError::ValidationError(_))));

        let toml = r#"
[[providers]]
name = "GROQ"
models = [{ id = " " }]
"#;
        assert!(matches!(
            parse_catalog(toml),
            Err(CatalogLoadError::ValidationError(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_catalog_file("/nonexistent/catalog.toml");
        assert!(matches!(result, Err(CatalogLoadError::IoError(_))));
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!("catalog-test-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[[providers]]\nname = \"MISTRAL\"\nmodels = [{ id = \"mistral-large\" }]\n",
        )
        .unwrap();

        let catalog = load_catalog_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(catalog.provider_of("mistral-large"), Some(LlmProvider::Mistral));
    }
}

//! Model catalog trait and the compiled-in static implementation

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::error::CatalogError;
use super::provider::LlmProvider;

#[cfg(test)]
use mockall::automock;

/// Compiled-in provider table: (provider, [(model id, provider API model name)])
const BUILTIN_TABLE: &[(LlmProvider, &[(&str, &str)])] = &[
    (
        LlmProvider::OpenAi,
        &[
            ("GPT_3_5_TURBO_16K_0613", "gpt-3.5-turbo-16k-0613"),
            ("GPT_3_5_TURBO_0613", "gpt-3.5-turbo-0613"),
            ("GPT_3_5_TURBO_1106", "gpt-3.5-turbo-1106"),
            ("GPT_4_0613", "gpt-4-0613"),
            ("GPT_4_32K_0613", "gpt-4-32k-0613"),
            ("GPT_4_1106_PREVIEW", "gpt-4-1106-preview"),
        ],
    ),
    (
        LlmProvider::OpenRouter,
        &[
            ("NOUS_CAPYBARA_7B", "nousresearch/nous-capybara-7b"),
            ("MISTRAL_7B_INSTRUCT", "mistralai/mistral-7b-instruct"),
            ("ZEPHYR_7B_BETA", "huggingfaceh4/zephyr-7b-beta"),
            ("OPENCHAT_7B", "openchat/openchat-7b"),
            ("MYTHOMIST_7B", "gryphe/mythomist-7b"),
        ],
    ),
];

static BUILTIN: Lazy<Arc<StaticModelCatalog>> = Lazy::new(|| {
    let providers = BUILTIN_TABLE
        .iter()
        .map(|(provider, models)| {
            let entries = models
                .iter()
                .map(|(id, api_name)| ModelEntry::new(*id, *api_name))
                .collect();
            (*provider, entries)
        })
        .collect();

    Arc::new(StaticModelCatalog::from_parts(providers))
});

/// Shared handle to the compiled-in catalog
pub fn builtin_catalog() -> Arc<StaticModelCatalog> {
    Arc::clone(&BUILTIN)
}

/// A model identifier and the name the provider's API knows it by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub id: String,
    pub api_name: String,
}

impl ModelEntry {
    pub fn new(id: impl Into<String>, api_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            api_name: api_name.into(),
        }
    }
}

/// Read-only lookup of valid model identifiers per provider.
///
/// Lookups are exact and case-sensitive. Implementations never raise
/// validation errors themselves; callers decide whether a miss is fatal.
#[cfg_attr(test, automock)]
pub trait ModelCatalog: Send + Sync {
    /// Providers known to this catalog, in registration order
    fn providers(&self) -> Vec<LlmProvider>;

    /// Model identifiers registered for a provider, in registration order
    fn models_for(&self, provider: LlmProvider) -> Result<Vec<String>, CatalogError>;

    /// Whether `model_id` is registered under `provider`
    fn is_valid_model(&self, provider: LlmProvider, model_id: &str) -> bool;

    /// The provider a model identifier is registered under
    fn provider_of(&self, model_id: &str) -> Option<LlmProvider>;

    /// Provider-side API name for a model identifier
    fn api_model_name(&self, model_id: &str) -> Option<String>;
}

/// In-memory catalog built once and never mutated
#[derive(Debug, Clone, Default)]
pub struct StaticModelCatalog {
    providers: Vec<(LlmProvider, Vec<ModelEntry>)>,
    index: HashMap<String, (usize, usize)>,
}

impl StaticModelCatalog {
    pub fn builder() -> StaticModelCatalogBuilder {
        StaticModelCatalogBuilder::default()
    }

    fn from_parts(providers: Vec<(LlmProvider, Vec<ModelEntry>)>) -> Self {
        let mut index = HashMap::new();
        for (p, (_, models)) in providers.iter().enumerate() {
            for (m, entry) in models.iter().enumerate() {
                index.entry(entry.id.clone()).or_insert((p, m));
            }
        }
        Self { providers, index }
    }

    /// All registered entries for a provider
    pub fn entries(&self, provider: LlmProvider) -> Option<&[ModelEntry]> {
        self.providers
            .iter()
            .find(|(p, _)| *p == provider)
            .map(|(_, models)| models.as_slice())
    }

    pub fn model_count(&self) -> usize {
        self.index.len()
    }

    fn lookup(&self, model_id: &str) -> Option<(LlmProvider, &ModelEntry)> {
        let (p, m) = *self.index.get(model_id)?;
        let (provider, models) = &self.providers[p];
        Some((*provider, &models[m]))
    }
}

impl ModelCatalog for StaticModelCatalog {
    fn providers(&self) -> Vec<LlmProvider> {
        self.providers.iter().map(|(p, _)| *p).collect()
    }

    fn models_for(&self, provider: LlmProvider) -> Result<Vec<String>, CatalogError> {
        self.entries(provider)
            .map(|models| models.iter().map(|m| m.id.clone()).collect())
            .ok_or_else(|| CatalogError::unknown_provider(provider.as_str()))
    }

    fn is_valid_model(&self, provider: LlmProvider, model_id: &str) -> bool {
        self.provider_of(model_id) == Some(provider)
    }

    fn provider_of(&self, model_id: &str) -> Option<LlmProvider> {
        self.lookup(model_id).map(|(provider, _)| provider)
    }

    fn api_model_name(&self, model_id: &str) -> Option<String> {
        self.lookup(model_id).map(|(_, entry)| entry.api_name.clone())
    }
}

/// Builder that enforces one provider per model identifier
#[derive(Debug, Default)]
pub struct StaticModelCatalogBuilder {
    providers: Vec<(LlmProvider, Vec<ModelEntry>)>,
}

impl StaticModelCatalogBuilder {
    /// Register models under a provider; repeated calls for the same provider append
    pub fn provider(
        mut self,
        provider: LlmProvider,
        models: impl IntoIterator<Item = ModelEntry>,
    ) -> Self {
        match self.providers.iter_mut().find(|(p, _)| *p == provider) {
            Some((_, existing)) => existing.extend(models),
            None => self.providers.push((provider, models.into_iter().collect())),
        }
        self
    }

    pub fn build(self) -> Result<StaticModelCatalog, CatalogError> {
        let mut owners: HashMap<&str, LlmProvider> = HashMap::new();

        for (provider, models) in &self.providers {
            for entry in models {
                if let Some(first) = owners.insert(entry.id.as_str(), *provider) {
                    if first != *provider {
                        return Err(CatalogError::duplicate_model(
                            entry.id.as_str(),
                            first.as_str(),
                            provider.as_str(),
                        ));
                    }
                }
            }
        }

        Ok(StaticModelCatalog::from_parts(self.providers))
    }
}

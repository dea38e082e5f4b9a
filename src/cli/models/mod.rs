//! Models command - prints the model catalog

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use serde::Serialize;

use crate::config::AppConfig;
use crate::domain::catalog::{LlmProvider, ModelCatalog};
use crate::infrastructure::logging;

/// Arguments for the models command
#[derive(Args, Clone, Debug)]
pub struct ModelsArgs {
    /// Only list this provider (e.g. OPENAI)
    #[arg(long)]
    pub provider: Option<LlmProvider>,

    /// TOML model catalog (overrides config)
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderModels {
    pub provider: LlmProvider,
    pub models: Vec<ModelInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_name: Option<String>,
}

/// Run the models command
pub async fn run(args: ModelsArgs) -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let listing = execute(&args, &config)?;
    println!("{}", serde_json::to_string_pretty(&listing)?);

    Ok(ExitCode::SUCCESS)
}

pub fn execute(args: &ModelsArgs, config: &AppConfig) -> anyhow::Result<Vec<ProviderModels>> {
    let catalog_path = args
        .catalog
        .as_deref()
        .or(config.validation.catalog_path.as_deref());
    let catalog = super::resolve_catalog(catalog_path)?;

    let providers = match args.provider {
        Some(provider) => vec![provider],
        None => catalog.providers(),
    };

    providers
        .into_iter()
        .map(|provider| list_provider(catalog.as_ref(), provider))
        .collect()
}

fn list_provider(
    catalog: &dyn ModelCatalog,
    provider: LlmProvider,
) -> anyhow::Result<ProviderModels> {
    let models = catalog
        .models_for(provider)?
        .into_iter()
        .map(|id| ModelInfo {
            api_name: catalog.api_model_name(&id),
            id,
        })
        .collect();

    Ok(ProviderModels { provider, models })
}

//! CLI module for the agent workflow config validator
//!
//! Subcommands:
//! - `validate`: validate a workflow document and print the canonical form
//! - `models`: print the model catalog

pub mod models;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::domain::catalog::{ModelCatalog, builtin_catalog};
use crate::infrastructure::catalog::load_catalog_file;

/// Agent workflow config - schema validation for agent workflow documents
#[derive(Parser)]
#[command(name = "agent-workflow-config")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a workflow document
    Validate(validate::ValidateArgs),

    /// List the providers and models of the catalog
    Models(models::ModelsArgs),
}

/// The catalog file when one is given, the built-in table otherwise
pub(crate) fn resolve_catalog(path: Option<&Path>) -> anyhow::Result<Arc<dyn ModelCatalog>> {
    let catalog: Arc<dyn ModelCatalog> = match path {
        Some(path) => Arc::new(load_catalog_file(path)?),
        None => {
            debug!("Using built-in model catalog");
            builtin_catalog()
        }
    };
    Ok(catalog)
}

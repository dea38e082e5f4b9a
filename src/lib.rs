//! Agent Workflow Config
//!
//! Schema and validation engine for agent workflow documents:
//! - Typed agent variants per provider key, with agents nested as tools
//! - Field-level errors collected per step with dotted paths
//! - Deprecation advisories for legacy spellings
//! - Injectable model catalog, built-in or loaded from TOML

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::catalog::{LlmProvider, ModelCatalog, StaticModelCatalog, builtin_catalog};
pub use domain::workflow_config::{
    Advisory, AgentVariant, ValidatedWorkflow, ValidationIssue, ValidationOptions,
    WorkflowConfigError, WorkflowConfigValidator, WorkflowDocument,
};

//! Domain layer - Core business logic and entities

pub mod catalog;
pub mod workflow_config;

pub use catalog::{CatalogError, LlmProvider, ModelCatalog, StaticModelCatalog};
pub use workflow_config::{
    AgentVariant, ValidatedWorkflow, WorkflowConfigError, WorkflowConfigValidator,
    WorkflowDocument,
};

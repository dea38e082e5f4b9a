//! Model catalog domain module
//!
//! Read-only registry mapping each supported LLM provider to the model
//! identifiers it accepts. The validator consults it through the
//! [`ModelCatalog`] trait so tests and deployments can inject their own table.

mod error;
mod provider;
mod registry;

pub use error::CatalogError;
pub use provider::LlmProvider;
pub use registry::{
    ModelCatalog, ModelEntry, StaticModelCatalog, StaticModelCatalogBuilder, builtin_catalog,
};
#[cfg(test)]
pub use registry::MockModelCatalog;

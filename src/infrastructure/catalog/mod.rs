//! Model catalog loading
//!
//! Builds a [`StaticModelCatalog`](crate::domain::catalog::StaticModelCatalog)
//! from a TOML file so deployments can substitute the compiled-in table.

mod config;

pub use config::{
    CatalogFileConfig, CatalogLoadError, ModelFileEntry, ProviderFileEntry, load_catalog_file,
    parse_catalog,
};

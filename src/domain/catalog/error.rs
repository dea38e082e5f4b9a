//! Model catalog error types

use thiserror::Error;

/// Errors raised by catalog lookups and catalog construction
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Model '{model}' is registered under both {first} and {second}")]
    DuplicateModel {
        model: String,
        first: String,
        second: String,
    },
}

impl CatalogError {
    pub fn unknown_provider(provider: impl Into<String>) -> Self {
        Self::UnknownProvider(provider.into())
    }

    pub fn duplicate_model(
        model: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::DuplicateModel {
            model: model.into(),
            first: first.into(),
            second: second.into(),
        }
    }
}

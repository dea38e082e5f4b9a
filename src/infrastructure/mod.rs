//! Infrastructure layer - Catalog loading and logging

pub mod catalog;
pub mod logging;

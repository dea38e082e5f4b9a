//! Workflow document validation entry point

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::document::{ValidatedWorkflow, WorkflowDocument};
use super::error::{FieldError, WorkflowConfigError};
use super::path::FieldPath;
use super::reader::type_name;
use super::resolver::Resolver;
use crate::domain::catalog::{ModelCatalog, builtin_catalog};

pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Tunables for a validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Deepest agent nesting accepted; a step's own agent is depth 1
    pub max_depth: usize,

    /// Reject unknown models instead of reporting them as advisories
    pub enforce_model_catalog: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            enforce_model_catalog: true,
        }
    }
}

impl ValidationOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_enforce_model_catalog(mut self, enforce: bool) -> Self {
        self.enforce_model_catalog = enforce;
        self
    }
}

/// Validates raw workflow documents into typed trees.
///
/// Holds no per-call state; one instance can serve concurrent callers.
#[derive(Clone)]
pub struct WorkflowConfigValidator {
    catalog: Arc<dyn ModelCatalog>,
    options: ValidationOptions,
}

impl fmt::Debug for WorkflowConfigValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowConfigValidator")
            .field("providers", &self.catalog.providers())
            .field("options", &self.options)
            .finish()
    }
}

impl Default for WorkflowConfigValidator {
    fn default() -> Self {
        Self::new(builtin_catalog())
    }
}

impl WorkflowConfigValidator {
    pub fn new(catalog: Arc<dyn ModelCatalog>) -> Self {
        Self {
            catalog,
            options: ValidationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    pub fn catalog(&self) -> &Arc<dyn ModelCatalog> {
        &self.catalog
    }

    /// Validate a JSON document.
    ///
    /// Nesting is bounded only by `max_depth`, not by the JSON parser.
    pub fn validate_str(&self, input: &str) -> Result<ValidatedWorkflow, WorkflowConfigError> {
        let raw = parse_json(input).map_err(|e| {
            WorkflowConfigError::structural(&FieldPath::root(), format!("invalid JSON: {}", e))
        })?;
        self.validate(&raw)
    }

    /// Validate a raw document.
    ///
    /// Every step is resolved even after an earlier one fails, so the error
    /// lists all problems in document order. On success the advisories are
    /// ordered the same way.
    pub fn validate(&self, raw: &Value) -> Result<ValidatedWorkflow, WorkflowConfigError> {
        let root = FieldPath::root();
        let Value::Object(document) = raw else {
            return Err(WorkflowConfigError::structural(
                &root,
                format!("expected a mapping, found {}", type_name(raw)),
            ));
        };

        let path = root.key("workflows");
        let steps = match document.get("workflows") {
            Some(Value::Array(steps)) => steps,
            None | Some(Value::Null) => {
                return Err(WorkflowConfigError::structural(&path, "workflows is required"));
            }
            Some(other) => {
                return Err(WorkflowConfigError::structural(
                    &path,
                    format!("expected a list, found {}", type_name(other)),
                ));
            }
        };

        if steps.is_empty() {
            return Err(WorkflowConfigError::structural(&path, "workflows must be non-empty"));
        }

        let mut workflows = Vec::with_capacity(steps.len());
        let mut issues = Vec::new();
        let mut advisories = Vec::new();

        for (index, raw_step) in steps.iter().enumerate() {
            let step_path = path.index(index);
            let mut resolver = Resolver::new(self.catalog.as_ref(), &self.options);
            let step = resolver.resolve_step(raw_step, step_path.clone());
            let (mut errors, step_advisories) = resolver.into_parts();

            match step {
                Some(step) if errors.is_empty() => {
                    debug!(step = index, agent = %step.kind(), name = step.name(), "step accepted");
                    workflows.push(step);
                }
                None if errors.is_empty() => {
                    errors.push(FieldError::structural(&step_path, "step could not be resolved"));
                }
                _ => {}
            }

            issues.extend(errors.into_iter().map(|e| e.at_step(Some(index))));
            advisories.extend(step_advisories.into_iter().map(|a| a.at_step(index)));
        }

        if !issues.is_empty() {
            info!(
                steps = steps.len(),
                issues = issues.len(),
                "Workflow config rejected"
            );
            return Err(WorkflowConfigError::new(issues));
        }

        for advisory in &advisories {
            warn!(
                step = ?advisory.step_index,
                path = %advisory.field_path,
                kind = ?advisory.kind,
                "{}",
                advisory.message
            );
        }

        info!(
            steps = workflows.len(),
            advisories = advisories.len(),
            "Workflow config accepted"
        );

        Ok(ValidatedWorkflow::new(
            WorkflowDocument::from_validated(workflows),
            advisories,
        ))
    }
}

/// Parse without serde_json's recursion limit, growing the stack on demand
fn parse_json(input: &str) -> Result<Value, serde_json::Error> {
    let mut deserializer = serde_json::Deserializer::from_str(input);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    Ok(value)
}

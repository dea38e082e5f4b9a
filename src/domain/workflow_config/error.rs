//! Validation issue, advisory and error types

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::path::FieldPath;

/// Category of a validation failure
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Required field missing or value of the wrong shape
    Structural,

    /// Value of the right shape violates a declared bound
    FieldConstraint,

    /// Zero or several variant keys populated, or an unrecognised variant key
    AmbiguousShape,

    /// Provider absent from the model catalog
    UnknownProvider,

    /// Model identifier absent from the model catalog
    UnknownModel,

    /// Agent-as-tool nesting deeper than the configured maximum
    DepthLimit,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural => write!(f, "structural"),
            Self::FieldConstraint => write!(f, "field_constraint"),
            Self::AmbiguousShape => write!(f, "ambiguous_shape"),
            Self::UnknownProvider => write!(f, "unknown_provider"),
            Self::UnknownModel => write!(f, "unknown_model"),
            Self::DepthLimit => write!(f, "depth_limit"),
        }
    }
}

/// A single field-level failure
#[derive(Debug, Clone, Error, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("{field_path}: {reason}")]
pub struct FieldError {
    pub field_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub kind: IssueKind,
    pub reason: String,
}

impl FieldError {
    pub fn new(kind: IssueKind, path: &FieldPath, reason: impl Into<String>) -> Self {
        Self {
            field_path: path.as_str().to_string(),
            value: None,
            kind,
            reason: reason.into(),
        }
    }

    pub fn structural(path: &FieldPath, reason: impl Into<String>) -> Self {
        Self::new(IssueKind::Structural, path, reason)
    }

    pub fn constraint(path: &FieldPath, value: Value, reason: impl Into<String>) -> Self {
        Self::new(IssueKind::FieldConstraint, path, reason).with_value(value)
    }

    pub fn ambiguous(path: &FieldPath, reason: impl Into<String>) -> Self {
        Self::new(IssueKind::AmbiguousShape, path, reason)
    }

    pub fn unknown_provider(path: &FieldPath, provider: impl fmt::Display) -> Self {
        Self::new(
            IssueKind::UnknownProvider,
            path,
            format!("provider {} is not present in the model catalog", provider),
        )
    }

    pub fn unknown_model(path: &FieldPath, model: &str, reason: impl Into<String>) -> Self {
        Self::new(IssueKind::UnknownModel, path, reason).with_value(Value::from(model))
    }

    pub fn depth_limit(path: &FieldPath, max_depth: usize) -> Self {
        Self::new(
            IssueKind::DepthLimit,
            path,
            format!("agent nesting exceeds the maximum depth of {}", max_depth),
        )
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub(crate) fn at_step(self, step_index: Option<usize>) -> ValidationIssue {
        ValidationIssue {
            step_index,
            field_path: self.field_path,
            value: self.value,
            kind: self.kind,
            reason: self.reason,
        }
    }
}

/// All field errors raised while validating one leaf value
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{}", join_errors(.0))]
pub struct FieldErrors(pub Vec<FieldError>);

impl FieldErrors {
    pub fn first(&self) -> Option<&FieldError> {
        self.0.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<FieldError> for FieldErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A field error located within a workflow document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    /// Index of the offending step; `None` for document-level issues
    pub step_index: Option<usize>,
    pub field_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub kind: IssueKind,
    pub reason: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.step_index {
            Some(index) => write!(f, "step {}: {}: {}", index, self.field_path, self.reason),
            None => write!(f, "{}: {}", self.field_path, self.reason),
        }
    }
}

/// Category of a non-fatal finding
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
    /// A legacy spelling was used
    Deprecated,

    /// A model check failed while catalog enforcement is disabled
    UnverifiedModel,
}

/// Non-fatal finding attached to a successful validation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Advisory {
    pub step_index: Option<usize>,
    pub field_path: String,
    pub kind: AdvisoryKind,
    pub message: String,
}

impl Advisory {
    pub fn new(kind: AdvisoryKind, path: &FieldPath, message: impl Into<String>) -> Self {
        Self {
            step_index: None,
            field_path: path.as_str().to_string(),
            kind,
            message: message.into(),
        }
    }

    pub fn deprecated(path: &FieldPath, message: impl Into<String>) -> Self {
        Self::new(AdvisoryKind::Deprecated, path, message)
    }

    pub(crate) fn at_step(mut self, step_index: usize) -> Self {
        self.step_index = Some(step_index);
        self
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field_path, self.message)
    }
}

/// A rejected workflow document; no partial tree survives
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Workflow config rejected with {} issue(s): {}", .issues.len(), join_issues(.issues))]
pub struct WorkflowConfigError {
    issues: Vec<ValidationIssue>,
}

impl WorkflowConfigError {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    pub fn structural(path: &FieldPath, reason: impl Into<String>) -> Self {
        Self::new(vec![FieldError::structural(path, reason).at_step(None)])
    }

    /// Issues in document order
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<ValidationIssue> {
        self.issues
    }

    /// Issues raised by the step at `index`
    pub fn step_issues(&self, index: usize) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(move |issue| issue.step_index == Some(index))
    }

    /// Number of issues tied to a step
    pub fn step_issue_count(&self) -> usize {
        self.issues.iter().filter(|i| i.step_index.is_some()).count()
    }

    pub fn has_kind(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

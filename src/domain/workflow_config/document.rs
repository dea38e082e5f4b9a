use serde::Serialize;
use serde_json::Value;

use super::agent::AgentVariant;
use super::error::Advisory;

/// A validated workflow: a non-empty list of steps in execution order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowDocument {
    workflows: Vec<AgentVariant>,
}

impl WorkflowDocument {
    /// Only the validator builds documents, after checking the list is non-empty
    pub(super) fn from_validated(workflows: Vec<AgentVariant>) -> Self {
        Self { workflows }
    }

    pub fn steps(&self) -> &[AgentVariant] {
        &self.workflows
    }

    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    /// Always false for a validated document
    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }

    pub fn into_steps(self) -> Vec<AgentVariant> {
        self.workflows
    }

    /// Canonical raw form, accepted unchanged by the validator
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Successful validation result
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedWorkflow {
    pub document: WorkflowDocument,
    pub advisories: Vec<Advisory>,
}

impl ValidatedWorkflow {
    pub fn new(document: WorkflowDocument, advisories: Vec<Advisory>) -> Self {
        Self {
            document,
            advisories,
        }
    }

    pub fn has_advisories(&self) -> bool {
        !self.advisories.is_empty()
    }

    /// Hand the tree over by value
    pub fn into_parts(self) -> (WorkflowDocument, Vec<Advisory>) {
        (self.document, self.advisories)
    }
}

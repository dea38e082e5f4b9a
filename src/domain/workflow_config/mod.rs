//! Workflow configuration domain module
//!
//! Schema and validation engine for agent workflow documents. A document is
//! an ordered list of steps; each step configures exactly one agent variant,
//! selected by which provider key is populated:
//! - `superagent` - native agent with tools and superrag indexes
//! - `openai_assistant` - OpenAI-Assistant-backed agent
//! - `perplexity`, `together_ai`, `bedrock`, `groq`, `mistral`, `cohere_chat`,
//!   `anthropic` - agents backed by a generic LLM provider
//! - `llm` - deprecated generic key
//!
//! Agents may be nested as tools of other agents, up to a configurable depth.
//!
//! ## Errors
//!
//! Field errors are collected per step and reported together with their
//! step index and dotted field path. Deprecated spellings produce advisories
//! on an otherwise successful result.

mod agent;
mod assistant;
mod document;
mod error;
mod params;
mod path;
mod reader;
mod resolver;
mod superrag;
mod tool;
mod validator;

pub use agent::{AgentKind, AgentVariant, LlmAgent, ModelCheck, OpenAiAgent, SuperagentAgent};
pub use assistant::Assistant;
pub use document::{ValidatedWorkflow, WorkflowDocument};
pub use error::{
    Advisory, AdvisoryKind, FieldError, FieldErrors, IssueKind, ValidationIssue,
    WorkflowConfigError,
};
pub use params::{
    DEFAULT_TEMPERATURE, LlmParams, MAX_TEMPERATURE, MIN_MAX_TOKENS, MIN_TEMPERATURE,
    validate_max_tokens, validate_temperature,
};
pub use path::FieldPath;
pub use superrag::{
    Data, IndexName, Knowledge, MAX_INDEX_NAME_LENGTH, Superrag, SuperragDatabaseProvider,
    SuperragEncoder, SuperragEncoderType, SuperragIndex,
};
pub use tool::{AgentTool, Tool, ToolEntry, ToolType};
pub use validator::{DEFAULT_MAX_DEPTH, ValidationOptions, WorkflowConfigValidator};

//! Agent variant resolution
//!
//! Turns one raw step (or agent-as-tool entry) into a typed [`AgentVariant`],
//! recursing through `tools` until the configured depth is reached.

use serde_json::Value;
use tracing::debug;

use super::agent::{AgentKind, AgentVariant, LlmAgent, ModelCheck, OpenAiAgent, SuperagentAgent};
use super::assistant::Assistant;
use super::error::{Advisory, AdvisoryKind, FieldError};
use super::path::FieldPath;
use super::reader::Fields;
use super::superrag::{Data, Knowledge, Superrag};
use super::tool::{AgentTool, Tool, ToolEntry, ToolType};
use super::validator::ValidationOptions;
use crate::domain::catalog::ModelCatalog;

const KNOWLEDGE_KEYS: [&str; 3] = ["tools", "superrag", "data"];

/// Per-step resolution state
pub(crate) struct Resolver<'c> {
    catalog: &'c dyn ModelCatalog,
    options: &'c ValidationOptions,
    errors: Vec<FieldError>,
    advisories: Vec<Advisory>,
}

impl<'c> Resolver<'c> {
    pub fn new(catalog: &'c dyn ModelCatalog, options: &'c ValidationOptions) -> Self {
        Self {
            catalog,
            options,
            errors: Vec::new(),
            advisories: Vec::new(),
        }
    }

    pub fn into_parts(self) -> (Vec<FieldError>, Vec<Advisory>) {
        (self.errors, self.advisories)
    }

    /// Resolve a workflow step; `None` whenever any error was recorded
    pub fn resolve_step(&mut self, raw: &Value, path: FieldPath) -> Option<AgentVariant> {
        let step = Fields::open(raw, path, &mut self.errors)?;
        let kind = self.select_step_kind(&step)?;
        let key = kind.as_str();
        let body = Fields::open(step.get(key)?, step.child(key), &mut self.errors)?;

        self.resolve_agent(kind, &body, 1)
    }

    fn select_step_kind(&mut self, step: &Fields<'_>) -> Option<AgentKind> {
        let (kinds, unknown): (Vec<&str>, Vec<&str>) = step
            .populated_keys()
            .partition(|key| AgentKind::from_key(key).is_some());

        match kinds.as_slice() {
            [key] => AgentKind::from_key(key),
            [] => {
                let reason = if unknown.is_empty() {
                    "empty step: no agent is configured".to_string()
                } else {
                    format!(
                        "empty step: no agent is configured (unrecognised keys: {})",
                        unknown.join(", ")
                    )
                };
                self.errors.push(FieldError::ambiguous(step.path(), reason));
                None
            }
            several => {
                self.errors.push(FieldError::ambiguous(
                    step.path(),
                    format!(
                        "step configures more than one agent: {}",
                        several.join(", ")
                    ),
                ));
                None
            }
        }
    }

    fn resolve_agent(
        &mut self,
        kind: AgentKind,
        body: &Fields<'_>,
        depth: usize,
    ) -> Option<AgentVariant> {
        if depth > self.options.max_depth {
            self.errors
                .push(FieldError::depth_limit(body.path(), self.options.max_depth));
            return None;
        }

        if kind.is_deprecated() {
            self.advisories.push(Advisory::deprecated(
                body.path(),
                "the generic `llm` agent is deprecated; use a provider key such as `together_ai`",
            ));
        }

        let before = self.errors.len();
        let assistant = Assistant::parse(body, &mut self.errors);
        if let Some(assistant) = &assistant {
            self.check_model(kind, assistant, body);
        }

        let variant = match kind {
            AgentKind::Superagent => {
                let tools = self.resolve_tools(body, depth);
                let knowledge = self.resolve_knowledge(body);
                assistant.map(|assistant| {
                    AgentVariant::Superagent(SuperagentAgent {
                        assistant,
                        tools,
                        knowledge,
                    })
                })
            }
            AgentKind::OpenaiAssistant => {
                for key in KNOWLEDGE_KEYS.into_iter().filter(|key| body.contains(key)) {
                    debug!(path = %body.child(key), "ignoring field on openai_assistant");
                }
                assistant
                    .map(|assistant| AgentVariant::OpenaiAssistant(OpenAiAgent::new(assistant)))
            }
            _ => {
                let tools = self.resolve_tools(body, depth);
                let superrag_path = body.child("superrag");
                let superrag = body
                    .optional_list("superrag", &mut self.errors)
                    .and_then(|items| Superrag::parse(items, &superrag_path, &mut self.errors));
                if body.contains("data") {
                    debug!(path = %body.child("data"), agent = %kind, "ignoring legacy data field");
                }
                assistant.and_then(|assistant| {
                    AgentVariant::from_llm_agent(
                        kind,
                        LlmAgent {
                            assistant,
                            tools,
                            superrag,
                        },
                    )
                })
            }
        };

        if self.errors.len() > before {
            return None;
        }

        debug!(agent = %kind, path = %body.path(), depth, "resolved agent");
        variant
    }

    fn resolve_tools(&mut self, body: &Fields<'_>, depth: usize) -> Option<Vec<ToolEntry>> {
        let items = body.optional_list("tools", &mut self.errors)?;
        let path = body.child("tools");

        let mut tools = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            tools.extend(self.resolve_tool(item, path.index(i), depth));
        }
        Some(tools)
    }

    /// Tool entries are keyed by tool type; capability and agent keys never overlap
    fn resolve_tool(&mut self, raw: &Value, path: FieldPath, depth: usize) -> Option<ToolEntry> {
        let entry = Fields::open(raw, path, &mut self.errors)?;
        let keys: Vec<&str> = entry.populated_keys().collect();

        let [key] = keys.as_slice() else {
            let reason = if keys.is_empty() {
                "tool entry does not configure any tool".to_string()
            } else {
                format!("tool entry configures more than one tool: {}", keys.join(", "))
            };
            self.errors.push(FieldError::ambiguous(entry.path(), reason));
            return None;
        };

        let raw_body = entry.get(key)?;
        let body_path = entry.child(key);

        if let Some(tool_type) = ToolType::from_key(key) {
            return Tool::parse(raw_body, body_path, &mut self.errors)
                .map(|tool| ToolEntry::capability(tool_type, tool));
        }

        let Some(kind) = AgentKind::from_key(key) else {
            self.errors.push(FieldError::ambiguous(
                &body_path,
                format!("unknown tool type '{}'", key),
            ));
            return None;
        };

        let body = Fields::open(raw_body, body_path, &mut self.errors)?;
        let use_for = body.required_str("use_for", &mut self.errors);
        let agent = self.resolve_agent(kind, &body, depth + 1);

        Some(ToolEntry::Agent(AgentTool::new(use_for?, agent?)))
    }

    /// `superrag` and the legacy `data` spelling of a superagent
    fn resolve_knowledge(&mut self, body: &Fields<'_>) -> Option<Knowledge> {
        let data_path = body.child("data");

        match (body.get("superrag"), body.get("data")) {
            (Some(_), Some(_)) => {
                self.errors.push(FieldError::ambiguous(
                    &data_path,
                    "`data` and `superrag` cannot both be set; move `data` into `superrag`",
                ));
                None
            }
            (None, Some(raw)) => {
                self.advisories.push(Advisory::deprecated(
                    &data_path,
                    "`data` is deprecated; use `superrag` instead",
                ));
                Data::parse(raw, data_path, &mut self.errors).map(Knowledge::Data)
            }
            (Some(_), None) => body
                .optional_list("superrag", &mut self.errors)
                .and_then(|items| Superrag::parse(items, &body.child("superrag"), &mut self.errors))
                .map(Knowledge::Superrag),
            (None, None) => None,
        }
    }

    fn check_model(&mut self, kind: AgentKind, assistant: &Assistant, body: &Fields<'_>) {
        let path = body.child("llm");
        let model = assistant.llm.as_str();

        let failure = match kind.model_check() {
            ModelCheck::Unchecked => None,
            ModelCheck::AnyProvider => self.catalog.provider_of(model).is_none().then(|| {
                FieldError::unknown_model(
                    &path,
                    model,
                    format!("model '{}' is not in the model catalog", model),
                )
            }),
            ModelCheck::Required(provider) => {
                if !self.catalog.providers().contains(&provider) {
                    Some(FieldError::unknown_provider(&path, provider))
                } else if !self.catalog.is_valid_model(provider, model) {
                    Some(FieldError::unknown_model(
                        &path,
                        model,
                        format!("model '{}' is not available for provider {}", model, provider),
                    ))
                } else {
                    None
                }
            }
            ModelCheck::IfListed(provider) => {
                if !self.catalog.providers().contains(&provider) {
                    debug!(%provider, %path, "provider not in catalog, skipping model check");
                    None
                } else if !self.catalog.is_valid_model(provider, model) {
                    Some(FieldError::unknown_model(
                        &path,
                        model,
                        format!("model '{}' is not available for provider {}", model, provider),
                    ))
                } else {
                    None
                }
            }
        };

        let Some(failure) = failure else {
            return;
        };

        if self.options.enforce_model_catalog {
            self.errors.push(failure);
        } else {
            self.advisories.push(Advisory::new(
                AdvisoryKind::UnverifiedModel,
                &path,
                failure.reason,
            ));
        }
    }
}

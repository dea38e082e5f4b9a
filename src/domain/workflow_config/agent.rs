//! Agent variants, one concrete shape per provider key

use std::fmt;

use serde::Serialize;

use super::assistant::Assistant;
use super::superrag::{Knowledge, Superrag, SuperragIndex};
use super::tool::ToolEntry;
use crate::domain::catalog::LlmProvider;

/// Key selecting an agent variant in a step or tool entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Superagent,
    OpenaiAssistant,
    Perplexity,
    TogetherAi,
    Bedrock,
    Groq,
    Mistral,
    CohereChat,
    Anthropic,

    /// Deprecated generic LLM key, superseded by the provider keys
    Llm,
}

/// How an agent's `llm` is checked against the model catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelCheck {
    /// Must be registered under some provider
    AnyProvider,

    /// Must be registered under this provider, which the catalog must list
    Required(LlmProvider),

    /// Checked only when the catalog lists this provider
    IfListed(LlmProvider),

    Unchecked,
}

impl AgentKind {
    pub const ALL: [AgentKind; 10] = [
        Self::Superagent,
        Self::OpenaiAssistant,
        Self::Perplexity,
        Self::TogetherAi,
        Self::Bedrock,
        Self::Groq,
        Self::Mistral,
        Self::CohereChat,
        Self::Anthropic,
        Self::Llm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Superagent => "superagent",
            Self::OpenaiAssistant => "openai_assistant",
            Self::Perplexity => "perplexity",
            Self::TogetherAi => "together_ai",
            Self::Bedrock => "bedrock",
            Self::Groq => "groq",
            Self::Mistral => "mistral",
            Self::CohereChat => "cohere_chat",
            Self::Anthropic => "anthropic",
            Self::Llm => "llm",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == key)
    }

    pub fn is_deprecated(&self) -> bool {
        matches!(self, Self::Llm)
    }

    /// Provider backing an OSS provider key
    pub fn provider(&self) -> Option<LlmProvider> {
        match self {
            Self::Perplexity => Some(LlmProvider::Perplexity),
            Self::TogetherAi => Some(LlmProvider::TogetherAi),
            Self::Bedrock => Some(LlmProvider::Bedrock),
            Self::Groq => Some(LlmProvider::Groq),
            Self::Mistral => Some(LlmProvider::Mistral),
            Self::CohereChat => Some(LlmProvider::CohereChat),
            Self::Anthropic => Some(LlmProvider::Anthropic),
            Self::OpenaiAssistant => Some(LlmProvider::OpenAi),
            Self::Superagent | Self::Llm => None,
        }
    }

    pub fn model_check(&self) -> ModelCheck {
        match self {
            Self::Superagent => ModelCheck::AnyProvider,
            Self::OpenaiAssistant => ModelCheck::Required(LlmProvider::OpenAi),
            Self::Llm => ModelCheck::Unchecked,
            other => other
                .provider()
                .map_or(ModelCheck::Unchecked, ModelCheck::IfListed),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Superagent-native agent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuperagentAgent {
    #[serde(flatten)]
    pub assistant: Assistant,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolEntry>>,

    /// Either `superrag` or the legacy `data` block
    #[serde(flatten)]
    pub knowledge: Option<Knowledge>,
}

impl SuperagentAgent {
    pub fn new(assistant: Assistant) -> Self {
        Self {
            assistant,
            tools: None,
            knowledge: None,
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolEntry>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_knowledge(mut self, knowledge: Knowledge) -> Self {
        self.knowledge = Some(knowledge);
        self
    }
}

/// OpenAI-Assistant-backed agent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenAiAgent {
    #[serde(flatten)]
    pub assistant: Assistant,
}

impl OpenAiAgent {
    pub fn new(assistant: Assistant) -> Self {
        Self { assistant }
    }
}

/// Agent backed by a generic LLM provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LlmAgent {
    #[serde(flatten)]
    pub assistant: Assistant,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolEntry>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub superrag: Option<Superrag>,
}

impl LlmAgent {
    pub fn new(assistant: Assistant) -> Self {
        Self {
            assistant,
            tools: None,
            superrag: None,
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolEntry>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_superrag(mut self, superrag: Superrag) -> Self {
        self.superrag = Some(superrag);
        self
    }
}

/// A validated agent configuration.
///
/// Serializes as a single-key mapping (`{"groq": {...}}`), which is exactly
/// the shape of a workflow step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentVariant {
    Superagent(SuperagentAgent),
    OpenaiAssistant(OpenAiAgent),
    Perplexity(LlmAgent),
    TogetherAi(LlmAgent),
    Bedrock(LlmAgent),
    Groq(LlmAgent),
    Mistral(LlmAgent),
    CohereChat(LlmAgent),
    Anthropic(LlmAgent),
    Llm(LlmAgent),
}

/// Borrowed body of an agent variant without its key
#[derive(Serialize)]
#[serde(untagged)]
pub(crate) enum AgentBody<'a> {
    Superagent(&'a SuperagentAgent),
    OpenAi(&'a OpenAiAgent),
    Llm(&'a LlmAgent),
}

impl AgentVariant {
    /// Wrap a generic-provider agent under the given key
    pub(crate) fn from_llm_agent(kind: AgentKind, agent: LlmAgent) -> Option<Self> {
        let variant = match kind {
            AgentKind::Perplexity => Self::Perplexity(agent),
            AgentKind::TogetherAi => Self::TogetherAi(agent),
            AgentKind::Bedrock => Self::Bedrock(agent),
            AgentKind::Groq => Self::Groq(agent),
            AgentKind::Mistral => Self::Mistral(agent),
            AgentKind::CohereChat => Self::CohereChat(agent),
            AgentKind::Anthropic => Self::Anthropic(agent),
            AgentKind::Llm => Self::Llm(agent),
            AgentKind::Superagent | AgentKind::OpenaiAssistant => return None,
        };
        Some(variant)
    }

    pub fn kind(&self) -> AgentKind {
        match self {
            Self::Superagent(_) => AgentKind::Superagent,
            Self::OpenaiAssistant(_) => AgentKind::OpenaiAssistant,
            Self::Perplexity(_) => AgentKind::Perplexity,
            Self::TogetherAi(_) => AgentKind::TogetherAi,
            Self::Bedrock(_) => AgentKind::Bedrock,
            Self::Groq(_) => AgentKind::Groq,
            Self::Mistral(_) => AgentKind::Mistral,
            Self::CohereChat(_) => AgentKind::CohereChat,
            Self::Anthropic(_) => AgentKind::Anthropic,
            Self::Llm(_) => AgentKind::Llm,
        }
    }

    pub fn assistant(&self) -> &Assistant {
        match self.body() {
            AgentBody::Superagent(agent) => &agent.assistant,
            AgentBody::OpenAi(agent) => &agent.assistant,
            AgentBody::Llm(agent) => &agent.assistant,
        }
    }

    pub fn name(&self) -> &str {
        &self.assistant().name
    }

    /// Tools in declaration order; empty for variants without tools
    pub fn tools(&self) -> &[ToolEntry] {
        let tools = match self.body() {
            AgentBody::Superagent(agent) => agent.tools.as_deref(),
            AgentBody::OpenAi(_) => None,
            AgentBody::Llm(agent) => agent.tools.as_deref(),
        };
        tools.unwrap_or_default()
    }

    pub fn superrag_indexes(&self) -> &[SuperragIndex] {
        match self.body() {
            AgentBody::Superagent(agent) => agent
                .knowledge
                .as_ref()
                .map(Knowledge::indexes)
                .unwrap_or_default(),
            AgentBody::OpenAi(_) => &[],
            AgentBody::Llm(agent) => agent
                .superrag
                .as_ref()
                .map(Superrag::indexes)
                .unwrap_or_default(),
        }
    }

    /// Depth of agent nesting, counting this agent as 1
    pub fn depth(&self) -> usize {
        1 + self
            .tools()
            .iter()
            .filter_map(ToolEntry::as_agent)
            .map(|tool| tool.agent.depth())
            .max()
            .unwrap_or(0)
    }

    pub(crate) fn body(&self) -> AgentBody<'_> {
        match self {
            Self::Superagent(agent) => AgentBody::Superagent(agent),
            Self::OpenaiAssistant(agent) => AgentBody::OpenAi(agent),
            Self::Perplexity(agent)
            | Self::TogetherAi(agent)
            | Self::Bedrock(agent)
            | Self::Groq(agent)
            | Self::Mistral(agent)
            | Self::CohereChat(agent)
            | Self::Anthropic(agent)
            | Self::Llm(agent) => AgentBody::Llm(agent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::workflow_config::{AgentTool, Data, IndexName, Tool, ToolType};
    use serde_json::json;

    fn assistant(name: &str) -> Assistant {
        Assistant::new(name, "GPT_4_0613", "prompt")
    }

    #[test]
    fn test_agent_kind_keys() {
        for kind in AgentKind::ALL {
            assert_eq!(AgentKind::from_key(kind.as_str()), Some(kind));
        }
        assert_eq!(AgentKind::from_key("browser"), None);
        assert!(AgentKind::Llm.is_deprecated());
        assert!(!AgentKind::Groq.is_deprecated());
    }

    #[test]
    fn test_model_check_policy() {
        assert_eq!(AgentKind::Superagent.model_check(), ModelCheck::AnyProvider);
        assert_eq!(
            AgentKind::OpenaiAssistant.model_check(),
            ModelCheck::Required(LlmProvider::OpenAi)
        );
        assert_eq!(
            AgentKind::CohereChat.model_check(),
            ModelCheck::IfListed(LlmProvider::CohereChat)
        );
        assert_eq!(AgentKind::Llm.model_check(), ModelCheck::Unchecked);
    }

    #[test]
    fn test_variant_serializes_under_its_key() {
        let variant = AgentVariant::TogetherAi(LlmAgent::new(assistant("a")));

        assert_eq!(variant.kind(), AgentKind::TogetherAi);
        assert_eq!(
            serde_json::to_value(&variant).unwrap(),
            json!({"together_ai": {"name": "a", "llm": "GPT_4_0613", "prompt": "prompt"}})
        );
    }

    #[test]
    fn test_superagent_knowledge_is_flattened() {
        let variant = AgentVariant::Superagent(SuperagentAgent::new(assistant("a")).with_knowledge(
            Knowledge::Data(Data {
                urls: vec!["u".into()],
                use_for: "x".into(),
            }),
        ));

        let json = serde_json::to_value(&variant).unwrap();
        assert_eq!(json["superagent"]["data"], json!({"urls": ["u"], "use_for": "x"}));
        assert!(json["superagent"].get("knowledge").is_none());
        assert!(variant.superrag_indexes().is_empty());
    }

    #[test]
    fn test_accessors() {
        let index = SuperragIndex::new(IndexName::new("idx").unwrap(), vec![], "x");
        let variant = AgentVariant::Groq(
            LlmAgent::new(assistant("outer"))
                .with_tools(vec![ToolEntry::capability(
                    ToolType::Http,
                    Tool::new("http", "calling apis"),
                )])
                .with_superrag(Superrag(vec![index])),
        );

        assert_eq!(variant.name(), "outer");
        assert_eq!(variant.tools().len(), 1);
        assert_eq!(variant.superrag_indexes().len(), 1);
        assert_eq!(variant.depth(), 1);
    }

    #[test]
    fn test_depth_counts_nested_agents() {
        let inner = AgentVariant::OpenaiAssistant(OpenAiAgent::new(assistant("inner")));
        let middle = AgentVariant::Llm(
            LlmAgent::new(assistant("middle"))
                .with_tools(vec![ToolEntry::Agent(AgentTool::new("x", inner))]),
        );
        let outer = AgentVariant::Superagent(
            SuperagentAgent::new(assistant("outer"))
                .with_tools(vec![ToolEntry::Agent(AgentTool::new("y", middle))]),
        );

        assert_eq!(outer.depth(), 3);
    }

    #[test]
    fn test_from_llm_agent_rejects_dedicated_kinds() {
        let agent = LlmAgent::new(assistant("a"));
        assert!(AgentVariant::from_llm_agent(AgentKind::Superagent, agent.clone()).is_none());
        assert_eq!(
            AgentVariant::from_llm_agent(AgentKind::Mistral, agent).map(|v| v.kind()),
            Some(AgentKind::Mistral)
        );
    }
}

//! Tool entries: built-in capabilities and agents exposed as tools

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::agent::{AgentBody, AgentVariant};
use super::error::{FieldError, FieldErrors};
use super::path::FieldPath;
use super::reader::{checked, Fields};

/// Built-in capability an agent may invoke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolType {
    Browser,
    CodeExecutor,
    HandOff,
    Http,
    BingSearch,
    Replicate,
    Algolia,
    Metaphor,
    Function,
    Research,
    Sec,
    Scraper,
    AdvancedScraper,
    GoogleSearch,

    // OpenAI Assistant tools
    CodeInterpreter,
    Retrieval,
}

impl ToolType {
    pub const ALL: [ToolType; 16] = [
        Self::Browser,
        Self::CodeExecutor,
        Self::HandOff,
        Self::Http,
        Self::BingSearch,
        Self::Replicate,
        Self::Algolia,
        Self::Metaphor,
        Self::Function,
        Self::Research,
        Self::Sec,
        Self::Scraper,
        Self::AdvancedScraper,
        Self::GoogleSearch,
        Self::CodeInterpreter,
        Self::Retrieval,
    ];

    /// Key naming this tool inside a tool entry
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::CodeExecutor => "code_executor",
            Self::HandOff => "hand_off",
            Self::Http => "http",
            Self::BingSearch => "bing_search",
            Self::Replicate => "replicate",
            Self::Algolia => "algolia",
            Self::Metaphor => "metaphor",
            Self::Function => "function",
            Self::Research => "research",
            Self::Sec => "sec",
            Self::Scraper => "scraper",
            Self::AdvancedScraper => "advanced_scraper",
            Self::GoogleSearch => "google_search",
            Self::CodeInterpreter => "code_interpreter",
            Self::Retrieval => "retrieval",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == key)
    }
}

impl fmt::Display for ToolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration of a capability tool
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tool {
    pub name: String,
    pub use_for: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl Tool {
    pub fn new(name: impl Into<String>, use_for: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            use_for: use_for.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn from_value(raw: &Value) -> Result<Self, FieldErrors> {
        let mut errors = Vec::new();
        match Self::parse(raw, FieldPath::root(), &mut errors) {
            Some(tool) if errors.is_empty() => Ok(tool),
            _ => Err(FieldErrors(errors)),
        }
    }

    pub(crate) fn parse(
        raw: &Value,
        path: FieldPath,
        errors: &mut Vec<FieldError>,
    ) -> Option<Self> {
        checked(errors, |errors| {
            let fields = Fields::open(raw, path, errors)?;
            let name = fields.required_str("name", errors);
            let use_for = fields.required_str("use_for", errors);
            let metadata = fields.optional_object("metadata", errors);

            Some(Self {
                name: name?,
                use_for: use_for?,
                metadata,
            })
        })
    }
}

/// An agent callable as a tool of another agent
#[derive(Debug, Clone, PartialEq)]
pub struct AgentTool {
    pub use_for: String,
    pub agent: AgentVariant,
}

impl AgentTool {
    pub fn new(use_for: impl Into<String>, agent: AgentVariant) -> Self {
        Self {
            use_for: use_for.into(),
            agent,
        }
    }
}

/// One entry of an agent's `tools` list.
///
/// On the wire each entry is a single-key mapping whose key names either a
/// capability (`{"browser": {...}}`) or an agent kind (`{"superagent": {...}}`).
#[derive(Debug, Clone, PartialEq)]
pub enum ToolEntry {
    Capability { tool_type: ToolType, tool: Tool },
    Agent(AgentTool),
}

impl ToolEntry {
    pub fn capability(tool_type: ToolType, tool: Tool) -> Self {
        Self::Capability { tool_type, tool }
    }

    /// Key the entry is stored under
    pub fn key(&self) -> &'static str {
        match self {
            Self::Capability { tool_type, .. } => tool_type.as_str(),
            Self::Agent(agent_tool) => agent_tool.agent.kind().as_str(),
        }
    }

    pub fn use_for(&self) -> &str {
        match self {
            Self::Capability { tool, .. } => &tool.use_for,
            Self::Agent(agent_tool) => &agent_tool.use_for,
        }
    }

    pub fn as_agent(&self) -> Option<&AgentTool> {
        match self {
            Self::Agent(agent_tool) => Some(agent_tool),
            Self::Capability { .. } => None,
        }
    }
}

#[derive(Serialize)]
struct AgentToolBody<'a> {
    #[serde(flatten)]
    agent: AgentBody<'a>,
    use_for: &'a str,
}

impl Serialize for ToolEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::Capability { tool_type, tool } => {
                map.serialize_entry(tool_type.as_str(), tool)?;
            }
            Self::Agent(agent_tool) => {
                let body = AgentToolBody {
                    agent: agent_tool.agent.body(),
                    use_for: &agent_tool.use_for,
                };
                map.serialize_entry(agent_tool.agent.kind().as_str(), &body)?;
            }
        }
        map.end()
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tool::{ToolCall, ToolSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Which tier or fallback strategy produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    OnDevice,
    Cloud,
    FallbackHeuristic,
    DemoMode,
    Unknown,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::OnDevice => "on-device",
            Source::Cloud => "cloud",
            Source::FallbackHeuristic => "fallback-heuristic",
            Source::DemoMode => "demo-mode",
            Source::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub messages: Vec<Message>,
    pub tools: Vec<ToolSpec>,
}

impl GenerationRequest {
    pub fn new(utterance: impl Into<String>, tools: Vec<ToolSpec>) -> Self {
        Self {
            messages: vec![Message::user(utterance)],
            tools,
        }
    }

    pub fn tool(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.iter().find(|t| t.name == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub source: Source,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerationResult {
    /// Tool calls take precedence over text whenever the sequence is non-empty.
    pub fn calls(&self) -> &[ToolCall] {
        self.tool_calls.as_deref().unwrap_or_default()
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.calls().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Partial,
    Error,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    #[default]
    Email,
    Message,
    Linkedin,
    Call,
}

impl ActionType {
    /// Unrecognised values map to email rather than failing.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "message" | "text" | "dm" => ActionType::Message,
            "linkedin" | "connect" => ActionType::Linkedin,
            "call" | "phone" => ActionType::Call,
            _ => ActionType::Email,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Email => "email",
            ActionType::Message => "message",
            ActionType::Linkedin => "linkedin",
            ActionType::Call => "call",
        }
    }
}

pub const DEFAULT_TOPIC: &str = "our conversation";
pub const DEFAULT_ACTION: &str = "schedule a follow-up meeting";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub contact_name: Option<String>,
    pub topic: String,
    pub action: String,
    pub action_type: ActionType,
}

impl Default for Intent {
    fn default() -> Self {
        Self {
            contact_name: None,
            topic: DEFAULT_TOPIC.to_string(),
            action: DEFAULT_ACTION.to_string(),
            action_type: ActionType::Email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FollowupOutput {
    Email {
        to: Option<String>,
        subject: String,
        body: String,
    },
    Message {
        to: String,
        message: String,
    },
    Linkedin {
        to: String,
        message: String,
    },
    Call {
        to: String,
        message: String,
    },
}

impl FollowupOutput {
    pub fn action_type(&self) -> ActionType {
        match self {
            FollowupOutput::Email { .. } => ActionType::Email,
            FollowupOutput::Message { .. } => ActionType::Message,
            FollowupOutput::Linkedin { .. } => ActionType::Linkedin,
            FollowupOutput::Call { .. } => ActionType::Call,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub contact_id: String,
    pub match_score: f64,
    pub match_reason: String,
    pub outreach_angle: String,
    pub source: Source,
}

/// One executed (or attempted) tool call, as reported back to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub tool: String,
    pub args: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub source: Source,
}

impl ToolInvocation {
    pub fn ok(
        tool: &str,
        args: serde_json::Value,
        result: serde_json::Value,
        source: Source,
    ) -> Self {
        Self {
            tool: tool.to_string(),
            args,
            result: Some(result),
            error: None,
            warnings: Vec::new(),
            source,
        }
    }

    pub fn err(tool: &str, args: serde_json::Value, e: impl ToString, source: Source) -> Self {
        Self {
            tool: tool.to_string(),
            args,
            result: None,
            error: Some(e.to_string()),
            warnings: Vec::new(),
            source,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

use async_trait::async_trait;
use mingle_core::{
    ActionType, ContactRecord, Intent, MingleError, ToolArgs, ToolExecutor, ToolSpec,
    DEFAULT_ACTION, DEFAULT_TOPIC,
};
use tracing::info;

use crate::{schema, templates};

/// Typed view of `draft_followup` arguments with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftArgs {
    pub contact_name: Option<String>,
    pub topic: String,
    pub action: String,
    pub action_type: ActionType,
}

impl DraftArgs {
    pub fn from_args(args: &ToolArgs) -> Self {
        Self {
            contact_name: args.opt_str("contact_name").or_else(|| args.opt_str("to_name")),
            topic: args.str_or("topic", DEFAULT_TOPIC),
            action: args.str_or("action", DEFAULT_ACTION),
            action_type: args
                .opt_str("action_type")
                .map(|t| ActionType::parse_lenient(&t))
                .unwrap_or_default(),
        }
    }

    pub fn into_intent(self) -> Intent {
        Intent {
            contact_name: self.contact_name,
            topic: self.topic,
            action: self.action,
            action_type: self.action_type,
        }
    }
}

/// Renders a follow-up from tier-supplied arguments. The recipient is not
/// resolved here; callers address the draft once a lookup has succeeded.
pub struct DraftFollowupTool;

#[async_trait]
impl ToolExecutor for DraftFollowupTool {
    fn spec(&self) -> ToolSpec {
        schema::draft_followup()
    }

    async fn execute(&self, args: &ToolArgs) -> Result<serde_json::Value, MingleError> {
        let intent = DraftArgs::from_args(args).into_intent();
        info!("DRAFT_TOOL: Rendering {} follow-up", intent.action_type.as_str());

        let unresolved = ContactRecord::missing(intent.contact_name.as_deref().unwrap_or_default());
        let output = templates::render(intent.action_type, &unresolved, &intent);
        Ok(serde_json::to_value(output)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mingle_core::FollowupOutput;
    use serde_json::json;

    #[test]
    fn test_draft_args_defaults() {
        let args =
            DraftArgs::from_args(&ToolArgs::from_value(json!({"topic": 7, "action_type": "sms?"})));
        assert_eq!(args.contact_name, None);
        assert_eq!(args.topic, "7");
        assert_eq!(args.action, DEFAULT_ACTION);
        assert_eq!(args.action_type, ActionType::Email);
    }

    #[test]
    fn test_draft_args_accepts_legacy_to_name() {
        let args = DraftArgs::from_args(&ToolArgs::from_value(json!({"to_name": "Maya"})));
        assert_eq!(args.contact_name.as_deref(), Some("Maya"));
    }

    #[tokio::test]
    async fn test_draft_tool_renders_requested_type() {
        let args = ToolArgs::from_value(json!({
            "contact_name": "Maya",
            "topic": "design systems",
            "action": "grab coffee",
            "action_type": "message",
        }));
        let value = DraftFollowupTool.execute(&args).await.unwrap();
        let output: FollowupOutput = serde_json::from_value(value).unwrap();
        assert_eq!(
            output,
            FollowupOutput::Message {
                to: "Maya".into(),
                message: "Hi Maya! Great meeting you and chatting about design systems. \
                          I'd love to grab coffee. Are you free sometime next week?"
                    .into(),
            }
        );
    }
}

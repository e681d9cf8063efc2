//! Single-shot profile tasks: bio summaries and outreach drafts.

use std::sync::Arc;

use mingle_core::{Profile, Source};
use mingle_tools::{schema, CaptureTool, ToolRegistry};
use serde::Serialize;
use tracing::info;

use crate::orchestrator::Orchestrator;
use crate::prompts;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BioSummary {
    pub bio_summary: String,
    pub source: Source,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutreachDraft {
    pub message: String,
    pub source: Source,
}

pub struct ProfileAssistant {
    orchestrator: Orchestrator,
    bio_tools: ToolRegistry,
    outreach_tools: ToolRegistry,
}

impl ProfileAssistant {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator,
            bio_tools: ToolRegistry::new()
                .with(Arc::new(CaptureTool::new(schema::generate_bio_summary()))),
            outreach_tools: ToolRegistry::new()
                .with(Arc::new(CaptureTool::new(schema::draft_outreach_message()))),
        }
    }

    /// Falls back to "{role} at {company}" when no tier supplies a summary.
    pub async fn summarize_bio(&self, profile: &Profile) -> BioSummary {
        let prompt = prompts::bio_summary(
            &profile.name,
            &profile.role,
            &profile.company,
            &profile.skills,
            &profile.looking_for,
        );
        let dispatch = self.orchestrator.run(&prompt, &self.bio_tools).await;

        let summary = dispatch
            .first_result(schema::GENERATE_BIO_SUMMARY)
            .and_then(|args| args.opt_str("bio_summary"));
        info!(
            "PROFILE: Bio summary via {} (generated: {})",
            dispatch.source(),
            summary.is_some()
        );

        BioSummary {
            bio_summary: summary
                .unwrap_or_else(|| format!("{} at {}", profile.role, profile.company)),
            source: dispatch.source(),
        }
    }

    pub async fn draft_outreach(
        &self,
        sender: &Profile,
        recipient: &Profile,
        context: Option<&str>,
    ) -> OutreachDraft {
        let context = context
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_context(sender, recipient));

        let prompt = prompts::outreach(sender, recipient, &context);
        let dispatch = self.orchestrator.run(&prompt, &self.outreach_tools).await;

        let message = dispatch
            .first_result(schema::DRAFT_OUTREACH_MESSAGE)
            .and_then(|args| args.opt_str("message"));
        info!(
            "PROFILE: Outreach draft via {} (generated: {})",
            dispatch.source(),
            message.is_some()
        );

        OutreachDraft {
            message: message.unwrap_or_else(|| fallback_outreach(sender, recipient)),
            source: dispatch.source(),
        }
    }
}

fn default_context(sender: &Profile, recipient: &Profile) -> String {
    let topic = if recipient.looking_for.is_empty() {
        "professional collaboration".to_string()
    } else {
        recipient.looking_for.join(", ")
    };
    format!("{} wants to connect with {} about {}.", sender.name, recipient.name, topic)
}

fn fallback_outreach(sender: &Profile, recipient: &Profile) -> String {
    format!(
        "Hi {}, I came across your profile and was really impressed by your work at {}. \
         I'm {}, {} at {}, and I'd love to connect!",
        recipient.name, recipient.company, sender.name, sender.role, sender.company
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTier;
    use mingle_core::ToolCall;
    use serde_json::json;

    fn person(name: &str, role: &str, company: &str) -> Profile {
        Profile {
            name: name.into(),
            role: role.into(),
            company: company.into(),
            ..Profile::default()
        }
    }

    #[tokio::test]
    async fn test_summary_from_tier() {
        let tier = ScriptedTier::calls(
            Source::OnDevice,
            vec![ToolCall::new(
                "generate_bio_summary",
                json!({"bio_summary": "Design lead building Figma's systems."}),
            )],
        );
        let assistant = ProfileAssistant::new(Orchestrator::new(Arc::new(tier)));

        let summary = assistant.summarize_bio(&person("Maya", "Design Lead", "Figma")).await;
        assert_eq!(summary.bio_summary, "Design lead building Figma's systems.");
        assert_eq!(summary.source, Source::OnDevice);
    }

    #[tokio::test]
    async fn test_summary_fallback_and_prompt() {
        let tier = Arc::new(ScriptedTier::failing("offline"));
        let assistant = ProfileAssistant::new(Orchestrator::new(tier.clone()));

        let summary = assistant.summarize_bio(&person("Maya", "Design Lead", "Figma")).await;
        assert_eq!(summary.bio_summary, "Design Lead at Figma");
        assert_eq!(summary.source, Source::Unknown);
        assert_eq!(
            tier.prompts(),
            vec!["Summarize: Maya, Design Lead at Figma. Skills: N/A. Looking for: N/A."]
        );
    }

    #[tokio::test]
    async fn test_outreach_default_context() {
        let tier = Arc::new(ScriptedTier::calls(Source::Cloud, vec![]));
        let assistant = ProfileAssistant::new(Orchestrator::new(tier.clone()));
        let sender = person("Sam", "Founder", "Nimbus");
        let mut recipient = person("Maya", "Design Lead", "Figma");

        let draft = assistant.draft_outreach(&sender, &recipient, None).await;
        assert_eq!(draft.source, Source::Cloud);
        assert_eq!(
            draft.message,
            "Hi Maya, I came across your profile and was really impressed by your work at Figma. \
             I'm Sam, Founder at Nimbus, and I'd love to connect!"
        );
        let expected = "Context: Sam wants to connect with Maya about professional collaboration.";
        assert!(tier.prompts()[0].ends_with(expected));

        recipient.looking_for = vec!["investors".into(), "advisors".into()];
        assistant.draft_outreach(&sender, &recipient, Some("  ")).await;
        assert!(tier.prompts()[1].ends_with("about investors, advisors."));
    }

    #[tokio::test]
    async fn test_outreach_uses_drafted_message_and_given_context() {
        let tier = Arc::new(ScriptedTier::calls(
            Source::Cloud,
            vec![ToolCall::new(
                "draft_outreach_message",
                json!({"message": "Hey Maya, loved your talk!"}),
            )],
        ));
        let assistant = ProfileAssistant::new(Orchestrator::new(tier.clone()));

        let sender = person("Sam", "Founder", "Nimbus");
        let recipient = person("Maya", "Lead", "Figma");
        let draft = assistant
            .draft_outreach(&sender, &recipient, Some("Met at Config"))
            .await;
        assert_eq!(draft.message, "Hey Maya, loved your talk!");
        assert!(tier.prompts()[0].ends_with("Context: Met at Config"));
    }
}

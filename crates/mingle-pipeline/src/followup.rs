//! Voice-note follow-up: transcript in, addressed follow-up draft out.
//!
//! The fallback chain is an explicit state machine:
//!
//! ```text
//! Primary ──tool calls──────────────▶ FallbackTemplate ──▶ Done
//!    │ no tool calls                     ▲
//!    ├──────────────▶ FallbackHeuristic ─┘
//!    │ tier error          │ lookup error
//!    └──(demo-mode)──▶     └──────────────▶ Error ──▶ Done
//! ```

use std::sync::Arc;

use mingle_core::{
    ActionType, ContactRecord, FollowupOutput, Intent, Source, Status, ToolArgs, ToolInvocation,
};
use mingle_tools::{schema, templates, IntentExtractor, ToolRegistry};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::orchestrator::{Dispatch, Orchestrator};
use crate::prompts;

#[derive(Debug, Clone, Serialize)]
pub struct FollowupResponse {
    pub transcript: String,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_role: Option<String>,
    pub contact_company: Option<String>,
    pub action_type: Option<ActionType>,
    pub followup: Option<FollowupOutput>,
    pub source: Source,
    pub tool_calls: Vec<ToolInvocation>,
    pub status: Status,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum Stage {
    Primary,
    FallbackHeuristic,
    FallbackTemplate { intent: Intent },
    Error,
    Done,
}

/// Everything gathered while walking the state machine.
struct Progress {
    source: Source,
    contact: Option<ContactRecord>,
    followup: Option<FollowupOutput>,
    log: Vec<ToolInvocation>,
    causes: Vec<String>,
    failed: bool,
}

impl Progress {
    fn new() -> Self {
        Self {
            source: Source::Unknown,
            contact: None,
            followup: None,
            log: Vec::new(),
            causes: Vec::new(),
            failed: false,
        }
    }

    fn found_contact(&self) -> Option<&ContactRecord> {
        self.contact.as_ref().filter(|c| c.found())
    }
}

pub struct FollowupAgent {
    orchestrator: Orchestrator,
    registry: ToolRegistry,
    extractor: Arc<dyn IntentExtractor>,
}

impl FollowupAgent {
    /// `registry` must provide `lookup_contact` and `draft_followup`.
    pub fn new(
        orchestrator: Orchestrator,
        registry: ToolRegistry,
        extractor: Arc<dyn IntentExtractor>,
    ) -> Self {
        Self {
            orchestrator,
            registry,
            extractor,
        }
    }

    pub async fn process(&self, transcript: &str) -> FollowupResponse {
        info!("FOLLOWUP: Processing voice note ({} chars)", transcript.len());

        let mut progress = Progress::new();
        let mut stage = Stage::Primary;

        while stage != Stage::Done {
            let next = match stage {
                Stage::Primary => self.primary(transcript, &mut progress).await,
                Stage::FallbackHeuristic => self.heuristic(transcript, &mut progress).await,
                Stage::FallbackTemplate { ref intent } => Self::template(intent, &mut progress),
                Stage::Error => {
                    progress.failed = true;
                    Stage::Done
                }
                Stage::Done => Stage::Done,
            };
            info!("FOLLOWUP: {} -> {}", stage_name(&stage), stage_name(&next));
            stage = next;
        }

        Self::finish(transcript, progress)
    }

    async fn primary(&self, transcript: &str, progress: &mut Progress) -> Stage {
        let dispatch = self
            .orchestrator
            .run(&prompts::voice_note(transcript), &self.registry)
            .await;

        match dispatch {
            Dispatch::Executed { source, invocations, .. } => {
                progress.source = source;
                Self::absorb(&invocations, progress);
                progress.log.extend(invocations);

                let intent = Intent {
                    contact_name: progress
                        .contact
                        .as_ref()
                        .and_then(|c| c.contact().map(|c| c.name.clone())),
                    ..Intent::default()
                };
                Stage::FallbackTemplate { intent }
            }
            Dispatch::NoToolCalls { .. } => {
                progress.source = Source::FallbackHeuristic;
                Stage::FallbackHeuristic
            }
            Dispatch::Unavailable { cause } => {
                progress.source = Source::DemoMode;
                progress.causes.push(format!("API: {cause}"));
                Stage::FallbackHeuristic
            }
        }
    }

    /// Keeps the first found contact (or the last miss) and the last draft.
    /// Failed calls are reported as causes.
    fn absorb(invocations: &[ToolInvocation], progress: &mut Progress) {
        for inv in invocations {
            if let Some(error) = &inv.error {
                progress.causes.push(format!("{}: {}", inv.tool, error));
                continue;
            }
            let Some(result) = inv.result.clone() else {
                continue;
            };
            match inv.tool.as_str() {
                schema::LOOKUP_CONTACT if progress.found_contact().is_none() => {
                    match serde_json::from_value::<ContactRecord>(result) {
                        Ok(record) => progress.contact = Some(record),
                        Err(e) => warn!("FOLLOWUP: Unreadable lookup result: {}", e),
                    }
                }
                schema::DRAFT_FOLLOWUP => match serde_json::from_value::<FollowupOutput>(result) {
                    Ok(output) => progress.followup = Some(output),
                    Err(e) => warn!("FOLLOWUP: Unreadable draft result: {}", e),
                },
                _ => {}
            }
        }
    }

    async fn heuristic(&self, transcript: &str, progress: &mut Progress) -> Stage {
        let intent = self.extractor.extract(transcript);
        info!(
            "FOLLOWUP: Heuristic intent: name={:?}, action_type={}",
            intent.contact_name,
            intent.action_type.as_str()
        );
        progress.log.push(ToolInvocation::ok(
            "extract_intent",
            json!({ "transcript": transcript }),
            json!(intent),
            progress.source,
        ));

        let Some(name) = intent.contact_name.clone() else {
            return Stage::FallbackTemplate { intent };
        };

        let args = ToolArgs::new().with("name", name);
        match self.registry.execute(schema::LOOKUP_CONTACT, &args).await {
            Ok(value) => {
                progress.log.push(ToolInvocation::ok(
                    schema::LOOKUP_CONTACT,
                    args.to_value(),
                    value.clone(),
                    progress.source,
                ));
                match serde_json::from_value::<ContactRecord>(value) {
                    Ok(record) => progress.contact = Some(record),
                    Err(e) => warn!("FOLLOWUP: Unreadable lookup result: {}", e),
                }
                Stage::FallbackTemplate { intent }
            }
            Err(e) => {
                warn!("FOLLOWUP: Fallback lookup failed: {}", e);
                progress.log.push(ToolInvocation::err(
                    schema::LOOKUP_CONTACT,
                    args.to_value(),
                    &e,
                    progress.source,
                ));
                progress.causes.push(format!("Fallback: {e}"));
                Stage::Error
            }
        }
    }

    fn template(intent: &Intent, progress: &mut Progress) -> Stage {
        if progress.followup.is_some() {
            return Stage::Done;
        }

        let Some(contact) = progress.found_contact() else {
            info!("FOLLOWUP: No contact resolved, nothing to draft");
            return Stage::Done;
        };

        let output = templates::render(intent.action_type, contact, intent);
        progress.log.push(ToolInvocation::ok(
            "render_template",
            json!({
                "action_type": intent.action_type,
                "topic": intent.topic,
                "action": intent.action
            }),
            json!(output),
            progress.source,
        ));
        progress.followup = Some(output);
        Stage::Done
    }

    fn finish(transcript: &str, progress: Progress) -> FollowupResponse {
        let error = (!progress.causes.is_empty()).then(|| progress.causes.join(", "));

        if progress.failed {
            return FollowupResponse {
                transcript: transcript.to_string(),
                contact_name: None,
                contact_email: None,
                contact_role: None,
                contact_company: None,
                action_type: None,
                followup: None,
                source: progress.source,
                tool_calls: progress.log,
                status: Status::Error,
                error,
            };
        }

        let contact = progress.contact.unwrap_or_else(|| ContactRecord::missing(""));
        let followup = progress.followup.map(|f| templates::address(f, &contact));
        let status = if followup.is_some() { Status::Success } else { Status::Partial };
        let found = contact.contact();

        info!("FOLLOWUP: Finished with {:?} via {}", status, progress.source);

        FollowupResponse {
            transcript: transcript.to_string(),
            contact_name: found.map(|c| c.name.clone()),
            contact_email: found.map(|c| c.email.clone()),
            contact_role: found.map(|c| c.role.clone()),
            contact_company: found.map(|c| c.company.clone()),
            action_type: followup.as_ref().map(|f| f.action_type()),
            followup,
            source: progress.source,
            tool_calls: progress.log,
            status,
            error,
        }
    }
}

fn stage_name(stage: &Stage) -> &'static str {
    match stage {
        Stage::Primary => "Primary",
        Stage::FallbackHeuristic => "FallbackHeuristic",
        Stage::FallbackTemplate { .. } => "FallbackTemplate",
        Stage::Error => "Error",
        Stage::Done => "Done",
    }
}

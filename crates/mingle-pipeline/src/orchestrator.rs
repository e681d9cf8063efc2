use std::sync::Arc;

use mingle_core::{
    GenerationRequest, GenerationTier, Source, ToolArgs, ToolCall, ToolInvocation,
};
use mingle_tools::ToolRegistry;
use tracing::{info, warn};

/// What the primary tier produced, with every requested tool already executed.
#[derive(Debug)]
pub enum Dispatch {
    Executed {
        source: Source,
        invocations: Vec<ToolInvocation>,
        text: Option<String>,
    },
    NoToolCalls {
        source: Source,
        text: Option<String>,
    },
    Unavailable {
        cause: String,
    },
}

impl Dispatch {
    pub fn source(&self) -> Source {
        match self {
            Dispatch::Executed { source, .. } | Dispatch::NoToolCalls { source, .. } => *source,
            Dispatch::Unavailable { .. } => Source::Unknown,
        }
    }

    pub fn invocations(&self) -> &[ToolInvocation] {
        match self {
            Dispatch::Executed { invocations, .. } => invocations,
            _ => &[],
        }
    }

    /// Result of the first successful call to `tool`, as permissive arguments.
    pub fn first_result(&self, tool: &str) -> Option<ToolArgs> {
        self.invocations()
            .iter()
            .filter(|inv| inv.tool == tool && inv.succeeded())
            .find_map(|inv| inv.result.clone())
            .map(ToolArgs::from_value)
    }
}

/// Sends one request to the generation tier and executes the tool calls it
/// returns. Never retries and never raises: tier failures come back as
/// [`Dispatch::Unavailable`] for the caller's fallback to handle.
pub struct Orchestrator {
    tier: Arc<dyn GenerationTier>,
}

impl Orchestrator {
    pub fn new(tier: Arc<dyn GenerationTier>) -> Self {
        Self { tier }
    }

    pub async fn run(&self, utterance: &str, registry: &ToolRegistry) -> Dispatch {
        let request = GenerationRequest::new(utterance, registry.specs());
        self.dispatch(&request, registry).await
    }

    pub async fn dispatch(&self, request: &GenerationRequest, registry: &ToolRegistry) -> Dispatch {
        info!("ORCHESTRATOR: Sending request with {} tool(s)", request.tools.len());

        let result = match self.tier.generate(request).await {
            Ok(result) => result,
            Err(e) => {
                warn!("ORCHESTRATOR: Generation tier unavailable: {}", e);
                return Dispatch::Unavailable { cause: e.to_string() };
            }
        };

        if !result.has_tool_calls() {
            info!("ORCHESTRATOR: {} returned no tool calls", result.source);
            return Dispatch::NoToolCalls {
                source: result.source,
                text: result.text,
            };
        }

        let mut invocations = Vec::with_capacity(result.calls().len());
        for call in result.calls() {
            invocations.push(Self::execute_call(request, registry, call, result.source).await);
        }

        let failed = invocations.iter().filter(|i| !i.succeeded()).count();
        info!(
            "ORCHESTRATOR: {} executed {} tool call(s), {} failed",
            result.source,
            invocations.len(),
            failed
        );

        Dispatch::Executed {
            source: result.source,
            invocations,
            text: result.text,
        }
    }

    async fn execute_call(
        request: &GenerationRequest,
        registry: &ToolRegistry,
        call: &ToolCall,
        source: Source,
    ) -> ToolInvocation {
        let args = call.args();
        let raw_args = args.to_value();

        let Some(spec) = request.tool(&call.name).filter(|_| registry.contains(&call.name)) else {
            warn!("ORCHESTRATOR: Tier requested undeclared tool '{}'", call.name);
            return ToolInvocation::err(
                &call.name,
                raw_args,
                format!("Unknown tool: {}", call.name),
                source,
            );
        };

        let missing = spec.missing_required(&args);
        if !missing.is_empty() {
            warn!(
                "ORCHESTRATOR: {} called without required {:?}, using defaults",
                call.name, missing
            );
        }

        let mut invocation = match registry.execute(&call.name, &args).await {
            Ok(value) => ToolInvocation::ok(&call.name, raw_args, value, source),
            Err(e) => {
                warn!("ORCHESTRATOR: {} failed: {}", call.name, e);
                ToolInvocation::err(&call.name, raw_args, e, source)
            }
        };
        invocation.warnings = missing
            .into_iter()
            .map(|key| format!("missing required argument '{key}'"))
            .collect();
        invocation
    }
}

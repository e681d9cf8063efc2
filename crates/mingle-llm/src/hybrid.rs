use async_trait::async_trait;
use mingle_core::{GenerationRequest, GenerationResult, GenerationTier, MingleError};
use tracing::{info, warn};

/// Routes requests on-device first and escalates to the cloud tier when the
/// small model fails or returns nothing usable.
pub struct HybridTier {
    local: Box<dyn GenerationTier>,
    cloud: Option<Box<dyn GenerationTier>>,
}

impl HybridTier {
    pub fn new(local: Box<dyn GenerationTier>, cloud: Option<Box<dyn GenerationTier>>) -> Self {
        Self { local, cloud }
    }

    pub fn has_cloud(&self) -> bool {
        self.cloud.is_some()
    }

    /// With tools declared, usable means at least one call naming a declared
    /// tool. Without tools, any non-empty text counts.
    fn is_usable(request: &GenerationRequest, result: &GenerationResult) -> bool {
        if request.tools.is_empty() {
            return result.text.as_deref().is_some_and(|t| !t.trim().is_empty());
        }
        result.calls().iter().any(|c| request.tool(&c.name).is_some())
    }
}

#[async_trait]
impl GenerationTier for HybridTier {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, MingleError> {
        let local = self.local.generate(request).await;

        if let Ok(result) = &local {
            if Self::is_usable(request, result) {
                info!("HYBRID: Answered on-device ({} tool calls)", result.calls().len());
                return local;
            }
            info!("HYBRID: On-device reply not usable, escalating");
        }
        if let Err(e) = &local {
            warn!("HYBRID: On-device tier failed: {}", e);
        }

        let Some(cloud) = &self.cloud else {
            return local;
        };

        match cloud.generate(request).await {
            Ok(result) => {
                info!("HYBRID: Answered by cloud ({} tool calls)", result.calls().len());
                Ok(result)
            }
            Err(e) => match local {
                // A weak on-device answer still beats no answer.
                Ok(result) => {
                    warn!("HYBRID: Cloud tier failed ({}), keeping on-device reply", e);
                    Ok(result)
                }
                Err(local_err) => Err(MingleError::LlmError(format!(
                    "on-device: {local_err}; cloud: {e}"
                ))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use mingle_core::{ParamType, Source, ToolCall, ToolSpec};
    use serde_json::json;

    struct FixedTier {
        reply: Result<GenerationResult, String>,
        calls: Arc<AtomicUsize>,
    }

    impl FixedTier {
        fn boxed(
            reply: Result<GenerationResult, String>,
        ) -> (Box<dyn GenerationTier>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let tier = Self {
                reply,
                calls: calls.clone(),
            };
            (Box::new(tier), calls)
        }
    }

    #[async_trait]
    impl GenerationTier for FixedTier {
        async fn generate(
            &self,
            _request: &GenerationRequest,
        ) -> Result<GenerationResult, MingleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone().map_err(MingleError::LlmError)
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new(
            "Met Maya",
            vec![ToolSpec::new("lookup_contact", "Look up").param(
                "name",
                ParamType::String,
                "",
                true,
            )],
        )
    }

    fn with_calls(source: Source, calls: Vec<ToolCall>) -> GenerationResult {
        GenerationResult {
            source,
            tool_calls: Some(calls),
            text: None,
        }
    }

    #[tokio::test]
    async fn test_usable_local_reply_skips_cloud() {
        let (local, _) = FixedTier::boxed(Ok(with_calls(
            Source::OnDevice,
            vec![ToolCall::new("lookup_contact", json!({"name": "Maya"}))],
        )));
        let (cloud, cloud_calls) = FixedTier::boxed(Ok(with_calls(Source::Cloud, vec![])));
        let tier = HybridTier::new(local, Some(cloud));

        let result = tier.generate(&request()).await.unwrap();
        assert_eq!(result.source, Source::OnDevice);
        assert_eq!(cloud_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_undeclared_tool_call_escalates() {
        let (local, _) = FixedTier::boxed(Ok(with_calls(
            Source::OnDevice,
            vec![ToolCall::new("send_fax", json!({}))],
        )));
        let (cloud, cloud_calls) = FixedTier::boxed(Ok(with_calls(
            Source::Cloud,
            vec![ToolCall::new("lookup_contact", json!({"name": "Maya"}))],
        )));
        let tier = HybridTier::new(local, Some(cloud));

        let result = tier.generate(&request()).await.unwrap();
        assert_eq!(result.source, Source::Cloud);
        assert_eq!(cloud_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_both_tiers_failing_is_an_error() {
        let (local, _) = FixedTier::boxed(Err("offline".into()));
        let (cloud, _) = FixedTier::boxed(Err("quota".into()));
        let tier = HybridTier::new(local, Some(cloud));

        let err = tier.generate(&request()).await.unwrap_err();
        assert!(err.to_string().contains("offline"));
        assert!(err.to_string().contains("quota"));
    }

    #[tokio::test]
    async fn test_without_cloud_returns_local_reply_as_is() {
        let (local, _) = FixedTier::boxed(Ok(with_calls(Source::OnDevice, vec![])));
        let tier = HybridTier::new(local, None);

        let result = tier.generate(&request()).await.unwrap();
        assert_eq!(result.source, Source::OnDevice);
        assert!(!result.has_tool_calls());
    }
}

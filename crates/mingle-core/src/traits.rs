use async_trait::async_trait;

use crate::{ContactRecord, GenerationRequest, GenerationResult, MingleError, ToolArgs, ToolSpec};

/// A generation backend that may answer with tool calls or plain text.
#[async_trait]
pub trait GenerationTier: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, MingleError>;
}

/// Executes one named tool against its collaborator.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    fn spec(&self) -> ToolSpec;

    async fn execute(&self, args: &ToolArgs) -> Result<serde_json::Value, MingleError>;
}

#[async_trait]
pub trait ContactDirectory: Send + Sync {
    /// A miss is data (`ContactRecord::Missing`), not an error.
    async fn lookup(&self, name: &str) -> Result<ContactRecord, MingleError>;
}

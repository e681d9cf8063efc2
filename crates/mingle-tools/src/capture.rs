use async_trait::async_trait;
use mingle_core::{MingleError, ToolArgs, ToolExecutor, ToolSpec};

/// Executor for structured-output tools: the call's arguments are the result.
pub struct CaptureTool {
    spec: ToolSpec,
}

impl CaptureTool {
    pub fn new(spec: ToolSpec) -> Self {
        Self { spec }
    }
}

#[async_trait]
impl ToolExecutor for CaptureTool {
    fn spec(&self) -> ToolSpec {
        self.spec.clone()
    }

    async fn execute(&self, args: &ToolArgs) -> Result<serde_json::Value, MingleError> {
        Ok(args.to_value())
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use mingle_core::{ContactDirectory, MingleError, ToolArgs, ToolExecutor, ToolSpec};
use tracing::info;

use crate::schema;

pub struct LookupContactTool {
    directory: Arc<dyn ContactDirectory>,
}

impl LookupContactTool {
    pub fn new(directory: Arc<dyn ContactDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl ToolExecutor for LookupContactTool {
    fn spec(&self) -> ToolSpec {
        schema::lookup_contact()
    }

    async fn execute(&self, args: &ToolArgs) -> Result<serde_json::Value, MingleError> {
        let name = args.str_or("name", "");
        info!("LOOKUP_TOOL: Looking up '{}'", name);

        let record = self.directory.lookup(&name).await?;
        Ok(serde_json::to_value(record)?)
    }
}

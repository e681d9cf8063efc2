use std::collections::HashMap;
use std::sync::Arc;

use mingle_core::{MingleError, ToolArgs, ToolExecutor, ToolSpec};

/// Executors keyed by tool name. The registered specs double as the tool
/// schema offered to the generation tier.
pub struct ToolRegistry {
    executors: HashMap<String, Arc<dyn ToolExecutor>>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            executors: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn register(&mut self, executor: Arc<dyn ToolExecutor>) {
        let name = executor.spec().name;
        if !self.executors.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.executors.insert(name, executor);
    }

    pub fn with(mut self, executor: Arc<dyn ToolExecutor>) -> Self {
        self.register(executor);
        self
    }

    /// Specs in registration order.
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.order
            .iter()
            .filter_map(|name| self.executors.get(name))
            .map(|e| e.spec())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.executors.contains_key(name)
    }

    pub async fn execute(
        &self,
        name: &str,
        args: &ToolArgs,
    ) -> Result<serde_json::Value, MingleError> {
        let executor = self
            .executors
            .get(name)
            .ok_or_else(|| MingleError::UnknownTool(name.to_string()))?;

        executor.execute(args).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

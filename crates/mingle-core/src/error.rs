use thiserror::Error;

#[derive(Error, Debug)]
pub enum MingleError {
    #[error("LLM request failed: {0}")]
    LlmError(String),

    #[error("Failed to parse structured output: {0}")]
    ParseError(String),

    #[error("Tool execution failed: {0}")]
    ToolFailed(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Retrieval index error: {0}")]
    Retrieval(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for MingleError {
    fn from(err: serde_json::Error) -> Self {
        MingleError::ParseError(err.to_string())
    }
}

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        ChatCompletionTool, ChatCompletionToolArgs, ChatCompletionToolType,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse, FunctionObjectArgs,
    },
    Client,
};
use async_trait::async_trait;
use mingle_core::{
    GenerationRequest, GenerationResult, GenerationTier, Message, MessageRole, MingleError, Source,
    ToolCall, ToolSpec,
};
use tracing::debug;

fn llm_err(e: impl ToString) -> MingleError {
    MingleError::LlmError(e.to_string())
}

fn to_request_message(msg: &Message) -> Result<ChatCompletionRequestMessage, MingleError> {
    let message = match msg.role {
        MessageRole::System => ChatCompletionRequestMessage::System(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(msg.content.clone())
                .build()
                .map_err(llm_err)?,
        ),
        MessageRole::User => ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessageArgs::default()
                .content(msg.content.clone())
                .build()
                .map_err(llm_err)?,
        ),
        MessageRole::Assistant => ChatCompletionRequestMessage::Assistant(
            ChatCompletionRequestAssistantMessageArgs::default()
                .content(msg.content.clone())
                .build()
                .map_err(llm_err)?,
        ),
    };
    Ok(message)
}

fn to_chat_tool(spec: &ToolSpec) -> Result<ChatCompletionTool, MingleError> {
    ChatCompletionToolArgs::default()
        .r#type(ChatCompletionToolType::Function)
        .function(
            FunctionObjectArgs::default()
                .name(spec.name.clone())
                .description(spec.description.clone())
                .parameters(spec.json_schema())
                .build()
                .map_err(llm_err)?,
        )
        .build()
        .map_err(llm_err)
}

/// Malformed argument JSON becomes an empty argument map; the orchestrator
/// applies defaults downstream.
fn extract_reply(
    response: CreateChatCompletionResponse,
) -> Result<(Vec<ToolCall>, Option<String>), MingleError> {
    let message = response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message)
        .ok_or_else(|| MingleError::LlmError("No response choices".into()))?;

    let calls = message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|tc| {
            let arguments = serde_json::from_str(&tc.function.arguments).unwrap_or_else(|e| {
                debug!("Unparseable arguments for {}: {}", tc.function.name, e);
                serde_json::Value::Null
            });
            ToolCall::new(&tc.function.name, arguments)
        })
        .collect();

    let text = message.content.filter(|c| !c.trim().is_empty());
    Ok((calls, text))
}

/// OpenAI-compatible chat completion client for a single tier.
///
/// The on-device tier talks to a local OpenAI-compatible server (Ollama or
/// similar); the cloud tier talks to the hosted API.
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    model: String,
    source: Source,
}

impl LlmClient {
    pub fn new(model: &str, api_base: Option<&str>, api_key: Option<&str>, source: Source) -> Self {
        let mut config = OpenAIConfig::new();
        if let Some(base) = api_base {
            config = config.with_api_base(base);
        }
        if let Some(key) = api_key {
            config = config.with_api_key(key);
        }

        Self {
            client: Client::with_config(config),
            model: model.to_string(),
            source,
        }
    }

    pub fn on_device(model: &str, api_base: &str) -> Self {
        Self::new(model, Some(api_base), Some("local"), Source::OnDevice)
    }

    pub fn cloud(model: &str, api_key: &str) -> Self {
        Self::new(model, None, Some(api_key), Source::Cloud)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn complete(
        &self,
        request: &GenerationRequest,
    ) -> Result<(Vec<ToolCall>, Option<String>), MingleError> {
        let messages = request
            .messages
            .iter()
            .map(to_request_message)
            .collect::<Result<Vec<_>, _>>()?;

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&self.model).messages(messages);

        if !request.tools.is_empty() {
            let tools = request
                .tools
                .iter()
                .map(to_chat_tool)
                .collect::<Result<Vec<_>, _>>()?;
            builder.tools(tools);
        }

        let chat_request = builder.build().map_err(llm_err)?;
        let response = self.client.chat().create(chat_request).await.map_err(llm_err)?;
        let (calls, text) = extract_reply(response)?;

        debug!(
            "{} ({}): {} tool call(s), text: {}",
            self.source,
            self.model,
            calls.len(),
            text.is_some()
        );

        Ok((calls, text))
    }
}

#[async_trait]
impl GenerationTier for LlmClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, MingleError> {
        let (calls, text) = self.complete(request).await?;
        Ok(GenerationResult {
            source: self.source,
            tool_calls: Some(calls),
            text,
        })
    }
}

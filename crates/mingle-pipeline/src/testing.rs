//! Scripted collaborators shared by the pipeline tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mingle_core::{
    Contact, ContactDirectory, ContactRecord, GenerationRequest, GenerationResult, GenerationTier,
    MingleError, Source, ToolCall,
};

type Responder =
    Box<dyn Fn(&GenerationRequest) -> Result<GenerationResult, MingleError> + Send + Sync>;

/// Replays queued replies; once one reply is left it is repeated forever.
pub struct ScriptedTier {
    replies: Mutex<VecDeque<Result<GenerationResult, String>>>,
    responder: Option<Responder>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedTier {
    pub fn new(replies: Vec<Result<GenerationResult, String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            responder: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(source: Source, calls: Vec<ToolCall>) -> Self {
        Self::new(vec![Ok(GenerationResult {
            source,
            tool_calls: Some(calls),
            text: None,
        })])
    }

    pub fn failing(message: &str) -> Self {
        Self::new(vec![Err(message.to_string())])
    }

    /// Answers each request from its content.
    pub fn responding<F>(f: F) -> Self
    where
        F: Fn(&GenerationRequest) -> Result<GenerationResult, MingleError> + Send + Sync + 'static,
    {
        Self {
            responder: Some(Box::new(f)),
            ..Self::new(vec![])
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationTier for ScriptedTier {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, MingleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = request.messages.last() {
            self.prompts.lock().unwrap().push(message.content.clone());
        }

        if let Some(responder) = &self.responder {
            return responder(request);
        }

        let mut replies = self.replies.lock().unwrap();
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        };
        match reply {
            Some(Ok(result)) => Ok(result),
            Some(Err(message)) => Err(MingleError::LlmError(message)),
            None => Err(MingleError::LlmError("no scripted reply".into())),
        }
    }
}

/// In-memory directory with the same first-substring-match rule as the real one.
pub struct StaticDirectory {
    contacts: Result<Vec<Contact>, String>,
}

#[async_trait]
impl ContactDirectory for StaticDirectory {
    async fn lookup(&self, name: &str) -> Result<ContactRecord, MingleError> {
        let contacts = self
            .contacts
            .as_ref()
            .map_err(|e| MingleError::ExternalApi(e.clone()))?;
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(ContactRecord::missing(name));
        }
        Ok(contacts
            .iter()
            .find(|c| c.name.to_lowercase().contains(&needle))
            .cloned()
            .map(ContactRecord::Found)
            .unwrap_or_else(|| ContactRecord::missing(name)))
    }
}

pub fn directory_with(contacts: Result<Vec<Contact>, &str>) -> Arc<dyn ContactDirectory> {
    Arc::new(StaticDirectory {
        contacts: contacts.map_err(str::to_string),
    })
}

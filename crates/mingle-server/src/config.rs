use std::env;
use std::path::PathBuf;

use mingle_pipeline::DEFAULT_TOP_K;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub directory_url: String,
    pub corpus_dir: PathBuf,
    pub local_model: String,
    pub local_api_base: String,
    pub cloud_model: String,
    /// Cloud escalation is disabled when unset.
    pub openai_api_key: Option<String>,
    pub rank_top_k: usize,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let rank_top_k = match lookup("MINGLE_RANK_TOP_K").map(|v| v.trim().parse::<usize>()) {
            Some(Ok(k)) if k > 0 => k,
            Some(_) => {
                warn!("MINGLE_RANK_TOP_K is not a positive integer, using {}", DEFAULT_TOP_K);
                DEFAULT_TOP_K
            }
            None => DEFAULT_TOP_K,
        };

        Self {
            bind_addr: var("MINGLE_BIND_ADDR", "0.0.0.0:8001"),
            directory_url: var("MINGLE_DIRECTORY_URL", "http://localhost:3001/api"),
            corpus_dir: PathBuf::from(var("MINGLE_CORPUS_DIR", "rag_corpus")),
            local_model: var("MINGLE_LOCAL_MODEL", "functiongemma"),
            local_api_base: var("MINGLE_LOCAL_API_BASE", "http://localhost:11434/v1"),
            cloud_model: var("MINGLE_CLOUD_MODEL", "gpt-4o-mini"),
            openai_api_key: lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()),
            rank_top_k,
        }
    }
}

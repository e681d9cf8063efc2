mod client;
mod hybrid;

pub use client::LlmClient;
pub use hybrid::HybridTier;

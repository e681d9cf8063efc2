mod followup;
mod orchestrator;
mod profile;
mod ranking;

pub mod prompts;
pub mod retrieval;

#[cfg(test)]
mod testing;

pub use followup::{FollowupAgent, FollowupResponse};
pub use orchestrator::{Dispatch, Orchestrator};
pub use profile::{BioSummary, OutreachDraft, ProfileAssistant};
pub use ranking::{select_candidates, RankingPipeline, DEFAULT_TOP_K};
pub use retrieval::{CorpusIndex, HashedIndexBuilder, IndexBuilder, IndexHandle, Prefilter};

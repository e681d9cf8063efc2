use std::sync::Arc;

use mingle_core::{ContactDirectory, GenerationTier};
use mingle_llm::{HybridTier, LlmClient};
use mingle_pipeline::{
    CorpusIndex, FollowupAgent, HashedIndexBuilder, Orchestrator, Prefilter, ProfileAssistant,
    RankingPipeline,
};
use mingle_tools::{
    DirectoryClient, DraftFollowupTool, HeuristicExtractor, LookupContactTool, ToolRegistry,
};
use tracing::{info, warn};

use crate::config::ServerConfig;

pub struct AppState {
    pub followup: FollowupAgent,
    pub ranking: RankingPipeline,
    pub profiles: ProfileAssistant,
    pub corpus: Arc<CorpusIndex>,
    pub cloud_configured: bool,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        let local = LlmClient::on_device(&config.local_model, &config.local_api_base);
        info!("On-device tier: {} at {}", config.local_model, config.local_api_base);

        let cloud: Option<Box<dyn GenerationTier>> = match &config.openai_api_key {
            Some(key) => Some(Box::new(LlmClient::cloud(&config.cloud_model, key))),
            None => {
                warn!("Cloud escalation disabled: OPENAI_API_KEY not configured");
                None
            }
        };
        let tier = HybridTier::new(Box::new(local), cloud);
        let cloud_configured = tier.has_cloud();

        let directory = Arc::new(DirectoryClient::new(&config.directory_url));
        let corpus = Arc::new(CorpusIndex::new(
            config.corpus_dir.clone(),
            Box::new(HashedIndexBuilder),
        ));

        Self::assemble(Arc::new(tier), cloud_configured, directory, corpus, config.rank_top_k)
    }

    pub fn assemble(
        tier: Arc<dyn GenerationTier>,
        cloud_configured: bool,
        directory: Arc<dyn ContactDirectory>,
        corpus: Arc<CorpusIndex>,
        rank_top_k: usize,
    ) -> Self {
        let followup_tools = ToolRegistry::new()
            .with(Arc::new(LookupContactTool::new(directory)))
            .with(Arc::new(DraftFollowupTool));
        let followup = FollowupAgent::new(
            Orchestrator::new(tier.clone()),
            followup_tools,
            Arc::new(HeuristicExtractor),
        );

        let prefilter: Arc<dyn Prefilter> = corpus.clone();
        let ranking = RankingPipeline::new(Orchestrator::new(tier.clone()), Some(prefilter))
            .with_top_k(rank_top_k);
        let profiles = ProfileAssistant::new(Orchestrator::new(tier));

        Self {
            followup,
            ranking,
            profiles,
            corpus,
            cloud_configured,
        }
    }
}

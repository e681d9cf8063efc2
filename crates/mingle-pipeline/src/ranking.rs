use std::sync::Arc;

use mingle_core::{Profile, RankQuery, RankingEntry};
use mingle_tools::{schema, CaptureTool, ToolRegistry};
use tracing::{info, warn};

use crate::orchestrator::Orchestrator;
use crate::prompts;
use crate::retrieval::Prefilter;

pub const DEFAULT_TOP_K: usize = 8;

/// Pre-filters candidates through retrieval, then scores each one with its own
/// orchestrator call, one candidate at a time.
pub struct RankingPipeline {
    orchestrator: Orchestrator,
    registry: ToolRegistry,
    prefilter: Option<Arc<dyn Prefilter>>,
    top_k: usize,
}

impl RankingPipeline {
    pub fn new(orchestrator: Orchestrator, prefilter: Option<Arc<dyn Prefilter>>) -> Self {
        Self {
            orchestrator,
            registry: ToolRegistry::new().with(Arc::new(CaptureTool::new(schema::rank_contact()))),
            prefilter,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub async fn rank(&self, query: &RankQuery, candidates: &[Profile]) -> Vec<RankingEntry> {
        let hits = self.prefilter_ids(query).await;
        let retained = select_candidates(candidates, &hits);
        info!(
            "RANKING: Scoring {} of {} candidate(s) ({} retrieval hit(s))",
            retained.len(),
            candidates.len(),
            hits.len()
        );

        let mut entries = Vec::with_capacity(retained.len());
        for candidate in retained {
            let prompt = prompts::rank_contact(query, &candidate.to_text());
            entries.push(self.score(&candidate.id, &prompt).await);
        }

        entries.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
        entries
    }

    pub async fn rank_one(&self, query: &RankQuery, candidate: &Profile) -> RankingEntry {
        let prompt = prompts::rank_contact(query, &contact_line(candidate));
        self.score(&candidate.id, &prompt).await
    }

    async fn prefilter_ids(&self, query: &RankQuery) -> Vec<String> {
        let Some(prefilter) = &self.prefilter else {
            return Vec::new();
        };
        match prefilter.candidate_ids(&query.search_text(), self.top_k).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!("RANKING: Retrieval unavailable, ranking every candidate: {}", e);
                Vec::new()
            }
        }
    }

    async fn score(&self, contact_id: &str, prompt: &str) -> RankingEntry {
        let dispatch = self.orchestrator.run(prompt, &self.registry).await;
        let source = dispatch.source();

        let Some(args) = dispatch.first_result(schema::RANK_CONTACT) else {
            return RankingEntry {
                contact_id: contact_id.to_string(),
                match_score: 0.0,
                match_reason: String::new(),
                outreach_angle: String::new(),
                source,
            };
        };

        RankingEntry {
            contact_id: contact_id.to_string(),
            match_score: args.f64_or("match_score", 0.0).clamp(0.0, 1.0),
            match_reason: args.str_or("match_reason", ""),
            outreach_angle: args.str_or("outreach_angle", ""),
            source,
        }
    }
}

/// Retrieval hits first (hit order), then the remaining candidates in their
/// original order, cut to `min(hits, candidates)`. No hits keeps everyone.
pub fn select_candidates<'a>(candidates: &'a [Profile], hits: &[String]) -> Vec<&'a Profile> {
    let mut ordered: Vec<&Profile> = candidates.iter().collect();
    if hits.is_empty() {
        return ordered;
    }

    ordered.sort_by_key(|c| hits.iter().position(|h| *h == c.id).unwrap_or(hits.len()));
    ordered.truncate(hits.len().min(candidates.len()));
    ordered
}

fn contact_line(p: &Profile) -> String {
    format!(
        "Name: {}, Role: {}, Company: {}, Skills: {}, Looking For: {}, Domains: {}",
        p.name,
        p.role,
        p.company,
        p.skills.join(", "),
        p.looking_for.join(", "),
        p.domains.join(", ")
    )
}

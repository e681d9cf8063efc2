use mingle_core::{Profile, RankQuery, RankingEntry};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub index_loaded: bool,
    pub cloud_configured: bool,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeBioRequest {
    pub name: String,
    pub role: String,
    pub company: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub looking_for: Vec<String>,
}

impl SummarizeBioRequest {
    pub fn into_profile(self) -> Profile {
        Profile {
            name: self.name,
            role: self.role,
            company: self.company,
            skills: self.skills,
            looking_for: self.looking_for,
            ..Profile::default()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RankContactRequest {
    #[serde(default)]
    pub query_looking_for: String,
    #[serde(default)]
    pub query_domain: String,
    #[serde(default)]
    pub contact: Profile,
}

#[derive(Debug, Deserialize)]
pub struct RankContactsRequest {
    #[serde(default)]
    pub query_looking_for: String,
    #[serde(default)]
    pub query_domain: String,
    #[serde(default)]
    pub query_help_type: String,
    #[serde(default)]
    pub candidates: Vec<Profile>,
}

impl RankContactsRequest {
    pub fn query(&self) -> RankQuery {
        RankQuery {
            looking_for: self.query_looking_for.clone(),
            domain: self.query_domain.clone(),
            help_type: self.query_help_type.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RankContactsResponse {
    pub rankings: Vec<RankingEntry>,
}

#[derive(Debug, Deserialize)]
pub struct DraftOutreachRequest {
    pub sender: Profile,
    pub recipient: Profile,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SyncProfileRequest {
    pub profile_id: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub looking_for: Vec<String>,
    #[serde(default)]
    pub can_help_with: Vec<String>,
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub linkedin_url: String,
}

impl SyncProfileRequest {
    pub fn into_profile(self) -> Profile {
        Profile {
            id: self.profile_id,
            name: self.name,
            role: self.role,
            company: self.company,
            bio: self.bio,
            skills: self.skills,
            looking_for: self.looking_for,
            can_help_with: self.can_help_with,
            domains: self.domains,
            linkedin_url: self.linkedin_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SyncProfileResponse {
    pub status: &'static str,
    pub profile_id: String,
    pub path: String,
}

/// Only text transcripts are accepted; audio payloads are ignored.
#[derive(Debug, Deserialize)]
pub struct VoiceNoteRequest {
    #[serde(default)]
    pub transcript: Option<String>,
}

use std::time::Duration;

use async_trait::async_trait;
use mingle_core::{synthesize_email, Contact, ContactDirectory, ContactRecord, MingleError};
use serde::Deserialize;
use tracing::{info, warn};

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Deserialize)]
struct DirectoryProfile {
    #[serde(default)]
    name: String,
    #[serde(default)]
    role: String,
    #[serde(default)]
    company: String,
    #[serde(default)]
    bio: String,
    #[serde(default)]
    can_help_with: Vec<String>,
    #[serde(default)]
    linkedin_url: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl DirectoryProfile {
    fn into_contact(self) -> Contact {
        let email = self
            .email
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| synthesize_email(&self.name, &self.company));

        Contact {
            email,
            linkedin_url: self.linkedin_url.filter(|u| !u.trim().is_empty()),
            name: self.name,
            role: self.role,
            company: self.company,
            bio: self.bio,
            can_help_with: self.can_help_with,
        }
    }
}

/// First entry (in listing order) whose name contains `query`, ignoring case.
fn first_match(profiles: Vec<DirectoryProfile>, query: &str) -> Option<DirectoryProfile> {
    let needle = query.to_lowercase();
    profiles
        .into_iter()
        .find(|p| p.name.to_lowercase().contains(&needle))
}

/// Client for the profile directory service (`GET {base}/profiles`).
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: String,
}

impl DirectoryClient {
    pub fn new(base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!("DIRECTORY: Client without lookup timeout: {}", e);
                reqwest::Client::new()
            });

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_profiles(&self) -> Result<Vec<DirectoryProfile>, MingleError> {
        let url = format!("{}/profiles", self.base_url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| MingleError::ExternalApi(e.to_string()))?;

        response
            .json()
            .await
            .map_err(|e| MingleError::ExternalApi(e.to_string()))
    }
}

#[async_trait]
impl ContactDirectory for DirectoryClient {
    async fn lookup(&self, name: &str) -> Result<ContactRecord, MingleError> {
        let query = name.trim();
        if query.is_empty() {
            return Ok(ContactRecord::missing(name));
        }

        let profiles = match self.fetch_profiles().await {
            Ok(profiles) => profiles,
            Err(e) => {
                warn!("DIRECTORY: Lookup for '{}' failed: {}", query, e);
                return Ok(ContactRecord::failed(query, e));
            }
        };

        match first_match(profiles, query) {
            Some(profile) => {
                info!("DIRECTORY: '{}' matched {}", query, profile.name);
                Ok(ContactRecord::Found(profile.into_contact()))
            }
            None => {
                info!("DIRECTORY: No contact matching '{}'", query);
                Ok(ContactRecord::missing(query))
            }
        }
    }
}

use serde::{Deserialize, Serialize};

/// A networking profile as supplied by callers of the ranking and drafting tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub role: String,
    pub company: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub looking_for: Vec<String>,
    pub can_help_with: Vec<String>,
    pub domains: Vec<String>,
    pub linkedin_url: String,
}

impl Profile {
    /// Multi-line description used both in prompts and as a corpus document.
    pub fn to_text(&self) -> String {
        format!(
            "Name: {}\nRole: {}\nCompany: {}\nBio: {}\nSkills: {}\n\
             Looking For: {}\nCan Help With: {}\nDomains: {}",
            self.name,
            self.role,
            self.company,
            self.bio,
            self.skills.join(", "),
            self.looking_for.join(", "),
            self.can_help_with.join(", "),
            self.domains.join(", "),
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankQuery {
    pub looking_for: String,
    pub domain: String,
    #[serde(default)]
    pub help_type: String,
}

impl RankQuery {
    /// Text handed to the retrieval pre-filter.
    pub fn search_text(&self) -> String {
        [self.looking_for.as_str(), self.domain.as_str(), self.help_type.as_str()]
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

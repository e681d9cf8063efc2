use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, serde::Serialize)]
pub struct Contact {
    pub name: String,
    pub role: String,
    pub company: String,
    /// Synthesized when the directory does not supply one; not verified.
    pub email: String,
    pub bio: String,
    pub can_help_with: Vec<String>,
    pub linkedin_url: Option<String>,
}

/// Outcome of a directory lookup. A miss carries only the queried name and an
/// optional transport error, never contact details.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "WireRecord")]
pub enum ContactRecord {
    Found(Contact),
    Missing {
        queried_name: String,
        error: Option<String>,
    },
}

impl ContactRecord {
    pub fn missing(queried_name: &str) -> Self {
        Self::Missing {
            queried_name: queried_name.to_string(),
            error: None,
        }
    }

    pub fn failed(queried_name: &str, error: impl ToString) -> Self {
        Self::Missing {
            queried_name: queried_name.to_string(),
            error: Some(error.to_string()),
        }
    }

    pub fn found(&self) -> bool {
        matches!(self, ContactRecord::Found(_))
    }

    pub fn contact(&self) -> Option<&Contact> {
        match self {
            ContactRecord::Found(c) => Some(c),
            ContactRecord::Missing { .. } => None,
        }
    }
}

/// Flat wire shape; `found` decides which fields are meaningful.
#[derive(Deserialize)]
struct WireRecord {
    found: bool,
    #[serde(default)]
    name: String,
    #[serde(default)]
    role: String,
    #[serde(default)]
    company: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    bio: String,
    #[serde(default)]
    can_help_with: Vec<String>,
    #[serde(default)]
    linkedin_url: Option<String>,
    #[serde(default)]
    queried_name: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl From<WireRecord> for ContactRecord {
    fn from(w: WireRecord) -> Self {
        if !w.found {
            return ContactRecord::Missing {
                queried_name: w.queried_name.unwrap_or(w.name),
                error: w.error,
            };
        }
        ContactRecord::Found(Contact {
            name: w.name,
            role: w.role,
            company: w.company,
            email: w.email,
            bio: w.bio,
            can_help_with: w.can_help_with,
            linkedin_url: w.linkedin_url,
        })
    }
}

impl Serialize for ContactRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ContactRecord::Found(c) => {
                let mut s = serializer.serialize_struct("ContactRecord", 8)?;
                s.serialize_field("found", &true)?;
                s.serialize_field("name", &c.name)?;
                s.serialize_field("role", &c.role)?;
                s.serialize_field("company", &c.company)?;
                s.serialize_field("email", &c.email)?;
                s.serialize_field("bio", &c.bio)?;
                s.serialize_field("can_help_with", &c.can_help_with)?;
                s.serialize_field("linkedin_url", &c.linkedin_url)?;
                s.end()
            }
            ContactRecord::Missing { queried_name, error } => {
                let len = if error.is_some() { 3 } else { 2 };
                let mut s = serializer.serialize_struct("ContactRecord", len)?;
                s.serialize_field("found", &false)?;
                s.serialize_field("queried_name", queried_name)?;
                if let Some(e) = error {
                    s.serialize_field("error", e)?;
                }
                s.end()
            }
        }
    }
}

/// Placeholder address in `first.last@companyslug.com` form.
pub fn synthesize_email(name: &str, company: &str) -> String {
    let local = name
        .split_whitespace()
        .map(|part| {
            part.chars()
                .filter(|c| c.is_alphanumeric() || *c == '-')
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(".");

    let domain: String = company
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase();

    let local = if local.is_empty() { "contact".to_string() } else { local };
    let domain = if domain.is_empty() { "example".to_string() } else { domain };

    format!("{local}@{domain}.com")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesize_email() {
        assert_eq!(synthesize_email("Maya Chen", "Figma Labs"), "maya.chen@figmalabs.com");
        assert_eq!(synthesize_email("Jordan", "Stripe, Inc."), "jordan@stripeinc.com");
        assert_eq!(synthesize_email("", ""), "contact@example.com");
    }

    #[test]
    fn test_missing_record_never_serializes_contact_fields() {
        let value = serde_json::to_value(ContactRecord::missing("Zephyr")).unwrap();
        assert_eq!(value["found"], false);
        assert_eq!(value["queried_name"], "Zephyr");
        assert!(value.get("email").is_none());
        assert!(value.get("role").is_none());
        assert!(value.get("company").is_none());
        assert!(value.get("error").is_none());

        let failed =
            serde_json::to_value(ContactRecord::failed("Zephyr", "connection refused")).unwrap();
        assert_eq!(failed["error"], "connection refused");
    }

    #[test]
    fn test_found_record_serializes_details() {
        let record = ContactRecord::Found(Contact {
            name: "Maya Chen".into(),
            role: "Design Lead".into(),
            company: "Figma".into(),
            email: "maya.chen@figma.com".into(),
            bio: String::new(),
            can_help_with: vec!["design systems".into()],
            linkedin_url: None,
        });
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["found"], true);
        assert_eq!(value["email"], "maya.chen@figma.com");
        assert!(record.found());

        let back: ContactRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_missing_record_drops_stray_details_on_decode() {
        let record: ContactRecord = serde_json::from_value(serde_json::json!({
            "found": false,
            "queried_name": "Zephyr",
            "email": "should@not.survive",
        }))
        .unwrap();
        assert_eq!(record, ContactRecord::missing("Zephyr"));
    }
}

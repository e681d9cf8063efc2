use mingle_core::{Profile, RankQuery};

pub fn voice_note(transcript: &str) -> String {
    format!(
        "Process this voice note and help me follow up:\n\n\"{transcript}\"\n\n\
         First, look up the contact mentioned. Then draft a follow-up as an email, text message, \
         LinkedIn connection request or call plan, whichever the note asks for (email if unsure)."
    )
}

pub fn rank_contact(query: &RankQuery, contact_text: &str) -> String {
    format!(
        "I need a {} in {}. Rate this contact: {}",
        query.looking_for, query.domain, contact_text
    )
}

pub fn bio_summary(
    name: &str,
    role: &str,
    company: &str,
    skills: &[String],
    looking_for: &[String],
) -> String {
    let or_na = |items: &[String]| {
        if items.is_empty() {
            "N/A".to_string()
        } else {
            items.join(", ")
        }
    };
    format!(
        "Summarize: {name}, {role} at {company}. Skills: {}. Looking for: {}.",
        or_na(skills),
        or_na(looking_for)
    )
}

pub fn outreach(sender: &Profile, recipient: &Profile, context: &str) -> String {
    format!(
        "Draft a warm networking message from {} ({} at {}) to {} ({} at {}). Context: {}",
        sender.name,
        sender.role,
        sender.company,
        recipient.name,
        recipient.role,
        recipient.company,
        context
    )
}

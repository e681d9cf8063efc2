use mingle_core::{ParamType, ToolSpec};

pub const LOOKUP_CONTACT: &str = "lookup_contact";
pub const DRAFT_FOLLOWUP: &str = "draft_followup";
pub const RANK_CONTACT: &str = "rank_contact";
pub const GENERATE_BIO_SUMMARY: &str = "generate_bio_summary";
pub const DRAFT_OUTREACH_MESSAGE: &str = "draft_outreach_message";

pub fn lookup_contact() -> ToolSpec {
    ToolSpec::new(
        LOOKUP_CONTACT,
        "Look up a contact by name in the network directory. \
         Returns their profile info including email.",
    )
    .param("name", ParamType::String, "First name or full name of the contact to look up", true)
}

pub fn draft_followup() -> ToolSpec {
    ToolSpec::new(
        DRAFT_FOLLOWUP,
        "Draft a follow-up to a contact after meeting them, as an email, text message, \
         LinkedIn connection request or call plan.",
    )
    .param("contact_name", ParamType::String, "Name of the recipient", true)
    .param("topic", ParamType::String, "What you discussed", true)
    .param(
        "action",
        ParamType::String,
        "Proposed next step (schedule meeting, share resources, etc)",
        true,
    )
    .param("action_type", ParamType::String, "One of: email, message, linkedin, call", false)
}

pub fn rank_contact() -> ToolSpec {
    ToolSpec::new(RANK_CONTACT, "Score how well a contact matches a networking query")
        .param("contact_id", ParamType::String, "", true)
        .param("match_score", ParamType::Number, "0.0-1.0", true)
        .param("match_reason", ParamType::String, "One sentence why they match", true)
        .param("outreach_angle", ParamType::String, "One sentence suggested opening", true)
}

pub fn generate_bio_summary() -> ToolSpec {
    ToolSpec::new(GENERATE_BIO_SUMMARY, "Generate a one-liner professional bio summary")
        .param("bio_summary", ParamType::String, "One sentence professional summary", true)
}

pub fn draft_outreach_message() -> ToolSpec {
    ToolSpec::new(
        DRAFT_OUTREACH_MESSAGE,
        "Draft a warm, personalized 3-4 sentence outreach message",
    )
    .param("message", ParamType::String, "The full outreach message text", true)
}

/// Tools offered to the tier when processing a voice note.
pub fn voice_note_tools() -> Vec<ToolSpec> {
    vec![lookup_contact(), draft_followup()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_note_tool_names_are_unique() {
        let tools = voice_note_tools();
        assert_eq!(tools.len(), 2);
        assert_ne!(tools[0].name, tools[1].name);
    }

    #[test]
    fn test_rank_contact_score_is_numeric() {
        let schema = rank_contact().json_schema();
        assert_eq!(schema["properties"]["match_score"]["type"], "number");
        assert_eq!(schema["required"].as_array().map(|r| r.len()), Some(4));
    }
}

//! Deterministic follow-up templates, one per action type.

use mingle_core::{ActionType, ContactRecord, FollowupOutput, Intent};

/// Greeting used when no contact name is known.
pub const UNKNOWN_RECIPIENT: &str = "there";

/// LinkedIn caps connection-request notes at this many characters.
const LINKEDIN_NOTE_LIMIT: usize = 300;

fn recipient_name(contact: &ContactRecord, intent: &Intent) -> String {
    contact
        .contact()
        .map(|c| c.name.clone())
        .or_else(|| intent.contact_name.clone())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_RECIPIENT.to_string())
}

fn first_name(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or(name)
}

fn truncate_chars(text: String, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text,
    }
}

pub fn render(action_type: ActionType, contact: &ContactRecord, intent: &Intent) -> FollowupOutput {
    match action_type {
        ActionType::Email => render_email(contact, intent),
        ActionType::Message => render_message(contact, intent),
        ActionType::Linkedin => render_linkedin(contact, intent),
        ActionType::Call => render_call(contact, intent),
    }
}

/// Fills delivery targets a draft was rendered without, once the contact is known.
pub fn address(output: FollowupOutput, contact: &ContactRecord) -> FollowupOutput {
    let Some(c) = contact.contact() else {
        return output;
    };
    match output {
        FollowupOutput::Email { to: None, subject, body } => FollowupOutput::Email {
            to: Some(c.email.clone()),
            subject,
            body,
        },
        FollowupOutput::Linkedin { message, to } => FollowupOutput::Linkedin {
            to: c.linkedin_url.clone().unwrap_or(to),
            message,
        },
        other => other,
    }
}

fn render_email(contact: &ContactRecord, intent: &Intent) -> FollowupOutput {
    let name = recipient_name(contact, intent);
    FollowupOutput::Email {
        to: contact.contact().map(|c| c.email.clone()),
        subject: format!("Great meeting you - {}", intent.topic),
        body: format!(
            "Hi {name},\n\n\
             It was wonderful meeting you and discussing {topic}! \
             I really enjoyed our conversation.\n\n\
             I'd love to {action}. Would you be available sometime next week?\n\n\
             Looking forward to staying in touch.\n\n\
             Best regards",
            topic = intent.topic,
            action = intent.action,
        ),
    }
}

fn render_message(contact: &ContactRecord, intent: &Intent) -> FollowupOutput {
    let name = recipient_name(contact, intent);
    FollowupOutput::Message {
        message: format!(
            "Hi {}! Great meeting you and chatting about {}. I'd love to {}. \
             Are you free sometime next week?",
            first_name(&name),
            intent.topic,
            intent.action
        ),
        to: name,
    }
}

fn render_linkedin(contact: &ContactRecord, intent: &Intent) -> FollowupOutput {
    let name = recipient_name(contact, intent);
    let note = format!(
        "Hi {}, it was great meeting you and talking about {}. I'd love to connect here and {}.",
        first_name(&name),
        intent.topic,
        intent.action
    );
    let to = contact
        .contact()
        .and_then(|c| c.linkedin_url.clone())
        .unwrap_or(name);

    FollowupOutput::Linkedin {
        to,
        message: truncate_chars(note, LINKEDIN_NOTE_LIMIT),
    }
}

fn render_call(contact: &ContactRecord, intent: &Intent) -> FollowupOutput {
    let name = recipient_name(contact, intent);
    FollowupOutput::Call {
        message: format!(
            "Call {name} to {action}.\n\
             Talking points:\n- Follow up on {topic}\n- Agree on next steps",
            action = intent.action,
            topic = intent.topic,
        ),
        to: name,
    }
}

//! Pattern-based intent extraction for when no model tier produced tool calls.
//!
//! Every table below is priority ordered: rules are tried top to bottom and the
//! first rule that matches decides. Rules are never scored against each other.

use std::sync::LazyLock;

use mingle_core::{ActionType, Intent, DEFAULT_ACTION, DEFAULT_TOPIC};
use regex::Regex;

pub trait IntentExtractor: Send + Sync {
    fn extract(&self, utterance: &str) -> Intent;
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static intent pattern must compile")
}

/// Capture group 1 holds the name. Keyword matching is case sensitive so that
/// only capitalised words are taken as names.
static NAME_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:meeting|met|with|enjoyed meeting|talking to|spoke with|chatted with)\s+([A-Z][a-z]+)",
        r"([A-Z][a-z]+)\s+(?:and I|and we)\s+(?:talked|discussed|chatted)",
        r"(?:^|\s)([A-Z][a-z]+)\s+at\s+(?:the|a)",
        r"Met\s+([A-Z][a-z]+)",
    ]
    .into_iter()
    .map(compile)
    .collect()
});

static TOPIC_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)(?:about|discussing|talked about|chatted about|discussed)\s+([^.!?,]+)",
        r"(?i)(?:we talked|we discussed)\s+([^.!?]+)",
    ]
    .into_iter()
    .map(compile)
    .collect()
});

static TOPIC_TRAILER: LazyLock<Regex> = LazyLock::new(|| compile(r"\s+(?:and|to|with|for)\s*$"));

struct ActionRule {
    trigger: Regex,
    action_type: ActionType,
    action: Option<&'static str>,
}

static ACTION_TYPE_RULES: LazyLock<Vec<ActionRule>> = LazyLock::new(|| {
    let rule = |pattern: &str, action_type, action| ActionRule {
        trigger: compile(pattern),
        action_type,
        action,
    };
    vec![
        rule(r"(?i)\b(?:linkedin|connect)", ActionType::Linkedin, None),
        rule(r"(?i)\b(?:text|message|dm)", ActionType::Message, None),
        rule(r"(?i)\b(?:call|phone)", ActionType::Call, None),
        rule(r"(?i)\bshar(?:e|ed|es|ing)", ActionType::Email, Some("share some resources")),
        rule(r"(?i)\bintro", ActionType::Email, Some("make an introduction")),
    ]
});

/// Consulted only when the matching action-type rule did not fix an action.
static ACTION_PHRASE_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)\bshar(?:e|ed|es|ing)", "share some resources"),
        (r"(?i)\bintro", "make an introduction"),
        (r"(?i)\bcoffee\b", "grab coffee"),
        (r"(?i)\b(?:schedule|meeting)\b", DEFAULT_ACTION),
        (r"(?i)\bfollow[ -]up\b", "follow up on our discussion"),
    ]
    .into_iter()
    .map(|(pattern, action)| (compile(pattern), action))
    .collect()
});

fn extract_name(utterance: &str) -> Option<String> {
    NAME_RULES
        .iter()
        .find_map(|rule| rule.captures(utterance))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn extract_topic(utterance: &str) -> String {
    TOPIC_RULES
        .iter()
        .find_map(|rule| {
            let span = rule.captures(utterance)?.get(1)?.as_str().trim();
            let topic = TOPIC_TRAILER.replace(span, "").trim().to_string();
            (!topic.is_empty()).then_some(topic)
        })
        .unwrap_or_else(|| DEFAULT_TOPIC.to_string())
}

fn classify_action(utterance: &str) -> (ActionType, String) {
    let matched = ACTION_TYPE_RULES
        .iter()
        .find(|rule| rule.trigger.is_match(utterance));

    let action_type = matched.map(|r| r.action_type).unwrap_or_default();
    let action = matched
        .and_then(|r| r.action)
        .or_else(|| {
            ACTION_PHRASE_RULES
                .iter()
                .find(|(trigger, _)| trigger.is_match(utterance))
                .map(|(_, action)| *action)
        })
        .unwrap_or(DEFAULT_ACTION);

    (action_type, action.to_string())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicExtractor;

impl IntentExtractor for HeuristicExtractor {
    fn extract(&self, utterance: &str) -> Intent {
        let (action_type, action) = classify_action(utterance);
        Intent {
            contact_name: extract_name(utterance),
            topic: extract_topic(utterance),
            action,
            action_type,
        }
    }
}

use crate::chat::models::{Message, Metrics, Role};

pub const LOADING_INDICATOR: &str = "...";

pub fn metrics_footer(metrics: &Metrics) -> String {
    format!(
        "Duration: {:.2}s | Tokens/sec: {:.1} tok/s | Total tokens: {} tokens",
        metrics.duration_seconds, metrics.tokens_per_second, metrics.total_tokens
    )
}

/// Footer shown under a message, if any. Only assistant replies carry one.
pub fn footer_for(message: &Message) -> Option<String> {
    match (message.role, &message.metrics) {
        (Role::Assistant, Some(metrics)) => Some(metrics_footer(metrics)),
        _ => None,
    }
}

pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => "Assistant",
    }
}

/// Plain-text transcript used by the terminal front-ends.
pub fn transcript(messages: &[Message]) -> String {
    let mut out = String::new();
    for message in messages {
        out.push_str(&format!("{}> {}\n", role_label(message.role), message.content));
        if let Some(footer) = footer_for(message) {
            out.push_str(&format!("    {}\n", footer));
        }
    }
    out
}

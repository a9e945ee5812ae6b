use serde::{Deserialize, Serialize};

/// Fixed assistant reply used whenever the inference call fails.
pub const FALLBACK_REPLY: &str = "Server error, please try again in a few mins";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Performance figures reported by the inference server for one reply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub duration_seconds: f64,
    pub tokens_per_second: f64,
    pub total_tokens: u64,
}

impl Metrics {
    /// Derives display metrics from the raw nanosecond counters.
    /// A zero evaluation duration yields a rate of `0.0`.
    pub fn from_counters(total_duration_ns: u64, eval_count: u64, eval_duration_ns: u64) -> Self {
        let eval_seconds = eval_duration_ns as f64 / 1e9;
        let tokens_per_second = if eval_duration_ns == 0 {
            0.0
        } else {
            eval_count as f64 / eval_seconds
        };

        Self {
            duration_seconds: total_duration_ns as f64 / 1e9,
            tokens_per_second,
            total_tokens: eval_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Metrics>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            metrics: None,
        }
    }

    pub fn assistant(content: impl Into<String>, metrics: Metrics) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            metrics: Some(metrics),
        }
    }

    pub fn fallback() -> Self {
        Self {
            role: Role::Assistant,
            content: FALLBACK_REPLY.to_string(),
            metrics: None,
        }
    }
}

/// Chronological message log. Only ever appended to or cleared as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session {
    messages: Vec<Message>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl From<Vec<Message>> for Session {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

use serde::{Deserialize, Serialize};

use crate::chat::{render, ChatController, Message, Metrics, Role};

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageView {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Metrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

impl From<&Message> for MessageView {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
            metrics: message.metrics,
            footer: render::footer_for(message),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionView {
    pub busy: bool,
    pub messages: Vec<MessageView>,
}

impl SessionView {
    pub fn snapshot(controller: &ChatController) -> Self {
        let session = controller.session();
        Self {
            busy: controller.is_busy(),
            messages: session.messages().iter().map(MessageView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

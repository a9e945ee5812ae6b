pub mod controller;
pub mod models;
pub mod render;

pub use controller::{ChatController, ChatError};
pub use models::{Message, Metrics, Role, Session, FALLBACK_REPLY};

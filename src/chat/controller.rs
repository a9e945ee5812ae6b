use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::chat::models::{Message, Session};
use crate::db::SessionStore;
use crate::llm::InferenceClient;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("Message is empty")]
    EmptyInput,
    #[error("A request is already in flight")]
    Busy,
}

#[derive(Default)]
struct ChatState {
    session: Session,
    draft: String,
}

/// Releases the in-flight flag on every exit path, including a dropped future.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns the chat session and drives one inference round trip at a time.
///
/// Every mutation of the session is followed by a save to the injected
/// store. Storage failures are logged and otherwise ignored; inference
/// failures become a fixed fallback reply.
pub struct ChatController {
    client: Arc<dyn InferenceClient>,
    store: Arc<dyn SessionStore>,
    state: Mutex<ChatState>,
    busy: AtomicBool,
    /// `false` while a background restore has not finished.
    restored: watch::Sender<bool>,
}

impl ChatController {
    pub fn new(client: Arc<dyn InferenceClient>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            client,
            store,
            state: Mutex::new(ChatState::default()),
            busy: AtomicBool::new(false),
            restored: watch::channel(true).0,
        }
    }

    fn state(&self) -> MutexGuard<'_, ChatState> {
        // Nothing panics while holding the lock, so recover instead of propagating.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Loads the persisted session, if any. Only fills an empty session.
    ///
    /// The state lock is held across the read so a concurrent append or
    /// clear lands strictly before or after the restore.
    pub fn restore(&self) {
        let mut state = self.state();
        if !state.session.is_empty() {
            debug!("Session already has messages, skipping restore");
            return;
        }

        match self.store.load() {
            Ok(Some(loaded)) => {
                info!("Restored chat session with {} messages", loaded.len());
                state.session = loaded;
            }
            Ok(None) => debug!("No stored session found"),
            Err(e) => warn!("Failed to restore chat session: {}", e),
        }
    }

    /// Runs `restore` on the blocking pool. Submissions made before it
    /// finishes wait for it, so they never overwrite the stored history.
    pub fn restore_in_background(self: Arc<Self>) -> JoinHandle<()> {
        self.restored.send_replace(false);
        tokio::task::spawn_blocking(move || {
            self.restore();
            self.restored.send_replace(true);
        })
    }

    async fn wait_for_restore(&self) {
        let mut restored = self.restored.subscribe();
        // The sender lives as long as `self`, so this only returns once set.
        let _ = restored.wait_for(|done| *done).await;
    }

    fn persist(&self, session: &Session) {
        if let Err(e) = self.store.save(session) {
            warn!("Failed to persist chat session: {}", e);
        }
    }

    fn append(&self, message: Message) {
        let mut state = self.state();
        state.session.push(message);
        self.persist(&state.session);
    }

    pub fn session(&self) -> Session {
        self.state().session.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn draft(&self) -> String {
        self.state().draft.clone()
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        self.state().draft = text.into();
    }

    /// Sends the current draft.
    pub async fn submit_draft(&self) -> Result<Message, ChatError> {
        let draft = self.draft();
        self.submit(&draft).await
    }

    /// Sends `text` to the model and appends both turns to the session.
    ///
    /// Returns the assistant message that was appended, which is the
    /// fallback reply when the request failed. Rejections leave the session
    /// and draft untouched.
    pub async fn submit(&self, text: &str) -> Result<Message, ChatError> {
        let prompt = text.trim();
        if prompt.is_empty() {
            return Err(ChatError::EmptyInput);
        }

        self.wait_for_restore().await;
        let _busy = BusyGuard::acquire(&self.busy).ok_or(ChatError::Busy)?;

        {
            let mut state = self.state();
            state.session.push(Message::user(prompt));
            self.persist(&state.session);
            state.draft.clear();
        }

        info!(prompt_len = prompt.len(), "Sending prompt to {}", self.client.name());

        let reply = match self.client.generate(prompt).await {
            Ok(generation) => {
                let metrics = generation.metrics();
                debug!(
                    tokens = metrics.total_tokens,
                    seconds = metrics.duration_seconds,
                    "Inference completed"
                );
                Message::assistant(generation.response, metrics)
            }
            Err(e) => {
                error!("Error sending message: {}", e);
                Message::fallback()
            }
        };

        self.append(reply.clone());
        Ok(reply)
    }

    /// Starts a new chat: empties the session and deletes the stored copy.
    pub fn clear(&self) -> Result<(), ChatError> {
        let _busy = BusyGuard::acquire(&self.busy).ok_or(ChatError::Busy)?;

        let mut state = self.state();
        state.session.clear();
        if let Err(e) = self.store.remove() {
            warn!("Failed to remove stored chat session: {}", e);
        }
        info!("Chat session cleared");
        Ok(())
    }
}

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use ollachat::chat::Session;
use ollachat::db::{MemoryStore, SessionStore, StoreError};
use ollachat::llm::{models::Generation, InferenceClient, LlmError};

/// Replays canned results in order and records every prompt it receives.
/// With a gate set, each call waits for a notification before answering.
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<Generation, LlmError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Result<Generation, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub fn gated(replies: Vec<Result<Generation, LlmError>>, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(replies)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceClient for ScriptedClient {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str) -> Result<Generation, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::Network("no scripted reply left".to_string())))
    }
}

/// Store whose every operation fails, as a full disk or locked file would.
pub struct BrokenStore;

impl SessionStore for BrokenStore {
    fn load(&self) -> Result<Option<Session>, StoreError> {
        Err(StoreError::Poisoned)
    }

    fn save(&self, _session: &Session) -> Result<(), StoreError> {
        Err(StoreError::Poisoned)
    }

    fn remove(&self) -> Result<(), StoreError> {
        Err(StoreError::Poisoned)
    }
}

/// Memory store whose first `load` reads the stored value, then stops until
/// the test lets it go.
pub struct PausedLoadStore {
    inner: MemoryStore,
    entered: Barrier,
    release: Barrier,
    paused: AtomicBool,
}

impl PausedLoadStore {
    pub fn with_session(session: Session) -> Self {
        let inner = MemoryStore::new();
        inner.save(&session).unwrap();
        Self {
            inner,
            entered: Barrier::new(2),
            release: Barrier::new(2),
            paused: AtomicBool::new(false),
        }
    }

    /// Blocks until the first `load` has started.
    pub fn wait_until_loading(&self) {
        self.entered.wait();
    }

    /// Lets the paused `load` continue.
    pub fn finish_loading(&self) {
        self.release.wait();
    }
}

impl SessionStore for PausedLoadStore {
    fn load(&self) -> Result<Option<Session>, StoreError> {
        let loaded = self.inner.load();
        if !self.paused.swap(true, Ordering::SeqCst) {
            self.entered.wait();
            self.release.wait();
        }
        loaded
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        self.inner.save(session)
    }

    fn remove(&self) -> Result<(), StoreError> {
        self.inner.remove()
    }
}

pub fn generation(response: &str, total_ns: u64, eval_count: u64, eval_ns: u64) -> Generation {
    Generation {
        response: response.to_string(),
        total_duration: total_ns,
        eval_count,
        eval_duration: eval_ns,
    }
}

pub fn ok(response: &str) -> Result<Generation, LlmError> {
    Ok(generation(response, 3_000_000_000, 50, 2_000_000_000))
}

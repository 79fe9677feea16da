//! Question Store
//!
//! The engine owns no persisted state. Item metadata and response logs
//! are read through [`QuestionStore`]; recalibrated difficulties are
//! written back through it. Implementations must make each write atomic
//! per item (last writer wins).

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::{EngineError, EngineResult};
use crate::types::{Item, ResponseRecord, SessionTotals};

pub trait QuestionStore: Sync {
    fn items(&self, topic_id: &str) -> EngineResult<Vec<Item>>;

    fn responses(&self, item_id: &str) -> EngineResult<Vec<ResponseRecord>>;

    fn session_totals(&self, session_id: &str) -> EngineResult<Option<SessionTotals>>;

    fn set_item_difficulty(&self, item_id: &str, difficulty: f64) -> EngineResult<()>;
}

/// Thread-safe in-process store, used by tests and embedders without a database.
#[derive(Default)]
pub struct InMemoryQuestionStore {
    topics: RwLock<HashMap<String, Vec<Item>>>,
    responses: RwLock<HashMap<String, Vec<ResponseRecord>>>,
    sessions: RwLock<HashMap<String, SessionTotals>>,
}

impl InMemoryQuestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_item(&self, topic_id: &str, item: Item) {
        let mut topics = self.topics.write();
        let items = topics.entry(topic_id.to_string()).or_default();
        match items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item,
            None => items.push(item),
        }
    }

    pub fn record_response(&self, response: ResponseRecord) {
        self.responses
            .write()
            .entry(response.item_id.clone())
            .or_default()
            .push(response);
    }

    pub fn set_session_totals(&self, session_id: &str, totals: SessionTotals) {
        self.sessions.write().insert(session_id.to_string(), totals);
    }

    pub fn item(&self, item_id: &str) -> Option<Item> {
        self.topics
            .read()
            .values()
            .flat_map(|items| items.iter())
            .find(|item| item.id == item_id)
            .cloned()
    }
}

impl QuestionStore for InMemoryQuestionStore {
    fn items(&self, topic_id: &str) -> EngineResult<Vec<Item>> {
        Ok(self
            .topics
            .read()
            .get(topic_id)
            .cloned()
            .unwrap_or_default())
    }

    fn responses(&self, item_id: &str) -> EngineResult<Vec<ResponseRecord>> {
        Ok(self
            .responses
            .read()
            .get(item_id)
            .cloned()
            .unwrap_or_default())
    }

    fn session_totals(&self, session_id: &str) -> EngineResult<Option<SessionTotals>> {
        Ok(self.sessions.read().get(session_id).copied())
    }

    fn set_item_difficulty(&self, item_id: &str, difficulty: f64) -> EngineResult<()> {
        let mut topics = self.topics.write();
        let item = topics
            .values_mut()
            .flat_map(|items| items.iter_mut())
            .find(|item| item.id == item_id)
            .ok_or_else(|| EngineError::Store(format!("unknown item {}", item_id)))?;
        item.difficulty = difficulty;
        Ok(())
    }
}

//! In-memory doubles for the store, generator and messenger seams.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::generation::generator::{ContentGenerator, GeneratedContent, GenerationError};
use crate::generation::template::ParseError;
use crate::generation::topic::Topic;
use crate::llm_client::LlmError;
use crate::messaging::{DeliveryError, Messenger};
use crate::models::content::{ContentRecord, NewContent};
use crate::models::subscriber::Subscriber;
use crate::store::{ContentStore, StoreError};

/// Builds a well-formed generation result for `question`.
pub fn content(topic: Topic, question: &str) -> GeneratedContent {
    let answer = format!("Answer to: {question}");
    let reference = "https://example.com/ref".to_string();
    GeneratedContent {
        topic,
        question: question.to_string(),
        raw: format!(
            "Topic: {topic}\n\nQ: {question}\n\nA: {answer}\n\nReference: {reference}"
        ),
        answer,
        reference,
    }
}

fn unavailable_store() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

#[derive(Default)]
pub struct InMemoryStore {
    subscribers: Mutex<Vec<Subscriber>>,
    records: Mutex<Vec<ContentRecord>>,
    failing_history: Mutex<HashSet<Uuid>>,
    failing_inserts: Mutex<HashSet<Uuid>>,
    failing_listing: AtomicBool,
    history_reads: AtomicUsize,
    snapshots: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_subscriber(&self, chat_id: i64) -> Subscriber {
        self.subscribe(chat_id).await.unwrap()
    }

    pub async fn seed_question(&self, user_id: Uuid, question: &str) {
        let seeded = NewContent {
            topic: "seed".to_string(),
            question: question.to_string(),
            answer: "seed".to_string(),
            reference: "seed".to_string(),
        };
        self.insert_content(user_id, &seeded).await.unwrap();
    }

    pub async fn records_for(&self, user_id: Uuid) -> Vec<ContentRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn fail_history_for(&self, user_id: Uuid) {
        self.failing_history.lock().unwrap().insert(user_id);
    }

    pub fn fail_inserts_for(&self, user_id: Uuid) {
        self.failing_inserts.lock().unwrap().insert(user_id);
    }

    pub fn fail_listing(&self) {
        self.failing_listing.store(true, Ordering::SeqCst);
    }

    pub fn history_reads(&self) -> usize {
        self.history_reads.load(Ordering::SeqCst)
    }

    pub fn subscriber_snapshots(&self) -> usize {
        self.snapshots.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentStore for InMemoryStore {
    async fn list_subscribers(&self) -> Result<Vec<Subscriber>, StoreError> {
        if self.failing_listing.load(Ordering::SeqCst) {
            return Err(unavailable_store());
        }
        self.snapshots.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .subscribers
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.subscribed)
            .cloned()
            .collect())
    }

    async fn get_question_history(&self, user_id: Uuid) -> Result<Vec<String>, StoreError> {
        self.history_reads.fetch_add(1, Ordering::SeqCst);
        if self.failing_history.lock().unwrap().contains(&user_id) {
            return Err(unavailable_store());
        }
        Ok(self
            .records_for(user_id)
            .await
            .into_iter()
            .map(|r| r.question)
            .collect())
    }

    async fn insert_content(
        &self,
        user_id: Uuid,
        content: &NewContent,
    ) -> Result<ContentRecord, StoreError> {
        if self.failing_inserts.lock().unwrap().contains(&user_id) {
            return Err(unavailable_store());
        }
        let record = ContentRecord {
            id: Uuid::new_v4(),
            user_id,
            topic: content.topic.clone(),
            question: content.question.clone(),
            answer: content.answer.clone(),
            reference: content.reference.clone(),
            created_at: Utc::now(),
        };
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn subscribe(&self, chat_id: i64) -> Result<Subscriber, StoreError> {
        let mut subscribers = self.subscribers.lock().unwrap();
        if let Some(existing) = subscribers.iter_mut().find(|s| s.chat_id == chat_id) {
            existing.subscribed = true;
            return Ok(existing.clone());
        }
        let subscriber = Subscriber {
            id: Uuid::new_v4(),
            chat_id,
            subscribed: true,
            created_at: Utc::now(),
        };
        subscribers.push(subscriber.clone());
        Ok(subscriber)
    }

    async fn unsubscribe(&self, chat_id: i64) -> Result<bool, StoreError> {
        let mut subscribers = self.subscribers.lock().unwrap();
        match subscribers.iter_mut().find(|s| s.chat_id == chat_id) {
            Some(existing) => {
                existing.subscribed = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Replays a fixed script of results, then either repeats a fallback or
/// reports the provider as unavailable.
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<Result<GeneratedContent, GenerationError>>>,
    fallback: Option<GeneratedContent>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new(script: Vec<Result<GeneratedContent, GenerationError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn repeating(content: GeneratedContent) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Some(content),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unavailable() -> GenerationError {
        GenerationError::ProviderUnavailable(LlmError::Api {
            status: 503,
            message: "unavailable".to_string(),
        })
    }

    pub fn malformed() -> GenerationError {
        GenerationError::MalformedResponse(ParseError::MissingBlock {
            label: "Reference:",
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentGenerator for ScriptedGenerator {
    async fn generate(&self, _topic: Topic) -> Result<GeneratedContent, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return next;
        }
        self.fallback.clone().ok_or_else(Self::unavailable)
    }
}

/// Records successful sends; refuses delivery to the configured chats.
#[derive(Default)]
pub struct RecordingMessenger {
    failing: HashSet<i64>,
    sent: Mutex<Vec<(i64, String)>>,
    attempts: AtomicUsize,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(chat_ids: &[i64]) -> Self {
        Self {
            failing: chat_ids.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), DeliveryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&chat_id) {
            return Err(DeliveryError::Api {
                status: 403,
                description: "Forbidden: bot was blocked by the user".to_string(),
            });
        }
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One delivered question/answer, owned by a single subscriber.
/// CRITICAL: append-only history. Never UPDATE or DELETE these rows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContentRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub topic: String,
    pub question: String,
    pub answer: String,
    pub reference: String,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied by the caller when appending a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContent {
    pub topic: String,
    pub question: String,
    pub answer: String,
    pub reference: String,
}

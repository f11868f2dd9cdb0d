use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A chat that has issued `/subscribe` at least once.
/// Rows are never deleted; `/unsubscribe` only clears the flag.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subscriber {
    pub id: Uuid,
    pub chat_id: i64,
    pub subscribed: bool,
    pub created_at: DateTime<Utc>,
}

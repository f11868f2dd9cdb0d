use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::content::{ContentRecord, NewContent};
use crate::models::subscriber::Subscriber;
use crate::store::{ContentStore, StoreError};

/// `ContentStore` backed by the shared PostgreSQL pool.
#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn list_subscribers(&self) -> Result<Vec<Subscriber>, StoreError> {
        Ok(sqlx::query_as::<_, Subscriber>(
            "SELECT * FROM users WHERE subscribed = TRUE ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_question_history(&self, user_id: Uuid) -> Result<Vec<String>, StoreError> {
        let questions: Vec<String> =
            sqlx::query_scalar("SELECT question FROM content WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;
        debug!("Loaded {} prior questions for user {user_id}", questions.len());
        Ok(questions)
    }

    async fn insert_content(
        &self,
        user_id: Uuid,
        content: &NewContent,
    ) -> Result<ContentRecord, StoreError> {
        let record = sqlx::query_as::<_, ContentRecord>(
            r#"
            INSERT INTO content (user_id, topic, question, answer, reference)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&content.topic)
        .bind(&content.question)
        .bind(&content.answer)
        .bind(&content.reference)
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted content {} for user {user_id}", record.id);
        Ok(record)
    }

    async fn subscribe(&self, chat_id: i64) -> Result<Subscriber, StoreError> {
        Ok(sqlx::query_as::<_, Subscriber>(
            r#"
            INSERT INTO users (chat_id) VALUES ($1)
            ON CONFLICT (chat_id) DO UPDATE SET subscribed = TRUE
            RETURNING *
            "#,
        )
        .bind(chat_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn unsubscribe(&self, chat_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE users SET subscribed = FALSE WHERE chat_id = $1")
            .bind(chat_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Content Generator — turns a topic into one parsed question/answer block.
//!
//! `ContentGenerator` is the seam the novelty loop talks to. The production
//! implementation, `LlmContentGenerator`, prompts the provider through
//! `LlmClient` and runs the strict four-block parser over the reply.

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::generation::template::{parse_content_block, ParseError};
use crate::generation::topic::Topic;
use crate::llm_client::prompts::build_question_prompt;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::content::NewContent;

/// The parsed output of one generation attempt. Discarded if rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedContent {
    /// The topic that was requested, not the label the provider echoed back.
    pub topic: Topic,
    pub question: String,
    pub answer: String,
    pub reference: String,
    /// The provider's full reply; this is what gets delivered.
    pub raw: String,
}

impl GeneratedContent {
    pub fn to_new_content(&self) -> NewContent {
        NewContent {
            topic: self.topic.label().to_string(),
            question: self.question.clone(),
            answer: self.answer.clone(),
            reference: self.reference.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation provider unavailable: {0}")]
    ProviderUnavailable(#[from] LlmError),

    #[error("malformed provider response: {0}")]
    MalformedResponse(#[from] ParseError),
}

impl GenerationError {
    pub fn is_provider_unavailable(&self) -> bool {
        matches!(self, GenerationError::ProviderUnavailable(_))
    }
}

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, topic: Topic) -> Result<GeneratedContent, GenerationError>;
}

/// Generates content through the chat-completions provider.
pub struct LlmContentGenerator {
    llm: LlmClient,
}

impl LlmContentGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ContentGenerator for LlmContentGenerator {
    async fn generate(&self, topic: Topic) -> Result<GeneratedContent, GenerationError> {
        let prompt = build_question_prompt(topic.label());
        let raw = self.llm.complete(&prompt).await?;
        debug!("Provider reply for {topic}: {raw}");

        let block = parse_content_block(&raw)?;
        if !block.topic.eq_ignore_ascii_case(topic.label()) {
            debug!("Provider labelled a {topic} question as {:?}", block.topic);
        }
        Ok(GeneratedContent {
            topic,
            question: block.question,
            answer: block.answer,
            reference: block.reference,
            raw,
        })
    }
}

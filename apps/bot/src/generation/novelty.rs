//! Novelty-bounded generation: keep asking the generator for content until
//! it produces a question the user has not effectively seen, or the attempt
//! budget runs out.

use tracing::{info, warn};
use uuid::Uuid;

use crate::generation::generator::{ContentGenerator, GeneratedContent};
use crate::generation::similarity::find_near_duplicate;
use crate::generation::topic::Topic;
use crate::store::{ContentStore, StoreError};

/// Generation tries per subscriber per cycle.
pub const MAX_GENERATION_ATTEMPTS: u32 = 3;

/// Loads the user's question history once, then runs the bounded loop
/// against that snapshot.
///
/// `Ok(None)` means the budget was exhausted; the caller skips the user.
/// Only a failed history read is an error.
pub async fn obtain_novel_content(
    store: &dyn ContentStore,
    generator: &dyn ContentGenerator,
    user_id: Uuid,
    topic: Topic,
    max_attempts: u32,
) -> Result<Option<GeneratedContent>, StoreError> {
    let history = store.get_question_history(user_id).await?;
    Ok(select_novel_content(generator, &history, topic, max_attempts).await)
}

/// Calls the generator at most `max_attempts` times. Generator failures and
/// near-duplicates both consume an attempt. Returns the first novel result.
pub async fn select_novel_content(
    generator: &dyn ContentGenerator,
    history: &[String],
    topic: Topic,
    max_attempts: u32,
) -> Option<GeneratedContent> {
    for attempt in 1..=max_attempts {
        let content = match generator.generate(topic).await {
            Ok(content) => content,
            Err(e) if e.is_provider_unavailable() => {
                warn!("Generation attempt {attempt}/{max_attempts} for {topic} failed: {e}");
                continue;
            }
            Err(e) => {
                warn!("Generation attempt {attempt}/{max_attempts} for {topic} unusable: {e}");
                continue;
            }
        };

        if let Some(hit) = find_near_duplicate(history, &content.question) {
            warn!(
                "Generation attempt {attempt}/{max_attempts} for {topic} rejected: \
                near-duplicate of {:?} (score {:.1})",
                hit.prior, hit.score
            );
            continue;
        }

        info!("Novel question found for {topic} on attempt {attempt}/{max_attempts}");
        return Some(content);
    }

    warn!("No novel question for {topic} after {max_attempts} attempts");
    None
}

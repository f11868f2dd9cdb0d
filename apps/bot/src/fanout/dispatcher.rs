//! Fanout Dispatcher — one cycle over every subscriber.
//!
//! Flow per subscriber: pick topic → novelty loop → persist → deliver.
//!
//! Subscribers are processed strictly one after another, in snapshot order.
//! A failure for one subscriber never stops the cycle: persistence failures
//! drop that subscriber's record, delivery failures are logged and the
//! already-persisted record stays.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::generation::generator::ContentGenerator;
use crate::generation::novelty::{obtain_novel_content, MAX_GENERATION_ATTEMPTS};
use crate::generation::topic::Topic;
use crate::messaging::Messenger;
use crate::models::subscriber::Subscriber;
use crate::store::{ContentStore, StoreError};

/// Per-cycle counts, for logging and the manual trigger endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub subscribers: usize,
    /// Persisted and delivered.
    pub delivered: usize,
    /// Novelty budget exhausted; nothing written.
    pub skipped: usize,
    /// History read or insert failed; nothing written.
    pub persist_failed: usize,
    /// Persisted, but the messaging channel refused it.
    pub delivery_failed: usize,
}

impl CycleReport {
    pub fn failed(&self) -> usize {
        self.persist_failed + self.delivery_failed
    }

    fn record(&mut self, outcome: SubscriberOutcome) {
        match outcome {
            SubscriberOutcome::Delivered => self.delivered += 1,
            SubscriberOutcome::Skipped => self.skipped += 1,
            SubscriberOutcome::PersistFailed => self.persist_failed += 1,
            SubscriberOutcome::DeliveryFailed => self.delivery_failed += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubscriberOutcome {
    Delivered,
    Skipped,
    PersistFailed,
    DeliveryFailed,
}

pub struct Dispatcher {
    store: Arc<dyn ContentStore>,
    generator: Arc<dyn ContentGenerator>,
    messenger: Arc<dyn Messenger>,
    max_attempts: u32,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn ContentStore>,
        generator: Arc<dyn ContentGenerator>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        Self {
            store,
            generator,
            messenger,
            max_attempts: MAX_GENERATION_ATTEMPTS,
        }
    }

    /// Runs one full pass over the current subscriber snapshot.
    ///
    /// Only a failure to read the snapshot itself is returned as an error;
    /// every per-subscriber failure is counted in the report instead.
    pub async fn run_cycle(&self) -> Result<CycleReport, StoreError> {
        let subscribers = self.store.list_subscribers().await?;
        info!("Starting cycle for {} subscribers", subscribers.len());

        let mut report = CycleReport {
            subscribers: subscribers.len(),
            ..CycleReport::default()
        };

        for subscriber in &subscribers {
            // ThreadRng is not Send; keep it out of the awaits below.
            let topic = Topic::random(&mut rand::thread_rng());
            let outcome = self.process_subscriber(subscriber, topic).await;
            report.record(outcome);
        }

        info!(
            "Cycle finished: {} delivered, {} skipped, {} persist failures, {} delivery failures",
            report.delivered, report.skipped, report.persist_failed, report.delivery_failed
        );
        Ok(report)
    }

    async fn process_subscriber(&self, subscriber: &Subscriber, topic: Topic) -> SubscriberOutcome {
        let content = match obtain_novel_content(
            self.store.as_ref(),
            self.generator.as_ref(),
            subscriber.id,
            topic,
            self.max_attempts,
        )
        .await
        {
            Ok(Some(content)) => content,
            Ok(None) => {
                info!(
                    "Skipping chat {} this cycle: no novel {topic} question",
                    subscriber.chat_id
                );
                return SubscriberOutcome::Skipped;
            }
            Err(e) => {
                error!(
                    "Failed to load history for chat {}: {e}",
                    subscriber.chat_id
                );
                return SubscriberOutcome::PersistFailed;
            }
        };

        // Persist first; a delivery failure below does not roll this back.
        if let Err(e) = self
            .store
            .insert_content(subscriber.id, &content.to_new_content())
            .await
        {
            error!(
                "Failed to save content for chat {}: {e}",
                subscriber.chat_id
            );
            return SubscriberOutcome::PersistFailed;
        }

        match self
            .messenger
            .send_message(subscriber.chat_id, &content.raw)
            .await
        {
            Ok(()) => {
                info!("Delivered {topic} question to chat {}", subscriber.chat_id);
                SubscriberOutcome::Delivered
            }
            Err(e) => {
                warn!("Failed to send message to {}: {e}", subscriber.chat_id);
                SubscriberOutcome::DeliveryFailed
            }
        }
    }
}

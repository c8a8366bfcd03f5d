use crate::cache::ResponseCache;
use crate::classifier::Classifier;
use crate::error::PIPELINE_FAILURE_MESSAGE;
use crate::grok::Completer;
use crate::pimp::{MatchPolicy, Pimp};
use crate::sanitizer::sanitize;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Canned,
    Completion,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

impl Reply {
    fn new(text: impl Into<String>, source: ReplySource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }
}

/// Turns a chat question into the bot's reply. Never fails: every error
/// becomes a short apology string.
pub struct ResponseService {
    completer: Arc<dyn Completer>,
    classifier: Classifier,
    pimp: Pimp,
    cache: ResponseCache,
    cache_fallbacks: bool,
}

impl ResponseService {
    pub fn new(completer: Arc<dyn Completer>, cache: ResponseCache) -> Self {
        Self {
            completer,
            classifier: Classifier::default(),
            pimp: Pimp::default(),
            cache,
            cache_fallbacks: true,
        }
    }

    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.pimp = Pimp::new(policy);
        self
    }

    #[allow(dead_code)]
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// When false, fallback strings are returned but not remembered.
    pub fn with_cache_fallbacks(mut self, cache_fallbacks: bool) -> Self {
        self.cache_fallbacks = cache_fallbacks;
        self
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Cached entry point, keyed on `question` exactly as received.
    pub async fn respond(&self, question: &str) -> String {
        if let Some(cached) = self.cache.get(question).await {
            info!("Cache hit for question: {}", question);
            return cached;
        }

        let reply = self.generate(question).await;
        if reply.source != ReplySource::Fallback || self.cache_fallbacks {
            self.cache.put(question, &reply.text).await;
            let len = self.cache.len().await;
            debug!("Cache holds {} entries", len);
        }
        reply.text
    }

    /// Runs the uncached pipeline behind a panic guard.
    pub async fn generate(&self, question: &str) -> Reply {
        match AssertUnwindSafe(self.run_pipeline(question))
            .catch_unwind()
            .await
        {
            Ok(reply) => reply,
            Err(panic) => {
                error!(
                    "Error generating Blockchain Pimp response: {}",
                    panic_message(panic.as_ref())
                );
                Reply::new(PIPELINE_FAILURE_MESSAGE, ReplySource::Fallback)
            }
        }
    }

    async fn run_pipeline(&self, question: &str) -> Reply {
        let sanitized = sanitize(question);

        let classification = self.classifier.classify(&sanitized);
        info!("Extracted entities: {:?}", classification.entities.entities);
        info!("Sentiment analysis: {}", classification.sentiment);

        if let Some(pitch) = self.pimp.canned_response(question, &sanitized) {
            info!("Canned response triggered ({:?} match)", self.pimp.policy());
            return Reply::new(pitch, ReplySource::Canned);
        }

        match self.completer.complete(&sanitized).await {
            Ok(text) => Reply::new(text, ReplySource::Completion),
            Err(e) => Reply::new(e.user_message(), ReplySource::Fallback),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

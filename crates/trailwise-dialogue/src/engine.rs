//! Turn orchestration: wires sentiment, matcher, contextual resolution,
//! and fallback into the single `converse` entry point.

use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use trailwise_core::config::DialogueConfig;

use crate::context::ContextResolver;
use crate::error::DialogueError;
use crate::matcher::PatternSet;
use crate::response::ResponseComposer;
use crate::sentiment::SentimentAnalyzer;
use crate::types::{ContextPatch, DialogueState, EngineReply, ReplySource};

/// The dialogue engine.
///
/// Pure with respect to the [`DialogueState`] it is handed: all
/// conversation history lives in the state the caller threads through
/// [`converse`], never in process-wide globals. The engine itself holds
/// only immutable tables and the random source for cosmetic variation.
///
/// [`converse`]: DialogueEngine::converse
pub struct DialogueEngine {
    sentiment: SentimentAnalyzer,
    patterns: PatternSet,
    context: ContextResolver,
    composer: ResponseComposer,
    config: DialogueConfig,
    rng: StdRng,
}

impl DialogueEngine {
    /// Create an engine with an OS-seeded random source.
    pub fn new(config: DialogueConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Create an engine with a fixed seed, making every cosmetic branch
    /// (empathy prefixes, tips, generic template choice) deterministic.
    pub fn with_seed(config: DialogueConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: DialogueConfig, rng: StdRng) -> Self {
        Self {
            sentiment: SentimentAnalyzer,
            patterns: PatternSet::new(),
            context: ContextResolver::new(config.idle_timeout_secs),
            composer: ResponseComposer::new(config.empathy_probability, config.tip_probability),
            config,
            rng,
        }
    }

    /// Process one user utterance against the given state.
    ///
    /// On success the state is updated in place (topic, slots, pending
    /// question, sentiment, turn count, interaction timestamp) and the
    /// reply carries the winning score and resolution path. Blank input
    /// and malformed state leave the state untouched and return an error;
    /// everything else, including gibberish, produces some reply.
    pub fn converse(
        &mut self,
        user_text: &str,
        state: &mut DialogueState,
    ) -> Result<EngineReply, DialogueError> {
        if !self.config.enabled {
            return Err(DialogueError::Disabled);
        }
        let text = user_text.trim();
        if text.is_empty() {
            return Err(DialogueError::EmptyInput);
        }
        state.validate()?;

        let sentiment = self.sentiment.classify(text);

        let (mut reply_text, confidence, source, patch) =
            if let Some(m) = self.patterns.best_match(text) {
                debug!(score = m.score, "intent pattern matched");
                let mut t = m.response.to_string();
                if let Some(prefix) = self.composer.empathy_prefix(sentiment, &mut self.rng) {
                    t.insert_str(0, prefix);
                }
                (t, m.score, ReplySource::Intent, m.patch)
            } else if let Some(c) = self.context.resolve(text, state, &mut self.rng) {
                let source = if c.reengaged {
                    ReplySource::Reengagement
                } else {
                    ReplySource::Contextual
                };
                debug!(?source, "contextual resolution");
                (c.text, 0.0, source, c.patch)
            } else {
                debug!(turn = state.turn_count, "fallback prompt");
                let prompt = self.composer.fallback_prompt(state.turn_count);
                let patch = ContextPatch {
                    count_turn: true,
                    ..Default::default()
                };
                (prompt.to_string(), 0.0, ReplySource::Fallback, patch)
            };

        patch.apply(state);
        state.sentiment = sentiment;
        state.last_interaction_at = Local::now().timestamp();

        if let Some(tip) = self.composer.maybe_tip(&mut self.rng) {
            reply_text.push_str("\n\n");
            reply_text.push_str(tip);
        }

        Ok(EngineReply {
            text: reply_text,
            confidence,
            source,
        })
    }
}

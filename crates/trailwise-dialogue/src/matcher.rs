//! Keyword-based intent pattern matching.
//!
//! Provides the ordered pattern table and the three-signal scorer that
//! ranks patterns against raw user text.

use crate::types::{ContextPatch, PendingSlot, Topic};

/// Weight of a partial (token-inside-keyword) match, relative to base.
const PARTIAL_WEIGHT: f32 = 0.3;
/// Weight of a positional-similarity match, relative to base.
const SIMILARITY_WEIGHT: f32 = 0.2;
/// Fraction of the shorter string that must match positionally.
const SIMILARITY_THRESHOLD: f32 = 0.7;
/// Tokens and keywords at or below this length skip the fuzzy signals.
const MIN_FUZZY_LEN: usize = 3;

/// A single intent pattern: trigger keywords, a canned response, a base
/// confidence weight, and the state update a match produces.
pub struct IntentPattern {
    pub keywords: &'static [&'static str],
    pub response: &'static str,
    pub base_confidence: f32,
    pub topic: Option<Topic>,
    pub pending_question: Option<PendingSlot>,
    /// Whether a match on this pattern ends the current conversation
    /// segment (clears topic and pending question).
    pub reset_context: bool,
}

impl IntentPattern {
    /// Score this pattern against lower-cased input and its whitespace
    /// tokens. Three independent additive signals:
    ///
    /// 1. each keyword contained verbatim in the input adds the base
    ///    confidence;
    /// 2. each input token longer than three characters that is a substring
    ///    of some keyword adds `0.3 x base`;
    /// 3. each token/keyword pair (both longer than three characters) whose
    ///    identical-position character matches exceed `0.7 x` the shorter
    ///    length adds `0.2 x base`.
    ///
    /// The total is an unnormalized ranking score, not a probability.
    pub fn score(&self, lower: &str, tokens: &[&str]) -> f32 {
        let mut score = 0.0;

        for keyword in self.keywords {
            if lower.contains(keyword) {
                score += self.base_confidence;
            }
        }

        for token in tokens.iter().filter(|t| t.len() > MIN_FUZZY_LEN) {
            if self.keywords.iter().any(|kw| kw.contains(*token)) {
                score += PARTIAL_WEIGHT * self.base_confidence;
            }

            for keyword in self
                .keywords
                .iter()
                .filter(|kw| kw.len() > MIN_FUZZY_LEN)
            {
                let shorter = token.chars().count().min(keyword.chars().count());
                let matches = positional_matches(token, keyword);
                if matches as f32 > SIMILARITY_THRESHOLD * shorter as f32 {
                    score += SIMILARITY_WEIGHT * self.base_confidence;
                }
            }
        }

        score
    }
}

/// A winning pattern from [`PatternSet::best_match`].
#[derive(Debug, Clone)]
pub struct PatternMatch {
    pub response: &'static str,
    pub score: f32,
    pub patch: ContextPatch,
}

/// Ordered collection of all intent patterns, built once and reused.
///
/// Table order is significant: when two patterns score equally, the
/// earlier definition wins.
pub struct PatternSet {
    patterns: Vec<IntentPattern>,
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternSet {
    /// Create the built-in travel-assistant pattern table.
    pub fn new() -> Self {
        let patterns = vec![
            IntentPattern {
                keywords: &["hello", "hi", "hey", "greetings"],
                response: "Hello! I'm your Trailwise travel assistant. I can plan \
                           greener routes, estimate carbon savings, and share local \
                           tips. What are you dreaming up?",
                base_confidence: 0.9,
                topic: Some(Topic::Greeting),
                pending_question: None,
                reset_context: false,
            },
            IntentPattern {
                keywords: &["help", "what can you do", "how does this work"],
                response: "Here's what I can do: plan a route (say 'plan a trip'), \
                           estimate the carbon saved by greener transport, suggest \
                           places to stay, and share cultural tips. What sounds useful?",
                base_confidence: 0.85,
                topic: Some(Topic::Help),
                pending_question: None,
                reset_context: false,
            },
            IntentPattern {
                keywords: &["plan", "route", "trip", "journey", "itinerary"],
                response: "Happy to plan a greener route! Where are you starting \
                           from? You can also tell me the whole thing, like \
                           'from Paris to Tokyo'.",
                base_confidence: 0.9,
                topic: Some(Topic::RoutePlanning),
                pending_question: Some(PendingSlot::Location),
                reset_context: false,
            },
            IntentPattern {
                keywords: &["carbon", "footprint", "emission", "co2", "sustainab"],
                response: "Choosing trains, buses, or bikes can cut trip emissions \
                           by more than half. Want me to estimate the savings for a \
                           specific trip?",
                base_confidence: 0.9,
                topic: Some(Topic::Carbon),
                pending_question: None,
                reset_context: false,
            },
            IntentPattern {
                keywords: &["transport", "transportation", "getting around", "commute"],
                response: "Good options, greenest first: walking, cycling, public \
                           transport, then electric vehicles. If you tell me your \
                           route I can suggest the best fit.",
                base_confidence: 0.8,
                topic: Some(Topic::TransportMode),
                pending_question: None,
                reset_context: false,
            },
            IntentPattern {
                keywords: &["weather", "forecast", "rainy", "sunny", "temperature"],
                response: "I don't have live forecasts, but shoulder-season travel \
                           usually means milder weather and thinner crowds. Which \
                           destination's climate are you wondering about?",
                base_confidence: 0.8,
                topic: Some(Topic::Weather),
                pending_question: None,
                reset_context: false,
            },
            IntentPattern {
                keywords: &[
                    "hotel",
                    "hostel",
                    "accommodation",
                    "somewhere to stay",
                    "lodging",
                ],
                response: "For greener stays, look for certified eco-labels, smaller \
                           guesthouses, or hostels. Shared spaces mean a smaller \
                           footprint per guest. Which city are you looking at?",
                base_confidence: 0.8,
                topic: Some(Topic::Accommodation),
                pending_question: None,
                reset_context: false,
            },
            IntentPattern {
                keywords: &["culture", "museum", "tradition", "local customs", "heritage"],
                response: "Local culture is the best part of slow travel! Markets, \
                           neighbourhood museums, and regional festivals beat the big \
                           attractions. Want tips for a particular place?",
                base_confidence: 0.8,
                topic: Some(Topic::Cultural),
                pending_question: None,
                reset_context: false,
            },
            IntentPattern {
                keywords: &["thank", "thanks", "cheers"],
                response: "You're welcome! Happy to help you travel lighter. \
                           Anything else?",
                base_confidence: 0.9,
                topic: None,
                pending_question: None,
                reset_context: false,
            },
            IntentPattern {
                keywords: &["bye", "goodbye", "see you", "farewell"],
                response: "Safe travels! Come back anytime you're planning your \
                           next adventure.",
                base_confidence: 0.9,
                topic: None,
                pending_question: None,
                reset_context: true,
            },
        ];

        Self { patterns }
    }

    /// Create a set from explicit patterns. Table order is priority order.
    pub fn with_patterns(patterns: Vec<IntentPattern>) -> Self {
        Self { patterns }
    }

    /// Find the single best-scoring pattern for the input, or `None` when
    /// every pattern scores zero.
    ///
    /// Selection is stable: a later pattern replaces the leader only with a
    /// strictly higher score, so equal scores keep the first definition.
    pub fn best_match(&self, text: &str) -> Option<PatternMatch> {
        let lower = text.to_lowercase();
        let tokens: Vec<&str> = lower.split_whitespace().collect();

        let mut best: Option<(&IntentPattern, f32)> = None;
        for pattern in &self.patterns {
            let score = pattern.score(&lower, &tokens);
            if score > best.map_or(0.0, |(_, s)| s) {
                best = Some((pattern, score));
            }
        }

        best.map(|(pattern, score)| PatternMatch {
            response: pattern.response,
            score,
            patch: ContextPatch {
                topic: pattern.topic,
                clear_topic: pattern.reset_context,
                pending_question: pattern.pending_question,
                clear_pending: pattern.reset_context
                    || (pattern.topic.is_some() && pattern.pending_question.is_none()),
                count_turn: true,
                ..Default::default()
            },
        })
    }
}

/// Count characters matching at identical positions, up to the shorter
/// string's length. Not an edit distance: shifted strings score poorly.
fn positional_matches(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).filter(|(x, y)| x == y).count()
}

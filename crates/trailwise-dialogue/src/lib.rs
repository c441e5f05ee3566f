//! Conversational assistant for the Trailwise travel planner.
//!
//! Provides a rule-based dialogue engine: sentiment analysis, keyword
//! intent matching with confidence scoring, contextual slot filling for
//! route planning, and escalating fallback prompts. No network calls,
//! no models; one pure computation per turn against an explicit
//! [`DialogueState`].
//!
//! [`DialogueState`]: types::DialogueState

pub mod context;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod response;
pub mod sentiment;
pub mod session;
pub mod types;

pub use context::{ContextResolver, ContextualReply};
pub use engine::DialogueEngine;
pub use error::DialogueError;
pub use matcher::{IntentPattern, PatternMatch, PatternSet};
pub use response::ResponseComposer;
pub use sentiment::SentimentAnalyzer;
pub use session::{DialogueSession, SessionManager};
pub use types::{
    ContextPatch, DialogueState, EngineReply, PendingSlot, ReplySource, RouteSlots, Topic,
    TransportMode,
};

//! Core types for the dialogue engine.
//!
//! Defines conversation topics, slots, dialogue state, and the patch type
//! resolvers use to describe state updates.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;

use trailwise_core::types::{Sentiment, Timestamp};

use crate::error::DialogueError;

// =============================================================================
// Enums
// =============================================================================

/// Coarse subject of the current conversation segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Greeting,
    Carbon,
    Cultural,
    RoutePlanning,
    TransportMode,
    Weather,
    Accommodation,
    Help,
    CarbonCalculation,
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::Greeting => write!(f, "greeting"),
            Topic::Carbon => write!(f, "carbon"),
            Topic::Cultural => write!(f, "cultural"),
            Topic::RoutePlanning => write!(f, "route planning"),
            Topic::TransportMode => write!(f, "transport options"),
            Topic::Weather => write!(f, "weather"),
            Topic::Accommodation => write!(f, "accommodation"),
            Topic::Help => write!(f, "help"),
            Topic::CarbonCalculation => write!(f, "carbon calculation"),
        }
    }
}

impl std::str::FromStr for Topic {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greeting" => Ok(Topic::Greeting),
            "carbon" => Ok(Topic::Carbon),
            "cultural" => Ok(Topic::Cultural),
            "route_planning" => Ok(Topic::RoutePlanning),
            "transport_mode" => Ok(Topic::TransportMode),
            "weather" => Ok(Topic::Weather),
            "accommodation" => Ok(Topic::Accommodation),
            "help" => Ok(Topic::Help),
            "carbon_calculation" => Ok(Topic::CarbonCalculation),
            _ => Err(format!("Unknown topic: {}", s)),
        }
    }
}

/// Recognized ways of getting from A to B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Walking,
    Cycling,
    PublicTransport,
    ElectricVehicle,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::Walking => write!(f, "walking"),
            TransportMode::Cycling => write!(f, "cycling"),
            TransportMode::PublicTransport => write!(f, "public transport"),
            TransportMode::ElectricVehicle => write!(f, "electric vehicle"),
        }
    }
}

impl std::str::FromStr for TransportMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "walking" => Ok(TransportMode::Walking),
            "cycling" => Ok(TransportMode::Cycling),
            "public_transport" => Ok(TransportMode::PublicTransport),
            "electric_vehicle" => Ok(TransportMode::ElectricVehicle),
            _ => Err(format!("Unknown transport mode: {}", s)),
        }
    }
}

/// The slot the engine is currently soliciting from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingSlot {
    /// Waiting for a starting point (or a full "from X to Y" phrase).
    Location,
    /// Waiting for a destination.
    Destination,
    /// Waiting for a transport mode preference.
    Mode,
    /// Waiting for the first input of a carbon calculation.
    Start,
}

impl fmt::Display for PendingSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingSlot::Location => write!(f, "location"),
            PendingSlot::Destination => write!(f, "destination"),
            PendingSlot::Mode => write!(f, "mode"),
            PendingSlot::Start => write!(f, "start"),
        }
    }
}

/// Which resolution path produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    /// The intent matcher scored above zero.
    Intent,
    /// The contextual resolver handled an active topic.
    Contextual,
    /// No match and no topic; clarification prompt.
    Fallback,
    /// Idle timeout re-engagement.
    Reengagement,
}

// =============================================================================
// Domain structs
// =============================================================================

/// Entities accumulated across turns of a route-planning exchange.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSlots {
    pub start_point: Option<String>,
    pub destination: Option<String>,
    pub transport_mode: Option<TransportMode>,
}

impl RouteSlots {
    /// Both endpoints of the route are known.
    pub fn has_endpoints(&self) -> bool {
        self.start_point.is_some() && self.destination.is_some()
    }
}

/// Per-session conversation state, owned exclusively by the engine.
///
/// Created at conversation start and threaded through every [`converse`]
/// call; never reset silently. The host may persist it (it round-trips
/// through serde), but the engine defines no storage format.
///
/// [`converse`]: crate::engine::DialogueEngine::converse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueState {
    pub topic: Option<Topic>,
    pub slots: RouteSlots,
    pub pending_question: Option<PendingSlot>,
    pub sentiment: Sentiment,
    pub turn_count: u32,
    pub last_interaction_at: Timestamp,
}

impl DialogueState {
    /// Fresh state for a new conversation.
    pub fn new() -> Self {
        Self {
            topic: None,
            slots: RouteSlots::default(),
            pending_question: None,
            sentiment: Sentiment::Neutral,
            turn_count: 0,
            last_interaction_at: Local::now().timestamp(),
        }
    }

    /// Check structural coherence of a state supplied by the caller.
    ///
    /// A failure here signals a caller bug (e.g. state corrupted during
    /// host-side persistence), not a user-input problem, and fails loudly.
    pub fn validate(&self) -> Result<(), DialogueError> {
        if self.pending_question.is_some() && self.topic.is_none() {
            return Err(DialogueError::MalformedState(
                "pending_question set without an active topic".to_string(),
            ));
        }
        if self.last_interaction_at < 0 {
            return Err(DialogueError::MalformedState(format!(
                "last_interaction_at is negative: {}",
                self.last_interaction_at
            )));
        }
        Ok(())
    }
}

impl Default for DialogueState {
    fn default() -> Self {
        Self::new()
    }
}

/// A state update produced by one resolution path.
///
/// Resolvers describe their effects as a patch; the engine merges it into
/// the state in a single step so every mutation goes through one place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextPatch {
    /// Set the active topic.
    pub topic: Option<Topic>,
    /// Clear the active topic (wins over `topic`; both set is a no-op pair
    /// resolvers never produce).
    pub clear_topic: bool,
    /// Set the slot being solicited next.
    pub pending_question: Option<PendingSlot>,
    /// Clear the pending question.
    pub clear_pending: bool,
    pub start_point: Option<String>,
    pub destination: Option<String>,
    pub transport_mode: Option<TransportMode>,
    /// Whether this turn counts toward fallback escalation.
    pub count_turn: bool,
}

impl ContextPatch {
    /// Merge this patch into `state`. Sentiment and the interaction
    /// timestamp are updated by the engine on every turn, not here.
    pub fn apply(&self, state: &mut DialogueState) {
        if self.clear_topic {
            state.topic = None;
        } else if let Some(topic) = self.topic {
            state.topic = Some(topic);
        }

        if self.clear_pending {
            state.pending_question = None;
        } else if let Some(pending) = self.pending_question {
            state.pending_question = Some(pending);
        }

        if let Some(ref start) = self.start_point {
            state.slots.start_point = Some(start.clone());
        }
        if let Some(ref dest) = self.destination {
            state.slots.destination = Some(dest.clone());
        }
        if let Some(mode) = self.transport_mode {
            state.slots.transport_mode = Some(mode);
        }

        if self.count_turn {
            state.turn_count += 1;
        }
    }
}

/// A reply from the engine together with ranking metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineReply {
    /// Reply text, possibly with an appended tip after a blank line.
    pub text: String,
    /// Unnormalized score of the winning intent pattern; 0.0 on the
    /// contextual and fallback paths.
    pub confidence: f32,
    /// Which resolution path produced the reply.
    pub source: ReplySource,
}

// =============================================================================
// Tests
// =============================================================================

//! Contextual resolution for turns the intent matcher has no opinion on.
//!
//! Runs a small state machine over `(topic, pending_question)`: fills
//! route-planning slots, recognizes transport modes, advances the carbon
//! flow on affirmation, and re-engages idle users.

use chrono::Local;
use rand::Rng;

use crate::types::{ContextPatch, DialogueState, PendingSlot, Topic, TransportMode};

/// A reply from the contextual resolver together with its state patch.
#[derive(Debug, Clone)]
pub struct ContextualReply {
    pub text: String,
    pub patch: ContextPatch,
    /// True when this reply is the idle re-engagement prompt.
    pub reengaged: bool,
}

/// Generic "tell me more" templates, one chosen pseudo-randomly per turn.
static GENERIC_TEMPLATES: &[&str] = &[
    "Tell me a bit more about what you're after with {topic}.",
    "What else would you like to know about {topic}?",
    "I'd love to help with {topic}. Could you give me a few details?",
];

/// Resolver for turns with an active topic and no matched intent.
pub struct ContextResolver {
    /// Seconds of inactivity before the idle prompt takes precedence.
    pub idle_timeout_secs: i64,
}

impl ContextResolver {
    pub fn new(idle_timeout_secs: i64) -> Self {
        Self { idle_timeout_secs }
    }

    /// Resolve an unmatched utterance against the active conversation
    /// context. Returns `None` when no topic is active (the caller falls
    /// through to the fallback prompts).
    pub fn resolve(
        &self,
        text: &str,
        state: &DialogueState,
        rng: &mut impl Rng,
    ) -> Option<ContextualReply> {
        let topic = state.topic?;
        let now = Local::now().timestamp();

        // Idle users get re-engaged before any slot interpretation.
        if now - state.last_interaction_at > self.idle_timeout_secs {
            return Some(ContextualReply {
                text: format!(
                    "Still there? We were talking about {}. Pick up where we \
                     left off whenever you're ready!",
                    topic
                ),
                patch: ContextPatch::default(),
                reengaged: true,
            });
        }

        let lower = text.to_lowercase();

        match (topic, state.pending_question) {
            (Topic::RoutePlanning, Some(PendingSlot::Location)) => {
                if let Some((start, dest)) = split_from_to(&lower) {
                    return Some(self.ask_for_mode(start, dest));
                }
                if state.slots.start_point.is_none() {
                    let start = lower.trim().to_string();
                    return Some(ContextualReply {
                        text: format!(
                            "Starting from {}, got it. Where are you headed?",
                            start
                        ),
                        patch: ContextPatch {
                            start_point: Some(start),
                            pending_question: Some(PendingSlot::Destination),
                            ..Default::default()
                        },
                        reengaged: false,
                    });
                }
                if state.slots.destination.is_none() {
                    let dest = lower.trim().to_string();
                    let start = state.slots.start_point.clone().unwrap_or_default();
                    return Some(self.ask_for_mode(start, dest));
                }
            }
            (Topic::RoutePlanning, Some(PendingSlot::Destination)) => {
                let dest = lower.trim().to_string();
                let start = state.slots.start_point.clone().unwrap_or_default();
                return Some(self.ask_for_mode(start, dest));
            }
            (_, Some(PendingSlot::Mode)) => {
                if let Some(mode) = scan_mode(&lower) {
                    if state.slots.has_endpoints() {
                        let start = state.slots.start_point.clone().unwrap_or_default();
                        let dest = state.slots.destination.clone().unwrap_or_default();
                        return Some(ContextualReply {
                            text: format!(
                                "Perfect: {} from {} to {}. One of the greenest \
                                 ways to make that journey. Enjoy the ride!",
                                mode, start, dest
                            ),
                            patch: ContextPatch {
                                transport_mode: Some(mode),
                                clear_topic: true,
                                clear_pending: true,
                                ..Default::default()
                            },
                            reengaged: false,
                        });
                    }
                }
            }
            (Topic::Carbon, _) if affirms(&lower) => {
                return Some(ContextualReply {
                    text: "Great! Let's work out your trip's footprint. Where does \
                           your journey start?"
                        .to_string(),
                    patch: ContextPatch {
                        topic: Some(Topic::CarbonCalculation),
                        pending_question: Some(PendingSlot::Start),
                        ..Default::default()
                    },
                    reengaged: false,
                });
            }
            _ => {}
        }

        // Nothing specific to do with this utterance; nudge within topic.
        let template = GENERIC_TEMPLATES[rng.random_range(0..GENERIC_TEMPLATES.len())];
        Some(ContextualReply {
            text: template.replace("{topic}", &topic.to_string()),
            patch: ContextPatch::default(),
            reengaged: false,
        })
    }

    fn ask_for_mode(&self, start: String, dest: String) -> ContextualReply {
        ContextualReply {
            text: format!(
                "From {} to {}, lovely. How would you like to travel? Walking, \
                 cycling, public transport, or an electric vehicle?",
                start, dest
            ),
            patch: ContextPatch {
                start_point: Some(start),
                destination: Some(dest),
                pending_question: Some(PendingSlot::Mode),
                ..Default::default()
            },
            reengaged: false,
        }
    }
}

/// Crude "from X to Y" split. Takes the text between the first "from " and
/// the first " to " after it; the remainder is the destination. Known to
/// break on place names containing "to" or "from"; kept as-is for
/// compatibility with established behavior.
fn split_from_to(lower: &str) -> Option<(String, String)> {
    let after_from = lower.split_once("from ")?.1;
    let (start, dest) = after_from.split_once(" to ")?;
    let start = start.trim().to_string();
    let dest = dest.trim().to_string();
    if start.is_empty() || dest.is_empty() {
        return None;
    }
    Some((start, dest))
}

/// Scan for a transport-mode keyword, greenest group first.
fn scan_mode(lower: &str) -> Option<TransportMode> {
    if lower.contains("walk") {
        Some(TransportMode::Walking)
    } else if lower.contains("cycl") || lower.contains("bike") || lower.contains("bicyc") {
        Some(TransportMode::Cycling)
    } else if lower.contains("public")
        || lower.contains("bus")
        || lower.contains("train")
        || lower.contains("transit")
    {
        Some(TransportMode::PublicTransport)
    } else if lower.contains("electric") || lower.contains("ev") {
        Some(TransportMode::ElectricVehicle)
    } else {
        None
    }
}

/// Whether the utterance affirms the previous question.
fn affirms(lower: &str) -> bool {
    lower.contains("yes") || lower.contains("sure") || lower.contains("ok")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn resolver() -> ContextResolver {
        ContextResolver::new(300)
    }

    fn route_state(pending: PendingSlot) -> DialogueState {
        let mut state = DialogueState::new();
        state.topic = Some(Topic::RoutePlanning);
        state.pending_question = Some(pending);
        state
    }

    // ---- split_from_to ----

    #[test]
    fn test_split_from_to_basic() {
        let (start, dest) = split_from_to("i want to travel from paris to tokyo").unwrap();
        assert_eq!(start, "paris");
        assert_eq!(dest, "tokyo");
    }

    #[test]
    fn test_split_from_to_multiword_places() {
        let (start, dest) = split_from_to("from new york to buenos aires").unwrap();
        assert_eq!(start, "new york");
        assert_eq!(dest, "buenos aires");
    }

    #[test]
    fn test_split_requires_both_markers() {
        assert!(split_from_to("from paris").is_none());
        assert!(split_from_to("to tokyo").is_none());
        assert!(split_from_to("paris tokyo").is_none());
    }

    #[test]
    fn test_split_empty_parts_rejected() {
        assert!(split_from_to("from  to tokyo").is_none());
    }

    // ---- scan_mode ----

    #[test]
    fn test_scan_mode_variants() {
        assert_eq!(scan_mode("i'll walk"), Some(TransportMode::Walking));
        assert_eq!(scan_mode("i'll cycle there"), Some(TransportMode::Cycling));
        assert_eq!(scan_mode("by bike"), Some(TransportMode::Cycling));
        assert_eq!(
            scan_mode("take the train"),
            Some(TransportMode::PublicTransport)
        );
        assert_eq!(scan_mode("the bus"), Some(TransportMode::PublicTransport));
        assert_eq!(
            scan_mode("an electric car"),
            Some(TransportMode::ElectricVehicle)
        );
        assert_eq!(scan_mode("carrier pigeon"), None);
    }

    #[test]
    fn test_scan_mode_walking_beats_later_groups() {
        // First group wins when several keywords appear.
        assert_eq!(
            scan_mode("walk to the bus stop"),
            Some(TransportMode::Walking)
        );
    }

    // ---- Route-planning slot filling ----

    #[test]
    fn test_from_to_fills_both_slots() {
        let state = route_state(PendingSlot::Location);
        let reply = resolver()
            .resolve("I want to travel from Paris to Tokyo", &state, &mut rng())
            .unwrap();
        assert_eq!(reply.patch.start_point.as_deref(), Some("paris"));
        assert_eq!(reply.patch.destination.as_deref(), Some("tokyo"));
        assert_eq!(reply.patch.pending_question, Some(PendingSlot::Mode));
        assert!(!reply.patch.count_turn);
    }

    #[test]
    fn test_bare_input_becomes_start_point() {
        let state = route_state(PendingSlot::Location);
        let reply = resolver().resolve("Lisbon", &state, &mut rng()).unwrap();
        assert_eq!(reply.patch.start_point.as_deref(), Some("lisbon"));
        assert_eq!(reply.patch.pending_question, Some(PendingSlot::Destination));
        assert!(reply.text.contains("lisbon"));
    }

    #[test]
    fn test_second_input_becomes_destination() {
        let mut state = route_state(PendingSlot::Destination);
        state.slots.start_point = Some("lisbon".to_string());
        let reply = resolver().resolve("Porto", &state, &mut rng()).unwrap();
        assert_eq!(reply.patch.destination.as_deref(), Some("porto"));
        assert_eq!(reply.patch.pending_question, Some(PendingSlot::Mode));
    }

    #[test]
    fn test_location_pending_with_start_set_takes_destination() {
        // pending stuck at location but start already known: input is the
        // destination.
        let mut state = route_state(PendingSlot::Location);
        state.slots.start_point = Some("lisbon".to_string());
        let reply = resolver().resolve("Porto", &state, &mut rng()).unwrap();
        assert_eq!(reply.patch.destination.as_deref(), Some("porto"));
        assert_eq!(reply.patch.pending_question, Some(PendingSlot::Mode));
    }

    // ---- Mode recognition ----

    #[test]
    fn test_mode_completes_plan() {
        let mut state = route_state(PendingSlot::Mode);
        state.slots.start_point = Some("paris".to_string());
        state.slots.destination = Some("tokyo".to_string());
        let reply = resolver()
            .resolve("I'll cycle there", &state, &mut rng())
            .unwrap();
        assert!(reply.text.contains("cycling"));
        assert_eq!(reply.patch.transport_mode, Some(TransportMode::Cycling));
        assert!(reply.patch.clear_pending);
        assert!(reply.patch.clear_topic);
    }

    #[test]
    fn test_mode_without_endpoints_falls_to_generic() {
        let state = route_state(PendingSlot::Mode);
        let reply = resolver()
            .resolve("I'll cycle there", &state, &mut rng())
            .unwrap();
        assert!(reply.patch.transport_mode.is_none());
        assert!(reply.text.contains("route planning"));
    }

    #[test]
    fn test_unrecognized_mode_falls_to_generic() {
        let mut state = route_state(PendingSlot::Mode);
        state.slots.start_point = Some("paris".to_string());
        state.slots.destination = Some("tokyo".to_string());
        let reply = resolver()
            .resolve("by hot air balloon", &state, &mut rng())
            .unwrap();
        assert!(reply.patch.transport_mode.is_none());
        assert!(!reply.patch.clear_pending);
    }

    // ---- Carbon affirmation ----

    #[test]
    fn test_carbon_affirmation_advances_topic() {
        let mut state = DialogueState::new();
        state.topic = Some(Topic::Carbon);
        let reply = resolver().resolve("yes please", &state, &mut rng()).unwrap();
        assert_eq!(reply.patch.topic, Some(Topic::CarbonCalculation));
        assert_eq!(reply.patch.pending_question, Some(PendingSlot::Start));
    }

    #[test]
    fn test_carbon_non_affirmation_falls_to_generic() {
        let mut state = DialogueState::new();
        state.topic = Some(Topic::Carbon);
        let reply = resolver()
            .resolve("maybe another time", &state, &mut rng())
            .unwrap();
        assert!(reply.patch.topic.is_none());
        assert!(reply.text.contains("carbon"));
    }

    // ---- Idle re-engagement ----

    #[test]
    fn test_idle_timeout_takes_precedence() {
        let mut state = route_state(PendingSlot::Location);
        state.last_interaction_at = Local::now().timestamp() - 301;
        let reply = resolver()
            .resolve("from paris to tokyo", &state, &mut rng())
            .unwrap();
        assert!(reply.reengaged);
        assert!(reply.text.contains("Still there?"));
        // No slot interpretation happened
        assert!(reply.patch.start_point.is_none());
    }

    #[test]
    fn test_exactly_at_timeout_not_idle() {
        let mut state = route_state(PendingSlot::Location);
        state.last_interaction_at = Local::now().timestamp() - 300;
        let reply = resolver().resolve("Lisbon", &state, &mut rng()).unwrap();
        assert!(!reply.reengaged);
    }

    // ---- No topic ----

    #[test]
    fn test_no_topic_returns_none() {
        let state = DialogueState::new();
        assert!(resolver().resolve("anything", &state, &mut rng()).is_none());
    }

    // ---- Generic templates ----

    #[test]
    fn test_generic_template_mentions_topic() {
        let mut state = DialogueState::new();
        state.topic = Some(Topic::Weather);
        let mut r = rng();
        for _ in 0..10 {
            let reply = resolver().resolve("mmm", &state, &mut r).unwrap();
            assert!(reply.text.contains("weather"));
            assert_eq!(reply.patch, ContextPatch::default());
        }
    }
}

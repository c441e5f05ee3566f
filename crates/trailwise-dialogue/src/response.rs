//! Canned response text: empathy prefixes, travel tips, and the
//! escalating fallback prompts.

use rand::Rng;

use trailwise_core::types::Sentiment;

/// Prefix for matched replies when the user sounds pleased.
const EMPATHY_POSITIVE: &str = "I'm glad to help! ";
/// Prefix for matched replies when the user sounds unhappy.
const EMPATHY_NEGATIVE: &str = "I understand your concern. ";

/// Clarification prompts, increasingly specific. Indexed by
/// `min(turn_count, 3)`, so the last prompt repeats indefinitely.
static FALLBACK_PROMPTS: &[&str] = &[
    "I'm not sure I follow. Could you rephrase that?",
    "I still didn't catch that. Are you asking about routes, carbon \
     savings, or places to stay?",
    "Let's try it another way: tell me where you want to go, or say \
     'help' to see everything I can do.",
    "I may not be able to answer that directly. I'm best at planning \
     green routes, estimating carbon savings, and sharing travel tips. \
     Try one of those!",
];

/// Pool of cosmetic travel tips occasionally appended to replies.
static TIPS: &[&str] = &[
    "Tip: trains typically emit around 80% less CO2 than flying the \
     same distance.",
    "Tip: packing light saves fuel on every leg of your trip.",
    "Tip: city bike-share schemes are often the fastest way across town.",
    "Tip: overnight trains can replace both a flight and a hotel night.",
    "Tip: local markets beat imported food on both flavour and footprint.",
];

/// Applies cosmetic variation to replies and selects fallback prompts.
pub struct ResponseComposer {
    /// Probability of an empathy prefix on a matched reply.
    pub empathy_probability: f64,
    /// Probability of appending a tip to any reply.
    pub tip_probability: f64,
}

impl ResponseComposer {
    pub fn new(empathy_probability: f64, tip_probability: f64) -> Self {
        Self {
            empathy_probability,
            tip_probability,
        }
    }

    /// The clarification prompt for the given turn count.
    pub fn fallback_prompt(&self, turn_count: u32) -> &'static str {
        let index = (turn_count as usize).min(FALLBACK_PROMPTS.len() - 1);
        FALLBACK_PROMPTS[index]
    }

    /// An empathy prefix keyed to sentiment, or `None` for neutral input
    /// or when the random draw says to skip it.
    pub fn empathy_prefix(
        &self,
        sentiment: Sentiment,
        rng: &mut impl Rng,
    ) -> Option<&'static str> {
        let prefix = match sentiment {
            Sentiment::Positive => EMPATHY_POSITIVE,
            Sentiment::Negative => EMPATHY_NEGATIVE,
            Sentiment::Neutral => return None,
        };
        rng.random_bool(self.empathy_probability).then_some(prefix)
    }

    /// A random tip, or `None` when the draw says to skip it.
    pub fn maybe_tip(&self, rng: &mut impl Rng) -> Option<&'static str> {
        if rng.random_bool(self.tip_probability) {
            Some(TIPS[rng.random_range(0..TIPS.len())])
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    // ---- Fallback prompts ----

    #[test]
    fn test_fallback_prompts_escalate() {
        let composer = ResponseComposer::new(0.3, 0.2);
        let prompts: Vec<&str> = (0..4).map(|t| composer.fallback_prompt(t)).collect();
        // Four distinct prompts in a fixed order
        for i in 0..4 {
            for j in (i + 1)..4 {
                assert_ne!(prompts[i], prompts[j]);
            }
        }
    }

    #[test]
    fn test_fallback_prompt_saturates() {
        let composer = ResponseComposer::new(0.3, 0.2);
        assert_eq!(composer.fallback_prompt(3), composer.fallback_prompt(4));
        assert_eq!(composer.fallback_prompt(3), composer.fallback_prompt(100));
    }

    // ---- Empathy prefix ----

    #[test]
    fn test_empathy_neutral_never_prefixes() {
        let composer = ResponseComposer::new(1.0, 0.0);
        let mut r = rng();
        for _ in 0..20 {
            assert!(composer.empathy_prefix(Sentiment::Neutral, &mut r).is_none());
        }
    }

    #[test]
    fn test_empathy_certain_probability() {
        let composer = ResponseComposer::new(1.0, 0.0);
        let mut r = rng();
        assert_eq!(
            composer.empathy_prefix(Sentiment::Positive, &mut r),
            Some("I'm glad to help! ")
        );
        assert_eq!(
            composer.empathy_prefix(Sentiment::Negative, &mut r),
            Some("I understand your concern. ")
        );
    }

    #[test]
    fn test_empathy_zero_probability() {
        let composer = ResponseComposer::new(0.0, 0.0);
        let mut r = rng();
        for _ in 0..20 {
            assert!(composer
                .empathy_prefix(Sentiment::Positive, &mut r)
                .is_none());
        }
    }

    // ---- Tips ----

    #[test]
    fn test_tip_certain_probability() {
        let composer = ResponseComposer::new(0.0, 1.0);
        let mut r = rng();
        let tip = composer.maybe_tip(&mut r).unwrap();
        assert!(tip.starts_with("Tip:"));
    }

    #[test]
    fn test_tip_zero_probability() {
        let composer = ResponseComposer::new(0.0, 0.0);
        let mut r = rng();
        for _ in 0..20 {
            assert!(composer.maybe_tip(&mut r).is_none());
        }
    }

    #[test]
    fn test_tip_selection_is_seed_deterministic() {
        let composer = ResponseComposer::new(0.0, 1.0);
        let a = composer.maybe_tip(&mut StdRng::seed_from_u64(9));
        let b = composer.maybe_tip(&mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}

//! Canned replies used when no live provider answer is available.

use crate::category::{Category, classify};
use rand::Rng;
use rand::seq::SliceRandom;

/// Reply used when the request itself could not be processed.
pub const APOLOGY: &str = "I'm sorry, I encountered an error. Could we try again?";

const GREETING: &[&str] = &[
    "Hello! How are you feeling today?",
    "Hi there! I'm ZenBot. How can I support you today?",
    "Welcome! I'm here to listen and help. How are you doing?",
];

const FEELING_GOOD: &[&str] = &[
    "I'm glad to hear you're feeling good! What's been going well for you?",
    "That's wonderful to hear! Celebrating positive moments is important for mental wellbeing.",
    "I'm happy you're doing well! Is there anything specific that's contributed to your good mood?",
];

const FEELING_BAD: &[&str] = &[
    "I'm sorry to hear you're not feeling great. Would you like to talk about what's troubling you?",
    "That sounds difficult. Remember that it's okay to have bad days. Is there something specific on your mind?",
    "I'm here for you during the tough times. What's been challenging for you lately?",
];

const ANXIETY: &[&str] = &[
    "Anxiety can be really challenging. Have you tried any breathing exercises? Taking slow, deep breaths can help calm your nervous system.",
    "When you're feeling anxious, it might help to ground yourself by naming 5 things you can see, 4 things you can touch, 3 things you can hear, 2 things you can smell, and 1 thing you can taste.",
    "Anxiety is your body's natural response to stress. Remember that these feelings will pass. Is there a specific situation triggering your anxiety?",
];

const DEPRESSION: &[&str] = &[
    "Depression can make everything feel more difficult. Remember to be gentle with yourself - even small steps forward matter.",
    "When dealing with depression, it's important to acknowledge your feelings without judgment. Have you been able to talk to anyone else about how you're feeling?",
    "Depression can be isolating, but you're not alone. Many people experience similar feelings. Have you considered speaking with a mental health professional?",
];

const STRESS: &[&str] = &[
    "Stress can be overwhelming. Taking short breaks throughout your day might help - even a 5-minute walk or stretching session.",
    "Managing stress often starts with identifying what's within your control and what isn't. Would it help to talk through what's causing your stress?",
    "When we're stressed, self-care becomes even more important. Have you been able to make time for activities that help you recharge?",
];

const GRATITUDE: &[&str] = &[
    "Practicing gratitude is a powerful tool for mental wellbeing. What are three things you feel grateful for today?",
    "That's a wonderful perspective! Focusing on gratitude can help shift our mindset even during difficult times.",
    "Appreciating the positive aspects of life, even small ones, can be really beneficial for mental health. What else brings you joy?",
];

const DEFAULT: &[&str] = &[
    "I'm here to listen and support you. Could you tell me more about how you're feeling?",
    "Thank you for sharing that with me. It takes courage to open up about your feelings.",
    "I understand this might be difficult. Remember that it's okay to take things one step at a time.",
    "Your mental health matters. What small step could you take today to care for yourself?",
    "I'm sorry to hear you're going through this. Would it help to talk more about what's on your mind?",
];

/// Returns the fixed reply list for a category. Never empty.
pub fn responses(category: Category) -> &'static [&'static str] {
    match category {
        Category::Greeting => GREETING,
        Category::FeelingGood => FEELING_GOOD,
        Category::FeelingBad => FEELING_BAD,
        Category::Anxiety => ANXIETY,
        Category::Depression => DEPRESSION,
        Category::Stress => STRESS,
        Category::Gratitude => GRATITUDE,
        Category::Default => DEFAULT,
    }
}

/// The uncategorized list used by flat fallback.
pub fn flat_responses() -> &'static [&'static str] {
    DEFAULT
}

fn pick<R: Rng + ?Sized>(list: &'static [&'static str], rng: &mut R) -> &'static str {
    list.choose(rng).copied().unwrap_or(APOLOGY)
}

/// Picks a reply for a category uniformly at random.
pub fn pick_for<R: Rng + ?Sized>(category: Category, rng: &mut R) -> &'static str {
    pick(responses(category), rng)
}

/// How a resolver chooses its fallback reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackStyle {
    /// Classify the latest message and pick from that category.
    #[default]
    Categorized,
    /// Pick from the flat list regardless of content.
    Flat,
}

impl FallbackStyle {
    pub fn choose<R: Rng + ?Sized>(self, latest_message: &str, rng: &mut R) -> &'static str {
        match self {
            FallbackStyle::Categorized => pick_for(classify(latest_message), rng),
            FallbackStyle::Flat => pick(flat_responses(), rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_every_category_has_responses() {
        for category in Category::ALL {
            assert!(!responses(category).is_empty(), "{category} has no replies");
        }
    }

    #[test]
    fn test_categorized_pick_stays_in_category() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let reply = FallbackStyle::Categorized.choose("Hello!", &mut rng);
            assert!(responses(Category::Greeting).contains(&reply));
        }
    }

    #[test]
    fn test_flat_pick_ignores_content() {
        let mut rng = StdRng::seed_from_u64(7);
        let reply = FallbackStyle::Flat.choose("Hello!", &mut rng);
        assert!(flat_responses().contains(&reply));
    }

    #[test]
    fn test_same_seed_same_pick() {
        let first = pick_for(Category::Stress, &mut StdRng::seed_from_u64(42));
        let second = pick_for(Category::Stress, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }
}

//! Keyword classification of the user's latest message.
//!
//! Rules are evaluated top to bottom against the lowercased text and the first
//! matching rule decides the category. Matching is plain substring search, so
//! short terms such as `hi` also match inside longer words.

/// Coarse label used to pick a relevant fallback reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Greeting,
    FeelingGood,
    FeelingBad,
    Anxiety,
    Depression,
    Stress,
    Gratitude,
    Default,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Greeting,
        Category::FeelingGood,
        Category::FeelingBad,
        Category::Anxiety,
        Category::Depression,
        Category::Stress,
        Category::Gratitude,
        Category::Default,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Greeting => "greeting",
            Category::FeelingGood => "feeling_good",
            Category::FeelingBad => "feeling_bad",
            Category::Anxiety => "anxiety",
            Category::Depression => "depression",
            Category::Stress => "stress",
            Category::Gratitude => "gratitude",
            Category::Default => "default",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const SELF_STATE_TERMS: &[&str] = &["feel", "doing", "am", "i'm"];

enum Matcher {
    /// Any of the terms is present.
    Any(&'static [&'static str]),
    /// A term from each list is present.
    Both(&'static [&'static str], &'static [&'static str]),
}

impl Matcher {
    fn matches(&self, text: &str) -> bool {
        let any = |terms: &[&str]| terms.iter().any(|term| text.contains(term));
        match self {
            Matcher::Any(terms) => any(terms),
            Matcher::Both(first, second) => any(first) && any(second),
        }
    }
}

struct Rule {
    matcher: Matcher,
    category: Category,
}

const RULES: &[Rule] = &[
    Rule {
        matcher: Matcher::Any(&["hello", "hi", "hey"]),
        category: Category::Greeting,
    },
    Rule {
        matcher: Matcher::Both(&["good", "great", "happy", "well"], SELF_STATE_TERMS),
        category: Category::FeelingGood,
    },
    Rule {
        matcher: Matcher::Both(
            &["bad", "sad", "down", "not great", "terrible"],
            SELF_STATE_TERMS,
        ),
        category: Category::FeelingBad,
    },
    Rule {
        matcher: Matcher::Any(&["anxi", "nervous", "worry"]),
        category: Category::Anxiety,
    },
    Rule {
        matcher: Matcher::Any(&["depress", "hopeless", "meaningless"]),
        category: Category::Depression,
    },
    Rule {
        matcher: Matcher::Any(&["stress", "overwhelm", "too much"]),
        category: Category::Stress,
    },
    Rule {
        matcher: Matcher::Any(&["grateful", "thankful", "appreciate"]),
        category: Category::Gratitude,
    },
];

/// Classifies a message into a [`Category`], case-insensitively.
pub fn classify(text: &str) -> Category {
    let lower = text.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matcher.matches(&lower))
        .map(|rule| rule.category)
        .unwrap_or(Category::Default)
}

//! Leading scaffold-phrase stripping.
//!
//! Commands arrive wrapped in conversational scaffolding ("please add ...",
//! "remind me to ..."). Each pattern is anchored at start-of-string and
//! applied at most once, top to bottom; stripping one prefix can expose the
//! next ("please add" falls to "please", then "add").

use std::sync::LazyLock;

use regex::Regex;

use super::WorkingText;

static START_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^i need to add\s+",
        r"^i need to\s+",
        r"^i have to\s+",
        r"^please add\s+",
        r"^please\s+",
        r"^can you add\s+",
        r"^could you add\s+",
        r"^can you\s+",
        r"^could you\s+",
        r"^remind me to\s+",
        r"^remind me\s+",
        r"^add\s+",
        r"^create\s+",
        r"^make\s+",
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){p}")).unwrap())
    .collect()
});

/// Strip conversational scaffolding from the start of the working text.
///
/// Never fails; text without a recognized prefix passes through unchanged.
pub fn strip_scaffolding(text: &mut WorkingText) {
    for pattern in START_PATTERNS.iter() {
        let stripped = pattern.replace(text.working(), "").trim().to_string();
        text.set_working(&stripped);
    }
}

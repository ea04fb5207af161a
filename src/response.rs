//! Operator response classification.

/// Classification of a free-text operator response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Affirmative,
    Negative,
    /// Not an error; triggers a reprompt in the run loop.
    Invalid,
}

const AFFIRMATIVE: [&str; 11] =
    ["yes", "y", "yep", "yeah", "yah", "ya", "yup", "aye", "ok", "okay", "sure"];

const NEGATIVE: [&str; 6] = ["no", "n", "nope", "nay", "nah", "naw"];

/// Classify a raw operator response.
///
/// Matching is case-insensitive and tolerant of elongated spellings
/// ("yesss", "noooo"). Every input maps to exactly one sentiment; the raw
/// text is kept by the caller for logging.
#[must_use]
pub fn classify(input: &str) -> Sentiment {
    let mut normalized = input.trim().to_lowercase();

    // collapse repeated trailing letters ("yesss" -> "yes")
    while normalized.len() >= 2 {
        let mut chars = normalized.chars().rev();
        let (last, prev) = (chars.next(), chars.next());
        if last.is_some() && last == prev {
            normalized.pop();
        } else {
            break;
        }
    }

    if AFFIRMATIVE.contains(&normalized.as_str()) {
        Sentiment::Affirmative
    } else if NEGATIVE.contains(&normalized.as_str()) {
        Sentiment::Negative
    } else {
        Sentiment::Invalid
    }
}

//! Display treatment for categorical values

use serde::Serialize;

use crate::models::QualityRating;

/// Semantic display tone; renderers map it to concrete colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Info,
    Caution,
    Negative,
    Neutral,
}

pub fn quality_tone(rating: &QualityRating) -> Tone {
    match rating {
        QualityRating::Excellent => Tone::Positive,
        QualityRating::Good => Tone::Info,
        QualityRating::Fair => Tone::Caution,
        QualityRating::Poor => Tone::Negative,
        QualityRating::Other(_) => Tone::Neutral,
    }
}

pub fn relevance_tone(correct: bool) -> Tone {
    if correct { Tone::Positive } else { Tone::Negative }
}

pub fn relevance_label(correct: bool) -> &'static str {
    if correct { "Correct" } else { "Incorrect" }
}

pub fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

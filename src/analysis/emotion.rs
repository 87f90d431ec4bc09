//! Emotion label from polarity scores

use std::fmt;

use serde::Serialize;

use crate::sentiment::PolarityScores;

/// Compound score at or above which a passage reads as joyful
pub const JOY_THRESHOLD: f64 = 0.05;
/// Compound score at or below which a passage reads as sad
pub const SADNESS_THRESHOLD: f64 = -0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Joy,
    Sadness,
    Surprise,
    Anger,
    Disgust,
    Fear,
    Neutral,
}

impl Emotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Sadness => "sadness",
            Emotion::Surprise => "surprise",
            Emotion::Anger => "anger",
            Emotion::Disgust => "disgust",
            Emotion::Fear => "fear",
            Emotion::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map polarity scores to the predominant emotion.
///
/// Checks run in order and the first match wins. Past the `Surprise` and
/// `Anger` arms `pos == neg`, so `Fear` can never fire, and `Disgust` only
/// fires for `pos + neg > 1`, which real scores never reach. Both arms are
/// kept so the label set stays complete.
pub fn classify(scores: &PolarityScores) -> Emotion {
    let PolarityScores {
        neg, pos, compound, ..
    } = *scores;

    if compound >= JOY_THRESHOLD {
        Emotion::Joy
    } else if compound <= SADNESS_THRESHOLD {
        Emotion::Sadness
    } else if pos > neg {
        Emotion::Surprise
    } else if neg > pos {
        Emotion::Anger
    } else if neg > 0.5 {
        Emotion::Disgust
    } else if pos < 0.1 && neg > 0.1 {
        Emotion::Fear
    } else {
        Emotion::Neutral
    }
}

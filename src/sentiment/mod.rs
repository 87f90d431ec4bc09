//! Lexicon and rule-based sentiment scoring (VADER)
//!
//! Each token found in the lexicon contributes its valence, adjusted by the
//! surrounding words: boosters and dampeners, ALL-CAPS emphasis, negation
//! within a three-word window, "but" contrast, "least", and a handful of
//! idioms. The sum is normalized into a compound score in [-1, 1] and the
//! per-token valences are sifted into positive, negative and neutral
//! proportions.

mod lexicon;
mod rules;

pub use lexicon::Lexicon;

use rules::{
    BOOSTERS_DOWN, BOOSTERS_UP, B_DECR, B_INCR, C_INCR, NEGATE, NORMALIZATION_ALPHA, N_SCALAR,
    SPECIAL_CASES,
};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::nlp::tokenize::PUNCTUATION;

/// Polarity of a text: proportions of negative, neutral and positive
/// content plus the normalized compound score
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PolarityScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
}

/// Sentiment scorer over a loaded lexicon
#[derive(Debug, Clone)]
pub struct SentimentAnalyzer {
    lexicon: Lexicon,
    boosters: FxHashMap<&'static str, f64>,
    negations: FxHashSet<&'static str>,
    special_cases: FxHashMap<&'static str, f64>,
}

impl SentimentAnalyzer {
    pub fn new(lexicon: Lexicon) -> Self {
        let boosters = BOOSTERS_UP
            .iter()
            .map(|w| (*w, B_INCR))
            .chain(BOOSTERS_DOWN.iter().map(|w| (*w, B_DECR)))
            .collect();

        Self {
            lexicon,
            boosters,
            negations: NEGATE.iter().copied().collect(),
            special_cases: SPECIAL_CASES.iter().copied().collect(),
        }
    }

    /// Number of lexicon entries
    pub fn lexicon_len(&self) -> usize {
        self.lexicon.len()
    }

    /// Score a text
    pub fn polarity_scores(&self, text: &str) -> PolarityScores {
        let tokens = SentiText::new(text);
        let words = &tokens.words;

        let mut sentiments = Vec::with_capacity(words.len());
        for (i, item) in tokens.lower.iter().enumerate() {
            // Boosters and "kind of" only modify their neighbours
            let is_kind_of = item == "kind" && tokens.lower.get(i + 1).is_some_and(|n| n == "of");
            if self.boosters.contains_key(item.as_str()) || is_kind_of {
                sentiments.push(0.0);
                continue;
            }
            sentiments.push(self.sentiment_valence(&tokens, i));
        }

        but_check(&tokens.lower, &mut sentiments);
        score_valence(&sentiments, text)
    }

    fn sentiment_valence(&self, tokens: &SentiText, i: usize) -> f64 {
        let lower = &tokens.lower;
        let item = &lower[i];

        let Some(base) = self.lexicon.get(item) else {
            return 0.0;
        };
        let mut valence = base;

        // "no" directly before another lexicon word negates that word instead
        if item == "no" && lower.get(i + 1).is_some_and(|next| self.lexicon.contains(next)) {
            valence = 0.0;
        }
        let preceded_by_no = (i > 0 && lower[i - 1] == "no")
            || (i > 1 && lower[i - 2] == "no")
            || (i > 2 && lower[i - 3] == "no" && matches!(lower[i - 1].as_str(), "or" | "nor"));
        if preceded_by_no {
            valence = base * N_SCALAR;
        }

        if is_upper(&tokens.words[i]) && tokens.is_cap_diff {
            if valence > 0.0 {
                valence += C_INCR;
            } else {
                valence -= C_INCR;
            }
        }

        for start_i in 0..3 {
            if i > start_i && !self.lexicon.contains(&lower[i - (start_i + 1)]) {
                let mut s = self.scalar_inc_dec(&tokens.words[i - (start_i + 1)], valence, tokens.is_cap_diff);
                if start_i == 1 && s != 0.0 {
                    s *= 0.95;
                }
                if start_i == 2 && s != 0.0 {
                    s *= 0.9;
                }
                valence += s;
                valence = self.negation_check(valence, lower, start_i, i);
                if start_i == 2 {
                    valence = self.special_idioms_check(valence, lower, i);
                }
            }
        }

        self.least_check(valence, lower, i)
    }

    /// Booster/dampener contribution of the word preceding a lexicon hit
    fn scalar_inc_dec(&self, word: &str, valence: f64, is_cap_diff: bool) -> f64 {
        let Some(&booster) = self.boosters.get(word.to_lowercase().as_str()) else {
            return 0.0;
        };

        let mut scalar = if valence < 0.0 { -booster } else { booster };
        if is_upper(word) && is_cap_diff {
            if valence > 0.0 {
                scalar += C_INCR;
            } else {
                scalar -= C_INCR;
            }
        }
        scalar
    }

    fn is_negation(&self, word: &str) -> bool {
        self.negations.contains(word) || word.contains("n't")
    }

    fn negation_check(&self, valence: f64, lower: &[String], start_i: usize, i: usize) -> f64 {
        match start_i {
            0 => {
                if self.is_negation(&lower[i - 1]) {
                    return valence * N_SCALAR;
                }
            }
            1 => {
                let (w2, w1) = (lower[i - 2].as_str(), lower[i - 1].as_str());
                if w2 == "never" && (w1 == "so" || w1 == "this") {
                    return valence * 1.25;
                } else if w2 == "without" && w1 == "doubt" {
                    return valence;
                } else if self.is_negation(w2) {
                    return valence * N_SCALAR;
                }
            }
            2 => {
                let (w3, w2, w1) = (
                    lower[i - 3].as_str(),
                    lower[i - 2].as_str(),
                    lower[i - 1].as_str(),
                );
                if (w3 == "never" && (w2 == "so" || w2 == "this")) || (w1 == "so" || w1 == "this") {
                    return valence * 1.25;
                } else if w3 == "without" && (w2 == "doubt" || w1 == "doubt") {
                    return valence;
                } else if self.is_negation(w3) {
                    return valence * N_SCALAR;
                }
            }
            _ => {}
        }
        valence
    }

    /// Idioms around a word at least three tokens into the text
    fn special_idioms_check(&self, mut valence: f64, lower: &[String], i: usize) -> f64 {
        let one_zero = format!("{} {}", lower[i - 1], lower[i]);
        let two_one_zero = format!("{} {} {}", lower[i - 2], lower[i - 1], lower[i]);
        let two_one = format!("{} {}", lower[i - 2], lower[i - 1]);
        let three_two_one = format!("{} {} {}", lower[i - 3], lower[i - 2], lower[i - 1]);
        let three_two = format!("{} {}", lower[i - 3], lower[i - 2]);

        let preceding = [&one_zero, &two_one_zero, &two_one, &three_two_one, &three_two];
        if let Some(v) = preceding
            .iter()
            .find_map(|seq| self.special_cases.get(seq.as_str()))
        {
            valence = *v;
        }

        if lower.len() - 1 > i {
            let zero_one = format!("{} {}", lower[i], lower[i + 1]);
            if let Some(v) = self.special_cases.get(zero_one.as_str()) {
                valence = *v;
            }
        }
        if lower.len() - 1 > i + 1 {
            let zero_one_two = format!("{} {} {}", lower[i], lower[i + 1], lower[i + 2]);
            if let Some(v) = self.special_cases.get(zero_one_two.as_str()) {
                valence = *v;
            }
        }

        // Multi-word dampeners such as "sort of" and "kind of"
        for n_gram in [&three_two_one, &three_two, &two_one] {
            if let Some(b) = self.boosters.get(n_gram.as_str()) {
                valence += b;
            }
        }

        valence
    }

    fn least_check(&self, valence: f64, lower: &[String], i: usize) -> f64 {
        if i > 1 && !self.lexicon.contains(&lower[i - 1]) && lower[i - 1] == "least" {
            if lower[i - 2] != "at" && lower[i - 2] != "very" {
                return valence * N_SCALAR;
            }
        } else if i > 0 && !self.lexicon.contains(&lower[i - 1]) && lower[i - 1] == "least" {
            return valence * N_SCALAR;
        }
        valence
    }
}

/// Whitespace tokens with surrounding punctuation stripped from words.
///
/// Single-character tokens such as "I" are kept and count as neutral.
struct SentiText {
    words: Vec<String>,
    lower: Vec<String>,
    /// Some, but not all, tokens are ALL CAPS
    is_cap_diff: bool,
}

impl SentiText {
    fn new(text: &str) -> Self {
        let words: Vec<String> = text.split_whitespace().map(strip_punc_if_word).collect();
        let lower = words.iter().map(|w| w.to_lowercase()).collect();

        let allcap_words = words.iter().filter(|w| is_upper(w)).count();
        let cap_differential = words.len() - allcap_words;
        let is_cap_diff = cap_differential > 0 && cap_differential < words.len();

        Self {
            words,
            lower,
            is_cap_diff,
        }
    }
}

/// Strip leading/trailing punctuation unless that leaves two characters or
/// fewer, which keeps emoticons such as ":)" intact
fn strip_punc_if_word(token: &str) -> String {
    let stripped = token.trim_matches(|c: char| PUNCTUATION.contains(c));
    if stripped.chars().count() <= 2 {
        token.to_string()
    } else {
        stripped.to_string()
    }
}

/// At least one cased character and no lowercase ones
fn is_upper(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}

/// Words before "but" count half, words after it count one and a half
fn but_check(lower: &[String], sentiments: &mut [f64]) {
    let Some(bi) = lower.iter().position(|w| w == "but") else {
        return;
    };
    for (si, sentiment) in sentiments.iter_mut().enumerate() {
        if si < bi {
            *sentiment *= 0.5;
        } else if si > bi {
            *sentiment *= 1.5;
        }
    }
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn punctuation_emphasis(text: &str) -> f64 {
    let ep_count = text.matches('!').count().min(4);
    let ep_amplifier = ep_count as f64 * 0.292;

    let qm_count = text.matches('?').count();
    let qm_amplifier = match qm_count {
        0 | 1 => 0.0,
        2..=3 => qm_count as f64 * 0.18,
        _ => 0.96,
    };

    ep_amplifier + qm_amplifier
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn score_valence(sentiments: &[f64], text: &str) -> PolarityScores {
    if sentiments.is_empty() {
        return PolarityScores::default();
    }

    let punct_emph_amplifier = punctuation_emphasis(text);

    let mut sum_s: f64 = sentiments.iter().sum();
    if sum_s > 0.0 {
        sum_s += punct_emph_amplifier;
    } else if sum_s < 0.0 {
        sum_s -= punct_emph_amplifier;
    }
    let compound = normalize(sum_s);

    // Neutral words count as 1, so shift the sums away from zero by 1 each
    let mut pos_sum = 0.0;
    let mut neg_sum = 0.0;
    let mut neu_count = 0.0;
    for &s in sentiments {
        if s > 0.0 {
            pos_sum += s + 1.0;
        } else if s < 0.0 {
            neg_sum += s - 1.0;
        } else {
            neu_count += 1.0;
        }
    }

    if pos_sum > neg_sum.abs() {
        pos_sum += punct_emph_amplifier;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= punct_emph_amplifier;
    }

    let total = pos_sum + neg_sum.abs() + neu_count;
    PolarityScores {
        neg: round_to((neg_sum / total).abs(), 3),
        neu: round_to((neu_count / total).abs(), 3),
        pos: round_to((pos_sum / total).abs(), 3),
        compound: round_to(compound, 4),
    }
}

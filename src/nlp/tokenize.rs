//! Sentence and word tokenization
//!
//! Sentences are split on terminal punctuation and blank lines, with an
//! abbreviation list to avoid breaking on "Dr." or "e.g.". Words follow the
//! Penn Treebank conventions: punctuation is split off, contractions are
//! separated and double quotes become `` and ''.

use regex::Regex;
use rustc_hash::FxHashSet;

/// ASCII punctuation characters
pub const PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Abbreviations seeded into `tokenizers/abbreviations.txt` on first run
pub const DEFAULT_ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "inc", "ltd", "co", "corp",
    "dept", "univ", "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov",
    "dec", "vol", "fig", "gen", "col", "lt", "sgt", "capt", "cmdr", "rev", "hon", "mt", "ave",
    "approx", "e.g", "i.e", "u.s", "u.k", "a.m", "p.m", "ph.d",
];

/// Characters that may trail a sentence terminator and still belong to it
const CLOSERS: &[char] = &['"', '\'', ')', ']', '}', '\u{201D}', '\u{2019}'];

/// Characters stripped from the front of a word before the abbreviation check
const OPENERS: &[char] = &['"', '\'', '(', '[', '{', '\u{201C}', '\u{2018}'];

/// A regex substitution applied to the whole sentence
struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

impl Rule {
    fn new(pattern: &str, replacement: &'static str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement,
        })
    }

    fn apply(&self, text: String) -> String {
        self.pattern.replace_all(&text, self.replacement).into_owned()
    }
}

/// Sentence splitter and Treebank-style word tokenizer
pub struct Tokenizer {
    abbreviations: FxHashSet<String>,
    paragraph_break: Regex,
    /// Applied before the sentence is padded with spaces
    leading: Vec<Rule>,
    /// Applied after padding (quotes and contractions need the boundary space)
    trailing: Vec<Rule>,
}

impl std::fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer")
            .field("abbreviations", &self.abbreviations.len())
            .finish()
    }
}

impl Tokenizer {
    /// Build a tokenizer with the given abbreviation list (case-insensitive,
    /// without the trailing period)
    pub fn new<I, S>(abbreviations: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let abbreviations = abbreviations
            .into_iter()
            .map(|a| a.as_ref().trim().trim_end_matches('.').to_lowercase())
            .filter(|a| !a.is_empty())
            .collect();

        let leading = vec![
            // Starting quotes
            Rule::new(r#"^""#, "``")?,
            Rule::new(r"(``)", " ${1} ")?,
            Rule::new(r#"([ (\[{<])("|'')"#, "${1} `` ")?,
            // Sentence-final period, possibly followed by closing brackets/quotes
            Rule::new(r#"([^.])(\.)([\])}>"']*)\s*$"#, "${1} ${2} ${3} ")?,
            // Punctuation
            Rule::new(r"([:,])([^\d])", " ${1} ${2}")?,
            Rule::new(r"([:,])$", " ${1} ")?,
            Rule::new(r"\.{2,}", " ${0} ")?,
            Rule::new(r"[;@#$%&*]", " ${0} ")?,
            Rule::new(r"[?!]", " ${0} ")?,
            Rule::new(r"([^'])' ", "${1} ' ")?,
            // Parens and brackets
            Rule::new(r"[\]\[(){}<>]", " ${0} ")?,
            Rule::new(r"--", " -- ")?,
        ];

        let trailing = vec![
            // Ending quotes
            Rule::new(r"''", " '' ")?,
            Rule::new(r#"""#, " '' ")?,
            Rule::new(r"([^' ])('[sS]|'[mM]|'[dD]|') ", "${1} ${2} ")?,
            Rule::new(r"([^' ])('ll|'LL|'re|'RE|'ve|'VE|n't|N'T) ", "${1} ${2} ")?,
            // Fused contractions
            Rule::new(r"(?i)\b(can)(not)\b", " ${1} ${2} ")?,
            Rule::new(r"(?i)\b(d)('ye)\b", " ${1} ${2} ")?,
            Rule::new(r"(?i)\b(gim)(me)\b", " ${1} ${2} ")?,
            Rule::new(r"(?i)\b(gon)(na)\b", " ${1} ${2} ")?,
            Rule::new(r"(?i)\b(got)(ta)\b", " ${1} ${2} ")?,
            Rule::new(r"(?i)\b(lem)(me)\b", " ${1} ${2} ")?,
            Rule::new(r"(?i)\b(more)('n)\b", " ${1} ${2} ")?,
            Rule::new(r"(?i)\b(wan)(na)(\s)", " ${1} ${2}${3}")?,
            Rule::new(r"(?i) ('t)(is)\b", " ${1} ${2} ")?,
            Rule::new(r"(?i) ('t)(was)\b", " ${1} ${2} ")?,
        ];

        Ok(Self {
            abbreviations,
            paragraph_break: Regex::new(r"\n[ \t\r]*\n")?,
            leading,
            trailing,
        })
    }

    /// Number of known abbreviations
    pub fn abbreviation_count(&self) -> usize {
        self.abbreviations.len()
    }

    /// Split text into sentences.
    ///
    /// Every returned sentence is a trimmed slice of `text`.
    pub fn sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut sentences = Vec::new();
        let mut para_start = 0;

        for brk in self.paragraph_break.find_iter(text) {
            self.split_paragraph(text, para_start, brk.start(), &mut sentences);
            para_start = brk.end();
        }
        self.split_paragraph(text, para_start, text.len(), &mut sentences);

        sentences
    }

    fn split_paragraph<'a>(&self, text: &'a str, from: usize, to: usize, out: &mut Vec<&'a str>) {
        let para = &text[from..to];
        let chars: Vec<(usize, char)> = para.char_indices().collect();
        let mut start = 0;
        let mut i = 0;

        while i < chars.len() {
            let (pos, c) = chars[i];
            if !matches!(c, '.' | '!' | '?') {
                i += 1;
                continue;
            }

            // Consume the whole terminator run ("?!", "...") and trailing closers
            let mut j = i + 1;
            while j < chars.len() && matches!(chars[j].1, '.' | '!' | '?') {
                j += 1;
            }
            let run_end = j;
            while j < chars.len() && CLOSERS.contains(&chars[j].1) {
                j += 1;
            }

            let next = chars.get(j).map(|&(_, ch)| ch);
            if next.is_some_and(|ch| !ch.is_whitespace()) {
                i = j;
                continue;
            }

            let all_periods = chars[i..run_end].iter().all(|&(_, ch)| ch == '.');
            let is_boundary = if !all_periods {
                true
            } else if run_end - i > 1 {
                // Ellipsis: only a boundary before a capitalized word
                self.next_word_is_capitalized(&chars[j..])
            } else {
                !self.is_abbreviation(para, pos)
            };

            if is_boundary {
                let end = chars.get(j).map_or(para.len(), |&(p, _)| p);
                push_trimmed(out, &para[start..end]);
                start = end;
            }
            i = j;
        }

        push_trimmed(out, &para[start..]);
    }

    /// Whether the word ending at byte `period_pos` is an abbreviation
    fn is_abbreviation(&self, para: &str, period_pos: usize) -> bool {
        let before = &para[..period_pos];
        let (word_start, word) = last_word(before);

        if word.is_empty() {
            return false;
        }
        if word.contains('.') || self.abbreviations.contains(&word.to_lowercase()) {
            return true;
        }

        // A lone capital is a name initial only inside a name: after another
        // capitalized word ("John F. Kennedy") or before another initial
        // ("J. R. R. Tolkien"). "so did I." and "plan B." end sentences.
        if !is_initial(word) {
            return false;
        }
        let (_, previous) = last_word(before[..word_start].trim_end());
        let next = para[period_pos + 1..]
            .split_whitespace()
            .next()
            .map(|w| w.trim_start_matches(OPENERS));

        previous.starts_with(char::is_uppercase)
            || next.is_some_and(|w| w.strip_suffix('.').is_some_and(is_initial))
    }

    fn next_word_is_capitalized(&self, rest: &[(usize, char)]) -> bool {
        rest.iter()
            .map(|&(_, ch)| ch)
            .find(|ch| !ch.is_whitespace() && !OPENERS.contains(ch))
            .map_or(true, |ch| ch.is_uppercase() || ch.is_ascii_digit())
    }

    /// Treebank word tokens of the whole text, sentence by sentence
    pub fn words(&self, text: &str) -> Vec<String> {
        self.sentences(text)
            .into_iter()
            .flat_map(|sentence| self.sentence_words(sentence))
            .collect()
    }

    /// Treebank word tokens of a single sentence
    pub fn sentence_words(&self, sentence: &str) -> Vec<String> {
        let mut text = self
            .leading
            .iter()
            .fold(sentence.to_string(), |acc, rule| rule.apply(acc));

        text = format!(" {} ", text);
        text = self.trailing.iter().fold(text, |acc, rule| rule.apply(acc));

        text.split_whitespace().map(str::to_string).collect()
    }
}

/// Last whitespace-delimited word of `text` without leading quotes or
/// brackets, and the byte offset where the raw word starts
fn last_word(text: &str) -> (usize, &str) {
    let start = text
        .char_indices()
        .rev()
        .find(|(_, ch)| ch.is_whitespace())
        .map_or(0, |(k, ch)| k + ch.len_utf8());
    (start, text[start..].trim_start_matches(OPENERS))
}

/// A single capital letter other than the pronoun "I"
fn is_initial(word: &str) -> bool {
    let mut chars = word.chars();
    matches!((chars.next(), chars.next()), (Some(ch), None) if ch.is_uppercase() && ch != 'I')
}

fn push_trimmed<'a>(out: &mut Vec<&'a str>, candidate: &'a str) {
    let trimmed = candidate.trim();
    if !trimmed.is_empty() {
        out.push(trimmed);
    }
}

/// True when `token` occurs inside the ASCII punctuation string.
///
/// This is a substring test, so the empty string and runs such as `()`
/// count as punctuation while `...` or `''` do not.
pub fn is_punctuation(token: &str) -> bool {
    PUNCTUATION.contains(token)
}

/// True for tokens made of letters, optionally joined by apostrophes or hyphens
pub fn is_word(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() => {
            chars.all(|c| c.is_alphabetic() || c == '\'' || c == '-')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer() -> Tokenizer {
        Tokenizer::new(DEFAULT_ABBREVIATIONS.iter().copied()).unwrap()
    }

    #[test]
    fn test_sentences_basic() {
        let t = tokenizer();
        let sentences = t.sentences("The cat sat. The dog ran! Did the bird fly?");
        assert_eq!(
            sentences,
            vec!["The cat sat.", "The dog ran!", "Did the bird fly?"]
        );
    }

    #[test]
    fn test_sentences_respect_abbreviations() {
        let t = tokenizer();
        let sentences = t.sentences("Dr. Watson met Mr. Holmes at 3.30 p.m. today. They talked.");
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[1], "They talked.");
    }

    #[test]
    fn test_pronoun_i_and_lone_letters_end_sentences() {
        let t = tokenizer();
        let sentences = t.sentences(
            "She loved the sea and so did I. We sailed at dawn. It was a plan B. Nobody knew.",
        );
        assert_eq!(
            sentences,
            vec![
                "She loved the sea and so did I.",
                "We sailed at dawn.",
                "It was a plan B.",
                "Nobody knew."
            ]
        );
    }

    #[test]
    fn test_name_initials_do_not_split() {
        let t = tokenizer();
        let sentences = t.sentences("John F. Kennedy spoke. J. R. R. Tolkien wrote. They listened.");
        assert_eq!(
            sentences,
            vec!["John F. Kennedy spoke.", "J. R. R. Tolkien wrote.", "They listened."]
        );
    }

    #[test]
    fn test_words_split_period_after_pronoun() {
        let t = tokenizer();
        assert_eq!(t.words("So did I. We left."), vec!["So", "did", "I", ".", "We", "left", "."]);
    }

    #[test]
    fn test_sentences_keep_closing_quotes() {
        let t = tokenizer();
        let sentences = t.sentences("He said \"stop.\" Then he left.");
        assert_eq!(sentences, vec!["He said \"stop.\"", "Then he left."]);
    }

    #[test]
    fn test_sentences_split_on_blank_lines() {
        let t = tokenizer();
        let sentences = t.sentences("A heading without a period\n\nThe body text follows.");
        assert_eq!(
            sentences,
            vec!["A heading without a period", "The body text follows."]
        );
    }

    #[test]
    fn test_sentences_are_verbatim_slices() {
        let t = tokenizer();
        let text = "  First one.   Second one?\n\nThird…  ";
        for sentence in t.sentences(text) {
            assert!(text.contains(sentence));
        }
    }

    #[test]
    fn test_ellipsis_before_lowercase_does_not_split() {
        let t = tokenizer();
        let sentences = t.sentences("Well... maybe not. Fine.");
        assert_eq!(sentences, vec!["Well... maybe not.", "Fine."]);
    }

    #[test]
    fn test_words_split_punctuation_and_contractions() {
        let t = tokenizer();
        let words = t.words("I can't believe it's done, isn't it?");
        assert_eq!(
            words,
            vec!["I", "ca", "n't", "believe", "it", "'s", "done", ",", "is", "n't", "it", "?"]
        );
    }

    #[test]
    fn test_words_convert_double_quotes() {
        let t = tokenizer();
        let words = t.words("She said \"hello\" to me.");
        assert_eq!(
            words,
            vec!["She", "said", "``", "hello", "''", "to", "me", "."]
        );
    }

    #[test]
    fn test_words_keep_abbreviation_periods() {
        let t = tokenizer();
        let words = t.words("Mr. Smith arrived.");
        assert_eq!(words, vec!["Mr.", "Smith", "arrived", "."]);
    }

    #[test]
    fn test_words_split_cannot() {
        let t = tokenizer();
        assert_eq!(t.words("I cannot go"), vec!["I", "can", "not", "go"]);
    }

    #[test]
    fn test_is_punctuation_is_substring_test() {
        assert!(is_punctuation("."));
        assert!(is_punctuation(","));
        assert!(is_punctuation(""));
        assert!(!is_punctuation("``"));
        assert!(!is_punctuation("''"));
        assert!(!is_punctuation("..."));
        assert!(!is_punctuation("word"));
    }

    #[test]
    fn test_is_word() {
        assert!(is_word("hello"));
        assert!(is_word("well-known"));
        assert!(is_word("o'clock"));
        assert!(!is_word("'s"));
        assert!(!is_word("42"));
        assert!(!is_word("."));
        assert!(!is_word(""));
    }
}

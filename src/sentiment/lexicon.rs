//! Sentiment lexicon loading

use rustc_hash::FxHashMap;

/// Token-to-valence map read from the VADER lexicon file
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: FxHashMap<String, f64>,
}

impl Lexicon {
    /// Parse `token<TAB>mean-valence<TAB>...` lines.
    ///
    /// Blank lines and lines without a numeric second column are skipped.
    pub fn parse(contents: &str) -> Self {
        let entries = contents
            .lines()
            .filter_map(|line| {
                let mut fields = line.trim().split('\t');
                let token = fields.next()?;
                let valence = fields.next()?.trim().parse::<f64>().ok()?;
                (!token.is_empty()).then(|| (token.to_string(), valence))
            })
            .collect();

        Self { entries }
    }

    /// Valence of a token (expects the lowercase form)
    pub fn get(&self, token: &str) -> Option<f64> {
        self.entries.get(token).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

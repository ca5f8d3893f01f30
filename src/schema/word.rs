use serde::{Deserialize, Serialize};

/// Newtype wrapper for a word's position in the lexicon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WordId(pub u32);

impl WordId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single lexicon entry, identified by `(name, pos)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    pub name: String,
    /// Concrete part-of-speech tag (e.g. `N`, `MN`, `STV`).
    pub pos: String,
    /// Semantic categories the word itself belongs to.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub plural: Option<String>,
    /// Words permitted to follow this one, verbatim.
    #[serde(default)]
    pub next_words: Vec<String>,
    /// Categories the following noun must belong to.
    #[serde(default)]
    pub next_categories: Vec<String>,
    /// Free-form flags such as `okayconj`.
    #[serde(default)]
    pub special: Vec<String>,
}

impl WordRecord {
    pub fn new(name: &str, pos: &str) -> Self {
        Self {
            name: name.to_string(),
            pos: pos.to_string(),
            tags: Vec::new(),
            plural: None,
            next_words: Vec::new(),
            next_categories: Vec::new(),
            special: Vec::new(),
        }
    }

    /// Whether this word restricts what may follow it.
    pub fn has_requirements(&self) -> bool {
        !self.next_words.is_empty() || !self.next_categories.is_empty()
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.special.iter().any(|f| f == flag)
    }

    pub fn requires_category(&self, category: &str) -> bool {
        self.next_categories.iter().any(|c| c == category)
    }
}

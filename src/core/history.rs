/// Per-sentence record of chosen parts-of-speech and used words.

use rustc_hash::FxHashSet;

use crate::schema::pos::Role;

/// A chosen part-of-speech and its role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub pos: String,
    pub role: Role,
}

/// The most recently used preposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastPreposition {
    pub name: String,
    pub pos: String,
}

/// Parts-of-speech chosen so far in the sentence, oldest first, plus the
/// last preposition used.
#[derive(Debug, Clone, Default)]
pub struct SelectionHistory {
    entries: Vec<HistoryEntry>,
    pub last_preposition: Option<LastPreposition>,
}

/// How a backward scan of the history ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStop {
    Verb,
    Preposition,
    Conjunction,
    Start,
}

impl SelectionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pos: &str, role: Role) {
        self.entries.push(HistoryEntry {
            pos: pos.to_string(),
            role,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Walk backward to the nearest verb or preposition. Conjunctions are
    /// reported only when `stop_at_conjunction` is set.
    pub fn scan_back(&self, stop_at_conjunction: bool) -> ScanStop {
        for entry in self.entries.iter().rev() {
            match entry.role {
                Role::Verb => return ScanStop::Verb,
                Role::Preposition => return ScanStop::Preposition,
                Role::Conjunction if stop_at_conjunction => return ScanStop::Conjunction,
                _ => {}
            }
        }
        ScanStop::Start
    }

    /// Whether the next noun continues a conjunction: a conjunction appears
    /// before any verb or preposition when walking backward.
    pub fn in_conjunction(&self) -> bool {
        self.scan_back(true) == ScanStop::Conjunction
    }
}

/// Noun and verb names already used in the sentence.
#[derive(Debug, Clone, Default)]
pub struct UsedWords {
    names: Vec<String>,
    seen: FxHashSet<String>,
}

impl UsedWords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str) {
        if self.seen.insert(name.to_string()) {
            self.names.push(name.to_string());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    /// Used names in first-use order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

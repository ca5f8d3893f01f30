/// The shared, read-only language data: grammar, categories, and words.

use rustc_hash::FxHashSet;
use std::path::Path;
use thiserror::Error;

use crate::core::grammar::{GrammarError, GrammarTable};
use crate::core::hierarchy::{CategoryHierarchy, HierarchyError};
use crate::core::lexicon::{Lexicon, LexiconError};
use crate::schema::word::{WordId, WordRecord};

/// File names expected inside a language data directory.
pub const GRAMMAR_FILE: &str = "grammar.ron";
pub const WORDLIST_FILE: &str = "wordlist.csv";
pub const HIERARCHY_FILE: &str = "hierarchy.csv";

#[derive(Debug, Error)]
pub enum LanguageError {
    #[error("grammar error: {0}")]
    Grammar(#[from] GrammarError),
    #[error("hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),
    #[error("lexicon error: {0}")]
    Lexicon(#[from] LexiconError),
    #[error("word '{word}' requires unknown category '{category}'")]
    UnknownCategory { word: String, category: String },
}

/// Grammar, category hierarchy, and lexicon, validated together.
///
/// Immutable once built; sessions borrow it and may do so concurrently.
#[derive(Debug, Clone)]
pub struct Language {
    pub grammar: GrammarTable,
    pub hierarchy: CategoryHierarchy,
    pub lexicon: Lexicon,
}

impl Language {
    /// Assemble a language, indexing category membership and checking that
    /// every successor category a word names is known.
    pub fn new(
        grammar: GrammarTable,
        hierarchy: CategoryHierarchy,
        mut lexicon: Lexicon,
    ) -> Result<Language, LanguageError> {
        lexicon.index_categories(&hierarchy);

        for record in lexicon.records() {
            if let Some(category) = record
                .next_categories
                .iter()
                .find(|c| !hierarchy.contains(c) && !lexicon.has_category(c))
            {
                return Err(LanguageError::UnknownCategory {
                    word: record.name.clone(),
                    category: category.clone(),
                });
            }
        }

        log::info!(
            "loaded language: {} parts-of-speech, {} categories, {} words",
            grammar.len(),
            hierarchy.len(),
            lexicon.len()
        );
        Ok(Language {
            grammar,
            hierarchy,
            lexicon,
        })
    }

    /// Load `grammar.ron`, `wordlist.csv`, and `hierarchy.csv` from a directory.
    pub fn load(dir: &Path) -> Result<Language, LanguageError> {
        Self::load_files(
            &dir.join(GRAMMAR_FILE),
            &dir.join(WORDLIST_FILE),
            &dir.join(HIERARCHY_FILE),
        )
    }

    pub fn load_files(
        grammar: &Path,
        wordlist: &Path,
        hierarchy: &Path,
    ) -> Result<Language, LanguageError> {
        let grammar = GrammarTable::load_from_ron(grammar)?;
        let hierarchy = CategoryHierarchy::load_from_csv(hierarchy)?;
        let lexicon = Lexicon::load_from_csv(wordlist)?;
        Self::new(grammar, hierarchy, lexicon)
    }

    /// Names of the words allowed to follow `record`: its explicit successor
    /// words together with every member of its successor categories.
    pub fn requirements_of(&self, record: &WordRecord) -> FxHashSet<String> {
        let mut names: FxHashSet<String> = record.next_words.iter().cloned().collect();
        for category in &record.next_categories {
            if let Some(members) = self.lexicon.words_with_category(category) {
                names.extend(members.iter().cloned());
            }
        }
        names
    }

    /// Every word of the given part-of-speech, in table order.
    pub fn all_words(&self, pos: &str) -> Result<Vec<WordId>, GrammarError> {
        Ok(self.lexicon.all_words(self.grammar.concrete_tags(pos)?))
    }

    /// The record for `name` under part-of-speech `pos`.
    pub fn lookup(&self, name: &str, pos: &str) -> Option<(WordId, &WordRecord)> {
        let tags = self.grammar.concrete_tags(pos).ok()?;
        self.lexicon.find(name, tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hierarchy::NO_PARENT;

    const GRAMMAR: &str = r#"{
        "S": Pos(successors: ["STV"], weights: [1.0], vocabulary: ["S"]),
        "STV": Pos(successors: ["N"], weights: [1.0], vocabulary: ["STV"]),
        "N": Pos(successors: ["END"], weights: [1.0], vocabulary: ["N"]),
        "END": Pos(successors: [], weights: []),
    }"#;

    fn build(table: &str) -> Result<Language, LanguageError> {
        let grammar = GrammarTable::parse_ron(GRAMMAR).unwrap();
        let hierarchy = CategoryHierarchy::from_edges([
            ("physical", NO_PARENT),
            ("edible", "physical"),
            ("fruit", "edible"),
        ])
        .unwrap();
        let lexicon = Lexicon::parse_csv(table).unwrap();
        Language::new(grammar, hierarchy, lexicon)
    }

    #[test]
    fn requirements_union_words_and_categories() {
        let lang = build(
            "name;pos;spec;plural;nextwords;nextcats;special\n\
             eat;STV;;;stone;edible;\n\
             apple;N;fruit;;;;\n\
             stone;N;;;;;\n",
        )
        .unwrap();
        let (_, eat) = lang.lookup("eat", "STV").unwrap();
        let reqs = lang.requirements_of(eat);
        assert!(reqs.contains("apple"));
        assert!(reqs.contains("stone"));
        assert_eq!(reqs.len(), 2);
    }

    #[test]
    fn word_with_no_requirements_yields_empty_set() {
        let lang = build("name;pos;spec;plural;nextwords;nextcats;special\napple;N;fruit;;;;\n").unwrap();
        let (_, apple) = lang.lookup("apple", "N").unwrap();
        assert!(lang.requirements_of(apple).is_empty());
    }

    #[test]
    fn unknown_successor_category_is_rejected() {
        let err = build("name;pos;spec;plural;nextwords;nextcats;special\neat;STV;;;;mineral;\n").unwrap_err();
        assert!(matches!(
            err,
            LanguageError::UnknownCategory { ref category, .. } if category == "mineral"
        ));
    }

    #[test]
    fn directly_carried_category_is_known() {
        let lang = build(
            "name;pos;spec;plural;nextwords;nextcats;special\n\
             eat;STV;;;;crunchy;\n\
             apple;N;crunchy;;;;\n",
        )
        .unwrap();
        let (_, eat) = lang.lookup("eat", "STV").unwrap();
        assert!(lang.requirements_of(eat).contains("apple"));
    }

    #[test]
    fn all_words_uses_concrete_tags() {
        let lang = build(
            "name;pos;spec;plural;nextwords;nextcats;special\n\
             eat;STV;;;;;\n\
             apple;N;fruit;;;;\n",
        )
        .unwrap();
        assert_eq!(lang.all_words("N").unwrap().len(), 1);
        assert!(lang.all_words("ADJ").is_err());
        assert!(lang.lookup("apple", "N").is_some());
        assert!(lang.lookup("apple", "STV").is_none());
    }

    #[test]
    fn load_fixture_directory() {
        let lang = Language::load(Path::new("tests/fixtures")).unwrap();
        assert!(lang.lookup("eat", "STV").is_some());
    }
}

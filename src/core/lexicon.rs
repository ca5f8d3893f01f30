/// Word table — indexed word records and category membership.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

use crate::core::hierarchy::CategoryHierarchy;
use crate::schema::word::{WordId, WordRecord};

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("duplicate word '{name}' with part-of-speech '{pos}'")]
    DuplicateWord { name: String, pos: String },
    #[error("word table row {row} has an empty name or part-of-speech")]
    EmptyField { row: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One row of the word table as it appears on disk. Multi-valued columns
/// are space-delimited.
#[derive(Debug, Deserialize)]
struct CsvWordRow {
    name: String,
    pos: String,
    #[serde(default)]
    spec: String,
    #[serde(default)]
    plural: String,
    #[serde(default)]
    nextwords: String,
    #[serde(default)]
    nextcats: String,
    #[serde(default)]
    special: String,
}

fn split_field(field: &str) -> Vec<String> {
    field.split_whitespace().map(str::to_string).collect()
}

impl CsvWordRow {
    fn into_record(self) -> WordRecord {
        let plural = self.plural.trim();
        WordRecord {
            name: self.name.trim().to_string(),
            pos: self.pos.trim().to_string(),
            tags: split_field(&self.spec),
            plural: (!plural.is_empty()).then(|| plural.to_string()),
            next_words: split_field(&self.nextwords),
            next_categories: split_field(&self.nextcats),
            special: split_field(&self.special),
        }
    }
}

/// All words, indexed by `(name, pos)`, by name, and by category.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    records: Vec<WordRecord>,
    by_key: FxHashMap<(String, String), WordId>,
    by_name: FxHashMap<String, Vec<WordId>>,
    /// Category → names of words tagged with it directly.
    direct: FxHashMap<String, FxHashSet<String>>,
    /// Category → names of words tagged with it or any descendant.
    members: FxHashMap<String, FxHashSet<String>>,
}

impl Lexicon {
    /// Load a semicolon-delimited word table with a header row:
    /// `name;pos;spec;plural;nextwords;nextcats;special`.
    pub fn load_from_csv(path: &Path) -> Result<Lexicon, LexiconError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn parse_csv(input: &str) -> Result<Lexicon, LexiconError> {
        Self::from_reader(input.as_bytes())
    }

    fn from_reader<R: Read>(reader: R) -> Result<Lexicon, LexiconError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut raw = csv::StringRecord::new();
        let mut records = Vec::new();
        let mut row = 0;
        while rdr.read_record(&mut raw)? {
            row += 1;
            // Trailing empty columns may be left off entirely.
            while raw.len() < headers.len() {
                raw.push_field("");
            }
            let record = raw.deserialize::<CsvWordRow>(Some(&headers))?.into_record();
            if record.name.is_empty() || record.pos.is_empty() {
                return Err(LexiconError::EmptyField { row });
            }
            records.push(record);
        }
        Self::from_records(records)
    }

    /// Index a list of records. Categories are indexed by direct tag only
    /// until [`Lexicon::index_categories`] runs.
    pub fn from_records(records: Vec<WordRecord>) -> Result<Lexicon, LexiconError> {
        let mut lexicon = Lexicon::default();
        for record in records {
            lexicon.insert(record)?;
        }
        lexicon.members = lexicon.direct.clone();
        Ok(lexicon)
    }

    fn insert(&mut self, record: WordRecord) -> Result<WordId, LexiconError> {
        let key = (record.name.clone(), record.pos.clone());
        if self.by_key.contains_key(&key) {
            return Err(LexiconError::DuplicateWord {
                name: key.0,
                pos: key.1,
            });
        }

        let id = WordId(self.records.len() as u32);
        self.by_key.insert(key, id);
        self.by_name.entry(record.name.clone()).or_default().push(id);
        for tag in &record.tags {
            self.direct
                .entry(tag.clone())
                .or_default()
                .insert(record.name.clone());
        }
        self.records.push(record);
        Ok(id)
    }

    /// Expand category membership through the hierarchy: a word tagged with
    /// a category is a member of every ancestor of that category.
    pub fn index_categories(&mut self, hierarchy: &CategoryHierarchy) {
        let mut categories: FxHashSet<&str> = hierarchy.categories().collect();
        categories.extend(self.direct.keys().map(String::as_str));

        let mut members = FxHashMap::default();
        for category in categories {
            let mut names = self.direct.get(category).cloned().unwrap_or_default();
            for sub in hierarchy.descendants(category).into_iter().flatten() {
                if let Some(direct) = self.direct.get(sub) {
                    names.extend(direct.iter().cloned());
                }
            }
            members.insert(category.to_string(), names);
        }
        self.members = members;
    }

    /// Exact `(name, pos)` lookup.
    pub fn lookup(&self, name: &str, pos: &str) -> Option<&WordRecord> {
        self.by_key
            .get(&(name.to_string(), pos.to_string()))
            .map(|id| &self.records[id.index()])
    }

    /// First record named `name` whose tag is among `tags`, in table order.
    pub fn find(&self, name: &str, tags: &FxHashSet<String>) -> Option<(WordId, &WordRecord)> {
        self.by_name
            .get(name)?
            .iter()
            .map(|&id| (id, &self.records[id.index()]))
            .find(|(_, record)| tags.contains(&record.pos))
    }

    pub fn get(&self, id: WordId) -> &WordRecord {
        &self.records[id.index()]
    }

    /// Names of words in `category` or any of its descendants.
    pub fn words_with_category(&self, category: &str) -> Option<&FxHashSet<String>> {
        self.members.get(category)
    }

    /// Every word whose tag is among `tags`, in table order.
    pub fn all_words(&self, tags: &FxHashSet<String>) -> Vec<WordId> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| tags.contains(&record.pos))
            .map(|(i, _)| WordId(i as u32))
            .collect()
    }

    /// Whether some word carries `category` as a direct tag.
    pub fn has_category(&self, category: &str) -> bool {
        self.direct.contains_key(category)
    }

    pub fn records(&self) -> &[WordRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hierarchy::NO_PARENT;

    const TABLE: &str = "\
name;pos;spec;plural;nextwords;nextcats;special
eat;STV;;;;edible;
apple;N;fruit;;;;
bread;MN;baked;;;;
rock;N;mineral;;;;
man;N;human;men;;;
with;P;;;;physical;okayconj
fish;N;animal;fish;;;
fish;IV;;;;;
";

    fn hierarchy() -> CategoryHierarchy {
        CategoryHierarchy::from_edges([
            ("physical", NO_PARENT),
            ("edible", "physical"),
            ("fruit", "edible"),
            ("baked", "edible"),
            ("mineral", "physical"),
            ("animate", "physical"),
            ("human", "animate"),
            ("animal", "animate"),
        ])
        .unwrap()
    }

    fn indexed() -> Lexicon {
        let mut lex = Lexicon::parse_csv(TABLE).unwrap();
        lex.index_categories(&hierarchy());
        lex
    }

    fn tags(items: &[&str]) -> FxHashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_multi_valued_columns() {
        let lex = Lexicon::parse_csv(TABLE).unwrap();
        assert_eq!(lex.len(), 8);
        let man = lex.lookup("man", "N").unwrap();
        assert_eq!(man.plural.as_deref(), Some("men"));
        assert_eq!(man.tags, vec!["human".to_string()]);
        let with = lex.lookup("with", "P").unwrap();
        assert!(with.has_flag("okayconj"));
        assert_eq!(with.next_categories, vec!["physical".to_string()]);
        assert!(lex.lookup("apple", "N").unwrap().plural.is_none());
    }

    #[test]
    fn lookup_is_exact_on_name_and_pos() {
        let lex = indexed();
        assert!(lex.lookup("fish", "N").is_some());
        assert!(lex.lookup("fish", "IV").is_some());
        assert!(lex.lookup("fish", "STV").is_none());
        assert!(lex.lookup("pear", "N").is_none());
    }

    #[test]
    fn find_respects_tags() {
        let lex = indexed();
        let (_, rec) = lex.find("fish", &tags(&["IV", "STV"])).unwrap();
        assert_eq!(rec.pos, "IV");
        assert!(lex.find("fish", &tags(&["ADJ"])).is_none());
    }

    #[test]
    fn category_members_include_descendants() {
        let lex = indexed();
        let edible = lex.words_with_category("edible").unwrap();
        assert!(edible.contains("apple"));
        assert!(edible.contains("bread"));
        assert!(!edible.contains("rock"));

        let physical = lex.words_with_category("physical").unwrap();
        for name in ["apple", "bread", "rock", "man", "fish"] {
            assert!(physical.contains(name), "missing {}", name);
        }
    }

    #[test]
    fn unindexed_lexicon_knows_direct_tags_only() {
        let lex = Lexicon::parse_csv(TABLE).unwrap();
        assert!(lex.words_with_category("fruit").unwrap().contains("apple"));
        assert!(lex.words_with_category("edible").is_none());
    }

    #[test]
    fn all_words_in_table_order() {
        let lex = indexed();
        let nouns: Vec<&str> = lex
            .all_words(&tags(&["N", "MN"]))
            .into_iter()
            .map(|id| lex.get(id).name.as_str())
            .collect();
        assert_eq!(nouns, vec!["apple", "bread", "rock", "man", "fish"]);
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let table = "name;pos;spec;plural;nextwords;nextcats;special\napple;N;;;;;\napple;N;;;;;\n";
        assert!(matches!(
            Lexicon::parse_csv(table),
            Err(LexiconError::DuplicateWord { .. })
        ));
    }

    #[test]
    fn empty_name_is_rejected() {
        let table = "name;pos;spec;plural;nextwords;nextcats;special\n;N;;;;;\n";
        assert!(matches!(
            Lexicon::parse_csv(table),
            Err(LexiconError::EmptyField { row: 1 })
        ));
    }

    #[test]
    fn short_rows_default_missing_columns() {
        let table = "name;pos;spec;plural;nextwords;nextcats;special\ncat;N;animal\n";
        let lex = Lexicon::parse_csv(table).unwrap();
        let cat = lex.lookup("cat", "N").unwrap();
        assert!(!cat.has_requirements());
        assert!(cat.special.is_empty());
        assert_eq!(cat.tags, vec!["animal".to_string()]);
    }

    #[test]
    fn name_and_pos_only_rows_load() {
        let table = "name;pos;spec;plural;nextwords;nextcats;special\nsing;IV\nwith;P;;;;physical;okayconj\n";
        let lex = Lexicon::parse_csv(table).unwrap();
        assert_eq!(lex.len(), 2);
        let sing = lex.lookup("sing", "IV").unwrap();
        assert!(sing.tags.is_empty());
        assert!(sing.plural.is_none());
        assert!(lex.lookup("with", "P").unwrap().has_flag("okayconj"));
    }

    #[test]
    fn short_row_with_empty_name_is_rejected() {
        let table = "name;pos;spec;plural;nextwords;nextcats;special\nsing;IV\n;N\n";
        assert!(matches!(
            Lexicon::parse_csv(table),
            Err(LexiconError::EmptyField { row: 2 })
        ));
    }

    #[test]
    fn load_fixture_word_table() {
        let path = std::path::PathBuf::from("tests/fixtures/wordlist.csv");
        let lex = Lexicon::load_from_csv(&path).unwrap();
        assert!(lex.lookup("eat", "STV").is_some());
    }
}

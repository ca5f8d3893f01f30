/// Morphology — plural nouns and participle verbs.

use crate::schema::pos::Role;
use crate::schema::word::WordRecord;

/// Grammatical context for the next word, derived from the word before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Situation {
    pub plural: bool,
    pub participle: bool,
}

impl Situation {
    /// Update the flags after a word has been placed.
    ///
    /// Plurality persists until the next article changes it; the participle
    /// flag holds for exactly one word after `participle_trigger`.
    pub fn observe(&mut self, role: Role, name: &str, participle_trigger: &str) {
        match role {
            Role::PluralArticle => self.plural = true,
            Role::SingularArticle => self.plural = false,
            _ => {}
        }
        self.participle = name == participle_trigger;
    }
}

/// Render `word` as it should appear given its role and the situation.
pub fn inflect(word: &WordRecord, role: Role, situation: Situation) -> String {
    match role {
        Role::Noun if situation.plural => pluralize(word),
        Role::Verb if situation.participle => participle(&word.name),
        _ => word.name.clone(),
    }
}

/// The registered irregular plural, or the regular `-s`/`-es` form.
pub fn pluralize(word: &WordRecord) -> String {
    if let Some(ref plural) = word.plural {
        return plural.clone();
    }
    let name = &word.name;
    if name.is_empty() {
        name.clone()
    } else if name.ends_with('s') {
        format!("{}es", name)
    } else {
        format!("{}s", name)
    }
}

/// Present participle: a final `e` is dropped before `-ing`.
pub fn participle(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    match name.strip_suffix('e') {
        Some(stem) => format!("{}ing", stem),
        None => format!("{}ing", name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn noun(name: &str, plural: Option<&str>) -> WordRecord {
        let mut w = WordRecord::new(name, "N");
        w.plural = plural.map(str::to_string);
        w
    }

    const PLURAL: Situation = Situation {
        plural: true,
        participle: false,
    };
    const PARTICIPLE: Situation = Situation {
        plural: false,
        participle: true,
    };

    #[test]
    fn regular_plurals() {
        assert_eq!(inflect(&noun("cat", None), Role::Noun, PLURAL), "cats");
        assert_eq!(inflect(&noun("bus", None), Role::Noun, PLURAL), "buses");
    }

    #[test]
    fn irregular_plural_wins() {
        assert_eq!(inflect(&noun("man", Some("men")), Role::Noun, PLURAL), "men");
        assert_eq!(inflect(&noun("glass", Some("glasses")), Role::Noun, PLURAL), "glasses");
    }

    #[test]
    fn singular_noun_unchanged() {
        assert_eq!(inflect(&noun("cat", None), Role::Noun, Situation::default()), "cat");
    }

    #[test]
    fn participles() {
        let dance = WordRecord::new("dance", "IV");
        let sing = WordRecord::new("sing", "IV");
        assert_eq!(inflect(&dance, Role::Verb, PARTICIPLE), "dancing");
        assert_eq!(inflect(&sing, Role::Verb, PARTICIPLE), "singing");
        assert_eq!(inflect(&sing, Role::Verb, Situation::default()), "sing");
    }

    #[test]
    fn other_roles_unchanged() {
        let red = WordRecord::new("red", "ADJ");
        let both = Situation {
            plural: true,
            participle: true,
        };
        assert_eq!(inflect(&red, Role::Adjective, both), "red");
        assert_eq!(inflect(&noun("Paris", None), Role::ProperNoun, both), "Paris");
    }

    #[test]
    fn empty_name_renders_empty() {
        assert_eq!(pluralize(&noun("", None)), "");
        assert_eq!(participle(""), "");
    }

    #[test]
    fn situation_tracks_articles_and_trigger() {
        let mut s = Situation::default();
        s.observe(Role::PluralArticle, "some", "while");
        assert!(s.plural);
        s.observe(Role::Adjective, "red", "while");
        assert!(s.plural);
        s.observe(Role::SingularArticle, "the", "while");
        assert!(!s.plural);
        s.observe(Role::Conjunction, "while", "while");
        assert!(s.participle);
        s.observe(Role::Verb, "singing", "while");
        assert!(!s.participle);
    }

    proptest! {
        #[test]
        fn irregular_plural_always_returned(stem in "[a-z]{1,10}", irregular in "[a-z]{1,10}") {
            let w = noun(&stem, Some(&irregular));
            prop_assert_eq!(inflect(&w, Role::Noun, PLURAL), irregular);
        }

        #[test]
        fn regular_suffix_rule(stem in "[a-z]{1,10}") {
            let w = noun(&stem, None);
            let expected = if stem.ends_with('s') {
                format!("{}es", stem)
            } else {
                format!("{}s", stem)
            };
            prop_assert_eq!(inflect(&w, Role::Noun, PLURAL), expected);
        }

        #[test]
        fn participle_ends_in_ing(stem in "[a-z]{1,10}") {
            let form = participle(&stem);
            prop_assert!(form.ends_with("ing"));
            let grown = if stem.ends_with('e') { 2 } else { 3 };
            prop_assert_eq!(form.len(), stem.len() + grown);
        }
    }
}

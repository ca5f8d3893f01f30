use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// The engine-level class of a part-of-speech.
///
/// Every decision the selection engine makes about a part-of-speech
/// (constraint consumption, conjunction scans, inflection) is keyed on its
/// role rather than on the identifier used in the grammar file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The placeholder a sentence begins from.
    Start,
    /// The terminal marker; choosing it ends the sentence.
    End,
    /// Common and mass nouns. They consume accumulated requirements.
    Noun,
    ProperNoun,
    Verb,
    Preposition,
    Conjunction,
    Adjective,
    /// Articles and quantifiers after which nouns are pluralised.
    PluralArticle,
    /// Articles after which nouns are singular.
    SingularArticle,
    Other,
}

impl Role {
    /// Infer the role from a conventional part-of-speech code.
    pub fn from_code(code: &str) -> Role {
        match code {
            "S" => Self::Start,
            "END" => Self::End,
            "N" | "MN" => Self::Noun,
            "PN" => Self::ProperNoun,
            "IV" | "STV" | "MTV" => Self::Verb,
            "P" | "MP" => Self::Preposition,
            "CONJ" | "MCONJ" => Self::Conjunction,
            "ADJ" | "MADJ" => Self::Adjective,
            "PART" | "MPART" => Self::PluralArticle,
            "SART" | "MSART" => Self::SingularArticle,
            _ => Self::Other,
        }
    }

    /// Nouns and verbs are tracked so they are not repeated in a sentence.
    pub fn is_tracked(&self) -> bool {
        matches!(self, Self::Noun | Self::Verb)
    }

    /// Roles whose own requirements must agree with the pending noun.
    pub fn is_modifier(&self) -> bool {
        matches!(self, Self::Adjective | Self::Preposition)
    }
}

/// A part-of-speech: its successors, their selection weights, and the
/// concrete lexicon tags it expands to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartOfSpeech {
    pub code: String,
    pub role: Role,
    pub successors: Vec<String>,
    /// Parallel to `successors`.
    pub weights: Vec<f64>,
    pub vocabulary: FxHashSet<String>,
}

impl PartOfSpeech {
    pub fn is_terminal(&self) -> bool {
        self.role == Role::End
    }
}

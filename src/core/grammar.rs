/// Part-of-speech grammar — successor tables, weights, and RON loading.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::schema::pos::{PartOfSpeech, Role};

#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("part-of-speech '{pos}' lists undefined successor '{successor}'")]
    UndefinedSuccessor { pos: String, successor: String },
    #[error("undefined part-of-speech: {0}")]
    UndefinedPartOfSpeech(String),
    #[error("part-of-speech '{pos}' has {successors} successors but {weights} weights")]
    WeightMismatch {
        pos: String,
        successors: usize,
        weights: usize,
    },
    #[error("part-of-speech '{pos}' has invalid weight {weight}")]
    InvalidWeight { pos: String, weight: f64 },
    #[error("grammar defines no part-of-speech with role {0:?}")]
    MissingRole(Role),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// The grammar: every part-of-speech keyed by its code.
#[derive(Debug, Clone, Default)]
pub struct GrammarTable {
    parts: FxHashMap<String, PartOfSpeech>,
}

// The RON file leaves the code implicit (it is the map key) and the role
// optional, so it is read through an intermediate shape.

#[derive(Debug, Deserialize)]
#[serde(rename = "Pos")]
struct RonPos {
    #[serde(default)]
    role: Option<Role>,
    #[serde(default)]
    successors: Vec<String>,
    #[serde(default)]
    weights: Vec<f64>,
    #[serde(default)]
    vocabulary: Vec<String>,
}

impl GrammarTable {
    /// Load a grammar from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<GrammarTable, GrammarError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a grammar from a RON string.
    ///
    /// Shape: `{ "S": Pos(successors: ["IV"], weights: [1.0], vocabulary: ["S"]), ... }`.
    /// `role` may be given explicitly; otherwise it is inferred from the code.
    pub fn parse_ron(input: &str) -> Result<GrammarTable, GrammarError> {
        let raw: FxHashMap<String, RonPos> = ron::from_str(input)?;
        let parts = raw
            .into_iter()
            .map(|(code, pos)| {
                let role = pos.role.unwrap_or_else(|| Role::from_code(&code));
                let part = PartOfSpeech {
                    code: code.clone(),
                    role,
                    successors: pos.successors,
                    weights: pos.weights,
                    vocabulary: pos.vocabulary.into_iter().collect(),
                };
                (code, part)
            })
            .collect();
        Self::from_parts(parts)
    }

    /// Build a grammar from already-constructed parts, validating it.
    pub fn from_parts(parts: FxHashMap<String, PartOfSpeech>) -> Result<GrammarTable, GrammarError> {
        let table = GrammarTable { parts };
        table.validate()?;
        Ok(table)
    }

    fn validate(&self) -> Result<(), GrammarError> {
        for part in self.parts.values() {
            if part.successors.len() != part.weights.len() {
                return Err(GrammarError::WeightMismatch {
                    pos: part.code.clone(),
                    successors: part.successors.len(),
                    weights: part.weights.len(),
                });
            }
            if let Some(&weight) = part.weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
                return Err(GrammarError::InvalidWeight {
                    pos: part.code.clone(),
                    weight,
                });
            }
            if let Some(missing) = part
                .successors
                .iter()
                .find(|s| !self.parts.contains_key(s.as_str()))
            {
                return Err(GrammarError::UndefinedSuccessor {
                    pos: part.code.clone(),
                    successor: missing.clone(),
                });
            }
        }

        for role in [Role::Start, Role::End] {
            if !self.parts.values().any(|p| p.role == role) {
                return Err(GrammarError::MissingRole(role));
            }
        }
        Ok(())
    }

    pub fn get(&self, code: &str) -> Result<&PartOfSpeech, GrammarError> {
        self.parts
            .get(code)
            .ok_or_else(|| GrammarError::UndefinedPartOfSpeech(code.to_string()))
    }

    /// Successors of `code` and their parallel base weights.
    pub fn allowed_successors(&self, code: &str) -> Result<(&[String], &[f64]), GrammarError> {
        let part = self.get(code)?;
        Ok((&part.successors, &part.weights))
    }

    /// Concrete lexicon tags `code` expands to.
    pub fn concrete_tags(&self, code: &str) -> Result<&FxHashSet<String>, GrammarError> {
        Ok(&self.get(code)?.vocabulary)
    }

    pub fn role(&self, code: &str) -> Result<Role, GrammarError> {
        Ok(self.get(code)?.role)
    }

    /// The code a sentence starts from. With several start roles defined the
    /// conventional `S` wins, then the lexically smallest code.
    pub fn start(&self) -> &str {
        if self.parts.get("S").is_some_and(|p| p.role == Role::Start) {
            return "S";
        }
        self.parts
            .values()
            .filter(|p| p.role == Role::Start)
            .map(|p| p.code.as_str())
            .min()
            .unwrap_or("S")
    }

    pub fn parts(&self) -> impl Iterator<Item = &PartOfSpeech> {
        self.parts.values()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Codes reachable from the start by following successor edges.
    pub fn reachable(&self) -> FxHashSet<String> {
        let mut seen = FxHashSet::default();
        let mut stack = vec![self.start().to_string()];
        while let Some(code) = stack.pop() {
            if !seen.insert(code.clone()) {
                continue;
            }
            if let Some(part) = self.parts.get(&code) {
                stack.extend(part.successors.iter().cloned());
            }
        }
        seen
    }
}

/// Selection engine — next part-of-speech and next word under accumulated
/// semantic requirements.

use log::{debug, warn};
use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::constraints::ConstraintState;
use crate::core::grammar::GrammarError;
use crate::core::history::{ScanStop, SelectionHistory, UsedWords};
use crate::core::inflect::{inflect, Situation};
use crate::core::language::Language;
use crate::schema::pos::Role;
use crate::schema::word::{WordId, WordRecord};

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("grammar error: {0}")]
    Grammar(#[from] GrammarError),
    #[error("part-of-speech '{0}' has no drawable successor")]
    NoSuccessor(String),
    #[error("no candidate words for part-of-speech '{pos}'")]
    PoolExhausted { pos: String },
    #[error("no '{pos}' word matched the pending requirements after {attempts} attempts")]
    ExhaustedRetries { pos: String, attempts: u32 },
    #[error("every successor of '{pos}' was rejected after {attempts} draws")]
    PartOfSpeechRetries { pos: String, attempts: u32 },
    #[error("sentence exceeded {0} words")]
    SentenceTooLong(usize),
}

/// Tunables for the selection engine. Every field has a default, so a RON
/// file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// History length past which the end of sentence becomes likelier.
    pub length_threshold: usize,
    /// Added to the end weight per part-of-speech beyond the threshold.
    pub end_weight_step: f64,
    /// Draws allowed when matching a modifier against pending requirements.
    pub match_retry_limit: u32,
    /// Draws allowed before giving up on finding an acceptable successor.
    pub pos_retry_limit: u32,
    pub max_sentence_length: usize,
    /// Successor category that licenses a following proper noun.
    pub proper_noun_category: String,
    /// Flag letting a preposition be followed by a conjunction.
    pub conjoin_flag: String,
    /// Word after which the next verb takes its participle form.
    pub participle_trigger: String,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            length_threshold: 7,
            end_weight_step: 0.05,
            match_retry_limit: 100,
            pos_retry_limit: 1000,
            max_sentence_length: 64,
            proper_noun_category: "pn".to_string(),
            conjoin_flag: "okayconj".to_string(),
            participle_trigger: "while".to_string(),
        }
    }
}

impl SelectionConfig {
    pub fn parse_ron(input: &str) -> Result<SelectionConfig, ron::error::SpannedError> {
        ron::from_str(input)
    }
}

/// The word a sentence is being extended from. `word` is `None` only for
/// the start placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    pub pos: String,
    pub word: Option<WordId>,
}

impl Cursor {
    pub fn start(pos: &str) -> Self {
        Self {
            pos: pos.to_string(),
            word: None,
        }
    }
}

/// Outcome of a single part-of-speech draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosChoice {
    Pos(String),
    /// The draw was rejected; the caller should draw again.
    Retry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextWord {
    Word(WordId),
    End,
}

/// Stateless selection logic over shared language data. All per-sentence
/// state is passed in by the caller.
#[derive(Debug, Clone, Copy)]
pub struct SelectionEngine<'a> {
    language: &'a Language,
    config: &'a SelectionConfig,
}

impl<'a> SelectionEngine<'a> {
    pub fn new(language: &'a Language, config: &'a SelectionConfig) -> Self {
        Self { language, config }
    }

    pub fn language(&self) -> &'a Language {
        self.language
    }

    pub fn config(&self) -> &'a SelectionConfig {
        self.config
    }

    pub fn record(&self, cursor: &Cursor) -> Option<&'a WordRecord> {
        cursor.word.map(|id| self.language.lexicon.get(id))
    }

    /// Successors of `pos` with their weights for this draw. Past the length
    /// threshold the end-of-sentence weight grows by `end_weight_step` per
    /// extra part-of-speech; the grammar itself is left untouched.
    pub fn successor_weights(
        &self,
        pos: &str,
        history_len: usize,
    ) -> Result<(&'a [String], Vec<f64>), SelectionError> {
        let grammar = &self.language.grammar;
        let (successors, base) = grammar.allowed_successors(pos)?;
        let mut weights = base.to_vec();

        if history_len > self.config.length_threshold {
            let end = successors
                .iter()
                .position(|s| grammar.role(s).is_ok_and(|r| r == Role::End));
            if let Some(i) = end {
                let extra = history_len - self.config.length_threshold;
                weights[i] += self.config.end_weight_step * extra as f64;
            }
        }
        Ok((successors, weights))
    }

    /// Draw the next part-of-speech once.
    ///
    /// A proper noun is only accepted when the current word lists the
    /// proper-noun category among its successor categories. A conjunction is
    /// only accepted when the nearest verb or preposition behind it is a
    /// verb, or a preposition carrying the conjoin flag.
    pub fn next_part_of_speech(
        &self,
        cursor: &Cursor,
        history: &SelectionHistory,
        rng: &mut StdRng,
    ) -> Result<PosChoice, SelectionError> {
        let (successors, weights) = self.successor_weights(&cursor.pos, history.len())?;
        let dist = WeightedIndex::new(&weights)
            .map_err(|_| SelectionError::NoSuccessor(cursor.pos.clone()))?;
        let choice = &successors[dist.sample(rng)];

        match self.language.grammar.role(choice)? {
            Role::ProperNoun => {
                let licensed = self
                    .record(cursor)
                    .is_some_and(|w| w.requires_category(&self.config.proper_noun_category));
                if !licensed {
                    debug!("rejected proper noun after '{}'", cursor.pos);
                    return Ok(PosChoice::Retry);
                }
            }
            Role::Conjunction => {
                if !self.conjunction_allowed(history) {
                    debug!("rejected conjunction after '{}'", cursor.pos);
                    return Ok(PosChoice::Retry);
                }
            }
            _ => {}
        }
        Ok(PosChoice::Pos(choice.clone()))
    }

    fn conjunction_allowed(&self, history: &SelectionHistory) -> bool {
        match history.scan_back(false) {
            ScanStop::Verb | ScanStop::Start | ScanStop::Conjunction => true,
            ScanStop::Preposition => history
                .last_preposition
                .as_ref()
                .and_then(|p| self.language.lexicon.lookup(&p.name, &p.pos))
                .is_some_and(|w| w.has_flag(&self.config.conjoin_flag)),
        }
    }

    /// Draw until a part-of-speech is accepted, at most `pos_retry_limit`
    /// times.
    pub fn choose_part_of_speech(
        &self,
        cursor: &Cursor,
        history: &SelectionHistory,
        rng: &mut StdRng,
    ) -> Result<String, SelectionError> {
        for _ in 0..self.config.pos_retry_limit {
            if let PosChoice::Pos(pos) = self.next_part_of_speech(cursor, history, rng)? {
                return Ok(pos);
            }
        }
        warn!(
            "gave up choosing a successor of '{}' after {} draws",
            cursor.pos, self.config.pos_retry_limit
        );
        Err(SelectionError::PartOfSpeechRetries {
            pos: cursor.pos.clone(),
            attempts: self.config.pos_retry_limit,
        })
    }

    /// Choose a word of part-of-speech `target` to follow the cursor.
    ///
    /// The cursor word's own requirements are folded into `constraints`; a
    /// noun continuing a conjunction also inherits the reserve. A noun
    /// consumes the active requirements. Adjectives and prepositions chosen
    /// while requirements are pending must agree with them.
    pub fn next_word(
        &self,
        cursor: &Cursor,
        target: &str,
        constraints: &mut ConstraintState,
        history: &SelectionHistory,
        used: &UsedWords,
        rng: &mut StdRng,
    ) -> Result<NextWord, SelectionError> {
        let part = self.language.grammar.get(target)?;
        if part.is_terminal() {
            return Ok(NextWord::End);
        }

        if let Some(record) = self.record(cursor) {
            constraints.apply(&self.language.requirements_of(record));
        }

        let conjoined = history.in_conjunction();
        if conjoined {
            constraints.resume_conjunction();
        }

        let lexicon = &self.language.lexicon;
        let mut pool = lexicon.all_words(&part.vocabulary);
        if part.role == Role::Noun && constraints.is_constrained() {
            pool.retain(|&id| constraints.active.contains(&lexicon.get(id).name));
            constraints.consume();
            debug!("'{}' consumed requirements, {} candidates", target, pool.len());
        }

        self.remove_used(&mut pool, used, history);

        if part.role.is_modifier() && (constraints.is_constrained() || conjoined) {
            return self.match_requirements(target, &pool, constraints, rng).map(NextWord::Word);
        }

        pool.choose(rng)
            .copied()
            .map(NextWord::Word)
            .ok_or_else(|| SelectionError::PoolExhausted {
                pos: target.to_string(),
            })
    }

    /// Drop used nouns and verbs (never emptying the pool) and the last
    /// preposition (unconditionally).
    fn remove_used(&self, pool: &mut Vec<WordId>, used: &UsedWords, history: &SelectionHistory) {
        let lexicon = &self.language.lexicon;
        for name in used.iter() {
            let remaining = pool.iter().filter(|&&id| lexicon.get(id).name != name).count();
            if remaining > 0 && remaining < pool.len() {
                pool.retain(|&id| lexicon.get(id).name != name);
            }
        }
        if let Some(ref prep) = history.last_preposition {
            pool.retain(|&id| lexicon.get(id).name != prep.name);
        }
    }

    /// Pick a modifier whose own requirements leave at least one acceptable
    /// noun, narrowing the active requirements to that overlap.
    ///
    /// A candidate without requirements is accepted as-is.
    pub fn match_requirements(
        &self,
        target: &str,
        pool: &[WordId],
        constraints: &mut ConstraintState,
        rng: &mut StdRng,
    ) -> Result<WordId, SelectionError> {
        if pool.is_empty() {
            return Err(SelectionError::PoolExhausted {
                pos: target.to_string(),
            });
        }
        constraints.seed_from_reserve();

        let limit = self.config.match_retry_limit;
        for attempt in 1..=limit {
            let Some(&id) = pool.choose(rng) else { break };
            let record = self.language.lexicon.get(id);
            if !record.has_requirements() {
                return Ok(id);
            }

            let frontier = self.language.requirements_of(record);
            let narrowed: FxHashSet<String> = constraints
                .active
                .intersection(&frontier)
                .cloned()
                .collect();
            if !narrowed.is_empty() {
                constraints.active = narrowed;
                return Ok(id);
            }
            debug!("attempt {}: '{}' conflicts with pending requirements", attempt, record.name);
        }

        warn!("no '{}' candidate matched pending requirements", target);
        Err(SelectionError::ExhaustedRetries {
            pos: target.to_string(),
            attempts: limit,
        })
    }

    /// Render a chosen word of part-of-speech `pos` in `situation`.
    pub fn render(&self, id: WordId, pos: &str, situation: Situation) -> Result<String, SelectionError> {
        let role = self.language.grammar.role(pos)?;
        Ok(inflect(self.language.lexicon.get(id), role, situation))
    }
}

/// A single sentence being generated: its private state and step loop.

use rand::rngs::StdRng;

use crate::core::constraints::ConstraintState;
use crate::core::history::{LastPreposition, SelectionHistory, UsedWords};
use crate::core::inflect::Situation;
use crate::core::selection::{Cursor, NextWord, SelectionEngine, SelectionError};
use crate::schema::pos::Role;
use crate::schema::word::WordId;

/// What a call to [`Session::step`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Word {
        id: WordId,
        pos: String,
        /// The word as rendered in the sentence.
        form: String,
    },
    End,
}

/// Everything that belongs to one sentence: cursor, constraints, history,
/// used words and inflection flags. Never shared between sentences.
#[derive(Debug, Clone)]
pub struct Session {
    cursor: Cursor,
    constraints: ConstraintState,
    history: SelectionHistory,
    used: UsedWords,
    situation: Situation,
    words: Vec<String>,
    finished: bool,
}

impl Session {
    /// Start a sentence from the part-of-speech `start`.
    pub fn new(start: &str) -> Self {
        Self {
            cursor: Cursor::start(start),
            constraints: ConstraintState::new(),
            history: SelectionHistory::new(),
            used: UsedWords::new(),
            situation: Situation::default(),
            words: Vec::new(),
            finished: false,
        }
    }

    /// Record the cursor word, then choose and place the next one.
    pub fn step(&mut self, engine: &SelectionEngine<'_>, rng: &mut StdRng) -> Result<Step, SelectionError> {
        if self.finished {
            return Ok(Step::End);
        }
        let config = engine.config();
        if self.words.len() >= config.max_sentence_length {
            return Err(SelectionError::SentenceTooLong(config.max_sentence_length));
        }

        self.observe_cursor(engine)?;

        let pos = engine.choose_part_of_speech(&self.cursor, &self.history, rng)?;
        let next = engine.next_word(
            &self.cursor,
            &pos,
            &mut self.constraints,
            &self.history,
            &self.used,
            rng,
        )?;

        match next {
            NextWord::End => {
                self.finished = true;
                Ok(Step::End)
            }
            NextWord::Word(id) => {
                let form = engine.render(id, &pos, self.situation)?;
                self.words.push(form.clone());
                self.cursor = Cursor {
                    pos: pos.clone(),
                    word: Some(id),
                };
                Ok(Step::Word { id, pos, form })
            }
        }
    }

    fn observe_cursor(&mut self, engine: &SelectionEngine<'_>) -> Result<(), SelectionError> {
        let role = engine.language().grammar.role(&self.cursor.pos)?;
        self.history.push(&self.cursor.pos, role);

        let name = match engine.record(&self.cursor) {
            Some(record) => {
                if role.is_tracked() {
                    self.used.insert(&record.name);
                }
                if role == Role::Preposition {
                    self.history.last_preposition = Some(LastPreposition {
                        name: record.name.clone(),
                        pos: record.pos.clone(),
                    });
                }
                record.name.as_str()
            }
            None => "",
        };
        self.situation
            .observe(role, name, &engine.config().participle_trigger);
        Ok(())
    }

    /// Step until the sentence ends.
    pub fn run(&mut self, engine: &SelectionEngine<'_>, rng: &mut StdRng) -> Result<String, SelectionError> {
        while self.step(engine, rng)? != Step::End {}
        Ok(self.sentence())
    }

    /// The words placed so far, space-separated.
    pub fn sentence(&self) -> String {
        self.words.join(" ")
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn history(&self) -> &SelectionHistory {
        &self.history
    }

    pub fn used(&self) -> &UsedWords {
        &self.used
    }

    pub fn constraints(&self) -> &ConstraintState {
        &self.constraints
    }
}

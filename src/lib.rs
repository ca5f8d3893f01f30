//! Sentence Engine — random sentence generation under semantic constraints.
//!
//! Walks a weighted part-of-speech grammar one word at a time, drawing each
//! word from a lexicon so that it agrees with the categories the words before
//! it require, then inflects it for plurality and participle form.

pub mod core;
pub mod schema;

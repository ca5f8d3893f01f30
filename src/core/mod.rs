pub mod constraints;
pub mod generator;
pub mod grammar;
pub mod hierarchy;
pub mod history;
pub mod inflect;
pub mod language;
pub mod lexicon;
pub mod selection;
pub mod session;

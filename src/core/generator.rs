/// The sentence generator: owns the shared language data and runs sessions.
///
/// Wires together loading, configuration, seeding, and the per-sentence
/// session loop.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::language::{Language, LanguageError, GRAMMAR_FILE, HIERARCHY_FILE, WORDLIST_FILE};
use crate::core::selection::{SelectionConfig, SelectionEngine, SelectionError};
use crate::core::session::Session;

/// Optional config file looked up in the data directory.
pub const CONFIG_FILE: &str = "config.ron";

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("language error: {0}")]
    Language(#[from] LanguageError),
    #[error("selection error: {0}")]
    Selection(#[from] SelectionError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("no language data: set a data directory, all three file paths, or a language")]
    MissingLanguage,
}

/// The top-level generator. Built via `SentenceGenerator::builder()`.
pub struct SentenceGenerator {
    language: Language,
    config: SelectionConfig,
    seed: u64,
    generation_count: u64,
}

/// Builder for constructing a `SentenceGenerator`.
pub struct SentenceGeneratorBuilder {
    data_dir: Option<PathBuf>,
    grammar_path: Option<PathBuf>,
    wordlist_path: Option<PathBuf>,
    hierarchy_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    seed: u64,
    /// Directly provided language (for testing without files).
    language: Option<Language>,
    /// Directly provided config (for testing without files).
    config: Option<SelectionConfig>,
}

impl SentenceGenerator {
    pub fn builder() -> SentenceGeneratorBuilder {
        SentenceGeneratorBuilder {
            data_dir: None,
            grammar_path: None,
            wordlist_path: None,
            hierarchy_path: None,
            config_path: None,
            seed: 0,
            language: None,
            config: None,
        }
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn engine(&self) -> SelectionEngine<'_> {
        SelectionEngine::new(&self.language, &self.config)
    }

    /// A fresh session and the RNG it should use. Each call advances the
    /// generation count so consecutive sentences differ.
    pub fn start_session(&mut self) -> (Session, StdRng) {
        let rng = StdRng::seed_from_u64(self.seed.wrapping_add(self.generation_count));
        self.generation_count += 1;
        (Session::new(self.language.grammar.start()), rng)
    }

    /// Generate one complete sentence.
    pub fn generate(&mut self) -> Result<String, GeneratorError> {
        let (mut session, mut rng) = self.start_session();
        let sentence = session.run(&self.engine(), &mut rng)?;
        Ok(sentence)
    }

    /// Generate `count` sentences, stopping at the first failure.
    pub fn generate_many(&mut self, count: usize) -> Result<Vec<String>, GeneratorError> {
        let mut results = Vec::with_capacity(count);
        for _ in 0..count {
            results.push(self.generate()?);
        }
        Ok(results)
    }
}

impl SentenceGeneratorBuilder {
    /// Directory holding `grammar.ron`, `wordlist.csv`, `hierarchy.csv` and
    /// optionally `config.ron`.
    pub fn data_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn grammar_path(mut self, path: impl AsRef<Path>) -> Self {
        self.grammar_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn wordlist_path(mut self, path: impl AsRef<Path>) -> Self {
        self.wordlist_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn hierarchy_path(mut self, path: impl AsRef<Path>) -> Self {
        self.hierarchy_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn config_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Provide language data directly (for testing without files).
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    /// Provide a config directly (for testing without files).
    pub fn with_config(mut self, config: SelectionConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> Result<SentenceGenerator, GeneratorError> {
        let in_dir = |file: &str| self.data_dir.as_ref().map(|dir| dir.join(file));

        let language = match self.language {
            Some(language) => language,
            None => {
                let grammar = self.grammar_path.clone().or_else(|| in_dir(GRAMMAR_FILE));
                let wordlist = self.wordlist_path.clone().or_else(|| in_dir(WORDLIST_FILE));
                let hierarchy = self.hierarchy_path.clone().or_else(|| in_dir(HIERARCHY_FILE));
                match (grammar, wordlist, hierarchy) {
                    (Some(g), Some(w), Some(h)) => Language::load_files(&g, &w, &h)?,
                    _ => return Err(GeneratorError::MissingLanguage),
                }
            }
        };

        // Explicit config wins, then an explicit path, then config.ron in the
        // data directory if present.
        let config = match self.config {
            Some(config) => config,
            None => {
                let path = self
                    .config_path
                    .clone()
                    .or_else(|| in_dir(CONFIG_FILE).filter(|p| p.exists()));
                match path {
                    Some(path) => {
                        let contents = std::fs::read_to_string(&path)?;
                        SelectionConfig::parse_ron(&contents)?
                    }
                    None => SelectionConfig::default(),
                }
            }
        };

        Ok(SentenceGenerator {
            language,
            config,
            seed: self.seed,
            generation_count: 0,
        })
    }
}

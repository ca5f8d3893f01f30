/// Batch example — generates sentences from the bundled English data.
///
/// Loads the language once, builds a generator with a tuned config, then runs
/// independent sessions from two threads over the same shared language.
///
/// Run with: cargo run --example batch

use rand::rngs::StdRng;
use rand::SeedableRng;
use sentence_engine::core::generator::SentenceGenerator;
use sentence_engine::core::language::Language;
use sentence_engine::core::selection::{SelectionConfig, SelectionEngine};
use sentence_engine::core::session::Session;
use std::path::Path;

fn main() {
    let language = Language::load(Path::new("data/english")).expect("Failed to load English data");

    // --- A generator with shorter sentences ---
    let config = SelectionConfig {
        length_threshold: 4,
        end_weight_step: 0.5,
        ..SelectionConfig::default()
    };
    let mut generator = SentenceGenerator::builder()
        .seed(2026)
        .with_language(language.clone())
        .with_config(config.clone())
        .build()
        .expect("Failed to build generator");

    println!("--- Batch (seed {}) ---", generator.seed());
    match generator.generate_many(10) {
        Ok(sentences) => {
            for (i, sentence) in sentences.iter().enumerate() {
                println!("{:2}. {}", i + 1, sentence);
            }
        }
        Err(e) => println!("[Generation error: {}]", e),
    }
    println!();

    // --- Concurrent sessions over one shared language ---
    let engine = SelectionEngine::new(&language, &config);
    let start = language.grammar.start();
    std::thread::scope(|scope| {
        let workers: Vec<_> = (0..2u64)
            .map(|worker| {
                scope.spawn(move || {
                    (0..3u64)
                        .map(|n| {
                            let mut rng = StdRng::seed_from_u64(worker * 100 + n);
                            Session::new(start)
                                .run(&engine, &mut rng)
                                .unwrap_or_else(|e| format!("[Generation error: {}]", e))
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for (worker, handle) in workers.into_iter().enumerate() {
            for sentence in handle.join().expect("worker panicked") {
                println!("[worker {}] {}", worker, sentence);
            }
        }
    });
}

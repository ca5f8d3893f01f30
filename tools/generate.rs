/// Generate — prints random sentences from a language data directory.
///
/// Usage: generate [--data-dir <dir>] [--seed <n>] [--count <n>] [--step] [--log-level <level>]
///
/// With `--step` each sentence is built one word at a time: the screen is
/// redrawn after every word and Enter advances to the next.

use sentence_engine::core::generator::SentenceGenerator;
use sentence_engine::core::session::Step;
use std::io::{self, BufRead, Write};
use std::process;

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut data_dir = "data/english".to_string();
    let mut seed: u64 = 42;
    let mut count: usize = 1;
    let mut step = false;
    let mut log_level = "warn".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage();
                return;
            }
            "--data-dir" if i + 1 < args.len() => {
                i += 1;
                data_dir = args[i].clone();
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().unwrap_or(42);
            }
            "--count" if i + 1 < args.len() => {
                i += 1;
                count = args[i].parse().unwrap_or(1);
            }
            "--log-level" if i + 1 < args.len() => {
                i += 1;
                log_level = args[i].clone();
            }
            "--step" => step = true,
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let mut logger = env_logger::Builder::from_default_env();
    logger.filter_level(log_level.parse().unwrap_or(log::LevelFilter::Warn));
    logger.init();

    let mut generator = match SentenceGenerator::builder().data_dir(&data_dir).seed(seed).build() {
        Ok(generator) => generator,
        Err(e) => {
            eprintln!("ERROR: Failed to load '{}': {}", data_dir, e);
            process::exit(1);
        }
    };

    let mut failures = 0;
    for n in 0..count {
        let result = if step {
            step_through(&mut generator)
        } else {
            generator.generate().map_err(|e| e.to_string())
        };
        match result {
            Ok(_) if step => {
                if n + 1 < count {
                    wait_for_enter();
                }
            }
            Ok(sentence) => println!("{}.", capitalize(&sentence)),
            Err(e) => {
                eprintln!("ERROR: {}", e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        process::exit(1);
    }
}

/// Build one sentence word by word, redrawing after each word.
fn step_through(generator: &mut SentenceGenerator) -> Result<String, String> {
    let (mut session, mut rng) = generator.start_session();
    let engine = generator.engine();
    loop {
        match session.step(&engine, &mut rng).map_err(|e| e.to_string())? {
            Step::Word { pos, .. } => {
                print!("{}", CLEAR_SCREEN);
                println!("{}", capitalize(&session.sentence()));
                println!("\n[{}]  Enter for the next word", pos);
                wait_for_enter();
            }
            Step::End => {
                print!("{}", CLEAR_SCREEN);
                let sentence = session.sentence();
                println!("{}.", capitalize(&sentence));
                return Ok(sentence);
            }
        }
    }
}

fn wait_for_enter() {
    io::stdout().flush().ok();
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).ok();
}

fn capitalize(sentence: &str) -> String {
    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn print_usage() {
    println!("Usage: generate [--data-dir <dir>] [--seed <n>] [--count <n>] [--step] [--log-level <level>]");
    println!();
    println!("  --data-dir <dir>     language data directory (default: data/english)");
    println!("  --seed <n>           RNG seed (default: 42)");
    println!("  --count <n>          number of sentences (default: 1)");
    println!("  --step               reveal each sentence one word at a time");
    println!("  --log-level <level>  error, warn, info, debug or trace (default: warn)");
}

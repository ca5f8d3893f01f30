/// Lexicon Linter — checks that grammar, word table and hierarchy agree.
///
/// Usage: lexicon_linter <data_dir>

use rustc_hash::FxHashSet;
use sentence_engine::core::language::Language;
use sentence_engine::schema::pos::Role;
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: lexicon_linter <data_dir>");
        process::exit(0);
    }

    let data_dir = Path::new(&args[1]);
    if !data_dir.is_dir() {
        eprintln!("ERROR: Directory '{}' does not exist", data_dir.display());
        process::exit(1);
    }

    let language = match Language::load(data_dir) {
        Ok(language) => language,
        Err(e) => {
            eprintln!("ERROR: Failed to load language data: {}", e);
            process::exit(1);
        }
    };

    println!(
        "Loaded {} parts-of-speech, {} categories, {} words",
        language.grammar.len(),
        language.hierarchy.len(),
        language.lexicon.len()
    );

    let (errors, warnings) = lint_language(&language);

    println!("\n=== Lexicon Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn lint_language(language: &Language) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let grammar = &language.grammar;

    let known_tags: FxHashSet<&str> = grammar
        .parts()
        .flat_map(|part| part.vocabulary.iter().map(String::as_str))
        .collect();

    // Words no part-of-speech can ever draw
    for record in language.lexicon.records() {
        if !known_tags.contains(record.pos.as_str()) {
            warnings.push(format!(
                "Word '{}' has tag '{}' which no part-of-speech uses",
                record.name, record.pos
            ));
        }
        for category in &record.tags {
            if !language.hierarchy.contains(category) {
                warnings.push(format!(
                    "Word '{}' belongs to category '{}' which is not in the hierarchy",
                    record.name, category
                ));
            }
        }
        for (i, category) in record.tags.iter().enumerate() {
            for other in &record.tags[i + 1..] {
                let (narrow, broad) = if language.hierarchy.is_a(category, other) {
                    (category, other)
                } else if language.hierarchy.is_a(other, category) {
                    (other, category)
                } else {
                    continue;
                };
                warnings.push(format!(
                    "Word '{}' lists category '{}' which '{}' already implies",
                    record.name, broad, narrow
                ));
            }
        }
        if record.has_requirements() && language.requirements_of(record).is_empty() {
            warnings.push(format!(
                "Word '{}' has successor requirements that no word satisfies",
                record.name
            ));
        }
    }

    // Parts-of-speech that would exhaust their pool
    let reachable = grammar.reachable();
    let mut codes: Vec<&str> = grammar.parts().map(|p| p.code.as_str()).collect();
    codes.sort_unstable();
    for code in codes {
        let Ok(part) = grammar.get(code) else { continue };
        if !reachable.contains(code) {
            warnings.push(format!("Part-of-speech '{}' is unreachable from the start", code));
        }
        if matches!(part.role, Role::Start | Role::End) {
            continue;
        }
        match language.all_words(code) {
            Ok(words) if words.is_empty() => {
                errors.push(format!("Part-of-speech '{}' has no words", code));
            }
            Ok(_) => {}
            Err(e) => errors.push(e.to_string()),
        }
        if part.successors.is_empty() {
            errors.push(format!(
                "Part-of-speech '{}' has no successors and is not an end",
                code
            ));
        }
    }

    (errors, warnings)
}

/// Story Linter — validates story files and reports authoring warnings.
///
/// Usage: story_linter <story.ron | story_dir>

use narrative_trail::core::story::Story;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: story_linter <story.ron | story_dir>");
        process::exit(0);
    }

    let root = Path::new(&args[1]);
    let mut files = Vec::new();
    if root.is_file() {
        files.push(root.to_path_buf());
    } else if root.is_dir() {
        collect_ron_files(root, &mut files);
    } else {
        eprintln!("ERROR: Path '{}' does not exist", args[1]);
        process::exit(1);
    }
    files.sort();

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for path in &files {
        match Story::load_from_ron(path) {
            Ok(story) => {
                println!(
                    "  Loaded: {} ({} beats, {} waypoints)",
                    path.display(),
                    story.script.len(),
                    story.atlas.len()
                );
                for warning in story.lint() {
                    warnings.push(format!("{}: {}", path.display(), warning));
                }
            }
            Err(e) => errors.push(format!("{}: {}", path.display(), e)),
        }
    }

    println!("\n=== Story Lint Report ===\n");

    if files.is_empty() {
        println!("No story files found.");
    } else if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} files, {} errors, {} warnings",
        files.len(),
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn collect_ron_files(dir: &Path, out: &mut Vec<PathBuf>) {
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                collect_ron_files(&path, out);
            } else if path.extension().and_then(|s| s.to_str()) == Some("ron") {
                out.push(path);
            }
        }
    }
}

/// Play — terminal playthrough of a story with a real-time typewriter.
///
/// Usage: play [--story <path>] [--name <name>] [--speed <ms>]
///
/// Commands:
///   <n>      — pick choice number n
///   next     — continue (restarts on the ending)
///   map      — list the pins travelled so far
///   restart  — start over
///   help     — list commands
///   quit     — exit
///
/// Set RUST_LOG=narrative_trail=debug to trace intents.

use narrative_trail::core::game::{IntentOutcome, NarrativeGame};
use narrative_trail::core::snapshot::Snapshot;
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const DEFAULT_STORY: &str = "story_data/lake_guardian/story.ron";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut story_path = DEFAULT_STORY.to_string();
    let mut name = String::new();
    let mut speed_ms: u64 = 18;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--story" if i + 1 < args.len() => {
                i += 1;
                story_path = args[i].clone();
            }
            "--name" if i + 1 < args.len() => {
                i += 1;
                name = args[i].clone();
            }
            "--speed" if i + 1 < args.len() => {
                i += 1;
                speed_ms = args[i].parse().unwrap_or(18);
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut game = match NarrativeGame::builder()
        .story_file(&story_path)
        .player_name(&name)
        .reveal_interval(Duration::from_millis(speed_ms))
        .build()
    {
        Ok(game) => game,
        Err(e) => {
            eprintln!("ERROR loading story {}: {}", story_path, e);
            std::process::exit(1);
        }
    };

    println!("Loaded {} beats from {}", game.story().script.len(), story_path);
    println!("Type 'help' for commands.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    reveal(&mut game, &mut stdout);

    loop {
        let snap = game.snapshot();
        print_prompt(&snap);
        print!("play> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim().to_lowercase();
        if line.is_empty() {
            continue;
        }

        let result = match line.as_str() {
            "quit" | "exit" | "q" => {
                println!("Ka kite anō.");
                break;
            }
            "help" | "h" | "?" => {
                print_help();
                continue;
            }
            "map" | "m" => {
                print_map(&snap);
                continue;
            }
            "restart" | "r" => {
                game.restart();
                Ok(IntentOutcome::Accepted)
            }
            "next" | "n" => game.next(),
            other => match other.parse::<usize>() {
                Ok(n) => match snap.choices.as_ref().and_then(|c| c.get(n.wrapping_sub(1))) {
                    Some(choice) => game.choose(choice.value),
                    None => {
                        println!("No choice numbered {}", n);
                        continue;
                    }
                },
                Err(_) => {
                    println!("Unknown command: {} (type 'help')", other);
                    continue;
                }
            },
        };

        match result {
            Ok(IntentOutcome::Accepted) => reveal(&mut game, &mut stdout),
            Ok(IntentOutcome::IgnoredWhileRevealing) => {}
            Err(e) => println!("ERROR: {}", e),
        }
    }
}

/// Print the title, then type out the body as the typewriter advances.
fn reveal(game: &mut NarrativeGame, stdout: &mut io::Stdout) {
    println!("\n== {} ==", game.title());

    let interval = game.config().reveal_interval;
    let mut printed = 0usize;
    let mut last = Instant::now();
    while game.is_revealing() {
        thread::sleep(interval);
        let now = Instant::now();
        game.advance(now - last);
        last = now;
        printed += print_new_chars(game.displayed(), printed, stdout);
    }
    print_new_chars(game.displayed(), printed, stdout);
    println!("\n");
}

fn print_new_chars(displayed: &str, printed: usize, stdout: &mut io::Stdout) -> usize {
    let fresh: String = displayed.chars().skip(printed).collect();
    let count = fresh.chars().count();
    if count > 0 {
        print!("{}", fresh);
        stdout.flush().ok();
    }
    count
}

fn print_prompt(snap: &Snapshot) {
    match &snap.choices {
        Some(choices) => {
            for (i, choice) in choices.iter().enumerate() {
                println!("  [{}] {}", i + 1, choice.label);
            }
        }
        None if snap.is_ending => {
            println!("  Score: {}  ({})", snap.score, snap.mood.name());
            println!("  'next' to play again");
        }
        None => println!("  'next' to continue"),
    }
}

fn print_map(snap: &Snapshot) {
    println!("\n--- Map ({} segments) ---", snap.path.len());
    for pin in &snap.pins {
        let marker = if pin.is_current { "*" } else { " " };
        println!(
            " {} {:<12} ({:>5.1}, {:>5.1})  {}",
            marker, pin.label, pin.x, pin.y, pin.color
        );
    }
    println!("--- End ---\n");
}

fn print_usage() {
    println!("Usage: play [--story <path>] [--name <name>] [--speed <ms>]");
    println!("  --story  story RON file (default: {})", DEFAULT_STORY);
    println!("  --name   player name substituted for {{name}}");
    println!("  --speed  milliseconds per revealed character (default: 18)");
}

fn print_help() {
    println!("Commands:");
    println!("  <n>      pick choice number n");
    println!("  next     continue (restarts on the ending)");
    println!("  map      list the pins travelled so far");
    println!("  restart  start over");
    println!("  help     this list");
    println!("  quit     exit");
}

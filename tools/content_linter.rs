/// Content Linter: validates a content directory before it ships.
///
/// Usage: content_linter <content_dir> [--quiet]
use silent_thread::core::content::ContentGraph;
use std::path::Path;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "silent_thread=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: content_linter <content_dir> [--quiet]");
        process::exit(0);
    }

    let content_dir = &args[1];
    let quiet = args[2..].iter().any(|a| a == "--quiet");

    if !Path::new(content_dir).is_dir() {
        eprintln!("ERROR: Path '{}' is not a directory", content_dir);
        process::exit(1);
    }

    let content = match ContentGraph::load_from_dir(content_dir) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("ERROR: Failed to load content: {}", e);
            process::exit(1);
        }
    };

    println!("Loaded \"{}\"", content.manifest().title);
    println!(
        "  {} story nodes, {} investigations, {} puzzles, {} items",
        content.story_nodes().len(),
        content.investigations().len(),
        content.puzzles().len(),
        content.items().len()
    );

    let endings = content.story_nodes().iter().filter(|n| n.is_ending()).count();
    let reachable = content.reachable_nodes().len();
    println!(
        "  {} endings, {} of {} nodes reachable from \"{}\"",
        endings,
        reachable,
        content.story_nodes().len(),
        content.manifest().start
    );

    let (errors, warnings): (Vec<_>, Vec<_>) =
        content.validate().into_iter().partition(|issue| issue.is_error());

    println!("\n=== Content Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    if !quiet {
        for warning in &warnings {
            println!("WARNING: {}", warning.message);
        }
    }

    for error in &errors {
        println!("ERROR: {}", error.message);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if !errors.is_empty() {
        process::exit(1);
    }
}

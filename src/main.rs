use std::time::Duration;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::Level;
use word_search::fill::fill_random;
use word_search::prep::{parse_word_lines, resolve_dimensions};
use word_search::solver::{Solver, SolverConfig};

#[derive(Parser)]
#[command(
    name = "word_search",
    about = "Word search generator that packs words with maximum letter overlap"
)]
struct Cli {
    /// Grid rows (0 estimates a square grid from the words)
    #[arg(long, default_value_t = 0)]
    rows: usize,

    /// Grid columns (0 estimates a square grid from the words)
    #[arg(long, default_value_t = 0)]
    cols: usize,

    /// Search time budget in milliseconds
    #[arg(long = "time-ms", alias = "timems", default_value_t = 2000)]
    time_ms: u64,

    /// Seed for the random letters in unused cells
    #[arg(long)]
    seed: Option<u64>,

    /// Leave unused cells as '.'
    #[arg(long)]
    no_fill: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Log search progress to stderr
    #[arg(long, short)]
    verbose: bool,
}

fn fail<T>(msg: impl std::fmt::Display) -> T {
    eprintln!("Error: {}", msg);
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let input = std::io::read_to_string(std::io::stdin()).unwrap_or_else(fail);
    let words = parse_word_lines(&input).unwrap_or_else(fail);
    let (rows, cols) = resolve_dimensions(cli.rows, cli.cols, &words);

    let config = SolverConfig::new(rows, cols, Duration::from_millis(cli.time_ms));
    let mut result = Solver::new(config, words).solve();

    if !result.all_placed() {
        tracing::warn!(
            unplaced = result.unplaced_words.join(","),
            "some words could not be placed"
        );
    }

    if !cli.no_fill {
        let mut rng = match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        fill_random(&mut result.grid, &mut rng);
    }

    let report = result.report();
    let json = if cli.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    };
    println!("{}", json.unwrap_or_else(fail));
}

//! dimly - terminal viewer for rule-driven code de-emphasis
//!
//! Prints a file with the regions matched by the configured rules rendered
//! dim, standing in for an editor host's decoration layer.

use std::env;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use dimly::config::Config;
use dimly::display::{RenderOptions, TerminalRenderer};
use dimly::document::Document;
use dimly::engine::{Tier, TierBuckets};
use dimly::error::{DimlyError, Result};
use dimly::session::{RenderSink, SessionManager};

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut file: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut line_numbers = false;
    let mut color = io::stdout().is_terminal();
    let mut print_matches = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            "--version" | "-V" => {
                print_version();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                match args.get(i) {
                    Some(path) => config_path = Some(PathBuf::from(path)),
                    None => return Err(DimlyError::Message("--config needs a path".into())),
                }
            }
            "--line-numbers" | "-n" => line_numbers = true,
            "--no-color" => color = false,
            "--matches" => print_matches = true,
            arg if !arg.starts_with('-') => file = Some(PathBuf::from(arg)),
            arg => return Err(DimlyError::Message(format!("unknown option: {}", arg))),
        }
        i += 1;
    }

    let file = file.ok_or_else(|| DimlyError::Message("no file given; see --help".into()))?;

    let config = match &config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };

    let doc = Document::from_file(&file)?;
    let doc_id = file.to_string_lossy().into_owned();

    let mut manager = SessionManager::new(Duration::from_millis(config.rescan_period_ms));
    manager.enable(&doc_id);

    if print_matches {
        let mut sink = MatchPrinter;
        manager.rescan(&doc_id, &doc, &config, &[], &mut sink);
        return Ok(());
    }

    let max_width = if io::stdout().is_terminal() {
        crossterm::terminal::size().ok().map(|(cols, _)| cols as usize)
    } else {
        None
    };
    let options = RenderOptions {
        color,
        line_numbers,
        max_width,
    };

    let stdout = io::stdout();
    let mut renderer = TerminalRenderer::new(stdout.lock(), &doc, config.tier_values, options);
    manager.rescan(&doc_id, &doc, &config, &[], &mut renderer);

    Ok(())
}

/// Sink that lists the matched ranges per tier instead of rendering
struct MatchPrinter;

impl RenderSink for MatchPrinter {
    fn apply(&mut self, _doc_id: &str, buckets: &TierBuckets) {
        for tier in Tier::ALL {
            for range in buckets.bucket(tier) {
                println!("{:<3} {}", tier.name(), range);
            }
        }
    }

    fn clear(&mut self, _doc_id: &str) {}
}

fn print_usage() {
    println!("dimly {} - dim low-importance code regions", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: dimly [OPTIONS] FILE");
    println!();
    println!("Options:");
    println!("  -c, --config PATH  Read rules from PATH instead of ~/.dimly.toml");
    println!("  -n, --line-numbers Show a line-number gutter");
    println!("      --no-color     Print without ANSI colors");
    println!("      --matches      List matched ranges per tier instead of rendering");
    println!("  -h, --help         Show this help message");
    println!("  -V, --version      Show version information");
    println!();
    println!("Rules live in a TOML config file. A single-line rule dims every");
    println!("regex match on a line; a paired rule dims from a start match to");
    println!("an end match within a bounded window:");
    println!();
    println!("  [[rules]]");
    println!("  pattern = 'log::(trace|debug)!.*$'");
    println!("  tier = \"min\"");
    println!();
    println!("  [[rules]]");
    println!("  start = '#\\[derive\\('");
    println!("  end = '\\)\\]'");
    println!("  max-lines-between = 3");
}

fn print_version() {
    println!("dimly {}", env!("CARGO_PKG_VERSION"));
}

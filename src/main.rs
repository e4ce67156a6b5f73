use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chordbook::{ImportConfig, ImportOptions, MergePolicy, RunSummary, TextutilExtractor};

/// Command-line arguments for chordbook
#[derive(Parser, Debug)]
#[command(name = "chordbook")]
#[command(about = "Imports word-processor chord charts into the chord viewer's song data file")]
#[command(version)]
struct Args {
    /// Directory containing the song documents
    #[arg(env = "CHORDBOOK_LYRICS_DIR")]
    lyrics_dir: PathBuf,

    /// Generated data file consumed by the viewer
    #[arg(short, long, default_value = "chord_songs.js")]
    output: PathBuf,

    /// Optional YAML file overriding importer settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reimport all songs from scratch, discarding manual edits
    #[arg(long, conflicts_with = "force_song")]
    force: bool,

    /// Reimport a single song by title (case- and punctuation-insensitive)
    #[arg(long, value_name = "TITLE")]
    force_song: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chordbook=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(summary) => {
            print!("{}", summary);
            if summary.force_song_error.is_some() {
                // The requested reimport did not happen; the rest of the
                // merge still completed and was written out
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<RunSummary> {
    let config = match &args.config {
        Some(path) => ImportConfig::load(path)?,
        None => ImportConfig::default(),
    };

    let policy = if args.force {
        MergePolicy::ForceAll
    } else if let Some(title) = args.force_song {
        MergePolicy::ForceSong(title)
    } else {
        MergePolicy::Preserve
    };

    let options = ImportOptions {
        lyrics_dir: args.lyrics_dir,
        output: args.output,
        policy,
        config,
    };

    let summary =
        chordbook::run_import(&options, &TextutilExtractor).context("chord import failed")?;

    println!("Generated {}", options.output.display());
    Ok(summary)
}

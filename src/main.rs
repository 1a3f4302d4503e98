//! Catalog Tools - trading card catalog site utilities
//!
//! Converts CSV card/set/image metadata into the JSON consumed by the static
//! site and repairs card image paths against the on-disk image tree. Each
//! subcommand is a standalone, single-pass batch transform.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use catalog_tools::convert::ConvertOptions;
use catalog_tools::{check, convert, merge, normalize, pack_art, reconcile};

#[derive(Parser, Debug)]
#[command(name = "catalog_tools")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert cards/sets/images CSV files into JSON for the site
    Convert {
        /// Path to cards.csv (falls back to common locations)
        #[arg(long)]
        cards: Option<PathBuf>,

        /// Path to sets.csv
        #[arg(long)]
        sets: Option<PathBuf>,

        /// Path to images.csv
        #[arg(long)]
        images: Option<PathBuf>,

        /// Keep only card rows from this set code
        #[arg(long)]
        set: Option<String>,

        /// Directory the JSON files are written to
        #[arg(long, default_value = "docs")]
        out_dir: PathBuf,
    },

    /// Normalize File Name entries to images/<set-code>/ prefixed paths
    Normalize {
        #[arg(long, default_value = "metadata/Cards - Virtual Cards.csv")]
        input: PathBuf,

        #[arg(long, default_value = "metadata/cards.csv")]
        output: PathBuf,
    },

    /// Merge JSON and CSV set metadata into one sorted CSV
    MergeSets {
        #[arg(long, default_value = "site/sets.json")]
        json: PathBuf,

        #[arg(long, default_value = "metadata/sets.csv")]
        csv: PathBuf,

        #[arg(long, default_value = "metadata/sets_merged.csv")]
        output: PathBuf,
    },

    /// Report card images that are missing on disk
    CheckImages {
        #[arg(long, default_value = "site/cards.json")]
        cards: PathBuf,

        /// Image root directories, tried in order
        #[arg(long = "root", default_values_os_t = default_roots())]
        roots: Vec<PathBuf>,

        /// File the missing image list is written to
        #[arg(long, default_value = "missing_images.txt")]
        report: PathBuf,
    },

    /// Rewrite card file names to existing images using naming heuristics
    FixPaths {
        #[arg(long, default_value = "site/cards.json")]
        cards: PathBuf,

        /// Image root directories, tried in order
        #[arg(long = "root", default_values_os_t = default_roots())]
        roots: Vec<PathBuf>,
    },

    /// Fill empty pack_art fields from the pack-art directory
    PackArt {
        #[arg(long, default_value = "metadata/sets_merged.csv")]
        sets: PathBuf,

        #[arg(long, default_value = "pack-art")]
        art_dir: PathBuf,
    },
}

fn default_roots() -> Vec<PathBuf> {
    vec![PathBuf::from("images"), PathBuf::from("site/images")]
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(command: Command) -> catalog_tools::Result<()> {
    match command {
        Command::Convert {
            cards,
            sets,
            images,
            set,
            out_dir,
        } => {
            let summary = convert::run(&ConvertOptions {
                cards,
                sets,
                images,
                set_filter: set,
                out_dir,
            })?;
            log::info!(
                "Conversion complete: {} cards, {} sets, {} images, {} filled",
                summary.cards,
                summary.sets,
                summary.images,
                summary.filled
            );
        }
        Command::Normalize { input, output } => {
            normalize::run(&input, &output)?;
        }
        Command::MergeSets { json, csv, output } => {
            merge::run(&json, &csv, &output)?;
        }
        Command::CheckImages {
            cards,
            roots,
            report,
        } => {
            check::run(&cards, &roots, &report)?;
        }
        Command::FixPaths { cards, roots } => {
            reconcile::run(&cards, &roots)?;
        }
        Command::PackArt { sets, art_dir } => {
            pack_art::run(&sets, &art_dir)?;
        }
    }
    Ok(())
}

use anyhow::Result;
use clap::{Parser, Subcommand};
use engine::persist::{save_snapshot, IndexPaths};
use engine::{scan_corpus, EnglishNormalizer, IndexBuilder, StopwordSet};
use tracing_subscriber::{fmt, EnvFilter};

use std::path::Path;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build a positional index from a corpus directory", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from a directory of numbered .txt files
    Build {
        /// Corpus directory (scanned recursively for *.txt)
        #[arg(long)]
        corpus: String,
        /// Output index directory
        #[arg(long)]
        output: String,
        /// Whitespace-delimited stopword file
        #[arg(long)]
        stopwords: Option<String>,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            corpus,
            output,
            stopwords,
        } => build_index(&corpus, &output, stopwords.as_deref()),
    }
}

fn build_index(corpus: &str, output: &str, stopwords: Option<&str>) -> Result<()> {
    let started = Instant::now();
    let stopwords = match stopwords {
        Some(path) => StopwordSet::from_file(Path::new(path))?,
        None => StopwordSet::default(),
    };

    let scan = scan_corpus(Path::new(corpus))?;
    tracing::info!(
        documents = scan.documents.len(),
        skipped = scan.skipped,
        stopwords = stopwords.len(),
        "corpus scan complete"
    );

    let builder = IndexBuilder::new(EnglishNormalizer::new(), stopwords);
    let snapshot = builder.build_snapshot(scan.documents);

    let paths = IndexPaths::new(output);
    let meta = save_snapshot(&paths, &snapshot)?;
    tracing::info!(
        num_docs = meta.num_docs,
        num_terms = meta.num_terms,
        elapsed_s = started.elapsed().as_secs_f32(),
        output,
        "index build complete"
    );
    Ok(())
}

//! doclump CLI
//!
//! Cluster a TF-IDF dataset and report purity / NMI against its labels.
//!
//! # Commands
//!
//! - `run`: one clustering run with a fixed cluster count
//! - `sweep`: repeat the run over a range of cluster counts
//!
//! ```bash
//! doclump run --data 20news-full-tfidf.txt --vocab words_idfs.txt \
//!     --clusters 10 --seed 2018 --criterion similarity --threshold 1000
//!
//! doclump sweep --data 20news-full-tfidf.txt --vocab words_idfs.txt \
//!     --from 2 --to 20 --step 2 --json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use doclump::{Corpus, Evaluation, Kmeans, StoppingCriterion};

/// Spherical k-means over TF-IDF document vectors
#[derive(Parser)]
#[command(name = "doclump")]
#[command(version)]
#[command(about = "Cluster TF-IDF documents and score the result with purity and NMI")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cluster once and print purity and NMI
    Run {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        params: RunParams,

        /// Number of clusters.
        #[arg(
            short = 'k',
            long,
            default_value = "10",
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        clusters: u32,
    },
    /// Cluster once per cluster count in a range and print one row per run
    Sweep {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        params: RunParams,

        /// Smallest cluster count.
        #[arg(long, default_value = "2", value_parser = clap::value_parser!(u32).range(1..))]
        from: u32,

        /// Largest cluster count (inclusive).
        #[arg(long, default_value = "20")]
        to: u32,

        /// Increment between cluster counts.
        #[arg(long, default_value = "2", value_parser = clap::value_parser!(u32).range(1..))]
        step: u32,
    },
}

#[derive(Args)]
struct DataArgs {
    /// Dataset file with one `label<fff>doc_id<fff>index:weight ...` line per document.
    #[arg(long)]
    data: PathBuf,

    /// Vocabulary file; its line count is the vector dimensionality.
    #[arg(long, required_unless_present = "vocab_size", conflicts_with = "vocab_size")]
    vocab: Option<PathBuf>,

    /// Vector dimensionality, instead of --vocab.
    #[arg(long)]
    vocab_size: Option<usize>,
}

impl DataArgs {
    fn load(&self) -> Result<Corpus> {
        let corpus = match (&self.vocab, self.vocab_size) {
            (Some(vocab), _) => Corpus::load(&self.data, vocab),
            (None, Some(size)) => Corpus::load_with_vocab_size(&self.data, size),
            (None, None) => anyhow::bail!("either --vocab or --vocab-size is required"),
        };
        corpus.with_context(|| format!("failed to load {}", self.data.display()))
    }
}

/// Stopping policy names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CriterionKind {
    /// Fixed number of iterations.
    MaxIters,
    /// Centroids stop changing.
    Centroid,
    /// Similarity total stops growing.
    Similarity,
}

impl CriterionKind {
    fn name(self) -> &'static str {
        match self {
            Self::MaxIters => "max_iters",
            Self::Centroid => "centroid",
            Self::Similarity => "similarity",
        }
    }

    fn default_threshold(self) -> f64 {
        match self {
            Self::MaxIters => 20.0,
            Self::Centroid => 0.0,
            Self::Similarity => 1000.0,
        }
    }
}

#[derive(Args)]
struct RunParams {
    /// Random seed for centroid initialization.
    #[arg(long, default_value = "2018")]
    seed: u64,

    /// Stopping criterion.
    #[arg(long, value_enum, default_value = "similarity")]
    criterion: CriterionKind,

    /// Criterion threshold (iterations, centroid mismatches, or similarity growth).
    /// Defaults: max-iters 20, centroid 0, similarity 1000.
    #[arg(long)]
    threshold: Option<f64>,

    /// Print JSON instead of plain text.
    #[arg(long)]
    json: bool,
}

impl RunParams {
    fn criterion(&self) -> Result<StoppingCriterion> {
        let threshold = self
            .threshold
            .unwrap_or_else(|| self.criterion.default_threshold());
        StoppingCriterion::from_name(self.criterion.name(), threshold)
            .context("invalid stopping criterion")
    }
}

fn evaluate(
    corpus: &Corpus,
    k: usize,
    seed: u64,
    criterion: StoppingCriterion,
) -> Result<Evaluation> {
    let fit = Kmeans::new(k)
        .with_seed(seed)
        .with_criterion(criterion)
        .fit(corpus)
        .with_context(|| format!("k-means with {k} clusters failed"))?;
    fit.evaluate(corpus).context("scoring failed")
}

#[derive(Serialize)]
struct SweepRow {
    clusters: usize,
    #[serde(flatten)]
    evaluation: Evaluation,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            data,
            params,
            clusters,
        } => {
            // Reject a bad criterion before paying for the load.
            let criterion = params.criterion()?;
            let corpus = data.load()?;
            let evaluation = evaluate(&corpus, clusters as usize, params.seed, criterion)?;

            if params.json {
                println!("{}", serde_json::to_string_pretty(&evaluation)?);
            } else {
                println!("purity: {:.6}", evaluation.purity);
                println!("NMI:    {:.6}", evaluation.nmi);
                println!("iterations: {}", evaluation.iterations);
            }
        }
        Commands::Sweep {
            data,
            params,
            from,
            to,
            step,
        } => {
            anyhow::ensure!(from <= to, "--from ({from}) must not exceed --to ({to})");
            let criterion = params.criterion()?;
            let corpus = data.load()?;

            let mut rows = Vec::new();
            for k in (from..=to).step_by(step as usize) {
                let evaluation = evaluate(&corpus, k as usize, params.seed, criterion)?;
                info!(
                    clusters = k,
                    purity = evaluation.purity,
                    nmi = evaluation.nmi,
                    "sweep point"
                );
                rows.push(SweepRow {
                    clusters: k as usize,
                    evaluation,
                });
            }

            if params.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("{:>8}  {:>8}  {:>8}  {:>10}", "clusters", "purity", "NMI", "iterations");
                for row in &rows {
                    println!(
                        "{:>8}  {:>8.4}  {:>8.4}  {:>10}",
                        row.clusters,
                        row.evaluation.purity,
                        row.evaluation.nmi,
                        row.evaluation.iterations
                    );
                }
            }
        }
    }

    Ok(())
}

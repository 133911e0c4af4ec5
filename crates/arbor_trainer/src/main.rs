//! Arbor CLI
//!
//! Trains online decision trees from labeled text, classifies new text with a
//! saved tree, and reports accuracy.

use anyhow::{Context, Result};
use arbor_trainer::{
    load_classifier, save_classifier, train_classifier_from_csv, Dataset, TrainerConfig,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "arbor")]
#[command(author = "Arbor Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Online decision-tree text classifier", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train a tree from a labeled CSV file
    Train {
        /// Training CSV (defaults to the configured train file)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Where to save the tree; printed to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep the file order instead of shuffling
        #[arg(long)]
        no_shuffle: bool,

        /// Seed for the deterministic shuffle
        #[arg(long)]
        seed: Option<i64>,
    },

    /// Print the predicted label of every row of a CSV file
    Classify {
        /// Saved tree
        #[arg(short, long)]
        model: PathBuf,

        /// CSV file to classify
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Report per-label accuracy against a labeled CSV file
    Accuracy {
        /// Saved tree
        #[arg(short, long)]
        model: PathBuf,

        /// Labeled CSV (defaults to the configured test file)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the shape of a saved tree
    Inspect {
        /// Saved tree
        #[arg(short, long)]
        model: PathBuf,

        /// Emit the statistics as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let mut config = match &args.config {
        Some(path) => TrainerConfig::load_from_file(path).context("Failed to load configuration")?,
        None => TrainerConfig::default(),
    };

    match args.command {
        Command::Train {
            data,
            output,
            no_shuffle,
            seed,
        } => {
            if no_shuffle {
                config.training.shuffle = false;
            }
            if let Some(seed) = seed {
                config.training.seed = seed;
            }
            let data = data.unwrap_or_else(|| config.dataset.train_file.clone());

            info!("Arbor trainer v{}", env!("CARGO_PKG_VERSION"));
            info!("Training from: {}", data.display());
            let classifier =
                train_classifier_from_csv(&data, &config).context("Failed to train classifier")?;

            let stats = classifier.stats();
            info!(
                "Training complete: {} leaves, {} branches, depth {}",
                stats.leaves, stats.branches, stats.depth
            );

            match output {
                Some(path) => {
                    save_classifier(&classifier, &path).context("Failed to save tree")?
                }
                None => classifier
                    .save(std::io::stdout().lock())
                    .context("Failed to write tree")?,
            }
        }

        Command::Classify { model, input } => {
            let classifier = load_classifier(&model)
                .with_context(|| format!("Failed to load tree from {}", model.display()))?;
            let dataset = Dataset::from_csv(&input, &config.dataset)
                .context("Failed to load dataset")?;

            let results: Vec<&str> = dataset
                .data()
                .iter()
                .map(|item| classifier.classify(item))
                .collect();
            println!("Results: {:?}", results);
        }

        Command::Accuracy { model, data, json } => {
            let classifier = load_classifier(&model)
                .with_context(|| format!("Failed to load tree from {}", model.display()))?;
            let data = data.unwrap_or_else(|| config.dataset.test_file.clone());
            let dataset =
                Dataset::from_csv(&data, &config.dataset).context("Failed to load dataset")?;

            info!("Measuring accuracy on {} examples", dataset.len());
            let report = classifier
                .calculate_accuracy(dataset.data(), dataset.labels())
                .context("Failed to measure accuracy")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for (label, accuracy) in report.iter() {
                    println!("{}: {}", label, accuracy);
                }
            }
        }

        Command::Inspect { model, json } => {
            let classifier = load_classifier(&model)
                .with_context(|| format!("Failed to load tree from {}", model.display()))?;
            let stats = classifier.stats();

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Leaves: {}", stats.leaves);
                println!("Branches: {}", stats.branches);
                println!("Depth: {}", stats.depth);
            }
        }
    }

    Ok(())
}

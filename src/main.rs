use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use review_bayes::{bayes, dataset, report, Dataset, NaiveBayesClassifier, DEFAULT_SIGMA};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(about = "Trains a two-class word presence classifier and reports its test accuracy.")]
struct Args {
    /// Training data, one `label text...` record per line
    train_file: PathBuf,

    /// Test data in the same format as the training data
    test_file: PathBuf,

    /// Conditional probabilities at or below this floor are ignored as noise
    #[arg(long, default_value_t = DEFAULT_SIGMA)]
    sigma: f64,

    /// Write the predicted label of every test record to this CSV file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn write_predictions(path: &Path, predictions: &[&str]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(["ID", "Label"])?;
    for (i, label) in predictions.iter().enumerate() {
        writer.write_record(&[(i + 1).to_string(), label.to_string()])?;
    }
    writer.flush()?;

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    bayes::check_sigma(args.sigma)?;

    let train_data = Dataset::from_path(&args.train_file)
        .with_context(|| format!("failed to load {}", args.train_file.display()))?;
    let test_data = Dataset::from_path(&args.test_file)
        .with_context(|| format!("failed to load {}", args.test_file.display()))?;
    dataset::check_class_sets(&train_data, &test_data)?;

    let classifier = NaiveBayesClassifier::train(&train_data)?;
    let predictions = classifier.predict(test_data.documents(), args.sigma);

    if let Some(path) = &args.output {
        write_predictions(path, &predictions)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("wrote {} predictions to {}", predictions.len(), path.display());
    }

    match report::accuracy(&predictions, test_data.labels()) {
        Some(accuracy) => println!("Classification accuracy = {:5.2}%", 100.0 * accuracy),
        None => warn!("test data is empty, no accuracy to report"),
    }

    Ok(())
}

//! Two-class text classification from word presence, scored with log likelihood ratios.
//!
//! ```no_run
//! use review_bayes::{classify, Dataset, DEFAULT_SIGMA};
//!
//! let train = Dataset::from_path("train.txt")?;
//! let labels = classify(&train, &["a great stay", "dirty room"], DEFAULT_SIGMA)?;
//! # Ok::<(), review_bayes::ClassifyError>(())
//! ```

pub mod bayes;
pub mod dataset;
pub mod error;
pub mod report;

pub use bayes::{
    classify, classify_datasets, predict, train, ClassOrdering, ClassPriors, FrequencyTable,
    NaiveBayesClassifier, WordProbabilities, DEFAULT_SIGMA,
};
pub use dataset::Dataset;
pub use error::{ClassifyError, Result};

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::collections::{hash_map::Entry, HashMap};
use tracing::{debug, info};

use crate::{
    dataset::{tokenize, Dataset},
    error::{ClassifyError, Result},
};

/// Probability floor used when none is given.
pub const DEFAULT_SIGMA: f64 = 1.0 / 1200.0;

/// Fixed order of class labels shared by every table built from one training set.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassOrdering {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl ClassOrdering {
    pub fn new(labels: Vec<String>) -> Self {
        let index = labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), i))
            .collect();
        ClassOrdering { labels, index }
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// For each word, the number of documents of each class it appears in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrequencyTable {
    counts: HashMap<String, Vec<usize>>,
}

impl FrequencyTable {
    pub fn count(dataset: &Dataset, ordering: &ClassOrdering) -> Self {
        let num_classes = ordering.len();
        let mut counts = HashMap::new();

        for (label, text) in dataset.iter() {
            // Dataset guarantees every label is one of its classes.
            let Some(class) = ordering.index_of(label) else {
                continue;
            };

            // Each distinct word counts once per document:
            for word in tokenize(text) {
                (match counts.entry(word.to_string()) {
                    Entry::Occupied(entry) => entry.into_mut(),
                    Entry::Vacant(entry) => entry.insert(vec![0; num_classes]),
                })[class] += 1;
            }
        }

        FrequencyTable { counts }
    }

    pub fn get(&self, word: &str) -> Option<&[usize]> {
        self.counts.get(word).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.counts.iter().map(|(w, c)| (w.as_str(), c.as_slice()))
    }

    /// Number of distinct words seen.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// For each word, `P(word | class_i)` for every class followed by the global `P(word)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WordProbabilities {
    probs: HashMap<String, Vec<f64>>,
}

impl WordProbabilities {
    pub fn get(&self, word: &str) -> Option<&[f64]> {
        self.probs.get(word).map(Vec::as_slice)
    }

    /// `P(word | class)`, if the word was seen during training.
    pub fn conditional(&self, word: &str, class: usize) -> Option<f64> {
        self.probs.get(word).and_then(|p| p.get(class)).copied()
    }

    /// `P(word)` over the whole training set, if the word was seen.
    pub fn global(&self, word: &str) -> Option<f64> {
        self.probs.get(word).and_then(|p| p.last()).copied()
    }

    pub fn len(&self) -> usize {
        self.probs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }
}

/// `P(class_i)` in class ordering.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassPriors(Vec<f64>);

impl ClassPriors {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Converts frequency counts into conditional, global and prior probabilities.
pub fn posterior_probabilities(
    freq: &FrequencyTable,
    dataset: &Dataset,
    ordering: &ClassOrdering,
) -> Result<(WordProbabilities, ClassPriors)> {
    // Count the samples of each class, refusing classes we can't divide by:
    let total_samples = dataset.len() as f64;
    let class_samples: Vec<f64> = ordering
        .labels()
        .iter()
        .map(|label| match dataset.class_count(label) {
            0 => Err(ClassifyError::DegenerateClass {
                class: label.clone(),
            }),
            n => Ok(n as f64),
        })
        .collect::<Result<_>>()?;

    debug!(?class_samples, total_samples, "class sample counts");

    // P(word|class) for every class, then P(word) over all samples:
    let probs = freq
        .iter()
        .map(|(word, counts)| {
            let mut row: Vec<f64> = counts
                .iter()
                .zip(class_samples.iter())
                .map(|(&count, &samples)| count as f64 / samples)
                .collect();
            row.push(counts.iter().sum::<usize>() as f64 / total_samples);
            (word.to_string(), row)
        })
        .collect();

    // Calculate the class priors:
    let priors = class_samples.iter().map(|n| n / total_samples).collect();

    Ok((WordProbabilities { probs }, ClassPriors(priors)))
}

/// Scores a document against the trained tables and returns the index of the winning class.
///
/// Each class starts at 1.0. A word adds `ln(P(w|c) P(c) / P(w))` to class `c` only when
/// `P(w|c) > sigma`; words never seen in training are skipped. Ties go to the lowest index.
pub fn predict(
    text: &str,
    word_probs: &WordProbabilities,
    priors: &ClassPriors,
    sigma: f64,
) -> usize {
    let priors = priors.as_slice();

    // Every class starts from the same baseline, not a probability:
    let mut distribution = vec![1.0; priors.len()];

    for word in tokenize(text) {
        let Some(probs) = word_probs.get(word) else {
            continue;
        };
        let Some(&global) = probs.last() else {
            continue;
        };

        // Only words above the noise floor count towards a class:
        for (score, (&prob, &prior)) in distribution
            .iter_mut()
            .zip(probs.iter().zip(priors.iter()))
        {
            if prob > sigma {
                *score += ((prob * prior) / global).ln();
            }
        }
    }

    // First class with the highest score wins:
    let (best, _) = distribution.iter().enumerate().fold(
        (0, f64::NEG_INFINITY),
        |(best, best_score), (i, &score)| {
            if score > best_score {
                (i, score)
            } else {
                (best, best_score)
            }
        },
    );

    best
}

#[derive(Debug, Clone)]
pub struct NaiveBayesClassifier {
    ordering: ClassOrdering,
    word_probs: WordProbabilities,
    priors: ClassPriors,
}

impl NaiveBayesClassifier {
    pub fn train(dataset: &Dataset) -> Result<Self> {
        if dataset.classes().is_empty() {
            return Err(ClassifyError::InvalidClassCount { found: 0 });
        }

        let ordering = ClassOrdering::new(dataset.classes().to_vec());
        let freq = FrequencyTable::count(dataset, &ordering);
        debug!(vocabulary = freq.len(), "counted word frequencies");

        let (word_probs, priors) = posterior_probabilities(&freq, dataset, &ordering)?;

        info!(
            documents = dataset.len(),
            vocabulary = word_probs.len(),
            classes = ?ordering.labels(),
            "trained classifier"
        );

        Ok(NaiveBayesClassifier {
            ordering,
            word_probs,
            priors,
        })
    }

    pub fn predict_one(&self, text: &str, sigma: f64) -> usize {
        predict(text, &self.word_probs, &self.priors, sigma)
    }

    /// Predicts labels for every document, in input order.
    pub fn predict<S: AsRef<str> + Sync>(&self, texts: &[S], sigma: f64) -> Vec<&str> {
        texts
            .par_iter()
            .map(|text| self.label(self.predict_one(text.as_ref(), sigma)))
            .collect()
    }

    fn label(&self, index: usize) -> &str {
        &self.ordering.labels()[index]
    }

    pub fn ordering(&self) -> &ClassOrdering {
        &self.ordering
    }

    pub fn word_probs(&self) -> &WordProbabilities {
        &self.word_probs
    }

    pub fn priors(&self) -> &ClassPriors {
        &self.priors
    }
}

/// Trains on `dataset`, returning the probability tables and the class ordering they use.
pub fn train(dataset: &Dataset) -> Result<(WordProbabilities, ClassPriors, ClassOrdering)> {
    let classifier = NaiveBayesClassifier::train(dataset)?;
    Ok((classifier.word_probs, classifier.priors, classifier.ordering))
}

pub fn check_sigma(sigma: f64) -> Result<()> {
    if sigma > 0.0 && sigma < 1.0 {
        Ok(())
    } else {
        Err(ClassifyError::InvalidSigma(sigma))
    }
}

/// Trains on `train_data` and predicts a label for each of `test_documents`.
pub fn classify<S: AsRef<str> + Sync>(
    train_data: &Dataset,
    test_documents: &[S],
    sigma: f64,
) -> Result<Vec<String>> {
    check_sigma(sigma)?;
    let classifier = NaiveBayesClassifier::train(train_data)?;
    Ok(classifier
        .predict(test_documents, sigma)
        .into_iter()
        .map(str::to_string)
        .collect())
}

/// Like [`classify`], but first checks both datasets share the same two classes.
pub fn classify_datasets(
    train_data: &Dataset,
    test_data: &Dataset,
    sigma: f64,
) -> Result<Vec<String>> {
    crate::dataset::check_class_sets(train_data, test_data)?;
    classify(train_data, test_data.documents(), sigma)
}

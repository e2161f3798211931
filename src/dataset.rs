use std::{
    collections::HashSet,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use tracing::debug;

use crate::error::{ClassifyError, Result};

/// Labeled documents read from a `label text...` file.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    documents: Vec<String>,
    labels: Vec<String>,
    classes: Vec<String>,
}

impl Dataset {
    /// Builds a dataset whose classes are the distinct labels in order of first appearance.
    pub fn new(documents: Vec<String>, labels: Vec<String>) -> Result<Self> {
        let mut classes: Vec<String> = Vec::new();
        for label in &labels {
            if !classes.contains(label) {
                classes.push(label.clone());
            }
        }
        Self::with_classes(documents, labels, classes)
    }

    /// Builds a dataset with an explicitly declared class list. Declared classes may have no
    /// documents at all, but every label must be declared.
    pub fn with_classes(
        documents: Vec<String>,
        labels: Vec<String>,
        classes: Vec<String>,
    ) -> Result<Self> {
        if documents.len() != labels.len() {
            return Err(ClassifyError::InvalidDataset(format!(
                "{} documents but {} labels",
                documents.len(),
                labels.len()
            )));
        }

        let declared: HashSet<&str> = classes.iter().map(String::as_str).collect();
        if declared.len() != classes.len() {
            return Err(ClassifyError::InvalidDataset(
                "class list contains duplicates".to_string(),
            ));
        }
        if let Some(label) = labels.iter().find(|l| !declared.contains(l.as_str())) {
            return Err(ClassifyError::InvalidDataset(format!(
                "label {label:?} is not a declared class"
            )));
        }

        Ok(Dataset {
            documents,
            labels,
            classes,
        })
    }

    /// Splits one record into `(label, document)`. The label is the first whitespace-delimited
    /// token and the document is everything after the whitespace that ends it, verbatim.
    pub fn parse_line(line: &str) -> Option<(&str, &str)> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        Some(line.split_once(char::is_whitespace).unwrap_or((line, "")))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut documents = Vec::new();
        let mut labels = Vec::new();

        // Split every record into its label and document:
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let (label, document) =
                Self::parse_line(&line).ok_or_else(|| ClassifyError::MalformedRecord {
                    line: i + 1,
                    reason: "missing label".to_string(),
                })?;
            labels.push(label.to_string());
            documents.push(document.to_string());
        }

        let dataset = Self::new(documents, labels)?;
        debug!(
            records = dataset.len(),
            classes = ?dataset.classes,
            "loaded dataset"
        );
        Ok(dataset)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = File::open(path)?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Iterates over `(label, document)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.documents.iter().map(String::as_str))
    }

    /// Number of documents labeled `class`.
    pub fn class_count(&self, class: &str) -> usize {
        self.labels.iter().filter(|l| *l == class).count()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Distinct whitespace-delimited words of a document.
pub fn tokenize(text: &str) -> HashSet<&str> {
    text.split_whitespace().collect()
}

/// Checks the training and test data agree on exactly two classes.
pub fn check_class_sets(train: &Dataset, test: &Dataset) -> Result<()> {
    // Class order doesn't matter here, only membership:
    let mut train_classes = train.classes().to_vec();
    let mut test_classes = test.classes().to_vec();
    train_classes.sort();
    test_classes.sort();

    if train_classes != test_classes {
        return Err(ClassifyError::ClassSetMismatch {
            train: train_classes,
            test: test_classes,
        });
    }
    if train_classes.len() != 2 {
        return Err(ClassifyError::InvalidClassCount {
            found: train_classes.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(
            Dataset::parse_line("pos  great   food\n"),
            Some(("pos", " great   food"))
        );
        assert_eq!(Dataset::parse_line("neg"), Some(("neg", "")));
        assert_eq!(
            Dataset::parse_line("pos\tgood  movie"),
            Some(("pos", "good  movie"))
        );
        assert_eq!(Dataset::parse_line("   \t"), None);
    }

    #[test]
    fn test_from_reader() {
        let input = "pos good\nneg bad\npos great\nneg terrible\n";
        let dataset = Dataset::from_reader(input.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.classes(), &strings(&["pos", "neg"])[..]);
        assert_eq!(dataset.class_count("pos"), 2);
        assert_eq!(dataset.class_count("neg"), 2);
        assert_eq!(dataset.documents()[2], "great");
    }

    #[test]
    fn test_from_reader_tab_separated() {
        let dataset = Dataset::from_reader("pos\tgood movie\nneg bad\n".as_bytes()).unwrap();

        assert_eq!(dataset.classes(), &strings(&["pos", "neg"])[..]);
        assert_eq!(dataset.documents(), &strings(&["good movie", "bad"])[..]);
    }

    #[test]
    fn test_from_reader_blank_line() {
        let input = "pos good\n\nneg bad\n";
        match Dataset::from_reader(input.as_bytes()) {
            Err(ClassifyError::MalformedRecord { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_length_mismatch() {
        let result = Dataset::new(strings(&["a", "b"]), strings(&["pos"]));
        assert!(matches!(result, Err(ClassifyError::InvalidDataset(_))));
    }

    #[test]
    fn test_undeclared_label() {
        let result = Dataset::with_classes(
            strings(&["a", "b"]),
            strings(&["pos", "meh"]),
            strings(&["pos", "neg"]),
        );
        assert!(matches!(result, Err(ClassifyError::InvalidDataset(_))));
    }

    #[test]
    fn test_tokenize() {
        let words = tokenize("the cat  saw the\tdog");
        assert_eq!(words.len(), 4);
        assert!(words.contains("the"));
        assert!(words.contains("dog"));
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_check_class_sets() {
        let train = Dataset::new(strings(&["a", "b"]), strings(&["pos", "neg"])).unwrap();
        let test = Dataset::new(strings(&["c", "d"]), strings(&["neg", "pos"])).unwrap();
        assert!(check_class_sets(&train, &test).is_ok());

        let other = Dataset::new(strings(&["c", "d"]), strings(&["neg", "meh"])).unwrap();
        assert!(matches!(
            check_class_sets(&train, &other),
            Err(ClassifyError::ClassSetMismatch { .. })
        ));

        let three = Dataset::new(strings(&["a", "b", "c"]), strings(&["x", "y", "z"])).unwrap();
        assert!(matches!(
            check_class_sets(&three, &three),
            Err(ClassifyError::InvalidClassCount { found: 3 })
        ));
    }
}

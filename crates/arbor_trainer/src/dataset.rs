//! CSV dataset loading
//!
//! Reads labeled text records (for example `Category,Message` email dumps),
//! vectorizes the text column, and optionally shuffles the records with a
//! seeded, platform-independent shuffle.

use std::collections::BTreeMap;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::config::DatasetConfig;
use crate::deterministic::shuffle_in_place;
use crate::errors::TrainerError;
use crate::text::TextBlock;

/// Labeled text examples in file order (or shuffled order)
#[derive(Clone, Debug)]
pub struct Dataset {
    data: Vec<TextBlock>,
    labels: Vec<String>,
}

impl Dataset {
    /// Load a dataset from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P, config: &DatasetConfig) -> Result<Self, TrainerError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|err| {
            TrainerError::Dataset(format!("Failed to open {}: {}", path.display(), err))
        })?;
        Self::from_reader(file, config)
    }

    /// Load a dataset from any CSV source
    pub fn from_reader<R: std::io::Read>(
        reader: R,
        config: &DatasetConfig,
    ) -> Result<Self, TrainerError> {
        let delimiter = u8::try_from(config.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                TrainerError::Dataset(format!(
                    "delimiter must be a single ASCII character, got '{}'",
                    config.delimiter
                ))
            })?;

        let mut csv_reader = ReaderBuilder::new()
            .has_headers(config.has_header)
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(reader);

        let needed = config.label_column.max(config.content_column) + 1;
        let mut data = Vec::new();
        let mut labels = Vec::new();

        for (row_idx, record) in csv_reader.records().enumerate() {
            let record = record
                .map_err(|err| TrainerError::Dataset(format!("Row {}: {}", row_idx + 1, err)))?;

            if record.len() == 1 && record.get(0).is_some_and(|field| field.trim().is_empty()) {
                continue;
            }
            if record.len() < needed {
                return Err(TrainerError::Dataset(format!(
                    "Row {}: expected at least {} columns, got {}",
                    row_idx + 1,
                    needed,
                    record.len()
                )));
            }

            let label = record.get(config.label_column).unwrap_or_default().trim();
            let content = record.get(config.content_column).unwrap_or_default();

            labels.push(label.to_string());
            data.push(TextBlock::new(content));
        }

        if data.is_empty() {
            return Err(TrainerError::Dataset("Dataset is empty".to_string()));
        }

        debug!("Read {} labeled rows", data.len());
        Ok(Self { data, labels })
    }

    /// Deterministically shuffle the dataset using seed
    pub fn shuffle(&mut self, seed: i64) {
        let mut pairs: Vec<(TextBlock, String)> = self
            .data
            .drain(..)
            .zip(self.labels.drain(..))
            .collect();
        shuffle_in_place(&mut pairs, seed);

        let (data, labels): (Vec<TextBlock>, Vec<String>) = pairs.into_iter().unzip();
        self.data = data;
        self.labels = labels;
    }

    pub fn data(&self) -> &[TextBlock] {
        &self.data
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Split into owned vectors and labels
    pub fn into_parts(self) -> (Vec<TextBlock>, Vec<String>) {
        (self.data, self.labels)
    }

    /// Get number of samples
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if dataset is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of examples per label
    pub fn label_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for label in &self.labels {
            *counts.entry(label.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::FeatureVector;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const EMAILS: &str = "\
Category,Message
spam,\"Free money, claim now\"
ham,hi mom
spam,win a prize
ham,\"lunch at noon, ok?\"
";

    fn create_test_csv() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{EMAILS}").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_csv() {
        let file = create_test_csv();
        let dataset = Dataset::from_csv(file.path(), &DatasetConfig::default()).unwrap();

        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.labels()[0], "spam");
        assert_eq!(dataset.data()[0].get("money"), 0.25);
        assert_eq!(dataset.data()[3].get("noon"), 0.25);
        assert_eq!(dataset.label_counts().get("ham"), Some(&2));
    }

    #[test]
    fn test_swapped_columns_without_header() {
        let config = DatasetConfig {
            label_column: 1,
            content_column: 0,
            has_header: false,
            ..DatasetConfig::default()
        };
        let dataset = Dataset::from_reader("hello there,ham\n".as_bytes(), &config).unwrap();
        assert_eq!(dataset.labels().to_vec(), vec!["ham".to_string()]);
        assert_eq!(dataset.data()[0].get("hello"), 0.5);
    }

    #[test]
    fn test_short_row_is_rejected() {
        let err = Dataset::from_reader(
            "Category,Message\nspam\n".as_bytes(),
            &DatasetConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TrainerError::Dataset(_)));
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        let err = Dataset::from_reader("Category,Message\n".as_bytes(), &DatasetConfig::default())
            .unwrap_err();
        assert!(matches!(err, TrainerError::Dataset(_)));
    }

    #[test]
    fn test_non_ascii_delimiter_is_rejected() {
        let config = DatasetConfig {
            delimiter: 'é',
            ..DatasetConfig::default()
        };
        let err = Dataset::from_reader("CategoryéMessage\nhaméhi\n".as_bytes(), &config)
            .unwrap_err();
        assert!(matches!(err, TrainerError::Dataset(_)));
    }

    #[test]
    fn test_semicolon_delimiter() {
        let config = DatasetConfig {
            delimiter: ';',
            ..DatasetConfig::default()
        };
        let dataset =
            Dataset::from_reader("Category;Message\nham;hi, mom\n".as_bytes(), &config).unwrap();
        assert_eq!(dataset.labels().to_vec(), vec!["ham".to_string()]);
        assert_eq!(dataset.data()[0].get("mom"), 0.5);
    }

    #[test]
    fn test_missing_file() {
        let err = Dataset::from_csv("/nonexistent/emails.csv", &DatasetConfig::default())
            .unwrap_err();
        assert!(matches!(err, TrainerError::Dataset(_)));
    }

    #[test]
    fn test_shuffle_keeps_pairs_together() {
        let file = create_test_csv();
        let original = Dataset::from_csv(file.path(), &DatasetConfig::default()).unwrap();
        let mut shuffled = original.clone();
        shuffled.shuffle(42);

        assert_eq!(shuffled.len(), original.len());
        for (block, label) in shuffled.data().iter().zip(shuffled.labels()) {
            let idx = original
                .data()
                .iter()
                .position(|candidate| candidate == block)
                .unwrap();
            assert_eq!(&original.labels()[idx], label);
        }
    }

    #[test]
    fn test_shuffle_determinism() {
        let file = create_test_csv();
        let mut ds1 = Dataset::from_csv(file.path(), &DatasetConfig::default()).unwrap();
        let mut ds2 = ds1.clone();

        ds1.shuffle(42);
        ds2.shuffle(42);

        assert_eq!(ds1.labels(), ds2.labels());
        assert_eq!(ds1.data(), ds2.data());
    }
}

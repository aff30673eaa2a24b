//! Word Dictionary
//!
//! Case-insensitive membership test over a word list loaded once at startup.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

/// Dictionary loading errors.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// The word list could not be read.
    #[error("failed to read word list {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Immutable set of accepted words, stored lower-cased.
#[derive(Clone, Debug, Default)]
pub struct Dictionary {
    words: HashSet<String>,
}

impl Dictionary {
    /// Load a word list file, one word per line.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let io_err = |source: io::Error| DictionaryError::Io { path: path.to_path_buf(), source };

        let file = File::open(path).map_err(io_err)?;
        let dictionary = Self::from_reader(BufReader::new(file)).map_err(io_err)?;

        info!("Loaded {} words from {}", dictionary.len(), path.display());
        Ok(dictionary)
    }

    /// Read a word list from any buffered reader. Blank lines are skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut words = HashSet::new();
        for line in reader.lines() {
            let line = line?;
            let word = line.trim();
            if !word.is_empty() {
                words.insert(word.to_lowercase());
            }
        }
        Ok(Self { words })
    }

    /// Build from an in-memory list.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Check membership, ignoring case.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True if no words were loaded.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn test_case_insensitive_lookup() {
        let dict = Dictionary::from_words(["Cat", "dog"]);
        assert!(dict.contains("cat"));
        assert!(dict.contains("CAT"));
        assert!(dict.contains("Dog"));
        assert!(!dict.contains("bird"));
    }

    #[test]
    fn test_reader_trims_and_skips_blanks() {
        let input = "apple\r\n  Banana \n\n\ncherry\n";
        let dict = Dictionary::from_reader(Cursor::new(input)).unwrap();
        assert_eq!(dict.len(), 3);
        assert!(dict.contains("BANANA"));
        assert!(dict.contains("apple"));
        assert!(!dict.contains(""));
    }

    #[test]
    fn test_duplicates_collapse() {
        let dict = Dictionary::from_words(["word", "WORD", " Word "]);
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("word-grid-{}.txt", uuid::Uuid::new_v4()));
        {
            let mut file = File::create(&path).unwrap();
            writeln!(file, "quit").unwrap();
            writeln!(file, "tea").unwrap();
        }

        let dict = Dictionary::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(dict.len(), 2);
        assert!(dict.contains("QUIT"));
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("word-grid-does-not-exist.txt");
        let err = Dictionary::load(&path).unwrap_err();
        assert!(matches!(err, DictionaryError::Io { .. }));
        assert!(err.to_string().contains("word-grid-does-not-exist.txt"));
    }

    #[test]
    fn test_empty_dictionary() {
        let dict = Dictionary::default();
        assert!(dict.is_empty());
        assert!(!dict.contains("anything"));
    }
}

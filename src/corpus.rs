use crate::error::{ReportError, RpResult};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Bigram -> frequency percentage, loaded once per invocation.
pub type FrequencyTable = HashMap<String, f64>;

const BIGRAM_FILE: &str = "2-grams.txt";

/// Names of the corpus subdirectories under the ngrams root, sorted.
pub fn available_corpora(ngrams_dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = match fs::read_dir(ngrams_dir) {
        Ok(entries) => entries
            .flatten()
            .filter(|e| e.path().is_dir())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}

/// Checks that the named corpus directory exists before any processing starts.
pub fn validate_corpus(ngrams_dir: &Path, name: &str) -> RpResult<()> {
    if ngrams_dir.join(name).is_dir() {
        return Ok(());
    }

    let known = available_corpora(ngrams_dir);
    let available = if known.is_empty() {
        String::new()
    } else {
        format!(" Available: {}", known.join(", "))
    };
    Err(ReportError::InvalidArgument(format!(
        "Corpus '{}' not found.{}",
        name, available
    )))
}

/// Loads the bigram frequency table from `<ngrams_dir>/<name>/2-grams.txt`.
///
/// Lines are `<frequency> <bigram> [ignored...]`. A line enters the table only
/// if its second token is exactly two alphabetic characters; duplicate bigrams
/// resolve by line order (last wins).
pub fn load_bigram_frequencies(ngrams_dir: &Path, name: &str) -> RpResult<FrequencyTable> {
    let path = ngrams_dir.join(name).join(BIGRAM_FILE);
    let content = fs::read_to_string(&path)?;

    let mut frequencies = FrequencyTable::new();
    for line in content.lines() {
        let mut parts = line.split_whitespace();
        let (Some(freq_token), Some(bigram)) = (parts.next(), parts.next()) else {
            continue;
        };
        if bigram.chars().count() != 2 || !bigram.chars().all(char::is_alphabetic) {
            continue;
        }
        if let Ok(freq) = freq_token.parse::<f64>() {
            frequencies.insert(bigram.to_string(), freq);
        }
    }

    debug!(
        "Loaded {} bigram frequencies from corpus '{}'",
        frequencies.len(),
        name
    );
    Ok(frequencies)
}

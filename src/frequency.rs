use std::collections::{BTreeMap, HashSet};

use tracing::info;

use crate::config::Normalization;
use crate::error::{Error, Result};

pub type StopwordSet = HashSet<String>;
pub type RawWordCounts = BTreeMap<String, u64>;

/// Word weights ready for the renderer, plus the total they were divided by.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedWords {
    pub weights: BTreeMap<String, f64>,
    /// Wide enough that summing any number of `u64` counts cannot overflow.
    pub total: u128,
}

impl WeightedWords {
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn get(&self, word: &str) -> Option<f64> {
        self.weights.get(word).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(word, weight)| (word.as_str(), *weight))
    }
}

/// Drops stopwords and divides every remaining count by the total selected by
/// `normalization`.
pub fn prepare_frequencies(
    raw_counts: &RawWordCounts,
    stopwords: &StopwordSet,
    normalization: Normalization,
) -> Result<WeightedWords> {
    let total: u128 = match normalization {
        Normalization::Global => raw_counts.values().map(|&count| count as u128).sum(),
        Normalization::Filtered => raw_counts
            .iter()
            .filter(|(word, _)| !stopwords.contains(word.as_str()))
            .map(|(_, &count)| count as u128)
            .sum(),
    };

    if total == 0 {
        return Err(Error::Division);
    }

    let weights = raw_counts
        .iter()
        .filter(|(word, _)| !stopwords.contains(word.as_str()))
        .map(|(word, &count)| (word.clone(), count as f64 / total as f64))
        .collect();

    Ok(WeightedWords { weights, total })
}

pub fn weight_line(word: &str, count: u64, total: u128, weight: f64) -> String {
    format!("Word {word} represents {count} of the {total} words, giving it a weight of {weight:.8}")
}

/// One `info` event per kept word, emitted once all weights are known.
pub fn report_weights(raw_counts: &RawWordCounts, weighted: &WeightedWords) {
    for (word, weight) in weighted.iter() {
        let count = raw_counts.get(word).copied().unwrap_or_default();
        info!(
            word,
            count,
            total = %weighted.total,
            weight = %format!("{weight:.8}"),
            "{}",
            weight_line(word, count, weighted.total, weight)
        );
    }
}

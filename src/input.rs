use std::{collections::BTreeMap, fs, path::Path};

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::frequency::{RawWordCounts, StopwordSet};
use crate::tokenizer::Tokenizer;

fn read_optional(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    fs::read_to_string(path)
        .map(Some)
        .map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// One token per line. A missing file is an empty set.
pub fn load_stopwords(path: &Path) -> Result<StopwordSet> {
    let Some(contents) = read_optional(path)? else {
        info!(path = %path.display(), "no stopword file, nothing will be filtered");
        return Ok(StopwordSet::new());
    };

    let stopwords: StopwordSet = contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();

    info!(path = %path.display(), count = stopwords.len(), "loaded stopwords");
    Ok(stopwords)
}

/// A JSON object of word to count. A missing file is an empty map.
pub fn load_word_counts(path: &Path) -> Result<RawWordCounts> {
    let Some(contents) = read_optional(path)? else {
        info!(path = %path.display(), "no word-count file, starting from no words");
        return Ok(RawWordCounts::new());
    };

    let parsed: BTreeMap<String, u64> =
        serde_json::from_str(&contents).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let mut counts = RawWordCounts::new();
    for (word, count) in parsed {
        if word.is_empty() {
            warn!(path = %path.display(), count, "skipping empty word");
            continue;
        }
        counts.insert(word, count);
    }

    info!(path = %path.display(), words = counts.len(), "loaded word counts");
    Ok(counts)
}

/// Counts the words of a free-text file. A missing file is an empty map.
pub fn load_text_counts(path: &Path, tokenizer: &Tokenizer) -> Result<RawWordCounts> {
    let Some(contents) = read_optional(path)? else {
        info!(path = %path.display(), "no text file, starting from no words");
        return Ok(RawWordCounts::new());
    };

    let counts = tokenizer.get_word_frequencies(&contents);
    info!(path = %path.display(), words = counts.len(), "counted words in text");
    Ok(counts)
}

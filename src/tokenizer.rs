use std::collections::HashMap;

use jieba_rs::Jieba;
use regex::Regex;

use crate::frequency::RawWordCounts;

/// Splits free text into words. Latin runs come from the regex, CJK runs are
/// segmented by jieba.
pub struct Tokenizer {
    //分词正则
    regex: Regex,
    pub jieba: Jieba,
    pub min_word_length: usize,
    pub exclude_numbers: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        let regex = Regex::new("\\w[\\w']*").expect("Unable to compile tokenization regex");

        Tokenizer {
            regex,
            jieba: Jieba::new(),
            min_word_length: 0,
            exclude_numbers: true,
        }
    }
}

impl<'a> Tokenizer {
    pub fn with_word(mut self, word: &str) -> Self {
        self.jieba.add_word(word, None, None);
        self
    }

    pub fn with_min_word_length(mut self, size: usize) -> Self {
        self.min_word_length = size;
        self
    }

    pub fn with_exclude_numbers(mut self, value: bool) -> Self {
        self.exclude_numbers = value;
        self
    }

    fn tokenize(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> {
        let mut iter: Box<dyn Iterator<Item = &'a str> + 'a> = Box::new(
            self.regex
                .find_iter(text)
                .map(|mat| mat.as_str())
                .flat_map(move |str| self.jieba.cut(str, false))
                .filter(|str| str.chars().any(char::is_alphanumeric)),
        );

        if self.min_word_length > 0 {
            iter = Box::new(iter.filter(move |str| str.chars().count() >= self.min_word_length));
        }

        if self.exclude_numbers {
            iter = Box::new(iter.filter(|word| !word.chars().all(char::is_numeric)));
        }

        iter
    }

    /// Counts every token, folding case variants of a word into its most
    /// frequent spelling.
    pub fn get_word_frequencies(&'a self, text: &'a str) -> RawWordCounts {
        let mut frequencies = HashMap::new();

        for word in self.tokenize(text) {
            *frequencies.entry(word).or_insert(0) += 1;
        }

        Self::keep_common_case(&frequencies)
    }

    fn keep_common_case(map: &HashMap<&'a str, u64>) -> RawWordCounts {
        let mut common_cases = HashMap::<String, Vec<(&str, u64)>>::new();
        for (key, val) in map {
            common_cases
                .entry(key.to_lowercase())
                .or_default()
                .push((*key, *val));
        }

        common_cases
            .into_values()
            .filter_map(|mut cases| {
                // most frequent first, lowercase spelling wins a tie
                cases.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(a.0)));

                let occurrence_sum: u64 = cases.iter().map(|(_, count)| count).sum();
                cases
                    .first()
                    .map(|(word, _)| (word.to_string(), occurrence_sum))
            })
            .collect()
    }
}

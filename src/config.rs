use std::path::PathBuf;

use image::Rgba;

use crate::error::{Error, Result};

pub const WORD_FILE: &str = "input/words.json";
pub const STOP_FILE: &str = "input/stopwords.txt";
pub const MASK_FILE: &str = "img/zoid_mask2_trans.png";
pub const COLOR_FILE: &str = "img/zoid_big2_trans.png";
pub const OUT_FILE: &str = "wordcloud_output.png";
pub const DEFAULT_RESOLUTION: (u32, u32) = (1600, 1600);
pub const DEFAULT_BACKGROUND: &str = "black";

/// Which total the raw counts are divided by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Normalization {
    /// Divide by the sum of every count, stopwords included. Kept weights may
    /// sum to less than 1.
    #[default]
    Global,
    /// Divide by the sum of the counts that survive stopword filtering.
    Filtered,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderSettings {
    pub min_font_size: u32,
    pub max_font_size: u32,
    pub font_step: u32,
    pub word_margin: u32,
    pub word_rotate_chance: f64,
    pub relative_font_scaling: f64,
    pub max_words: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            min_font_size: 2,
            max_font_size: 80,
            font_step: 1,
            word_margin: 2,
            word_rotate_chance: 0.10,
            relative_font_scaling: 0.5,
            max_words: 1000,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub word_file: PathBuf,
    pub stop_file: PathBuf,
    /// Free text to count words from instead of reading `word_file`.
    pub text_file: Option<PathBuf>,
    pub mask_file: PathBuf,
    pub color_file: PathBuf,
    /// `None` draws with the bundled DejaVu Sans.
    pub font_file: Option<PathBuf>,
    pub out_file: PathBuf,
    pub width: u32,
    pub height: u32,
    pub normalization: Normalization,
    pub background_color: Rgba<u8>,
    pub rng_seed: Option<u64>,
    pub render: RenderSettings,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            word_file: WORD_FILE.into(),
            stop_file: STOP_FILE.into(),
            text_file: None,
            mask_file: MASK_FILE.into(),
            color_file: COLOR_FILE.into(),
            font_file: None,
            out_file: OUT_FILE.into(),
            width: DEFAULT_RESOLUTION.0,
            height: DEFAULT_RESOLUTION.1,
            normalization: Normalization::default(),
            background_color: Rgba([0, 0, 0, 255]),
            rng_seed: None,
            render: RenderSettings::default(),
        }
    }
}

/// Parses any CSS color string (`black`, `#ff8800`, `rgb(1, 2, 3)`, ...).
pub fn parse_color(value: &str) -> Result<Rgba<u8>> {
    let color = csscolorparser::parse(value).map_err(|_| Error::Color(value.to_string()))?;
    Ok(Rgba(color.to_rgba8()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = Config::default();
        assert_eq!(config.word_file, PathBuf::from(WORD_FILE));
        assert_eq!(config.stop_file, PathBuf::from(STOP_FILE));
        assert_eq!((config.width, config.height), DEFAULT_RESOLUTION);
        assert_eq!(config.normalization, Normalization::Global);
        assert!(config.font_file.is_none());
        assert_eq!(config.render.max_font_size, 80);
        assert_eq!(config.render.min_font_size, 2);
        assert_eq!(config.render.max_words, 1000);
    }

    #[test]
    fn parses_css_colors() {
        assert_eq!(parse_color("black").unwrap(), Rgba([0, 0, 0, 255]));
        assert_eq!(parse_color("#ff8800").unwrap(), Rgba([255, 136, 0, 255]));
        assert!(matches!(parse_color("not-a-color"), Err(Error::Color(_))));
    }
}

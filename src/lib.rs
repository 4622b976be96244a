use std::{fs, path::Path};

use ab_glyph::FontVec;
use image::{GrayImage, Rgba, RgbaImage};
use nanorand::WyRand;
use tracing::info;

pub use color::{random_color_rgba, ImageColors};
pub use config::{Config, Normalization, RenderSettings};
pub use error::{Error, Result};
pub use frequency::{prepare_frequencies, RawWordCounts, StopwordSet, WeightedWords};
pub use sat::Point;
pub use tokenizer::Tokenizer;

pub mod color;
pub mod config;
mod error;
pub mod frequency;
pub mod input;
mod layout;
pub mod mask;
pub mod pipeline;
pub mod sat;
mod text;
mod tokenizer;

pub struct Word {
    pub text: String,
    pub font_size: u32,
    /// Glyph coverage, already rotated when `rotated` is set.
    pub bitmap: GrayImage,
    pub rotated: bool,
    pub position: Point,
}

pub enum WordCloudSize {
    FromDimensions { width: u32, height: u32 },
    /// Non-zero pixels are off-limits; the canvas takes the mask's size.
    FromMask(GrayImage),
}

pub struct WordCloud {
    tokenizer: Tokenizer,
    stopwords: StopwordSet,
    background_color: Rgba<u8>,
    pub font: FontVec,
    settings: RenderSettings,
    rng_seed: Option<u64>,
}

impl Default for WordCloud {
    fn default() -> Self {
        let font = FontVec::try_from_vec(include_bytes!("../fonts/DejaVuSans.ttf").to_vec())
            .expect("Bundled font is valid");

        WordCloud::new(font)
    }
}

impl WordCloud {
    pub fn new(font: FontVec) -> Self {
        WordCloud {
            tokenizer: Tokenizer::default(),
            stopwords: StopwordSet::new(),
            background_color: Rgba([0, 0, 0, 255]),
            font,
            settings: RenderSettings::default(),
            rng_seed: None,
        }
    }

    pub fn from_font_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let font_file = fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let font = FontVec::try_from_vec(font_file).map_err(|_| Error::Font(path.to_path_buf()))?;

        Ok(WordCloud::new(font))
    }

    pub fn with_tokenizer(mut self, value: Tokenizer) -> Self {
        self.tokenizer = value;
        self
    }

    /// Words in this set are never drawn, even if they carry a weight.
    pub fn with_stopwords(mut self, value: StopwordSet) -> Self {
        self.stopwords = value;
        self
    }

    pub fn with_background_color(mut self, value: Rgba<u8>) -> Self {
        self.background_color = value;
        self
    }

    pub fn with_settings(mut self, value: RenderSettings) -> Self {
        self.settings = value;
        self
    }

    pub fn with_rng_seed(mut self, value: Option<u64>) -> Self {
        self.rng_seed = value;
        self
    }

    fn generate_from_word_positions(
        rng: &mut WyRand,
        width: u32,
        height: u32,
        word_positions: &[Word],
        background_color: Rgba<u8>,
        mut color_func: impl FnMut(&Word, &mut WyRand) -> Rgba<u8>,
    ) -> RgbaImage {
        let mut final_image_buffer = RgbaImage::from_pixel(width, height, background_color);

        for word in word_positions {
            let col = color_func(word, rng);

            text::draw_bitmap_to_rgba_buffer(
                &mut final_image_buffer,
                &word.bitmap,
                word.position.x,
                word.position.y,
                col,
            )
        }

        final_image_buffer
    }

    pub fn generate_from_text(&self, text: &str, size: WordCloudSize) -> Result<RgbaImage> {
        let counts = self.tokenizer.get_word_frequencies(text);
        let weighted = prepare_frequencies(&counts, &self.stopwords, Normalization::Filtered)?;

        self.generate_from_frequencies(&weighted, size)
    }

    pub fn generate_from_frequencies(
        &self,
        weighted: &WeightedWords,
        size: WordCloudSize,
    ) -> Result<RgbaImage> {
        self.generate_from_frequencies_with_color_func(weighted, size, random_color_rgba)
    }

    pub fn generate_from_frequencies_with_color_func(
        &self,
        weighted: &WeightedWords,
        size: WordCloudSize,
        color_func: impl FnMut(&Word, &mut WyRand) -> Rgba<u8>,
    ) -> Result<RgbaImage> {
        let mut words: Vec<(&str, f64)> = weighted
            .iter()
            .filter(|(word, weight)| *weight > 0.0 && !self.stopwords.contains(*word))
            .collect();

        words.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        if self.settings.max_words > 0 {
            words.truncate(self.settings.max_words);
        }

        let max_freq = match words.first() {
            Some(&(_, weight)) => weight,
            None => return Err(Error::EmptyCloud),
        };
        for word in words.iter_mut() {
            word.1 /= max_freq;
        }

        let mut occupancy = match size {
            WordCloudSize::FromDimensions { width, height } => sat::OccupancyMap::new(width, height),
            WordCloudSize::FromMask(mask) => sat::OccupancyMap::from_grid(mask),
        };
        let (width, height) = (occupancy.width(), occupancy.height());

        let mut rng = match self.rng_seed {
            Some(seed) => WyRand::new_seed(seed),
            None => WyRand::new(),
        };

        let final_words = layout::layout_words(
            &words,
            &mut occupancy,
            &self.settings,
            &mut rng,
            |word, font_size, rotated| text::render_word(word, &self.font, font_size, rotated),
        );
        info!(placed = final_words.len(), candidates = words.len(), "layout finished");

        Ok(WordCloud::generate_from_word_positions(
            &mut rng,
            width,
            height,
            &final_words,
            self.background_color,
            color_func,
        ))
    }
}

#[cfg(test)]
mod tests {
    use image::Luma;

    use super::*;

    fn weights(entries: &[(&str, f64)]) -> WeightedWords {
        WeightedWords {
            weights: entries.iter().map(|(w, f)| (w.to_string(), *f)).collect(),
            total: 1,
        }
    }

    #[test]
    fn missing_font_is_file_not_found() {
        let result = WordCloud::from_font_path(Path::new("definitely/missing/font.ttf"));
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[test]
    fn nothing_to_draw_is_empty_cloud() {
        let wordcloud =
            WordCloud::default().with_stopwords(["the".to_string()].into_iter().collect());
        let size = WordCloudSize::FromDimensions { width: 32, height: 32 };

        let result =
            wordcloud.generate_from_frequencies(&weights(&[("the", 0.5), ("zero", 0.0)]), size);
        assert!(matches!(result, Err(Error::EmptyCloud)));
    }

    #[test]
    fn renders_from_plain_text() {
        let size = WordCloudSize::FromDimensions { width: 120, height: 60 };

        let image = WordCloud::default()
            .with_rng_seed(Some(3))
            .generate_from_text("cloud cloud cloud words words text", size)
            .unwrap();

        assert_eq!(image.dimensions(), (120, 60));
        assert!(image.pixels().any(|px| *px != Rgba([0, 0, 0, 255])));
    }

    #[test]
    fn renders_inside_the_mask_only() {
        let wordcloud = WordCloud::default()
            .with_rng_seed(Some(17))
            .with_settings(RenderSettings {
                max_font_size: 24,
                ..RenderSettings::default()
            });
        // right half is off-limits
        let mask = GrayImage::from_fn(160, 80, |x, _| Luma([u8::from(x >= 80)]));
        let red = Rgba([255, 0, 0, 255]);

        let image = wordcloud
            .generate_from_frequencies_with_color_func(
                &weights(&[("rust", 0.6), ("cloud", 0.3), ("words", 0.1)]),
                WordCloudSize::FromMask(mask),
                |_, _| red,
            )
            .unwrap();

        assert_eq!(image.dimensions(), (160, 80));
        assert!(image.enumerate_pixels().any(|(_, _, px)| px.0[0] > 0));
        assert!(image
            .enumerate_pixels()
            .filter(|(x, _, _)| *x >= 80)
            .all(|(_, _, px)| *px == Rgba([0, 0, 0, 255])));
    }
}

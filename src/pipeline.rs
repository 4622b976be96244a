//! One render, start to finish: word lists, weights, images, layout, output.

use std::{path::Path, time::Instant};

use image::{DynamicImage, RgbaImage};
use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::frequency::{prepare_frequencies, report_weights, RawWordCounts};
use crate::{input, mask, ImageColors, Tokenizer, WordCloud, WordCloudSize};

fn load_counts(config: &Config) -> Result<RawWordCounts> {
    match &config.text_file {
        Some(path) => input::load_text_counts(path, &Tokenizer::default()),
        None => input::load_word_counts(&config.word_file),
    }
}

/// Writes the image without alpha; the format follows the file extension.
pub fn save_image(image: RgbaImage, path: &Path) -> Result<()> {
    DynamicImage::ImageRgba8(image)
        .to_rgb8()
        .save(path)
        .map_err(|source| Error::Image {
            path: path.to_path_buf(),
            source,
        })
}

pub fn run(config: &Config) -> Result<()> {
    let stopwords = input::load_stopwords(&config.stop_file)?;
    let counts = load_counts(config)?;

    let weighted = prepare_frequencies(&counts, &stopwords, config.normalization)?;
    report_weights(&counts, &weighted);

    let mask = mask::load_mask(&config.mask_file, config.width, config.height)?;
    let color_image = mask::load_image(&config.color_file)?;
    let colors = ImageColors::new(&color_image, config.width, config.height);

    let wordcloud = match &config.font_file {
        Some(path) => WordCloud::from_font_path(path)?,
        None => WordCloud::default(),
    };
    let wordcloud = wordcloud
        .with_stopwords(stopwords)
        .with_background_color(config.background_color)
        .with_settings(config.render.clone())
        .with_rng_seed(config.rng_seed);

    let now = Instant::now();
    let image = wordcloud.generate_from_frequencies_with_color_func(
        &weighted,
        WordCloudSize::FromMask(mask),
        |word, _| colors.color_for(word),
    )?;
    info!(elapsed_ms = now.elapsed().as_millis() as u64, "generated word cloud");

    save_image(image, &config.out_file)?;
    info!(path = %config.out_file.display(), "saved word cloud");

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use image::{GrayImage, Luma, Rgba};
    use tempfile::TempDir;

    use super::*;

    fn config_in(dir: &TempDir) -> Config {
        Config {
            word_file: dir.path().join("words.json"),
            stop_file: dir.path().join("stopwords.txt"),
            mask_file: dir.path().join("mask.png"),
            color_file: dir.path().join("colors.png"),
            out_file: dir.path().join("out.png"),
            width: 16,
            height: 16,
            ..Config::default()
        }
    }

    fn write_images(config: &Config) {
        GrayImage::from_pixel(config.width, config.height, Luma([0]))
            .save(&config.mask_file)
            .unwrap();
        RgbaImage::from_pixel(config.width, config.height, Rgba([10, 20, 30, 255]))
            .save(&config.color_file)
            .unwrap();
    }

    #[test]
    fn missing_word_counts_fail_with_division() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        assert!(matches!(run(&config), Err(Error::Division)));
    }

    #[test]
    fn malformed_word_counts_abort_the_run() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        fs::write(&config.word_file, "{ nope").unwrap();

        assert!(matches!(run(&config), Err(Error::Parse { .. })));
        assert!(!config.out_file.exists());
    }

    #[test]
    fn missing_mask_is_file_not_found() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        fs::write(&config.word_file, r#"{"a": 3, "b": 1, "the": 6}"#).unwrap();
        fs::write(&config.stop_file, "the\n").unwrap();

        match run(&config) {
            Err(Error::FileNotFound(path)) => assert_eq!(path, config.mask_file),
            other => panic!("unexpected result {other:?}"),
        }
        assert!(!config.out_file.exists());
    }

    #[test]
    fn missing_color_image_is_file_not_found() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        fs::write(&config.word_file, r#"{"a": 3}"#).unwrap();
        GrayImage::from_pixel(16, 16, Luma([0]))
            .save(&config.mask_file)
            .unwrap();

        match run(&config) {
            Err(Error::FileNotFound(path)) => assert_eq!(path, config.color_file),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn invalid_font_is_font_error() {
        let dir = TempDir::new().unwrap();
        let font_file = dir.path().join("font.ttf");
        let config = Config {
            font_file: Some(font_file.clone()),
            ..config_in(&dir)
        };
        fs::write(&config.word_file, r#"{"a": 3}"#).unwrap();
        write_images(&config);
        fs::write(&font_file, b"not a font").unwrap();

        assert!(matches!(run(&config), Err(Error::Font(_))));
    }

    #[test]
    fn missing_font_file_is_file_not_found() {
        let dir = TempDir::new().unwrap();
        let font_file = dir.path().join("absent.ttf");
        let config = Config {
            font_file: Some(font_file.clone()),
            ..config_in(&dir)
        };
        fs::write(&config.word_file, r#"{"a": 3}"#).unwrap();
        write_images(&config);

        match run(&config) {
            Err(Error::FileNotFound(path)) => assert_eq!(path, font_file),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn renders_with_bundled_font_and_reference_colors() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            width: 64,
            height: 64,
            rng_seed: Some(21),
            ..config_in(&dir)
        };
        fs::write(&config.word_file, r#"{"a": 3, "b": 1, "the": 6}"#).unwrap();
        fs::write(&config.stop_file, "the\n").unwrap();
        write_images(&config);

        run(&config).unwrap();

        let output = image::open(&config.out_file).unwrap().to_rgb8();
        assert_eq!(output.dimensions(), (64, 64));
        // glyphs blend the reference color over the black background
        assert!(output.pixels().any(|px| px.0 == [10, 20, 30]));
        assert!(output
            .pixels()
            .all(|px| px.0[0] <= 10 && px.0[1] <= 20 && px.0[2] <= 30));
    }

    #[test]
    fn text_file_replaces_word_counts() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        let text_file = dir.path().join("text.txt");
        fs::write(&text_file, "cloud cloud words").unwrap();
        config.text_file = Some(text_file);

        let counts = load_counts(&config).unwrap();
        assert_eq!(counts.get("cloud"), Some(&2));
        assert_eq!(counts.get("words"), Some(&1));
    }

    #[test]
    fn saves_rgb_output() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.png");
        save_image(RgbaImage::from_pixel(3, 3, Rgba([1, 2, 3, 255])), &path).unwrap();

        let saved = image::open(&path).unwrap();
        assert_eq!(saved.color(), image::ColorType::Rgb8);
        assert_eq!(saved.to_rgb8().get_pixel(1, 1).0, [1, 2, 3]);
    }
}

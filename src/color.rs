use image::{DynamicImage, Rgba, RgbaImage};
use nanorand::{Rng, WyRand};
use palette::{Hsl, IntoColor, Pixel, Srgb};

use crate::mask::resize_to;
use crate::Word;

/// Recolors words from a reference image: each word takes the average color
/// of the reference pixels under its bounding box.
pub struct ImageColors {
    image: RgbaImage,
    default_color: Rgba<u8>,
}

impl ImageColors {
    pub fn new(img: &DynamicImage, width: u32, height: u32) -> Self {
        ImageColors {
            image: resize_to(img, width, height).to_rgba8(),
            default_color: Rgba([0, 0, 0, 255]),
        }
    }

    pub fn with_default_color(mut self, value: Rgba<u8>) -> Self {
        self.default_color = value;
        self
    }

    /// Fully transparent reference pixels do not count, so a word straddling
    /// the edge of a cut-out reference image is not darkened by the invisible
    /// RGB behind it. A box with no opaque pixel gets the default color.
    pub fn color_for_region(&self, x: u32, y: u32, width: u32, height: u32) -> Rgba<u8> {
        let x_end = x.saturating_add(width).min(self.image.width());
        let y_end = y.saturating_add(height).min(self.image.height());

        let mut sums = [0u64; 3];
        let mut count = 0u64;
        for py in y..y_end {
            for px in x..x_end {
                let [r, g, b, a] = self.image.get_pixel(px, py).0;
                if a == 0 {
                    continue;
                }
                sums[0] += r as u64;
                sums[1] += g as u64;
                sums[2] += b as u64;
                count += 1;
            }
        }

        if count == 0 {
            return self.default_color;
        }

        let mean = |sum: u64| ((sum as f64 / count as f64).round()) as u8;
        Rgba([mean(sums[0]), mean(sums[1]), mean(sums[2]), 255])
    }

    pub fn color_for(&self, word: &Word) -> Rgba<u8> {
        self.color_for_region(
            word.position.x,
            word.position.y,
            word.bitmap.width(),
            word.bitmap.height(),
        )
    }
}

pub fn random_color_rgba(_: &Word, rng: &mut WyRand) -> Rgba<u8> {
    let hue: u8 = rng.generate_range(0..255);

    let col = Hsl::new(hue as f32, 1.0, 0.5);
    let rgb: Srgb = col.into_color();

    let raw: [u8; 3] = rgb.into_format().into_raw();

    Rgba([raw[0], raw[1], raw[2], 255])
}

#[cfg(test)]
mod tests {
    use image::GrayImage;

    use super::*;
    use crate::sat::Point;

    fn word_at(x: u32, y: u32, width: u32, height: u32) -> Word {
        Word {
            text: "w".to_string(),
            font_size: 10,
            bitmap: GrayImage::new(width, height),
            rotated: false,
            position: Point { x, y },
        }
    }

    #[test]
    fn averages_opaque_pixels_under_word() {
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
        img.put_pixel(1, 1, Rgba([100, 0, 0, 255]));
        img.put_pixel(2, 1, Rgba([200, 50, 0, 255]));
        let colors = ImageColors::new(&DynamicImage::ImageRgba8(img), 4, 4);

        assert_eq!(colors.color_for(&word_at(1, 1, 2, 2)), Rgba([150, 25, 0, 255]));
    }

    #[test]
    fn transparent_region_falls_back_to_default() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 0]));
        let colors = ImageColors::new(&DynamicImage::ImageRgba8(img), 4, 4)
            .with_default_color(Rgba([1, 2, 3, 255]));

        assert_eq!(colors.color_for(&word_at(0, 0, 4, 4)), Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn region_past_the_edge_is_clipped() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([40, 80, 120, 255]));
        let colors = ImageColors::new(&DynamicImage::ImageRgba8(img), 2, 2);

        assert_eq!(colors.color_for_region(1, 1, 10, 10), Rgba([40, 80, 120, 255]));
        assert_eq!(colors.color_for_region(5, 5, 1, 1), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn random_colors_are_opaque() {
        let mut rng = WyRand::new_seed(3);
        for _ in 0..20 {
            assert_eq!(random_color_rgba(&word_at(0, 0, 1, 1), &mut rng).0[3], 255);
        }
    }
}

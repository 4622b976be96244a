use image::GrayImage;
use nanorand::{Rng, WyRand};
use tracing::{debug, warn};

use crate::config::RenderSettings;
use crate::sat::{OccupancyMap, Point, Rect};
use crate::Word;

fn unit_random(rng: &mut WyRand) -> f64 {
    rng.generate::<u32>() as f64 / (u32::MAX as f64 + 1.0)
}

/// Places words, largest first, into the free area of `occupancy`.
///
/// `words` must be sorted by descending frequency with the first frequency
/// being 1.0. `render` rasterizes a word at a font size, rotated or not.
/// Placement stops at the first word that no longer fits at
/// `min_font_size`.
pub fn layout_words<F>(
    words: &[(&str, f64)],
    occupancy: &mut OccupancyMap,
    settings: &RenderSettings,
    rng: &mut WyRand,
    mut render: F,
) -> Vec<Word>
where
    F: FnMut(&str, u32, bool) -> GrayImage,
{
    let margin = settings.word_margin;
    let font_step = settings.font_step.max(1);
    let min_font_size = settings.min_font_size.max(1);
    let scaling = settings.relative_font_scaling;

    let mut placed = Vec::with_capacity(words.len());
    let mut last_freq = 1.0;
    let mut font_size = settings.max_font_size;

    for (index, &(text, frequency)) in words.iter().enumerate() {
        if frequency <= 0.0 {
            continue;
        }

        if scaling != 0.0 {
            let scaled = (scaling * (frequency / last_freq) + (1.0 - scaling)) * font_size as f64;
            font_size = scaled.round().max(0.0) as u32;
        }

        let mut rotated = unit_random(rng) < settings.word_rotate_chance;
        let mut tried_other_orientation = false;

        let found = loop {
            if font_size < min_font_size {
                break None;
            }

            let bitmap = render(text, font_size, rotated);
            let rect = Rect {
                width: bitmap.width() + margin,
                height: bitmap.height() + margin,
            };

            if let Some(spot) = occupancy.find_space_for_rect(&rect, rng) {
                break Some((spot, bitmap));
            }

            if !tried_other_orientation && settings.word_rotate_chance > 0.0 {
                rotated = !rotated;
                tried_other_orientation = true;
            } else {
                font_size = font_size.saturating_sub(font_step);
                rotated = false;
            }
        };

        let Some((spot, bitmap)) = found else {
            warn!(
                word = text,
                placed = placed.len(),
                remaining = words.len() - index,
                "no space left, stopping layout"
            );
            break;
        };

        let position = Point {
            x: spot.x + margin / 2,
            y: spot.y + margin / 2,
        };
        occupancy.occupy(&bitmap, position);
        debug!(word = text, font_size, rotated, x = position.x, y = position.y, "placed word");

        placed.push(Word {
            text: text.to_string(),
            font_size,
            bitmap,
            rotated,
            position,
        });
        last_freq = frequency;
    }

    placed
}

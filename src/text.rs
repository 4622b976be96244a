use ab_glyph::{point, Font, FontVec, Glyph, GlyphId, Point, PxScale, ScaleFont};
use image::{imageops, GrayImage, Luma, Pixel, Rgba, RgbaImage};

#[derive(Clone, Debug)]
pub struct GlyphData {
    pub glyphs: Vec<Glyph>,
    pub width: u32,
    pub height: u32,
}

//把文本转换为字体，方便画图
pub fn text_to_glyphs(text: &str, font: &FontVec, scale: PxScale) -> GlyphData {
    let scaled_font = font.as_scaled(scale);

    let mut glyphs: Vec<Glyph> = vec![];
    layout_paragraph(scaled_font, point(0.0, 0.0), text, &mut glyphs);

    let glyphs_height = scaled_font.height().ceil() as u32;
    let glyphs_width = match (glyphs.first(), glyphs.last()) {
        (Some(first), Some(last)) => {
            let max_x = last.position.x + scaled_font.h_advance(last.id);
            (max_x - first.position.x).ceil() as u32
        }
        _ => 0,
    };

    GlyphData {
        glyphs,
        width: glyphs_width,
        height: glyphs_height,
    }
}

/// Draws the laid-out glyphs into a coverage bitmap of the layout box.
/// Outline pixels that spill past the box are clipped.
pub fn rasterize(glyph_data: &GlyphData, font: &FontVec) -> GrayImage {
    let mut bitmap = GrayImage::new(glyph_data.width, glyph_data.height);

    for glyph in &glyph_data.glyphs {
        let Some(outlined) = font.outline_glyph(glyph.clone()) else {
            continue;
        };
        let bounds = outlined.px_bounds();

        outlined.draw(|x, y, v| {
            let final_x = bounds.min.x as i64 + x as i64;
            let final_y = bounds.min.y as i64 + y as i64;
            if final_x < 0
                || final_y < 0
                || final_x >= bitmap.width() as i64
                || final_y >= bitmap.height() as i64
            {
                return;
            }

            let px = bitmap.get_pixel_mut(final_x as u32, final_y as u32);
            let coverage = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
            px.0[0] = px.0[0].max(coverage);
        })
    }

    bitmap
}

/// Rasterizes `text` at `font_size`, turned 90° counter-clockwise when
/// `rotated` is set.
pub fn render_word(text: &str, font: &FontVec, font_size: u32, rotated: bool) -> GrayImage {
    let glyphs = text_to_glyphs(text, font, PxScale::from(font_size as f32));
    let bitmap = rasterize(&glyphs, font);

    if rotated {
        imageops::rotate270(&bitmap)
    } else {
        bitmap
    }
}

/// Blends `pixel` into `buffer` through the coverage in `bitmap`.
pub fn draw_bitmap_to_rgba_buffer(
    buffer: &mut RgbaImage,
    bitmap: &GrayImage,
    x: u32,
    y: u32,
    pixel: Rgba<u8>,
) {
    for (bx, by, coverage) in bitmap.enumerate_pixels() {
        let Luma([coverage]) = *coverage;
        if coverage == 0 {
            continue;
        }
        let (final_x, final_y) = (x + bx, y + by);
        if final_x >= buffer.width() || final_y >= buffer.height() {
            continue;
        }

        let v = coverage as f32 / 255.0;
        let px = buffer.get_pixel_mut(final_x, final_y);
        px.apply2(&pixel, |old, new| {
            ((v * new as f32) + (1.0 - v) * old as f32) as u8
        });
        px.0[3] = 0xFF;
    }
}

pub fn layout_paragraph<F, SF>(font: SF, position: Point, text: &str, target: &mut Vec<Glyph>)
where
    F: Font,
    SF: ScaleFont<F>,
{
    let v_advance = font.height() + font.line_gap();
    let mut caret = position + point(0.0, font.ascent());
    let mut last_glyph: Option<GlyphId> = None;
    for c in text.chars() {
        if c.is_control() {
            if c == '\n' {
                //进行换行
                caret = point(position.x, caret.y + v_advance);
            }
            continue;
        }

        let mut glyph = font.scaled_glyph(c);
        if let Some(previous) = last_glyph.take() {
            caret.x += font.kern(previous, glyph.id);
        }
        glyph.position = caret;
        last_glyph = Some(glyph.id);
        caret.x += font.h_advance(glyph.id);

        target.push(glyph);
    }
}

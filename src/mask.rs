use std::path::Path;

use image::{imageops, imageops::FilterType, DynamicImage, GrayImage, Luma};
use tracing::debug;

use crate::error::{Error, Result};

/// Opens a raster image. Unlike the word lists, a missing image is an error.
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let img = image::open(path).map_err(|source| Error::Image {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), width = img.width(), height = img.height(), "loaded image");

    Ok(img)
}

pub fn resize_to(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    if img.width() == width && img.height() == height {
        return img.clone();
    }

    debug!(
        from_width = img.width(),
        from_height = img.height(),
        width,
        height,
        "resizing image to canvas"
    );
    DynamicImage::ImageRgba8(imageops::resize(img, width, height, FilterType::Nearest))
}

/// Builds the occupancy grid for a mask: pure white pixels (alpha ignored)
/// are off-limits and become 1, everything else is drawable and becomes 0.
pub fn mask_from_image(img: &DynamicImage, width: u32, height: u32) -> GrayImage {
    let rgba = resize_to(img, width, height).to_rgba8();

    GrayImage::from_fn(width, height, |x, y| {
        let [r, g, b, _] = rgba.get_pixel(x, y).0;
        Luma([u8::from(r == 255 && g == 255 && b == 255)])
    })
}

pub fn load_mask(path: &Path, width: u32, height: u32) -> Result<GrayImage> {
    let img = load_image(path)?;
    Ok(mask_from_image(&img, width, height))
}

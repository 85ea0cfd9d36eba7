//! Segmentation mask rasters
//!
//! Masks are stored as 8-bit images whose pixel value is the class index.
//! Colour files are accepted and read through their blue channel.

use crate::error::ArtifactError;
use image::{GrayImage, RgbImage};
use rarpeval_metrics::LabelMap;
use std::path::Path;

const CLASS_CHANNEL: usize = 2;

/// Decode a mask image into a class index map
pub fn read_label_map(path: &Path) -> Result<LabelMap, ArtifactError> {
    let image = image::open(path).map_err(|source| ArtifactError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(label_map_from_rgb(&image.to_rgb8()))
}

fn label_map_from_rgb(rgb: &RgbImage) -> LabelMap {
    LabelMap::from_fn(rgb.width(), rgb.height(), |x, y| {
        rgb.get_pixel(x, y)[CLASS_CHANNEL]
    })
}

/// Encode a class index map as a grayscale PNG (or any format the extension names)
pub fn write_label_map(path: &Path, map: &LabelMap) -> Result<(), ArtifactError> {
    let image = GrayImage::from_fn(map.width(), map.height(), |x, y| {
        image::Luma([map.get(x, y)])
    });
    image.save(path).map_err(|source| ArtifactError::Image {
        path: path.to_path_buf(),
        source,
    })
}

/// Width and height of an image without decoding its pixels
pub fn image_dimensions(path: &Path) -> Result<(u32, u32), ArtifactError> {
    image::image_dimensions(path).map_err(|source| ArtifactError::Image {
        path: path.to_path_buf(),
        source,
    })
}

use std::path::Path;

use image::DynamicImage;

use crate::error::Error;
use crate::model::PixelRect;

/// Decode, crop and encode of raster files.
pub trait RasterBackend {
    fn decode(&mut self, path: &Path) -> Result<DynamicImage, Error>;

    /// `path` is only used to tag errors.
    fn crop(
        &mut self,
        image: &DynamicImage,
        rect: PixelRect,
        path: &Path,
    ) -> Result<DynamicImage, Error>;

    fn encode(&mut self, image: &DynamicImage, path: &Path) -> Result<(), Error>;
}

/// Backend on top of the `image` crate. Output format follows the file extension.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageCrateBackend;

fn image_error(path: &Path, source: image::ImageError) -> Error {
    Error::Image {
        path: path.to_path_buf(),
        source,
    }
}

impl RasterBackend for ImageCrateBackend {
    fn decode(&mut self, path: &Path) -> Result<DynamicImage, Error> {
        let reader = image::ImageReader::open(path)
            .and_then(|r| r.with_guessed_format())
            .map_err(|e| image_error(path, image::ImageError::IoError(e)))?;
        reader.decode().map_err(|e| {
            log::error!(
                "Image could not be decoded. Maybe the format of {} is not supported?",
                path.display()
            );
            image_error(path, e)
        })
    }

    fn crop(
        &mut self,
        image: &DynamicImage,
        rect: PixelRect,
        path: &Path,
    ) -> Result<DynamicImage, Error> {
        let (width, height) = (image.width(), image.height());
        let in_bounds = rect.left >= 0
            && rect.top >= 0
            && rect.width > 0
            && rect.height > 0
            && rect.left + rect.width <= width as i64
            && rect.top + rect.height <= height as i64;
        if !in_bounds {
            return Err(Error::InvalidCrop {
                path: path.to_path_buf(),
                rect,
                width,
                height,
            });
        }
        Ok(image.crop_imm(
            rect.left as u32,
            rect.top as u32,
            rect.width as u32,
            rect.height as u32,
        ))
    }

    fn encode(&mut self, image: &DynamicImage, path: &Path) -> Result<(), Error> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        image.save(path).map_err(|e| image_error(path, e))
    }
}

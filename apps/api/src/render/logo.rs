//! Logo upload decoding. Only PNG and JPEG are accepted.

use image::{ImageFormat, RgbImage};

use crate::errors::AppError;

/// A decoded logo, flattened to 8-bit RGB for PDF embedding.
#[derive(Clone)]
pub struct Logo {
    pub format: ImageFormat,
    pub pixels: RgbImage,
}

impl std::fmt::Debug for Logo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logo")
            .field("format", &self.format)
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .finish()
    }
}

impl Logo {
    pub fn decode(bytes: &[u8]) -> Result<Self, AppError> {
        let format = image::guess_format(bytes)
            .map_err(|e| AppError::UnprocessableEntity(format!("Unrecognised logo image: {e}")))?;

        if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
            return Err(AppError::UnprocessableEntity(format!(
                "Logo must be PNG or JPEG, got {format:?}"
            )));
        }

        let decoded = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| AppError::UnprocessableEntity(format!("Logo could not be decoded: {e}")))?;

        Ok(Self {
            format,
            pixels: decoded.to_rgb8(),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Height-to-width ratio, used to size the logo block on the first page.
    pub fn aspect(&self) -> f32 {
        self.height() as f32 / self.width().max(1) as f32
    }
}

#[cfg(test)]
pub(crate) fn png_fixture(width: u32, height: u32) -> Vec<u8> {
    use image::{DynamicImage, Rgba, RgbaImage};
    use std::io::Cursor;

    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([0, 90, 200, 255])));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("png encode");
    buf
}

use emojiart_editor::{FetchError, ImageDecoder, ImageHandle};

/// Decodes PNG, JPEG, GIF, WebP and BMP backgrounds with the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterDecoder;

impl ImageDecoder for RasterDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<ImageHandle, FetchError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| FetchError::BadImageData(e.to_string()))?;

        Ok(ImageHandle::new(image.width(), image.height(), bytes.to_vec()))
    }
}

//! Texture loading: source parsing, off-thread decode, and progress tracking.

mod decode;
mod sink;
mod source;
mod spawn;
mod tracker;

pub use decode::DecodedImage;
pub use sink::{LOAD_FAILED, NoProgress, ProgressSink};
pub use source::ImageSource;
pub use spawn::{Job, Spawn, ThreadSpawner};
pub use tracker::{LoadState, OperationId, TextureLoadTracker};

#[cfg(test)]
pub(crate) use spawn::ManualSpawner;

#[cfg(test)]
pub(crate) mod test_images {
    use std::io::Cursor;

    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;

    /// PNG bytes of a `width`x`height` image filled with `rgba`.
    pub(crate) fn solid_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png)
            .expect("png encoding of an in-memory image");
        out.into_inner()
    }

    pub(crate) fn png_data_url(bytes: &[u8]) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(bytes))
    }
}

//! Source string → RGBA8 pixels.
//!
//! Runs on a worker thread. Reports stage progress through `report` and polls
//! `cancel` between stages; a cancelled decode returns `Ok(None)`.

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, general_purpose};
use image::ImageReader;

use crate::config::LoaderConfig;
use crate::error::TextureLoadError;

use super::source::ImageSource;

pub(crate) const PROGRESS_PARSED: u8 = 5;
pub(crate) const PROGRESS_PAYLOAD_DONE: u8 = 60;
pub(crate) const PROGRESS_FORMAT: u8 = 65;
pub(crate) const PROGRESS_PIXELS: u8 = 90;

/// Standard alphabet; trailing `=` padding optional.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    general_purpose::PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decoded, tightly packed RGBA8 image (sRGB).
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl DecodedImage {
    /// Wraps raw pixels. Returns `None` if the buffer size does not match.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        (expected == pixels.len() && expected > 0).then_some(Self { width, height, pixels })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

pub(crate) fn decode_source(
    raw: &str,
    config: &LoaderConfig,
    cancel: &AtomicBool,
    mut report: impl FnMut(u8),
) -> Result<Option<DecodedImage>, TextureLoadError> {
    let cancelled = || cancel.load(Ordering::Acquire);

    let source = ImageSource::parse(raw)?;
    report(PROGRESS_PARSED);

    let Some(bytes) = decode_payload(source.payload(), config.aligned_chunk(), &cancelled, &mut report)?
    else {
        return Ok(None);
    };
    if cancelled() {
        return Ok(None);
    }

    let format = image::guess_format(&bytes).map_err(|_| TextureLoadError::UnsupportedFormat)?;
    report(PROGRESS_FORMAT);
    log::trace!("decoding {} bytes as {format:?} (declared {})", bytes.len(), source.media_type());

    // Header only; oversized images are rejected before any pixel allocation.
    let (width, height) = ImageReader::with_format(Cursor::new(&bytes), format)
        .into_dimensions()
        .map_err(image_error)?;
    if width > config.max_dimension || height > config.max_dimension {
        return Err(TextureLoadError::TooLarge { width, height, max: config.max_dimension });
    }

    let decoded = image::load_from_memory_with_format(&bytes, format).map_err(image_error)?;
    drop(bytes);
    if cancelled() {
        return Ok(None);
    }

    let rgba = decoded.into_rgba8();
    let image = DecodedImage::from_rgba8(width, height, rgba.into_raw())
        .ok_or_else(|| TextureLoadError::Decode(format!("empty image ({width}x{height})")))?;
    report(PROGRESS_PIXELS);

    Ok(Some(image))
}

fn image_error(e: image::ImageError) -> TextureLoadError {
    match e {
        image::ImageError::Unsupported(_) => TextureLoadError::UnsupportedFormat,
        other => TextureLoadError::Decode(other.to_string()),
    }
}

/// Decodes base64 in aligned chunks, reporting progress after each chunk.
fn decode_payload(
    payload: &str,
    chunk: usize,
    cancelled: &impl Fn() -> bool,
    report: &mut impl FnMut(u8),
) -> Result<Option<Vec<u8>>, TextureLoadError> {
    let text = payload.as_bytes();
    let mut out = Vec::with_capacity(text.len() / 4 * 3 + 3);

    let span = (PROGRESS_PAYLOAD_DONE - PROGRESS_PARSED) as usize;
    let mut done = 0usize;

    for piece in text.chunks(chunk) {
        if cancelled() {
            return Ok(None);
        }
        BASE64
            .decode_vec(piece, &mut out)
            .map_err(|e| TextureLoadError::Base64(e.to_string()))?;

        done += piece.len();
        report(PROGRESS_PARSED + (span * done / text.len()) as u8);
    }

    Ok(Some(out))
}

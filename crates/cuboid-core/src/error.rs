use std::fmt;

/// Failure to bind the viewer to its drawing surface or to create the render context.
///
/// Fatal to the viewer instance. Surfaced synchronously from `CuboidViewer::new`
/// and `CuboidViewer::run`; there is no internal retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitializationError {
    /// The surface reported a zero-sized drawable area.
    SurfaceUnavailable { width: u32, height: u32 },
    /// The backend could not create its rendering context.
    ContextCreation(String),
}

impl InitializationError {
    pub fn context_creation(msg: impl Into<String>) -> Self {
        Self::ContextCreation(msg.into())
    }
}

impl fmt::Display for InitializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SurfaceUnavailable { width, height } => {
                write!(f, "drawing surface unavailable ({width}x{height})")
            }
            Self::ContextCreation(msg) => write!(f, "failed to create render context: {msg}"),
        }
    }
}

impl std::error::Error for InitializationError {}

/// Failure to turn an encoded image reference into the mesh's surface texture.
///
/// Recovered locally: the mesh keeps its last bound material. Reported once
/// through `ProgressSink::on_failure`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureLoadError {
    /// The reference is not a base64 `data:image/...` URL.
    MalformedSource(String),
    /// The payload is not valid base64.
    Base64(String),
    /// The decoded bytes are not in a supported image format.
    UnsupportedFormat,
    /// The image codec rejected the bytes.
    Decode(String),
    /// The image exceeds the configured maximum texture dimension.
    TooLarge { width: u32, height: u32, max: u32 },
    /// The backend failed to create or fill the texture.
    Upload(String),
    /// The decode worker went away without reporting a result.
    WorkerLost,
}

impl fmt::Display for TextureLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedSource(msg) => write!(f, "malformed image source: {msg}"),
            Self::Base64(msg) => write!(f, "invalid base64 payload: {msg}"),
            Self::UnsupportedFormat => f.write_str("unsupported image format"),
            Self::Decode(msg) => write!(f, "image decode failed: {msg}"),
            Self::TooLarge { width, height, max } => {
                write!(f, "image is {width}x{height}, larger than the {max}px texture limit")
            }
            Self::Upload(msg) => write!(f, "texture upload failed: {msg}"),
            Self::WorkerLost => f.write_str("decode worker exited without a result"),
        }
    }
}

impl std::error::Error for TextureLoadError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_dimensions() {
        let e = TextureLoadError::TooLarge { width: 9000, height: 10, max: 8192 };
        assert_eq!(e.to_string(), "image is 9000x10, larger than the 8192px texture limit");

        let e = InitializationError::SurfaceUnavailable { width: 0, height: 300 };
        assert_eq!(e.to_string(), "drawing surface unavailable (0x300)");
    }
}

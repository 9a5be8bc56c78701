//! Image files and test patterns → `data:` URLs for the viewer.

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, Rgba, RgbaImage};

/// An image ready to hand to `update_texture`.
#[derive(Debug, Clone)]
pub struct Capture {
    pub label: String,
    pub data_url: String,
}

/// Encodes `bytes` as `data:<mime>;base64,...`, detecting the MIME type from the content.
pub fn encode_data_url(bytes: &[u8]) -> Result<String> {
    let format = image::guess_format(bytes).context("unrecognized image format")?;
    Ok(format!(
        "data:{};base64,{}",
        format.to_mime_type(),
        STANDARD.encode(bytes)
    ))
}

/// A command-line image argument: a `data:` URL is passed through untouched,
/// anything else is read as a file.
pub fn from_arg(arg: &Path) -> Result<Capture> {
    match arg.to_str() {
        Some(url) if url.starts_with("data:") => Ok(Capture {
            label: format!("inline ({} chars)", url.len()),
            data_url: url.to_string(),
        }),
        _ => load_file(arg),
    }
}

pub fn load_file(path: &Path) -> Result<Capture> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let data_url = encode_data_url(&bytes).with_context(|| format!("cannot load {}", path.display()))?;
    log::debug!("captured {} ({} bytes)", path.display(), bytes.len());
    Ok(Capture {
        label: path.display().to_string(),
        data_url,
    })
}

/// Built-in patterns: one tinted quadrant per face group, and a checkerboard.
pub fn test_patterns() -> Result<Vec<Capture>> {
    const QUADRANTS: [[u8; 4]; 4] = [
        [220, 70, 60, 255],
        [70, 170, 80, 255],
        [60, 110, 220, 255],
        [230, 190, 60, 255],
    ];

    let quadrants = RgbaImage::from_fn(256, 256, |x, y| {
        let q = (x / 128 + 2 * (y / 128)) as usize;
        let shade = if (x % 128) < 4 || (y % 128) < 4 { 0.6 } else { 1.0 };
        let [r, g, b, a] = QUADRANTS[q];
        Rgba([scale(r, shade), scale(g, shade), scale(b, shade), a])
    });

    let checker = RgbaImage::from_fn(256, 256, |x, y| {
        if (x / 32 + y / 32) % 2 == 0 {
            Rgba([235, 235, 235, 255])
        } else {
            Rgba([40, 40, 48, 255])
        }
    });

    Ok(vec![
        Capture {
            label: "pattern: quadrants".into(),
            data_url: encode_data_url(&png_bytes(&quadrants)?)?,
        },
        Capture {
            label: "pattern: checker".into(),
            data_url: encode_data_url(&png_bytes(&checker)?)?,
        },
    ])
}

fn scale(c: u8, f: f32) -> u8 {
    (f32::from(c) * f) as u8
}

fn png_bytes(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .context("failed to encode test pattern")?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_argument_is_passed_through() {
        let capture = from_arg(Path::new("data:image/png;base64,AAAA")).unwrap();
        assert_eq!(capture.data_url, "data:image/png;base64,AAAA");
    }

    #[test]
    fn png_bytes_get_png_mime() {
        let bytes = png_bytes(&RgbaImage::new(2, 2)).unwrap();
        let url = encode_data_url(&bytes).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));

        let payload = url.split_once(',').unwrap().1;
        assert_eq!(STANDARD.decode(payload).unwrap(), bytes);
    }

    #[test]
    fn non_image_bytes_are_rejected() {
        assert!(encode_data_url(b"plain text, not an image").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_file(Path::new("/nonexistent/cuboid.png")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/cuboid.png"));
    }

    #[test]
    fn file_round_trip() {
        let path = std::env::temp_dir().join(format!("cuboid-studio-capture-{}.png", std::process::id()));
        std::fs::write(&path, png_bytes(&RgbaImage::new(3, 1)).unwrap()).unwrap();

        let capture = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(capture.label, path.display().to_string());
        assert!(capture.data_url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn patterns_are_png_data_urls() {
        let patterns = test_patterns().unwrap();
        assert_eq!(patterns.len(), 2);
        assert!(patterns.iter().all(|c| c.data_url.starts_with("data:image/png;base64,")));
    }
}

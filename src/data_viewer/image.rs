//! Image datasets: the `CLASS=IMAGE` convention and pixel decoding.

use crate::data::{trim_nul, AttributeValue, Container, ScalarValue};
use crate::data::{AxisSelector, ObjectPath};
use crate::error::{Result, ViewerError};
use crate::navigation::ResolvedObject;
use std::path::{Path, PathBuf};

/// Attribute naming the object class.
pub const CLASS_ATTRIBUTE: &str = "CLASS";
/// Class value marking an image dataset.
pub const IMAGE_CLASS: &str = "IMAGE";

/// Whether a dataset's attributes mark it as an image.
///
/// True exactly when an attribute named `CLASS` decodes to `IMAGE`. A byte
/// string or the first element of a byte-string array is accepted.
pub fn is_image(attributes: &[(String, AttributeValue)]) -> bool {
    attributes
        .iter()
        .filter(|(name, _)| name == CLASS_ATTRIBUTE)
        .any(|(_, value)| {
            let bytes = match value {
                AttributeValue::Scalar(ScalarValue::Bytes(b)) => b,
                AttributeValue::Array(items) => match items.first() {
                    Some(ScalarValue::Bytes(b)) => b,
                    _ => return false,
                },
                _ => return false,
            };
            trim_nul(bytes) == IMAGE_CLASS.as_bytes()
        })
}

/// Check the image convention on a resolved object.
pub fn classify<C: Container>(container: &C, object: &ResolvedObject) -> Result<bool> {
    Ok(is_image(&container.attributes(&object.path)?))
}

/// A decoded RGB bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 3]>,
}

impl Bitmap {
    /// Read and decode the whole dataset at `path`.
    pub fn read<C: Container>(container: &C, path: &ObjectPath) -> Result<Self> {
        let shape = container.shape(path)?;
        let selection = vec![AxisSelector::Free; shape.len()];
        let values = container.read_slice(path, &selection)?;
        Self::decode(&shape, values.iter())
    }

    /// Decode row-major pixel values.
    ///
    /// `(H, W)` is grayscale, `(H, W, 3)` RGB and `(H, W, 4)` RGBA with the
    /// alpha channel dropped. Values are clamped to `0..=255`.
    pub fn decode<'a>(
        shape: &[usize],
        values: impl IntoIterator<Item = &'a ScalarValue>,
    ) -> Result<Self> {
        let channels = match shape {
            [_, _] => 1,
            [_, _, c @ (3 | 4)] => *c,
            _ => return Err(ViewerError::UnsupportedImage(shape.to_vec())),
        };
        let (height, width) = (shape[0], shape[1]);

        let levels: Vec<u8> = values.into_iter().map(to_level).collect();
        if levels.len() != height * width * channels {
            return Err(ViewerError::UnsupportedImage(shape.to_vec()));
        }

        let pixels = levels
            .chunks_exact(channels)
            .map(|px| match channels {
                1 => [px[0], px[0], px[0]],
                _ => [px[0], px[1], px[2]],
            })
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// Largest size fitting in `max_w x max_h` that keeps the aspect ratio.
    pub fn fit(&self, max_w: usize, max_h: usize) -> (usize, usize) {
        if self.width == 0 || self.height == 0 || max_w == 0 || max_h == 0 {
            return (0, 0);
        }
        // Compare width/height against max_w/max_h without floats.
        if self.width * max_h >= max_w * self.height {
            let h = (self.height * max_w / self.width).max(1);
            (max_w, h)
        } else {
            let w = (self.width * max_h / self.height).max(1);
            (w, max_h)
        }
    }

    /// Nearest-neighbour sample at `(x, y)` of the bitmap scaled to `w x h`.
    pub fn sample(&self, x: usize, y: usize, w: usize, h: usize) -> Option<[u8; 3]> {
        if w == 0 || h == 0 {
            return None;
        }
        self.pixel(x * self.width / w, y * self.height / h)
    }
}

/// Viewer state for an image-classified dataset.
#[derive(Debug, Clone)]
pub struct ImageView {
    source: PathBuf,
    path: ObjectPath,
    bitmap: Bitmap,
}

impl ImageView {
    /// Read and decode the image at `object`.
    pub fn open<C: Container>(container: &C, source: &Path, object: &ResolvedObject) -> Result<Self> {
        let bitmap = Bitmap::read(container, &object.path)?;
        tracing::debug!(
            "Decoded image {} ({}x{})",
            object.path,
            bitmap.width(),
            bitmap.height()
        );
        Ok(Self {
            source: source.to_path_buf(),
            path: object.path.clone(),
            bitmap,
        })
    }

    /// Image name (last path segment).
    pub fn name(&self) -> &str {
        self.path.name().unwrap_or("/")
    }

    /// Image path inside the file.
    pub fn path(&self) -> &ObjectPath {
        &self.path
    }

    /// File the image was read from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Decoded pixels.
    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }
}

fn to_level(value: &ScalarValue) -> u8 {
    value
        .as_f64()
        .map(|v| if v.is_nan() { 0.0 } else { v.clamp(0.0, 255.0) })
        .unwrap_or(0.0) as u8
}

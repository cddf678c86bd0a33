use crate::foundation::error::{GogaiError, GogaiResult};

/// Host viewport description supplied by the windowing collaborator.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in physical pixels.
    pub width: u32,
    /// Height in physical pixels.
    pub height: u32,
    /// Device pixel density reported by the host.
    pub pixel_ratio: f64,
}

impl Viewport {
    /// Create a validated viewport with non-zero extent and finite density.
    pub fn new(width: u32, height: u32, pixel_ratio: f64) -> GogaiResult<Self> {
        if width == 0 || height == 0 {
            return Err(GogaiError::validation("viewport extent must be non-zero"));
        }
        if !pixel_ratio.is_finite() || pixel_ratio <= 0.0 {
            return Err(GogaiError::validation(
                "viewport pixel_ratio must be finite and > 0",
            ));
        }
        Ok(Self {
            width,
            height,
            pixel_ratio,
        })
    }

    /// Width-over-height aspect ratio.
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Pixel ratio clamped to `max` before it enters point-size math.
    pub fn clamped_pixel_ratio(self, max: f64) -> f64 {
        self.pixel_ratio.min(max)
    }
}

/// Straight (non-premultiplied) 8-bit RGB color, serialized as `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Build a color from channel values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` hex string.
    pub fn from_hex(s: &str) -> GogaiResult<Self> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| GogaiError::validation(format!("color '{s}' must start with '#'")))?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(GogaiError::validation(format!(
                "color '{s}' must be #rrggbb"
            )));
        }
        let byte = |range: std::ops::Range<usize>| -> GogaiResult<u8> {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| GogaiError::validation(format!("color '{s}' has non-hex digits")))
        };
        Ok(Self {
            r: byte(0..2)?,
            g: byte(2..4)?,
            b: byte(4..6)?,
        })
    }

    /// Format as a `#rrggbb` hex string.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Normalized channel triple for uniform upload.
    pub fn to_f32(self) -> [f32; 3] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        ]
    }
}

impl serde::Serialize for Rgb8 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Rgb8 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

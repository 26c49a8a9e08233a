/// Texture format, sampling parameters and the GPU texture identifier

use std::fmt;
use std::num::NonZeroU32;

/// Pixel format of an uploaded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    /// 8 bits per channel, R G B A byte order, linear
    R8G8B8A8_UNORM,
    /// 8 bits per channel, R G B A byte order, sRGB encoded
    R8G8B8A8_SRGB,
}

impl TextureFormat {
    /// Size of one pixel in bytes
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            TextureFormat::R8G8B8A8_UNORM | TextureFormat::R8G8B8A8_SRGB => 4,
        }
    }
}

/// Texture coordinate wrapping, applied to both S and T axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapMode {
    Repeat,
    MirroredRepeat,
    ClampToEdge,
}

/// Minification / magnification filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    Linear,
    Nearest,
}

/// Sampling parameters fixed at texture creation
///
/// The default is what every cached texture gets: repeat wrapping, linear
/// filtering, no mip-maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureParams {
    /// Wrap mode for S and T
    pub wrap: WrapMode,
    /// Minification filter
    pub min_filter: FilterMode,
    /// Magnification filter
    pub mag_filter: FilterMode,
}

impl Default for TextureParams {
    fn default() -> Self {
        Self {
            wrap: WrapMode::Repeat,
            min_filter: FilterMode::Linear,
            mag_filter: FilterMode::Linear,
        }
    }
}

/// Opaque GPU texture identifier
///
/// Never zero: backends that hand out integer names (OpenGL) reserve zero
/// for "no texture".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(NonZeroU32);

impl TextureId {
    /// Wrap a raw backend identifier, `None` for zero
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    /// Raw backend identifier
    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

impl From<NonZeroU32> for TextureId {
    fn from(raw: NonZeroU32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

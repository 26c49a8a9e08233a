//! Texture resources
//!
//! Decoding of image files, GPU texture ownership, the shared texture cache
//! and the client-facing `Texture` handle.

pub mod pixel_decoder;
pub mod gpu_texture;
pub mod texture_cache;
pub mod texture;

pub use pixel_decoder::{PixelDecoder, ImageFileDecoder, DecodedImage};
pub use gpu_texture::{GpuTexture, UPLOAD_FORMAT};
pub use texture_cache::{
    TextureCache, TextureCacheConfig, TextureHandleRef,
    canonical_texture_key, DEFAULT_ASSET_ROOT,
};
pub use texture::Texture;

/// GraphicsDevice trait - the GPU primitives the texture pipeline relies on

use crate::error::Result;
use crate::graphics_device::{TextureId, TextureFormat, WrapMode, FilterMode};

/// Number of texture units addressable by `set_active_sampler_slot`
///
/// Valid sampler slots are `0..MAX_SAMPLER_SLOTS`.
pub const MAX_SAMPLER_SLOTS: u32 = 32;

// ============================================================================
// GraphicsDevice trait
// ============================================================================

/// GPU texture primitives
///
/// Implemented by backends (e.g. `GlGraphicsDevice`). Every call is
/// synchronous and must be issued while the backend's context is current.
/// State-setting calls (`set_wrap`, `set_filter`, `upload_image_2d`) apply to
/// the texture most recently passed to `bind_texture`.
///
/// Shared across the engine as `Arc<Mutex<dyn GraphicsDevice>>`.
pub trait GraphicsDevice: Send + Sync {
    /// Allocate a new, empty texture object
    fn create_texture(&mut self) -> Result<TextureId>;

    /// Bind a texture to the active sampler slot
    fn bind_texture(&mut self, id: TextureId);

    /// Set the wrap mode of the bound texture (S and T)
    fn set_wrap(&mut self, wrap: WrapMode);

    /// Set the min/mag filters of the bound texture
    fn set_filter(&mut self, min_filter: FilterMode, mag_filter: FilterMode);

    /// Upload a full 2D image (mip level 0) into the bound texture
    ///
    /// `data` is row-major, top-to-bottom, tightly packed.
    fn upload_image_2d(
        &mut self,
        width: u32,
        height: u32,
        format: TextureFormat,
        data: &[u8],
    ) -> Result<()>;

    /// Release a texture object
    ///
    /// Must be called at most once per id.
    fn delete_texture(&mut self, id: TextureId);

    /// Select the texture unit that subsequent binds target
    ///
    /// Callers guarantee `slot < MAX_SAMPLER_SLOTS`.
    fn set_active_sampler_slot(&mut self, slot: u32);
}

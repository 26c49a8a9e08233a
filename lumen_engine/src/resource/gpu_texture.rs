/// GpuTexture - sole owner of one GPU texture object.
///
/// The texture object is allocated and uploaded in `create` and deleted in
/// `Drop`. A `GpuTexture` is never cloned, so the delete happens exactly once.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use crate::error::{Error, Result};
use crate::graphics_device::{
    GraphicsDevice, TextureId, TextureFormat, TextureParams, MAX_SAMPLER_SLOTS,
};
use crate::{engine_trace, engine_error};

/// Format every texture is uploaded as
pub const UPLOAD_FORMAT: TextureFormat = TextureFormat::R8G8B8A8_UNORM;

pub struct GpuTexture {
    device: Arc<Mutex<dyn GraphicsDevice>>,
    id: TextureId,
    width: u32,
    height: u32,
    params: TextureParams,
}

impl GpuTexture {
    /// Allocate a texture object and upload `pixels` into it
    ///
    /// `pixels` must be RGBA8, `width * height * 4` bytes. The texture is
    /// left bound on the device's active sampler slot.
    ///
    /// # Errors
    ///
    /// - `InvalidResource` for zero dimensions or a mis-sized pixel buffer
    /// - `BackendError` if the device lock is poisoned or the device fails;
    ///   an allocated texture object is deleted before returning
    pub fn create(
        device: Arc<Mutex<dyn GraphicsDevice>>,
        width: u32,
        height: u32,
        pixels: &[u8],
        params: TextureParams,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidResource(format!(
                "texture dimensions must be non-zero, got {}x{}", width, height
            )));
        }
        let expected = width as usize * height as usize * UPLOAD_FORMAT.bytes_per_pixel() as usize;
        if pixels.len() != expected {
            return Err(Error::InvalidResource(format!(
                "pixel buffer has {} bytes, expected {} for {}x{} RGBA8",
                pixels.len(), expected, width, height
            )));
        }

        let id = lock_device(&device)?.create_texture()?;

        // From here on, dropping `texture` deletes the id, including on the error path.
        let texture = Self {
            device,
            id,
            width,
            height,
            params,
        };

        {
            let mut device = lock_device(&texture.device)?;
            device.bind_texture(id);
            device.set_wrap(params.wrap);
            device.set_filter(params.min_filter, params.mag_filter);
            device.upload_image_2d(width, height, UPLOAD_FORMAT, pixels)?;
        }

        engine_trace!("lumen::GpuTexture", "Created texture {} ({}x{})", id, width, height);
        Ok(texture)
    }

    /// Make this texture the one sampled from `slot`
    ///
    /// # Panics
    ///
    /// If `slot >= MAX_SAMPLER_SLOTS`. An out-of-range slot is a programming
    /// error, not a runtime condition.
    ///
    /// # Errors
    ///
    /// `BackendError` if the device lock is poisoned.
    pub fn bind(&self, slot: u32) -> Result<()> {
        assert!(
            slot < MAX_SAMPLER_SLOTS,
            "sampler slot {} out of range (0..{})", slot, MAX_SAMPLER_SLOTS
        );
        let mut device = lock_device(&self.device)?;
        device.set_active_sampler_slot(slot);
        device.bind_texture(self.id);
        Ok(())
    }

    /// GPU identifier
    pub fn id(&self) -> TextureId {
        self.id
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sampling parameters the texture was created with
    pub fn params(&self) -> TextureParams {
        self.params
    }
}

impl Drop for GpuTexture {
    fn drop(&mut self) {
        // A poisoned lock still guards a usable device; the texture must go.
        let mut device = match self.device.lock() {
            Ok(device) => device,
            Err(poisoned) => {
                engine_error!("lumen::GpuTexture",
                    "Device lock poisoned while deleting texture {}", self.id);
                poisoned.into_inner()
            }
        };
        device.delete_texture(self.id);
        engine_trace!("lumen::GpuTexture", "Deleted texture {}", self.id);
    }
}

impl fmt::Debug for GpuTexture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpuTexture")
            .field("id", &self.id)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("params", &self.params)
            .finish()
    }
}

fn lock_device(
    device: &Arc<Mutex<dyn GraphicsDevice>>,
) -> Result<MutexGuard<'_, dyn GraphicsDevice + 'static>> {
    device.lock()
        .map_err(|_| Error::BackendError("GraphicsDevice lock poisoned".to_string()))
}

#[cfg(test)]
#[path = "gpu_texture_tests.rs"]
mod tests;

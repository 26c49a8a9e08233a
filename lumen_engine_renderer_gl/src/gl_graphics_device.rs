/// OpenGL graphics device

use glow::HasContext;
use rustc_hash::FxHashMap;
use lumen_engine::lumen::{Error, Result};
use lumen_engine::lumen::graphics_device::{
    GraphicsDevice, TextureId, TextureFormat, WrapMode, FilterMode, MAX_SAMPLER_SLOTS,
};
use lumen_engine::{engine_bail, engine_err, engine_debug, engine_trace, engine_warn};
use crate::gl_format::{wrap_mode_to_gl, filter_mode_to_gl, texture_format_to_gl, sampler_slot_to_gl};

/// `GraphicsDevice` backed by an OpenGL context
///
/// Keeps the GL texture objects it created keyed by `TextureId`, so
/// unknown or already deleted ids never reach the driver.
pub struct GlGraphicsDevice {
    gl: glow::Context,
    textures: FxHashMap<TextureId, glow::Texture>,
}

impl GlGraphicsDevice {
    /// Wrap a GL context that is current on the calling thread
    pub fn new(gl: glow::Context) -> Self {
        let version = gl.version();
        engine_debug!("lumen::gl", "GL device created (GL {}.{}{})",
            version.major, version.minor, if version.is_embedded { " ES" } else { "" });
        Self {
            gl,
            textures: FxHashMap::default(),
        }
    }

    /// Underlying GL context
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    /// Number of live texture objects created by this device
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn check_gl_error(&self, operation: &str) -> Result<()> {
        let code = unsafe { self.gl.get_error() };
        match code {
            glow::NO_ERROR => Ok(()),
            glow::OUT_OF_MEMORY => {
                engine_warn!("lumen::gl", "{}: GL_OUT_OF_MEMORY", operation);
                Err(Error::OutOfMemory)
            }
            other => Err(engine_err!("lumen::gl", "{} failed with GL error 0x{:04X}", operation, other)),
        }
    }
}

impl GraphicsDevice for GlGraphicsDevice {
    fn create_texture(&mut self) -> Result<TextureId> {
        let texture = unsafe { self.gl.create_texture() }
            .map_err(|e| engine_err!("lumen::gl", "Failed to create texture: {}", e))?;

        let id = TextureId::from(texture.0);
        self.textures.insert(id, texture);
        engine_trace!("lumen::gl", "glGenTextures -> {}", id);
        Ok(id)
    }

    fn bind_texture(&mut self, id: TextureId) {
        let texture = self.textures.get(&id).copied();
        if texture.is_none() {
            engine_warn!("lumen::gl", "Binding unknown texture {}, unbinding instead", id);
        }
        unsafe { self.gl.bind_texture(glow::TEXTURE_2D, texture) };
    }

    fn set_wrap(&mut self, wrap: WrapMode) {
        let mode = wrap_mode_to_gl(wrap);
        unsafe {
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, mode);
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, mode);
        }
    }

    fn set_filter(&mut self, min_filter: FilterMode, mag_filter: FilterMode) {
        unsafe {
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, filter_mode_to_gl(min_filter));
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, filter_mode_to_gl(mag_filter));
        }
    }

    fn upload_image_2d(
        &mut self,
        width: u32,
        height: u32,
        format: TextureFormat,
        data: &[u8],
    ) -> Result<()> {
        let expected = width as usize * height as usize * format.bytes_per_pixel() as usize;
        if data.len() != expected {
            return Err(Error::InvalidResource(format!(
                "{}x{} {:?} upload needs {} bytes, got {}", width, height, format, expected, data.len()
            )));
        }
        let Some((gl_width, gl_height)) = gl_image_size(width, height) else {
            engine_bail!("lumen::gl", "Texture size {}x{} exceeds GL limits", width, height);
        };

        let (internal_format, pixel_format, pixel_type) = texture_format_to_gl(format);
        unsafe {
            self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                internal_format,
                gl_width,
                gl_height,
                0,
                pixel_format,
                pixel_type,
                Some(data),
            );
        }
        self.check_gl_error("glTexImage2D")
    }

    fn delete_texture(&mut self, id: TextureId) {
        match self.textures.remove(&id) {
            Some(texture) => {
                unsafe { self.gl.delete_texture(texture) };
                engine_trace!("lumen::gl", "glDeleteTextures({})", id);
            }
            None => {
                engine_warn!("lumen::gl", "Delete of unknown texture {}, ignored", id);
            }
        }
    }

    fn set_active_sampler_slot(&mut self, slot: u32) {
        debug_assert!(slot < MAX_SAMPLER_SLOTS, "sampler slot {} out of range", slot);
        unsafe { self.gl.active_texture(sampler_slot_to_gl(slot)) };
    }
}

/// `(width, height)` as the signed sizes `glTexImage2D` takes
fn gl_image_size(width: u32, height: u32) -> Option<(i32, i32)> {
    Some((i32::try_from(width).ok()?, i32::try_from(height).ok()?))
}

impl Drop for GlGraphicsDevice {
    fn drop(&mut self) {
        if self.textures.is_empty() {
            return;
        }
        engine_warn!("lumen::gl", "Dropping GL device with {} live textures", self.textures.len());
        for (_, texture) in self.textures.drain() {
            unsafe { self.gl.delete_texture(texture) };
        }
    }
}

#[cfg(test)]
#[path = "gl_graphics_device_tests.rs"]
mod tests;

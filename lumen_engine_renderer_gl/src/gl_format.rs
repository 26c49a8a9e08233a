/// Conversions from engine texture enums to OpenGL constants

use lumen_engine::lumen::graphics_device::{FilterMode, TextureFormat, WrapMode};

/// GL wrap mode for `TEXTURE_WRAP_S` / `TEXTURE_WRAP_T`
pub fn wrap_mode_to_gl(wrap: WrapMode) -> i32 {
    let mode = match wrap {
        WrapMode::Repeat => glow::REPEAT,
        WrapMode::MirroredRepeat => glow::MIRRORED_REPEAT,
        WrapMode::ClampToEdge => glow::CLAMP_TO_EDGE,
    };
    mode as i32
}

/// GL filter for `TEXTURE_MIN_FILTER` / `TEXTURE_MAG_FILTER`
///
/// Textures carry no mip-maps, so minification never uses a mipmap filter.
pub fn filter_mode_to_gl(filter: FilterMode) -> i32 {
    let mode = match filter {
        FilterMode::Linear => glow::LINEAR,
        FilterMode::Nearest => glow::NEAREST,
    };
    mode as i32
}

/// `(internal_format, format, type)` triple for `glTexImage2D`
pub fn texture_format_to_gl(format: TextureFormat) -> (i32, u32, u32) {
    match format {
        TextureFormat::R8G8B8A8_UNORM => (glow::RGBA8 as i32, glow::RGBA, glow::UNSIGNED_BYTE),
        TextureFormat::R8G8B8A8_SRGB => (glow::SRGB8_ALPHA8 as i32, glow::RGBA, glow::UNSIGNED_BYTE),
    }
}

/// Texture unit enum for a sampler slot (`GL_TEXTURE0 + slot`)
pub fn sampler_slot_to_gl(slot: u32) -> u32 {
    glow::TEXTURE0 + slot
}

#[cfg(test)]
#[path = "gl_format_tests.rs"]
mod tests;

/*!
# Lumen Engine - OpenGL Backend

OpenGL implementation of the Lumen `GraphicsDevice` trait, using the glow
bindings.

The caller owns the window and the GL context; `GlGraphicsDevice` only
issues texture calls against a `glow::Context` that must be current on the
calling thread.
*/

mod gl_format;
mod gl_graphics_device;

pub use gl_graphics_device::GlGraphicsDevice;
pub use gl_format::{wrap_mode_to_gl, filter_mode_to_gl, texture_format_to_gl, sampler_slot_to_gl};

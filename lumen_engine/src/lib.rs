/*!
# Lumen Engine

Texture resource cache and GPU upload pipeline for the Lumen rendering engine.

Image files are decoded to tightly packed RGBA8, uploaded through the
backend-agnostic `GraphicsDevice` trait, and shared by key with reference
counting. Backends (OpenGL via `lumen_engine_renderer_gl`, mocks in tests)
implement `GraphicsDevice`.

## Architecture

- **PixelDecoder**: turns an image file into RGBA8 pixels (`ImageFileDecoder`)
- **GpuTexture**: owns one GPU texture object, deleted on drop
- **TextureCache**: key-to-texture registry with per-key reference counts
- **Texture**: client-facing handle that acquires on creation and releases on drop
- **Engine**: process-wide device, cache and logger slots
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod graphics_device;
pub mod resource;

// Main lumen namespace module
pub mod lumen {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // GPU API boundary
    pub mod graphics_device {
        pub use crate::graphics_device::*;
    }

    // Texture resources
    pub mod resource {
        pub use crate::resource::*;
    }
}

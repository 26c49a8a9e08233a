/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Behaves like a tiny OpenGL texture state machine: it hands out
/// never-reused ids, tracks the bound texture per sampler slot, remembers
/// the parameters and upload size of every live texture, and records every
/// call so tests can assert on exact GPU traffic.

use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::engine_bail;
use crate::graphics_device::{
    GraphicsDevice, TextureId, TextureFormat, WrapMode, FilterMode,
    MAX_SAMPLER_SLOTS,
};

// ============================================================================
// Mock Texture
// ============================================================================

/// State of one live mock texture
#[derive(Debug, Clone, Default)]
pub struct MockTexture {
    pub wrap: Option<WrapMode>,
    pub min_filter: Option<FilterMode>,
    pub mag_filter: Option<FilterMode>,
    pub width: u32,
    pub height: u32,
    pub format: Option<TextureFormat>,
    pub data: Vec<u8>,
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

#[derive(Debug)]
pub struct MockGraphicsDevice {
    /// Every call, in order (e.g. "create_texture -> #1", "bind_texture(#1)")
    pub commands: Vec<String>,
    /// Live textures by id
    pub textures: FxHashMap<TextureId, MockTexture>,
    /// Texture bound on each sampler slot
    pub bound: [Option<TextureId>; MAX_SAMPLER_SLOTS as usize],
    /// Currently active sampler slot
    pub active_slot: u32,
    /// Ids passed to `delete_texture`, in order
    pub deleted: Vec<TextureId>,
    /// When set, `upload_image_2d` fails
    pub fail_uploads: bool,
    /// When set, `create_texture` fails
    pub fail_creates: bool,
    next_id: u32,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            textures: FxHashMap::default(),
            bound: [None; MAX_SAMPLER_SLOTS as usize],
            active_slot: 0,
            deleted: Vec::new(),
            fail_uploads: false,
            fail_creates: false,
            next_id: 1,
        }
    }

    /// Number of textures allocated so far (live or deleted)
    pub fn created_count(&self) -> usize {
        (self.next_id - 1) as usize
    }

    /// Number of live textures
    pub fn live_count(&self) -> usize {
        self.textures.len()
    }

    /// Whether `id` is still allocated
    pub fn is_live(&self, id: TextureId) -> bool {
        self.textures.contains_key(&id)
    }

    /// Texture bound to the active slot
    fn bound_texture_mut(&mut self) -> Option<&mut MockTexture> {
        let id = self.bound[self.active_slot as usize]?;
        self.textures.get_mut(&id)
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_texture(&mut self) -> Result<TextureId> {
        if self.fail_creates {
            engine_bail!("lumen::mock", "create_texture: out of texture names");
        }
        let Some(id) = TextureId::new(self.next_id) else {
            engine_bail!("lumen::mock", "create_texture: id counter wrapped");
        };
        self.next_id += 1;
        self.textures.insert(id, MockTexture::default());
        self.commands.push(format!("create_texture -> {}", id));
        Ok(id)
    }

    fn bind_texture(&mut self, id: TextureId) {
        self.commands.push(format!("bind_texture({})", id));
        self.bound[self.active_slot as usize] = Some(id);
    }

    fn set_wrap(&mut self, wrap: WrapMode) {
        self.commands.push(format!("set_wrap({:?})", wrap));
        if let Some(texture) = self.bound_texture_mut() {
            texture.wrap = Some(wrap);
        }
    }

    fn set_filter(&mut self, min_filter: FilterMode, mag_filter: FilterMode) {
        self.commands.push(format!("set_filter({:?}, {:?})", min_filter, mag_filter));
        if let Some(texture) = self.bound_texture_mut() {
            texture.min_filter = Some(min_filter);
            texture.mag_filter = Some(mag_filter);
        }
    }

    fn upload_image_2d(
        &mut self,
        width: u32,
        height: u32,
        format: TextureFormat,
        data: &[u8],
    ) -> Result<()> {
        self.commands.push(format!("upload_image_2d({}x{}, {:?}, {} bytes)",
            width, height, format, data.len()));
        if self.fail_uploads {
            engine_bail!("lumen::mock", "upload_image_2d: simulated upload failure");
        }
        let Some(texture) = self.bound_texture_mut() else {
            engine_bail!("lumen::mock", "upload_image_2d: no texture bound");
        };
        texture.width = width;
        texture.height = height;
        texture.format = Some(format);
        texture.data = data.to_vec();
        Ok(())
    }

    fn delete_texture(&mut self, id: TextureId) {
        self.commands.push(format!("delete_texture({})", id));
        assert!(self.textures.remove(&id).is_some(), "delete_texture: {} is not live", id);
        for slot in self.bound.iter_mut() {
            if *slot == Some(id) {
                *slot = None;
            }
        }
        self.deleted.push(id);
    }

    fn set_active_sampler_slot(&mut self, slot: u32) {
        self.commands.push(format!("set_active_sampler_slot({})", slot));
        self.active_slot = slot;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;

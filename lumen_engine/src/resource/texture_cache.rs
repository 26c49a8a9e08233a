/// Engine-wide texture cache.
///
/// Deduplicates textures by key: the first `acquire` of a key decodes the
/// file under the asset root and uploads it, later acquires of the same key
/// share that GPU texture and bump its reference count. `release` undoes one
/// acquire; the GPU texture is deleted when the count reaches zero.
///
/// The empty key is anonymous: it bypasses the registry entirely and yields
/// a texture owned by its caller alone.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Weak};
use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::graphics_device::{GraphicsDevice, TextureId, TextureParams};
use crate::{engine_debug, engine_trace, engine_warn};
use super::gpu_texture::GpuTexture;
use super::pixel_decoder::{PixelDecoder, ImageFileDecoder};

/// Default directory texture keys are resolved against
pub const DEFAULT_ASSET_ROOT: &str = "./res/textures";

// ===== CONFIG =====

/// Texture cache configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureCacheConfig {
    /// Directory that texture keys are relative to
    pub asset_root: PathBuf,
}

impl Default for TextureCacheConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from(DEFAULT_ASSET_ROOT),
        }
    }
}

// ===== HANDLE REF =====

/// What `acquire` hands back
pub enum TextureHandleRef {
    /// Non-owning reference to a registry entry's texture
    ///
    /// Stays upgradable until the matching `release` drops the entry.
    Cached(Weak<GpuTexture>),

    /// Texture built for the anonymous key, owned by the caller alone
    Anonymous(GpuTexture),
}

impl fmt::Debug for TextureHandleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureHandleRef::Cached(weak) => f.debug_tuple("Cached")
                .field(&weak.upgrade().map(|t| t.id()))
                .finish(),
            TextureHandleRef::Anonymous(texture) => f.debug_tuple("Anonymous")
                .field(&texture.id())
                .finish(),
        }
    }
}

/// Normalize a texture key: forward slashes, no leading `./`
///
/// `"./walls\\bricks.png"` and `"walls/bricks.png"` name the same texture.
pub fn canonical_texture_key(name: &str) -> String {
    let mut key = name.replace('\\', "/");
    while let Some(rest) = key.strip_prefix("./") {
        key = rest.to_string();
    }
    key
}

// ===== CACHE =====

struct CacheEntry {
    texture: Arc<GpuTexture>,
    ref_count: usize,
}

/// Texture cache (one per graphics device)
///
/// Share it as `Arc<Mutex<TextureCache>>`; `Texture` facades keep a clone of
/// that `Arc` so they can release on drop. Starts empty and has no global
/// teardown: entries leave one at a time as their last facade goes away.
/// Dropping the cache itself drops whatever entries remain.
pub struct TextureCache {
    device: Arc<Mutex<dyn GraphicsDevice>>,
    decoder: Box<dyn PixelDecoder>,
    config: TextureCacheConfig,
    entries: FxHashMap<String, CacheEntry>,
}

impl TextureCache {
    /// Create an empty cache decoding image files with `ImageFileDecoder`
    pub fn new(device: Arc<Mutex<dyn GraphicsDevice>>, config: TextureCacheConfig) -> Self {
        Self::with_decoder(device, config, Box::new(ImageFileDecoder::new()))
    }

    /// Create an empty cache with a custom decoder
    pub fn with_decoder(
        device: Arc<Mutex<dyn GraphicsDevice>>,
        config: TextureCacheConfig,
        decoder: Box<dyn PixelDecoder>,
    ) -> Self {
        Self {
            device,
            decoder,
            config,
            entries: FxHashMap::default(),
        }
    }

    /// Get or create the texture for `key`
    ///
    /// - empty key: decode and upload a standalone texture, never registered
    /// - known key: increment its reference count and share its texture
    /// - new key: decode `asset_root/key`, upload, register with count 1
    ///
    /// # Errors
    ///
    /// `DecodeError` if the image cannot be decoded, `InvalidResource` or
    /// `BackendError` if the upload fails. Nothing is registered on failure.
    pub fn acquire(&mut self, key: &str) -> Result<TextureHandleRef> {
        let key = canonical_texture_key(key);
        if key.is_empty() {
            return self.acquire_uncached("");
        }

        if let Some(entry) = self.entries.get_mut(&key) {
            entry.ref_count += 1;
            engine_trace!("lumen::TextureCache",
                "Reusing '{}' ({}), {} references", key, entry.texture.id(), entry.ref_count);
            return Ok(TextureHandleRef::Cached(Arc::downgrade(&entry.texture)));
        }

        let texture = Arc::new(self.load(&key)?);
        engine_debug!("lumen::TextureCache",
            "Loaded '{}' as {} ({}x{})", key, texture.id(), texture.width(), texture.height());

        let handle = Arc::downgrade(&texture);
        self.entries.insert(key, CacheEntry { texture, ref_count: 1 });
        Ok(TextureHandleRef::Cached(handle))
    }

    /// Decode `file_name` into a texture that is never registered or shared
    ///
    /// Two calls with the same file produce two distinct GPU textures.
    pub fn acquire_uncached(&mut self, file_name: &str) -> Result<TextureHandleRef> {
        let texture = self.load(&canonical_texture_key(file_name))?;
        engine_debug!("lumen::TextureCache",
            "Loaded anonymous texture {} from '{}'", texture.id(), file_name);
        Ok(TextureHandleRef::Anonymous(texture))
    }

    /// Drop one reference to `key`
    ///
    /// When the last reference goes, the entry is removed and its GPU
    /// texture deleted. Releasing the anonymous key or a key with no entry
    /// does nothing.
    pub fn release(&mut self, key: &str) {
        let key = canonical_texture_key(key);
        if key.is_empty() {
            engine_trace!("lumen::TextureCache", "Release of the anonymous key ignored");
            return;
        }

        let Some(entry) = self.entries.get_mut(&key) else {
            engine_warn!("lumen::TextureCache", "Release of '{}' which is not cached, ignored", key);
            return;
        };

        debug_assert!(entry.ref_count > 0, "cache entry '{}' alive with zero references", key);
        entry.ref_count -= 1;
        if entry.ref_count > 0 {
            engine_trace!("lumen::TextureCache",
                "Released '{}', {} references left", key, entry.ref_count);
            return;
        }

        if let Some(entry) = self.entries.remove(&key) {
            engine_debug!("lumen::TextureCache", "Freed '{}' ({})", key, entry.texture.id());
        }
    }

    /// Whether `key` currently has an entry
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&canonical_texture_key(key))
    }

    /// Live reference count of `key`, `None` if not cached
    pub fn ref_count(&self, key: &str) -> Option<usize> {
        self.entries.get(&canonical_texture_key(key)).map(|entry| entry.ref_count)
    }

    /// GPU identifier of `key`, `None` if not cached
    pub fn texture_id(&self, key: &str) -> Option<TextureId> {
        self.entries.get(&canonical_texture_key(key)).map(|entry| entry.texture.id())
    }

    /// Number of cached textures
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Keys of all cached textures
    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(|k| k.as_str()).collect()
    }

    /// Cache configuration
    pub fn config(&self) -> &TextureCacheConfig {
        &self.config
    }

    /// Device textures are created on
    pub fn graphics_device(&self) -> &Arc<Mutex<dyn GraphicsDevice>> {
        &self.device
    }

    fn load(&self, key: &str) -> Result<GpuTexture> {
        let path = self.resolve(key);
        let image = self.decoder.decode(&path)?;
        GpuTexture::create(
            self.device.clone(),
            image.width,
            image.height,
            &image.pixels,
            TextureParams::default(),
        )
    }

    fn resolve(&self, key: &str) -> PathBuf {
        self.config.asset_root.join(Path::new(key))
    }
}

impl fmt::Debug for TextureCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureCache")
            .field("config", &self.config)
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "texture_cache_tests.rs"]
mod tests;

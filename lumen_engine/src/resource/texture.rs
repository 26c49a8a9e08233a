/// Client-facing texture handle.
///
/// A `Texture` is what game code holds. Creating one acquires its key from a
/// `TextureCache`; disposing or dropping it releases that key exactly once.
/// Textures with the same key share one GPU texture.
///
/// To share a single facade, wrap it in `Arc`/`Rc`. Creating a second facade
/// for the same key is also cheap: it only bumps the cache's count.
///
/// # Example
///
/// ```no_run
/// use std::sync::{Arc, Mutex};
/// use lumen_engine::lumen::resource::{Texture, TextureCache, TextureCacheConfig};
/// # fn device() -> Arc<Mutex<dyn lumen_engine::lumen::graphics_device::GraphicsDevice>> { unimplemented!() }
///
/// let cache = Arc::new(Mutex::new(TextureCache::new(device(), TextureCacheConfig::default())));
/// let bricks = Texture::new(&cache, "bricks.png")?;
/// bricks.bind()?;             // sampler slot 0
/// bricks.bind_to_slot(2)?;
/// drop(bricks);               // last reference: GPU texture deleted
/// # Ok::<(), lumen_engine::lumen::Error>(())
/// ```

use std::fmt;
use std::sync::{Arc, Mutex, Weak};
use crate::error::{Error, Result};
use crate::graphics_device::TextureId;
use crate::engine_error;
use super::gpu_texture::GpuTexture;
use super::texture_cache::{TextureCache, TextureHandleRef, canonical_texture_key};

enum TextureBinding {
    /// Registered in `cache` under the facade's key
    Cached {
        cache: Arc<Mutex<TextureCache>>,
        texture: Weak<GpuTexture>,
    },
    /// Anonymous texture owned by this facade alone
    Owned(GpuTexture),
}

pub struct Texture {
    key: String,
    binding: Option<TextureBinding>,
}

impl Texture {
    /// Acquire `key` from `cache`
    ///
    /// An empty key creates an anonymous texture that is never registered.
    ///
    /// # Errors
    ///
    /// `DecodeError` if the image cannot be decoded, `BackendError` if the
    /// cache lock is poisoned or the upload fails.
    pub fn new(cache: &Arc<Mutex<TextureCache>>, key: &str) -> Result<Self> {
        let key = canonical_texture_key(key);
        let handle = lock_cache(cache)?.acquire(&key)?;
        Ok(Self::from_handle(cache, key, handle))
    }

    /// Load `file_name` as an anonymous texture (never registered or shared)
    pub fn new_uncached(cache: &Arc<Mutex<TextureCache>>, file_name: &str) -> Result<Self> {
        let handle = lock_cache(cache)?.acquire_uncached(file_name)?;
        Ok(Self::from_handle(cache, String::new(), handle))
    }

    fn from_handle(cache: &Arc<Mutex<TextureCache>>, key: String, handle: TextureHandleRef) -> Self {
        let binding = match handle {
            TextureHandleRef::Cached(texture) => TextureBinding::Cached {
                cache: cache.clone(),
                texture,
            },
            TextureHandleRef::Anonymous(texture) => TextureBinding::Owned(texture),
        };
        Self {
            key,
            binding: Some(binding),
        }
    }

    /// Bind to sampler slot 0
    pub fn bind(&self) -> Result<()> {
        self.bind_to_slot(0)
    }

    /// Bind to `slot`
    ///
    /// # Panics
    ///
    /// If `slot >= MAX_SAMPLER_SLOTS` (32).
    ///
    /// # Errors
    ///
    /// `InvalidResource` if the texture was disposed or its cache entry no
    /// longer exists.
    pub fn bind_to_slot(&self, slot: u32) -> Result<()> {
        match self.binding()? {
            TextureBinding::Cached { texture, .. } => self.upgrade(texture)?.bind(slot),
            TextureBinding::Owned(texture) => texture.bind(slot),
        }
    }

    /// GPU identifier of the underlying texture
    pub fn id(&self) -> Result<TextureId> {
        match self.binding()? {
            TextureBinding::Cached { texture, .. } => Ok(self.upgrade(texture)?.id()),
            TextureBinding::Owned(texture) => Ok(texture.id()),
        }
    }

    /// Cache key (empty for anonymous textures)
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether this texture bypasses the cache
    pub fn is_anonymous(&self) -> bool {
        self.key.is_empty()
    }

    /// Whether `dispose` already ran
    pub fn is_disposed(&self) -> bool {
        self.binding.is_none()
    }

    /// Release this texture's reference now
    ///
    /// Later calls (and the eventual drop) do nothing.
    pub fn dispose(&mut self) {
        match self.binding.take() {
            Some(TextureBinding::Cached { cache, .. }) => {
                let mut guard = match cache.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => {
                        engine_error!("lumen::Texture",
                            "TextureCache lock poisoned while releasing '{}'", self.key);
                        poisoned.into_inner()
                    }
                };
                debug_assert!(guard.contains(&self.key),
                    "texture '{}' released with no cache entry", self.key);
                guard.release(&self.key);
            }
            Some(TextureBinding::Owned(texture)) => drop(texture),
            None => {}
        }
    }

    fn binding(&self) -> Result<&TextureBinding> {
        self.binding.as_ref().ok_or_else(|| Error::InvalidResource(format!(
            "texture '{}' used after dispose", self.key
        )))
    }

    fn upgrade(&self, texture: &Weak<GpuTexture>) -> Result<Arc<GpuTexture>> {
        texture.upgrade().ok_or_else(|| Error::InvalidResource(format!(
            "texture '{}' is no longer cached", self.key
        )))
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("key", &self.key)
            .field("id", &self.id().ok())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

fn lock_cache(cache: &Arc<Mutex<TextureCache>>) -> Result<std::sync::MutexGuard<'_, TextureCache>> {
    cache.lock()
        .map_err(|_| Error::BackendError("TextureCache lock poisoned".to_string()))
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;

/// Lumen Engine - Singleton manager for engine subsystems
///
/// Holds the process-wide graphics device and texture cache slots, plus the
/// installed logger. All slots live in thread-safe static storage behind
/// RwLock.

use std::sync::{OnceLock, RwLock, Arc, Mutex};
use std::time::SystemTime;
use crate::graphics_device::GraphicsDevice;
use crate::resource::{TextureCache, TextureCacheConfig};
use crate::error::{Result, Error};
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

// ===== INTERNAL STATE =====

/// Global engine state storage
static ENGINE_STATE: OnceLock<EngineState> = OnceLock::new();

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Internal state structure holding all engine singletons
struct EngineState {
    /// Graphics device singleton
    graphics_device: RwLock<Option<Arc<Mutex<dyn GraphicsDevice>>>>,
    /// Texture cache singleton (bound to the graphics device above)
    texture_cache: RwLock<Option<Arc<Mutex<TextureCache>>>>,
}

impl EngineState {
    fn new() -> Self {
        Self {
            graphics_device: RwLock::new(None),
            texture_cache: RwLock::new(None),
        }
    }
}

fn engine_state() -> Result<&'static EngineState> {
    ENGINE_STATE.get()
        .ok_or_else(|| Engine::log_and_return_error(
            Error::InitializationFailed("Engine not initialized. Call Engine::initialize() first.".to_string())
        ))
}

// ===== PUBLIC API =====

/// Main engine singleton manager
///
/// # Example
///
/// ```no_run
/// use std::sync::{Arc, Mutex};
/// use lumen_engine::lumen::Engine;
/// use lumen_engine::lumen::resource::{Texture, TextureCacheConfig};
/// # fn device() -> Arc<Mutex<dyn lumen_engine::lumen::graphics_device::GraphicsDevice>> { unimplemented!() }
///
/// Engine::initialize()?;
/// Engine::register_graphics_device(device())?;
/// Engine::create_texture_cache(TextureCacheConfig::default())?;
///
/// let cache = Engine::texture_cache()?;
/// let bricks = Texture::new(&cache, "bricks.png")?;
/// bricks.bind()?;
/// drop(bricks);
///
/// Engine::shutdown();
/// # Ok::<(), lumen_engine::lumen::Error>(())
/// ```
pub struct Engine;

impl Engine {
    /// Helper to log errors before returning them (internal use)
    fn log_and_return_error(error: Error) -> Error {
        match &error {
            Error::InitializationFailed(msg) => {
                crate::engine_error!("lumen::Engine", "Initialization failed: {}", msg);
            }
            Error::BackendError(msg) => {
                crate::engine_error!("lumen::Engine", "Backend error: {}", msg);
            }
            _ => {
                crate::engine_error!("lumen::Engine", "Engine error: {}", error);
            }
        }
        error
    }

    /// Initialize the engine
    ///
    /// Must be called once at startup before creating any subsystem. Calling
    /// it again is harmless.
    pub fn initialize() -> Result<()> {
        ENGINE_STATE.get_or_init(EngineState::new);
        Ok(())
    }

    /// Shutdown the engine and destroy all singletons
    ///
    /// The texture cache is cleared before the graphics device. Textures that
    /// outlive the shutdown keep their cache and device alive until dropped.
    pub fn shutdown() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut cache) = state.texture_cache.write() {
                *cache = None;
            }
            if let Ok(mut device) = state.graphics_device.write() {
                *device = None;
            }
        }
    }

    // ===== GRAPHICS DEVICE API =====

    /// Create and register the graphics device singleton
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The engine is not initialized
    /// - A graphics device already exists
    /// - The slot lock is poisoned
    pub fn create_graphics_device<D: GraphicsDevice + 'static>(device: D) -> Result<()> {
        let device: Arc<Mutex<dyn GraphicsDevice>> = Arc::new(Mutex::new(device));
        Self::register_graphics_device(device)?;

        crate::engine_info!("lumen::Engine", "GraphicsDevice singleton created successfully");
        Ok(())
    }

    /// Register an already shared graphics device
    pub fn register_graphics_device(device: Arc<Mutex<dyn GraphicsDevice>>) -> Result<()> {
        let state = engine_state()?;

        let mut lock = state.graphics_device.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("GraphicsDevice lock poisoned".to_string())
            ))?;

        if lock.is_some() {
            return Err(Self::log_and_return_error(
                Error::InitializationFailed("GraphicsDevice already exists. Call Engine::destroy_graphics_device() first.".to_string())
            ));
        }

        *lock = Some(device);
        Ok(())
    }

    /// Get the graphics device singleton
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is not initialized or no device has
    /// been created.
    pub fn graphics_device() -> Result<Arc<Mutex<dyn GraphicsDevice>>> {
        let state = engine_state()?;

        let lock = state.graphics_device.read()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("GraphicsDevice lock poisoned".to_string())
            ))?;

        lock.clone()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("GraphicsDevice not created. Call Engine::create_graphics_device() first.".to_string())
            ))
    }

    /// Destroy the graphics device singleton
    ///
    /// Existing references (including those held by a texture cache) stay
    /// valid until dropped.
    pub fn destroy_graphics_device() -> Result<()> {
        let state = engine_state()?;

        let mut lock = state.graphics_device.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("GraphicsDevice lock poisoned".to_string())
            ))?;

        *lock = None;

        crate::engine_info!("lumen::Engine", "GraphicsDevice singleton destroyed");
        Ok(())
    }

    // ===== TEXTURE CACHE API =====

    /// Create and register the texture cache singleton on the current device
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The engine is not initialized
    /// - No graphics device has been created
    /// - A texture cache already exists
    pub fn create_texture_cache(config: TextureCacheConfig) -> Result<()> {
        let device = Self::graphics_device()?;
        let state = engine_state()?;

        let mut lock = state.texture_cache.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("TextureCache lock poisoned".to_string())
            ))?;

        if lock.is_some() {
            return Err(Self::log_and_return_error(
                Error::InitializationFailed("TextureCache already exists. Call Engine::destroy_texture_cache() first.".to_string())
            ));
        }

        crate::engine_info!("lumen::Engine",
            "TextureCache singleton created (asset root '{}')", config.asset_root.display());
        *lock = Some(Arc::new(Mutex::new(TextureCache::new(device, config))));

        Ok(())
    }

    /// Get the texture cache singleton
    pub fn texture_cache() -> Result<Arc<Mutex<TextureCache>>> {
        let state = engine_state()?;

        let lock = state.texture_cache.read()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("TextureCache lock poisoned".to_string())
            ))?;

        lock.clone()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("TextureCache not created. Call Engine::create_texture_cache() first.".to_string())
            ))
    }

    /// Destroy the texture cache singleton
    ///
    /// Live `Texture` facades hold their own reference to the cache, so
    /// their GPU textures are freed as they are dropped.
    pub fn destroy_texture_cache() -> Result<()> {
        let state = engine_state()?;

        let mut lock = state.texture_cache.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("TextureCache lock poisoned".to_string())
            ))?;

        *lock = None;

        crate::engine_info!("lumen::Engine", "TextureCache singleton destroyed");
        Ok(())
    }

    /// Reset all singletons for testing (only available in test builds)
    #[cfg(test)]
    pub fn reset_for_testing() {
        Self::shutdown();
    }

    // ===== FATAL ERRORS =====

    /// Unwrap `result`, or log the error and terminate the process
    ///
    /// For applications that treat a missing or corrupt texture as fatal.
    /// Exits with status 1.
    pub fn exit_on_error<T>(result: Result<T>) -> T {
        match result {
            Ok(value) => value,
            Err(error) => {
                crate::engine_error!("lumen::Engine", "Fatal: {}", error);
                std::process::exit(1);
            }
        }
    }

    // ===== LOGGING API =====

    /// Set a custom logger
    ///
    /// # Example
    ///
    /// ```no_run
    /// use lumen_engine::lumen::{Engine, log::{Logger, LogEntry}};
    ///
    /// struct FileLogger;
    /// impl Logger for FileLogger {
    ///     fn log(&self, entry: &LogEntry) {
    ///         // Write to file...
    ///     }
    /// }
    ///
    /// Engine::set_logger(FileLogger);
    /// ```
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like engine_info!, engine_warn!, etc.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Internal logging method with file:line information (for ERROR logs)
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

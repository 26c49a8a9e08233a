/// Tests for GpuTexture
///
/// These tests use MockGraphicsDevice to check the exact GPU call sequence
/// without requiring a GPU.

use super::*;
use crate::graphics_device::mock_graphics_device::MockGraphicsDevice;
use crate::graphics_device::{WrapMode, FilterMode};

// ============================================================================
// Helper Functions
// ============================================================================

fn create_mock_device() -> (Arc<Mutex<MockGraphicsDevice>>, Arc<Mutex<dyn GraphicsDevice>>) {
    let mock = Arc::new(Mutex::new(MockGraphicsDevice::new()));
    let device: Arc<Mutex<dyn GraphicsDevice>> = mock.clone();
    (mock, device)
}

fn white_pixels(width: u32, height: u32) -> Vec<u8> {
    vec![255u8; (width * height * 4) as usize]
}

// ============================================================================
// Tests: Creation
// ============================================================================

#[test]
fn test_create_uploads_with_default_params() {
    let (mock, device) = create_mock_device();

    let texture = GpuTexture::create(device, 2, 2, &white_pixels(2, 2), TextureParams::default()).unwrap();

    let mock = mock.lock().unwrap();
    assert_eq!(mock.commands, vec![
        "create_texture -> #1".to_string(),
        "bind_texture(#1)".to_string(),
        "set_wrap(Repeat)".to_string(),
        "set_filter(Linear, Linear)".to_string(),
        "upload_image_2d(2x2, R8G8B8A8_UNORM, 16 bytes)".to_string(),
    ]);
    let uploaded = &mock.textures[&texture.id()];
    assert_eq!((uploaded.width, uploaded.height), (2, 2));
    assert_eq!(uploaded.format, Some(TextureFormat::R8G8B8A8_UNORM));
}

#[test]
fn test_create_with_custom_params() {
    let (mock, device) = create_mock_device();
    let params = TextureParams {
        wrap: WrapMode::ClampToEdge,
        min_filter: FilterMode::Nearest,
        mag_filter: FilterMode::Nearest,
    };

    let texture = GpuTexture::create(device, 1, 1, &white_pixels(1, 1), params).unwrap();

    assert_eq!(texture.params(), params);
    let mock = mock.lock().unwrap();
    assert_eq!(mock.textures[&texture.id()].wrap, Some(WrapMode::ClampToEdge));
}

#[test]
fn test_create_exposes_dimensions() {
    let (_mock, device) = create_mock_device();
    let texture = GpuTexture::create(device, 4, 3, &white_pixels(4, 3), TextureParams::default()).unwrap();
    assert_eq!(texture.width(), 4);
    assert_eq!(texture.height(), 3);
}

#[test]
fn test_create_rejects_wrong_buffer_size() {
    let (mock, device) = create_mock_device();

    let result = GpuTexture::create(device, 2, 2, &[0u8; 12], TextureParams::default());

    assert!(matches!(result, Err(Error::InvalidResource(_))));
    assert_eq!(mock.lock().unwrap().created_count(), 0);
}

#[test]
fn test_create_rejects_zero_dimensions() {
    let (_mock, device) = create_mock_device();
    let result = GpuTexture::create(device, 0, 4, &[], TextureParams::default());
    assert!(matches!(result, Err(Error::InvalidResource(_))));
}

#[test]
fn test_create_failed_upload_deletes_allocated_texture() {
    let (mock, device) = create_mock_device();
    mock.lock().unwrap().fail_uploads = true;

    let result = GpuTexture::create(device, 1, 1, &white_pixels(1, 1), TextureParams::default());

    assert!(result.is_err());
    let mock = mock.lock().unwrap();
    assert_eq!(mock.created_count(), 1);
    assert_eq!(mock.live_count(), 0);
    assert_eq!(mock.deleted.len(), 1);
}

#[test]
fn test_create_failed_allocation_propagates() {
    let (mock, device) = create_mock_device();
    mock.lock().unwrap().fail_creates = true;

    let result = GpuTexture::create(device, 1, 1, &white_pixels(1, 1), TextureParams::default());

    assert!(matches!(result, Err(Error::BackendError(_))));
    assert!(mock.lock().unwrap().deleted.is_empty());
}

// ============================================================================
// Tests: Bind
// ============================================================================

#[test]
fn test_bind_activates_slot_then_binds() {
    let (mock, device) = create_mock_device();
    let texture = GpuTexture::create(device, 1, 1, &white_pixels(1, 1), TextureParams::default()).unwrap();
    mock.lock().unwrap().commands.clear();

    texture.bind(7).unwrap();

    let mock = mock.lock().unwrap();
    assert_eq!(mock.commands, vec![
        "set_active_sampler_slot(7)".to_string(),
        "bind_texture(#1)".to_string(),
    ]);
    assert_eq!(mock.bound[7], Some(texture.id()));
}

#[test]
fn test_bind_last_valid_slot() {
    let (mock, device) = create_mock_device();
    let texture = GpuTexture::create(device, 1, 1, &white_pixels(1, 1), TextureParams::default()).unwrap();

    texture.bind(MAX_SAMPLER_SLOTS - 1).unwrap();

    assert_eq!(mock.lock().unwrap().bound[31], Some(texture.id()));
}

#[test]
#[should_panic(expected = "out of range")]
fn test_bind_slot_32_panics() {
    let (_mock, device) = create_mock_device();
    let texture = GpuTexture::create(device, 1, 1, &white_pixels(1, 1), TextureParams::default()).unwrap();
    let _ = texture.bind(32);
}

// ============================================================================
// Tests: Destruction
// ============================================================================

#[test]
fn test_drop_deletes_exactly_once() {
    let (mock, device) = create_mock_device();
    let texture = GpuTexture::create(device, 1, 1, &white_pixels(1, 1), TextureParams::default()).unwrap();
    let id = texture.id();

    drop(texture);

    let mock = mock.lock().unwrap();
    assert_eq!(mock.deleted, vec![id]);
    assert!(!mock.is_live(id));
}

#[test]
fn test_independent_textures_get_distinct_ids() {
    let (_mock, device) = create_mock_device();
    let a = GpuTexture::create(device.clone(), 1, 1, &white_pixels(1, 1), TextureParams::default()).unwrap();
    let b = GpuTexture::create(device, 1, 1, &white_pixels(1, 1), TextureParams::default()).unwrap();
    assert_ne!(a.id(), b.id());
}

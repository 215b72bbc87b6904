//! Vertex attribute quantization
//!
//! Converts f32 vertex attributes to the fixed-point encodings stored in BOB files:
//! - UV: f32 [0.0, 1.0] → unorm16 (0..65535)
//! - Normal: f32 [-1.0, 1.0] → snorm16 (-32767..32767)
//!
//! Encoding clamps, scales and truncates toward zero (no rounding). A clamp that
//! changes the input is logged as a warning, never treated as an error.

use glam::{Vec2, Vec3};

/// Scale between a [0, 1] UV component and its unorm16 encoding
pub const UV_SCALE: f32 = 65535.0;

/// Scale between a [-1, 1] normal component and its snorm16 encoding
pub const NORMAL_SCALE: f32 = 32767.0;

// ============================================================================
// Clamping
// ============================================================================

/// Clamp `value` to `[min, max]`, logging when the value changes
#[inline]
pub fn clamp_logged(value: f32, min: f32, max: f32) -> f32 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        tracing::warn!("clamped {} to {}", value, clamped);
    }
    clamped
}

/// Clamp both UV components to [0, 1]
#[inline]
pub fn clamp_uv(uv: Vec2) -> Vec2 {
    Vec2::new(clamp_logged(uv.x, 0.0, 1.0), clamp_logged(uv.y, 0.0, 1.0))
}

// ============================================================================
// UV
// ============================================================================

/// Convert f32 to unsigned normalized 16-bit integer (unorm16)
#[inline]
pub fn f32_to_unorm16(value: f32) -> u16 {
    (clamp_logged(value, 0.0, 1.0) * UV_SCALE) as u16
}

/// Quantize a UV coordinate to unorm16x2
///
/// `encode_uv(1.5, -0.2)` is `[65535, 0]`.
#[inline]
pub fn encode_uv(u: f32, v: f32) -> [u16; 2] {
    [f32_to_unorm16(u), f32_to_unorm16(v)]
}

/// Dequantize a unorm16x2 UV coordinate
#[inline]
pub fn decode_uv(u: u16, v: u16) -> Vec2 {
    Vec2::new(u as f32 / UV_SCALE, v as f32 / UV_SCALE)
}

/// Swap between the engine's and the caller's vertical texture convention
///
/// Applied once on export (after clamping) and once on import (after decoding).
#[inline]
pub fn flip_v(uv: Vec2) -> Vec2 {
    Vec2::new(uv.x, 1.0 - uv.y)
}

// ============================================================================
// Normal
// ============================================================================

/// Convert f32 to signed normalized 16-bit integer (snorm16)
///
/// Maps f32 range [-1.0, 1.0] to i16 range [-32767, 32767].
#[inline]
pub fn f32_to_snorm16(value: f32) -> i16 {
    (clamp_logged(value, -1.0, 1.0) * NORMAL_SCALE) as i16
}

/// Quantize a normal to snorm16x3
///
/// The vector is not normalized; each component is clamped independently.
#[inline]
pub fn encode_normal(x: f32, y: f32, z: f32) -> [i16; 3] {
    [f32_to_snorm16(x), f32_to_snorm16(y), f32_to_snorm16(z)]
}

/// Dequantize a snorm16x3 normal
#[inline]
pub fn decode_normal(x: i16, y: i16, z: i16) -> Vec3 {
    Vec3::new(
        x as f32 / NORMAL_SCALE,
        y as f32 / NORMAL_SCALE,
        z as f32 / NORMAL_SCALE,
    )
}

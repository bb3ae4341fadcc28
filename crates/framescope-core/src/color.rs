//! Deterministic colors for primitives that do not specify one.
//!
//! A primitive's position inside its frame is hashed into a hue plus a small
//! saturation/value jitter. The hash is pure, so parsing the same text twice
//! always gives the same colors.

use glam::{Vec3, Vec4};

const SATURATION_RANGE: (f32, f32) = (0.3, 0.9);
const VALUE_RANGE: (f32, f32) = (0.6, 1.0);

/// Integer avalanche followed by the PCG output permutation.
#[must_use]
pub fn identity_hash(id: u32) -> u32 {
    let mut x = id;
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;

    let state = x.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
    let word = ((state >> ((state >> 28) + 4)) ^ state).wrapping_mul(277_803_737);
    (word >> 22) ^ word
}

/// Returns the RGBA color for a primitive identified by `id`.
///
/// Alpha is always 1.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn color_for(id: usize) -> Vec4 {
    let folded = (id as u64 ^ (id as u64 >> 32)) as u32;
    let h = identity_hash(folded);

    let hue = (h & 0xFFFF) as f32 / 65536.0;
    let sat_jitter = f32::from(((h >> 16) & 0xFF) as u8) / 255.0;
    let val_jitter = f32::from((h >> 24) as u8) / 255.0;

    let saturation = (SATURATION_RANGE.0 + sat_jitter * (SATURATION_RANGE.1 - SATURATION_RANGE.0))
        .clamp(SATURATION_RANGE.0, SATURATION_RANGE.1);
    let value = (VALUE_RANGE.0 + val_jitter * (VALUE_RANGE.1 - VALUE_RANGE.0))
        .clamp(VALUE_RANGE.0, VALUE_RANGE.1);

    hsv_to_rgb(hue, saturation, value).extend(1.0)
}

/// Converts HSV (all components in `[0, 1]`) to RGB.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> Vec3 {
    let h = hue.rem_euclid(1.0) * 6.0;
    let sector = h.floor();
    let f = h - sector;
    let p = value * (1.0 - saturation);
    let q = value * (1.0 - saturation * f);
    let t = value * (1.0 - saturation * (1.0 - f));

    match sector as u32 % 6 {
        0 => Vec3::new(value, t, p),
        1 => Vec3::new(q, value, p),
        2 => Vec3::new(p, value, t),
        3 => Vec3::new(p, q, value),
        4 => Vec3::new(t, p, value),
        _ => Vec3::new(value, p, q),
    }
}

//! 8-bit vertex colour value type
//!
//! Vertex colours are stored exactly as the mesh consumes them: three 8-bit
//! channels. Every arithmetic operation is explicit and clamped per channel;
//! there is no operator overloading that could silently wrap.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// RGB vertex colour with 8 bits per channel
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct VertexColor {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl VertexColor {
    /// Pure black
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Pure white
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a colour from its three channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a grey colour with every channel set to `value`
    pub const fn splat(value: u8) -> Self {
        Self::new(value, value, value)
    }

    /// Linear interpolation towards `target`
    ///
    /// `t` is clamped to `[0, 1]`; each channel is computed in floating point
    /// and truncated back to a byte, so `t = 0` returns `self` and `t = 1`
    /// returns `target` exactly.
    pub fn lerp(self, target: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            lerp_channel(self.r, target.r, t),
            lerp_channel(self.g, target.g, t),
            lerp_channel(self.b, target.b, t),
        )
    }

    /// Multiply every channel by `factor`, truncating to a byte
    pub fn scale(self, factor: f32) -> Self {
        Self::new(
            scale_channel(self.r, factor),
            scale_channel(self.g, factor),
            scale_channel(self.b, factor),
        )
    }

    /// Largest absolute per-channel difference between two colours
    pub fn max_channel_delta(self, other: Self) -> u8 {
        self.r
            .abs_diff(other.r)
            .max(self.g.abs_diff(other.g))
            .max(self.b.abs_diff(other.b))
    }

    /// True when every channel differs from `other` by strictly less than `threshold`
    pub fn within(self, other: Self, threshold: u8) -> bool {
        self.max_channel_delta(other) < threshold
    }

    /// Channels as an array, in `[r, g, b]` order
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for VertexColor {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<VertexColor> for [u8; 3] {
    fn from(color: VertexColor) -> Self {
        color.to_array()
    }
}

#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lerp_channel(from: u8, to: u8, t: f32) -> u8 {
    let from = f32::from(from);
    let value = from + (f32::from(to) - from) * t;
    value.clamp(0.0, 255.0) as u8
}

#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale_channel(channel: u8, factor: f32) -> u8 {
    (f32::from(channel) * factor).clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints_are_exact() {
        let from = VertexColor::splat(100);
        let to = VertexColor::new(255, 0, 0);

        assert_eq!(from.lerp(to, 0.0), from);
        assert_eq!(from.lerp(to, 1.0), to);
    }

    #[test]
    fn test_lerp_truncates_and_clamps_t() {
        let from = VertexColor::new(0, 200, 10);
        let to = VertexColor::new(255, 0, 11);

        // 0 + 255 * 0.5 = 127.5 -> 127, 200 - 200 * 0.5 = 100, 10 + 0.5 = 10.5 -> 10
        assert_eq!(from.lerp(to, 0.5), VertexColor::new(127, 100, 10));
        assert_eq!(from.lerp(to, 4.0), to);
        assert_eq!(from.lerp(to, -1.0), from);
    }

    #[test]
    fn test_scale_truncates_per_channel() {
        let color = VertexColor::new(255, 100, 3);

        assert_eq!(color.scale(1.0), color);
        assert_eq!(color.scale(0.2), VertexColor::new(51, 20, 0));
        assert_eq!(color.scale(0.5), VertexColor::new(127, 50, 1));
    }

    #[test]
    fn test_within_is_strict() {
        let a = VertexColor::new(100, 100, 100);

        assert!(a.within(VertexColor::new(149, 51, 100), 50));
        assert!(!a.within(VertexColor::new(150, 100, 100), 50));
        assert!(!a.within(VertexColor::new(100, 100, 50), 50));
        assert_eq!(a.max_channel_delta(VertexColor::new(90, 130, 100)), 30);
    }

    #[test]
    fn test_colour_buffers_cast_to_bytes() {
        let buffer = [VertexColor::new(1, 2, 3), VertexColor::new(4, 5, 6)];
        let bytes: &[u8] = bytemuck::cast_slice(&buffer);

        assert_eq!(bytes, &[1, 2, 3, 4, 5, 6]);
    }
}

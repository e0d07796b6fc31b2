//! Vertex lights
//!
//! A [`VertexLight`] is the owner's description of a spherical light. When it
//! is admitted into the light registry its parameters are cached into a
//! [`LightSource`]; lights are expected to stay put, so moving the owner's
//! light afterwards does not affect the cached copy.

use crate::foundation::collections::LightKey;
use crate::foundation::color::VertexColor;
use crate::foundation::math::Vec3;

/// Owner-side light description
#[derive(Debug, Clone, PartialEq)]
pub struct VertexLight {
    /// Light colour
    pub color: VertexColor,
    /// Radius of influence in world units
    pub radius: f32,
    /// World position
    pub position: Vec3,
    is_registered: bool,
}

impl VertexLight {
    /// Create a light at `position`
    pub fn new(position: Vec3, color: VertexColor, radius: f32) -> Self {
        Self {
            color,
            radius,
            position,
            is_registered: false,
        }
    }

    /// Whether the light is registered with its session (live or pending)
    pub fn is_registered(&self) -> bool {
        self.is_registered
    }

    pub(crate) fn set_registered(&mut self, registered: bool) {
        self.is_registered = registered;
    }

    pub(crate) fn cache(&self, id: LightKey) -> LightSource {
        LightSource {
            id,
            color: self.color,
            radius: self.radius,
            sqr_radius: self.radius * self.radius,
            position: self.position,
        }
    }
}

/// Light parameters cached at registration time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    /// Identity of the owning light
    pub id: LightKey,
    /// Light colour
    pub color: VertexColor,
    /// Radius of influence
    pub radius: f32,
    /// `radius * radius`, compared against squared distances
    pub sqr_radius: f32,
    /// World position at registration
    pub position: Vec3,
}

impl LightSource {
    /// Blend weight of this light for a point at squared distance `distance_sqr`
    ///
    /// `None` when the point lies strictly outside the radius. A point exactly
    /// on the boundary is inside and gets weight `0`. A zero-radius light
    /// lights only its own position, at full weight.
    pub fn weight_at(&self, distance_sqr: f32) -> Option<f32> {
        if distance_sqr > self.sqr_radius {
            return None;
        }
        if self.sqr_radius <= 0.0 {
            return Some(1.0);
        }
        Some(1.0 - distance_sqr / self.sqr_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use slotmap::SlotMap;

    fn cached(radius: f32) -> LightSource {
        let mut keys: SlotMap<LightKey, ()> = SlotMap::with_key();
        VertexLight::new(Vec3::zeros(), VertexColor::WHITE, radius).cache(keys.insert(()))
    }

    #[test]
    fn test_cache_squares_radius() {
        let light = cached(3.0);
        assert_relative_eq!(light.sqr_radius, 9.0);
    }

    #[test]
    fn test_weight_bounds() {
        let light = cached(10.0);

        assert_relative_eq!(light.weight_at(0.0).unwrap(), 1.0);
        assert_relative_eq!(light.weight_at(25.0).unwrap(), 0.75);
        assert_relative_eq!(light.weight_at(100.0).unwrap(), 0.0);
        assert!(light.weight_at(100.001).is_none());
    }

    #[test]
    fn test_zero_radius_light_only_hits_its_own_position() {
        let light = cached(0.0);

        assert_relative_eq!(light.weight_at(0.0).unwrap(), 1.0);
        assert!(light.weight_at(0.0001).is_none());
    }
}

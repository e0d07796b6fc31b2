//! Math utilities and types
//!
//! World positions are plain `nalgebra` vectors. Lights and lit objects only
//! ever need squared distances, so that is the one helper provided here.

pub use nalgebra::Vector3;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Squared euclidean distance between two world positions
#[inline]
pub fn distance_squared(a: &Vec3, b: &Vec3) -> f32 {
    (a - b).norm_squared()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance_squared_is_symmetric() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 6.0, 3.0);

        assert_relative_eq!(distance_squared(&a, &b), 25.0);
        assert_relative_eq!(distance_squared(&b, &a), 25.0);
        assert_relative_eq!(distance_squared(&a, &a), 0.0);
    }
}

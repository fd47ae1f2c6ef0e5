//! Collision tests and distance-based sizing
//!
//! Everything in the field is an axis-aligned box centered on its position.
//! Projectiles are points tested against a sphere derived from the box width.

use glam::Vec3;

/// Fraction of the hazard width used as projectile hit radius
pub const PROJECTILE_HIT_RADIUS_FACTOR: f32 = 0.6;

/// Do two centered boxes overlap on all three axes?
///
/// `size_a`/`size_b` are full extents (width, height, depth). Touching faces
/// do not count as a hit.
#[inline]
pub fn aabb_overlap(pos_a: Vec3, size_a: Vec3, pos_b: Vec3, size_b: Vec3) -> bool {
    let delta = (pos_a - pos_b).abs();
    let reach = (size_a + size_b) * 0.5;
    delta.x < reach.x && delta.y < reach.y && delta.z < reach.z
}

/// Is a projectile point inside the hazard's hit sphere?
#[inline]
pub fn projectile_hits(point: Vec3, center: Vec3, hitbox: Vec3) -> bool {
    let radius = hitbox.x * PROJECTILE_HIT_RADIUS_FACTOR;
    point.distance_squared(center) < radius * radius
}

/// Beam hit radius as a multiple of the hazard width
pub const BEAM_HIT_RADIUS_FACTOR: f32 = 1.5;

/// Is a hazard inside a beam fired from `origin` straight ahead (-z) for
/// `range` units?
///
/// The beam is a line, so the distance to it is the xy offset. Hazards behind
/// the origin or past the far end are missed.
#[inline]
pub fn beam_hits(origin: Vec3, range: f32, center: Vec3, hitbox: Vec3) -> bool {
    let ahead = origin.z - center.z;
    if !(0.0..=range).contains(&ahead) {
        return false;
    }
    let radius = hitbox.x * BEAM_HIT_RADIUS_FACTOR;
    center.truncate().distance_squared(origin.truncate()) < radius * radius
}

/// Distance-based size curve for hazards approaching the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleCurve {
    pub min_factor: f32,
    pub max_factor: f32,
    /// At or beyond this distance the factor is `min_factor`
    pub start_distance: f32,
    /// At or within this distance the factor is `max_factor`
    pub end_distance: f32,
}

impl ScaleCurve {
    /// Scale factor for a hazard `distance` units ahead of the player.
    ///
    /// Linear between the two distances, clamped outside them. Hazards that
    /// are already level with or behind the player get the full size.
    pub fn factor(&self, distance: f32) -> f32 {
        if distance >= self.start_distance {
            return self.min_factor;
        }
        if distance <= self.end_distance {
            return self.max_factor;
        }
        let span = self.start_distance - self.end_distance;
        let t = 1.0 - (distance - self.end_distance) / span;
        (self.min_factor + t * (self.max_factor - self.min_factor))
            .clamp(self.min_factor.min(self.max_factor), self.max_factor.max(self.min_factor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn curve() -> ScaleCurve {
        ScaleCurve {
            min_factor: 0.2,
            max_factor: 1.0,
            start_distance: 1500.0,
            end_distance: 200.0,
        }
    }

    #[test]
    fn test_aabb_overlap_and_separation() {
        let size = Vec3::splat(2.0);
        assert!(aabb_overlap(Vec3::ZERO, size, Vec3::new(1.5, 0.0, 0.0), size));
        // Separated on z only
        assert!(!aabb_overlap(Vec3::ZERO, size, Vec3::new(0.0, 0.0, 2.5), size));
        // Exactly touching is not a hit
        assert!(!aabb_overlap(Vec3::ZERO, size, Vec3::new(2.0, 0.0, 0.0), size));
    }

    #[test]
    fn test_projectile_radius() {
        let hitbox = Vec3::new(10.0, 4.0, 4.0);
        assert!(projectile_hits(Vec3::new(5.9, 0.0, 0.0), Vec3::ZERO, hitbox));
        assert!(!projectile_hits(Vec3::new(6.1, 0.0, 0.0), Vec3::ZERO, hitbox));
    }

    #[test]
    fn test_beam_reach() {
        let origin = Vec3::new(10.0, -5.0, -100.0);
        let hitbox = Vec3::new(4.0, 4.0, 4.0);
        // Radius 6 around the beam line
        assert!(beam_hits(origin, 1000.0, Vec3::new(15.9, -5.0, -600.0), hitbox));
        assert!(!beam_hits(origin, 1000.0, Vec3::new(16.1, -5.0, -600.0), hitbox));
        // Behind the ship or past the far end
        assert!(!beam_hits(origin, 1000.0, Vec3::new(10.0, -5.0, -90.0), hitbox));
        assert!(!beam_hits(origin, 1000.0, Vec3::new(10.0, -5.0, -1101.0), hitbox));
    }

    #[test]
    fn test_scale_curve_endpoints() {
        let c = curve();
        assert_eq!(c.factor(5000.0), 0.2);
        assert_eq!(c.factor(1500.0), 0.2);
        assert_eq!(c.factor(200.0), 1.0);
        assert_eq!(c.factor(-30.0), 1.0);
        let mid = c.factor(850.0);
        assert!((mid - 0.6).abs() < 1e-4, "mid = {mid}");
    }

    proptest! {
        #[test]
        fn prop_aabb_matches_axis_rule(
            ax in -50.0f32..50.0, ay in -50.0f32..50.0, az in -50.0f32..50.0,
            bx in -50.0f32..50.0, by in -50.0f32..50.0, bz in -50.0f32..50.0,
            sa in 0.1f32..20.0, sb in 0.1f32..20.0,
        ) {
            let a = Vec3::new(ax, ay, az);
            let b = Vec3::new(bx, by, bz);
            let size_a = Vec3::splat(sa);
            let size_b = Vec3::new(sb, sb * 0.5, sb * 2.0);
            let expected = (ax - bx).abs() < (size_a.x + size_b.x) / 2.0
                && (ay - by).abs() < (size_a.y + size_b.y) / 2.0
                && (az - bz).abs() < (size_a.z + size_b.z) / 2.0;
            prop_assert_eq!(aabb_overlap(a, size_a, b, size_b), expected);
            // Symmetric in its arguments
            prop_assert_eq!(aabb_overlap(a, size_a, b, size_b), aabb_overlap(b, size_b, a, size_a));
        }

        #[test]
        fn prop_scale_factor_clamped(distance in -500.0f32..5000.0) {
            let f = curve().factor(distance);
            prop_assert!((0.2..=1.0).contains(&f));
        }
    }
}

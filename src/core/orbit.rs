//! Orbit ring geometry - pure placement math for the carousel.
//!
//! Cards sit on an elliptical ring around the centered card. Everything in
//! here is a pure function of (geometry, collection length, center, index),
//! so one frame's layout is fully reproducible and the functions test
//! without any UI.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Tunable ring shape. Angles are radians, yaw is degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitGeometry {
    /// Horizontal ring radius, px
    pub radius_x: f32,
    /// Vertical ring radius, px
    pub radius_y: f32,
    /// Angular spacing between neighboring cards, radians
    pub angle_step: f32,
    /// Cards further than this many steps from center are not laid out
    pub visible_range: i64,
    /// Depth recession per step away from center, px
    pub depth_falloff: f32,
    /// Opacity lost per step away from center
    pub opacity_falloff: f32,
    /// Scale of the centered card
    pub center_scale: f32,
    /// Scale lost per step away from center
    pub scale_falloff: f32,
    /// Scale never drops below this
    pub min_scale: f32,
    /// Perspective tilt per step, degrees (sign turns cards toward center)
    pub yaw_per_step: f32,
}

impl Default for OrbitGeometry {
    fn default() -> Self {
        Self {
            radius_x: 720.0,
            radius_y: 120.0,
            angle_step: 0.45,
            visible_range: 3,
            depth_falloff: 250.0,
            opacity_falloff: 0.28,
            center_scale: 1.2,
            scale_falloff: 0.2,
            min_scale: 0.3,
            yaw_per_step: -25.0,
        }
    }
}

/// Where one card lands on the ring for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardPlacement {
    /// Offset from the stage center, px. `y` grows downward.
    pub offset: Vec2,
    /// Recession into the screen, 0 at center and negative on the sides
    pub depth: f32,
    /// Signed steps from center along the short way round the ring
    pub rel: i64,
    pub opacity: f32,
    pub scale: f32,
    /// Perspective tilt, degrees
    pub yaw: f32,
    /// Paint order; the centered card is highest
    pub stack_order: i64,
}

/// Signed circular distance from `center` to `i` in a ring of `len`,
/// taking the short way round. The antipode of an even-length ring
/// resolves to `+len/2`.
pub fn circular_rel(i: usize, center: usize, len: usize) -> i64 {
    debug_assert!(len > 0 && i < len && center < len);
    let len = len as i64;
    let mut rel = (i as i64 - center as i64).rem_euclid(len);
    if 2 * rel > len {
        rel -= len;
    }
    rel
}

/// Ring placement for the card at `i`, or `None` when the collection is
/// empty or the card is beyond the visible range.
pub fn place(geom: &OrbitGeometry, len: usize, center: usize, i: usize) -> Option<CardPlacement> {
    if len == 0 || i >= len || center >= len {
        return None;
    }
    let rel = circular_rel(i, center, len);
    if rel.abs() > geom.visible_range {
        return None;
    }

    let dist = rel.abs() as f32;
    let angle = rel as f32 * geom.angle_step;
    // The ring's lowest point is the center card; sides rise as they recede.
    let offset = Vec2::new(
        angle.sin() * geom.radius_x,
        -angle.cos() * geom.radius_y + geom.radius_y,
    );
    let opacity = (1.0 - dist * geom.opacity_falloff).max(0.0);
    // The centered card pops above unit scale; everything else falls off
    // from 1.0 toward the floor.
    let scale = if rel == 0 {
        geom.center_scale
    } else {
        (1.0 - dist * geom.scale_falloff).max(geom.min_scale)
    };
    Some(CardPlacement {
        offset,
        depth: -dist * geom.depth_falloff,
        rel,
        opacity,
        scale,
        yaw: geom.yaw_per_step * rel as f32,
        stack_order: 100 - (dist * 10.0).round() as i64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rel_zero_at_center() {
        for len in 1..8 {
            for c in 0..len {
                assert_eq!(circular_rel(c, c, len), 0);
            }
        }
    }

    #[test]
    fn test_rel_takes_short_way() {
        // Ring of 10, center 0: index 9 is one step the other way.
        assert_eq!(circular_rel(9, 0, 10), -1);
        assert_eq!(circular_rel(1, 0, 10), 1);
        assert_eq!(circular_rel(7, 0, 10), -3);
    }

    #[test]
    fn test_rel_antipode_is_positive() {
        assert_eq!(circular_rel(5, 0, 10), 5);
        assert_eq!(circular_rel(0, 5, 10), 5);
        assert_eq!(circular_rel(2, 0, 4), 2);
    }

    #[test]
    fn test_rel_minimal_representative() {
        // |rel| never exceeds len/2, and rel is congruent to i - center.
        for len in 1..=12usize {
            for c in 0..len {
                for i in 0..len {
                    let rel = circular_rel(i, c, len);
                    assert!(2 * rel.abs() <= len as i64, "len={} c={} i={} rel={}", len, c, i, rel);
                    assert_eq!(
                        rel.rem_euclid(len as i64),
                        (i as i64 - c as i64).rem_euclid(len as i64)
                    );
                }
            }
        }
    }

    #[test]
    fn test_center_placement() {
        let g = OrbitGeometry::default();
        let p = place(&g, 7, 3, 3).unwrap();
        assert_eq!(p.rel, 0);
        assert_eq!(p.offset, Vec2::ZERO);
        assert_eq!(p.depth, 0.0);
        assert_eq!(p.opacity, 1.0);
        assert_eq!(p.scale, g.center_scale);
        assert_eq!(p.yaw, 0.0);
        assert_eq!(p.stack_order, 100);
    }

    #[test]
    fn test_placement_symmetry() {
        let g = OrbitGeometry::default();
        let left = place(&g, 9, 4, 3).unwrap();
        let right = place(&g, 9, 4, 5).unwrap();
        assert_eq!(left.rel, -1);
        assert_eq!(right.rel, 1);
        assert_eq!(left.offset.x, -right.offset.x);
        assert_eq!(left.offset.y, right.offset.y);
        assert_eq!(left.opacity, right.opacity);
        assert_eq!(left.scale, right.scale);
        assert_eq!(left.yaw, -right.yaw);
    }

    #[test]
    fn test_falloff_and_floor() {
        let g = OrbitGeometry::default();
        let p1 = place(&g, 9, 0, 1).unwrap();
        let p2 = place(&g, 9, 0, 2).unwrap();
        assert!(p1.opacity > p2.opacity);
        assert!(p1.scale > p2.scale);
        assert!(p2.scale >= g.min_scale);
        assert!(p1.depth > p2.depth, "further cards recede deeper");
        assert!((p1.scale - 0.8).abs() < 1e-6);
        assert!(p1.stack_order > p2.stack_order);
        // Sides rise relative to the centered card.
        assert!(p1.offset.y < 0.0);
    }

    #[test]
    fn test_out_of_range_is_hidden() {
        let g = OrbitGeometry::default();
        // Ring of 9, center 0: index 4 is rel 4, beyond visible_range 3.
        assert!(place(&g, 9, 0, 4).is_none());
        assert!(place(&g, 9, 0, 3).is_some());
        assert!(place(&g, 0, 0, 0).is_none());
    }
}

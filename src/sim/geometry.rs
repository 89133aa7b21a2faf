//! Planar geometry helpers
//!
//! Everything here works in world units with y pointing up.

use glam::Vec2;

/// Ray-crossing point-in-polygon test.
///
/// Casts a ray from `point` towards +x and counts edge crossings; an odd
/// count means inside. Works for either vertex winding. Points exactly on
/// an edge may land on either side.
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut p1 = polygon[n - 1];
    for &p2 in polygon {
        let (lo, hi) = if p1.y < p2.y { (p1.y, p2.y) } else { (p2.y, p1.y) };
        // Horizontal edges never satisfy lo < y <= hi
        if lo < point.y && point.y <= hi && point.x <= p1.x.max(p2.x) {
            let x_cross = (point.y - p1.y) * (p2.x - p1.x) / (p2.y - p1.y) + p1.x;
            if p1.x == p2.x || point.x <= x_cross {
                inside = !inside;
            }
        }
        p1 = p2;
    }
    inside
}

/// Rotate `local` by `angle` radians, then translate by `origin`
#[inline]
pub fn to_world(origin: Vec2, angle: f32, local: Vec2) -> Vec2 {
    origin + Vec2::from_angle(angle).rotate(local)
}

/// Corners of a box with the given half extents, rotated by `angle` about
/// its center and moved to `center`. Counter-clockwise from bottom-left.
pub fn box_corners(half_extents: Vec2, center: Vec2, angle: f32) -> [Vec2; 4] {
    let Vec2 { x: hx, y: hy } = half_extents;
    [
        Vec2::new(-hx, -hy),
        Vec2::new(hx, -hy),
        Vec2::new(hx, hy),
        Vec2::new(-hx, hy),
    ]
    .map(|corner| to_world(center, angle, corner))
}

/// Signed area (positive for counter-clockwise winding)
pub fn signed_area(polygon: &[Vec2]) -> f32 {
    let n = polygon.len();
    (0..n)
        .map(|i| polygon[i].perp_dot(polygon[(i + 1) % n]))
        .sum::<f32>()
        / 2.0
}

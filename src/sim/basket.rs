//! Basket geometry and construction
//!
//! A basket is one rigid body with four fixtures: a floor, two side walls
//! leaning outward by a fixed tilt, and a non-colliding interior sensor.
//! The success region is derived from the same [`BasketGeometry`], so the
//! region always follows the walls the player actually sees.

use glam::Vec2;
use rapier2d::prelude::RigidBodyHandle;

use super::objects::{Basket, Material};
use super::world::{BodyDesc, FixtureDesc, PhysicsWorld};
use crate::consts::*;

/// Dimensions of a basket at a given scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasketGeometry {
    pub width: f32,
    pub height: f32,
    pub thickness: f32,
    /// Side wall tilt (radians)
    pub tilt: f32,
    /// Horizontal displacement of the wall centers caused by the tilt
    pub angle_shift: f32,
}

impl BasketGeometry {
    pub fn from_scale(scale: f32) -> Self {
        let tilt = BASKET_WALL_TILT_DEG.to_radians();
        // Square-root growth keeps small baskets from looking flimsy
        let thickness = BASKET_BASE_THICKNESS + BASKET_THICKNESS_GROWTH * scale.max(0.0).sqrt();
        Self {
            width: BASKET_WIDTH_RATIO * scale,
            height: BASKET_HEIGHT_RATIO * scale,
            thickness,
            tilt,
            angle_shift: tilt.cos() * thickness,
        }
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    #[inline]
    pub fn half_height(&self) -> f32 {
        self.height / 2.0
    }

    /// Floor half extents; the floor is centered on the body origin
    pub fn floor_half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.thickness / 2.0)
    }

    /// Side wall half extents (before tilt)
    pub fn wall_half_extents(&self) -> Vec2 {
        Vec2::new(self.thickness / 2.0, self.height / 2.0 + self.thickness / 2.0)
    }

    /// Horizontal distance from the body origin to each side wall center
    pub fn wall_offset_x(&self) -> f32 {
        self.width / 2.0 - self.thickness / 2.0 + self.angle_shift
    }

    /// Left wall center in body coordinates
    pub fn left_wall_center(&self) -> Vec2 {
        Vec2::new(-self.wall_offset_x(), self.height / 2.0)
    }

    /// Right wall center in body coordinates
    pub fn right_wall_center(&self) -> Vec2 {
        Vec2::new(self.wall_offset_x(), self.height / 2.0)
    }

    /// Interior sensor half extents
    pub fn sensor_half_extents(&self) -> Vec2 {
        Vec2::new(
            self.width / 2.0 - self.thickness / 2.0,
            self.height / 2.0 - self.thickness / 2.0,
        )
    }

    /// Interior sensor center in body coordinates
    pub fn sensor_center(&self) -> Vec2 {
        Vec2::new(0.0, self.height / 2.0)
    }

    /// The four fixtures in build order: floor, left, right, sensor
    pub fn fixtures(&self, material: Material) -> [FixtureDesc; 4] {
        [
            FixtureDesc::cuboid(self.floor_half_extents(), Vec2::ZERO, 0.0, material),
            FixtureDesc::cuboid(self.wall_half_extents(), self.left_wall_center(), self.tilt, material),
            FixtureDesc::cuboid(self.wall_half_extents(), self.right_wall_center(), -self.tilt, material),
            FixtureDesc::cuboid(
                self.sensor_half_extents(),
                self.sensor_center(),
                0.0,
                Material::SENSOR,
            )
            .as_sensor(),
        ]
    }
}

/// Build a basket body tagged `name`
pub fn build_basket(world: &mut PhysicsWorld, name: &str, basket: &Basket) -> RigidBodyHandle {
    let geometry = BasketGeometry::from_scale(basket.scale);
    let desc = BodyDesc::new(basket.dynamic, basket.pos, basket.angle.to_radians());
    let body = world.create_body(name, &desc);
    for fixture in geometry.fixtures(basket.material) {
        world.attach(body, &fixture);
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::box_corners;
    use crate::sim::world::{FixtureShape, ShapeView};
    use proptest::prelude::*;

    #[test]
    fn test_unit_scale_dimensions() {
        let g = BasketGeometry::from_scale(1.0);
        assert!((g.width - 1.083).abs() < 1e-6);
        assert!((g.height - 1.67).abs() < 1e-6);
        assert!((g.thickness - 0.15).abs() < 1e-6);
        assert!((g.angle_shift - 0.15 * 5.0_f32.to_radians().cos()).abs() < 1e-6);
    }

    #[test]
    fn test_walls_lean_outward_at_the_top() {
        let g = BasketGeometry::from_scale(1.0);
        let left = box_corners(g.wall_half_extents(), g.left_wall_center(), g.tilt);
        let right = box_corners(g.wall_half_extents(), g.right_wall_center(), -g.tilt);
        // Inner faces: left wall's right edge, right wall's left edge
        let left_inner_bottom = left[1];
        let left_inner_top = left[2];
        let right_inner_bottom = right[0];
        let right_inner_top = right[3];
        assert!(left_inner_top.x < left_inner_bottom.x);
        assert!(right_inner_top.x > right_inner_bottom.x);
        // Symmetric about the body's vertical axis
        assert!((left_inner_top.x + right_inner_top.x).abs() < 1e-5);
    }

    #[test]
    fn test_sensor_sits_inside_the_walls() {
        let g = BasketGeometry::from_scale(2.0);
        let sensor = g.sensor_half_extents();
        assert!(sensor.x < g.wall_offset_x());
        assert!(g.sensor_center().y + sensor.y < g.height);
    }

    #[test]
    fn test_fixture_order_and_sensor_flag() {
        let fixtures = BasketGeometry::from_scale(1.0).fixtures(Material::default());
        assert_eq!(fixtures.iter().filter(|f| f.sensor).count(), 1);
        assert!(fixtures[3].sensor);
        assert_eq!(fixtures[3].material.density, 0.0);
        let FixtureShape::Box { angle, .. } = fixtures[1].shape else {
            panic!("expected a box");
        };
        assert!(angle > 0.0);
    }

    #[test]
    fn test_build_basket_creates_one_body_with_four_fixtures() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, -10.0));
        build_basket(&mut world, "basket", &Basket::new(0.0, -5.0, 1.0));
        let views = world.bodies();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].name, "basket");
        assert_eq!(views[0].shapes.len(), 4);
        let sensors = views[0]
            .shapes
            .iter()
            .filter(|s| matches!(s, ShapeView::Polygon { sensor: true, .. }))
            .count();
        assert_eq!(sensors, 1);
    }

    proptest! {
        #[test]
        fn prop_extents_scale_linearly(s in 0.05f32..20.0) {
            let g = BasketGeometry::from_scale(s);
            prop_assert!((g.half_width() - 1.083 * s / 2.0).abs() < 1e-4 * s.max(1.0));
            prop_assert!((g.half_height() - 1.67 * s / 2.0).abs() < 1e-4 * s.max(1.0));
            let double = BasketGeometry::from_scale(2.0 * s);
            prop_assert!((double.width - 2.0 * g.width).abs() < 1e-4 * s.max(1.0));
        }

        #[test]
        fn prop_thickness_grows_with_sqrt_scale(s in 0.0f32..20.0) {
            let g = BasketGeometry::from_scale(s);
            prop_assert!((g.thickness - (0.05 + 0.1 * s.sqrt())).abs() < 1e-5);
        }
    }
}

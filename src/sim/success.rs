//! Success region derivation and target detection
//!
//! The region is the basket interior shrunk by `tolerance + target radius`
//! on every side, so only a target whose whole disk clears the walls counts.
//! It is rebuilt from the basket's live pose on every check.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::basket::BasketGeometry;
use super::geometry::{point_in_polygon, to_world};
use super::level::Level;
use super::world::PhysicsWorld;
use crate::consts::BASKET_NAME;
use crate::error::{PhyreError, Result};

/// Tolerance-shrunk basket interior in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuccessRegion {
    /// Bottom-left, bottom-right, top-right, top-left
    pub corners: [Vec2; 4],
    /// The inset consumed the whole interior; nothing is inside
    pub collapsed: bool,
}

impl SuccessRegion {
    /// Region in basket-local coordinates (origin at the floor center)
    pub fn local(geometry: &BasketGeometry, target_radius: f32, tolerance: f32) -> Self {
        let BasketGeometry {
            width: w,
            height: h,
            thickness: t,
            angle_shift: shift,
            ..
        } = *geometry;
        let inset = tolerance + target_radius;

        let bottom = t / 2.0 + inset;
        let top = h - t / 2.0 - inset;
        let bottom_half = w / 2.0 - t / 2.0 - inset;
        let top_half = w / 2.0 - t / 2.0 + shift - inset;

        Self {
            corners: [
                Vec2::new(-bottom_half, bottom),
                Vec2::new(bottom_half, bottom),
                Vec2::new(top_half, top),
                Vec2::new(-top_half, top),
            ],
            collapsed: bottom_half <= 0.0 || top_half <= 0.0 || top <= bottom,
        }
    }

    /// Region for a basket body at `position` rotated by `angle` radians
    pub fn derive(
        geometry: &BasketGeometry,
        position: Vec2,
        angle: f32,
        target_radius: f32,
        tolerance: f32,
    ) -> Self {
        let local = Self::local(geometry, target_radius, tolerance);
        Self {
            corners: local.corners.map(|c| to_world(position, angle, c)),
            collapsed: local.collapsed,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.collapsed
    }

    pub fn contains(&self, point: Vec2) -> bool {
        !self.is_empty() && point_in_polygon(point, &self.corners)
    }
}

/// Result of one success check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuccessCheck {
    pub inside: bool,
    pub region: SuccessRegion,
    /// Target center at the time of the check
    pub target: Vec2,
}

/// Test whether the level's target is inside its basket's success region.
///
/// The region comes from the basket scale recorded in the level and the
/// basket body's current pose. Fails when the world has no body tagged
/// `basket` or none tagged with the target's name.
pub fn detect_success(world: &PhysicsWorld, level: &Level, tolerance: f32) -> Result<SuccessCheck> {
    let (basket_pos, basket_angle) = world
        .pose(BASKET_NAME)
        .ok_or_else(|| PhyreError::BodyNotFound(BASKET_NAME.to_string()))?;
    let (target, _) = world
        .pose(&level.target)
        .ok_or_else(|| PhyreError::BodyNotFound(level.target.clone()))?;
    let basket = level.basket()?;

    let target_radius = world.circle_radius(&level.target).unwrap_or(0.0);
    let geometry = BasketGeometry::from_scale(basket.scale);
    let region = SuccessRegion::derive(&geometry, basket_pos, basket_angle, target_radius, tolerance);

    Ok(SuccessCheck {
        inside: region.contains(target),
        region,
        target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::builders::build_object;
    use crate::sim::objects::{Ball, Basket};
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_2;

    fn unit_region(tolerance: f32) -> SuccessRegion {
        SuccessRegion::derive(&BasketGeometry::from_scale(1.0), Vec2::new(0.0, -5.0), 0.0, 0.17, tolerance)
    }

    #[test]
    fn test_region_layout_at_unit_scale() {
        let g = BasketGeometry::from_scale(1.0);
        let region = SuccessRegion::local(&g, 0.0, 0.0);
        let [bl, br, tr, tl] = region.corners;
        assert!((bl.y - g.thickness / 2.0).abs() < 1e-6);
        assert!((tl.y - (g.height - g.thickness / 2.0)).abs() < 1e-6);
        assert!((br.x - (g.width / 2.0 - g.thickness / 2.0)).abs() < 1e-6);
        // Mouth is wider than the floor by the wall tilt
        assert!((tr.x - br.x - g.angle_shift).abs() < 1e-6);
        assert!((bl.x + br.x).abs() < 1e-6);
    }

    #[test]
    fn test_center_of_basket_is_inside() {
        let region = unit_region(0.02);
        assert!(region.contains(Vec2::new(0.0, -4.2)));
        assert!(!region.contains(Vec2::new(0.0, -2.0)));
        assert!(!region.contains(Vec2::new(2.67, -4.8)));
        // Resting on the floor is below the inset bottom edge
        assert!(!region.contains(Vec2::new(0.0, -5.0 + 0.075 + 0.17)));
    }

    #[test]
    fn test_huge_tolerance_empties_region() {
        let region = unit_region(1.0);
        assert!(region.is_empty());
        assert!(!region.contains(Vec2::new(0.0, -4.2)));
    }

    #[test]
    fn test_region_follows_basket_rotation() {
        let g = BasketGeometry::from_scale(1.0);
        // A quarter turn counter-clockwise points the opening to the left
        let region = SuccessRegion::derive(&g, Vec2::ZERO, FRAC_PI_2, 0.0, 0.0);
        assert!(region.contains(Vec2::new(-0.8, 0.0)));
        assert!(!region.contains(Vec2::new(0.0, 0.8)));
    }

    fn world_with(level: &Level) -> PhysicsWorld {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        for (name, object) in &level.objects {
            build_object(&mut world, name, object);
        }
        world
    }

    fn level_with_target_at(pos: Vec2) -> Level {
        let mut level = Level::new("detect");
        level.objects.insert("basket".into(), Basket::new(0.0, -5.0, 1.0).into());
        level.objects.insert("green_ball".into(), Ball::new(pos.x, pos.y, 0.17, "green").into());
        level.objects.insert("red_ball".into(), Ball::new(3.0, 3.0, 0.5, "red").into());
        level.target = "green_ball".into();
        level.actions = vec!["red_ball".into()];
        level
    }

    #[test]
    fn test_detect_success_inside_and_outside() {
        let level = level_with_target_at(Vec2::new(0.0, -4.2));
        let world = world_with(&level);
        let check = detect_success(&world, &level, 0.02).unwrap();
        assert!(check.inside);
        assert_eq!(check.target, Vec2::new(0.0, -4.2));

        let level = level_with_target_at(Vec2::new(2.67, -1.25));
        let world = world_with(&level);
        assert!(!detect_success(&world, &level, 0.02).unwrap().inside);
    }

    #[test]
    fn test_detect_success_uses_target_radius() {
        // Just inside the bare interior near the floor, but a 0.17 ball there
        // would overlap the floor
        let level = level_with_target_at(Vec2::new(0.0, -5.0 + 0.075 + 0.1));
        let world = world_with(&level);
        assert!(!detect_success(&world, &level, 0.0).unwrap().inside);
    }

    #[test]
    fn test_missing_bodies_are_lookup_errors() {
        let level = level_with_target_at(Vec2::new(0.0, -4.2));
        let mut world = world_with(&level);

        world.remove_body("green_ball");
        assert!(matches!(
            detect_success(&world, &level, 0.02),
            Err(PhyreError::BodyNotFound(name)) if name == "green_ball"
        ));

        world.remove_body("basket");
        assert!(matches!(
            detect_success(&world, &level, 0.02),
            Err(PhyreError::BodyNotFound(name)) if name == "basket"
        ));
    }

    proptest! {
        #[test]
        fn prop_containment_never_grows_with_tolerance(
            x in -1.0f32..1.0,
            y in -5.0f32..-3.0,
            tol in 0.0f32..0.3,
            extra in 0.0f32..0.3,
        ) {
            let p = Vec2::new(x, y);
            let loose = unit_region(tol);
            let tight = unit_region(tol + extra);
            if tight.contains(p) {
                prop_assert!(loose.contains(p));
            }
        }

        #[test]
        fn prop_region_is_translation_invariant(dx in -4.0f32..4.0, dy in -4.0f32..4.0) {
            let g = BasketGeometry::from_scale(1.3);
            let a = SuccessRegion::derive(&g, Vec2::ZERO, 0.0, 0.1, 0.02);
            let b = SuccessRegion::derive(&g, Vec2::new(dx, dy), 0.0, 0.1, 0.02);
            for (ca, cb) in a.corners.iter().zip(b.corners.iter()) {
                prop_assert!(((*cb - *ca) - Vec2::new(dx, dy)).length() < 1e-4);
            }
        }
    }
}

//! Single-fixture bodies and the room boundary

use glam::Vec2;
use rapier2d::prelude::RigidBodyHandle;

use super::basket::build_basket;
use super::objects::{Ball, Material, Platform, SceneObject};
use super::world::{BodyDesc, FixtureDesc, PhysicsWorld};
use crate::consts::WALL_NAMES;

/// Build a ball body tagged `name`
pub fn build_ball(world: &mut PhysicsWorld, name: &str, ball: &Ball) -> RigidBodyHandle {
    let body = world.create_body(name, &BodyDesc::new(ball.dynamic, ball.pos, 0.0));
    world.attach(body, &FixtureDesc::circle(ball.radius, ball.material));
    body
}

/// Build a platform body tagged `name`
pub fn build_platform(world: &mut PhysicsWorld, name: &str, platform: &Platform) -> RigidBodyHandle {
    let desc = BodyDesc::new(platform.dynamic, platform.pos, platform.angle.to_radians());
    let body = world.create_body(name, &desc);
    let half_extents = Vec2::new(platform.length / 2.0, platform.thickness / 2.0);
    world.attach(
        body,
        &FixtureDesc::cuboid(half_extents, Vec2::ZERO, 0.0, platform.material),
    );
    body
}

/// Build any scene object
pub fn build_object(world: &mut PhysicsWorld, name: &str, object: &SceneObject) -> RigidBodyHandle {
    match object {
        SceneObject::Ball(ball) => build_ball(world, name, ball),
        SceneObject::Platform(platform) => build_platform(world, name, platform),
        SceneObject::Basket(basket) => build_basket(world, name, basket),
    }
}

/// Build the four static walls enclosing a room centered on the origin.
///
/// Each wall lies just outside the room rectangle, so the inner faces are
/// the playfield edges. Side walls also cover the corners.
pub fn build_walls(world: &mut PhysicsWorld, room: Vec2, thickness: f32) -> [RigidBodyHandle; 4] {
    let half = room / 2.0;
    let t = thickness / 2.0;
    let vertical = Vec2::new(t, half.y + thickness);
    let horizontal = Vec2::new(half.x, t);

    let walls = [
        (Vec2::new(-half.x - t, 0.0), vertical),
        (Vec2::new(half.x + t, 0.0), vertical),
        (Vec2::new(0.0, half.y + t), horizontal),
        (Vec2::new(0.0, -half.y - t), horizontal),
    ];

    std::array::from_fn(|i| {
        let (center, half_extents) = walls[i];
        let body = world.create_body(WALL_NAMES[i], &BodyDesc::fixed(center));
        world.attach(
            body,
            &FixtureDesc::cuboid(half_extents, Vec2::ZERO, 0.0, Material::default()),
        );
        body
    })
}

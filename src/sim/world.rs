//! Physics world wrapper
//!
//! Owns every rapier2d structure needed to step a scene and keeps a
//! bidirectional index between object names and rigid body handles, so
//! lookups never scan the body set.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use glam::Vec2;
use rapier2d::prelude::*;

use super::geometry::box_corners;
use super::objects::Material;

// glam <-> nalgebra, only at the rapier boundary

fn to_na(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

fn from_na(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Mobility of a rigid body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Dynamic,
    Static,
}

/// Rigid body placement
#[derive(Debug, Clone, Copy)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub position: Vec2,
    /// Rotation (radians)
    pub angle: f32,
    /// Continuous collision detection for fast movers
    pub bullet: bool,
}

impl BodyDesc {
    pub fn new(dynamic: bool, position: Vec2, angle: f32) -> Self {
        Self {
            kind: if dynamic {
                BodyKind::Dynamic
            } else {
                BodyKind::Static
            },
            position,
            angle,
            bullet: dynamic,
        }
    }

    pub fn fixed(position: Vec2) -> Self {
        Self::new(false, position, 0.0)
    }
}

/// Fixture shape in body-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixtureShape {
    Circle { radius: f32 },
    Box { half_extents: Vec2, offset: Vec2, angle: f32 },
}

/// A shape plus contact properties attached to a body
#[derive(Debug, Clone, Copy)]
pub struct FixtureDesc {
    pub shape: FixtureShape,
    pub material: Material,
    pub sensor: bool,
}

impl FixtureDesc {
    pub fn circle(radius: f32, material: Material) -> Self {
        Self {
            shape: FixtureShape::Circle { radius },
            material,
            sensor: false,
        }
    }

    pub fn cuboid(half_extents: Vec2, offset: Vec2, angle: f32, material: Material) -> Self {
        Self {
            shape: FixtureShape::Box {
                half_extents,
                offset,
                angle,
            },
            material,
            sensor: false,
        }
    }

    pub fn as_sensor(mut self) -> Self {
        self.sensor = true;
        self
    }

    fn build(&self) -> Collider {
        let builder = match self.shape {
            FixtureShape::Circle { radius } => ColliderBuilder::ball(radius),
            FixtureShape::Box {
                half_extents,
                offset,
                angle,
            } => ColliderBuilder::cuboid(half_extents.x, half_extents.y)
                .position(Isometry::new(to_na(offset), angle)),
        };
        builder
            .density(self.material.density)
            .friction(self.material.friction)
            .restitution(self.material.restitution)
            .sensor(self.sensor)
            .build()
    }
}

/// World-space shape of one fixture, for drawing and inspection
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeView {
    Circle { center: Vec2, radius: f32 },
    Polygon { vertices: Vec<Vec2>, sensor: bool },
}

/// Snapshot of one tagged body
#[derive(Debug, Clone)]
pub struct BodyView {
    pub name: String,
    pub position: Vec2,
    /// Rotation (radians)
    pub angle: f32,
    pub dynamic: bool,
    pub shapes: Vec<ShapeView>,
}

/// A rapier2d world whose bodies are addressed by name
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    by_name: HashMap<String, RigidBodyHandle>,
    by_handle: HashMap<RigidBodyHandle, String>,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            by_name: HashMap::new(),
            by_handle: HashMap::new(),
        }
    }

    /// Create a body tagged `name`. An existing body with the same tag is
    /// replaced so the index stays one-to-one.
    pub fn create_body(&mut self, name: &str, desc: &BodyDesc) -> RigidBodyHandle {
        if self.remove_body(name) {
            log::warn!("Replaced existing body `{}`", name);
        }

        let builder = match desc.kind {
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::Static => RigidBodyBuilder::fixed(),
        };
        let body = builder
            .translation(to_na(desc.position))
            .rotation(desc.angle)
            .ccd_enabled(desc.bullet)
            .build();

        let handle = self.bodies.insert(body);
        self.by_name.insert(name.to_string(), handle);
        self.by_handle.insert(handle, name.to_string());
        handle
    }

    /// Attach a fixture to an existing body
    pub fn attach(&mut self, body: RigidBodyHandle, fixture: &FixtureDesc) -> ColliderHandle {
        self.colliders
            .insert_with_parent(fixture.build(), body, &mut self.bodies)
    }

    /// Destroy the body tagged `name` with all its fixtures
    pub fn remove_body(&mut self, name: &str) -> bool {
        let Some(handle) = self.by_name.remove(name) else {
            return false;
        };
        self.by_handle.remove(&handle);
        self.bodies
            .remove(
                handle,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    /// Destroy every body
    pub fn clear(&mut self) {
        let names: Vec<String> = self.by_name.keys().cloned().collect();
        for name in names {
            self.remove_body(&name);
        }
        debug_assert_eq!(self.bodies.len(), 0);
    }

    /// Advance the simulation by one fixed step
    pub fn step(&mut self, dt: f32, velocity_iterations: usize, position_iterations: usize) {
        self.integration_parameters.dt = dt;
        self.integration_parameters.num_solver_iterations =
            NonZeroUsize::new(velocity_iterations).unwrap_or(NonZeroUsize::MIN);
        self.integration_parameters.num_internal_stabilization_iterations = position_iterations;

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn handle(&self, name: &str) -> Option<RigidBodyHandle> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, handle: RigidBodyHandle) -> Option<&str> {
        self.by_handle.get(&handle).map(String::as_str)
    }

    pub fn body(&self, name: &str) -> Option<&RigidBody> {
        self.handle(name).and_then(|h| self.bodies.get(h))
    }

    /// Position and rotation (radians) of a tagged body
    pub fn pose(&self, name: &str) -> Option<(Vec2, f32)> {
        self.body(name)
            .map(|rb| (from_na(rb.translation()), rb.rotation().angle()))
    }

    /// Radius of the first circle fixture on a tagged body
    pub fn circle_radius(&self, name: &str) -> Option<f32> {
        let body = self.body(name)?;
        body.colliders()
            .iter()
            .filter_map(|h| self.colliders.get(*h))
            .find_map(|c| c.shape().as_ball().map(|ball| ball.radius))
    }

    /// Move a body without imparting any velocity
    pub fn teleport(&mut self, name: &str, position: Vec2) -> bool {
        let Some(rb) = self.handle(name).and_then(|h| self.bodies.get_mut(h)) else {
            return false;
        };
        rb.set_translation(to_na(position), true);
        rb.set_linvel(vector![0.0, 0.0], true);
        rb.set_angvel(0.0, true);
        true
    }

    /// Current velocity of a tagged body
    pub fn velocity(&self, name: &str) -> Option<Vec2> {
        self.body(name).map(|rb| from_na(rb.linvel()))
    }

    /// Snapshot every tagged body, sorted by name
    pub fn bodies(&self) -> Vec<BodyView> {
        let mut views: Vec<BodyView> = self
            .by_name
            .iter()
            .filter_map(|(name, handle)| self.view(name, *handle))
            .collect();
        views.sort_by(|a, b| a.name.cmp(&b.name));
        views
    }

    fn view(&self, name: &str, handle: RigidBodyHandle) -> Option<BodyView> {
        let rb = self.bodies.get(handle)?;
        let shapes = rb
            .colliders()
            .iter()
            .filter_map(|h| self.colliders.get(*h))
            .filter_map(|collider| {
                let iso = collider.position();
                let center = from_na(&iso.translation.vector);
                let angle = iso.rotation.angle();
                if let Some(ball) = collider.shape().as_ball() {
                    Some(ShapeView::Circle {
                        center,
                        radius: ball.radius,
                    })
                } else {
                    collider.shape().as_cuboid().map(|cuboid| ShapeView::Polygon {
                        vertices: box_corners(from_na(&cuboid.half_extents), center, angle).to_vec(),
                        sensor: collider.is_sensor(),
                    })
                }
            })
            .collect();

        Some(BodyView {
            name: name.to_string(),
            position: from_na(rb.translation()),
            angle: rb.rotation().angle(),
            dynamic: rb.is_dynamic(),
            shapes,
        })
    }
}

//! Simulation module
//!
//! Scene objects, their physics bodies, the basket success test and the
//! episode loop. This module must stay deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by object name)
//! - No rendering or platform dependencies

pub mod basket;
pub mod builders;
pub mod geometry;
pub mod level;
pub mod objects;
pub mod session;
pub mod spaces;
pub mod success;
pub mod world;

pub use basket::{BasketGeometry, build_basket};
pub use builders::{build_ball, build_object, build_platform, build_walls};
pub use geometry::point_in_polygon;
pub use level::Level;
pub use objects::{Ball, Basket, Material, ObjectKind, Platform, SceneObject};
pub use session::{
    CancelToken, EpisodeStatus, Frame, Frontend, PhyreEnv, SessionPhase, StepInfo, StepOutcome,
};
pub use spaces::BoxSpace;
pub use success::{SuccessCheck, SuccessRegion, detect_success};
pub use world::{BodyView, PhysicsWorld, ShapeView};

//! Scene object variants
//!
//! A scene is made of balls, platforms and exactly one basket. Every object
//! shares a placement (position, angle, color), a material and a mobility
//! flag; the variant carries the shape parameters.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{PhyreError, Result};

/// Contact material of every fixture on a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub friction: f32,
    pub restitution: f32,
    pub density: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            friction: DEFAULT_FRICTION,
            restitution: DEFAULT_RESTITUTION,
            density: DEFAULT_DENSITY,
        }
    }
}

impl Material {
    /// Material for non-colliding helper fixtures
    pub const SENSOR: Material = Material {
        friction: 0.0,
        restitution: 0.0,
        density: 0.0,
    };
}

/// A circular body
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub radius: f32,
    pub color: String,
    pub material: Material,
    pub dynamic: bool,
}

impl Ball {
    pub fn new(x: f32, y: f32, radius: f32, color: impl Into<String>) -> Self {
        Self {
            pos: Vec2::new(x, y),
            radius,
            color: color.into(),
            material: Material::default(),
            dynamic: true,
        }
    }
}

/// A flat box, static unless the scene says otherwise
#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    pub pos: Vec2,
    /// Rotation (degrees, counter-clockwise)
    pub angle: f32,
    pub length: f32,
    pub thickness: f32,
    pub color: String,
    pub material: Material,
    pub dynamic: bool,
}

impl Platform {
    pub fn new(x: f32, y: f32, length: f32, angle: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            angle,
            length,
            thickness: PLATFORM_THICKNESS,
            color: "black".to_string(),
            material: Material::default(),
            dynamic: false,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

/// The goal container
#[derive(Debug, Clone, PartialEq)]
pub struct Basket {
    pub pos: Vec2,
    /// Rotation (degrees, counter-clockwise)
    pub angle: f32,
    pub scale: f32,
    pub material: Material,
    pub dynamic: bool,
}

impl Basket {
    pub fn new(x: f32, y: f32, scale: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            angle: 0.0,
            scale,
            material: Material::default(),
            dynamic: true,
        }
    }
}

/// Object kind, also recoverable from an object's name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Ball,
    Platform,
    Basket,
}

impl ObjectKind {
    /// Kind implied by a name: `basket` exactly, else `*ball*`, else `*platform*`
    pub fn from_name(name: &str) -> Option<Self> {
        if name == BASKET_NAME {
            Some(ObjectKind::Basket)
        } else if name.contains("ball") {
            Some(ObjectKind::Ball)
        } else if name.contains("platform") {
            Some(ObjectKind::Platform)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Ball => "ball",
            ObjectKind::Platform => "platform",
            ObjectKind::Basket => "basket",
        }
    }
}

/// A scene object
#[derive(Debug, Clone, PartialEq)]
pub enum SceneObject {
    Ball(Ball),
    Platform(Platform),
    Basket(Basket),
}

impl SceneObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            SceneObject::Ball(_) => ObjectKind::Ball,
            SceneObject::Platform(_) => ObjectKind::Platform,
            SceneObject::Basket(_) => ObjectKind::Basket,
        }
    }

    pub fn pos(&self) -> Vec2 {
        match self {
            SceneObject::Ball(b) => b.pos,
            SceneObject::Platform(p) => p.pos,
            SceneObject::Basket(b) => b.pos,
        }
    }

    /// Rotation (degrees)
    pub fn angle(&self) -> f32 {
        match self {
            SceneObject::Ball(_) => 0.0,
            SceneObject::Platform(p) => p.angle,
            SceneObject::Basket(b) => b.angle,
        }
    }

    pub fn material(&self) -> Material {
        match self {
            SceneObject::Ball(b) => b.material,
            SceneObject::Platform(p) => p.material,
            SceneObject::Basket(b) => b.material,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        match self {
            SceneObject::Ball(b) => b.dynamic,
            SceneObject::Platform(p) => p.dynamic,
            SceneObject::Basket(b) => b.dynamic,
        }
    }

    /// Display color name
    pub fn color(&self) -> &str {
        match self {
            SceneObject::Ball(b) => &b.color,
            SceneObject::Platform(p) => &p.color,
            SceneObject::Basket(_) => "black",
        }
    }

    /// Check that `name` reads as this object's kind
    pub fn check_name(&self, name: &str) -> Result<()> {
        match ObjectKind::from_name(name) {
            None => Err(PhyreError::UnknownObjectKind(name.to_string())),
            Some(expected) if expected != self.kind() => Err(PhyreError::KindMismatch {
                name: name.to_string(),
                expected: expected.as_str(),
                actual: self.kind().as_str(),
            }),
            Some(_) => Ok(()),
        }
    }

    /// Parse the scene-file record stored under `name`
    pub fn from_record(name: &str, value: serde_json::Value) -> Result<Self> {
        let kind = ObjectKind::from_name(name)
            .ok_or_else(|| PhyreError::UnknownObjectKind(name.to_string()))?;
        let object = match kind {
            ObjectKind::Basket => SceneObject::Basket(serde_json::from_value::<BasketRecord>(value)?.into()),
            ObjectKind::Ball => SceneObject::Ball(serde_json::from_value::<BallRecord>(value)?.into()),
            ObjectKind::Platform => {
                SceneObject::Platform(serde_json::from_value::<PlatformRecord>(value)?.into())
            }
        };
        Ok(object)
    }

    /// Scene-file record for this object
    pub fn to_record(&self) -> Result<serde_json::Value> {
        let value = match self {
            SceneObject::Ball(b) => serde_json::to_value(BallRecord::from(b))?,
            SceneObject::Platform(p) => serde_json::to_value(PlatformRecord::from(p))?,
            SceneObject::Basket(b) => serde_json::to_value(BasketRecord::from(b))?,
        };
        Ok(value)
    }
}

impl From<Ball> for SceneObject {
    fn from(ball: Ball) -> Self {
        SceneObject::Ball(ball)
    }
}

impl From<Platform> for SceneObject {
    fn from(platform: Platform) -> Self {
        SceneObject::Platform(platform)
    }
}

impl From<Basket> for SceneObject {
    fn from(basket: Basket) -> Self {
        SceneObject::Basket(basket)
    }
}

// === Scene-file records ===

fn default_friction() -> f32 {
    DEFAULT_FRICTION
}

fn default_restitution() -> f32 {
    DEFAULT_RESTITUTION
}

fn default_color() -> String {
    "black".to_string()
}

fn default_true() -> bool {
    true
}

fn default_platform_thickness() -> f32 {
    PLATFORM_THICKNESS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BallRecord {
    x: f32,
    y: f32,
    radius: f32,
    #[serde(default = "default_color")]
    color: String,
    #[serde(default = "default_friction")]
    friction: f32,
    #[serde(default = "default_restitution")]
    restitution: f32,
    #[serde(default = "default_true")]
    dynamic: bool,
}

impl From<BallRecord> for Ball {
    fn from(r: BallRecord) -> Self {
        Ball {
            pos: Vec2::new(r.x, r.y),
            radius: r.radius,
            color: r.color,
            material: Material {
                friction: r.friction,
                restitution: r.restitution,
                ..Default::default()
            },
            dynamic: r.dynamic,
        }
    }
}

impl From<&Ball> for BallRecord {
    fn from(b: &Ball) -> Self {
        BallRecord {
            x: b.pos.x,
            y: b.pos.y,
            radius: b.radius,
            color: b.color.clone(),
            friction: b.material.friction,
            restitution: b.material.restitution,
            dynamic: b.dynamic,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PlatformRecord {
    x: f32,
    y: f32,
    length: f32,
    #[serde(default)]
    angle: f32,
    #[serde(default = "default_color")]
    color: String,
    #[serde(default = "default_platform_thickness")]
    thickness: f32,
    #[serde(default = "default_friction")]
    friction: f32,
    #[serde(default = "default_restitution")]
    restitution: f32,
    #[serde(default)]
    dynamic: bool,
}

impl From<PlatformRecord> for Platform {
    fn from(r: PlatformRecord) -> Self {
        Platform {
            pos: Vec2::new(r.x, r.y),
            angle: r.angle,
            length: r.length,
            thickness: r.thickness,
            color: r.color,
            material: Material {
                friction: r.friction,
                restitution: r.restitution,
                ..Default::default()
            },
            dynamic: r.dynamic,
        }
    }
}

impl From<&Platform> for PlatformRecord {
    fn from(p: &Platform) -> Self {
        PlatformRecord {
            x: p.pos.x,
            y: p.pos.y,
            length: p.length,
            angle: p.angle,
            color: p.color.clone(),
            thickness: p.thickness,
            friction: p.material.friction,
            restitution: p.material.restitution,
            dynamic: p.dynamic,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BasketRecord {
    x: f32,
    y: f32,
    scale: f32,
    #[serde(default)]
    angle: f32,
    #[serde(default = "default_friction")]
    friction: f32,
    #[serde(default = "default_restitution")]
    restitution: f32,
    #[serde(default = "default_true")]
    dynamic: bool,
}

impl From<BasketRecord> for Basket {
    fn from(r: BasketRecord) -> Self {
        Basket {
            pos: Vec2::new(r.x, r.y),
            angle: r.angle,
            scale: r.scale,
            material: Material {
                friction: r.friction,
                restitution: r.restitution,
                ..Default::default()
            },
            dynamic: r.dynamic,
        }
    }
}

impl From<&Basket> for BasketRecord {
    fn from(b: &Basket) -> Self {
        BasketRecord {
            x: b.pos.x,
            y: b.pos.y,
            scale: b.scale,
            angle: b.angle,
            friction: b.material.friction,
            restitution: b.material.restitution,
            dynamic: b.dynamic,
        }
    }
}

//! Level data: named scene objects plus the target and action roles
//!
//! Scene files are JSON:
//!
//! ```json
//! {
//!   "objects": {
//!     "basket": { "x": 0.0, "y": -5.0, "scale": 1.0 },
//!     "green_ball": { "x": 2.67, "y": -1.25, "radius": 0.17, "color": "green" },
//!     "platform_1": { "x": -4.29, "y": -3.25, "length": 2.5, "angle": -45.0, "color": "black" }
//!   },
//!   "target": "green_ball",
//!   "actions": ["red_ball"]
//! }
//! ```
//!
//! An object's kind is read from its name: `basket`, `*ball*` or `*platform*`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::builders::{build_object, build_walls};
use super::objects::{Ball, Basket, Platform, SceneObject};
use super::world::PhysicsWorld;
use crate::consts::{BASKET_NAME, WALL_NAMES};
use crate::error::{PhyreError, Result};

/// On-disk layout of a level
#[derive(Debug, Serialize, Deserialize)]
struct LevelFile {
    objects: BTreeMap<String, serde_json::Value>,
    target: String,
    actions: Vec<String>,
}

/// A puzzle: objects by name, the target to land, the objects the agent places
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub name: String,
    /// Sorted by name for stable build order
    pub objects: BTreeMap<String, SceneObject>,
    pub target: String,
    pub actions: Vec<String>,
}

impl Default for Level {
    fn default() -> Self {
        Self::default_level()
    }
}

impl Level {
    /// An empty, not yet valid level
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: BTreeMap::new(),
            target: String::new(),
            actions: Vec::new(),
        }
    }

    /// Built-in starter level
    pub fn default_level() -> Self {
        let mut level = Self::new("DefaultLevel");
        level.objects = BTreeMap::from([
            ("basket".to_string(), Basket::new(0.0, -5.0, 1.0).into()),
            ("green_ball".to_string(), Ball::new(2.67, -1.25, 0.17, "green").into()),
            ("blue_ball".to_string(), Ball::new(0.0, 4.17, 0.417, "blue").into()),
            ("red_ball".to_string(), Ball::new(3.34, 2.5, 0.67, "red").into()),
            ("platform_1".to_string(), Platform::new(-4.29, -3.25, 2.5, -45.0).into()),
            ("platform_2".to_string(), Platform::new(4.458, -2.915, 2.5, -45.0).into()),
            ("platform_3".to_string(), Platform::new(-2.416, 2.083, 1.33, 0.0).into()),
        ]);
        level.target = "green_ball".to_string();
        level.actions = vec!["red_ball".to_string()];
        level
    }

    // === Validation ===

    /// Check every level invariant, reporting the first violation
    pub fn validate(&self) -> Result<()> {
        if self.objects.is_empty() {
            return Err(PhyreError::EmptyLevel);
        }
        if self.target.is_empty() {
            return Err(PhyreError::MissingTarget);
        }
        if self.actions.is_empty() {
            return Err(PhyreError::NoActions);
        }
        if !self.objects.contains_key(BASKET_NAME) {
            return Err(PhyreError::MissingBasket);
        }
        if self.target == BASKET_NAME {
            return Err(PhyreError::TargetIsBasket);
        }
        if !self.objects.contains_key(&self.target) {
            return Err(PhyreError::UnknownTarget(self.target.clone()));
        }
        for action in &self.actions {
            if !self.objects.contains_key(action) {
                return Err(PhyreError::UnknownAction(action.clone()));
            }
            if *action == self.target || action == BASKET_NAME {
                return Err(PhyreError::InvalidAction(action.clone()));
            }
        }
        for (name, object) in &self.objects {
            object.check_name(name)?;
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        match self.validate() {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Level {} is invalid: {}", self.name, e);
                false
            }
        }
    }

    // === Lookup ===

    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.get(name)
    }

    pub fn basket(&self) -> Result<&Basket> {
        match self.objects.get(BASKET_NAME) {
            Some(SceneObject::Basket(basket)) => Ok(basket),
            Some(other) => Err(PhyreError::KindMismatch {
                name: BASKET_NAME.to_string(),
                expected: "basket",
                actual: other.kind().as_str(),
            }),
            None => Err(PhyreError::MissingBasket),
        }
    }

    pub fn is_action(&self, name: &str) -> bool {
        self.actions.iter().any(|a| a == name)
    }

    // === Persistence ===

    /// Parse a level from scene-file JSON
    pub fn from_json(name: impl Into<String>, json: &str) -> Result<Self> {
        let file: LevelFile = serde_json::from_str(json)?;
        let objects = file
            .objects
            .into_iter()
            .map(|(key, value)| SceneObject::from_record(&key, value).map(|object| (key, object)))
            .collect::<Result<BTreeMap<_, _>>>()?;
        Ok(Self {
            name: name.into(),
            objects,
            target: file.target,
            actions: file.actions,
        })
    }

    /// Serialize to pretty scene-file JSON
    pub fn to_json(&self) -> Result<String> {
        let objects = self
            .objects
            .iter()
            .map(|(name, object)| object.to_record().map(|record| (name.clone(), record)))
            .collect::<Result<BTreeMap<_, _>>>()?;
        let file = LevelFile {
            objects,
            target: self.target.clone(),
            actions: self.actions.clone(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Path of a named level inside a level directory
    pub fn path_in(dir: impl AsRef<Path>, name: &str) -> PathBuf {
        dir.as_ref().join(format!("{name}.json"))
    }

    /// Load a level file; the level is named after the file stem
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Level".to_string());
        let level = Self::from_json(name, &fs::read_to_string(path)?)?;
        log::info!(
            "Loaded level {} ({} objects) from {}",
            level.name,
            level.objects.len(),
            path.display()
        );
        Ok(level)
    }

    /// Write the level file, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, self.to_json()?)?;
        log::info!("Level {} saved to {}", self.name, path.display());
        Ok(())
    }

    // === World construction ===

    /// Build the room walls and every object into `world`
    pub fn build(&self, world: &mut PhysicsWorld, room: Vec2, wall_thickness: f32) {
        build_walls(world, room, wall_thickness);
        for (name, object) in &self.objects {
            build_object(world, name, object);
        }
        log::debug!("Built level {} ({} bodies)", self.name, world.len());
    }

    // === Mutation ===

    /// Check that `name` may be removed
    pub fn check_removable(&self, name: &str) -> Result<()> {
        if !self.objects.contains_key(name) {
            return Err(PhyreError::ObjectNotFound(name.to_string()));
        }
        let role = if name == BASKET_NAME {
            Some("basket")
        } else if name == self.target {
            Some("target")
        } else if self.is_action(name) {
            Some("action object")
        } else {
            None
        };
        match role {
            Some(role) => Err(PhyreError::ProtectedObject {
                name: name.to_string(),
                role,
            }),
            None => Ok(()),
        }
    }

    /// Check that `object` may be added under `name`
    pub fn check_insertable(&self, name: &str, object: &SceneObject) -> Result<()> {
        if name == BASKET_NAME || name == self.target || WALL_NAMES.contains(&name) {
            return Err(PhyreError::ReservedName(name.to_string()));
        }
        if self.objects.contains_key(name) {
            return Err(PhyreError::DuplicateObject(name.to_string()));
        }
        object.check_name(name)
    }

    /// Remove an object's level entry (no world involved)
    pub fn remove_object(&mut self, name: &str) -> Result<SceneObject> {
        self.check_removable(name)?;
        self.objects
            .remove(name)
            .ok_or_else(|| PhyreError::ObjectNotFound(name.to_string()))
    }

    /// Insert a level entry (no world involved)
    pub fn insert_object(&mut self, name: &str, object: SceneObject, is_action: bool) -> Result<()> {
        self.check_insertable(name, &object)?;
        self.objects.insert(name.to_string(), object);
        if is_action {
            self.actions.push(name.to_string());
        }
        Ok(())
    }

    /// Destroy an object's body and level entry together.
    ///
    /// The basket, the target and action objects cannot be removed; a
    /// refused removal leaves both world and level untouched.
    pub fn null_object(&mut self, world: &mut PhysicsWorld, name: &str) -> Result<()> {
        self.check_removable(name)?;
        world.remove_body(name);
        self.objects.remove(name);
        log::debug!("Removed {} from level {}", name, self.name);
        Ok(())
    }

    /// Create an object's body and level entry together
    pub fn add_object(
        &mut self,
        world: &mut PhysicsWorld,
        name: &str,
        object: SceneObject,
        is_action: bool,
    ) -> Result<()> {
        self.check_insertable(name, &object)?;
        build_object(world, name, &object);
        self.insert_object(name, object, is_action)?;
        log::debug!("Added {} to level {} (action: {})", name, self.name, is_action);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::objects::ObjectKind;

    fn world() -> PhysicsWorld {
        PhysicsWorld::new(Vec2::new(0.0, -10.0))
    }

    fn built_default() -> (Level, PhysicsWorld) {
        let level = Level::default_level();
        let mut world = world();
        level.build(&mut world, Vec2::new(10.0, 10.0), 0.5);
        (level, world)
    }

    #[test]
    fn test_default_level_is_valid() {
        let level = Level::default_level();
        assert!(level.validate().is_ok());
        assert_eq!(level.basket().unwrap().scale, 1.0);
        assert_eq!(level.objects.len(), 7);
    }

    #[test]
    fn test_validation_rejects_empty_objects() {
        let mut level = Level::default_level();
        level.objects.clear();
        assert!(matches!(level.validate(), Err(PhyreError::EmptyLevel)));
        assert!(!level.is_valid());
    }

    #[test]
    fn test_validation_rejects_missing_basket() {
        let mut level = Level::default_level();
        level.objects.remove("basket");
        assert!(matches!(level.validate(), Err(PhyreError::MissingBasket)));
    }

    #[test]
    fn test_validation_rejects_unknown_target() {
        let mut level = Level::default_level();
        level.target = "purple_ball".into();
        assert!(matches!(level.validate(), Err(PhyreError::UnknownTarget(t)) if t == "purple_ball"));

        level.target = "basket".into();
        assert!(matches!(level.validate(), Err(PhyreError::TargetIsBasket)));

        level.target.clear();
        assert!(matches!(level.validate(), Err(PhyreError::MissingTarget)));
    }

    #[test]
    fn test_validation_rejects_bad_actions() {
        let mut level = Level::default_level();
        level.actions = vec!["ghost_ball".into()];
        assert!(matches!(level.validate(), Err(PhyreError::UnknownAction(a)) if a == "ghost_ball"));

        level.actions = vec!["green_ball".into()];
        assert!(matches!(level.validate(), Err(PhyreError::InvalidAction(_))));

        level.actions.clear();
        assert!(matches!(level.validate(), Err(PhyreError::NoActions)));
    }

    #[test]
    fn test_validation_rejects_misnamed_object() {
        let mut level = Level::default_level();
        level.objects.insert("platform_9".into(), Ball::new(0.0, 0.0, 0.1, "red").into());
        assert!(matches!(level.validate(), Err(PhyreError::KindMismatch { .. })));
    }

    #[test]
    fn test_json_roundtrip() {
        let level = Level::default_level();
        let back = Level::from_json("DefaultLevel", &level.to_json().unwrap()).unwrap();
        assert_eq!(back, level);
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = Level::path_in(dir.path().join("levels"), "DefaultLevel");
        let level = Level::default_level();
        level.save(&path).unwrap();

        let loaded = Level::load(&path).unwrap();
        assert_eq!(loaded.name, "DefaultLevel");
        assert_eq!(
            loaded.objects.keys().collect::<Vec<_>>(),
            level.objects.keys().collect::<Vec<_>>()
        );
        assert_eq!(loaded.objects, level.objects);
        assert_eq!(loaded.target, level.target);
        assert_eq!(loaded.actions, level.actions);
    }

    #[test]
    fn test_load_minimal_scene_file() {
        let json = r#"{
            "objects": {
                "basket": { "x": 0, "y": -5, "scale": 1.5 },
                "green_ball": { "x": 1, "y": 2, "radius": 0.2, "color": "green" },
                "red_ball": { "x": -1, "y": 2, "radius": 0.3, "color": "red" },
                "platform_a": { "x": 0, "y": 0, "length": 3, "angle": 10, "color": "gray" }
            },
            "target": "green_ball",
            "actions": ["red_ball"]
        }"#;
        let level = Level::from_json("mini", json).unwrap();
        assert!(level.validate().is_ok());
        assert_eq!(level.basket().unwrap().scale, 1.5);
        assert_eq!(level.object("platform_a").unwrap().kind(), ObjectKind::Platform);
    }

    #[test]
    fn test_load_rejects_unknown_kind() {
        let json = r#"{ "objects": { "crate": { "x": 0, "y": 0 } }, "target": "x", "actions": [] }"#;
        assert!(matches!(
            Level::from_json("bad", json),
            Err(PhyreError::UnknownObjectKind(name)) if name == "crate"
        ));
    }

    #[test]
    fn test_build_creates_walls_and_objects() {
        let (level, world) = built_default();
        assert_eq!(world.len(), level.objects.len() + 4);
        for name in level.objects.keys() {
            assert!(world.contains(name));
        }
    }

    #[test]
    fn test_null_protected_objects_changes_nothing() {
        let (mut level, mut world) = built_default();
        let before_level = level.clone();
        let before_bodies = world.len();

        for (name, role) in [
            ("basket", "basket"),
            ("green_ball", "target"),
            ("red_ball", "action object"),
        ] {
            let err = level.null_object(&mut world, name).unwrap_err();
            assert!(matches!(err, PhyreError::ProtectedObject { role: r, .. } if r == role));
        }

        assert_eq!(level, before_level);
        assert_eq!(world.len(), before_bodies);
        assert!(world.contains("basket") && world.contains("green_ball") && world.contains("red_ball"));
    }

    #[test]
    fn test_null_object_removes_body_and_entry() {
        let (mut level, mut world) = built_default();
        level.null_object(&mut world, "platform_3").unwrap();
        assert!(!world.contains("platform_3"));
        assert!(level.object("platform_3").is_none());

        assert!(matches!(
            level.null_object(&mut world, "platform_3"),
            Err(PhyreError::ObjectNotFound(_))
        ));
    }

    #[test]
    fn test_add_object_registers_action() {
        let (mut level, mut world) = built_default();
        level
            .add_object(&mut world, "yellow_ball", Ball::new(-3.0, 3.0, 0.2, "yellow").into(), true)
            .unwrap();
        assert!(world.contains("yellow_ball"));
        assert_eq!(level.actions, vec!["red_ball".to_string(), "yellow_ball".to_string()]);
        assert!(level.validate().is_ok());

        // Now an action object, so it is protected
        assert!(level.null_object(&mut world, "yellow_ball").is_err());
    }

    #[test]
    fn test_add_object_rejections_change_nothing() {
        let (mut level, mut world) = built_default();
        let before_level = level.clone();
        let before_bodies = world.len();

        let ball = || SceneObject::from(Ball::new(0.0, 0.0, 0.2, "white"));
        assert!(matches!(
            level.add_object(&mut world, "red_ball", ball(), false),
            Err(PhyreError::DuplicateObject(_))
        ));
        assert!(matches!(
            level.add_object(&mut world, "basket", Basket::new(1.0, 1.0, 1.0).into(), false),
            Err(PhyreError::ReservedName(_))
        ));
        assert!(matches!(
            level.add_object(&mut world, "left_wall", ball(), false),
            Err(PhyreError::ReservedName(_))
        ));
        assert!(matches!(
            level.add_object(&mut world, "platform_new", ball(), false),
            Err(PhyreError::KindMismatch { .. })
        ));

        assert_eq!(level, before_level);
        assert_eq!(world.len(), before_bodies);
    }

    #[test]
    fn test_data_only_insert_and_remove() {
        let mut level = Level::default_level();
        level
            .insert_object("platform_4", Platform::new(0.0, 1.0, 1.0, 0.0).into(), false)
            .unwrap();
        let removed = level.remove_object("platform_4").unwrap();
        assert_eq!(removed.kind(), ObjectKind::Platform);
        assert!(level.remove_object("basket").is_err());
    }
}

//! Episode control
//!
//! A [`PhyreEnv`] owns one physics world and one level. `step` places the
//! action objects, then runs the world at a fixed timestep until the target
//! lands in the basket, the step budget runs out, or the cancel token is
//! raised.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::level::Level;
use super::objects::SceneObject;
use super::spaces::BoxSpace;
use super::success::{SuccessCheck, SuccessRegion, detect_success};
use super::world::{BodyView, PhysicsWorld};
use crate::error::{PhyreError, Result};
use crate::settings::EnvConfig;

/// Lifecycle of an environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Closed; no bodies exist
    Unloaded,
    /// Built and waiting for actions
    Loaded,
    /// Inside `step`
    Running,
    Succeeded,
    TimedOut,
    Aborted,
}

impl SessionPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionPhase::Succeeded | SessionPhase::TimedOut | SessionPhase::Aborted
        )
    }
}

/// How an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodeStatus {
    Succeeded,
    TimedOut,
    Aborted,
}

impl From<EpisodeStatus> for SessionPhase {
    fn from(status: EpisodeStatus) -> Self {
        match status {
            EpisodeStatus::Succeeded => SessionPhase::Succeeded,
            EpisodeStatus::TimedOut => SessionPhase::TimedOut,
            EpisodeStatus::Aborted => SessionPhase::Aborted,
        }
    }
}

/// Shared stop flag, observed between physics steps
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Everything a frontend needs to draw one step
pub struct Frame<'a> {
    pub step: u32,
    pub bodies: Vec<BodyView>,
    pub level: &'a Level,
    pub region: Option<SuccessRegion>,
    /// Raise to stop the episode after this step
    pub cancel: &'a CancelToken,
}

/// Rendering collaborator, called synchronously after every step
pub trait Frontend {
    fn present(&mut self, frame: &Frame<'_>);

    fn close(&mut self) {}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Physics steps taken
    pub steps: u32,
    pub status: EpisodeStatus,
    /// Success region at the last check
    pub region: Option<SuccessRegion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Target position at the end of the episode
    pub observation: Vec2,
    pub reward: f32,
    /// The episode succeeded or was aborted
    pub done: bool,
    pub info: StepInfo,
}

/// A puzzle environment: level, world and episode state
pub struct PhyreEnv {
    config: EnvConfig,
    level: Level,
    world: PhysicsWorld,
    phase: SessionPhase,
    cancel: CancelToken,
    frontend: Option<Box<dyn Frontend>>,
    action_space: BoxSpace,
    observation_space: BoxSpace,
}

impl PhyreEnv {
    /// Validate `level` and build it into a fresh world
    pub fn new(level: Level, config: EnvConfig) -> Result<Self> {
        level.validate()?;
        let room = config.room_size();
        let mut env = Self {
            world: PhysicsWorld::new(config.gravity_vec()),
            action_space: BoxSpace::actions(room, level.actions.len()),
            observation_space: BoxSpace::observation(room),
            phase: SessionPhase::Unloaded,
            cancel: CancelToken::new(),
            frontend: None,
            config,
            level,
        };
        env.build();
        log::info!(
            "Environment ready: level {} ({} objects, target {}, actions {:?})",
            env.level.name,
            env.level.objects.len(),
            env.level.target,
            env.level.actions
        );
        Ok(env)
    }

    /// Attach a rendering frontend
    pub fn with_frontend(mut self, frontend: Box<dyn Frontend>) -> Self {
        self.frontend = Some(frontend);
        self
    }

    fn build(&mut self) {
        self.level
            .build(&mut self.world, self.config.room_size(), self.config.wall_thickness);
        self.phase = SessionPhase::Loaded;
    }

    // === Episode control ===

    /// Destroy and rebuild every body; returns the initial observation
    pub fn reset(&mut self) -> Result<Vec2> {
        self.world.clear();
        self.cancel.clear();
        self.build();
        log::info!("Reset level {}", self.level.name);
        self.observation()
    }

    /// Place the action objects at `actions` (one per action, in level
    /// order) and simulate until the episode ends.
    pub fn step(&mut self, actions: &[Vec2]) -> Result<StepOutcome> {
        if self.phase != SessionPhase::Loaded {
            return Err(PhyreError::NotSteppable(self.phase));
        }
        if actions.len() != self.level.actions.len() {
            return Err(PhyreError::ActionCount {
                expected: self.level.actions.len(),
                got: actions.len(),
            });
        }
        if !self.action_space.contains_points(actions) {
            log::warn!("Actions {:?} lie outside the playfield", actions);
        }
        for (name, &position) in self.level.actions.iter().zip(actions) {
            if !self.world.teleport(name, position) {
                return Err(PhyreError::BodyNotFound(name.clone()));
            }
        }

        self.phase = SessionPhase::Running;
        let (status, steps, region) = match self.run_episode() {
            Ok(result) => result,
            Err(e) => {
                self.phase = SessionPhase::Aborted;
                return Err(e);
            }
        };
        self.phase = status.into();

        match status {
            EpisodeStatus::Succeeded => log::info!("Target {} landed after {} steps", self.level.target, steps),
            EpisodeStatus::TimedOut => log::debug!("Episode timed out after {} steps", steps),
            EpisodeStatus::Aborted => log::info!("Episode aborted after {} steps", steps),
        }

        let succeeded = status == EpisodeStatus::Succeeded;
        Ok(StepOutcome {
            observation: self.observation()?,
            reward: if succeeded { 1.0 } else { 0.0 },
            done: succeeded || status == EpisodeStatus::Aborted,
            info: StepInfo {
                steps,
                status,
                region,
            },
        })
    }

    fn run_episode(&mut self) -> Result<(EpisodeStatus, u32, Option<SuccessRegion>)> {
        let dt = self.config.time_step();
        let mut steps = 0;
        let mut region = None;

        let status = loop {
            if self.cancel.is_cancelled() {
                break EpisodeStatus::Aborted;
            }
            if steps >= self.config.max_steps {
                break EpisodeStatus::TimedOut;
            }

            self.world.step(
                dt,
                self.config.velocity_iterations,
                self.config.position_iterations,
            );
            steps += 1;

            let check = detect_success(&self.world, &self.level, self.config.tolerance)?;
            region = Some(check.region);

            if let Some(frontend) = self.frontend.as_mut() {
                frontend.present(&Frame {
                    step: steps,
                    bodies: self.world.bodies(),
                    level: &self.level,
                    region,
                    cancel: &self.cancel,
                });
            }

            if check.inside {
                break EpisodeStatus::Succeeded;
            }
        };
        Ok((status, steps, region))
    }

    /// Destroy every body and close the frontend
    pub fn close(&mut self) {
        if self.phase == SessionPhase::Unloaded {
            return;
        }
        self.world.clear();
        if let Some(frontend) = self.frontend.as_mut() {
            frontend.close();
        }
        self.phase = SessionPhase::Unloaded;
        log::info!("Closed level {}", self.level.name);
    }

    // === Scene editing ===

    /// Add an object to both world and level; `is_action` makes it a
    /// placeable action object
    pub fn add_object(&mut self, name: &str, object: SceneObject, is_action: bool) -> Result<()> {
        self.level.add_object(&mut self.world, name, object, is_action)?;
        if is_action {
            self.action_space = BoxSpace::actions(self.config.room_size(), self.level.actions.len());
        }
        Ok(())
    }

    /// Remove a non-essential object from both world and level
    pub fn null_object(&mut self, name: &str) -> Result<()> {
        self.level.null_object(&mut self.world, name)
    }

    // === Inspection ===

    /// Current target position
    pub fn observation(&self) -> Result<Vec2> {
        self.world
            .pose(&self.level.target)
            .map(|(pos, _)| pos)
            .ok_or_else(|| PhyreError::BodyNotFound(self.level.target.clone()))
    }

    pub fn check_success(&self) -> Result<SuccessCheck> {
        detect_success(&self.world, &self.level, self.config.tolerance)
    }

    pub fn bodies(&self) -> Vec<BodyView> {
        self.world.bodies()
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn action_space(&self) -> &BoxSpace {
        &self.action_space
    }

    pub fn observation_space(&self) -> &BoxSpace {
        &self.observation_space
    }

    /// A handle that stops the running episode from another thread
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}

impl Drop for PhyreEnv {
    fn drop(&mut self) {
        self.close();
    }
}

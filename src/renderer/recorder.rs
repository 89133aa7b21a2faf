//! Headless frontend that keeps a per-step trace and the latest debug mesh

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::shapes::{self, Mesh, Viewport};
use super::vertex::Vertex;
use crate::error::Result;
use crate::settings::EnvConfig;
use crate::sim::{Frame, Frontend, SuccessRegion};

/// Pose of one body at one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyPose {
    pub name: String,
    pub position: Vec2,
    pub angle: f32,
}

/// One presented frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub step: u32,
    pub bodies: Vec<BodyPose>,
    pub region: Option<SuccessRegion>,
}

/// Records every frame it is shown
pub struct MeshRecorder {
    viewport: Viewport,
    mesh: Mesh,
    records: Vec<FrameRecord>,
    /// Raise the cancel token once this step has been presented
    quit_after: Option<u32>,
    closed: bool,
}

impl MeshRecorder {
    pub fn new(config: &EnvConfig) -> Self {
        Self {
            viewport: Viewport::new(config.screen_extent(), config.ppm),
            mesh: Mesh::default(),
            records: Vec::new(),
            quit_after: None,
            closed: false,
        }
    }

    pub fn quit_after(mut self, step: u32) -> Self {
        self.quit_after = Some(step);
        self
    }

    pub fn records(&self) -> &[FrameRecord] {
        &self.records
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Raw triangle vertex bytes, ready for upload
    pub fn triangle_bytes(&self) -> &[u8] {
        bytemuck::cast_slice::<Vertex, u8>(&self.mesh.triangles)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Write the trace as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, serde_json::to_string_pretty(&self.records)?)?;
        log::info!("Recorded {} frames to {}", self.records.len(), path.display());
        Ok(())
    }
}

impl Frontend for MeshRecorder {
    fn present(&mut self, frame: &Frame<'_>) {
        self.mesh = shapes::frame(&self.viewport, frame);
        self.records.push(FrameRecord {
            step: frame.step,
            bodies: frame
                .bodies
                .iter()
                .map(|b| BodyPose {
                    name: b.name.clone(),
                    position: b.position,
                    angle: b.angle,
                })
                .collect(),
            region: frame.region,
        });
        if self.quit_after.is_some_and(|step| frame.step >= step) {
            log::debug!("Recorder stopping the episode at step {}", frame.step);
            frame.cancel.cancel();
        }
    }

    fn close(&mut self) {
        self.closed = true;
        log::debug!("Recorder closed after {} frames", self.records.len());
    }
}

/// Lets a caller keep reading a recorder after handing it to an environment
impl<T: Frontend> Frontend for std::rc::Rc<std::cell::RefCell<T>> {
    fn present(&mut self, frame: &Frame<'_>) {
        self.borrow_mut().present(frame);
    }

    fn close(&mut self) {
        self.borrow_mut().close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{EpisodeStatus, Level, PhyreEnv};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn config() -> EnvConfig {
        EnvConfig {
            max_steps: 50,
            ..EnvConfig::default()
        }
    }

    #[test]
    fn test_records_every_step_and_quits() {
        let recorder = Rc::new(RefCell::new(MeshRecorder::new(&config()).quit_after(4)));
        let mut env = PhyreEnv::new(Level::default_level(), config())
            .unwrap()
            .with_frontend(Box::new(recorder.clone()));
        let outcome = env.step(&[Vec2::new(-3.0, 4.0)]).unwrap();
        assert_eq!(outcome.info.status, EpisodeStatus::Aborted);

        let rec = recorder.borrow();
        let steps: Vec<u32> = rec.records().iter().map(|r| r.step).collect();
        assert_eq!(steps, vec![1, 2, 3, 4]);
        assert_eq!(rec.records()[0].bodies.len(), 11);
        assert!(rec.records()[0].region.is_some());
        assert!(!rec.mesh().triangles.is_empty());
        assert!(!rec.mesh().lines.is_empty());
        assert_eq!(rec.triangle_bytes().len(), rec.mesh().triangles.len() * 24);
        drop(rec);

        drop(env);
        assert!(recorder.borrow().is_closed());
    }

    #[test]
    fn test_save_writes_json_trace() {
        let recorder = Rc::new(RefCell::new(MeshRecorder::new(&config())));
        let mut env = PhyreEnv::new(Level::default_level(), config())
            .unwrap()
            .with_frontend(Box::new(recorder.clone()));
        env.step(&[Vec2::new(100.0, 100.0)]).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.json");
        recorder.borrow().save(&path).unwrap();
        let back: Vec<FrameRecord> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.len(), 50);
        assert_eq!(back, recorder.borrow().records());
    }
}

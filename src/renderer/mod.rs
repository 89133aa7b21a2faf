//! Debug-draw rendering module
//!
//! Turns world snapshots into screen-space vertex lists. No GPU work happens
//! here; a frontend uploads the vertices however it likes.

pub mod recorder;
pub mod shapes;
pub mod vertex;

pub use recorder::{FrameRecord, MeshRecorder};
pub use shapes::{Mesh, Viewport};
pub use vertex::{Vertex, colors};

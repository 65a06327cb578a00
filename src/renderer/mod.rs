//! WebGPU rendering module
//!
//! The scene is flat shapes tessellated on the CPU into one triangle list per
//! frame, placed by a pseudo-3D road camera.

pub mod pipeline;
pub mod projection;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState};
pub use projection::{Camera, Projected, RoadStrip};
pub use scene::{SceneOptions, build_scene};
pub use vertex::Vertex;

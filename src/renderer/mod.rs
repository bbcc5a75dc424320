//! WebGPU rendering module
//!
//! The scene is built on the CPU as a triangle list in field coordinates
//! ([`scene::build_scene`]) and drawn by a single pipeline; the vertex shader
//! letterboxes it into the viewport through a [`ViewTransform`] uniform.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{ViewTransform, build_scene, field_to_ndc};
pub use vertex::Vertex;

//! WebGPU rendering module
//!
//! The scene is tessellated into flat-colored triangles in world space and
//! projected through the orthographic camera.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;

//! Batched 2D rendering
//!
//! Particles register quads in a [`RenderBatch`]; a frame is drawn with one
//! call into a [`DrawTarget`]. [`BatchPipeline`] is the WebGPU target.

pub mod batch;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use batch::{BatchKey, DrawTarget, FrameStats, Quad, RenderBatch, VERTICES_PER_QUAD};
pub use pipeline::{BatchPipeline, GpuDrawTarget};
pub use shapes::{Rectangle, Renderable, RenderableKind, Sprite, SpriteImage};
pub use vertex::Vertex;

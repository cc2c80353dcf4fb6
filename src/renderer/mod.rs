//! WebGPU rendering module
//!
//! Balls are tessellated into triangle fans on the CPU and drawn in one pass.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, pixel_to_ndc};

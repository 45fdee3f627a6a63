//! CPU shading core shared by the demo binaries.
//!
//! Every frame flows through the same small pipeline:
//!
//! ```text
//!   time ──▶ ComputeContext::evaluate ──▶ Shader::shade (per pixel, parallel)
//!                       │
//!                       └─▶ to_rgb8 ──▶ Canvas (row height-1-y)
//! ```
//!
//! Shaders are pure functions of the pixel coordinate, the canvas resolution
//! and the elapsed time. They may read immutable data (the tunnel's
//! [`Texture`]) but never observe other pixels, which is what lets
//! [`ComputeContext`] hand rows to worker threads in any order.

pub mod canvas;
pub mod compute;
pub mod shader;
pub mod shaders;
pub mod texture;

pub use canvas::{Canvas, CanvasError};
pub use compute::{ComputeContext, ComputeError};
pub use glam::{Vec2, Vec3};
pub use shader::{to_rgb8, Shader};
pub use shaders::{ColorCycle, Tunnel};
pub use texture::{Texture, TextureError};

//! GPU side of the window surface.
//!
//! - `context` owns the wgpu instance, device and swapchain and rebuilds the
//!   swapchain when the window changes size.
//! - `blit` streams the CPU canvas into a texture and draws it with a
//!   full-screen triangle.
//! - `state` glues both together behind the `GpuState` API used by `window`.

mod blit;
mod context;
mod state;

pub(crate) use state::{GpuState, PresentStatus};

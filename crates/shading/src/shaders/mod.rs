//! The two demo shaders.

mod color_cycle;
mod tunnel;

pub use color_cycle::{ColorCycle, PHASE_OFFSETS};
pub use tunnel::{Tunnel, GLOW_TINT, MIN_RHO};

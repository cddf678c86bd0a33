//! The GPU interpolation contract.
//!
//! Per-vertex and per-particle evaluation happens entirely on the GPU: the
//! host uploads the static particle buffers once, then writes only the small
//! uniform structs in [`uniforms`] each frame. The WGSL programs in [`wgsl`]
//! consume them; [`parity`] mirrors every shader expression in plain Rust so
//! the contract is testable without a device.

pub mod parity;
pub mod uniforms;
pub mod wgsl;

pub use uniforms::{ParticleUniforms, SurfaceUniforms};

//! Uniform structs shared with the WGSL programs.
//!
//! Layouts are std140-compatible; `vec3` members sit on 16-byte boundaries
//! with explicit scalar packing in the trailing slot.

use crate::config::Colors;
use crate::phase::PhaseState;

/// Uniform block for the surface-displacement program.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SurfaceUniforms {
    /// Elapsed time in seconds.                     offset 0
    pub time: f32,
    /// Surface-dissolve phase.                      offset 4
    pub dissolve: f32,
    /// Spatial frequency of the dissolve noise.     offset 8
    pub noise_scale: f32,
    /// Surface rotation about the vertical axis.    offset 12
    pub spin_y: f32,
    /// Surface rotation about the depth axis.       offset 16
    pub spin_z: f32,
    /// Padding to a 32-byte block.                  offset 20
    pub _pad: [f32; 3],
}

impl SurfaceUniforms {
    /// Assemble the frame's surface uniforms.
    pub fn from_state(time: f64, state: &PhaseState, noise_scale: f64) -> Self {
        Self {
            time: time as f32,
            dissolve: state.dissolve as f32,
            noise_scale: noise_scale as f32,
            spin_y: state.spin.y as f32,
            spin_z: state.spin.z as f32,
            _pad: [0.0; 3],
        }
    }
}

/// Uniform block for the particle-morph program.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleUniforms {
    /// Elapsed time in seconds.                     offset 0
    pub time: f32,
    /// Particle-formation phase.                    offset 4
    pub formation: f32,
    /// Explosion phase.                             offset 8
    pub explosion: f32,
    /// Convergence phase.                           offset 12
    pub convergence: f32,
    /// Ink color, the newsprint end of the mix.     offset 16
    pub color_ink: [f32; 3],
    /// Clamped device pixel ratio.                  offset 28
    pub pixel_ratio: f32,
    /// Accent color, the formed-eye end of the mix. offset 32
    pub color_accent: [f32; 3],
    /// Padding to a 48-byte block.                  offset 44
    pub _pad: f32,
}

impl ParticleUniforms {
    /// Assemble the frame's particle uniforms.
    pub fn from_state(time: f64, state: &PhaseState, colors: &Colors, pixel_ratio: f64) -> Self {
        Self {
            time: time as f32,
            formation: state.formation as f32,
            explosion: state.explosion as f32,
            convergence: state.convergence as f32,
            color_ink: colors.ink.to_f32(),
            pixel_ratio: pixel_ratio as f32,
            color_accent: colors.accent.to_f32(),
            _pad: 0.0,
        }
    }
}

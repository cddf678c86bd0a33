//! CPU mirrors of the shader math.
//!
//! These functions evaluate the same expressions as the WGSL programs so the
//! interpolation contract can be tested — and, if ever needed, rendered —
//! without a GPU. Keep the constants in lockstep with
//! [`crate::gpu::wgsl`].

use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use crate::animation::ease::Ease;
use crate::foundation::math::{hash2, smoothstep, value_noise2};

/// Fragment-stage classification of one surface sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceSample {
    /// Below the dissolve threshold minus the edge width: not drawn.
    pub discarded: bool,
    /// Inside the edge band: replaced with the bright energy color.
    pub edge: bool,
    /// Coarse grid line near the dissolve front: tinted.
    pub grid_tint: bool,
}

/// Width of the energy edge band.
pub const DISSOLVE_EDGE: f32 = 0.05;
/// Dissolve phase to threshold gain.
pub const DISSOLVE_RATE: f32 = 1.8;

/// Noise sample driving a vertex's dissolve, drifting with time.
pub fn dissolve_noise(position: Vec3, time: f32, noise_scale: f32) -> f32 {
    value_noise2(
        position.x * noise_scale + time * 0.2,
        position.y * noise_scale + time * 0.2,
    )
}

/// Vertex-stage displacement of the surface mesh.
pub fn displace_surface(position: Vec3, uv: Vec2, time: f32, dissolve: f32, noise_scale: f32) -> Vec3 {
    let mut pos = position;
    pos.x += (position.y * 10.0 + time * 5.0).sin() * 0.05 * dissolve;
    let n = dissolve_noise(position, time, noise_scale);
    pos += Vec3::new(0.0, 1.0, 0.5) * dissolve * n * 5.0;
    pos.x += (hash2(uv.x + time, uv.y + time) - 0.5) * 0.1 * dissolve;
    pos
}

/// Fragment-stage classification for a noise sample at `uv`.
pub fn classify_surface(noise: f32, dissolve: f32, uv: Vec2) -> SurfaceSample {
    let threshold = dissolve * DISSOLVE_RATE;
    let discarded = noise < threshold - DISSOLVE_EDGE;
    let edge = !discarded && noise < threshold;
    let grid = step(0.9, fract(uv.x * 50.0)) + step(0.9, fract(uv.y * 50.0));
    let grid_tint = !discarded && dissolve > 0.0 && grid > 0.5 && noise < threshold + 0.2;
    SurfaceSample {
        discarded,
        edge,
        grid_tint,
    }
}

/// Eased per-particle progress: the staggered arrival clock.
pub fn particle_progress(formation: f32, stagger: f32) -> f32 {
    let p = smoothstep(0.0, 1.0, formation * 1.5 - stagger * 0.5);
    Ease::InOutCubic.apply(f64::from(p)) as f32
}

/// Oscillatory mid-transition turbulence, zero at both endpoints.
pub fn turbulence(time: f32, stagger: f32, progress: f32) -> f32 {
    (time * 5.0 + stagger * 10.0).sin() * (progress * PI).sin() * 0.5
}

/// Full vertex-stage position for one particle.
pub fn particle_position(
    initial: Vec3,
    target: Vec3,
    stagger: f32,
    time: f32,
    formation: f32,
    explosion: f32,
    convergence: f32,
) -> Vec3 {
    let progress = particle_progress(formation, stagger);
    let mut pos = initial.lerp(target, progress);
    pos += Vec3::splat(turbulence(time, stagger, progress));

    if progress > 0.8 {
        let angle = time * 0.2 * (1.0 + stagger * 0.5);
        let (s, c) = angle.sin_cos();
        pos = Vec3::new(pos.x * c - pos.z * s, pos.y, pos.x * s + pos.z * c);
    }

    if explosion > 0.0 {
        let dir = if pos.length() > 1e-4 {
            pos.normalize()
        } else {
            Vec3::Z
        };
        pos += dir * explosion * explosion * (0.5 + stagger) * 6.0;
    }
    pos * (1.0 - convergence * 0.85)
}

/// Particle opacity: fades in over the first tenth of formation, fades down
/// as convergence pulls the cloud into the final still.
pub fn particle_alpha(formation: f32, convergence: f32) -> f32 {
    let mut alpha = 1.0;
    if formation < 0.1 {
        alpha = formation * 10.0;
    }
    alpha * (1.0 - convergence * 0.7)
}

/// Ink → accent color mix; squared progress keeps the color shift lagging
/// behind the motion.
pub fn particle_color(ink: [f32; 3], accent: [f32; 3], progress: f32, explosion: f32) -> [f32; 3] {
    let t = progress * progress;
    let glow = 1.0 + explosion * 2.0;
    [
        (ink[0] + (accent[0] - ink[0]) * t) * glow,
        (ink[1] + (accent[1] - ink[1]) * t) * glow,
        (ink[2] + (accent[2] - ink[2]) * t) * glow,
    ]
}

/// Point size in pixels, attenuating with view-space depth.
pub fn point_size(stagger: f32, pixel_ratio: f32, view_z: f32) -> f32 {
    (4.0 + stagger * 3.0) * pixel_ratio * (15.0 / -view_z)
}

/// Soft-edged circular sprite falloff; `None` outside the disc.
pub fn sprite_falloff(r: f32) -> Option<f32> {
    if r > 0.5 {
        return None;
    }
    Some((1.0 - r * 2.0).powf(1.5))
}

fn step(edge: f32, x: f32) -> f32 {
    if x < edge { 0.0 } else { 1.0 }
}

fn fract(x: f32) -> f32 {
    x - x.floor()
}

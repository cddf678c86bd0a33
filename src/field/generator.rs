use std::f64::consts::{PI, TAU};

use glam::Vec3;
use tracing::info;

use crate::foundation::math::Rng64;

/// Procedural rule that placed a particle's target position.
///
/// The split is by index, not by chance: the first `floor(0.7·N)` particles
/// are [`TargetRule::Ring`] (the iris) and the remainder are
/// [`TargetRule::Sphere`] (the pupil), so the 70/30 visual mass split is
/// exact for any N.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetRule {
    /// Flat annulus: radius in `[2.5, 4.0]`, depth in `[-0.75, 0.75]`.
    Ring,
    /// Jittered sphere of radius 1.2, pushed +0.5 forward in depth.
    Sphere,
}

/// Static per-particle buffers consumed by the GPU morph program.
///
/// Three parallel buffers with index correspondence: scattered initial
/// positions, procedurally shaped target positions, and one persistent
/// random scalar per particle used only to desynchronize morph timing.
/// Allocated once at startup; read-only for the remainder of the process.
#[derive(Clone, Debug)]
pub struct ParticleField {
    count: usize,
    ring_count: usize,
    initial: Vec<f32>,
    target: Vec<f32>,
    stagger: Vec<f32>,
    rules: Vec<TargetRule>,
}

impl ParticleField {
    /// Generate the field for `count` particles.
    ///
    /// Pure function of `(count, plane_extent, seed)`; this path has no
    /// failure mode. The initial layout scatters particles over the
    /// newspaper plane (`plane_extent` square, thin z slab) so the cloud
    /// coincides with the flat surface before any morphing begins.
    pub fn generate(count: usize, plane_extent: f64, seed: u64) -> Self {
        let mut rng = Rng64::new(seed);
        let half = plane_extent * 0.5;

        let mut initial = Vec::with_capacity(count * 3);
        let mut stagger = Vec::with_capacity(count);
        for _ in 0..count {
            initial.push(rng.next_range(-half, half) as f32);
            initial.push(rng.next_range(-half, half) as f32);
            initial.push(rng.next_range(-0.25, 0.25) as f32);
            stagger.push(rng.next_f64_01() as f32);
        }

        let ring_count = (count as f64 * 0.7).floor() as usize;
        let mut target = Vec::with_capacity(count * 3);
        let mut rules = Vec::with_capacity(count);
        for i in 0..count {
            let rule = if i < ring_count {
                TargetRule::Ring
            } else {
                TargetRule::Sphere
            };
            let p = match rule {
                TargetRule::Ring => {
                    let angle = rng.next_range(0.0, TAU);
                    let radius = rng.next_range(2.5, 4.0);
                    let depth = rng.next_range(-0.75, 0.75);
                    [angle.cos() * radius, angle.sin() * radius, depth]
                }
                TargetRule::Sphere => {
                    // Inverse-cosine latitude plus a spiral longitude sweep
                    // keeps the pupil free of polar clustering.
                    let phi = (-1.0 + 2.0 * rng.next_f64_01()).acos();
                    let theta = (count as f64 * PI).sqrt() * phi;
                    let r = 1.2;
                    [
                        r * theta.cos() * phi.sin(),
                        r * theta.sin() * phi.sin(),
                        r * phi.cos() + 0.5,
                    ]
                }
            };
            target.push(p[0] as f32);
            target.push(p[1] as f32);
            target.push(p[2] as f32);
            rules.push(rule);
        }

        info!(count, ring_count, "generated particle field");
        Self {
            count,
            ring_count,
            initial,
            target,
            stagger,
            rules,
        }
    }

    /// Number of particles.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Number of particles placed by the ring rule.
    pub fn ring_count(&self) -> usize {
        self.ring_count
    }

    /// Interleaved `[x, y, z]` initial positions, length `3·count`.
    pub fn initial_positions(&self) -> &[f32] {
        &self.initial
    }

    /// Interleaved `[x, y, z]` target positions, length `3·count`.
    pub fn target_positions(&self) -> &[f32] {
        &self.target
    }

    /// Per-particle timing scalars in `[0, 1)`, length `count`.
    pub fn stagger(&self) -> &[f32] {
        &self.stagger
    }

    /// Rule that placed particle `i`'s target.
    pub fn rule(&self, i: usize) -> TargetRule {
        self.rules[i]
    }

    /// Initial position of particle `i`.
    pub fn initial_at(&self, i: usize) -> Vec3 {
        Vec3::new(
            self.initial[i * 3],
            self.initial[i * 3 + 1],
            self.initial[i * 3 + 2],
        )
    }

    /// Target position of particle `i`.
    pub fn target_at(&self, i: usize) -> Vec3 {
        Vec3::new(
            self.target[i * 3],
            self.target[i * 3 + 1],
            self.target[i * 3 + 2],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_lengths_are_consistent() {
        let f = ParticleField::generate(1001, 14.0, 42);
        assert_eq!(f.count(), 1001);
        assert_eq!(f.initial_positions().len(), 3003);
        assert_eq!(f.target_positions().len(), 3003);
        assert_eq!(f.stagger().len(), 1001);
    }

    #[test]
    fn partition_is_exactly_seventy_thirty() {
        for n in [10usize, 1001, 4096] {
            let f = ParticleField::generate(n, 14.0, 1);
            let expected_ring = (n as f64 * 0.7).floor() as usize;
            assert_eq!(f.ring_count(), expected_ring);
            let counted = (0..n).filter(|&i| f.rule(i) == TargetRule::Ring).count();
            assert_eq!(counted, expected_ring);
            // Partition is by index, so the boundary is sharp.
            if expected_ring > 0 {
                assert_eq!(f.rule(expected_ring - 1), TargetRule::Ring);
            }
            if expected_ring < n {
                assert_eq!(f.rule(expected_ring), TargetRule::Sphere);
            }
        }
    }

    #[test]
    fn generation_is_deterministic_given_seed() {
        let a = ParticleField::generate(500, 14.0, 99);
        let b = ParticleField::generate(500, 14.0, 99);
        assert_eq!(a.initial_positions(), b.initial_positions());
        assert_eq!(a.target_positions(), b.target_positions());
        assert_eq!(a.stagger(), b.stagger());

        let c = ParticleField::generate(500, 14.0, 100);
        assert_ne!(a.initial_positions(), c.initial_positions());
    }

    #[test]
    fn initial_layout_coincides_with_the_plane() {
        let f = ParticleField::generate(2000, 14.0, 7);
        for i in 0..f.count() {
            let p = f.initial_at(i);
            assert!(p.x.abs() <= 7.0);
            assert!(p.y.abs() <= 7.0);
            assert!(p.z.abs() <= 0.25);
        }
    }

    #[test]
    fn target_layouts_respect_their_rules() {
        let f = ParticleField::generate(2000, 14.0, 7);
        for i in 0..f.count() {
            let p = f.target_at(i);
            match f.rule(i) {
                TargetRule::Ring => {
                    let radial = (p.x * p.x + p.y * p.y).sqrt();
                    assert!((2.5 - 1e-3..=4.0 + 1e-3).contains(&radial), "radial {radial}");
                    assert!(p.z.abs() <= 0.75 + 1e-3);
                }
                TargetRule::Sphere => {
                    let centered = Vec3::new(p.x, p.y, p.z - 0.5);
                    let r = centered.length();
                    assert!((r - 1.2).abs() < 1e-3, "sphere radius {r}");
                }
            }
        }
    }

    #[test]
    fn stagger_stays_in_unit_interval() {
        let f = ParticleField::generate(3000, 14.0, 3);
        assert!(f.stagger().iter().all(|&s| (0.0..1.0).contains(&s)));
    }
}

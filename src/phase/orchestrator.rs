use glam::DVec3;

use crate::animation::window::{
    CONVERGENCE, EXPLOSION, PARTICLE_FORMATION, REVEAL_FADE, REVEAL_SNAP, SURFACE_DISSOLVE,
};
use crate::config::{CameraTrack, Config};
use crate::phase::state::{CameraPose, PhaseState, SurfaceSpin};

/// Scroll-to-phase state machine.
///
/// The only continuous state is the smoothed scroll offset. Everything else
/// in [`PhaseState`] is recomputed from scratch every frame — phases are
/// never incremented, so a decreasing scroll sequence retraces them exactly
/// (within smoothing lag).
#[derive(Clone, Debug)]
pub struct ScrollOrchestrator {
    smoothing: f64,
    min_extent: f64,
    camera: CameraTrack,
    state: PhaseState,
}

impl ScrollOrchestrator {
    /// Build an orchestrator from a validated configuration.
    ///
    /// Starts with a zeroed [`PhaseState`]; the first [`advance`] call
    /// populates it.
    ///
    /// [`advance`]: ScrollOrchestrator::advance
    pub fn new(config: &Config) -> Self {
        Self {
            smoothing: config.smoothing,
            min_extent: config.min_extent,
            camera: config.camera,
            state: PhaseState::default(),
        }
    }

    /// Snapshot of the most recent frame.
    pub fn state(&self) -> &PhaseState {
        &self.state
    }

    /// Advance one frame from the host's raw scroll reading.
    ///
    /// `raw_scroll` is the current vertical offset; `extent` is the
    /// scrollable extent (document height minus viewport height). The extent
    /// is floored to a positive minimum so a short document can never push a
    /// non-finite progress value through the derived phases.
    pub fn advance(&mut self, raw_scroll: f64, extent: f64) -> &PhaseState {
        let raw = raw_scroll.max(0.0);
        let smoothed =
            self.state.smoothed_scroll + (raw - self.state.smoothed_scroll) * self.smoothing;
        let progress = (smoothed / extent.max(self.min_extent)).clamp(0.0, 1.0);

        self.state = PhaseState {
            smoothed_scroll: smoothed,
            progress,
            dissolve: SURFACE_DISSOLVE.sample(progress),
            formation: PARTICLE_FORMATION.sample(progress),
            explosion: EXPLOSION.sample(progress),
            convergence: CONVERGENCE.sample(progress),
            reveal_fade: REVEAL_FADE.sample(progress),
            reveal_snap: REVEAL_SNAP.sample(progress),
            camera: self.camera_pose(progress),
            spin: SurfaceSpin {
                y: smoothed * 0.0005,
                z: -0.1 + smoothed * 0.0002,
            },
        };
        &self.state
    }

    fn camera_pose(&self, progress: f64) -> CameraPose {
        let cam = &self.camera;
        let z = if progress < 0.5 {
            cam.near_z + (cam.mid_z - cam.near_z) * 2.0 * progress
        } else {
            cam.mid_z - (cam.mid_z - cam.close_z) * 2.0 * (progress - 0.5)
        };
        let y = (progress - 0.5) * -cam.drop;
        CameraPose {
            position: DVec3::new(0.0, y, z),
            look_at: DVec3::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(orch: &mut ScrollOrchestrator, raw: f64, extent: f64) -> PhaseState {
        for _ in 0..400 {
            orch.advance(raw, extent);
        }
        *orch.state()
    }

    #[test]
    fn progress_zero_zeroes_every_phase() {
        let mut orch = ScrollOrchestrator::new(&Config::default());
        let s = settle(&mut orch, 0.0, 2000.0);
        assert_eq!(s.progress, 0.0);
        for v in [
            s.dissolve,
            s.formation,
            s.explosion,
            s.convergence,
            s.reveal_fade,
            s.reveal_snap,
        ] {
            assert_eq!(v, 0.0);
        }
        assert!((s.camera.position.z - 15.0).abs() < 1e-9);
        assert_eq!(s.camera.look_at, DVec3::ZERO);
    }

    #[test]
    fn progress_one_saturates_every_phase() {
        let mut orch = ScrollOrchestrator::new(&Config::default());
        let s = settle(&mut orch, 2000.0, 2000.0);
        assert!((s.progress - 1.0).abs() < 1e-6);
        for v in [
            s.dissolve,
            s.formation,
            s.explosion,
            s.convergence,
            s.reveal_snap,
        ] {
            assert!((v - 1.0).abs() < 1e-4, "phase not saturated: {v}");
        }
    }

    #[test]
    fn midpoint_matches_worked_example() {
        let mut orch = ScrollOrchestrator::new(&Config::default());
        let s = settle(&mut orch, 1000.0, 2000.0);
        assert!((s.progress - 0.5).abs() < 1e-6);
        assert!((s.dissolve - 1.0).abs() < 1e-4);
        assert!((s.formation - 0.75).abs() < 1e-4);
        assert_eq!(s.explosion, 0.0);
    }

    #[test]
    fn phases_never_leave_unit_interval_and_are_monotone() {
        let mut orch = ScrollOrchestrator::new(&Config::default());
        let mut prev = *orch.state();
        for step in 0..=2000 {
            let raw = f64::from(step); // strictly increasing scroll
            let s = *orch.advance(raw, 2000.0);
            for (a, b) in [
                (prev.dissolve, s.dissolve),
                (prev.formation, s.formation),
                (prev.explosion, s.explosion),
                (prev.convergence, s.convergence),
                (prev.reveal_fade, s.reveal_fade),
                (prev.reveal_snap, s.reveal_snap),
            ] {
                assert!((0.0..=1.0).contains(&b));
                assert!(b >= a - 1e-12, "phase regressed under forward scroll");
            }
            prev = s;
        }
    }

    #[test]
    fn reverse_scroll_retraces_phase_values() {
        let mut orch = ScrollOrchestrator::new(&Config::default());
        // Sweep down, then back up to the same raw offset, then let the
        // smoothing settle: every phase must return to its earlier value.
        let reference = settle(&mut orch, 600.0, 2000.0);
        settle(&mut orch, 1900.0, 2000.0);
        let retraced = settle(&mut orch, 600.0, 2000.0);
        assert!((reference.dissolve - retraced.dissolve).abs() < 1e-6);
        assert!((reference.formation - retraced.formation).abs() < 1e-6);
        assert!((reference.explosion - retraced.explosion).abs() < 1e-6);
        assert!((reference.reveal_fade - retraced.reveal_fade).abs() < 1e-6);
        assert!((reference.camera.position - retraced.camera.position).length() < 1e-6);
        assert!((reference.spin.y - retraced.spin.y).abs() < 1e-9);
    }

    #[test]
    fn degenerate_extent_never_produces_non_finite_progress() {
        let mut orch = ScrollOrchestrator::new(&Config::default());
        for extent in [0.0, -500.0, f64::EPSILON] {
            let s = *orch.advance(1234.0, extent);
            assert!(s.progress.is_finite());
            assert!((0.0..=1.0).contains(&s.progress));
        }
    }

    #[test]
    fn camera_dolly_is_continuous_through_the_midpoint() {
        let orch = ScrollOrchestrator::new(&Config::default());
        let below = orch.camera_pose(0.5 - 1e-9).position.z;
        let above = orch.camera_pose(0.5).position.z;
        assert!((below - above).abs() < 1e-6);
        assert!((orch.camera_pose(0.0).position.z - 15.0).abs() < 1e-12);
        assert!((orch.camera_pose(0.5).position.z - 25.0).abs() < 1e-12);
        assert!((orch.camera_pose(1.0).position.z - 10.0).abs() < 1e-12);
    }

    #[test]
    fn smoothing_converges_without_overshoot() {
        let mut orch = ScrollOrchestrator::new(&Config::default());
        let mut prev = 0.0;
        for _ in 0..200 {
            let s = orch.advance(1000.0, 2000.0);
            assert!(s.smoothed_scroll >= prev);
            assert!(s.smoothed_scroll <= 1000.0);
            prev = s.smoothed_scroll;
        }
        assert!((prev - 1000.0).abs() < 1e-3);
    }
}

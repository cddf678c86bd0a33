//! Windowed remapping of global progress into per-transition phase scalars.

/// A clamped affine remap of global progress into `[0, 1]`.
///
/// The output is 0 before `start`, 1 after `start + width`, and linear in
/// between. Windows may overlap; each phase is an independent output, not a
/// mutually exclusive state.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhaseWindow {
    /// Progress value where the phase begins.
    pub start: f64,
    /// Progress span over which the phase runs 0 → 1. Must be > 0.
    pub width: f64,
}

impl PhaseWindow {
    /// Build a window from start and width.
    pub const fn new(start: f64, width: f64) -> Self {
        Self { start, width }
    }

    /// Sample the phase value for `progress`.
    pub fn sample(self, progress: f64) -> f64 {
        ((progress - self.start) / self.width).clamp(0.0, 1.0)
    }
}

/// Newspaper surface dissolve.
pub const SURFACE_DISSOLVE: PhaseWindow = PhaseWindow::new(0.10, 0.30);
/// Particle cloud forming into the eye shape.
pub const PARTICLE_FORMATION: PhaseWindow = PhaseWindow::new(0.20, 0.40);
/// Late-scroll outward burst.
pub const EXPLOSION: PhaseWindow = PhaseWindow::new(0.80, 0.20);
/// Pull-in toward the final still image.
pub const CONVERGENCE: PhaseWindow = PhaseWindow::new(0.92, 0.08);
/// Full-screen overlay fade.
pub const REVEAL_FADE: PhaseWindow = PhaseWindow::new(0.95, 0.05);
/// Near-binary snap of the final still image.
pub const REVEAL_SNAP: PhaseWindow = PhaseWindow::new(0.98, 0.02);

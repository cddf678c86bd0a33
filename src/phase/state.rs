use glam::DVec3;

/// Camera placement for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CameraPose {
    /// World-space camera position.
    pub position: DVec3,
    /// Point the camera looks at; fixed at the origin throughout.
    pub look_at: DVec3,
}

/// Slow scroll-coupled rotation of the newspaper surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceSpin {
    /// Rotation about the vertical axis, radians.
    pub y: f64,
    /// Rotation about the depth axis, radians.
    pub z: f64,
}

/// Per-frame snapshot of every scroll-derived value.
///
/// One instance, owned and exclusively rewritten by the orchestrator each
/// frame, read-only for everything downstream within that frame. Every field
/// is a pure function of the smoothed scroll offset, so scrolling back up
/// retraces the whole snapshot with no residual state.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhaseState {
    /// Exponentially smoothed scroll offset, `>= 0`.
    pub smoothed_scroll: f64,
    /// Smoothed offset normalized by the scrollable extent, in `[0, 1]`.
    pub progress: f64,
    /// Newspaper dissolve phase.
    pub dissolve: f64,
    /// Particle formation phase.
    pub formation: f64,
    /// Late-scroll burst phase.
    pub explosion: f64,
    /// Pull-in phase toward the final still.
    pub convergence: f64,
    /// Overlay fade phase.
    pub reveal_fade: f64,
    /// Final-still snap phase, clamped at the definition site.
    pub reveal_snap: f64,
    /// Camera placement.
    pub camera: CameraPose,
    /// Surface rotation pair.
    pub spin: SurfaceSpin,
}

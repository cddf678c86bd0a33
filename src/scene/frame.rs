use crate::foundation::core::Viewport;
use crate::foundation::error::GogaiResult;
use crate::gpu::{ParticleUniforms, SurfaceUniforms};
use crate::phase::PhaseState;
use crate::texture::SurfaceTexture;

/// Everything the rendering backend needs to draw one frame.
///
/// Assembled fresh each frame by the session; the backend treats it as
/// read-only. `texture_dirty` is true for exactly the one frame after the
/// inset pass lands, telling the backend to re-upload the page texture.
#[derive(Debug)]
pub struct SceneFrame<'a> {
    /// Elapsed time in seconds.
    pub time_secs: f64,
    /// The frame's phase snapshot (camera pose included).
    pub phases: &'a PhaseState,
    /// Uniforms for the surface-displacement program.
    pub surface: SurfaceUniforms,
    /// Uniforms for the particle-morph program.
    pub particles: ParticleUniforms,
    /// The composited page raster.
    pub texture: &'a SurfaceTexture,
    /// Re-upload the texture before drawing this frame.
    pub texture_dirty: bool,
    /// Current viewport, for projection parameters.
    pub viewport: Viewport,
}

/// The low-level rendering collaborator.
///
/// An opaque sink: the core submits one scoped drawing call per frame and
/// inspects nothing about the result.
pub trait RenderBackend {
    /// Draw the frame.
    fn draw(&mut self, frame: &SceneFrame<'_>) -> GogaiResult<()>;
}

use std::path::PathBuf;

use tracing::{debug, info};

use crate::assets::{InsetLoader, InsetPoll};
use crate::config::Config;
use crate::field::ParticleField;
use crate::foundation::core::Viewport;
use crate::foundation::error::GogaiResult;
use crate::gpu::{ParticleUniforms, SurfaceUniforms};
use crate::phase::{OverlaySink, OverlayStyle, OverlayTheme, PhaseState, ScrollOrchestrator};
use crate::scene::{RenderBackend, SceneFrame};
use crate::texture::{InsetSpec, PageStyle, SurfaceTexture, TextureCompositor};

/// Construction inputs for a [`Narrative`].
pub struct NarrativeOpts {
    /// Engine configuration; validated during construction.
    pub config: Config,
    /// Newspaper styling and copy.
    pub style: PageStyle,
    /// Photographic insets to load after startup. May be empty.
    pub insets: Vec<InsetSpec>,
    /// Directory the inset sources resolve against.
    pub assets_root: PathBuf,
    /// Reveal shadow blend end points.
    pub theme: OverlayTheme,
}

/// The per-frame driver.
///
/// Owns the orchestrator, the particle buffers, the page texture, and the
/// two collaborator handles. Each [`frame`] call performs, in strict order:
/// poll the inset one-shot, advance the orchestrator, apply the overlay
/// style unconditionally, submit one draw.
///
/// [`frame`]: Narrative::frame
pub struct Narrative {
    config: Config,
    orchestrator: ScrollOrchestrator,
    field: ParticleField,
    compositor: TextureCompositor,
    texture: SurfaceTexture,
    loader: Option<InsetLoader>,
    theme: OverlayTheme,
    viewport: Viewport,
    backend: Box<dyn RenderBackend>,
    overlay: Box<dyn OverlaySink>,
}

impl Narrative {
    /// Build the session: validate configuration, bind the overlay targets
    /// (failing fast if one is missing), generate the particle field,
    /// compose the base texture, and kick off the inset loads.
    pub fn new(
        opts: NarrativeOpts,
        viewport: Viewport,
        backend: Box<dyn RenderBackend>,
        mut overlay: Box<dyn OverlaySink>,
    ) -> GogaiResult<Self> {
        opts.config.validate()?;
        overlay.ensure_targets()?;

        let field = ParticleField::generate(
            opts.config.particle_count,
            opts.config.plane_extent,
            opts.config.seed,
        );
        let mut compositor =
            TextureCompositor::new(opts.style, opts.insets, opts.config.seed)?;
        let texture = compositor.compose_base()?;

        let sources: Vec<String> = compositor
            .insets()
            .iter()
            .map(|i| i.source.clone())
            .collect();
        let loader = if sources.is_empty() {
            None
        } else {
            Some(InsetLoader::spawn(opts.assets_root, sources))
        };

        info!(
            particles = field.count(),
            insets_pending = loader.is_some(),
            "narrative session ready"
        );
        let orchestrator = ScrollOrchestrator::new(&opts.config);
        Ok(Self {
            config: opts.config,
            orchestrator,
            field,
            compositor,
            texture,
            loader,
            theme: opts.theme,
            viewport,
            backend,
            overlay,
        })
    }

    /// Run one frame.
    ///
    /// `time_secs` is the host clock, `raw_scroll` the current vertical
    /// offset, `extent` the scrollable extent. Nothing here blocks on I/O.
    pub fn frame(&mut self, time_secs: f64, raw_scroll: f64, extent: f64) -> GogaiResult<()> {
        // 1. Consume the inset one-shot if it landed.
        if let Some(loader) = self.loader.as_mut() {
            match loader.poll() {
                InsetPoll::Pending => {}
                InsetPoll::Ready(images) => {
                    self.compositor.compose_insets(&mut self.texture, &images)?;
                    self.loader = None;
                }
                InsetPoll::Failed => {
                    self.loader = None;
                }
            }
        }

        // 2. Derive the frame's phase snapshot.
        let state = *self.orchestrator.advance(raw_scroll, extent);

        // 3. Overlay writes happen every frame, outside any branch, so
        //    scrolling back up can never leave a stale style behind.
        let style = OverlayStyle::derive(&state, &self.theme);
        self.overlay.apply(&style)?;

        // 4. One draw.
        let texture_dirty = self.texture.take_dirty();
        if texture_dirty {
            debug!("page texture re-upload requested");
        }
        let frame = SceneFrame {
            time_secs,
            phases: &state,
            surface: SurfaceUniforms::from_state(time_secs, &state, self.config.noise_scale),
            particles: ParticleUniforms::from_state(
                time_secs,
                &state,
                &self.config.colors,
                self.viewport.clamped_pixel_ratio(self.config.pixel_ratio_max),
            ),
            texture: &self.texture,
            texture_dirty,
            viewport: self.viewport,
        };
        self.backend.draw(&frame)
    }

    /// Windowing change notification.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// The most recent phase snapshot.
    pub fn state(&self) -> &PhaseState {
        self.orchestrator.state()
    }

    /// The particle buffers, for the backend's one-time upload.
    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    /// The current page texture.
    pub fn texture(&self) -> &SurfaceTexture {
        &self.texture
    }
}

use std::path::PathBuf;

use gogai::phase::{OverlaySink, OverlayStyle, OverlayTheme};
use gogai::texture::PageStyle;
use gogai::{Config, GogaiResult, Narrative, NarrativeOpts, RenderBackend, SceneFrame, Viewport};

struct NullBackend;

impl RenderBackend for NullBackend {
    fn draw(&mut self, _frame: &SceneFrame<'_>) -> GogaiResult<()> {
        Ok(())
    }
}

struct NullOverlay;

impl OverlaySink for NullOverlay {
    fn ensure_targets(&mut self) -> GogaiResult<()> {
        Ok(())
    }

    fn apply(&mut self, _style: &OverlayStyle) -> GogaiResult<()> {
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut narrative = Narrative::new(
        NarrativeOpts {
            config: Config {
                particle_count: 2000,
                ..Config::default()
            },
            style: PageStyle::default(),
            insets: vec![],
            assets_root: PathBuf::from("."),
            theme: OverlayTheme::default(),
        },
        Viewport::new(1280, 720, 2.0)?,
        Box::new(NullBackend),
        Box::new(NullOverlay),
    )?;

    let extent = 2000.0;
    for step in 0..=600u32 {
        let raw = extent * f64::from(step) / 600.0;
        narrative.frame(f64::from(step) / 60.0, raw, extent)?;
        if step % 100 == 0 {
            let s = narrative.state();
            println!(
                "progress {:.3}: dissolve {:.2} formation {:.2} explosion {:.2} convergence {:.2} camera_z {:.1}",
                s.progress, s.dissolve, s.formation, s.explosion, s.convergence, s.camera.position.z
            );
        }
    }

    Ok(())
}

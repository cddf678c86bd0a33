//! Session flow against recording collaborators: frame order, overlay
//! writes, and the texture dirty handoff.

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use gogai::phase::{OverlaySink, OverlayStyle, OverlayTheme};
use gogai::texture::{InsetSpec, PageStyle};
use gogai::{
    Config, GogaiError, GogaiResult, Narrative, NarrativeOpts, RenderBackend, SceneFrame, Viewport,
};

#[derive(Clone, Default)]
struct DrawLog {
    dirty_frames: Vec<bool>,
    dissolve: Vec<f32>,
}

struct RecordingBackend {
    log: Arc<Mutex<DrawLog>>,
}

impl RenderBackend for RecordingBackend {
    fn draw(&mut self, frame: &SceneFrame<'_>) -> GogaiResult<()> {
        let mut log = self.log.lock().unwrap();
        log.dirty_frames.push(frame.texture_dirty);
        log.dissolve.push(frame.surface.dissolve);
        Ok(())
    }
}

struct RecordingSink {
    styles: Arc<Mutex<Vec<OverlayStyle>>>,
}

impl OverlaySink for RecordingSink {
    fn ensure_targets(&mut self) -> GogaiResult<()> {
        Ok(())
    }

    fn apply(&mut self, style: &OverlayStyle) -> GogaiResult<()> {
        self.styles.lock().unwrap().push(*style);
        Ok(())
    }
}

struct MissingElementSink;

impl OverlaySink for MissingElementSink {
    fn ensure_targets(&mut self) -> GogaiResult<()> {
        Err(GogaiError::overlay("overlay element '#reveal' not found"))
    }

    fn apply(&mut self, _style: &OverlayStyle) -> GogaiResult<()> {
        Ok(())
    }
}

fn small_config() -> Config {
    let mut config = Config::default();
    config.particle_count = 500;
    config
}

fn session(
    insets: Vec<InsetSpec>,
    assets_root: std::path::PathBuf,
) -> (Narrative, Arc<Mutex<DrawLog>>, Arc<Mutex<Vec<OverlayStyle>>>) {
    let log = Arc::new(Mutex::new(DrawLog::default()));
    let styles = Arc::new(Mutex::new(Vec::new()));
    let narrative = Narrative::new(
        NarrativeOpts {
            config: small_config(),
            style: PageStyle::default(),
            insets,
            assets_root,
            theme: OverlayTheme::default(),
        },
        Viewport::new(1280, 720, 2.0).unwrap(),
        Box::new(RecordingBackend { log: log.clone() }),
        Box::new(RecordingSink {
            styles: styles.clone(),
        }),
    )
    .unwrap();
    (narrative, log, styles)
}

fn png_bytes() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([90, 90, 90, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn overlay_and_draw_happen_every_frame() {
    let (mut narrative, log, styles) = session(vec![], std::env::temp_dir());
    for step in 0..10 {
        narrative
            .frame(f64::from(step) * 0.016, f64::from(step) * 50.0, 2000.0)
            .unwrap();
    }
    assert_eq!(log.lock().unwrap().dissolve.len(), 10);
    assert_eq!(styles.lock().unwrap().len(), 10);
}

#[test]
fn texture_dirty_fires_exactly_once_after_insets_land() {
    let dir = std::env::temp_dir().join(format!("gogai-session-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("crystal.png"), png_bytes()).unwrap();

    let insets = vec![InsetSpec {
        rect: kurbo::Rect::new(100.0, 400.0, 460.0, 700.0),
        source: "crystal.png".to_string(),
        caption: "奇跡の結晶 (イメージ)".to_string(),
    }];
    let (mut narrative, log, _styles) = session(insets, dir.clone());

    // Drive frames until the deferred pass lands, then a few more.
    for step in 0..400 {
        narrative.frame(f64::from(step) * 0.016, 0.0, 2000.0).unwrap();
        if log.lock().unwrap().dirty_frames.iter().any(|&d| d) {
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(2));
    }
    for step in 0..5 {
        narrative.frame(f64::from(step) * 0.016, 0.0, 2000.0).unwrap();
    }

    let dirty: Vec<usize> = log
        .lock()
        .unwrap()
        .dirty_frames
        .iter()
        .enumerate()
        .filter_map(|(i, &d)| d.then_some(i))
        .collect();
    assert_eq!(dirty.len(), 1, "dirty flag must fire exactly once");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_inset_degrades_but_frames_keep_rendering() {
    let insets = vec![InsetSpec {
        rect: kurbo::Rect::new(100.0, 400.0, 460.0, 700.0),
        source: "never-exists.png".to_string(),
        caption: "missing".to_string(),
    }];
    let (mut narrative, log, _styles) = session(insets, std::env::temp_dir().join("gogai-none"));
    let before = narrative.texture().rgba8_premul().to_vec();
    for step in 0..50 {
        narrative.frame(f64::from(step) * 0.016, 0.0, 2000.0).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1));
    }
    assert!(log.lock().unwrap().dirty_frames.iter().all(|&d| !d));
    assert_eq!(before, narrative.texture().rgba8_premul());
}

#[test]
fn missing_overlay_element_fails_at_construction() {
    let result = Narrative::new(
        NarrativeOpts {
            config: small_config(),
            style: PageStyle::default(),
            insets: vec![],
            assets_root: std::env::temp_dir(),
            theme: OverlayTheme::default(),
        },
        Viewport::new(1280, 720, 1.0).unwrap(),
        Box::new(RecordingBackend {
            log: Arc::new(Mutex::new(DrawLog::default())),
        }),
        Box::new(MissingElementSink),
    );
    assert!(matches!(result, Err(GogaiError::Overlay(_))));
}

#[test]
fn overlay_style_tracks_late_scroll() {
    let (mut narrative, _log, styles) = session(vec![], std::env::temp_dir());
    // Park the scroll at 97% and let the smoothing settle.
    for step in 0..600 {
        narrative
            .frame(f64::from(step) * 0.016, 1940.0, 2000.0)
            .unwrap();
    }
    let last = *styles.lock().unwrap().last().unwrap();
    assert!((last.veil_opacity - 0.4).abs() < 1e-3);
    assert!((last.shadow.color[3] - 0.6).abs() < 1e-3);
}

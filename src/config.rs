use crate::foundation::core::Rgb8;
use crate::foundation::error::{GogaiError, GogaiResult};

/// Engine palette: scene background, particle ink, and energy accent.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Colors {
    /// Scene background / fog color.
    pub bg: Rgb8,
    /// Particle color while the cloud still reads as newsprint.
    pub ink: Rgb8,
    /// Particle color once the eye has formed.
    pub accent: Rgb8,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            bg: Rgb8::new(0x10, 0x10, 0x14),
            ink: Rgb8::new(0x11, 0x11, 0x11),
            accent: Rgb8::new(0xff, 0x33, 0x33),
        }
    }
}

/// Two-segment camera dolly, continuous through the shared mid value.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CameraTrack {
    /// Z position at progress 0.
    pub near_z: f64,
    /// Z position at progress 0.5, shared by both segments.
    pub mid_z: f64,
    /// Z position at progress 1.
    pub close_z: f64,
    /// Total vertical travel over the full scroll; the camera sits at
    /// `+drop/2` at progress 0 and `-drop/2` at progress 1.
    pub drop: f64,
}

impl Default for CameraTrack {
    fn default() -> Self {
        Self {
            near_z: 15.0,
            mid_z: 25.0,
            close_z: 10.0,
            drop: 5.0,
        }
    }
}

/// Tunable surface of the engine.
///
/// `Default` reproduces the shipped narrative; hosts may also deserialize a
/// JSON document via [`Config::from_json`]. Every constructor path runs
/// [`Config::validate`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Number of particles in the morph field.
    pub particle_count: usize,
    /// Side length of the newspaper plane in world units.
    pub plane_extent: f64,
    /// Spatial frequency of the dissolve noise field.
    pub noise_scale: f64,
    /// Exponential scroll smoothing constant, in `(0, 1)`.
    pub smoothing: f64,
    /// Floor applied to the scrollable extent before normalization.
    pub min_extent: f64,
    /// Upper bound on the device pixel ratio entering point-size math.
    pub pixel_ratio_max: f64,
    /// Seed for every random draw in generation and compositing.
    pub seed: u64,
    /// Palette.
    pub colors: Colors,
    /// Camera dolly track.
    pub camera: CameraTrack,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            particle_count: 15_000,
            plane_extent: 14.0,
            noise_scale: 3.0,
            smoothing: 0.1,
            min_extent: 1.0,
            pixel_ratio_max: 2.0,
            seed: 0x676f_6761_6921,
            colors: Colors::default(),
            camera: CameraTrack::default(),
        }
    }
}

impl Config {
    /// Deserialize and validate a JSON configuration document.
    pub fn from_json(json: &str) -> GogaiResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| GogaiError::validation(format!("config parse: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check structural invariants.
    pub fn validate(&self) -> GogaiResult<()> {
        if self.particle_count == 0 {
            return Err(GogaiError::validation("particle_count must be > 0"));
        }
        if !(self.plane_extent.is_finite() && self.plane_extent > 0.0) {
            return Err(GogaiError::validation("plane_extent must be > 0"));
        }
        if !(self.noise_scale.is_finite() && self.noise_scale > 0.0) {
            return Err(GogaiError::validation("noise_scale must be > 0"));
        }
        if !(self.smoothing.is_finite() && self.smoothing > 0.0 && self.smoothing < 1.0) {
            return Err(GogaiError::validation("smoothing must be in (0, 1)"));
        }
        if !(self.min_extent.is_finite() && self.min_extent > 0.0) {
            return Err(GogaiError::validation("min_extent must be > 0"));
        }
        if !(self.pixel_ratio_max.is_finite() && self.pixel_ratio_max >= 1.0) {
            return Err(GogaiError::validation("pixel_ratio_max must be >= 1"));
        }
        let cam = &self.camera;
        for (name, v) in [
            ("camera.near_z", cam.near_z),
            ("camera.mid_z", cam.mid_z),
            ("camera.close_z", cam.close_z),
            ("camera.drop", cam.drop),
        ] {
            if !v.is_finite() {
                return Err(GogaiError::validation(format!("{name} must be finite")));
            }
        }
        Ok(())
    }
}

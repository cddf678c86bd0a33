use crate::foundation::error::GogaiResult;
use crate::foundation::math::lerp;
use crate::phase::state::PhaseState;

/// CSS-style drop-shadow descriptor: offset, blur radius, and RGBA color
/// (rgb channels in `0..=255`, alpha in `0..=1`).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DropShadow {
    /// Horizontal offset in CSS pixels.
    pub offset_x: f64,
    /// Vertical offset in CSS pixels.
    pub offset_y: f64,
    /// Blur radius in CSS pixels.
    pub blur: f64,
    /// RGBA color, `[r, g, b, alpha]`.
    pub color: [f64; 4],
}

impl DropShadow {
    /// Componentwise blend from `a` to `b`.
    pub fn mix(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            offset_x: lerp(a.offset_x, b.offset_x, t),
            offset_y: lerp(a.offset_y, b.offset_y, t),
            blur: lerp(a.blur, b.blur, t),
            color: [
                lerp(a.color[0], b.color[0], t),
                lerp(a.color[1], b.color[1], t),
                lerp(a.color[2], b.color[2], t),
                lerp(a.color[3], b.color[3], t),
            ],
        }
    }
}

/// End points of the reveal shadow blend.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OverlayTheme {
    /// Shadow at reveal-fade 0: the energetic glow.
    pub glow: DropShadow,
    /// Shadow at reveal-fade 1: the resting print shadow.
    pub shadow: DropShadow,
}

impl Default for OverlayTheme {
    fn default() -> Self {
        Self {
            glow: DropShadow {
                offset_x: 0.0,
                offset_y: 0.0,
                blur: 60.0,
                color: [255.0, 51.0, 51.0, 0.8],
            },
            shadow: DropShadow {
                offset_x: 6.0,
                offset_y: 10.0,
                blur: 24.0,
                color: [17.0, 17.0, 17.0, 0.3],
            },
        }
    }
}

/// Per-frame style outputs for the DOM overlay collaborator.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OverlayStyle {
    /// Opacity of the full-screen overlay veil.
    pub veil_opacity: f64,
    /// Blended drop shadow for the revealed still.
    pub shadow: DropShadow,
    /// Opacity of the secondary still image; snaps in over the last 2% of
    /// scroll.
    pub still_opacity: f64,
}

impl OverlayStyle {
    /// Derive the frame's overlay style from the phase snapshot.
    pub fn derive(state: &PhaseState, theme: &OverlayTheme) -> Self {
        Self {
            veil_opacity: state.reveal_fade,
            shadow: DropShadow::mix(&theme.glow, &theme.shadow, state.reveal_fade),
            still_opacity: state.reveal_snap,
        }
    }
}

/// DOM overlay collaborator.
///
/// The orchestrated style is applied unconditionally every frame, so an
/// implementation must not skip writes; a missing target element is a
/// construction-time failure, never a silent per-frame no-op.
pub trait OverlaySink {
    /// Verify that every styled element exists. Called once at session
    /// construction; an error here aborts startup.
    fn ensure_targets(&mut self) -> GogaiResult<()>;

    /// Write the frame's style values.
    fn apply(&mut self, style: &OverlayStyle) -> GogaiResult<()>;
}

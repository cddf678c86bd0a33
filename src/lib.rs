//! Gogai renders a single-page scroll-driven visual narrative: a flat
//! newspaper surface dissolves into a particle cloud that reorganizes into a
//! mechanical eye, explodes, and converges into a final still image.
//!
//! The crate owns the deterministic core of that sequence:
//!
//! - Map a smoothed scroll offset into a set of windowed animation phases
//!   ([`phase::ScrollOrchestrator`] → [`phase::PhaseState`]).
//! - Generate the particle morph buffers once at startup
//!   ([`field::ParticleField`]).
//! - Composite the newspaper raster, including the deferred photographic
//!   insets ([`texture::TextureCompositor`]).
//! - Define the per-frame GPU evaluation contract as WGSL sources plus
//!   matching uniform structs, with CPU parity evaluators for testing
//!   ([`gpu`]).
//!
//! Windowing, the low-level draw call, and the DOM overlay are external
//! collaborators reached through the [`scene::RenderBackend`] and
//! [`phase::OverlaySink`] traits. [`session::Narrative`] ties everything
//! together once per display refresh.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;

/// Image decoding and the deferred inset loader.
pub mod assets;
/// Tunable engine configuration.
pub mod config;
/// Particle field generation.
pub mod field;
/// GPU interpolation contract: shaders, uniforms, parity evaluators.
pub mod gpu;
/// Scroll phase orchestration and overlay styling.
pub mod phase;
/// Frame description handed to the rendering backend.
pub mod scene;
/// Per-frame session driver and bootstrap gate.
pub mod session;
/// Newspaper texture compositing.
pub mod texture;

pub use crate::foundation::core::{Rgb8, Viewport};
pub use crate::foundation::error::{GogaiError, GogaiResult};

pub use crate::config::Config;
pub use crate::field::ParticleField;
pub use crate::phase::{OverlaySink, OverlayStyle, PhaseState, ScrollOrchestrator};
pub use crate::scene::{RenderBackend, SceneFrame};
pub use crate::session::{BootstrapGate, Narrative, NarrativeOpts};
pub use crate::texture::{SurfaceTexture, TextureCompositor};

mod orchestrator;
mod overlay;
mod state;

pub use orchestrator::ScrollOrchestrator;
pub use overlay::{DropShadow, OverlaySink, OverlayStyle, OverlayTheme};
pub use state::{CameraPose, PhaseState, SurfaceSpin};

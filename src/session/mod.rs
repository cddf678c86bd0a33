mod bootstrap;
mod narrative;

pub use bootstrap::BootstrapGate;
pub use narrative::{Narrative, NarrativeOpts};

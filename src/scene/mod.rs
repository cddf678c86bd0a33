mod frame;

pub use frame::{RenderBackend, SceneFrame};

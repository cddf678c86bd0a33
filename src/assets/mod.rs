mod decode;
mod loader;

pub use decode::{PreparedImage, decode_image};
pub use loader::{InsetLoader, InsetPoll};

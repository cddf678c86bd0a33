mod columns;
mod compositor;

pub use columns::{ColumnLayout, ColumnPlan, GlyphCell, plan_columns};
pub use compositor::{FontBytes, InsetSpec, PageStyle, SurfaceTexture, TextureCompositor};
